//! Construction legality.
//!
//! Every predicate checks its clauses in a fixed order and reports the first
//! one that fails. Nothing here mutates state.

use crate::board::BoardGraph;
use crate::game::players::PlayerState;
use crate::game::resources::{COST_CITY, COST_ROAD, COST_SETTLEMENT, ResourceBundle};
use crate::types::{EdgeId, PlayerId, Resource, Tier, VertexId};

/// A rejected action and the reason shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("edge already has a road")]
    EdgeOwned,
    #[error("no roads remaining")]
    NoRoadsLeft,
    #[error("insufficient resources (need {cost})")]
    InsufficientResources { cost: ResourceBundle },
    #[error("road must connect to your existing road or settlement/city")]
    RoadNotConnected,
    #[error("vertex already occupied")]
    VertexOccupied,
    #[error("too close to another settlement (distance rule)")]
    DistanceRule,
    #[error("no settlements remaining")]
    NoSettlementsLeft,
    #[error("settlement must be connected by your road")]
    SettlementNotConnected,
    #[error("you don't own a settlement at this vertex")]
    NotYourSettlement,
    #[error("already a city")]
    AlreadyCity,
    #[error("no cities remaining")]
    NoCitiesLeft,
    #[error("road must connect to the settlement just placed")]
    InitialRoadDetached,
    #[error("not allowed during {0}")]
    WrongPhase(String),
    #[error("game is over")]
    GameOver,
    #[error("cannot trade a resource for itself")]
    SameResourceTrade,
    #[error("bank has no {0} left")]
    BankShort(Resource),
    #[error("development deck is empty")]
    DeckEmpty,
    #[error("trading between players is not supported")]
    PlayerTradeUnsupported,
    #[error("the block marker only moves on a seven")]
    BlockMoveOutsideSeven,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("dice already rolled this turn")]
    AlreadyRolled,
}

pub type Verdict = Result<(), Violation>;

fn require_cost(player: &PlayerState, cost: ResourceBundle) -> Verdict {
    if player.resources.can_afford(&cost) {
        Ok(())
    } else {
        Err(Violation::InsufficientResources { cost })
    }
}

/// The vertex is owned by `player`, or one of its edges is owned by `player`
/// and leads to another vertex `player` owns.
pub fn vertex_connected_to_player(board: &BoardGraph, player: PlayerId, vertex: VertexId) -> bool {
    if board.owns_vertex(player, vertex) {
        return true;
    }
    board.edges_of(vertex).iter().any(|&edge| {
        board.owns_edge(player, edge) && board.owns_vertex(player, board.other_end(edge, vertex))
    })
}

pub fn can_build_road(board: &BoardGraph, player: &PlayerState, edge: EdgeId) -> Verdict {
    let target = board.edge(edge);
    if target.owner.is_some() {
        return Err(Violation::EdgeOwned);
    }
    if player.inventory.roads == 0 {
        return Err(Violation::NoRoadsLeft);
    }
    require_cost(player, COST_ROAD)?;
    if !target
        .ends
        .iter()
        .any(|&end| vertex_connected_to_player(board, player.id, end))
    {
        return Err(Violation::RoadNotConnected);
    }
    Ok(())
}

/// Empty vertex and distance rule; shared by both settlement predicates.
fn check_site(board: &BoardGraph, vertex: VertexId) -> Verdict {
    if board.structure_at(vertex).is_some() {
        return Err(Violation::VertexOccupied);
    }
    if board.has_adjacent_structure(vertex) {
        return Err(Violation::DistanceRule);
    }
    Ok(())
}

pub fn can_build_settlement(board: &BoardGraph, player: &PlayerState, vertex: VertexId) -> Verdict {
    check_site(board, vertex)?;
    if player.inventory.settlements == 0 {
        return Err(Violation::NoSettlementsLeft);
    }
    require_cost(player, COST_SETTLEMENT)?;
    if !board
        .edges_of(vertex)
        .iter()
        .any(|&edge| board.owns_edge(player.id, edge))
    {
        return Err(Violation::SettlementNotConnected);
    }
    Ok(())
}

/// Placement rounds: no cost, no inventory check, no road required.
pub fn can_place_initial_settlement(board: &BoardGraph, vertex: VertexId) -> Verdict {
    check_site(board, vertex)
}

pub fn can_place_initial_road(board: &BoardGraph, settlement: VertexId, edge: EdgeId) -> Verdict {
    let target = board.edge(edge);
    if target.owner.is_some() {
        return Err(Violation::EdgeOwned);
    }
    if !target.touches(settlement) {
        return Err(Violation::InitialRoadDetached);
    }
    Ok(())
}

pub fn can_upgrade_city(board: &BoardGraph, player: &PlayerState, vertex: VertexId) -> Verdict {
    match board.structure_at(vertex) {
        Some(s) if s.owner == player.id && s.tier == Tier::City => {
            return Err(Violation::AlreadyCity);
        }
        Some(s) if s.owner == player.id => {}
        _ => return Err(Violation::NotYourSettlement),
    }
    if player.inventory.cities == 0 {
        return Err(Violation::NoCitiesLeft);
    }
    require_cost(player, COST_CITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardLayout, HexLayout, Structure};
    use crate::game::players::PlayerSpec;
    use crate::types::{Color, Resource};

    // One hex ringed by vertices 0..6 with a spur from 0 to 6, closed off
    // by a triangle through 7 and 8.
    fn ring() -> BoardGraph {
        let mut edges: Vec<(VertexId, VertexId)> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        edges.push((0, 6));
        BoardGraph::from_layout(BoardLayout {
            vertex_count: 7,
            hexes: vec![HexLayout {
                resource: Some(Resource::Wheat),
                number: Some(6),
                vertices: (0..6).collect(),
                coord: None,
            }],
            edges,
            blocked: None,
        }
        .close_dead_ends())
        .unwrap()
    }

    fn rich_player(id: PlayerId) -> PlayerState {
        let mut player = PlayerState::new(id, PlayerSpec::cpu("p", Color::ORDERED[id]));
        player.resources = crate::game::resources::ResourceBundle::from_counts([9; 5]);
        player
    }

    fn settle(board: &mut BoardGraph, owner: PlayerId, vertex: VertexId) {
        board.place_structure(
            vertex,
            Structure {
                owner,
                tier: Tier::Settlement,
            },
        );
    }

    #[test]
    fn road_reasons_follow_precedence() {
        let mut board = ring();
        let mut player = rich_player(0);
        board.place_road(0, 1);
        assert_eq!(can_build_road(&board, &player, 0), Err(Violation::EdgeOwned));

        player.inventory.roads = 0;
        player.resources = ResourceBundle::zero();
        assert_eq!(can_build_road(&board, &player, 1), Err(Violation::NoRoadsLeft));

        player.inventory.roads = 3;
        assert!(matches!(
            can_build_road(&board, &player, 1),
            Err(Violation::InsufficientResources { .. })
        ));

        player.resources = COST_ROAD;
        assert_eq!(can_build_road(&board, &player, 1), Err(Violation::RoadNotConnected));
    }

    #[test]
    fn road_connectivity_needs_a_structure_at_the_root() {
        let mut board = ring();
        let player = rich_player(0);
        settle(&mut board, 0, 0);
        // Edge 0 joins 0-1 and touches the settlement directly.
        assert_eq!(can_build_road(&board, &player, 0), Ok(()));
        board.place_road(0, 0);
        // Edge 1 joins 1-2; vertex 1 reaches the settlement over edge 0.
        assert_eq!(can_build_road(&board, &player, 1), Ok(()));
        board.place_road(1, 0);
        // Edge 2 joins 2-3; vertex 2 is only reached through another bare road.
        assert_eq!(can_build_road(&board, &player, 2), Err(Violation::RoadNotConnected));
    }

    #[test]
    fn settlement_reasons_follow_precedence() {
        let mut board = ring();
        let mut player = rich_player(0);
        settle(&mut board, 1, 3);
        assert_eq!(can_build_settlement(&board, &player, 3), Err(Violation::VertexOccupied));
        assert_eq!(can_build_settlement(&board, &player, 2), Err(Violation::DistanceRule));

        player.inventory.settlements = 0;
        assert_eq!(can_build_settlement(&board, &player, 0), Err(Violation::NoSettlementsLeft));

        player.inventory.settlements = 2;
        player.resources = ResourceBundle::zero();
        assert!(matches!(
            can_build_settlement(&board, &player, 0),
            Err(Violation::InsufficientResources { .. })
        ));

        player.resources = COST_SETTLEMENT;
        assert_eq!(
            can_build_settlement(&board, &player, 0),
            Err(Violation::SettlementNotConnected)
        );
        board.place_road(6, 0);
        assert_eq!(can_build_settlement(&board, &player, 0), Ok(()));
    }

    #[test]
    fn initial_settlement_skips_connectivity() {
        let mut board = ring();
        assert_eq!(can_place_initial_settlement(&board, 0), Ok(()));
        settle(&mut board, 0, 0);
        assert_eq!(can_place_initial_settlement(&board, 0), Err(Violation::VertexOccupied));
        assert_eq!(can_place_initial_settlement(&board, 1), Err(Violation::DistanceRule));
        assert_eq!(can_place_initial_settlement(&board, 3), Ok(()));
    }

    #[test]
    fn initial_road_must_touch_settlement() {
        let board = ring();
        assert_eq!(can_place_initial_road(&board, 0, 0), Ok(()));
        assert_eq!(
            can_place_initial_road(&board, 0, 2),
            Err(Violation::InitialRoadDetached)
        );
    }

    #[test]
    fn city_reasons_follow_precedence() {
        let mut board = ring();
        let mut player = rich_player(0);
        assert_eq!(can_upgrade_city(&board, &player, 0), Err(Violation::NotYourSettlement));
        settle(&mut board, 1, 0);
        assert_eq!(can_upgrade_city(&board, &player, 0), Err(Violation::NotYourSettlement));

        settle(&mut board, 0, 3);
        player.inventory.cities = 0;
        assert_eq!(can_upgrade_city(&board, &player, 3), Err(Violation::NoCitiesLeft));

        player.inventory.cities = 4;
        player.resources = ResourceBundle::from_counts([0, 0, 0, 2, 2]);
        assert_eq!(
            can_upgrade_city(&board, &player, 3),
            Err(Violation::InsufficientResources { cost: COST_CITY })
        );

        player.resources = COST_CITY;
        assert_eq!(can_upgrade_city(&board, &player, 3), Ok(()));
        board.place_structure(
            3,
            Structure {
                owner: 0,
                tier: Tier::City,
            },
        );
        assert_eq!(can_upgrade_city(&board, &player, 3), Err(Violation::AlreadyCity));
    }

    #[test]
    fn reasons_read_naturally() {
        let violation = Violation::InsufficientResources { cost: COST_ROAD };
        assert_eq!(violation.to_string(), "insufficient resources (need 1xWOOD, 1xBRICK)");
    }
}
