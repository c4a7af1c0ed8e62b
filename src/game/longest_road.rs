//! Longest contiguous road and the bonus that goes with it.

use std::collections::{BTreeMap, HashSet};

use tracing::info;

use crate::board::BoardGraph;
use crate::game::players::PlayerState;
use crate::types::{EdgeId, PlayerId, VertexId};

/// Roads shorter than this never qualify for the bonus.
pub const MIN_LONGEST_ROAD: usize = 5;
pub const LONGEST_ROAD_BONUS: u8 = 2;

type Adjacency = BTreeMap<VertexId, Vec<(EdgeId, VertexId)>>;

fn owned_adjacency(board: &BoardGraph, player: PlayerId, extra: Option<EdgeId>) -> Adjacency {
    let mut adjacency: Adjacency = BTreeMap::new();
    let owned = board
        .edges()
        .iter()
        .filter(|edge| edge.owner == Some(player) || Some(edge.id) == extra);
    for edge in owned {
        let [a, b] = edge.ends;
        adjacency.entry(a).or_default().push((edge.id, b));
        adjacency.entry(b).or_default().push((edge.id, a));
    }
    adjacency
}

fn blocked_for(board: &BoardGraph, player: PlayerId, vertex: VertexId) -> bool {
    board
        .structure_at(vertex)
        .is_some_and(|structure| structure.owner != player)
}

fn walk(
    adjacency: &Adjacency,
    blocked: &dyn Fn(VertexId) -> bool,
    vertex: VertexId,
    used: &mut HashSet<EdgeId>,
) -> usize {
    let Some(links) = adjacency.get(&vertex) else {
        return 0;
    };
    let mut best = 0;
    for &(edge, next) in links {
        if !used.insert(edge) {
            continue;
        }
        // A path may end on an opponent's structure but not pass through it.
        let onward = if blocked(next) {
            0
        } else {
            walk(adjacency, blocked, next, used)
        };
        used.remove(&edge);
        best = best.max(1 + onward);
    }
    best
}

fn measure(board: &BoardGraph, player: PlayerId, extra: Option<EdgeId>) -> usize {
    let adjacency = owned_adjacency(board, player, extra);
    let edge_count: usize = adjacency.values().map(Vec::len).sum::<usize>() / 2;
    if edge_count < MIN_LONGEST_ROAD {
        return 0;
    }

    let blocked = |vertex: VertexId| blocked_for(board, player, vertex);
    let mut used = HashSet::with_capacity(edge_count);
    adjacency
        .keys()
        .filter(|&&start| !blocked(start))
        .map(|&start| walk(&adjacency, &blocked, start, &mut used))
        .max()
        .unwrap_or(0)
}

/// Edge count of the player's longest simple road path, or 0 when the
/// player owns fewer than [`MIN_LONGEST_ROAD`] roads.
pub fn longest_road(board: &BoardGraph, player: PlayerId) -> usize {
    measure(board, player, None)
}

/// Same measurement with `edge` counted as the player's road.
pub fn longest_road_if_built(board: &BoardGraph, player: PlayerId, edge: EdgeId) -> usize {
    measure(board, player, Some(edge))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderChange {
    pub previous: Option<PlayerId>,
    pub current: Option<PlayerId>,
    /// Longest road per player, indexed by player id.
    pub lengths: Vec<usize>,
}

impl HolderChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Recomputes every player's longest road and moves the bonus.
///
/// A unique maximum of at least [`MIN_LONGEST_ROAD`] takes the bonus. On a
/// tie the current holder keeps it if they are among the tied players;
/// otherwise nobody holds it.
pub fn update_longest_road_holder(board: &BoardGraph, players: &mut [PlayerState]) -> HolderChange {
    let lengths: Vec<usize> = players
        .iter()
        .map(|player| longest_road(board, player.id))
        .collect();
    let previous = players
        .iter()
        .position(|player| player.has_longest_road);
    let best = lengths.iter().copied().max().unwrap_or(0);

    let current = if best < MIN_LONGEST_ROAD {
        None
    } else {
        let tied: Vec<PlayerId> = lengths
            .iter()
            .enumerate()
            .filter(|&(_, &len)| len == best)
            .map(|(idx, _)| idx)
            .collect();
        match tied.as_slice() {
            [only] => Some(*only),
            _ => previous.filter(|holder| tied.contains(holder)),
        }
    };

    if previous != current {
        if let Some(idx) = previous {
            let loser = &mut players[idx];
            loser.has_longest_road = false;
            loser.victory_points = loser.victory_points.saturating_sub(LONGEST_ROAD_BONUS);
        }
        if let Some(idx) = current {
            let winner = &mut players[idx];
            winner.has_longest_road = true;
            winner.victory_points += LONGEST_ROAD_BONUS;
        }
        info!(?previous, ?current, length = best, "longest road changed hands");
    }

    HolderChange {
        previous,
        current,
        lengths,
    }
}
