use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::coords::CubeCoord;
use crate::types::{EdgeId, HexId, PlayerId, Resource, Tier, VertexId};

mod layout;

pub use layout::{BoardLayout, HexLayout};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hex {
    pub id: HexId,
    pub resource: Option<Resource>,
    pub number: Option<u8>,
    pub vertices: SmallVec<[VertexId; 6]>,
    pub coord: Option<CubeCoord>,
    pub has_block: bool,
}

impl Hex {
    pub fn is_producing(&self) -> bool {
        self.resource.is_some() && self.number.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub owner: PlayerId,
    pub tier: Tier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub edges: SmallVec<[EdgeId; 3]>,
    pub hexes: SmallVec<[HexId; 3]>,
    pub structure: Option<Structure>,
}

impl Vertex {
    pub fn owner(&self) -> Option<PlayerId> {
        self.structure.map(|s| s.owner)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub ends: [VertexId; 2],
    pub owner: Option<PlayerId>,
}

impl Edge {
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.ends.contains(&vertex)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no hexes")]
    NoHexes,
    #[error("edge {edge} references unknown vertex {vertex}")]
    EdgeVertexOutOfRange { edge: usize, vertex: VertexId },
    #[error("edge {edge} joins vertex {vertex} to itself")]
    SelfLoop { edge: usize, vertex: VertexId },
    #[error("vertices {0} and {1} are joined by more than one edge")]
    DuplicateEdge(VertexId, VertexId),
    #[error("hex {hex} references unknown vertex {vertex}")]
    HexVertexOutOfRange { hex: usize, vertex: VertexId },
    #[error("hex {hex} carries invalid number token {number}")]
    InvalidNumber { hex: usize, number: u8 },
    #[error("vertex {vertex} touches {count} hexes")]
    TooManyHexes { vertex: VertexId, count: usize },
    #[error("vertex {vertex} has degree {degree}")]
    VertexDegree { vertex: VertexId, degree: usize },
    #[error("vertex {vertex} and edge {edge} disagree about incidence")]
    Incidence { vertex: VertexId, edge: EdgeId },
    #[error("block marker references unknown hex {0}")]
    BlockedOutOfRange(HexId),
    #[error("block stamps do not match the marker on hex {0}")]
    BlockStamp(HexId),
}

/// Statistical production weight of a dice number: 2/12→1 up to 6/8→5.
/// Seven and anything outside 2..=12 weigh nothing.
pub const fn pip_weight(number: u8) -> u8 {
    match number {
        2 | 12 => 1,
        3 | 11 => 2,
        4 | 10 => 3,
        5 | 9 => 4,
        6 | 8 => 5,
        _ => 0,
    }
}

/// Arena of hexes, vertices and edges keyed by integer ids, plus the
/// dice-number index used for production.
///
/// Accessors taking an id panic on unknown ids; callers validate external
/// input with the `contains_*` methods first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardGraph {
    hexes: Vec<Hex>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    number_to_hexes: BTreeMap<u8, SmallVec<[HexId; 2]>>,
    blocked: HexId,
}

impl BoardGraph {
    pub fn standard(rng: &mut impl rand::Rng) -> Result<Self, BoardError> {
        Self::from_layout(BoardLayout::standard(rng))
    }

    pub fn from_layout(layout: BoardLayout) -> Result<Self, BoardError> {
        if layout.hexes.is_empty() {
            return Err(BoardError::NoHexes);
        }

        let mut vertices: Vec<Vertex> = (0..layout.vertex_count)
            .map(|idx| Vertex {
                id: idx as VertexId,
                edges: SmallVec::new(),
                hexes: SmallVec::new(),
                structure: None,
            })
            .collect();

        let mut seen = BTreeSet::new();
        let mut edges = Vec::with_capacity(layout.edges.len());
        for (idx, &(a, b)) in layout.edges.iter().enumerate() {
            for vertex in [a, b] {
                if vertex as usize >= vertices.len() {
                    return Err(BoardError::EdgeVertexOutOfRange { edge: idx, vertex });
                }
            }
            if a == b {
                return Err(BoardError::SelfLoop { edge: idx, vertex: a });
            }
            if !seen.insert((a.min(b), a.max(b))) {
                return Err(BoardError::DuplicateEdge(a, b));
            }
            let id = idx as EdgeId;
            vertices[a as usize].edges.push(id);
            vertices[b as usize].edges.push(id);
            edges.push(Edge {
                id,
                ends: [a, b],
                owner: None,
            });
        }

        let mut hexes = Vec::with_capacity(layout.hexes.len());
        let mut number_to_hexes: BTreeMap<u8, SmallVec<[HexId; 2]>> = BTreeMap::new();
        for (idx, spec) in layout.hexes.into_iter().enumerate() {
            let id = idx as HexId;
            if let Some(number) = spec.number {
                if pip_weight(number) == 0 {
                    return Err(BoardError::InvalidNumber { hex: idx, number });
                }
                number_to_hexes.entry(number).or_default().push(id);
            }
            for &vertex in &spec.vertices {
                let Some(entry) = vertices.get_mut(vertex as usize) else {
                    return Err(BoardError::HexVertexOutOfRange { hex: idx, vertex });
                };
                entry.hexes.push(id);
                if entry.hexes.len() > 3 {
                    return Err(BoardError::TooManyHexes {
                        vertex,
                        count: entry.hexes.len(),
                    });
                }
            }
            hexes.push(Hex {
                id,
                resource: spec.resource,
                number: spec.number,
                vertices: spec.vertices.into_iter().collect(),
                coord: spec.coord,
                has_block: false,
            });
        }

        let blocked = layout
            .blocked
            .or_else(|| hexes.iter().find(|h| h.resource.is_none()).map(|h| h.id))
            .unwrap_or(0);
        let Some(blocked_hex) = hexes.get_mut(blocked as usize) else {
            return Err(BoardError::BlockedOutOfRange(blocked));
        };
        blocked_hex.has_block = true;

        let board = Self {
            hexes,
            vertices,
            edges,
            number_to_hexes,
            blocked,
        };
        board.check_integrity()?;
        Ok(board)
    }

    /// Verifies bidirectional vertex/edge incidence, vertex degree and the
    /// single block stamp.
    pub fn check_integrity(&self) -> Result<(), BoardError> {
        for vertex in &self.vertices {
            let degree = vertex.edges.len();
            if !(2..=3).contains(&degree) {
                return Err(BoardError::VertexDegree {
                    vertex: vertex.id,
                    degree,
                });
            }
            for &edge in &vertex.edges {
                if !self.edge(edge).touches(vertex.id) {
                    return Err(BoardError::Incidence {
                        vertex: vertex.id,
                        edge,
                    });
                }
            }
        }
        for edge in &self.edges {
            for end in edge.ends {
                let Some(vertex) = self.vertices.get(end as usize) else {
                    return Err(BoardError::EdgeVertexOutOfRange {
                        edge: edge.id as usize,
                        vertex: end,
                    });
                };
                if !vertex.edges.contains(&edge.id) {
                    return Err(BoardError::Incidence {
                        vertex: end,
                        edge: edge.id,
                    });
                }
            }
        }
        let stamped: Vec<HexId> = self.hexes.iter().filter(|h| h.has_block).map(|h| h.id).collect();
        if stamped != [self.blocked] {
            return Err(BoardError::BlockStamp(self.blocked));
        }
        Ok(())
    }

    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains_hex(&self, hex: HexId) -> bool {
        (hex as usize) < self.hexes.len()
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        (vertex as usize) < self.vertices.len()
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        (edge as usize) < self.edges.len()
    }

    /// # Panics
    /// On an unknown hex id.
    pub fn hex(&self, hex: HexId) -> &Hex {
        &self.hexes[hex as usize]
    }

    /// # Panics
    /// On an unknown vertex id.
    pub fn vertex(&self, vertex: VertexId) -> &Vertex {
        &self.vertices[vertex as usize]
    }

    /// # Panics
    /// On an unknown edge id.
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge as usize]
    }

    pub fn edges_of(&self, vertex: VertexId) -> &[EdgeId] {
        &self.vertex(vertex).edges
    }

    pub fn hexes_of(&self, vertex: VertexId) -> &[HexId] {
        &self.vertex(vertex).hexes
    }

    /// # Panics
    /// If `vertex` is not an endpoint of `edge`.
    pub fn other_end(&self, edge: EdgeId, vertex: VertexId) -> VertexId {
        match self.edge(edge).ends {
            [a, b] if a == vertex => b,
            [a, b] if b == vertex => a,
            ends => panic!("vertex {vertex} is not an endpoint of edge {edge} {ends:?}"),
        }
    }

    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.edges_of(vertex)
            .iter()
            .map(move |&edge| self.other_end(edge, vertex))
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edges_of(a)
            .iter()
            .copied()
            .find(|&edge| self.other_end(edge, a) == b)
    }

    pub fn hexes_for_number(&self, number: u8) -> &[HexId] {
        self.number_to_hexes
            .get(&number)
            .map(|hexes| hexes.as_slice())
            .unwrap_or(&[])
    }

    /// Sum of the pip weights of every hex touching `vertex`.
    pub fn vertex_pip_score(&self, vertex: VertexId) -> u32 {
        self.hexes_of(vertex)
            .iter()
            .map(|&hex| self.hex(hex).number.map_or(0, pip_weight) as u32)
            .sum()
    }

    /// Distinct producing resources around `vertex`, in resource order.
    pub fn vertex_resources(&self, vertex: VertexId) -> BTreeSet<Resource> {
        self.hexes_of(vertex)
            .iter()
            .filter_map(|&hex| self.hex(hex).resource)
            .collect()
    }

    pub fn structure_at(&self, vertex: VertexId) -> Option<Structure> {
        self.vertex(vertex).structure
    }

    pub fn road_owner(&self, edge: EdgeId) -> Option<PlayerId> {
        self.edge(edge).owner
    }

    pub fn owns_vertex(&self, player: PlayerId, vertex: VertexId) -> bool {
        self.vertex(vertex).owner() == Some(player)
    }

    pub fn owns_edge(&self, player: PlayerId, edge: EdgeId) -> bool {
        self.edge(edge).owner == Some(player)
    }

    /// True when any vertex one edge away holds a structure.
    pub fn has_adjacent_structure(&self, vertex: VertexId) -> bool {
        self.neighbors(vertex)
            .any(|n| self.vertex(n).structure.is_some())
    }

    pub fn roads_of(&self, player: PlayerId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.owner == Some(player))
    }

    pub fn structures_of(&self, player: PlayerId) -> impl Iterator<Item = (VertexId, Tier)> + '_ {
        self.vertices.iter().filter_map(move |v| match v.structure {
            Some(s) if s.owner == player => Some((v.id, s.tier)),
            _ => None,
        })
    }

    pub fn blocked_hex(&self) -> HexId {
        self.blocked
    }

    /// Moves the block marker, clearing the stamp on the previous hex.
    pub fn move_block(&mut self, hex: HexId) {
        let previous = self.blocked;
        self.hexes[previous as usize].has_block = false;
        self.hexes[hex as usize].has_block = true;
        self.blocked = hex;
    }

    pub fn place_structure(&mut self, vertex: VertexId, structure: Structure) {
        self.vertices[vertex as usize].structure = Some(structure);
    }

    pub(crate) fn clear_structure(&mut self, vertex: VertexId) {
        self.vertices[vertex as usize].structure = None;
    }

    pub fn place_road(&mut self, edge: EdgeId, player: PlayerId) {
        self.edges[edge as usize].owner = Some(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn standard() -> BoardGraph {
        BoardGraph::standard(&mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn standard_board_shape() {
        let board = standard();
        assert_eq!(board.hexes().len(), 19);
        assert_eq!(board.vertices().len(), 54);
        assert_eq!(board.edges().len(), 72);
        assert!(board.vertices().iter().all(|v| (2..=3).contains(&v.edges.len())));
        assert!(board.vertices().iter().all(|v| (1..=3).contains(&v.hexes.len())));
        assert!(board.hexes().iter().all(|h| h.vertices.len() == 6));
    }

    #[test]
    fn block_marker_starts_on_desert() {
        let board = standard();
        let blocked = board.hex(board.blocked_hex());
        assert_eq!(blocked.resource, None);
        assert!(blocked.has_block);
        assert_eq!(board.hexes().iter().filter(|h| h.has_block).count(), 1);
    }

    #[test]
    fn move_block_restamps_both_hexes() {
        let mut board = standard();
        let before = board.blocked_hex();
        let target = (before + 1) % 19;
        board.move_block(target);
        assert!(!board.hex(before).has_block);
        assert!(board.hex(target).has_block);
        assert!(board.check_integrity().is_ok());
    }

    #[test]
    fn number_index_matches_hexes() {
        let board = standard();
        for hex in board.hexes() {
            if let Some(number) = hex.number {
                assert!(board.hexes_for_number(number).contains(&hex.id));
            }
        }
        assert!(board.hexes_for_number(7).is_empty());
    }

    #[test]
    fn pip_weights() {
        assert_eq!(pip_weight(2), 1);
        assert_eq!(pip_weight(6), 5);
        assert_eq!(pip_weight(8), 5);
        assert_eq!(pip_weight(12), 1);
        assert_eq!(pip_weight(7), 0);
        assert_eq!(pip_weight(0), 0);
        assert_eq!(pip_weight(13), 0);
    }

    #[test]
    fn rejects_duplicate_edges() {
        let layout = BoardLayout {
            vertex_count: 2,
            hexes: vec![HexLayout {
                resource: None,
                number: None,
                vertices: vec![0, 1],
                coord: None,
            }],
            edges: vec![(0, 1), (1, 0)],
            blocked: None,
        };
        assert_eq!(
            BoardGraph::from_layout(layout).unwrap_err(),
            BoardError::DuplicateEdge(1, 0)
        );
    }

    fn triangle_with(vertex_count: usize, extra: &[(VertexId, VertexId)]) -> BoardLayout {
        let mut edges = vec![(0, 1), (1, 2), (2, 0)];
        edges.extend_from_slice(extra);
        BoardLayout {
            vertex_count,
            hexes: vec![HexLayout {
                resource: Some(Resource::Ore),
                number: Some(8),
                vertices: vec![0, 1, 2],
                coord: None,
            }],
            edges,
            blocked: Some(0),
        }
    }

    #[test]
    fn accepts_a_closed_triangle() {
        assert!(BoardGraph::from_layout(triangle_with(3, &[])).is_ok());
    }

    #[test]
    fn rejects_isolated_vertex() {
        assert_eq!(
            BoardGraph::from_layout(triangle_with(4, &[])).unwrap_err(),
            BoardError::VertexDegree {
                vertex: 3,
                degree: 0
            }
        );
    }

    #[test]
    fn rejects_dead_end_vertex() {
        assert_eq!(
            BoardGraph::from_layout(triangle_with(4, &[(2, 3)])).unwrap_err(),
            BoardError::VertexDegree {
                vertex: 3,
                degree: 1
            }
        );
    }

    #[test]
    fn rejects_crowded_vertex() {
        let layout = triangle_with(5, &[(0, 3), (0, 4), (3, 4)]);
        assert_eq!(
            BoardGraph::from_layout(layout).unwrap_err(),
            BoardError::VertexDegree {
                vertex: 0,
                degree: 4
            }
        );
    }

    #[test]
    fn rejects_seven_token() {
        let layout = BoardLayout {
            vertex_count: 2,
            hexes: vec![HexLayout {
                resource: Some(Resource::Ore),
                number: Some(7),
                vertices: vec![0, 1],
                coord: None,
            }],
            edges: vec![(0, 1)],
            blocked: None,
        };
        assert!(matches!(
            BoardGraph::from_layout(layout),
            Err(BoardError::InvalidNumber { hex: 0, number: 7 })
        ));
    }
}
