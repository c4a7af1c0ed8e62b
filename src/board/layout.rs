use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::coords::{CubeCoord, Direction, spiral};
use crate::types::{HexId, Resource, VertexId};

/// Description of one hex before the graph is assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexLayout {
    pub resource: Option<Resource>,
    pub number: Option<u8>,
    pub vertices: Vec<VertexId>,
    pub coord: Option<CubeCoord>,
}

/// Raw board description consumed by [`super::BoardGraph::from_layout`].
///
/// Vertices are identified by `0..vertex_count`; edges by their position in
/// `edges`; hexes by their position in `hexes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardLayout {
    pub vertex_count: usize,
    pub hexes: Vec<HexLayout>,
    pub edges: Vec<(VertexId, VertexId)>,
    /// Hex holding the block marker. Defaults to the first non-producing hex.
    pub blocked: Option<HexId>,
}

const NUMBER_TOKENS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

const TILE_RESOURCES: [Option<Resource>; 19] = [
    Some(Resource::Wood),
    Some(Resource::Wood),
    Some(Resource::Wood),
    Some(Resource::Wood),
    Some(Resource::Brick),
    Some(Resource::Brick),
    Some(Resource::Brick),
    Some(Resource::Sheep),
    Some(Resource::Sheep),
    Some(Resource::Sheep),
    Some(Resource::Sheep),
    Some(Resource::Wheat),
    Some(Resource::Wheat),
    Some(Resource::Wheat),
    Some(Resource::Wheat),
    Some(Resource::Ore),
    Some(Resource::Ore),
    Some(Resource::Ore),
    None,
];

impl BoardLayout {
    /// The 19-hex board with resources and number tokens shuffled by `rng`.
    pub fn standard(rng: &mut impl rand::Rng) -> Self {
        let mut resources = TILE_RESOURCES.to_vec();
        resources.shuffle(rng);
        let mut numbers = NUMBER_TOKENS.to_vec();
        numbers.shuffle(rng);

        Self::from_assignment(&STANDARD_TOPOLOGY, &resources, &numbers)
    }

    /// The 19-hex board with a fixed assignment. `resources` is read in hex
    /// order; `numbers` are handed out in order to the producing hexes.
    pub fn standard_with(resources: &[Option<Resource>], numbers: &[u8]) -> Self {
        Self::from_assignment(&STANDARD_TOPOLOGY, resources, numbers)
    }

    fn from_assignment(topology: &Topology, resources: &[Option<Resource>], numbers: &[u8]) -> Self {
        let mut tokens = numbers.iter().copied();
        let hexes = topology
            .corners
            .iter()
            .zip(&topology.coords)
            .enumerate()
            .map(|(idx, (corners, coord))| {
                let resource = resources.get(idx).copied().flatten();
                let number = resource.and_then(|_| tokens.next());
                HexLayout {
                    resource,
                    number,
                    vertices: corners.to_vec(),
                    coord: Some(*coord),
                }
            })
            .collect();

        Self {
            vertex_count: topology.vertex_count,
            hexes,
            edges: topology.edges.clone(),
            blocked: None,
        }
    }
}

#[cfg(test)]
impl BoardLayout {
    /// Hangs a triangle of two fresh vertices off every dead end so small
    /// hand-built paths pass the degree check. Existing ids are unchanged.
    pub(crate) fn close_dead_ends(mut self) -> Self {
        let mut degree = vec![0usize; self.vertex_count];
        for &(a, b) in &self.edges {
            degree[a as usize] += 1;
            degree[b as usize] += 1;
        }
        for (vertex, _) in degree.into_iter().enumerate().filter(|&(_, d)| d == 1) {
            let end = vertex as VertexId;
            let a = self.vertex_count as VertexId;
            let b = a + 1;
            self.vertex_count += 2;
            self.edges.extend([(end, a), (a, b), (b, end)]);
        }
        self
    }
}

struct Topology {
    coords: Vec<CubeCoord>,
    corners: Vec<[VertexId; 6]>,
    edges: Vec<(VertexId, VertexId)>,
    vertex_count: usize,
}

static STANDARD_TOPOLOGY: Lazy<Topology> = Lazy::new(|| build_topology(spiral(2)));

// Corners are numbered N, NE, SE, S, SW, NW. The side facing `Direction::ALL[d]`
// joins corners d+1 and d+2; the neighbour across it sees the same corners as
// its d+5 and d+4.
fn build_topology(coords: Vec<CubeCoord>) -> Topology {
    let mut placed: HashMap<CubeCoord, usize> = HashMap::new();
    let mut corners: Vec<[VertexId; 6]> = Vec::with_capacity(coords.len());
    let mut sides: Vec<[usize; 6]> = Vec::with_capacity(coords.len());
    let mut edges: Vec<(VertexId, VertexId)> = Vec::new();
    let mut next_vertex: VertexId = 0;

    for (tile, coord) in coords.iter().enumerate() {
        let mut shared_corners: [Option<VertexId>; 6] = [None; 6];
        let mut shared_sides: [Option<usize>; 6] = [None; 6];

        for (d, direction) in Direction::ALL.iter().enumerate() {
            let Some(&neighbor) = placed.get(&coord.neighbor(*direction)) else {
                continue;
            };
            shared_sides[d] = Some(sides[neighbor][(d + 3) % 6]);
            shared_corners[(d + 1) % 6] = Some(corners[neighbor][(d + 5) % 6]);
            shared_corners[(d + 2) % 6] = Some(corners[neighbor][(d + 4) % 6]);
        }

        let tile_corners = shared_corners.map(|slot| {
            slot.unwrap_or_else(|| {
                let id = next_vertex;
                next_vertex += 1;
                id
            })
        });
        let tile_sides = std::array::from_fn(|d| {
            shared_sides[d].unwrap_or_else(|| {
                edges.push((tile_corners[(d + 1) % 6], tile_corners[(d + 2) % 6]));
                edges.len() - 1
            })
        });

        corners.push(tile_corners);
        sides.push(tile_sides);
        placed.insert(*coord, tile);
    }

    Topology {
        coords,
        corners,
        edges,
        vertex_count: next_vertex as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_dead_ends_keeps_existing_ids() {
        let layout = BoardLayout {
            vertex_count: 3,
            hexes: Vec::new(),
            edges: vec![(0, 1), (1, 2)],
            blocked: None,
        }
        .close_dead_ends();
        assert_eq!(layout.vertex_count, 7);
        assert_eq!(&layout.edges[..2], &[(0, 1), (1, 2)]);
        assert_eq!(&layout.edges[2..5], &[(0, 3), (3, 4), (4, 0)]);
        assert_eq!(&layout.edges[5..], &[(2, 5), (5, 6), (6, 2)]);
    }

    #[test]
    fn standard_topology_counts() {
        let topology = &*STANDARD_TOPOLOGY;
        assert_eq!(topology.coords.len(), 19);
        assert_eq!(topology.vertex_count, 54);
        assert_eq!(topology.edges.len(), 72);
    }

    #[test]
    fn desert_gets_no_number() {
        let mut resources = TILE_RESOURCES.to_vec();
        resources.rotate_right(1);
        let layout = BoardLayout::standard_with(&resources, &NUMBER_TOKENS);
        assert_eq!(layout.hexes[0].resource, None);
        assert_eq!(layout.hexes[0].number, None);
        assert_eq!(layout.hexes[1].number, Some(2));
        assert_eq!(layout.hexes.iter().filter(|h| h.number.is_some()).count(), 18);
    }
}
