//! Road planning over the board graph.
//!
//! Ownership is the weight: a player's own roads are free, open edges cost
//! one road, and edges owned by anyone else cannot be crossed.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::board::BoardGraph;
use crate::types::{EdgeId, PlayerId, Resource, VertexId};

/// Edges still to be built to reach `target`, in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadPlan {
    pub edges: Vec<EdgeId>,
    pub cost: u32,
    pub target: VertexId,
}

impl RoadPlan {
    pub fn first_edge(&self) -> Option<EdgeId> {
        self.edges.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    cost: u32,
    vertex: VertexId,
    seq: u32,
}

// BinaryHeap is a max-heap; reverse everything so the cheapest entry pops
// first, then the lowest vertex id, then the earliest push.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn step_cost(board: &BoardGraph, player: PlayerId, edge: EdgeId) -> Option<u32> {
    match board.road_owner(edge) {
        None => Some(1),
        Some(owner) if owner == player => Some(0),
        Some(_) => None,
    }
}

struct Dijkstra {
    dist: Vec<u32>,
    via: Vec<Option<EdgeId>>,
    reached: Option<VertexId>,
}

fn dijkstra(
    board: &BoardGraph,
    player: PlayerId,
    starts: &BTreeSet<VertexId>,
    targets: Option<&BTreeSet<VertexId>>,
) -> Dijkstra {
    let count = board.vertices().len();
    let mut dist = vec![u32::MAX; count];
    let mut via: Vec<Option<EdgeId>> = vec![None; count];
    let mut settled = vec![false; count];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u32;

    for &start in starts {
        dist[start as usize] = 0;
        heap.push(State {
            cost: 0,
            vertex: start,
            seq,
        });
        seq += 1;
    }

    while let Some(State { cost, vertex, .. }) = heap.pop() {
        if settled[vertex as usize] {
            continue;
        }
        settled[vertex as usize] = true;

        if targets.is_some_and(|t| t.contains(&vertex)) {
            return Dijkstra {
                dist,
                via,
                reached: Some(vertex),
            };
        }

        for &edge in board.edges_of(vertex) {
            let Some(step) = step_cost(board, player, edge) else {
                continue;
            };
            let next = board.other_end(edge, vertex);
            let candidate = cost + step;
            if candidate < dist[next as usize] {
                dist[next as usize] = candidate;
                via[next as usize] = Some(edge);
                heap.push(State {
                    cost: candidate,
                    vertex: next,
                    seq,
                });
                seq += 1;
            }
        }
    }

    Dijkstra {
        dist,
        via,
        reached: None,
    }
}

/// Cheapest road plan from any of `starts` to any of `targets`, or `None`
/// when every route crosses another player's road.
///
/// # Panics
/// On unknown vertex ids.
pub fn shortest_path(
    board: &BoardGraph,
    player: PlayerId,
    starts: &BTreeSet<VertexId>,
    targets: &BTreeSet<VertexId>,
) -> Option<RoadPlan> {
    let search = dijkstra(board, player, starts, Some(targets));
    let target = search.reached?;

    let mut edges = Vec::new();
    let mut cursor = target;
    while let Some(edge) = search.via[cursor as usize] {
        if !board.owns_edge(player, edge) {
            edges.push(edge);
        }
        cursor = board.other_end(edge, cursor);
    }
    edges.reverse();

    Some(RoadPlan {
        edges,
        cost: search.dist[target as usize],
        target,
    })
}

/// Road cost from `starts` to every reachable vertex.
pub fn distances(
    board: &BoardGraph,
    player: PlayerId,
    starts: &BTreeSet<VertexId>,
) -> BTreeMap<VertexId, u32> {
    let search = dijkstra(board, player, starts, None);
    search
        .dist
        .iter()
        .enumerate()
        .filter(|(_, d)| **d != u32::MAX)
        .map(|(v, d)| (v as VertexId, *d))
        .collect()
}

/// Every vertex reachable from the player's structures over the player's
/// own roads, structures included.
pub fn connected_vertices(board: &BoardGraph, player: PlayerId) -> BTreeSet<VertexId> {
    let mut connected: BTreeSet<VertexId> =
        board.structures_of(player).map(|(vertex, _)| vertex).collect();
    let mut queue: VecDeque<VertexId> = connected.iter().copied().collect();

    while let Some(vertex) = queue.pop_front() {
        for &edge in board.edges_of(vertex) {
            if !board.owns_edge(player, edge) {
                continue;
            }
            let next = board.other_end(edge, vertex);
            if connected.insert(next) {
                queue.push_back(next);
            }
        }
    }
    connected
}

/// Vertices touching at least one hex of `resource`.
pub fn vertices_with_resource(board: &BoardGraph, resource: Resource) -> BTreeSet<VertexId> {
    board
        .hexes()
        .iter()
        .filter(|hex| hex.resource == Some(resource))
        .flat_map(|hex| hex.vertices.iter().copied())
        .collect()
}

/// Plan from the player's network to the nearest open vertex on `resource`.
pub fn shortest_path_to_resource(
    board: &BoardGraph,
    player: PlayerId,
    resource: Resource,
) -> Option<RoadPlan> {
    let starts = connected_vertices(board, player);
    let targets: BTreeSet<VertexId> = vertices_with_resource(board, resource)
        .into_iter()
        .filter(|&v| board.structure_at(v).is_none())
        .collect();
    if starts.is_empty() || targets.is_empty() {
        return None;
    }
    shortest_path(board, player, &starts, &targets)
}

/// The next road to build on the way to the closest of `targets`.
pub fn best_road_toward(
    board: &BoardGraph,
    player: PlayerId,
    targets: &BTreeSet<VertexId>,
) -> Option<EdgeId> {
    let starts = connected_vertices(board, player);
    if starts.is_empty() {
        return None;
    }
    shortest_path(board, player, &starts, targets)?.first_edge()
}

/// Any open edge leaving the player's network towards an empty vertex.
pub fn frontier_road(board: &BoardGraph, player: PlayerId) -> Option<EdgeId> {
    connected_vertices(board, player).into_iter().find_map(|vertex| {
        board.edges_of(vertex).iter().copied().find(|&edge| {
            board.road_owner(edge).is_none()
                && board.structure_at(board.other_end(edge, vertex)).is_none()
        })
    })
}
