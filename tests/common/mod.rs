//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;

use settlers_core::game::{GameConfig, GameState, PlayerSpec};
use settlers_core::types::{Color, EdgeId, VertexId};

pub fn specs(count: usize) -> Vec<PlayerSpec> {
    Color::ORDERED
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, &color)| PlayerSpec::cpu(format!("cpu{i}"), color))
        .collect()
}

/// A three-seat game in fixed order 0, 1, 2, waiting for placements.
pub fn seated(seed: u64) -> GameState {
    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };
    let mut state = GameState::new(config, specs(3)).expect("valid setup");
    state.fix_turn_order(vec![0, 1, 2]).expect("valid order");
    state
}

/// Walks `steps` edges from `start`, always taking the lowest unvisited
/// neighbour. Returns the visited vertices.
pub fn simple_path(state: &GameState, start: VertexId, steps: usize) -> Vec<VertexId> {
    let mut path = vec![start];
    while path.len() <= steps {
        let here = *path.last().expect("non-empty path");
        let next = state
            .board
            .neighbors(here)
            .filter(|v| !path.contains(v))
            .min()
            .expect("hex lattice has no short cycles");
        path.push(next);
    }
    path
}

pub fn edge(state: &GameState, a: VertexId, b: VertexId) -> EdgeId {
    state.board.edge_between(a, b).expect("adjacent vertices")
}

/// Places the current seat's initial pieces somewhere outside `avoid` and
/// its neighbourhood.
pub fn place_away(state: &mut GameState, avoid: &[VertexId]) {
    let mut near: BTreeSet<VertexId> = avoid.iter().copied().collect();
    for &v in avoid {
        near.extend(state.board.neighbors(v));
    }
    let vertex = state
        .legal_initial_vertices()
        .into_iter()
        .find(|v| !near.contains(v))
        .expect("open vertex far from the path");
    let road = state.board.edges_of(vertex)[0];
    let outcome = state
        .attempt_initial_placement(vertex, road)
        .expect("known ids");
    assert!(outcome.is_applied(), "{}", outcome.reason());
}

/// Seat 0 settles on `path[0]` and `path[2]` with roads toward `path[1]`
/// and `path[3]`; the other seats place clear of the path. Returns the
/// state in main play with seat 0 to move.
pub fn placed_along_path(seed: u64, steps: usize) -> (GameState, Vec<VertexId>) {
    let mut state = seated(seed);
    let path = simple_path(&state, 0, steps);
    let outcome = state
        .attempt_initial_placement(path[0], edge(&state, path[0], path[1]))
        .expect("known ids");
    assert!(outcome.is_applied(), "{}", outcome.reason());
    place_away(&mut state, &path);
    place_away(&mut state, &path);
    place_away(&mut state, &path);
    place_away(&mut state, &path);
    let outcome = state
        .attempt_initial_placement(path[2], edge(&state, path[2], path[3]))
        .expect("known ids");
    assert!(outcome.is_applied(), "{}", outcome.reason());
    assert_eq!(state.current_player(), 0);
    (state, path)
}
