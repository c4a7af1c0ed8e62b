//! Topology checks on the standard board.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use settlers_core::board::{BoardGraph, pip_weight};

fn standard(seed: u64) -> BoardGraph {
    BoardGraph::standard(&mut StdRng::seed_from_u64(seed)).expect("standard layout")
}

#[test]
fn pip_weight_is_symmetric_around_seven() {
    for number in 2..=12u8 {
        assert_eq!(pip_weight(number), pip_weight(14 - number));
    }
    assert_eq!(pip_weight(7), 0);
    assert_eq!(pip_weight(6), 5);
}

proptest! {
    #[test]
    fn adjacency_is_symmetric(seed in any::<u64>(), raw in 0usize..54) {
        let board = standard(seed);
        let vertex = raw as u16;
        for neighbour in board.neighbors(vertex) {
            prop_assert!(board.neighbors(neighbour).any(|v| v == vertex));
        }
    }

    #[test]
    fn one_edge_per_adjacent_pair(seed in any::<u64>(), raw in 0usize..54) {
        let board = standard(seed);
        let vertex = raw as u16;
        for neighbour in board.neighbors(vertex) {
            let shared = board
                .edges_of(vertex)
                .iter()
                .filter(|&&edge| board.edge(edge).touches(neighbour))
                .count();
            prop_assert_eq!(shared, 1);
            prop_assert_eq!(board.edge_between(vertex, neighbour), board.edge_between(neighbour, vertex));
        }
    }

    #[test]
    fn shuffles_keep_one_desert_under_the_marker(seed in any::<u64>()) {
        let board = standard(seed);
        prop_assert!(board.check_integrity().is_ok());
        let blocked = board.hex(board.blocked_hex());
        prop_assert_eq!(blocked.resource, None);
        prop_assert_eq!(blocked.number, None);
        for number in 2..=12u8 {
            for &hex in board.hexes_for_number(number) {
                prop_assert_eq!(board.hex(hex).number, Some(number));
            }
        }
    }

    #[test]
    fn vertex_degree_stays_between_two_and_three(seed in any::<u64>(), raw in 0usize..54) {
        let board = standard(seed);
        let degree = board.edges_of(raw as u16).len();
        prop_assert!((2..=3).contains(&degree));
    }
}
