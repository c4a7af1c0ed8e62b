//! Decision scenarios for the heuristic CPU against a scripted rules double.

use std::collections::{BTreeSet, HashMap};

use settlers_core::game::{ActionPayload, ResourceBundle};
use settlers_core::players::{
    BankTradeOption, BlockMove, CpuPlayer, CpuWeights, ResourceProfile, RulesAdapter, Stage,
};
use settlers_core::types::{ActionKind, EdgeId, HexId, PlayerId, Resource, VertexId};

struct FakeRules {
    stage: Stage,
    hand: ResourceBundle,
    profile: ResourceProfile,
    scarcity: ResourceProfile,
    settlements: Vec<VertexId>,
    roads: Vec<EdgeId>,
    upgrades: Vec<VertexId>,
    can_buy_dev: bool,
    trades: Vec<BankTradeOption>,
    blocks: Vec<BlockMove>,
    pips: HashMap<VertexId, f64>,
    resources_at: HashMap<VertexId, Vec<Resource>>,
    towards: HashMap<EdgeId, f64>,
    longest: HashMap<EdgeId, f64>,
    trade_enables_win: bool,
}

impl Default for FakeRules {
    fn default() -> Self {
        Self {
            stage: Stage::Early,
            hand: ResourceBundle::zero(),
            profile: ResourceProfile::new([0.5; 5]),
            scarcity: ResourceProfile::default(),
            settlements: Vec::new(),
            roads: Vec::new(),
            upgrades: Vec::new(),
            can_buy_dev: false,
            trades: Vec::new(),
            blocks: Vec::new(),
            pips: HashMap::new(),
            resources_at: HashMap::new(),
            towards: HashMap::new(),
            longest: HashMap::new(),
            trade_enables_win: false,
        }
    }
}

impl RulesAdapter for FakeRules {
    fn current_player(&self) -> PlayerId {
        1
    }

    fn opponents(&self) -> Vec<PlayerId> {
        vec![2, 3]
    }

    fn visible_victory_points(&self, _player: PlayerId) -> u32 {
        2
    }

    fn estimated_hidden_vp(&self, _player: PlayerId) -> f64 {
        0.0
    }

    fn game_stage(&self) -> Stage {
        self.stage
    }

    fn player_resources(&self, _player: PlayerId) -> ResourceBundle {
        self.hand
    }

    fn resource_production_profile(&self, _player: PlayerId) -> ResourceProfile {
        self.profile
    }

    fn board_resource_scarcity(&self) -> ResourceProfile {
        self.scarcity
    }

    fn legal_settlement_vertices(&self, _player: PlayerId) -> Vec<VertexId> {
        self.settlements.clone()
    }

    fn legal_road_edges(&self, _player: PlayerId) -> Vec<EdgeId> {
        self.roads.clone()
    }

    fn upgradeable_vertices(&self, _player: PlayerId) -> Vec<VertexId> {
        self.upgrades.clone()
    }

    fn can_buy_dev_card(&self, _player: PlayerId) -> bool {
        self.can_buy_dev
    }

    fn bank_trade_options(&self, _player: PlayerId) -> Vec<BankTradeOption> {
        self.trades.clone()
    }

    fn block_moves(&self, _player: PlayerId) -> Vec<BlockMove> {
        self.blocks.clone()
    }

    fn vertex_pip(&self, vertex: VertexId) -> f64 {
        self.pips.get(&vertex).copied().unwrap_or(0.0)
    }

    fn vertex_resource_set(&self, vertex: VertexId) -> BTreeSet<Resource> {
        self.resources_at
            .get(&vertex)
            .map(|list| list.iter().copied().collect())
            .unwrap_or_default()
    }

    fn road_expands_towards_value(&self, edge: EdgeId) -> f64 {
        self.towards.get(&edge).copied().unwrap_or(0.0)
    }

    fn road_contributes_longest(&self, _player: PlayerId, edge: EdgeId) -> f64 {
        self.longest.get(&edge).copied().unwrap_or(0.0)
    }

    fn settlement_blocks_opponent_value(&self, _vertex: VertexId) -> f64 {
        0.0
    }

    fn block_touches_player(&self, _player: PlayerId, _hex: HexId) -> bool {
        false
    }

    fn would_trade_enable_opponent_win(&self, _: PlayerId, _: Resource, _: Resource, _: u8) -> bool {
        self.trade_enables_win
    }
}

fn decide(rules: &FakeRules) -> (ActionKind, ActionPayload) {
    let weights = CpuWeights::default();
    let choice = CpuPlayer::new(rules, &weights).choose_action();
    (choice.action.kind, choice.action.payload)
}

fn trade(give: Resource, get: Resource) -> BankTradeOption {
    BankTradeOption { give, get, rate: 4 }
}

#[test]
fn early_settlement_beats_development_card() {
    let rules = FakeRules {
        settlements: vec![1],
        pips: HashMap::from([(1, 8.0)]),
        resources_at: HashMap::from([(1, vec![Resource::Brick, Resource::Wood, Resource::Wheat])]),
        can_buy_dev: true,
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildSettlement, ActionPayload::Vertex(1)));
}

#[test]
fn early_settlement_prefers_high_pip() {
    let rules = FakeRules {
        settlements: vec![1, 2],
        pips: HashMap::from([(1, 4.0), (2, 10.0)]),
        resources_at: HashMap::from([
            (1, vec![Resource::Brick, Resource::Wood]),
            (2, vec![Resource::Brick, Resource::Wood]),
        ]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildSettlement, ActionPayload::Vertex(2)));
}

#[test]
fn early_settlement_prefers_diversity() {
    let rules = FakeRules {
        settlements: vec![1, 2],
        pips: HashMap::from([(1, 6.0), (2, 6.0)]),
        resources_at: HashMap::from([
            (1, vec![Resource::Brick]),
            (2, vec![Resource::Brick, Resource::Wood]),
        ]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildSettlement, ActionPayload::Vertex(2)));
}

#[test]
fn trade_that_hands_an_opponent_the_win_is_avoided() {
    let rules = FakeRules {
        stage: Stage::Mid,
        trades: vec![trade(Resource::Brick, Resource::Wheat)],
        trade_enables_win: true,
        settlements: vec![1],
        pips: HashMap::from([(1, 7.0)]),
        resources_at: HashMap::from([(1, vec![Resource::Brick, Resource::Wheat])]),
        ..FakeRules::default()
    };
    let weights = CpuWeights::default();
    let cpu = CpuPlayer::new(&rules, &weights);
    let scored = cpu.score_all();
    let trade_score = scored
        .iter()
        .find(|s| s.action.kind == ActionKind::BankTrade)
        .map(|s| s.score)
        .unwrap();
    assert_eq!(trade_score, -1000.0);
    let chosen = cpu.choose_action();
    assert_eq!(chosen.action.kind, ActionKind::BuildSettlement);
    assert!((chosen.score - 13.7).abs() < 1e-9);
}

#[test]
fn winning_trade_loses_even_to_passing() {
    let rules = FakeRules {
        stage: Stage::Mid,
        hand: ResourceBundle::single(Resource::Ore, 8),
        trades: vec![trade(Resource::Ore, Resource::Brick), trade(Resource::Ore, Resource::Wood)],
        trade_enables_win: true,
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::Pass, ActionPayload::None));
}

#[test]
fn late_game_road_with_reach_and_length_wins() {
    let rules = FakeRules {
        stage: Stage::Late,
        roads: vec![11, 22],
        towards: HashMap::from([(11, 5.0), (22, 1.0)]),
        longest: HashMap::from([(11, 2.0), (22, 0.0)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildRoad, ActionPayload::Edge(11)));
}

#[test]
fn block_move_prefers_a_hex_with_a_victim() {
    let rules = FakeRules {
        stage: Stage::Late,
        blocks: vec![
            BlockMove { hex: 101, victim: None },
            BlockMove { hex: 202, victim: Some(2) },
        ],
        ..FakeRules::default()
    };
    assert_eq!(
        decide(&rules),
        (
            ActionKind::MoveBlock,
            ActionPayload::Block {
                hex: 202,
                victim: Some(2)
            }
        )
    );
}

#[test]
fn city_goes_on_the_richest_vertex() {
    let rules = FakeRules {
        stage: Stage::Mid,
        upgrades: vec![5, 6],
        pips: HashMap::from([(5, 7.0), (6, 11.0)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildCity, ActionPayload::Vertex(6)));
}

#[test]
fn longest_road_gain_breaks_equal_reach() {
    let rules = FakeRules {
        stage: Stage::Mid,
        roads: vec![1, 2],
        towards: HashMap::from([(1, 1.0), (2, 1.0)]),
        longest: HashMap::from([(1, 0.0), (2, 4.0)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildRoad, ActionPayload::Edge(2)));
}

#[test]
fn bank_trade_turns_surplus_into_scarce_resource() {
    let mut profile = ResourceProfile::new([0.3; 5]);
    profile.set(Resource::Ore, 2.0);
    let mut scarcity = ResourceProfile::default();
    scarcity.set(Resource::Brick, 2.0);
    scarcity.set(Resource::Sheep, 0.5);
    let rules = FakeRules {
        stage: Stage::Mid,
        hand: ResourceBundle::single(Resource::Ore, 5),
        profile,
        scarcity,
        trades: vec![trade(Resource::Ore, Resource::Brick), trade(Resource::Ore, Resource::Sheep)],
        ..FakeRules::default()
    };
    let weights = CpuWeights::default();
    let cpu = CpuPlayer::new(&rules, &weights);
    let scores: Vec<f64> = cpu
        .score_all()
        .into_iter()
        .filter(|s| s.action.kind == ActionKind::BankTrade)
        .map(|s| s.score)
        .collect();
    assert!((scores[0] - 5.425).abs() < 1e-9, "brick trade scored {}", scores[0]);
    assert!((scores[1] - 3.341_666_666_666_667).abs() < 1e-9, "sheep trade scored {}", scores[1]);

    let chosen = cpu.choose_action().action;
    assert_eq!(
        chosen.payload,
        ActionPayload::BankTrade {
            give: Resource::Ore,
            get: Resource::Brick,
            rate: 4
        }
    );
}

#[test]
fn any_real_action_beats_passing() {
    let rules = FakeRules {
        settlements: vec![9],
        pips: HashMap::from([(9, 5.0)]),
        resources_at: HashMap::from([(9, vec![Resource::Brick, Resource::Wood])]),
        ..FakeRules::default()
    };
    assert_ne!(decide(&rules).0, ActionKind::Pass);
}

#[test]
fn pass_when_nothing_is_legal() {
    let rules = FakeRules {
        stage: Stage::Mid,
        ..FakeRules::default()
    };
    let weights = CpuWeights::default();
    let chosen = CpuPlayer::new(&rules, &weights).choose_action();
    assert_eq!(chosen.action.kind, ActionKind::Pass);
    assert_eq!(chosen.score, -0.8);
}

#[test]
fn mid_game_city_beats_development_and_road() {
    let rules = FakeRules {
        stage: Stage::Mid,
        can_buy_dev: true,
        roads: vec![1],
        upgrades: vec![4],
        pips: HashMap::from([(4, 8.0)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildCity, ActionPayload::Vertex(4)));
}

#[test]
fn late_block_move_beats_a_minor_road() {
    let rules = FakeRules {
        stage: Stage::Late,
        blocks: vec![BlockMove { hex: 300, victim: Some(2) }],
        roads: vec![7],
        towards: HashMap::from([(7, 0.1)]),
        ..FakeRules::default()
    };
    let (kind, payload) = decide(&rules);
    assert_eq!(kind, ActionKind::MoveBlock);
    assert!(matches!(payload, ActionPayload::Block { hex: 300, .. }));
}

#[test]
fn equal_scores_keep_the_first_candidate() {
    let rules = FakeRules {
        settlements: vec![3, 1, 2],
        pips: HashMap::from([(1, 6.0), (2, 6.0), (3, 6.0)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildSettlement, ActionPayload::Vertex(3)));
}

#[test]
fn unscorable_candidates_never_win() {
    let rules = FakeRules {
        settlements: vec![3, 5, 7],
        pips: HashMap::from([(3, f64::NAN), (5, 4.0), (7, f64::NAN)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&rules), (ActionKind::BuildSettlement, ActionPayload::Vertex(5)));

    let only_nan = FakeRules {
        settlements: vec![3],
        pips: HashMap::from([(3, f64::NAN)]),
        ..FakeRules::default()
    };
    assert_eq!(decide(&only_nan).0, ActionKind::Pass);
}
