use std::collections::BTreeSet;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    board::{BoardError, BoardGraph, Structure},
    engine::{DiceReport, DisruptionPolicy, Table, TurnEngine},
    rules::{self, Verdict, Violation},
    search,
    types::{ActionKind, DevelopmentCard, EdgeId, HexId, PlayerId, Resource, Tier, VertexId},
};

use super::{
    bank::Bank,
    longest_road::{self, HolderChange},
    phase::{Placement, TurnCursor, TurnPhase, roll_turn_order},
    players::{PlayerSpec, PlayerState},
    resources::{
        COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, ResourceBundle, ResourceError,
    },
};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub vps_to_win: u8,
    pub seed: u64,
    /// Players holding more cards than this discard half on a seven.
    pub discard_threshold: u32,
    pub bank_trade_rate: u8,
    pub max_cpu_actions_per_turn: usize,
    pub turn_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            vps_to_win: 10,
            seed: 42,
            discard_threshold: 7,
            bank_trade_rate: 4,
            max_cpu_actions_per_turn: 12,
            turn_limit: 1000,
        }
    }
}

/// Programmer and integrity errors. Rule violations are reported through
/// [`Outcome::Rejected`] instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
    #[error("unknown hex {0}")]
    UnknownHex(HexId),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("dice total {0} is outside 2..=12")]
    InvalidRoll(u8),
    #[error("policy chose player {0}, who is not an eligible victim")]
    InvalidVictim(PlayerId),
    #[error("invalid game setup: {0}")]
    InvalidSetup(String),
    #[error("turn order {0:?} is not a permutation of the seats")]
    InvalidTurnOrder(Vec<PlayerId>),
    #[error("payload does not fit a {0} action")]
    InvalidPayload(ActionKind),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Result of a command that passed identifier checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = String> {
    Applied(T),
    Rejected(Violation),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Outcome::Rejected(violation) => Some(violation),
            Outcome::Applied(_) => None,
        }
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }
}

impl Outcome<String> {
    /// The success message or the rejection reason.
    pub fn reason(&self) -> String {
        match self {
            Outcome::Applied(message) => message.clone(),
            Outcome::Rejected(violation) => violation.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub board: BoardGraph,
    pub players: Vec<PlayerState>,
    pub bank: Bank,
    pub phase: TurnPhase,
    pub cursor: TurnCursor,
    pub placements: Vec<Placement>,
    pub turn: u32,
    pub last_roll: Option<u8>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig, specs: Vec<PlayerSpec>) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&specs.len()) {
            return Err(GameError::InvalidSetup(format!(
                "expected {MIN_PLAYERS}-{MAX_PLAYERS} players, got {}",
                specs.len()
            )));
        }
        let colors: BTreeSet<_> = specs.iter().map(|spec| spec.color).collect();
        if colors.len() != specs.len() {
            return Err(GameError::InvalidSetup("player colors must be unique".into()));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = BoardGraph::standard(&mut rng)?;
        let bank = Bank::standard(&mut rng);
        let players: Vec<PlayerState> = specs
            .into_iter()
            .enumerate()
            .map(|(id, spec)| PlayerState::new(id, spec))
            .collect();
        let cursor = TurnCursor::new((0..players.len()).collect());
        info!(players = players.len(), seed = config.seed, "game created");

        Ok(Self {
            config,
            board,
            players,
            bank,
            phase: TurnPhase::DeterminingOrder,
            cursor,
            placements: Vec::new(),
            turn: 0,
            last_roll: None,
            rng,
        })
    }

    // Turn order

    /// Rolls for seating and opens the first placement round.
    pub fn determine_turn_order(&mut self) -> Outcome<Vec<PlayerId>> {
        if self.phase != TurnPhase::DeterminingOrder {
            return Outcome::Rejected(Violation::WrongPhase(self.phase.to_string()));
        }
        let order = roll_turn_order(self.players.len(), &mut self.rng);
        self.install_order(order.clone());
        Outcome::Applied(order)
    }

    /// Installs an explicit seating for deterministic callers.
    pub fn fix_turn_order(&mut self, order: Vec<PlayerId>) -> Result<(), GameError> {
        if self.phase != TurnPhase::DeterminingOrder {
            return Err(GameError::InvalidSetup("turn order is already fixed".into()));
        }
        let mut sorted = order.clone();
        sorted.sort_unstable();
        if !sorted.iter().copied().eq(0..self.players.len()) {
            return Err(GameError::InvalidTurnOrder(order));
        }
        self.install_order(order);
        Ok(())
    }

    fn install_order(&mut self, order: Vec<PlayerId>) {
        info!(?order, "turn order decided");
        self.cursor = TurnCursor::new(order);
        self.phase = TurnPhase::FirstRound;
    }

    // Queries

    pub fn current_player(&self) -> PlayerId {
        self.cursor.current()
    }

    pub fn player(&self, player: PlayerId) -> Result<&PlayerState, GameError> {
        self.players.get(player).ok_or(GameError::UnknownPlayer(player))
    }

    pub fn victory_points(&self, player: PlayerId) -> Result<u8, GameError> {
        Ok(self.player(player)?.total_points())
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn connected_vertices(&self, player: PlayerId) -> Result<BTreeSet<VertexId>, GameError> {
        self.player(player)?;
        Ok(search::connected_vertices(&self.board, player))
    }

    pub fn check_road(&self, player: PlayerId, edge: EdgeId) -> Result<Verdict, GameError> {
        self.ensure_edge(edge)?;
        Ok(rules::can_build_road(&self.board, self.player(player)?, edge))
    }

    pub fn check_settlement(&self, player: PlayerId, vertex: VertexId) -> Result<Verdict, GameError> {
        self.ensure_vertex(vertex)?;
        Ok(rules::can_build_settlement(&self.board, self.player(player)?, vertex))
    }

    pub fn check_city(&self, player: PlayerId, vertex: VertexId) -> Result<Verdict, GameError> {
        self.ensure_vertex(vertex)?;
        Ok(rules::can_upgrade_city(&self.board, self.player(player)?, vertex))
    }

    /// Vertices where `player` may build a settlement right now.
    pub fn legal_settlement_vertices(&self, player: PlayerId) -> Vec<VertexId> {
        let Some(state) = self.players.get(player) else {
            return Vec::new();
        };
        self.board
            .vertices()
            .iter()
            .map(|v| v.id)
            .filter(|&v| rules::can_build_settlement(&self.board, state, v).is_ok())
            .collect()
    }

    pub fn legal_road_edges(&self, player: PlayerId) -> Vec<EdgeId> {
        let Some(state) = self.players.get(player) else {
            return Vec::new();
        };
        self.board
            .edges()
            .iter()
            .map(|e| e.id)
            .filter(|&e| rules::can_build_road(&self.board, state, e).is_ok())
            .collect()
    }

    pub fn upgradeable_vertices(&self, player: PlayerId) -> Vec<VertexId> {
        let Some(state) = self.players.get(player) else {
            return Vec::new();
        };
        self.board
            .structures_of(player)
            .map(|(v, _)| v)
            .filter(|&v| rules::can_upgrade_city(&self.board, state, v).is_ok())
            .collect()
    }

    /// Vertices open for an initial settlement.
    pub fn legal_initial_vertices(&self) -> Vec<VertexId> {
        self.board
            .vertices()
            .iter()
            .map(|v| v.id)
            .filter(|&v| rules::can_place_initial_settlement(&self.board, v).is_ok())
            .collect()
    }

    // Commands

    fn ensure_vertex(&self, vertex: VertexId) -> Result<(), GameError> {
        if self.board.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(GameError::UnknownVertex(vertex))
        }
    }

    fn ensure_edge(&self, edge: EdgeId) -> Result<(), GameError> {
        if self.board.contains_edge(edge) {
            Ok(())
        } else {
            Err(GameError::UnknownEdge(edge))
        }
    }

    /// Main-play commands only run in main play.
    fn main_play_gate(&self) -> Verdict {
        match self.phase {
            TurnPhase::MainPlay => Ok(()),
            TurnPhase::GameOver { .. } => Err(Violation::GameOver),
            other => Err(Violation::WrongPhase(other.to_string())),
        }
    }

    fn reject<T>(&self, command: &str, violation: Violation) -> Result<Outcome<T>, GameError> {
        debug!(
            player = self.current_player(),
            command,
            reason = %violation,
            "command rejected"
        );
        Ok(Outcome::Rejected(violation))
    }

    pub fn attempt_initial_placement(
        &mut self,
        vertex: VertexId,
        edge: EdgeId,
    ) -> Result<Outcome, GameError> {
        self.ensure_vertex(vertex)?;
        self.ensure_edge(edge)?;
        if self.is_over() {
            return self.reject("initial-placement", Violation::GameOver);
        }
        if !self.phase.is_placement() {
            return self.reject(
                "initial-placement",
                Violation::WrongPhase(self.phase.to_string()),
            );
        }
        if let Err(violation) = rules::can_place_initial_settlement(&self.board, vertex) {
            return self.reject("initial-placement", violation);
        }

        let player = self.current_player();
        self.board.place_structure(
            vertex,
            Structure {
                owner: player,
                tier: Tier::Settlement,
            },
        );
        self.players[player].inventory.settlements -= 1;
        self.players[player].victory_points += 1;

        if let Err(violation) = rules::can_place_initial_road(&self.board, vertex, edge) {
            self.board.clear_structure(vertex);
            self.players[player].inventory.settlements += 1;
            self.players[player].victory_points -= 1;
            return self.reject("initial-placement", violation);
        }
        self.board.place_road(edge, player);
        self.players[player].inventory.roads -= 1;
        self.placements.push(Placement {
            player,
            vertex,
            edge,
        });
        info!(player, vertex, edge, phase = %self.phase, "initial placement");

        let finished_round = self.phase;
        self.phase = self.cursor.advance(finished_round);
        self.refresh_longest_road();
        if finished_round == TurnPhase::SecondRound && self.phase == TurnPhase::MainPlay {
            self.distribute_initial_resources();
            for seat in 0..self.players.len() {
                self.check_victory(seat);
            }
        } else {
            self.check_victory(player);
        }

        Ok(Outcome::Applied(format!(
            "{} placed a settlement at {vertex} and a road at {edge}",
            self.players[player].name
        )))
    }

    /// Second-round settlements yield one card per producing hex.
    fn distribute_initial_resources(&mut self) {
        let second_round: Vec<Placement> = self
            .placements
            .iter()
            .skip(self.players.len())
            .copied()
            .collect();
        for placement in second_round {
            let mut yield_bundle = ResourceBundle::zero();
            for &hex in self.board.hexes_of(placement.vertex) {
                let Some(resource) = self.board.hex(hex).resource else {
                    continue;
                };
                let card = ResourceBundle::single(resource, 1);
                if self.bank.dispense(&card).is_err() {
                    warn!(player = placement.player, %resource, "bank short; starting card skipped");
                    continue;
                }
                yield_bundle.add(resource, 1);
            }
            self.players[placement.player].add_resources(&yield_bundle);
            info!(player = placement.player, resources = %yield_bundle, "starting resources");
        }
    }

    fn pay(&mut self, player: PlayerId, cost: &ResourceBundle) -> Result<(), GameError> {
        self.players[player].remove_resources(cost)?;
        self.bank.receive(cost);
        Ok(())
    }

    pub fn attempt_build_road(&mut self, edge: EdgeId) -> Result<Outcome, GameError> {
        self.ensure_edge(edge)?;
        if let Err(violation) = self.main_play_gate() {
            return self.reject("build-road", violation);
        }
        let player = self.current_player();
        if let Err(violation) = rules::can_build_road(&self.board, &self.players[player], edge) {
            return self.reject("build-road", violation);
        }

        self.pay(player, &COST_ROAD)?;
        self.board.place_road(edge, player);
        self.players[player].inventory.roads -= 1;
        info!(player, edge, "road built");
        self.refresh_longest_road();
        self.check_victory(player);
        Ok(Outcome::Applied(format!(
            "{} built a road on edge {edge}",
            self.players[player].name
        )))
    }

    pub fn attempt_build_settlement(&mut self, vertex: VertexId) -> Result<Outcome, GameError> {
        self.ensure_vertex(vertex)?;
        if let Err(violation) = self.main_play_gate() {
            return self.reject("build-settlement", violation);
        }
        let player = self.current_player();
        if let Err(violation) =
            rules::can_build_settlement(&self.board, &self.players[player], vertex)
        {
            return self.reject("build-settlement", violation);
        }

        self.pay(player, &COST_SETTLEMENT)?;
        self.board.place_structure(
            vertex,
            Structure {
                owner: player,
                tier: Tier::Settlement,
            },
        );
        self.players[player].inventory.settlements -= 1;
        self.players[player].victory_points += 1;
        info!(player, vertex, "settlement built");
        // A new settlement can cut an opponent's road.
        self.refresh_longest_road();
        self.check_victory(player);
        Ok(Outcome::Applied(format!(
            "{} built a settlement at {vertex}",
            self.players[player].name
        )))
    }

    pub fn attempt_upgrade_city(&mut self, vertex: VertexId) -> Result<Outcome, GameError> {
        self.ensure_vertex(vertex)?;
        if let Err(violation) = self.main_play_gate() {
            return self.reject("upgrade-city", violation);
        }
        let player = self.current_player();
        if let Err(violation) = rules::can_upgrade_city(&self.board, &self.players[player], vertex)
        {
            return self.reject("upgrade-city", violation);
        }

        self.pay(player, &COST_CITY)?;
        self.board.place_structure(
            vertex,
            Structure {
                owner: player,
                tier: Tier::City,
            },
        );
        let inventory = &mut self.players[player].inventory;
        inventory.cities -= 1;
        inventory.settlements += 1;
        self.players[player].victory_points += 1;
        info!(player, vertex, "city built");
        self.check_victory(player);
        Ok(Outcome::Applied(format!(
            "{} upgraded {vertex} to a city",
            self.players[player].name
        )))
    }

    pub fn attempt_buy_development_card(&mut self) -> Result<Outcome, GameError> {
        if let Err(violation) = self.main_play_gate() {
            return self.reject("buy-development-card", violation);
        }
        let player = self.current_player();
        if !self.players[player].resources.can_afford(&COST_DEVELOPMENT) {
            return self.reject(
                "buy-development-card",
                Violation::InsufficientResources {
                    cost: COST_DEVELOPMENT,
                },
            );
        }
        let Some(card) = self.bank.draw_development_card() else {
            return self.reject("buy-development-card", Violation::DeckEmpty);
        };

        self.pay(player, &COST_DEVELOPMENT)?;
        self.players[player].dev_cards.push(card);
        info!(player, %card, "development card bought");
        if card == DevelopmentCard::VictoryPoint {
            self.check_victory(player);
        }
        Ok(Outcome::Applied(format!(
            "{} bought a development card",
            self.players[player].name
        )))
    }

    /// Trades `bank_trade_rate` of `give` for one `get`.
    pub fn attempt_bank_trade(&mut self, give: Resource, get: Resource) -> Result<Outcome, GameError> {
        if let Err(violation) = self.main_play_gate() {
            return self.reject("bank-trade", violation);
        }
        if give == get {
            return self.reject("bank-trade", Violation::SameResourceTrade);
        }
        let player = self.current_player();
        let payment = ResourceBundle::single(give, self.config.bank_trade_rate);
        if !self.players[player].resources.can_afford(&payment) {
            return self.reject(
                "bank-trade",
                Violation::InsufficientResources { cost: payment },
            );
        }
        if self.bank.available(get) == 0 {
            return self.reject("bank-trade", Violation::BankShort(get));
        }

        let received = ResourceBundle::single(get, 1);
        self.pay(player, &payment)?;
        self.bank.dispense(&received)?;
        self.players[player].add_resources(&received);
        info!(player, %give, %get, rate = self.config.bank_trade_rate, "bank trade");
        Ok(Outcome::Applied(format!(
            "{} traded {payment} for {received}",
            self.players[player].name
        )))
    }

    /// Rolls (or takes `forced`) and resolves the dice for the current
    /// player, once per turn. State is only written back when resolution
    /// succeeds.
    pub fn resolve_dice(
        &mut self,
        forced: Option<u8>,
        policy: &mut dyn DisruptionPolicy,
    ) -> Result<Outcome<DiceReport>, GameError> {
        if let Some(roll) = forced {
            if !(2..=12).contains(&roll) {
                return Err(GameError::InvalidRoll(roll));
            }
        }
        if let Err(violation) = self.main_play_gate() {
            return self.reject("resolve-dice", violation);
        }
        if self.last_roll.is_some() {
            return self.reject("resolve-dice", Violation::AlreadyRolled);
        }

        let active = self.current_player();
        let roll = match forced {
            Some(roll) => roll,
            None => TurnEngine::roll_dice(&mut self.rng),
        };
        let mut table = Table::capture(&self.board, &self.players, &self.bank);
        let mut engine = TurnEngine::new(policy, self.config.discard_threshold);
        let report = engine.dice_phase(&mut table, active, roll, &mut self.rng)?;

        if table.board.blocked != self.board.blocked_hex() {
            self.board.move_block(table.board.blocked);
        }
        for view in table.players {
            self.players[view.id].resources = view.resources;
        }
        self.bank.set_resources(table.bank);
        self.last_roll = Some(roll);
        info!(player = active, roll, "dice resolved");
        Ok(Outcome::Applied(report))
    }

    pub fn advance_turn(&mut self) -> Outcome {
        if let Err(violation) = self.main_play_gate() {
            return Outcome::Rejected(violation);
        }
        self.phase = self.cursor.advance(self.phase);
        self.turn += 1;
        self.last_roll = None;
        let next = self.current_player();
        debug!(turn = self.turn, player = next, "turn advanced");
        Outcome::Applied(format!("{} to play", self.players[next].name))
    }

    pub(crate) fn refresh_longest_road(&mut self) -> HolderChange {
        longest_road::update_longest_road_holder(&self.board, &mut self.players)
    }

    fn check_victory(&mut self, player: PlayerId) {
        if self.is_over() {
            return;
        }
        let points = self.players[player].total_points();
        if points >= self.config.vps_to_win {
            info!(player, points, "game won");
            self.phase = TurnPhase::GameOver { winner: player };
        }
    }
}
