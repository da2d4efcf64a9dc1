//! Table state machine.
//!
//! The orchestrator owning canonical state. All mutation funnels
//! through [`Table::apply`], which the transport calls one intent at a
//! time; each accepted intent runs to completion and returns the full
//! set of outbound messages it produced, so no observer ever sees two
//! mutually inconsistent snapshots for longer than one message cycle.

use rand::rngs::StdRng;
use rand::SeedableRng as _;
use serde::Serialize;

use crate::dealer::{self, Dealer};
use crate::error::TableError;
use crate::hand::{evaluate, is_natural};
use crate::intent::Intent;
use crate::player::{clamp_wager, Player, SessionId};
use crate::settle::settle_round;
use crate::shoe::Shoe;
use crate::view::{broadcast_frames, Frame};

/// Hard ceiling on seats regardless of configuration.
pub const MAX_CAPACITY: usize = 10;

/// Table tuning knobs. `Default` carries the standard house setup.
#[derive(Clone, Copy, Debug)]
pub struct TableConfig {
    /// Seats at the table (1..=10).
    pub capacity: usize,
    /// Decks in a freshly built shoe.
    pub shoe_decks: usize,
    /// Bankroll granted when a join omits or corrupts one.
    pub default_bankroll: u64,
    /// Bet used when a join omits or corrupts one.
    pub default_bet: u64,
    /// Upper bound on any bankroll.
    pub bankroll_cap: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_CAPACITY,
            shoe_decks: 6,
            default_bankroll: 100,
            default_bet: 10,
            bankroll_cap: 1_000_000,
        }
    }
}

impl TableConfig {
    /// Force the knobs into their documented ranges.
    pub fn normalized(mut self) -> Self {
        self.capacity = self.capacity.clamp(1, MAX_CAPACITY);
        self.shoe_decks = self.shoe_decks.max(1);
        self.bankroll_cap = self.bankroll_cap.max(1);
        self.default_bankroll = self.default_bankroll.clamp(1, self.bankroll_cap);
        self.default_bet = self.default_bet.clamp(1, self.default_bankroll);
        self
    }
}

/// Round lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Waiting,
    Dealing,
    PlayersAct,
    DealerTurn,
    Settling,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Dealing => "dealing",
            Phase::PlayersAct => "playersAct",
            Phase::DealerTurn => "dealerTurn",
            Phase::Settling => "settling",
        }
    }
}

/// A message the transport must deliver after an intent was applied.
#[derive(Clone, Debug)]
pub enum Outbound {
    /// Full unredacted record, sent once to the joining session.
    Joined { session: SessionId, player: Player },
    /// Human-readable rejection, sent only to the originating session.
    Error { session: SessionId, text: String },
    /// A projection frame; `target: None` goes to every session.
    State(Frame),
}

/// The one table of this process.
pub struct Table {
    pub(crate) config: TableConfig,
    phase: Phase,
    round: u64,
    pub(crate) shoe: Shoe,
    pub(crate) dealer: Dealer,
    pub(crate) players: Vec<Player>,
    rng: StdRng,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Construct with an explicit RNG; the deterministic entrypoint for
    /// tests and simulations.
    pub fn with_rng(config: TableConfig, rng: StdRng) -> Self {
        Self {
            config: config.normalized(),
            phase: Phase::Waiting,
            round: 0,
            shoe: Shoe::empty(),
            dealer: Dealer::default(),
            players: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Apply one intent for one session, returning every outbound
    /// message it produced. A rejected intent leaves the table
    /// untouched and yields a single error notification.
    pub fn apply(&mut self, session: &SessionId, intent: Intent) -> Vec<Outbound> {
        let result = match intent {
            Intent::Join { name, bankroll, bet } => self.handle_join(session, name, bankroll, bet),
            Intent::Ready => self.handle_ready(session),
            Intent::SetBet { value } => self.handle_set_bet(session, value),
            Intent::SetBankroll { value } => self.handle_set_bankroll(session, value),
            Intent::AllIn => self.handle_all_in(session),
            Intent::Hit => self.handle_hit(session),
            Intent::Stand => self.handle_stand(session),
            Intent::NewRound => self.handle_new_round(session),
            Intent::Leave => self.handle_leave(session),
        };
        result.unwrap_or_else(|err| {
            vec![Outbound::Error {
                session: session.clone(),
                text: err.to_string(),
            }]
        })
    }

    // ---- waiting-phase intents ----

    fn handle_ready(&mut self, session: &SessionId) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::Waiting {
            return Err(TableError::IllegalIntent);
        }
        let player = self.player_mut(session).ok_or(TableError::IllegalIntent)?;
        // Ensure the wager invariant holds before locking in.
        if player.bet < 1 {
            player.bet = 1;
        }
        if player.bet > player.bankroll {
            player.bet = player.bankroll;
        }
        player.ready = true;
        Ok(self.try_start())
    }

    fn handle_set_bet(&mut self, session: &SessionId, value: i64) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::Waiting {
            return Err(TableError::IllegalIntent);
        }
        let idx = self.player_index(session).ok_or(TableError::IllegalIntent)?;
        let max = self.players[idx].bankroll;
        if value < 1 || value as u64 > max {
            return Err(TableError::InvalidWager { what: "bet", max });
        }
        let player = &mut self.players[idx];
        player.bet = value as u64;
        player.ready = false;
        Ok(self.sync())
    }

    fn handle_set_bankroll(&mut self, session: &SessionId, value: i64) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::Waiting {
            return Err(TableError::IllegalIntent);
        }
        let idx = self.player_index(session).ok_or(TableError::IllegalIntent)?;
        let cap = self.config.bankroll_cap;
        if value < 1 || value as u64 > cap {
            return Err(TableError::InvalidWager { what: "bankroll", max: cap });
        }
        let player = &mut self.players[idx];
        player.bankroll = value as u64;
        if player.bet > player.bankroll {
            player.bet = player.bankroll;
        }
        player.ready = false;
        Ok(self.sync())
    }

    fn handle_all_in(&mut self, session: &SessionId) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::Waiting {
            return Err(TableError::IllegalIntent);
        }
        let player = self.player_mut(session).ok_or(TableError::IllegalIntent)?;
        player.bet = player.bankroll.max(1);
        player.ready = false;
        Ok(self.sync())
    }

    // ---- simultaneous-action intents ----

    fn handle_hit(&mut self, session: &SessionId) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::PlayersAct {
            return Err(TableError::IllegalIntent);
        }
        let idx = self.player_index(session).ok_or(TableError::IllegalIntent)?;
        if self.players[idx].locked() {
            return Err(TableError::IllegalIntent);
        }
        // An exhausted shoe refuses the draw; the hand simply stops growing.
        if let Some(card) = self.shoe.draw() {
            self.players[idx].hand.push(card);
        }
        let busted = evaluate(&self.players[idx].hand).total > 21;
        if busted {
            let player = &mut self.players[idx];
            player.busted = true;
            player.done = true;
        }
        let mut out = self.sync();
        if busted {
            out.extend(self.maybe_advance());
        }
        Ok(out)
    }

    fn handle_stand(&mut self, session: &SessionId) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::PlayersAct {
            return Err(TableError::IllegalIntent);
        }
        let idx = self.player_index(session).ok_or(TableError::IllegalIntent)?;
        if self.players[idx].locked() {
            return Err(TableError::IllegalIntent);
        }
        let player = &mut self.players[idx];
        player.standing = true;
        player.done = true;
        let mut out = self.sync();
        out.extend(self.maybe_advance());
        Ok(out)
    }

    // ---- settlement-phase intents ----

    fn handle_new_round(&mut self, session: &SessionId) -> Result<Vec<Outbound>, TableError> {
        if self.phase != Phase::Settling {
            return Err(TableError::IllegalIntent);
        }
        if self.player_index(session).is_none() {
            return Err(TableError::IllegalIntent);
        }
        self.phase = Phase::Waiting;
        self.dealer.reset();
        for player in &mut self.players {
            player.reset_for_round(&self.config);
            player.ready = false;
        }
        Ok(self.sync())
    }

    // ---- transitions ----

    /// Start the round if every seated player is ready and occupancy
    /// allows; otherwise just re-broadcast. Re-run after every join,
    /// leave, ready, or edit event in the waiting phase.
    pub(crate) fn try_start(&mut self) -> Vec<Outbound> {
        let all_ready = self.occupancy_ok() && self.players.iter().all(|p| p.ready);
        if self.phase == Phase::Waiting && all_ready {
            self.start_round()
        } else {
            self.sync()
        }
    }

    fn occupancy_ok(&self) -> bool {
        !self.players.is_empty() && self.players.len() <= self.config.capacity
    }

    /// Build a fresh shoe, deal the opening hands, and collapse the
    /// transient dealing phase into `PlayersAct` (or straight into the
    /// dealer turn when every hand is a natural).
    fn start_round(&mut self) -> Vec<Outbound> {
        self.round += 1;
        self.phase = Phase::Dealing;
        self.shoe = Shoe::build(self.config.shoe_decks, &mut self.rng);
        self.dealer.reset();
        for player in &mut self.players {
            player.reset_for_round(&self.config);
        }

        // Two interleaved passes: one card to each player, then the dealer.
        for _ in 0..2 {
            for idx in 0..self.players.len() {
                if let Some(card) = self.shoe.draw() {
                    self.players[idx].hand.push(card);
                }
            }
            if let Some(card) = self.shoe.draw() {
                self.dealer.hand.push(card);
            }
        }

        for player in &mut self.players {
            player.blackjack = is_natural(&player.hand);
        }

        let all_blackjack = !self.players.is_empty() && self.players.iter().all(|p| p.blackjack);
        if all_blackjack {
            self.run_dealer_and_settle()
        } else {
            self.phase = Phase::PlayersAct;
            self.sync()
        }
    }

    /// The round-advance predicate: once every seated player is locked
    /// (blackjack, done, or busted — vacuously true with zero players),
    /// play the dealer out and settle. Re-evaluated after every
    /// per-player mutation; no turn order exists.
    pub(crate) fn maybe_advance(&mut self) -> Vec<Outbound> {
        if self.phase != Phase::PlayersAct {
            return Vec::new();
        }
        let all_locked = self.players.iter().all(Player::locked);
        if all_locked {
            self.run_dealer_and_settle()
        } else {
            Vec::new()
        }
    }

    /// Reveal the hole card, auto-play the dealer to completion within
    /// this event turn, then settle and enter showdown.
    fn run_dealer_and_settle(&mut self) -> Vec<Outbound> {
        self.phase = Phase::DealerTurn;
        // Broadcast the reveal before any drawing happens.
        let mut out = self.sync();

        while dealer::should_hit(&self.dealer.hand) {
            let Some(card) = self.shoe.draw() else {
                break;
            };
            self.dealer.hand.push(card);
        }
        self.dealer.tally();

        self.phase = Phase::Settling;
        settle_round(&mut self.players, &self.dealer.hand);
        out.extend(self.sync());
        out
    }

    /// Everything back to the initial empty state; used when the last
    /// player leaves.
    pub(crate) fn reset_to_empty(&mut self) {
        self.phase = Phase::Waiting;
        self.round = 0;
        self.shoe = Shoe::empty();
        self.dealer.reset();
        self.players.clear();
    }

    // ---- lookup / broadcast ----

    pub(crate) fn player_index(&self, session: &SessionId) -> Option<usize> {
        self.players.iter().position(|p| p.id == *session)
    }

    fn player_mut(&mut self, session: &SessionId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *session)
    }

    /// The state-sync frame set for the current snapshot.
    pub(crate) fn sync(&self) -> Vec<Outbound> {
        broadcast_frames(self).into_iter().map(Outbound::State).collect()
    }

    pub(crate) fn join_bankroll(&self, requested: Option<i64>) -> u64 {
        requested
            .map(|value| clamp_wager(value, self.config.bankroll_cap))
            .unwrap_or(self.config.default_bankroll)
    }

    pub(crate) fn join_bet(&self, requested: Option<i64>, bankroll: u64) -> u64 {
        requested
            .map(|value| clamp_wager(value, bankroll))
            .unwrap_or_else(|| self.config.default_bet.min(bankroll))
    }

    #[cfg(test)]
    pub(crate) fn for_tests(config: TableConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    #[cfg(test)]
    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(table: &mut Table, name: &str) -> SessionId {
        let session = SessionId::new();
        let out = table.apply(
            &session,
            Intent::Join { name: Some(name.into()), bankroll: None, bet: None },
        );
        assert!(
            matches!(out.first(), Some(Outbound::Joined { .. })),
            "join rejected: {out:?}"
        );
        session
    }

    #[test]
    fn test_config_normalization() {
        let config = TableConfig {
            capacity: 99,
            shoe_decks: 0,
            default_bankroll: 0,
            default_bet: 0,
            bankroll_cap: 1_000_000,
        }
        .normalized();
        assert_eq!(config.capacity, MAX_CAPACITY);
        assert_eq!(config.shoe_decks, 1);
        assert_eq!(config.default_bankroll, 1);
        assert_eq!(config.default_bet, 1);
    }

    #[test]
    fn test_edits_unready_and_validate() {
        let mut table = Table::for_tests(TableConfig::default(), 1);
        let a = seat(&mut table, "a");

        table.apply(&a, Intent::SetBankroll { value: 60 });
        table.apply(&a, Intent::SetBet { value: 25 });
        assert_eq!(table.players()[0].bankroll, 60);
        assert_eq!(table.players()[0].bet, 25);
        assert!(!table.players()[0].ready);

        // Bet above bankroll is refused without side effects.
        let out = table.apply(&a, Intent::SetBet { value: 61 });
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
        assert_eq!(table.players()[0].bet, 25);

        // Bankroll edit drags the bet down with it.
        table.apply(&a, Intent::SetBankroll { value: 20 });
        assert_eq!(table.players()[0].bet, 20);

        // Bankroll beyond the cap is refused.
        let out = table.apply(&a, Intent::SetBankroll { value: 2_000_000 });
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
    }

    #[test]
    fn test_all_in_sets_bet_to_bankroll() {
        let mut table = Table::for_tests(TableConfig::default(), 2);
        let a = seat(&mut table, "a");
        table.apply(&a, Intent::AllIn);
        assert_eq!(table.players()[0].bet, 100);
        assert!(!table.players()[0].ready);
    }

    #[test]
    fn test_wrong_phase_intents_rejected_without_mutation() {
        let mut table = Table::for_tests(TableConfig::default(), 3);
        let a = seat(&mut table, "a");

        // Hit while waiting.
        let out = table.apply(&a, Intent::Hit);
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
        assert!(table.players()[0].hand.is_empty());

        // NewRound while waiting.
        let out = table.apply(&a, Intent::NewRound);
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
        assert_eq!(table.phase(), Phase::Waiting);
    }

    #[test]
    fn test_unseated_session_cannot_act() {
        let mut table = Table::for_tests(TableConfig::default(), 4);
        seat(&mut table, "a");
        let stranger = SessionId::new();
        let out = table.apply(&stranger, Intent::Ready);
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
    }

    #[test]
    fn test_ready_everyone_starts_round() {
        let mut table = Table::for_tests(TableConfig::default(), 5);
        let a = seat(&mut table, "a");
        let b = seat(&mut table, "b");

        table.apply(&a, Intent::Ready);
        assert_eq!(table.phase(), Phase::Waiting);

        table.apply(&b, Intent::Ready);
        // Dealing collapses synchronously into an actionable phase.
        assert!(matches!(table.phase(), Phase::PlayersAct | Phase::Settling));
        assert_eq!(table.round(), 1);
        for player in table.players() {
            assert_eq!(player.hand.len(), 2);
        }
        assert!(table.dealer.hand.len() >= 2);
        if table.phase() == Phase::PlayersAct {
            // Two players and the dealer drew two cards each.
            assert_eq!(table.shoe.remaining(), 6 * crate::shoe::CARDS_PER_DECK - 6);
        }
    }
}
