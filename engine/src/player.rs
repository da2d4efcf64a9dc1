//! Seated player record and session identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::Card;
use crate::settle::Outcome;
use crate::table::TableConfig;

/// Opaque per-connection identity assigned by the transport layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A player seated at the table.
///
/// Serialization is the full, unredacted record; it is sent only to the
/// owning session (the `joined` acknowledgement). Everything broadcast
/// goes through the view projector instead.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: SessionId,
    pub name: String,
    pub hand: Vec<Card>,
    pub bet: u64,
    pub bankroll: u64,
    pub done: bool,
    pub busted: bool,
    pub blackjack: bool,
    pub standing: bool,
    pub ready: bool,
    pub outcome: Option<Outcome>,
}

impl Player {
    pub fn new(id: SessionId, name: String, bankroll: u64, bet: u64) -> Self {
        Self {
            id,
            name,
            hand: Vec::new(),
            bet,
            bankroll,
            done: false,
            busted: false,
            blackjack: false,
            standing: false,
            ready: false,
            outcome: None,
        }
    }

    /// A player who can no longer act this round.
    pub fn locked(&self) -> bool {
        self.blackjack || self.done || self.busted
    }

    /// Clear round-scoped state, keeping (re-clamped) bankroll and bet.
    pub fn reset_for_round(&mut self, config: &TableConfig) {
        self.hand.clear();
        self.done = false;
        self.busted = false;
        self.blackjack = false;
        self.standing = false;
        self.outcome = None;
        if self.bankroll < 1 {
            self.bankroll = config.default_bankroll;
        }
        if self.bet < 1 {
            self.bet = config.default_bet;
        }
        if self.bet > self.bankroll {
            self.bet = self.bankroll;
        }
    }
}

/// Clamp an inbound wager-like value into `[1, max]`.
pub(crate) fn clamp_wager(value: i64, max: u64) -> u64 {
    let floored = value.max(1) as u64;
    floored.min(max.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn test_reset_preserves_and_reclamps_wagers() {
        let config = TableConfig::default();
        let mut player = Player::new(SessionId::new(), "p".into(), 50, 80);
        player.hand.push(Card::new(Rank::Ace, Suit::Spades));
        player.busted = true;
        player.done = true;
        player.outcome = Some(Outcome::Bust);

        player.reset_for_round(&config);
        assert!(player.hand.is_empty());
        assert!(!player.locked());
        assert_eq!(player.outcome, None);
        // Bet capped to bankroll.
        assert_eq!(player.bet, 50);
        assert_eq!(player.bankroll, 50);
    }

    #[test]
    fn test_reset_refills_emptied_bankroll() {
        let config = TableConfig::default();
        let mut player = Player::new(SessionId::new(), "p".into(), 0, 0);
        player.reset_for_round(&config);
        assert_eq!(player.bankroll, config.default_bankroll);
        assert_eq!(player.bet, config.default_bet);
    }

    #[test]
    fn test_clamp_wager_bounds() {
        assert_eq!(clamp_wager(10, 100), 10);
        assert_eq!(clamp_wager(500, 100), 100);
        // Sub-range values clamp up to the floor, they do not vanish.
        assert_eq!(clamp_wager(0, 100), 1);
        assert_eq!(clamp_wager(-3, 100), 1);
        assert_eq!(clamp_wager(1, 1), 1);
    }
}
