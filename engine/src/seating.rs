//! Session registry: seats, capacity policy, join/leave.
//!
//! Seating order is stable across a round and used for nothing but
//! display. Departure is an ordinary intent: a leaving player's cards
//! are abandoned in place and the round-advance predicates are
//! re-checked immediately.

use crate::error::TableError;
use crate::player::{Player, SessionId};
use crate::table::{Outbound, Phase, Table};

impl Table {
    /// Seat a new player, clamping the requested bankroll/bet into
    /// their valid ranges (defaults when unspecified or unusable).
    pub(crate) fn handle_join(
        &mut self,
        session: &SessionId,
        name: Option<String>,
        bankroll: Option<i64>,
        bet: Option<i64>,
    ) -> Result<Vec<Outbound>, TableError> {
        if self.players.len() >= self.config.capacity {
            return Err(TableError::TableFull { capacity: self.config.capacity });
        }
        if self.phase() != Phase::Waiting {
            return Err(TableError::RoundInProgress);
        }
        if self.player_index(session).is_some() {
            return Err(TableError::IllegalIntent);
        }

        let bankroll = self.join_bankroll(bankroll);
        let bet = self.join_bet(bet, bankroll);
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Player-{}", self.players.len() + 1));

        let player = Player::new(session.clone(), name, bankroll, bet);
        self.players.push(player.clone());

        let mut out = vec![Outbound::Joined { session: session.clone(), player }];
        out.extend(self.try_start());
        Ok(out)
    }

    /// Remove a session's player, if seated. Unknown sessions are a
    /// no-op: disconnects arrive for spectators too.
    pub(crate) fn handle_leave(&mut self, session: &SessionId) -> Result<Vec<Outbound>, TableError> {
        let Some(idx) = self.player_index(session) else {
            return Ok(Vec::new());
        };
        self.players.remove(idx);

        if self.players.is_empty() {
            self.reset_to_empty();
            return Ok(self.sync());
        }

        match self.phase() {
            // The departed player may have been the last one holding
            // the round open.
            Phase::PlayersAct => {
                let mut out = self.sync();
                out.extend(self.maybe_advance());
                Ok(out)
            }
            // Everyone remaining might now be ready.
            Phase::Waiting => Ok(self.try_start()),
            _ => Ok(self.sync()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use crate::table::TableConfig;

    fn join(table: &mut Table) -> SessionId {
        let session = SessionId::new();
        let out = table.apply(
            &session,
            Intent::Join { name: None, bankroll: None, bet: None },
        );
        assert!(matches!(out.first(), Some(Outbound::Joined { .. })));
        session
    }

    #[test]
    fn test_join_defaults_and_clamps() {
        let mut table = Table::for_tests(TableConfig::default(), 11);
        let session = SessionId::new();
        let out = table.apply(
            &session,
            Intent::Join {
                name: Some("  ".into()),
                bankroll: Some(5_000_000),
                bet: Some(-3),
            },
        );
        let Some(Outbound::Joined { player, .. }) = out.first() else {
            panic!("expected joined message");
        };
        assert_eq!(player.name, "Player-1");
        // Bankroll clamped to the cap; the sub-range bet clamps up to
        // the floor.
        assert_eq!(player.bankroll, 1_000_000);
        assert_eq!(player.bet, 1);
        assert!(!player.ready);
    }

    #[test]
    fn test_join_sub_range_values_clamp_to_floor() {
        let mut table = Table::for_tests(TableConfig::default(), 19);
        let session = SessionId::new();
        let out = table.apply(
            &session,
            Intent::Join { name: None, bankroll: Some(0), bet: Some(-5) },
        );
        let Some(Outbound::Joined { player, .. }) = out.first() else {
            panic!("expected joined message");
        };
        // Specified-but-low values clamp to 1, they do not fall back
        // to the defaults.
        assert_eq!(player.bankroll, 1);
        assert_eq!(player.bet, 1);

        // Omitted values still take the defaults.
        let other = SessionId::new();
        let out = table.apply(
            &other,
            Intent::Join { name: None, bankroll: None, bet: None },
        );
        let Some(Outbound::Joined { player, .. }) = out.first() else {
            panic!("expected joined message");
        };
        assert_eq!(player.bankroll, 100);
        assert_eq!(player.bet, 10);
    }

    #[test]
    fn test_join_small_bankroll_caps_default_bet() {
        let mut table = Table::for_tests(TableConfig::default(), 12);
        let session = SessionId::new();
        let out = table.apply(
            &session,
            Intent::Join { name: None, bankroll: Some(4), bet: None },
        );
        let Some(Outbound::Joined { player, .. }) = out.first() else {
            panic!("expected joined message");
        };
        assert_eq!(player.bankroll, 4);
        assert_eq!(player.bet, 4);
    }

    #[test]
    fn test_table_full() {
        let config = TableConfig { capacity: 2, ..TableConfig::default() };
        let mut table = Table::for_tests(config, 13);
        join(&mut table);
        join(&mut table);

        let session = SessionId::new();
        let out = table.apply(
            &session,
            Intent::Join { name: None, bankroll: None, bet: None },
        );
        let [Outbound::Error { text, .. }] = out.as_slice() else {
            panic!("expected a single error message");
        };
        assert_eq!(text, "table is full (max 2 players)");
        assert_eq!(table.players().len(), 2);
    }

    #[test]
    fn test_join_rejected_mid_round() {
        let mut table = Table::for_tests(TableConfig::default(), 14);
        let a = join(&mut table);
        table.apply(&a, Intent::Ready);
        assert_ne!(table.phase(), Phase::Waiting);

        let late = SessionId::new();
        let out = table.apply(
            &late,
            Intent::Join { name: None, bankroll: None, bet: None },
        );
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
    }

    #[test]
    fn test_duplicate_join_rejected() {
        let mut table = Table::for_tests(TableConfig::default(), 15);
        let a = join(&mut table);
        let out = table.apply(
            &a,
            Intent::Join { name: None, bankroll: None, bet: None },
        );
        assert!(matches!(out.as_slice(), [Outbound::Error { .. }]));
        assert_eq!(table.players().len(), 1);
    }

    #[test]
    fn test_last_leave_resets_table() {
        let mut table = Table::for_tests(TableConfig::default(), 16);
        let a = join(&mut table);
        table.apply(&a, Intent::Ready);
        assert_eq!(table.round(), 1);

        table.apply(&a, Intent::Leave);
        assert!(table.is_empty());
        assert_eq!(table.phase(), Phase::Waiting);
        assert_eq!(table.round(), 0);
        assert_eq!(table.shoe.remaining(), 0);
    }

    #[test]
    fn test_leave_of_unknown_session_is_silent() {
        let mut table = Table::for_tests(TableConfig::default(), 17);
        join(&mut table);
        let spectator = SessionId::new();
        let out = table.apply(&spectator, Intent::Leave);
        assert!(out.is_empty());
        assert_eq!(table.players().len(), 1);
    }

    #[test]
    fn test_leave_in_waiting_can_start_round() {
        let mut table = Table::for_tests(TableConfig::default(), 18);
        let a = join(&mut table);
        let b = join(&mut table);
        table.apply(&a, Intent::Ready);
        assert_eq!(table.phase(), Phase::Waiting);

        // The only un-ready player leaves; the rest are all ready.
        table.apply(&b, Intent::Leave);
        assert_ne!(table.phase(), Phase::Waiting);
        assert_eq!(table.round(), 1);
    }
}
