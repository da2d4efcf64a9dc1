//! Round settlement.
//!
//! Resolves every player against the dealer's final hand, writing the
//! outcome label and adjusting the bankroll. Pure with respect to the
//! shoe; only the hands passed in are consulted.

use std::fmt;

use serde::Serialize;

use crate::cards::Card;
use crate::hand::{evaluate, is_natural};
use crate::player::Player;

/// Per-player round result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Blackjack,
    Bust,
    Win,
    Lose,
    Push,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Blackjack => "Blackjack",
            Outcome::Bust => "Bust",
            Outcome::Win => "Win",
            Outcome::Lose => "Lose",
            Outcome::Push => "Push",
        };
        f.write_str(label)
    }
}

/// Settle all players against the dealer's final hand.
///
/// Precedence per player: natural first (push against a dealer natural,
/// else 3:2 floored), then player bust, then dealer bust, then totals.
pub fn settle_round(players: &mut [Player], dealer_hand: &[Card]) {
    let dealer_value = evaluate(dealer_hand);
    let dealer_bust = dealer_value.total > 21;
    let dealer_natural = is_natural(dealer_hand);

    for player in players.iter_mut() {
        // A natural is locked in before any hit can be accepted, so this
        // combination cannot be produced by the state machine.
        debug_assert!(
            !(player.blackjack && player.busted),
            "player flagged blackjack and busted simultaneously"
        );

        if player.blackjack {
            if dealer_natural {
                player.outcome = Some(Outcome::Push);
            } else {
                player.outcome = Some(Outcome::Blackjack);
                player.bankroll = player
                    .bankroll
                    .saturating_add(player.bet.saturating_mul(3) / 2);
            }
            continue;
        }
        if player.busted {
            player.outcome = Some(Outcome::Bust);
            player.bankroll = player.bankroll.saturating_sub(player.bet);
            continue;
        }
        if dealer_bust {
            player.outcome = Some(Outcome::Win);
            player.bankroll = player.bankroll.saturating_add(player.bet);
            continue;
        }

        let player_total = evaluate(&player.hand).total;
        if player_total > dealer_value.total {
            player.outcome = Some(Outcome::Win);
            player.bankroll = player.bankroll.saturating_add(player.bet);
        } else if player_total < dealer_value.total {
            player.outcome = Some(Outcome::Lose);
            player.bankroll = player.bankroll.saturating_sub(player.bet);
        } else {
            player.outcome = Some(Outcome::Push);
        }
    }
}
