//! Ace-flexible hand evaluation.

use crate::cards::{Card, Rank};

/// Evaluated hand: the best total and whether an ace still counts as 11.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandValue {
    pub total: u32,
    pub is_soft: bool,
}

/// Sum base values (ace = 11), then demote aces to 1 while the total
/// busts. The hand is soft iff an ace survives at 11.
pub fn evaluate(hand: &[Card]) -> HandValue {
    let mut total: u32 = 0;
    let mut soft_aces: u32 = 0;
    for card in hand {
        total += card.value();
        if card.rank == Rank::Ace {
            soft_aces += 1;
        }
    }
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    HandValue {
        total,
        is_soft: soft_aces > 0,
    }
}

/// A natural: exactly two cards totalling 21.
pub fn is_natural(hand: &[Card]) -> bool {
    hand.len() == 2 && evaluate(hand).total == 21
}
