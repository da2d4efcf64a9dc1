//! Dealer record and house drawing policy.
//!
//! House rule: stand on soft 17. The dealer never holds chips; it only
//! determines outcomes.

use crate::cards::Card;
use crate::hand::{evaluate, HandValue};

/// The dealer's hand plus the totals derived once play concludes.
#[derive(Clone, Debug, Default)]
pub struct Dealer {
    pub hand: Vec<Card>,
    /// Final total, published once the hole card is revealed.
    pub total: Option<u32>,
    pub bust: bool,
}

impl Dealer {
    /// Clear the hand and derived totals for a fresh round.
    pub fn reset(&mut self) {
        self.hand.clear();
        self.total = None;
        self.bust = false;
    }

    /// Recompute and store the derived total/bust flags.
    pub fn tally(&mut self) -> HandValue {
        let value = evaluate(&self.hand);
        self.total = Some(value.total);
        self.bust = value.total > 21;
        value
    }
}

/// Hit below 17; stand on soft 17 and anything harder (including bust).
pub fn should_hit(hand: &[Card]) -> bool {
    let value = evaluate(hand);
    value.total < 17
}
