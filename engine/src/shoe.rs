//! Multi-deck shoe.
//!
//! Built fresh at the start of every round and never replenished
//! mid-round: drawing from an empty shoe yields `None` and the hand
//! simply stops growing.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards::{Card, Rank, Suit};

/// Cards in one standard deck.
pub const CARDS_PER_DECK: usize = 52;

/// The shuffled stack of cards drawn from during a round.
#[derive(Clone, Debug, Default)]
pub struct Shoe {
    cards: Vec<Card>,
}

impl Shoe {
    /// An exhausted shoe. The table starts with one; rounds replace it.
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Build `num_decks` standard decks and uniformly permute them.
    pub fn build<R: Rng + ?Sized>(num_decks: usize, rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(num_decks.saturating_mul(CARDS_PER_DECK));
        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        cards.shuffle(rng);
        Self { cards }
    }

    /// Take the next card, or `None` once the shoe is spent.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Cards left in the shoe.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}
