//! Playing-card model shared by the shoe, evaluator, and projections.
//!
//! Real cards serialize as `{rank, suit, value}`. Masked cards in a
//! projection serialize with the same shape but a sentinel rank, so a
//! client can tell dealer-secrecy (`❓`) from peer-secrecy (`■`)
//! without ever learning the true card.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Sentinel rank for the dealer's face-down hole card.
pub const HOLE_RANK: &str = "❓";

/// Sentinel rank for another player's hidden-but-extant card.
pub const HIDDEN_RANK: &str = "■";

/// Card rank, Ace through King.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All thirteen ranks in deck order.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Base blackjack value: Ace counts 11 here, faces count 10.
    pub fn value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All four suits.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }
}

/// A dealt card. Immutable once drawn from the shoe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Base value before any ace adjustment.
    pub fn value(self) -> u32 {
        self.rank.value()
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Card", 3)?;
        state.serialize_field("rank", self.rank.symbol())?;
        state.serialize_field("suit", self.suit.symbol())?;
        state.serialize_field("value", &self.value())?;
        state.end()
    }
}

/// A card as it appears in an outward-facing projection.
///
/// `Up` carries the real card; the two masked variants carry nothing,
/// so a projection structurally cannot leak a hidden card's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardView {
    /// Face-up card, fully visible to the observer.
    Up(Card),
    /// The dealer's hole card: exists, identity unknown to everyone.
    HoleDown,
    /// A peer's card: exists, identity known only to its owner.
    Hidden,
}

impl CardView {
    pub fn rank_symbol(&self) -> &'static str {
        match self {
            CardView::Up(card) => card.rank.symbol(),
            CardView::HoleDown => HOLE_RANK,
            CardView::Hidden => HIDDEN_RANK,
        }
    }

    pub fn suit_symbol(&self) -> &'static str {
        match self {
            CardView::Up(card) => card.suit.symbol(),
            CardView::HoleDown | CardView::Hidden => "",
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            CardView::Up(card) => card.value(),
            CardView::HoleDown | CardView::Hidden => 0,
        }
    }
}

impl Serialize for CardView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CardView", 3)?;
        state.serialize_field("rank", self.rank_symbol())?;
        state.serialize_field("suit", self.suit_symbol())?;
        state.serialize_field("value", &self.value())?;
        state.end()
    }
}
