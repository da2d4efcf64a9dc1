//! Server-authoritative blackjack table engine.
//!
//! This crate contains the deterministic core of a single shared table:
//! the shoe, hand evaluation, dealer policy, settlement, observer-scoped
//! view projection, and the table state machine that serializes all
//! player intents.
//!
//! ## Determinism requirements
//! - No wall-clock time inside the engine.
//! - All randomness flows through the RNG owned by [`Table`]; tests
//!   construct tables with a seeded RNG.
//! - Every accepted intent runs to completion before the next one is
//!   applied; the transport layer is responsible for that serialization.
//!
//! ## Hidden information
//! Outward-facing snapshots are built exclusively by [`view::project`],
//! which redacts other players' hole cards and the dealer's hole card
//! until the phase authorizes reveal. Nothing else in the crate
//! serializes card contents.
//!
//! The primary entrypoint is [`Table::apply`].

pub mod cards;
pub mod dealer;
pub mod error;
pub mod hand;
pub mod intent;
pub mod player;
pub mod seating;
pub mod settle;
pub mod shoe;
pub mod table;
pub mod view;

pub use cards::{Card, CardView, Rank, Suit};
pub use error::TableError;
pub use intent::Intent;
pub use player::{Player, SessionId};
pub use settle::Outcome;
pub use table::{Outbound, Phase, Table, TableConfig};
pub use view::{broadcast_frames, project, Frame, Projection};
