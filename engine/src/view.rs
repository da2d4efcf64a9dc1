//! View projector: observer-scoped redaction of table state.
//!
//! All masking lives here. A projection for observer `O` shows `O`'s
//! own cards in full, reduces every other ≥2-card hand to its first
//! card plus a placeholder, and conceals the dealer's hole card until
//! the dealer acts. During settlement everything is face-up for
//! everyone (showdown). Derived flags, bets, and bankrolls are never
//! masked; only card contents are.

use serde::Serialize;

use crate::cards::{Card, CardView};
use crate::player::{Player, SessionId};
use crate::settle::Outcome;
use crate::table::{Phase, Table};

/// One outbound projection and its audience.
///
/// `target: None` is the public frame delivered to every session;
/// `Some(session)` is a personalized frame for that session only.
#[derive(Clone, Debug)]
pub struct Frame {
    pub target: Option<SessionId>,
    pub projection: Projection,
}

/// Redacted snapshot of the table for one observer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub phase: Phase,
    pub round: u64,
    pub shoe_remaining_count: usize,
    pub dealer: DealerProjection,
    pub dealer_total: Option<u32>,
    pub dealer_bust: Option<bool>,
    pub players: Vec<PlayerProjection>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DealerProjection {
    pub hand: Vec<CardView>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProjection {
    pub id: SessionId,
    pub name: String,
    pub bet: u64,
    pub bankroll: u64,
    pub hand: Vec<CardView>,
    pub done: bool,
    pub busted: bool,
    pub blackjack: bool,
    pub standing: bool,
    pub ready: bool,
    pub outcome: Option<Outcome>,
}

fn face_up(hand: &[Card]) -> Vec<CardView> {
    hand.iter().copied().map(CardView::Up).collect()
}

/// First card plus a placeholder when the hand holds two or more cards;
/// shorter hands have nothing to hide yet.
fn masked(hand: &[Card], placeholder: CardView) -> Vec<CardView> {
    if hand.len() >= 2 {
        vec![CardView::Up(hand[0]), placeholder]
    } else {
        face_up(hand)
    }
}

/// Build the projection for one observer; `None` is the public view.
pub fn project(table: &Table, observer: Option<&SessionId>) -> Projection {
    let phase = table.phase();
    let showdown = phase == Phase::Settling;
    let dealer_visible = phase == Phase::DealerTurn || showdown;

    let dealer = &table.dealer;
    let dealer_hand = if dealer_visible {
        face_up(&dealer.hand)
    } else {
        masked(&dealer.hand, CardView::HoleDown)
    };

    let players = table
        .players
        .iter()
        .map(|player| {
            let own = observer.is_some_and(|id| *id == player.id);
            let hand = if showdown || own {
                face_up(&player.hand)
            } else {
                masked(&player.hand, CardView::Hidden)
            };
            project_player(player, hand)
        })
        .collect();

    Projection {
        phase,
        round: table.round(),
        shoe_remaining_count: table.shoe.remaining(),
        dealer: DealerProjection { hand: dealer_hand },
        dealer_total: if dealer_visible { dealer.total } else { None },
        dealer_bust: if dealer_visible { Some(dealer.bust) } else { None },
        players,
    }
}

fn project_player(player: &Player, hand: Vec<CardView>) -> PlayerProjection {
    PlayerProjection {
        id: player.id.clone(),
        name: player.name.clone(),
        bet: player.bet,
        bankroll: player.bankroll,
        hand,
        done: player.done,
        busted: player.busted,
        blackjack: player.blackjack,
        standing: player.standing,
        ready: player.ready,
        outcome: player.outcome,
    }
}

/// The frame set emitted after every state-affecting event: one public
/// frame for everyone plus, while hands are still concealed, one
/// personalized frame per seated session. During showdown the public
/// frame already reveals everything, so no personalized frames are cut.
pub fn broadcast_frames(table: &Table) -> Vec<Frame> {
    let mut frames = vec![Frame {
        target: None,
        projection: project(table, None),
    }];
    if table.phase() != Phase::Settling {
        for player in &table.players {
            frames.push(Frame {
                target: Some(player.id.clone()),
                projection: project(table, Some(&player.id)),
            });
        }
    }
    frames
}
