//! Inbound player intents.
//!
//! Tagged JSON at the boundary; malformed payloads fail to decode and
//! never reach the state machine.

use serde::Deserialize;

/// A session-scoped request against the table.
///
/// `Leave` is also how the transport models a disconnect, so departure
/// runs through the same serialized entry point as every other intent.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    Join {
        name: Option<String>,
        bankroll: Option<i64>,
        bet: Option<i64>,
    },
    Ready,
    SetBet {
        value: i64,
    },
    SetBankroll {
        value: i64,
    },
    AllIn,
    Hit,
    Stand,
    NewRound,
    Leave,
}
