//! Intent rejection errors.
//!
//! Every variant is recovered locally: the table is left untouched and
//! only the originating session is notified with the rendered message.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table is full (max {capacity} players)")]
    TableFull { capacity: usize },

    #[error("please wait for the current round to finish")]
    RoundInProgress,

    #[error("invalid {what}: enter a positive integer no greater than {max}")]
    InvalidWager { what: &'static str, max: u64 },

    #[error("that action is not available right now")]
    IllegalIntent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(
            TableError::TableFull { capacity: 10 }.to_string(),
            "table is full (max 10 players)"
        );
        assert_eq!(
            TableError::InvalidWager { what: "bet", max: 50 }.to_string(),
            "invalid bet: enter a positive integer no greater than 50"
        );
    }
}
