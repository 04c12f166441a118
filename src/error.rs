//! Error type shared by the table, the CSV loader and the menu shell

use std::num::ParseIntError;

use thiserror::Error;

/// Represents errors that can occur while building or loading a bid table
#[derive(Error, Debug)]
pub enum Error {
    /// A table must have at least one bucket
    #[error("table size must be at least 1")]
    ZeroSize,

    /// The bid identifier is not a base-10 unsigned integer
    #[error("invalid bid id {id:?}: {source}")]
    InvalidBidId {
        /// The identifier as it was supplied
        id: String,
        /// Why the integer conversion failed
        source: ParseIntError,
    },

    /// The amount column could not be read as a number
    #[error("invalid amount {value:?}")]
    InvalidAmount {
        /// The raw field contents
        value: String,
    },

    /// A data row is shorter than the column layout requires
    #[error("row {row} has no column {column}")]
    MissingField {
        /// One-based data row number (header excluded)
        row: usize,
        /// Zero-based column index that was requested
        column: usize,
    },

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bid table result
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::ZeroSize.to_string(), "table size must be at least 1");

        let err = Error::MissingField { row: 3, column: 8 };
        assert_eq!(err.to_string(), "row 3 has no column 8");

        let err = Error::InvalidAmount { value: "$abc".to_string() };
        assert_eq!(err.to_string(), "invalid amount \"$abc\"");
    }

    #[test]
    fn test_invalid_bid_id_keeps_source() {
        let source = "12a".parse::<u64>().unwrap_err();
        let err = Error::InvalidBidId { id: "12a".to_string(), source };
        assert!(err.to_string().starts_with("invalid bid id \"12a\""));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
