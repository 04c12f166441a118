//! The bid record and the identifier conversion used to address it

use std::fmt;

use crate::error::{Error, Result};

/// Records that can be stored in a [`ChainedHashTable`](crate::ChainedHashTable)
///
/// The identifier is kept as a string; the table converts it with [`parse_bid_key`]
/// when it needs a bucket.
pub trait Keyed {
    /// Returns the string identifier of the record
    fn id(&self) -> &str;
}

/// A single auction bid as read from the monthly sales export
#[derive(Debug, Clone, PartialEq)]
pub struct Bid {
    /// Identifier, expected to hold a base-10 integer
    pub bid_id: String,
    /// Item title
    pub title: String,
    /// Fund the sale was booked to
    pub fund: String,
    /// Winning bid amount, currency symbol stripped
    pub amount: f64,
}

impl Bid {
    /// Creates a bid from its parts
    #[must_use]
    pub fn new(
        bid_id: impl Into<String>,
        title: impl Into<String>,
        fund: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self { bid_id: bid_id.into(), title: title.into(), fund: fund.into(), amount }
    }
}

impl Keyed for Bid {
    fn id(&self) -> &str {
        &self.bid_id
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} | {} | {}", self.bid_id, self.title, self.amount, self.fund)
    }
}

/// Converts a bid identifier into the integer that gets hashed
///
/// Surrounding whitespace is ignored. Anything that is not an unsigned base-10
/// integer fitting in a `u64` is rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidBidId`] for empty, negative, non-numeric or
/// out-of-range identifiers.
pub fn parse_bid_key(id: &str) -> Result<u64> {
    id.trim().parse::<u64>().map_err(|source| Error::InvalidBidId { id: id.to_string(), source })
}
