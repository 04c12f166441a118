//! # Bid Table
//!
//! A fixed-size hash table with separate chaining, storing auction bids keyed by
//! their numeric identifier.
//!
//! The crate provides:
//!
//! - `ChainedHashTable`: the table itself, generic over any [`Keyed`] record
//! - `Bid`: the record read from the monthly sales export
//! - `load_bids`: a CSV loader feeding a table
//! - `Shell`: the numbered menu used by the `bids` binary
//!
//! Identifiers are parsed as base-10 integers and reduced modulo the bucket count.
//! Colliding records are chained behind the first record of their bucket in
//! insertion order. The bucket count is fixed when the table is built.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bidtable::{Bid, ChainedHashTable};
//!
//! // Create a table with the default 179 buckets
//! let mut table = ChainedHashTable::new();
//!
//! // 358 and 537 both land in bucket 0
//! table.insert(Bid::new("358", "Office Chair", "General Fund", 27.5))?;
//! table.insert(Bid::new("537", "Desk Lamp", "Enterprise", 9.0))?;
//!
//! // Retrieve a bid
//! assert_eq!(table.search("537").map(|bid| bid.title.as_str()), Some("Desk Lamp"));
//!
//! // Remove the head of the chain, the other bid stays reachable
//! table.remove("358");
//! assert!(table.search("358").is_none());
//! assert!(table.search("537").is_some());
//!
//! // size() is the bucket count, len() the number of bids
//! assert_eq!(table.size(), 179);
//! assert_eq!(table.len(), 1);
//! # Ok::<(), bidtable::Error>(())
//! ```
//!
//! ## Loading a CSV export
//!
//! ```rust,no_run
//! use bidtable::{ChainedHashTable, ColumnLayout, load_bids};
//!
//! let mut table = ChainedHashTable::new();
//! let report = load_bids("eBid_Monthly_Sales.csv", &mut table, &ColumnLayout::default())?;
//! println!("{} bids read, {} rows skipped", report.loaded, report.skipped);
//! # Ok::<(), bidtable::Error>(())
//! ```

/// Module defining the bid record and identifier parsing
mod bid;
/// Module implementing the fixed-size chained hash table
mod chained_table;
/// Module defining the crate error type
mod error;
/// Module loading bids from CSV files
mod loader;
/// Module implementing the numbered menu
mod shell;
/// Utility functions and traits for the table
mod utils;

pub use bid::{Bid, Keyed, parse_bid_key};
pub use chained_table::{ChainedHashTable, DEFAULT_SIZE, Iter};
pub use error::{Error, Result};
pub use loader::{ColumnLayout, LoadReport, load_bids, load_bids_from_reader, parse_amount};
pub use shell::{DEFAULT_BID_KEY, Shell};
pub use utils::{TableExtensions, from_records};
