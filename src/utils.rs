//! Utility functions and traits for `ChainedHashTable`

use crate::{ChainedHashTable, Keyed, Result};

/// Extension trait for tables that provides inspection and distribution helpers
pub trait TableExtensions<R> {
    /// Returns the identifiers of all records, in iteration order
    fn ids(&self) -> Vec<String>;

    /// Returns true if a record with the given identifier is stored
    fn contains_id(&self, id: &str) -> bool;

    /// Returns the number of buckets holding at least one record
    fn occupied_buckets(&self) -> usize;

    /// Returns the record count of the fullest bucket
    fn longest_chain(&self) -> usize;

    /// Returns the ratio of stored records to buckets
    fn load_factor(&self) -> f64;
}

impl<R: Keyed> TableExtensions<R> for ChainedHashTable<R> {
    fn ids(&self) -> Vec<String> {
        self.iter().map(|(_, record)| record.id().to_string()).collect()
    }

    fn contains_id(&self, id: &str) -> bool {
        self.search(id).is_some()
    }

    fn occupied_buckets(&self) -> usize {
        (0..self.size()).filter(|&bucket| self.chain_len(bucket) > 0).count()
    }

    fn longest_chain(&self) -> usize {
        (0..self.size()).map(|bucket| self.chain_len(bucket)).max().unwrap_or(0)
    }

    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.size() as f64
    }
}

/// Creates a `ChainedHashTable` with `size` buckets from an iterator of records
///
/// Records whose identifier is not numeric are skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::ZeroSize`](crate::Error::ZeroSize) if `size` is zero.
pub fn from_records<R, I>(size: usize, iter: I) -> Result<ChainedHashTable<R>>
where
    R: Keyed,
    I: IntoIterator<Item = R>,
{
    let mut table = ChainedHashTable::with_size(size)?;
    table.extend(iter);
    Ok(table)
}
