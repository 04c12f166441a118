use std::{
    collections::VecDeque,
    io::{self, Write},
    mem,
};

use log::{debug, warn};

use crate::{
    bid::{Bid, Keyed, parse_bid_key},
    error::{Error, Result},
};

/// Number of buckets used by [`ChainedHashTable::new`]
pub const DEFAULT_SIZE: usize = 179;

/// One array position of the table
///
/// `head` is always the logical first entry of the bucket, `chain` holds the
/// records that collided with it afterwards, oldest first.
#[derive(Debug, Clone)]
enum Bucket<R> {
    /// No record hashes here
    Empty,
    /// At least one record hashes here
    Occupied {
        /// First live record of the bucket
        head: R,
        /// Later records of the bucket, in insertion order
        chain: VecDeque<R>,
    },
}

impl<R: Keyed> Bucket<R> {
    /// Number of records held, head included
    fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Occupied { chain, .. } => chain.len().saturating_add(1),
        }
    }

    /// Stores a record, either as the head or at the tail of the chain
    fn push(&mut self, record: R) {
        match self {
            Self::Empty => *self = Self::Occupied { head: record, chain: VecDeque::new() },
            Self::Occupied { chain, .. } => chain.push_back(record),
        }
    }

    /// Record at `position`, where 0 is the head and 1.. walk the chain
    fn get(&self, position: usize) -> Option<&R> {
        match self {
            Self::Empty => None,
            Self::Occupied { head, chain } => match position.checked_sub(1) {
                None => Some(head),
                Some(offset) => chain.get(offset),
            },
        }
    }

    /// First record with the given identifier, head before chain
    fn find(&self, id: &str) -> Option<&R> {
        match self {
            Self::Empty => None,
            Self::Occupied { head, .. } if head.id() == id => Some(head),
            Self::Occupied { chain, .. } => chain.iter().find(|record| record.id() == id),
        }
    }

    /// Detaches the first record with the given identifier
    ///
    /// Removing the head rotates the first chain entry into its place, so the
    /// survivors keep their relative order. Removing the last record empties the
    /// bucket.
    fn remove(&mut self, id: &str) -> Option<R> {
        let Self::Occupied { head, chain } = self else {
            return None;
        };

        if head.id() == id {
            return match chain.pop_front() {
                Some(next) => Some(mem::replace(head, next)),
                None => match mem::replace(self, Self::Empty) {
                    Self::Occupied { head, .. } => Some(head),
                    Self::Empty => None,
                },
            };
        }

        let position = chain.iter().position(|record| record.id() == id)?;
        chain.remove(position)
    }
}

/// A hash table with a fixed number of buckets and separate chaining.
///
/// Records are addressed by their identifier, parsed as a base-10 integer and
/// reduced modulo the bucket count. Colliding records are kept in insertion order
/// behind the first record of their bucket. The table never grows: the bucket
/// count chosen at construction is kept for its whole lifetime.
///
/// Identifiers are not required to be unique. Lookups and removals act on the
/// first match in head-then-chain order.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock for shared access.
#[derive(Debug, Clone)]
pub struct ChainedHashTable<R> {
    /// The buckets, one per hash value
    buckets: Box<[Bucket<R>]>,
    /// Number of records currently stored
    len: usize,
}

impl<R: Keyed> Default for ChainedHashTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Keyed> Extend<R> for ChainedHashTable<R> {
    /// Inserts every record, skipping the ones whose identifier is not numeric
    fn extend<T: IntoIterator<Item = R>>(&mut self, iter: T) {
        for record in iter {
            if let Err(err) = self.insert(record) {
                warn!("skipping record: {err}");
            }
        }
    }
}

impl<R: Keyed> ChainedHashTable<R> {
    /// Creates a table with [`DEFAULT_SIZE`] empty buckets
    #[must_use]
    pub fn new() -> Self {
        Self::empty_buckets(DEFAULT_SIZE)
    }

    /// Creates a table with `size` empty buckets
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroSize`] if `size` is zero.
    pub fn with_size(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::ZeroSize);
        }
        Ok(Self::empty_buckets(size))
    }

    /// Allocates `size` buckets, all empty
    fn empty_buckets(size: usize) -> Self {
        let buckets = (0..size).map(|_| Bucket::Empty).collect();
        Self { buckets, len: 0 }
    }

    /// Maps an integer key onto a bucket index in `[0, size)`
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub fn hash(&self, key: u64) -> usize {
        // The bucket count is never zero and the remainder is below it, so the
        // narrowing back to usize is lossless.
        (key % self.buckets.len() as u64) as usize
    }

    /// Inserts a record and returns the index of the bucket it landed in
    ///
    /// The record becomes the head of an empty bucket, or is appended to the tail
    /// of the bucket's chain. Records with an identifier already in the table are
    /// stored as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBidId`] if the identifier is not an unsigned
    /// integer; the table is left untouched.
    pub fn insert(&mut self, record: R) -> Result<usize> {
        let index = self.hash(parse_bid_key(record.id())?);

        // hash() keeps the index below the bucket count
        if let Some(bucket) = self.buckets.get_mut(index) {
            bucket.push(record);
            self.len = self.len.saturating_add(1);
        }

        Ok(index)
    }

    /// Finds the first record with the given identifier
    ///
    /// Identifiers that cannot be parsed are never stored, so they are reported
    /// as absent.
    #[must_use]
    pub fn search(&self, id: &str) -> Option<&R> {
        let index = self.hash(parse_bid_key(id).ok()?);
        self.buckets.get(index)?.find(id)
    }

    /// Removes the first record with the given identifier and returns it
    pub fn remove(&mut self, id: &str) -> Option<R> {
        let Ok(key) = parse_bid_key(id) else {
            debug!("bid id {id:?} is not numeric, nothing to remove");
            return None;
        };

        let index = self.hash(key);
        let removed = self.buckets.get_mut(index).and_then(|bucket| bucket.remove(id));

        if removed.is_some() {
            self.len = self.len.saturating_sub(1);
        } else {
            debug!("bid id {id:?} not found in bucket {index}");
        }

        removed
    }

    /// Number of buckets the table was built with
    ///
    /// This is the capacity, not the number of stored records; see [`len`](Self::len).
    #[must_use]
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of records in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of records stored in one bucket, head included
    ///
    /// Out-of-range indices report zero.
    #[must_use]
    pub fn chain_len(&self, bucket: usize) -> usize {
        self.buckets.get(bucket).map_or(0, Bucket::len)
    }

    /// Removes every record, keeping the bucket count
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Bucket::Empty;
        }
        self.len = 0;
    }

    /// Returns an iterator over `(bucket index, record)` pairs
    ///
    /// Buckets are visited in ascending order; within a bucket the head comes
    /// first, followed by the chain in insertion order.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, R> {
        Iter { buckets: &self.buckets, index: 0, position: 0 }
    }
}

impl ChainedHashTable<Bid> {
    /// Writes every bid, one per line, as `bucket, id, title, amount, fund`
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying writer.
    pub fn print_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (bucket, bid) in self.iter() {
            writeln!(out, "{bucket}, {}, {}, {}, {}", bid.bid_id, bid.title, bid.amount, bid.fund)?;
        }
        Ok(())
    }
}

/// Iterator over the records of a [`ChainedHashTable`]
#[derive(Debug, Clone)]
pub struct Iter<'a, R> {
    /// The buckets being walked
    buckets: &'a [Bucket<R>],
    /// Current bucket
    index: usize,
    /// Position inside the current bucket, 0 being the head
    position: usize,
}

impl<'a, R: Keyed> Iterator for Iter<'a, R> {
    type Item = (usize, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(bucket) = self.buckets.get(self.index) {
            if let Some(record) = bucket.get(self.position) {
                self.position = self.position.saturating_add(1);
                return Some((self.index, record));
            }
            self.index = self.index.saturating_add(1);
            self.position = 0;
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bid(id: &str) -> Bid {
        Bid::new(id, format!("title {id}"), "General Fund", 10.5)
    }

    fn ids(table: &ChainedHashTable<Bid>) -> Vec<&str> {
        table.iter().map(|(_, bid)| bid.bid_id.as_str()).collect()
    }

    #[test]
    fn test_insert_and_search() {
        let mut table = ChainedHashTable::new();
        assert_eq!(table.insert(bid("98223")).unwrap(), 98_223 % DEFAULT_SIZE);
        table.insert(bid("12")).unwrap();

        assert_eq!(table.search("98223"), Some(&bid("98223")));
        assert_eq!(table.search("12"), Some(&bid("12")));
        assert_eq!(table.search("13"), None);
    }

    #[test]
    fn test_default_collision_scenario() {
        let mut table = ChainedHashTable::new();
        assert_eq!(table.insert(bid("358")).unwrap(), 0);
        assert_eq!(table.insert(bid("537")).unwrap(), 0);

        assert_eq!(table.search("537"), Some(&bid("537")));
        assert_eq!(table.search("358"), Some(&bid("358")));

        assert_eq!(table.remove("358"), Some(bid("358")));
        assert_eq!(table.search("358"), None);
        assert_eq!(table.search("537"), Some(&bid("537")));
        assert_eq!(table.chain_len(0), 1);
    }

    #[test]
    fn test_insert_rejects_malformed_id() {
        let mut table = ChainedHashTable::new();
        assert!(matches!(table.insert(bid("abc")), Err(Error::InvalidBidId { .. })));
        assert!(matches!(table.insert(bid("-4")), Err(Error::InvalidBidId { .. })));
        assert!(table.is_empty());
        assert_eq!(table.search("abc"), None);
        assert_eq!(table.remove("abc"), None);
    }

    #[test]
    fn test_with_size_rejects_zero() {
        assert!(matches!(ChainedHashTable::<Bid>::with_size(0), Err(Error::ZeroSize)));
        assert_eq!(ChainedHashTable::<Bid>::with_size(1).unwrap().size(), 1);
    }

    #[test]
    fn test_hash_in_range() {
        let table = ChainedHashTable::<Bid>::with_size(7).unwrap();
        assert_eq!(table.hash(0), 0);
        assert_eq!(table.hash(6), 6);
        assert_eq!(table.hash(7), 0);
        assert_eq!(table.hash(u64::MAX), usize::try_from(u64::MAX % 7).unwrap());
    }

    #[test]
    fn test_remove_head_rotates_chain() {
        let mut table = ChainedHashTable::with_size(10).unwrap();
        for id in ["3", "13", "23", "33"] {
            table.insert(bid(id)).unwrap();
        }

        assert_eq!(table.remove("3"), Some(bid("3")));
        assert_eq!(ids(&table), vec!["13", "23", "33"]);

        assert_eq!(table.remove("13"), Some(bid("13")));
        assert_eq!(ids(&table), vec!["23", "33"]);
        assert_eq!(table.chain_len(3), 2);
    }

    #[test]
    fn test_remove_chain_member_splices() {
        let mut table = ChainedHashTable::with_size(10).unwrap();
        for id in ["5", "15", "25", "35"] {
            table.insert(bid(id)).unwrap();
        }

        assert_eq!(table.remove("25"), Some(bid("25")));
        assert_eq!(ids(&table), vec!["5", "15", "35"]);

        // first chain entry behind the head
        assert_eq!(table.remove("15"), Some(bid("15")));
        assert_eq!(ids(&table), vec!["5", "35"]);

        // tail of the chain
        assert_eq!(table.remove("35"), Some(bid("35")));
        assert_eq!(ids(&table), vec!["5"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_last_record_empties_bucket() {
        let mut table = ChainedHashTable::with_size(10).unwrap();
        table.insert(bid("4")).unwrap();

        assert_eq!(table.remove("4"), Some(bid("4")));
        assert_eq!(table.chain_len(4), 0);
        assert_eq!(table.remove("4"), None);

        // the bucket accepts a new head afterwards
        table.insert(bid("14")).unwrap();
        assert_eq!(table.search("14"), Some(&bid("14")));
    }

    #[test]
    fn test_remove_missing_from_occupied_bucket() {
        let mut table = ChainedHashTable::with_size(10).unwrap();
        table.insert(bid("1")).unwrap();
        table.insert(bid("11")).unwrap();

        assert_eq!(table.remove("21"), None);
        assert_eq!(table.len(), 2);
        assert_eq!(ids(&table), vec!["1", "11"]);
    }

    #[test]
    fn test_duplicates_act_on_first_match() {
        let mut table = ChainedHashTable::new();
        let first = Bid::new("42", "first", "A", 1.0);
        let second = Bid::new("42", "second", "B", 2.0);
        table.insert(first.clone()).unwrap();
        table.insert(second.clone()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.search("42"), Some(&first));
        assert_eq!(table.remove("42"), Some(first));
        assert_eq!(table.search("42"), Some(&second));
    }

    #[test]
    fn test_iter_order() {
        let mut table = ChainedHashTable::new();
        for id in ["7", "3", "182"] {
            table.insert(bid(id)).unwrap();
        }

        let visited: Vec<(usize, &str)> =
            table.iter().map(|(bucket, bid)| (bucket, bid.bid_id.as_str())).collect();
        assert_eq!(visited, vec![(3, "3"), (3, "182"), (7, "7")]);
    }

    #[test]
    fn test_print_all() {
        let mut table = ChainedHashTable::new();
        for id in ["7", "3", "182"] {
            table.insert(bid(id)).unwrap();
        }

        let mut out = Vec::new();
        table.print_all(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "3, 3, title 3, 10.5, General Fund\n\
             3, 182, title 182, 10.5, General Fund\n\
             7, 7, title 7, 10.5, General Fund\n"
        );
    }

    #[test]
    fn test_size_is_capacity_not_len() {
        let mut table = ChainedHashTable::new();
        assert_eq!(table.size(), DEFAULT_SIZE);
        assert_eq!(table.len(), 0);

        table.insert(bid("1")).unwrap();
        assert_eq!(table.size(), DEFAULT_SIZE);
        assert_eq!(table.len(), 1);

        for id in 2..500 {
            table.insert(bid(&id.to_string())).unwrap();
        }
        assert_eq!(table.size(), DEFAULT_SIZE);
        assert_eq!(table.len(), 500);
    }

    #[test]
    fn test_clear() {
        let mut table = ChainedHashTable::with_size(5).unwrap();
        table.insert(bid("1")).unwrap();
        table.insert(bid("6")).unwrap();

        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.size(), 5);
        assert_eq!(table.search("1"), None);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_extend_skips_malformed() {
        let mut table = ChainedHashTable::new();
        table.extend(vec![bid("1"), bid("x"), bid("2")]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.search("2"), Some(&bid("2")));
    }

    #[test]
    fn test_chain_len_out_of_range() {
        let table = ChainedHashTable::<Bid>::with_size(3).unwrap();
        assert_eq!(table.chain_len(3), 0);
        assert_eq!(table.chain_len(usize::MAX), 0);
    }
}
