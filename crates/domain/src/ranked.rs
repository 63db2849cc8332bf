use serde::{Deserialize, Serialize};

/// Error produced when two entries claim the same rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRank(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub rank: u32,
    pub item: T,
}

/// A list whose ranks are strictly increasing.
///
/// Used for first-match-wins precedence (views within a server set, ACLs
/// within a view). The invariant is checked on construction, so iteration
/// order is always precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedList<T> {
    entries: Vec<Ranked<T>>,
}

impl<T> RankedList<T> {
    /// Sorts `(rank, item)` pairs by rank; fails on the first tie.
    pub fn from_unordered<I>(items: I) -> Result<Self, DuplicateRank>
    where
        I: IntoIterator<Item = (u32, T)>,
    {
        let mut entries: Vec<Ranked<T>> = items
            .into_iter()
            .map(|(rank, item)| Ranked { rank, item })
            .collect();
        entries.sort_by_key(|entry| entry.rank);

        for pair in entries.windows(2) {
            if pair[0].rank == pair[1].rank {
                return Err(DuplicateRank(pair[0].rank));
            }
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn entries(&self) -> &[Ranked<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
