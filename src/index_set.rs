use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::errors::SGError;

///
/// A set of multi-indexes of equal length, stored flat and kept strictly
/// increasing in lexicographic order.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSet
{
    num_dimensions: usize,
    indexes: Vec<i32>,
}

impl IndexSet
{
    pub fn new(num_dimensions: usize) -> Self
    {
        Self { num_dimensions, indexes: Vec::new() }
    }

    ///
    /// Builds a set from `entries`, a flat list of multi-indexes in any order,
    /// possibly repeated.
    ///
    pub fn from_unsorted(num_dimensions: usize, entries: &[i32]) -> Result<Self, SGError>
    {
        if num_dimensions == 0
        {
            return Err(SGError::InvalidDimensions);
        }
        if entries.len() % num_dimensions != 0
        {
            return Err(SGError::DimensionMismatch { expected: num_dimensions, found: entries.len() % num_dimensions });
        }
        let mut rows: Vec<&[i32]> = entries.chunks_exact(num_dimensions).collect();
        rows.sort_unstable();
        rows.dedup();
        Ok(Self { num_dimensions, indexes: rows.concat() })
    }

    /// Wraps entries already sorted and unique.
    pub(crate) fn from_sorted(num_dimensions: usize, indexes: Vec<i32>) -> Self
    {
        debug_assert!(indexes.chunks_exact(num_dimensions.max(1)).zip(indexes.chunks_exact(num_dimensions.max(1)).skip(1)).all(|(a, b)| a < b));
        Self { num_dimensions, indexes }
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize
    {
        self.num_dimensions
    }

    #[inline]
    pub fn len(&self) -> usize
    {
        if self.num_dimensions == 0 { 0 } else { self.indexes.len() / self.num_dimensions }
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.indexes.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> &[i32]
    {
        &self.indexes[i * self.num_dimensions..(i + 1) * self.num_dimensions]
    }

    /// Position of `index` in the set.
    pub fn index_of(&self, index: &[i32]) -> Option<usize>
    {
        if index.len() != self.num_dimensions
        {
            return None;
        }
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi
        {
            let mid = (lo + hi) / 2;
            match self.get(mid).cmp(index)
            {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    #[inline]
    pub fn contains(&self, index: &[i32]) -> bool
    {
        self.index_of(index).is_some()
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'_, i32>
    {
        self.indexes.chunks_exact(self.num_dimensions.max(1))
    }

    /// The flat storage, `len() * num_dimensions()` entries.
    pub fn as_slice(&self) -> &[i32]
    {
        &self.indexes
    }

    fn check_dimensions(&self, other: &IndexSet) -> Result<(), SGError>
    {
        if self.num_dimensions != other.num_dimensions
        {
            Err(SGError::DimensionMismatch { expected: self.num_dimensions, found: other.num_dimensions })
        }
        else
        {
            Ok(())
        }
    }

    /// Sorted merge of both sets.
    pub fn union(&self, other: &IndexSet) -> Result<IndexSet, SGError>
    {
        self.check_dimensions(other)?;
        let mut indexes = Vec::with_capacity(self.indexes.len() + other.indexes.len());
        let mut a = self.iter().peekable();
        let mut b = other.iter().peekable();
        loop
        {
            let next = match (a.peek(), b.peek())
            {
                (Some(x), Some(y)) => match x.cmp(y)
                {
                    Ordering::Less => a.next(),
                    Ordering::Greater => b.next(),
                    Ordering::Equal =>
                    {
                        b.next();
                        a.next()
                    }
                },
                (Some(_), None) => a.next(),
                (None, Some(_)) => b.next(),
                (None, None) => break,
            };
            if let Some(index) = next
            {
                indexes.extend_from_slice(index);
            }
        }
        Ok(IndexSet::from_sorted(self.num_dimensions, indexes))
    }

    /// Entries of `self` that are not in `other`.
    pub fn difference(&self, other: &IndexSet) -> Result<IndexSet, SGError>
    {
        self.check_dimensions(other)?;
        let mut indexes = Vec::with_capacity(self.indexes.len());
        let mut b = other.iter().peekable();
        for index in self.iter()
        {
            while b.next_if(|y| *y < index).is_some() {}
            if b.peek() != Some(&index)
            {
                indexes.extend_from_slice(index);
            }
        }
        Ok(IndexSet::from_sorted(self.num_dimensions, indexes))
    }
}
