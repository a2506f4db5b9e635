/// Error raised when a triangle offset is inserted out of order into an [`IndexRangeSet`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
#[error("the triangle offset {offset} was inserted after the range starting at {last_start}.")]
pub struct OrderingViolation {
    /// The rejected offset.
    pub offset: u32,
    /// The start of the last range of the set at the time of the insertion.
    pub last_start: u32,
}

/// An inclusive range `[start, end]` of triangle-start offsets, walked with a step of 3.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexRange {
    /// The first offset of the range.
    pub start: u32,
    /// The last offset of the range (inclusive).
    pub end: u32,
}

impl IndexRange {
    /// The number of triangles covered by this range, 0 if `start > end`.
    #[inline]
    pub fn len(&self) -> usize {
        match self.end.checked_sub(self.start) {
            Some(span) => span as usize / 3 + 1,
            None => 0,
        }
    }

    /// Does this range cover no triangle? Ranges of an [`IndexRangeSet`] never are.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// A run-length encoded set of triangle-start offsets.
///
/// Offsets are multiples of 3 (one per triangle) and must be inserted in ascending order.
/// Consecutive triangles (`offset == last.end + 3`) extend the last range, so a contiguous
/// block of triangles costs a single range whatever its size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexRangeSet {
    ranges: Vec<IndexRange>,
    count: usize,
}

impl IndexRangeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a triangle offset.
    ///
    /// An offset lying inside the last range (`last.start <= offset <= last.end`) is
    /// already covered and is ignored. An offset smaller than the start of the last range
    /// cannot be represented without reordering and is rejected.
    pub fn add(&mut self, offset: u32) -> Result<(), OrderingViolation> {
        let Some(last) = self.ranges.last_mut() else {
            self.ranges.push(IndexRange {
                start: offset,
                end: offset,
            });
            self.count = 1;
            return Ok(());
        };

        if offset < last.start {
            return Err(OrderingViolation {
                offset,
                last_start: last.start,
            });
        }

        if offset <= last.end {
            return Ok(());
        }

        if last.end.checked_add(3) == Some(offset) {
            last.end = offset;
        } else {
            self.ranges.push(IndexRange {
                start: offset,
                end: offset,
            });
        }

        self.count += 1;
        Ok(())
    }

    /// Iterates through all the offsets of this set, in ascending order.
    ///
    /// The iterator is lazy and can be recreated at will.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges
            .iter()
            .flat_map(|range| (range.start..=range.end).step_by(3))
    }

    /// The ranges of this set.
    #[inline]
    pub fn ranges(&self) -> &[IndexRange] {
        &self.ranges
    }

    /// The number of offsets contained by this set.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Is this set empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Rebuilds a set from ranges that are already known to be valid.
    pub(crate) fn from_raw_parts(ranges: Vec<IndexRange>, count: usize) -> Self {
        Self { ranges, count }
    }
}
