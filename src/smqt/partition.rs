//! Mean computation and low/high split of a position set

use crate::error::SmqtError;

/// Low/high split of one recursion node's position set
///
/// Both halves keep the relative order of the input positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Positions whose raw value is `<= mean`
    pub low: Vec<usize>,
    /// Positions whose raw value is `> mean`
    pub high: Vec<usize>,
}

impl Partition {
    /// Total number of positions across both halves
    pub fn len(&self) -> usize {
        self.low.len() + self.high.len()
    }

    /// True when the node had no positions
    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.high.is_empty()
    }
}

#[inline]
fn value_at(raw: &[u8], index: usize) -> Result<u8, SmqtError> {
    raw.get(index).copied().ok_or(SmqtError::IndexOutOfRange {
        index,
        len: raw.len(),
    })
}

/// Truncated integer mean of `raw` over `positions`
///
/// An empty set divides by 1 and yields 0.
pub fn mean(positions: &[usize], raw: &[u8]) -> Result<u8, SmqtError> {
    let mut sum: u64 = 0;
    for &p in positions {
        sum += value_at(raw, p)? as u64;
    }
    let count = positions.len().max(1) as u64;
    Ok((sum / count) as u8)
}

/// Classify each position against `mean`
pub fn partition(positions: &[usize], raw: &[u8], mean: u8) -> Result<Partition, SmqtError> {
    let mut split = Partition::default();
    for &p in positions {
        if value_at(raw, p)? <= mean {
            split.low.push(p);
        } else {
            split.high.push(p);
        }
    }
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_truncates() {
        let raw = [1u8, 2, 2];
        assert_eq!(mean(&[0, 1, 2], &raw).unwrap(), 1);
        assert_eq!(mean(&[1, 2], &raw).unwrap(), 2);
    }

    #[test]
    fn test_mean_uses_subset_only() {
        let raw = [0u8, 0, 200, 250];
        assert_eq!(mean(&[2, 3], &raw).unwrap(), 225);
        assert_eq!(mean(&[0, 1, 2, 3], &raw).unwrap(), 112);
    }

    #[test]
    fn test_mean_of_empty_set_is_zero() {
        assert_eq!(mean(&[], &[10, 20]).unwrap(), 0);
    }

    #[test]
    fn test_mean_does_not_overflow() {
        let raw = vec![255u8; 100_000];
        let positions: Vec<usize> = (0..raw.len()).collect();
        assert_eq!(mean(&positions, &raw).unwrap(), 255);
    }

    #[test]
    fn test_partition_is_inclusive_low() {
        let raw = [10u8, 20, 30, 20];
        let split = partition(&[0, 1, 2, 3], &raw, 20).unwrap();
        assert_eq!(split.low, vec![0, 1, 3]);
        assert_eq!(split.high, vec![2]);
        assert_eq!(split.len(), 4);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let raw: Vec<u8> = (0..64u32).map(|i| ((i * 37) % 251) as u8).collect();
        let positions: Vec<usize> = (0..raw.len()).rev().step_by(2).collect();
        let m = mean(&positions, &raw).unwrap();
        let split = partition(&positions, &raw, m).unwrap();

        let mut merged: Vec<usize> = split.low.iter().chain(&split.high).copied().collect();
        merged.sort_unstable();
        let mut expected = positions.clone();
        expected.sort_unstable();
        assert_eq!(merged, expected);
        assert!(split.low.iter().all(|p| !split.high.contains(p)));
        assert!(split.low.iter().all(|&p| raw[p] <= m));
        assert!(split.high.iter().all(|&p| raw[p] > m));
    }

    #[test]
    fn test_out_of_range_position() {
        let raw = [1u8, 2];
        assert!(matches!(
            mean(&[0, 5], &raw),
            Err(SmqtError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            partition(&[2], &raw, 0),
            Err(SmqtError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }
}
