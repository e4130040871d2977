//! Snap points and the sorted searches over them.
//!
//! A [`SnapIndex`] keeps the configured domain snap points alongside their
//! track percentages. Percentages are floored at zero, rounded to two decimal
//! digits so that float noise cannot separate two points that should
//! coincide, and sorted ascending.
//!
//! The search functions are free functions over any ascending slice so the
//! drag resolver can use them on either sequence. Passing an unsorted slice
//! is a caller error: debug builds assert, release builds return an
//! unspecified index.

use smallvec::SmallVec;

use crate::scale::ScaleTransform;

const PERCENTAGE_PRECISION: f64 = 100.0;

/// Index of the element closest to `target`.
///
/// Runs a classic binary search. On an exact hit the hit is returned;
/// otherwise the two elements bracketing `target` are compared and the
/// closer one wins. When both are equally close the lower one is chosen, so
/// `[0, 100]` with target `50` always yields `0`.
///
/// Returns `None` only for an empty slice.
pub fn nearest_index(sorted: &[f64], target: f64) -> Option<usize> {
    debug_assert!(sorted.is_sorted(), "snap search input must be ascending");
    let mut left: isize = 0;
    let mut right: isize = sorted.len() as isize - 1;
    while left <= right {
        let mid = (left + right) / 2;
        match sorted[mid as usize].partial_cmp(&target) {
            Some(std::cmp::Ordering::Equal) => return Some(mid as usize),
            Some(std::cmp::Ordering::Less) => left = mid + 1,
            _ => right = mid - 1,
        }
    }

    // `right` ends just below the insertion point and `left` on it.
    let below = usize::try_from(right).ok();
    let above = usize::try_from(left).ok().filter(|&i| i < sorted.len());
    match (below, above) {
        (Some(b), Some(a)) if (sorted[a] - target).abs() < (sorted[b] - target).abs() => Some(a),
        (Some(b), _) => Some(b),
        (None, a) => a,
    }
}

/// Greatest index whose element is strictly below `target`.
///
/// Falls back to `0` when no element qualifies.
pub fn last_index_below(sorted: &[f64], target: f64) -> Option<usize> {
    debug_assert!(sorted.is_sorted(), "snap search input must be ascending");
    if sorted.is_empty() {
        return None;
    }
    let below = sorted.partition_point(|&v| v < target);
    Some(below.saturating_sub(1))
}

/// Smallest index whose element is strictly above `target`.
///
/// Falls back to the last index when no element qualifies.
pub fn first_index_above(sorted: &[f64], target: f64) -> Option<usize> {
    debug_assert!(sorted.is_sorted(), "snap search input must be ascending");
    if sorted.is_empty() {
        return None;
    }
    let at_or_below = sorted.partition_point(|&v| v <= target);
    Some(at_or_below.min(sorted.len() - 1))
}

/// Snap points in domain space and their matching track percentages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapIndex {
    points: SmallVec<[f64; 16]>,
    percentages: SmallVec<[f64; 16]>,
}

impl SnapIndex {
    /// Builds the index for the given domain.
    ///
    /// `points` must be ascending. Because the transform is increasing the
    /// two sequences stay aligned: the percentage at index `i` belongs to the
    /// point at index `i`.
    pub fn new(points: &[f64], scale: &dyn ScaleTransform, min: f64, max: f64) -> Self {
        debug_assert!(points.is_sorted(), "snapping points must be ascending");
        let mut percentages: SmallVec<[f64; 16]> = points
            .iter()
            .map(|&point| {
                let percentage = scale.position_of(point, min, max).max(0.0);
                (percentage * PERCENTAGE_PRECISION).round() / PERCENTAGE_PRECISION
            })
            .collect();
        percentages.sort_by(f64::total_cmp);
        Self {
            points: SmallVec::from_slice(points),
            percentages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Domain snap points, ascending.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Track percentages of the snap points, ascending.
    pub fn percentages(&self) -> &[f64] {
        &self.percentages
    }

    /// Domain value of the snap point at `index`.
    pub fn point(&self, index: usize) -> f64 {
        self.points[index]
    }

    /// Snap point closest to a track percentage.
    pub fn nearest_index(&self, percentage: f64) -> Option<usize> {
        nearest_index(&self.percentages, percentage)
    }

    /// Last snap point strictly below a domain value.
    pub fn last_index_below(&self, value: f64) -> Option<usize> {
        last_index_below(&self.points, value)
    }

    /// First snap point strictly above a domain value.
    pub fn first_index_above(&self, value: f64) -> Option<usize> {
        first_index_above(&self.points, value)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::scale::{Linear, NaturalLog};

    #[test]
    fn nearest_prefers_exact_hits() {
        assert_eq!(nearest_index(&[0.0, 50.0, 100.0], 50.0), Some(1));
    }

    #[test]
    fn nearest_breaks_ties_toward_the_lower_index() {
        for _ in 0..3 {
            assert_eq!(nearest_index(&[0.0, 100.0], 50.0), Some(0));
        }
        assert_eq!(nearest_index(&[0.0, 10.0, 20.0, 30.0], 25.0), Some(2));
    }

    #[test]
    fn nearest_handles_targets_outside_the_slice() {
        let sorted = [10.0, 20.0, 30.0];
        assert_eq!(nearest_index(&sorted, -5.0), Some(0));
        assert_eq!(nearest_index(&sorted, 99.0), Some(2));
        assert_eq!(nearest_index(&[], 1.0), None);
        assert_eq!(nearest_index(&[7.0], 1.0), Some(0));
    }

    #[test]
    fn directional_bounds_use_strict_comparisons() {
        let sorted = [0.0, 50.0, 100.0, 200.0];
        assert_eq!(last_index_below(&sorted, 100.0), Some(1));
        assert_eq!(last_index_below(&sorted, 101.0), Some(2));
        assert_eq!(first_index_above(&sorted, 100.0), Some(3));
        assert_eq!(first_index_above(&sorted, 99.0), Some(2));
    }

    #[test]
    fn directional_bounds_fall_back_to_sentinels() {
        let sorted = [0.0, 50.0, 100.0];
        assert_eq!(last_index_below(&sorted, 0.0), Some(0));
        assert_eq!(last_index_below(&sorted, -10.0), Some(0));
        assert_eq!(first_index_above(&sorted, 100.0), Some(2));
        assert_eq!(first_index_above(&sorted, 500.0), Some(2));
        assert_eq!(last_index_below(&[], 1.0), None);
        assert_eq!(first_index_above(&[], 1.0), None);
    }

    #[test]
    fn index_rounds_and_floors_percentages() {
        let index = SnapIndex::new(&[-100.0, 0.0, 100.0, 800.0], &Linear, 0.0, 300.0);
        assert_eq!(index.percentages(), &[0.0, 0.0, 33.33, 266.67]);
        assert_eq!(index.points(), &[-100.0, 0.0, 100.0, 800.0]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn index_follows_non_linear_transforms() {
        let index = SnapIndex::new(&[0.0, 9.0, 99.0], &NaturalLog, 0.0, 99.0);
        assert_eq!(index.percentages(), &[0.0, 50.0, 100.0]);
        assert_eq!(index.nearest_index(60.0), Some(1));
        assert_eq!(index.point(1), 9.0);
    }

    fn linear_nearest(sorted: &[f64], target: f64) -> usize {
        let mut best = 0;
        for (i, &v) in sorted.iter().enumerate() {
            if (v - target).abs() < (sorted[best] - target).abs() {
                best = i;
            }
        }
        best
    }

    proptest! {
        #[test]
        fn nearest_is_as_close_as_a_linear_scan(
            mut values in prop::collection::vec(0u32..1_000, 1..40),
            target in 0u32..1_000,
        ) {
            values.sort_unstable();
            values.dedup();
            let sorted: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
            let target = f64::from(target) + 0.25;
            let found = nearest_index(&sorted, target).unwrap();
            let expected = linear_nearest(&sorted, target);
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn directional_bounds_match_scans(
            mut values in prop::collection::vec(0u32..100, 1..40),
            target in 0u32..100,
        ) {
            values.sort_unstable();
            let sorted: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
            let target = f64::from(target);
            let below = sorted.iter().rposition(|&v| v < target).unwrap_or(0);
            let above = sorted.iter().position(|&v| v > target).unwrap_or(sorted.len() - 1);
            prop_assert_eq!(last_index_below(&sorted, target), Some(below));
            prop_assert_eq!(first_index_above(&sorted, target), Some(above));
        }
    }
}
