//! Bounded rolling window with sample statistics

use super::{mean_of, sqrt, variance_of, z_score};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling statistics over the most recent `capacity` samples.
///
/// Append-only with oldest-first eviction once full. The window is the
/// whole of a strategy's cross-tick memory, so it is owned by exactly one
/// strategy instance and mutated once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    /// Values in the window, oldest first
    values: VecDeque<Decimal>,
    /// Maximum number of samples kept
    capacity: usize,
}

impl RollingStats {
    /// Create a new rolling window holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a sample, evicting the oldest one when the window is full
    #[inline]
    pub fn push(&mut self, value: Decimal) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Mean of the window
    pub fn mean(&self) -> Option<Decimal> {
        mean_of(self.values.iter())
    }

    /// Sample variance of the window, `None` below 2 samples
    pub fn variance(&self) -> Option<Decimal> {
        variance_of(self.values.iter())
    }

    /// Sample standard deviation of the window, `None` below 2 samples
    pub fn std_dev(&self) -> Option<Decimal> {
        self.variance().map(sqrt)
    }

    /// Z-score of `value` against the window.
    ///
    /// Zero when there are fewer than 2 samples or the window has no spread.
    pub fn z_score(&self, value: Decimal) -> Decimal {
        match (self.mean(), self.std_dev()) {
            (Some(mean), Some(std)) => z_score(value, mean, std),
            _ => Decimal::ZERO,
        }
    }

    /// Mean of the newest `n` samples (or of all of them if fewer)
    pub fn mean_of_last(&self, n: usize) -> Option<Decimal> {
        mean_of(self.values.iter().skip(self.skip_for(n)))
    }

    /// Sample variance of the newest `n` samples (or of all of them if fewer)
    pub fn variance_of_last(&self, n: usize) -> Option<Decimal> {
        variance_of(self.values.iter().skip(self.skip_for(n)))
    }

    fn skip_for(&self, n: usize) -> usize {
        self.values.len().saturating_sub(n)
    }

    /// Newest sample
    #[inline]
    pub fn last(&self) -> Option<Decimal> {
        self.values.back().copied()
    }

    /// Oldest sample
    #[inline]
    pub fn first(&self) -> Option<Decimal> {
        self.values.front().copied()
    }

    /// Sample `k` positions before the newest one (`nth_back(0)` is the newest)
    #[inline]
    pub fn nth_back(&self, k: usize) -> Option<Decimal> {
        let len = self.values.len();
        if k >= len {
            return None;
        }
        self.values.get(len - 1 - k).copied()
    }

    /// Get number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if window is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// Get the window capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Decimal> {
        self.values.iter()
    }

    /// Clear all values
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rolling_stats_mean() {
        let mut stats = RollingStats::new(5);

        for i in 1..=5 {
            stats.push(Decimal::from(i));
        }

        assert!(stats.is_full());
        assert_eq!(stats.mean(), Some(dec!(3)));

        // Add one more, window shifts
        stats.push(dec!(6));
        assert_eq!(stats.len(), 5);
        assert_eq!(stats.mean(), Some(dec!(4)));
    }

    #[test]
    fn test_capacity_never_exceeded_and_fifo() {
        let mut stats = RollingStats::new(3);
        for i in 0..100 {
            stats.push(Decimal::from(i));
            assert!(stats.len() <= 3);
        }
        let kept: Vec<Decimal> = stats.iter().copied().collect();
        assert_eq!(kept, vec![dec!(97), dec!(98), dec!(99)]);
        assert_eq!(stats.first(), Some(dec!(97)));
        assert_eq!(stats.last(), Some(dec!(99)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut stats = RollingStats::new(0);
        stats.push(dec!(1));
        stats.push(dec!(2));
        assert_eq!(stats.capacity(), 1);
        assert_eq!(stats.last(), Some(dec!(2)));
    }

    #[test]
    fn test_insufficient_samples() {
        let mut stats = RollingStats::new(10);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.std_dev(), None);
        assert_eq!(stats.z_score(dec!(5)), Decimal::ZERO);

        stats.push(dec!(5));
        assert_eq!(stats.mean(), Some(dec!(5)));
        assert_eq!(stats.variance(), None);
        assert_eq!(stats.z_score(dec!(7)), Decimal::ZERO);
    }

    #[test]
    fn test_variance_constant() {
        let mut stats = RollingStats::new(5);

        // All same values -> variance = 0, z-score neutral
        for _ in 0..5 {
            stats.push(dec!(100));
        }
        assert_eq!(stats.variance(), Some(Decimal::ZERO));
        assert_eq!(stats.std_dev(), Some(Decimal::ZERO));
        assert_eq!(stats.z_score(dec!(250)), Decimal::ZERO);
    }

    #[test]
    fn test_variance_varying() {
        let mut stats = RollingStats::new(5);
        for v in [1, 2, 3, 4, 5] {
            stats.push(Decimal::from(v));
        }
        assert_eq!(stats.variance(), Some(dec!(2.5)));
    }

    #[test]
    fn test_z_score() {
        let mut stats = RollingStats::new(10);

        for v in [98, 99, 100, 101, 102, 99, 100, 101, 100, 99] {
            stats.push(Decimal::from(v));
        }

        // Z-score of the mean is zero
        let mean = stats.mean().unwrap();
        assert_eq!(stats.z_score(mean), Decimal::ZERO);

        // Extreme value is far out
        assert!(stats.z_score(dec!(110)) > dec!(5));
        assert!(stats.z_score(dec!(90)) < dec!(-5));
    }

    #[test]
    fn test_tail_statistics() {
        let mut stats = RollingStats::new(10);
        for v in [50, 50, 50, 10, 20, 30] {
            stats.push(Decimal::from(v));
        }
        assert_eq!(stats.mean_of_last(3), Some(dec!(20)));
        assert_eq!(stats.variance_of_last(3), Some(dec!(100)));
        // Asking for more than available uses everything
        assert_eq!(stats.mean_of_last(100), stats.mean());
    }

    #[test]
    fn test_nth_back() {
        let mut stats = RollingStats::new(4);
        for v in [1, 2, 3, 4, 5] {
            stats.push(Decimal::from(v));
        }
        assert_eq!(stats.nth_back(0), Some(dec!(5)));
        assert_eq!(stats.nth_back(3), Some(dec!(2)));
        assert_eq!(stats.nth_back(4), None);
    }

    #[test]
    fn test_rolling_clear() {
        let mut stats = RollingStats::new(5);
        stats.push(dec!(1));
        assert!(!stats.is_empty());

        stats.clear();
        assert!(stats.is_empty());
        assert!(stats.mean().is_none());
    }
}
