//! Rolling statistics over bounded price windows
//!
//! Provides the only cross-tick state strategies keep: a FIFO window of
//! recent samples with mean, sample standard deviation and z-score.
//!
//! # Design
//!
//! - Decimal arithmetic end to end, so results are reproducible
//! - Sample (n-1) variance
//! - Degenerate inputs resolve to neutral values instead of errors:
//!   fewer than 2 samples gives no variance, zero spread gives a zero z-score

mod rolling;

pub use rolling::RollingStats;

use rust_decimal::{Decimal, MathematicalOps};

/// Calculate mean
#[inline]
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    mean_of(values.iter())
}

/// Sample variance (n-1 denominator), `None` below 2 values
pub fn sample_variance(values: &[Decimal]) -> Option<Decimal> {
    variance_of(values.iter())
}

pub(crate) fn mean_of<'a, I>(values: I) -> Option<Decimal>
where
    I: ExactSizeIterator<Item = &'a Decimal>,
{
    let n = values.len();
    if n == 0 {
        return None;
    }
    let sum: Decimal = values.sum();
    Some(sum / Decimal::from(n))
}

pub(crate) fn variance_of<'a, I>(values: I) -> Option<Decimal>
where
    I: ExactSizeIterator<Item = &'a Decimal> + Clone,
{
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean_of(values.clone())?;
    let sum_sq_diff: Decimal = values
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum();
    Some(sum_sq_diff / Decimal::from(n - 1))
}

/// Sample standard deviation, `None` below 2 values
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    sample_variance(values).map(sqrt)
}

/// Square root that never fails: negative input (rounding noise) maps to zero
#[inline]
pub fn sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value.sqrt().unwrap_or(Decimal::ZERO)
}

/// (value - mean) / std_dev, short-circuiting to zero when std_dev is zero
#[inline]
pub fn z_score(value: Decimal, mean: Decimal, std_dev: Decimal) -> Decimal {
    if std_dev.is_zero() {
        return Decimal::ZERO;
    }
    (value - mean) / std_dev
}
