//! Position-aware order sizing
//!
//! Converts a directional signal into a bounded order quantity. Every order
//! a policy emits goes through [`PositionLimit::clamp`], so a complete fill
//! can never push the position past the configured limit.

use helix_core::{Quantity, Side};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Maximum absolute signed position for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionLimit(Quantity);

impl PositionLimit {
    pub fn new(limit: Quantity) -> Self {
        Self(limit.abs())
    }

    pub fn value(&self) -> Quantity {
        self.0
    }

    /// Whether any quantity can still be traded on `side`
    pub fn allows(&self, side: Side, position: Quantity) -> bool {
        match side {
            Side::Buy => position < self.0,
            Side::Sell => position > -self.0,
        }
    }

    /// Lots that can be traded on `side` before hitting the limit
    pub fn headroom(&self, side: Side, position: Quantity) -> Quantity {
        let room = match side {
            Side::Buy => self.0 - position,
            Side::Sell => self.0 + position,
        };
        room.max(0)
    }

    /// Clamp `desired` lots to the headroom on `side`.
    ///
    /// Returns the signed order quantity, or `None` when nothing is left to
    /// trade (a zero-lot order is never emitted).
    pub fn clamp(&self, side: Side, desired: Quantity, position: Quantity) -> Option<Quantity> {
        let size = desired.min(self.headroom(side, position));
        if size <= 0 {
            return None;
        }
        Some(size * side.sign())
    }

    /// |position| / limit, 1 for a zero limit
    pub fn utilization(&self, position: Quantity) -> Decimal {
        if self.0 == 0 {
            return Decimal::ONE;
        }
        Decimal::from(position.abs()) / Decimal::from(self.0)
    }
}

/// Strength of the signal behind an order, used by confidence sizing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalStrength {
    /// Raw signal (deviation, momentum...)
    pub magnitude: Decimal,
    /// Volatility the signal is measured against
    pub volatility: Decimal,
}

impl SignalStrength {
    pub fn new(magnitude: Decimal, volatility: Decimal) -> Self {
        Self {
            magnitude,
            volatility,
        }
    }
}

/// How the base order size is scaled before the limit clamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingPolicy {
    /// Always `base` lots
    Fixed { base: Quantity },
    /// `base * (1 - |position| / limit)`: shrinks towards zero as inventory builds
    InventoryScaled { base: Quantity },
    /// `base * min(max_multiplier, |magnitude| / volatility)`, multiplier 1 without volatility
    ConfidenceScaled {
        base: Quantity,
        max_multiplier: Decimal,
    },
}

impl SizingPolicy {
    /// Unclamped size in lots, truncated toward zero
    pub fn raw_size(&self, position: Quantity, limit: PositionLimit, signal: SignalStrength) -> Quantity {
        match *self {
            SizingPolicy::Fixed { base } => base,
            SizingPolicy::InventoryScaled { base } => {
                let factor = Decimal::ONE - limit.utilization(position);
                to_lots(Decimal::from(base) * factor)
            }
            SizingPolicy::ConfidenceScaled {
                base,
                max_multiplier,
            } => {
                let multiplier = if signal.volatility > Decimal::ZERO {
                    (signal.magnitude.abs() / signal.volatility).min(max_multiplier)
                } else {
                    Decimal::ONE
                };
                to_lots(Decimal::from(base) * multiplier)
            }
        }
    }

    /// Signed, limit-clamped order quantity for `side`, `None` if it rounds to nothing
    pub fn order_quantity(
        &self,
        side: Side,
        position: Quantity,
        limit: PositionLimit,
        signal: SignalStrength,
    ) -> Option<Quantity> {
        if !limit.allows(side, position) {
            return None;
        }
        let size = self.raw_size(position, limit, signal);
        limit.clamp(side, size, position)
    }
}

/// Signed quantity that moves `position` toward flat by at most `max_step` lots
pub fn reduce_toward_flat(position: Quantity, max_step: Quantity) -> Option<Quantity> {
    let size = max_step.min(position.abs());
    if size <= 0 {
        return None;
    }
    Some(-position.signum() * size)
}

/// Truncate a decimal lot count toward zero
pub fn to_lots(value: Decimal) -> Quantity {
    value.trunc().to_i64().unwrap_or(0)
}
