use rust_decimal::Decimal;

/// Price value - fixed-point Decimal, covers both integer tick and fractional domains
pub type Price = Decimal;

/// Quantity value - whole lots, signed where it describes a position or an order
pub type Quantity = i64;

/// Identifier for a tradeable instrument (e.g. "ABRA")
pub type InstrumentId = String;
