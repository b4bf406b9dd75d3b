// 💵 Money helpers
// Amounts stay at full precision inside the engine; rounding happens only
// when a result is prepared for display.

/// Flat fee the wallet charges on every outgoing transfer.
pub const OUTGOING_TRANSFER_FEE: f64 = 0.5;

/// Round to two decimal places (cents), half away from zero
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a rate to basis-point precision (four decimal places)
pub fn round_rate(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Amount that actually leaves the balance for an outgoing transfer
pub fn with_transfer_fee(amount: f64) -> f64 {
    amount + OUTGOING_TRANSFER_FEE
}
