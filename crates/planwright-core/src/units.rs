//! Display conversion from model units (inches) to feet and inches.

/// Inches per foot.
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Format a model length as `"F ft I in"`.
///
/// Operates on the absolute value; both components are floored.
pub fn format_feet_inches(value: f64) -> String {
    let value = value.abs();
    let feet = (value / INCHES_PER_FOOT).floor();
    let inches = value - feet * INCHES_PER_FOOT;
    format!("{} ft {} in", feet as i64, inches.floor() as i64)
}
