//! Physical unit conversions
//!
//! Label geometry is authored in millimeters or inches; the document space
//! is PDF points (1/72 inch) and device space is printer dots at a given
//! resolution. Conversions are pure - malformed input is a caller contract
//! violation, not a runtime check.

/// Physical measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Mm,
    Inch,
}

pub const MM_PER_INCH: f32 = 25.4;
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert a physical measurement to PDF points (1/72 inch)
pub fn to_points(value: f32, unit: Unit) -> f32 {
    match unit {
        Unit::Mm => value / MM_PER_INCH * POINTS_PER_INCH,
        Unit::Inch => value * POINTS_PER_INCH,
    }
}

/// Convert a physical measurement to device dots at the given resolution
pub fn to_dots(value: f32, unit: Unit, dpi: f32) -> f32 {
    match unit {
        Unit::Mm => value / MM_PER_INCH * dpi,
        Unit::Inch => value * dpi,
    }
}

/// Convert PDF points back to millimeters
pub fn points_to_mm(points: f32) -> f32 {
    points / POINTS_PER_INCH * MM_PER_INCH
}
