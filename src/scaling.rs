//! Graphics plane scale factors
//!
//! The graphics scaler only does integer up-scaling by 2, 4 or 8. The code
//! written to `GRAPHICn_WH` is 1, 2 or 3 for those ratios and 0 otherwise.

use core::fmt;

use crate::diag::Diagnostic;

/// Scaling direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// Scale code for no hardware scaling
pub const SCALE_NONE: u32 = 0;

/// Hardware scale code for `source` pixels stretched to `destination`
///
/// The ratio is the integer quotient `destination / source`; only an exact
/// quotient of 2, 4 or 8 selects a scale code. A truncated quotient still
/// counts, so 100 -> 250 scales 2x. A zero source never scales.
pub fn compute_scaling_factor(source: u32, destination: u32, _axis: Axis) -> u32 {
    match destination.checked_div(source) {
        Some(2) => 1,
        Some(4) => 2,
        Some(8) => 3,
        _ => SCALE_NONE,
    }
}

/// Diagnostic for every ratio that leaves the scaler off, equal dimensions
/// included
pub fn unsupported_scale(source: u32, destination: u32, axis: Axis) -> Option<Diagnostic> {
    if compute_scaling_factor(source, destination, axis) == SCALE_NONE {
        Some(Diagnostic::UnsupportedScale {
            axis,
            source,
            destination,
        })
    } else {
        None
    }
}
