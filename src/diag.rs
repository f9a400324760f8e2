//! Driver diagnostics
//!
//! Conditions that are worth reporting but are not errors of the call that
//! hit them: a stop that never saw the hardware settle, a scale ratio the
//! scaler cannot do, a FIFO underflow. They go to a `DiagnosticSink`; the
//! default sink forwards them to the `log` facade.

use crate::scaling::Axis;
use crate::Layer;

/// A reportable driver condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// `stop()` exhausted its poll budget with the run bit still set
    HardwareTimeout { polls: u32 },
    /// Destination is not 2x, 4x or 8x the source; no hardware scaling used
    UnsupportedScale {
        axis: Axis,
        source: u32,
        destination: u32,
    },
    /// A layer's pixel FIFO ran dry
    Underflow(Layer),
    /// Raw CSC preset code that names no preset
    UnknownCscType(u32),
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Diagnostic::HardwareTimeout { polls } => {
                write!(f, "STATUS run bit still set after {} polls", polls)
            }
            Diagnostic::UnsupportedScale {
                axis,
                source,
                destination,
            } => write!(
                f,
                "can't {} scale {} into {}: scaling vector must be 2/4/8x",
                axis, source, destination
            ),
            Diagnostic::Underflow(Layer::Video) => write!(f, "VP fifo under run"),
            Diagnostic::Underflow(Layer::Graphics0) => write!(f, "GRP0 fifo under run"),
            Diagnostic::Underflow(Layer::Graphics1) => write!(f, "GRP1 fifo under run"),
            Diagnostic::UnknownCscType(code) => write!(f, "invalid csc_type parameter = {}", code),
        }
    }
}

/// Receiver for driver diagnostics
///
/// Takes `&self` so the interrupt path can report through a shared device.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards to `log`, which discards everything until the
/// application installs a logger
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    /// Level a diagnostic is logged at
    ///
    /// Equal source and destination is the common no-scale case and stays at
    /// debug; other unusable ratios warn; everything else is an error.
    pub fn level(diagnostic: &Diagnostic) -> log::Level {
        match *diagnostic {
            Diagnostic::UnsupportedScale {
                source,
                destination,
                ..
            } if source == destination => log::Level::Debug,
            Diagnostic::UnsupportedScale { .. } => log::Level::Warn,
            _ => log::Level::Error,
        }
    }
}

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::log!(Self::level(&diagnostic), "{}", diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}
