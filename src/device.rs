//! The mixer device handle
//!
//! `MixerDevice` is an explicit handle passed to every operation instead of a
//! process-wide register base. The operations themselves live next to their
//! concern (`layer`, `config`, `runtime`, `interrupt`) as further `impl`
//! blocks on this type.

use crate::diag::{Diagnostic, DiagnosticSink, LogSink};
use crate::regs::REGISTER_NAMES;
use crate::runtime::{PollDelay, SpinDelay};
use crate::scaling::{self, Axis};
use crate::window::RegisterWindow;

/// Handle to one mixer register block
pub struct MixerDevice<W, S = LogSink, D = SpinDelay> {
    window: W,
    sink: S,
    pub(crate) delay: D,
}

impl<W: RegisterWindow> MixerDevice<W> {
    /// Drive the mixer behind `window`, logging diagnostics and spinning
    /// between stop polls
    pub fn new(window: W) -> Self {
        Self::with_hooks(window, LogSink, SpinDelay)
    }
}

impl<W: RegisterWindow, S: DiagnosticSink, D: PollDelay> MixerDevice<W, S, D> {
    /// Drive the mixer with a custom diagnostic sink and stop-poll delay
    pub fn with_hooks(window: W, sink: S, delay: D) -> Self {
        Self {
            window,
            sink,
            delay,
        }
    }

    /// The register window
    pub fn window(&self) -> &W {
        &self.window
    }

    /// The diagnostic sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Release the window back to its owner
    pub fn into_window(self) -> W {
        self.window
    }

    #[inline]
    pub(crate) fn read(&self, offset: usize) -> u32 {
        self.window.read(offset)
    }

    #[inline]
    pub(crate) fn write(&self, offset: usize, value: u32) {
        log::trace!("write {:#06x} <- {:#010x}", offset, value);
        self.window.write(offset, value);
    }

    #[inline]
    pub(crate) fn modify<F: FnOnce(u32) -> u32>(&self, offset: usize, f: F) {
        let value = f(self.window.read(offset));
        self.write(offset, value);
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// Scale code for one axis of a graphics layer, reporting ratios the
    /// scaler cannot do
    pub fn scaling_factor(&self, source: u32, destination: u32, axis: Axis) -> u32 {
        if let Some(diagnostic) = scaling::unsupported_scale(source, destination, axis) {
            self.report(diagnostic);
        }
        scaling::compute_scaling_factor(source, destination, axis)
    }

    /// Log every named register at debug level
    pub fn dump_registers(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        for (name, offset) in REGISTER_NAMES {
            log::debug!("{:<16} {:#010x}", name, self.read(*offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::mxr_reg;
    use crate::sim::{RecordingSink, SimWindow};

    #[test]
    fn test_modify_is_read_modify_write() {
        let sim = SimWindow::new();
        sim.poke(mxr_reg::BG_CFG, 0xF0);
        let dev = MixerDevice::new(&sim);

        dev.modify(mxr_reg::BG_CFG, |v| v | 0x01);

        assert_eq!(sim.peek(mxr_reg::BG_CFG), 0xF1);
        assert_eq!(sim.writes(), vec![(mxr_reg::BG_CFG, 0xF1)]);
    }

    #[test]
    fn test_scaling_factor_reports_odd_ratio() {
        let sim = SimWindow::new();
        let sink = RecordingSink::default();
        let dev = MixerDevice::with_hooks(&sim, &sink, SpinDelay);

        assert_eq!(dev.scaling_factor(100, 300, Axis::Vertical), 0);
        assert_eq!(dev.scaling_factor(100, 100, Axis::Vertical), 0);
        assert_eq!(dev.scaling_factor(100, 400, Axis::Horizontal), 2);

        assert_eq!(
            sink.take(),
            vec![
                Diagnostic::UnsupportedScale {
                    axis: Axis::Vertical,
                    source: 100,
                    destination: 300,
                },
                Diagnostic::UnsupportedScale {
                    axis: Axis::Vertical,
                    source: 100,
                    destination: 100,
                },
            ]
        );
    }

    #[test]
    fn test_scaling_factor_reports_equal_dimensions() {
        let sim = SimWindow::new();
        let sink = RecordingSink::default();
        let dev = MixerDevice::with_hooks(&sim, &sink, SpinDelay);

        assert_eq!(dev.scaling_factor(100, 100, Axis::Horizontal), 0);

        assert_eq!(
            sink.take(),
            vec![Diagnostic::UnsupportedScale {
                axis: Axis::Horizontal,
                source: 100,
                destination: 100,
            }]
        );
    }

    #[test]
    fn test_dump_registers_only_reads() {
        let _ = env_logger::builder().is_test(true).try_init();
        let sim = SimWindow::new();
        let dev = MixerDevice::new(&sim);

        dev.dump_registers();

        assert!(sim.writes().is_empty());
    }

    #[test]
    fn test_into_window_returns_window() {
        let sim = SimWindow::new();
        let dev = MixerDevice::new(&sim);
        let window = dev.into_window();
        assert!(core::ptr::eq(window, &sim));
    }
}
