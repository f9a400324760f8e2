//! Run control
//!
//! The mixer has two states, stopped and running, and both live in the
//! `MIXER_START` bit of the status register. Configuration belongs in the
//! stopped state and per-layer runtime control in the running state; neither
//! is guarded in software.

use crate::device::MixerDevice;
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::regs::{mxr_reg, status_bits};
use crate::window::RegisterWindow;

/// Status polls `stop()` spends waiting for the run bit to drop
pub const STOP_POLL_BUDGET: u32 = 100;

/// Pause between two status polls
pub trait PollDelay {
    fn pause(&mut self);
}

/// Busy-wait for one spin-loop hint
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinDelay;

impl PollDelay for SpinDelay {
    #[inline]
    fn pause(&mut self) {
        core::hint::spin_loop();
    }
}

/// Mixer run state as reported by hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

impl<W: RegisterWindow, S: DiagnosticSink, D: PollDelay> MixerDevice<W, S, D> {
    /// Current run state read from the status register
    pub fn run_state(&self) -> RunState {
        if self.read(mxr_reg::STATUS) & status_bits::MIXER_START != 0 {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    /// Enable the mixer; the configuration written while stopped takes effect
    pub fn start(&mut self) {
        log::debug!("start");
        self.modify(mxr_reg::STATUS, |reg| reg | status_bits::MIXER_START);
        self.dump_registers();
    }

    /// Request a stop and wait for the hardware to acknowledge it
    ///
    /// Polls the status register at most `STOP_POLL_BUDGET` times. If the run
    /// bit is still set afterwards a `HardwareTimeout` diagnostic is reported
    /// and the call returns anyway.
    pub fn stop(&mut self) {
        log::debug!("stop");
        self.modify(mxr_reg::STATUS, |reg| reg & !status_bits::MIXER_START);

        for poll in 0..STOP_POLL_BUDGET {
            if self.read(mxr_reg::STATUS) & status_bits::MIXER_START == 0 {
                log::trace!("mixer stopped after {} polls", poll + 1);
                return;
            }
            self.delay.pause();
        }

        self.report(Diagnostic::HardwareTimeout {
            polls: STOP_POLL_BUDGET,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CountingDelay, RecordingSink, SimWindow, StopAck};

    #[test]
    fn test_start_sets_run_bit_only() {
        let sim = SimWindow::new();
        sim.poke(mxr_reg::STATUS, status_bits::RESERVED | status_bits::BURST16);
        let mut dev = MixerDevice::new(&sim);
        assert_eq!(dev.run_state(), RunState::Stopped);

        dev.start();

        assert_eq!(
            sim.writes_to(mxr_reg::STATUS),
            vec![status_bits::RESERVED | status_bits::BURST16 | status_bits::MIXER_START]
        );
        assert_eq!(dev.run_state(), RunState::Running);
    }

    #[test]
    fn test_stop_immediate_ack() {
        let sim = SimWindow::new();
        let sink = RecordingSink::default();
        let mut dev = MixerDevice::with_hooks(&sim, &sink, CountingDelay::default());
        dev.start();

        dev.stop();

        assert_eq!(dev.run_state(), RunState::Stopped);
        assert_eq!(dev.delay.pauses, 0);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_stop_waits_for_delayed_ack() {
        let sim = SimWindow::with_stop_ack(StopAck::AfterPolls(5));
        let sink = RecordingSink::default();
        let mut dev = MixerDevice::with_hooks(&sim, &sink, CountingDelay::default());
        dev.start();

        dev.stop();

        assert_eq!(dev.delay.pauses, 5);
        assert!(sink.take().is_empty());
        assert_eq!(dev.run_state(), RunState::Stopped);
    }

    #[test]
    fn test_stop_times_out_after_budget() {
        let sim = SimWindow::with_stop_ack(StopAck::Never);
        let sink = RecordingSink::default();
        let mut dev = MixerDevice::with_hooks(&sim, &sink, CountingDelay::default());
        dev.start();
        let reads_before = sim.status_reads();

        dev.stop();

        // One read for the run-bit clear, then the poll budget
        assert_eq!(sim.status_reads() - reads_before, 1 + STOP_POLL_BUDGET);
        assert_eq!(dev.delay.pauses, STOP_POLL_BUDGET);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::HardwareTimeout {
                polls: STOP_POLL_BUDGET
            }]
        );
        assert_eq!(dev.run_state(), RunState::Running);
    }

    #[test]
    fn test_stop_when_already_stopped() {
        let sim = SimWindow::with_stop_ack(StopAck::Never);
        let sink = RecordingSink::default();
        let mut dev = MixerDevice::with_hooks(&sim, &sink, CountingDelay::default());

        dev.stop();

        assert_eq!(dev.delay.pauses, 0);
        assert!(sink.take().is_empty());
    }
}
