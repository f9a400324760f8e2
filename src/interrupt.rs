//! Underflow interrupts
//!
//! `handle_interrupt` runs in the interrupt context, concurrently with the
//! control path. It only ever touches `INT_STATUS`, and only clears bits it
//! observed set, so events latched after its read survive for the next pass.

use crate::device::MixerDevice;
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::regs::{assign, int_bits, mxr_reg};
use crate::runtime::PollDelay;
use crate::window::RegisterWindow;
use crate::Layer;

impl Layer {
    /// Underflow bit in `INT_EN` and `INT_STATUS`
    pub(crate) const fn underflow_bit(&self) -> u32 {
        match self {
            Layer::Video => int_bits::VP,
            Layer::Graphics0 => int_bits::GRP0,
            Layer::Graphics1 => int_bits::GRP1,
        }
    }
}

/// Outcome of one interrupt pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptReport {
    acknowledged: u32,
}

impl InterruptReport {
    /// Bits written back to `INT_STATUS`; zero when nothing fired
    pub fn acknowledged(&self) -> u32 {
        self.acknowledged
    }

    /// Whether `layer` reported a FIFO underflow
    pub fn underflowed(&self, layer: Layer) -> bool {
        self.acknowledged & layer.underflow_bit() != 0
    }

    /// The interrupt is always claimed, whatever was found
    pub fn handled(&self) -> bool {
        true
    }
}

impl<W: RegisterWindow, S: DiagnosticSink, D: PollDelay> MixerDevice<W, S, D> {
    /// Mask or unmask a layer's underflow interrupt
    pub fn set_underflow_interrupt_enable(&mut self, layer: Layer, enable: bool) {
        log::debug!("set_underflow_interrupt_enable({:?}, {})", layer, enable);
        self.modify(mxr_reg::INT_EN, |reg| {
            assign(reg, layer.underflow_bit(), enable)
        });
    }

    /// Clear every fired bit the driver knows about
    pub fn clear_all_pending(&mut self) {
        self.write(mxr_reg::INT_STATUS, int_bits::ALL_FIRED);
    }

    /// Service a mixer interrupt
    ///
    /// Reads `INT_STATUS` once. When the mixer-fired bit is set, reports an
    /// underflow for each asserted source and acknowledges exactly those bits
    /// plus the mixer-fired bit. Otherwise nothing is written.
    pub fn handle_interrupt(&self) -> InterruptReport {
        let status = self.read(mxr_reg::INT_STATUS);
        if status & int_bits::MXR_FIRED == 0 {
            return InterruptReport::default();
        }

        let mut acknowledged = int_bits::MXR_FIRED;
        for layer in Layer::ALL {
            let bit = layer.underflow_bit();
            if status & bit != 0 {
                self.report(Diagnostic::Underflow(layer));
                acknowledged |= bit;
            }
        }

        self.write(mxr_reg::INT_STATUS, acknowledged);
        InterruptReport { acknowledged }
    }
}
