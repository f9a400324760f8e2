//! Simulated mixer register file for unit tests

use core::cell::{Cell, RefCell};

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::regs::{mxr_reg, status_bits};
use crate::runtime::PollDelay;
use crate::window::RegisterWindow;

const WORDS: usize = mxr_reg::WINDOW_SIZE / 4;

/// How the simulated hardware acknowledges a cleared run bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopAck {
    /// Run bit reads back clear as soon as it is written clear
    Immediate,
    /// Run bit stays set for this many STATUS reads after the stop request
    AfterPolls(u32),
    /// Run bit never clears
    Never,
}

pub(crate) struct SimWindow {
    regs: RefCell<[u32; WORDS]>,
    writes: RefCell<Vec<(usize, u32)>>,
    stop_ack: StopAck,
    running: Cell<bool>,
    polls_left: Cell<u32>,
    status_reads: Cell<u32>,
}

impl SimWindow {
    pub(crate) fn new() -> Self {
        Self::with_stop_ack(StopAck::Immediate)
    }

    pub(crate) fn with_stop_ack(stop_ack: StopAck) -> Self {
        Self {
            regs: RefCell::new([0; WORDS]),
            writes: RefCell::new(Vec::new()),
            stop_ack,
            running: Cell::new(false),
            polls_left: Cell::new(0),
            status_reads: Cell::new(0),
        }
    }

    /// Set a register without logging a write
    pub(crate) fn poke(&self, offset: usize, value: u32) {
        self.regs.borrow_mut()[offset / 4] = value;
        if offset == mxr_reg::STATUS {
            self.running.set(value & status_bits::MIXER_START != 0);
        }
    }

    /// Stored register value, bypassing read side effects
    pub(crate) fn peek(&self, offset: usize) -> u32 {
        self.regs.borrow()[offset / 4]
    }

    /// Latch interrupt fired bits as hardware would
    pub(crate) fn raise(&self, bits: u32) {
        self.regs.borrow_mut()[mxr_reg::INT_STATUS / 4] |= bits;
    }

    pub(crate) fn writes(&self) -> Vec<(usize, u32)> {
        self.writes.borrow().clone()
    }

    pub(crate) fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.writes
            .borrow()
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    pub(crate) fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    pub(crate) fn status_reads(&self) -> u32 {
        self.status_reads.get()
    }
}

impl RegisterWindow for SimWindow {
    fn read(&self, offset: usize) -> u32 {
        let stored = self.peek(offset);
        if offset != mxr_reg::STATUS {
            return stored;
        }

        self.status_reads.set(self.status_reads.get() + 1);
        if self.running.get() && stored & status_bits::MIXER_START == 0 {
            if let StopAck::AfterPolls(_) = self.stop_ack {
                let left = self.polls_left.get();
                if left == 0 {
                    self.running.set(false);
                } else {
                    self.polls_left.set(left - 1);
                }
            }
        }

        if self.running.get() {
            stored | status_bits::MIXER_START
        } else {
            stored & !status_bits::MIXER_START
        }
    }

    fn write(&self, offset: usize, value: u32) {
        self.writes.borrow_mut().push((offset, value));
        let mut regs = self.regs.borrow_mut();
        match offset {
            mxr_reg::INT_STATUS => regs[offset / 4] &= !value,
            mxr_reg::STATUS => {
                regs[offset / 4] = value;
                if value & status_bits::MIXER_START != 0 {
                    self.running.set(true);
                } else if self.running.get() {
                    match self.stop_ack {
                        StopAck::Immediate => self.running.set(false),
                        StopAck::AfterPolls(n) => self.polls_left.set(n),
                        StopAck::Never => {}
                    }
                }
            }
            _ => regs[offset / 4] = value,
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    seen: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub(crate) fn take(&self) -> Vec<Diagnostic> {
        self.seen.take()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.seen.borrow_mut().push(diagnostic);
    }
}

#[derive(Default)]
pub(crate) struct CountingDelay {
    pub(crate) pauses: u32,
}

impl PollDelay for CountingDelay {
    fn pause(&mut self) {
        self.pauses += 1;
    }
}
