//! Register window access
//!
//! The mixer core never maps or unmaps registers. It is handed a live window
//! by whoever owns the platform resources and only issues 32-bit reads and
//! writes at named offsets.

use core::ptr::{read_volatile, write_volatile};

/// A word-addressable window onto the mixer registers
///
/// Writes take `&self`: device registers are shared state by nature, and the
/// interrupt path writes `INT_STATUS` through the same window the control
/// path uses.
pub trait RegisterWindow {
    /// Read the 32-bit register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write the 32-bit register at `offset`
    fn write(&self, offset: usize, value: u32);
}

impl<W: RegisterWindow + ?Sized> RegisterWindow for &W {
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}

/// Volatile MMIO window over an already-mapped register block
#[derive(Debug)]
pub struct MmioWindow {
    base: usize,
}

impl MmioWindow {
    /// Wrap a mapped register block
    ///
    /// # Safety
    /// `base` must be the virtual address of the mapped mixer registers and
    /// stay mapped for as long as this window (or anything borrowing it)
    /// is alive.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl RegisterWindow for MmioWindow {
    #[inline]
    fn read(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write(&self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}
