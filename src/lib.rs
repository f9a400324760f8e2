//! # S5PV210 TV-Out Video Mixer Driver
//!
//! Register-level control of the S5PV210 video mixer, which composites one
//! motion-video plane and two graphics planes into a single display frame
//! for the SDO (analog) or HDMI output path.
//!
//! ## Architecture
//!
//! ```text
//!   Orchestrator (maps window, owns IRQ line)
//!        │                         │
//!        ▼                         ▼
//! ┌──────────────────┐   ┌──────────────────┐
//! │   MixerDevice    │   │ handle_interrupt │
//! │ config / layer / │   │  (INT_STATUS     │
//! │ runtime control  │   │   only)          │
//! └────────┬─────────┘   └────────┬─────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!            ┌─────────────────┐
//!            │ RegisterWindow  │
//!            └────────┬────────┘
//!                     ▼
//!              Mixer registers
//! ```
//!
//! ## Call discipline
//!
//! - `init_*` and `set_display_mode` are issued while the mixer is stopped.
//! - `set_*` layer operations are issued while the mixer is running.
//! - Control calls are serialized by the caller; the interrupt handler only
//!   ever writes `INT_STATUS`.
//!
//! None of this is enforced in software. All mixer state lives in hardware
//! registers; `MixerDevice` holds nothing but the window and its hooks.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod device;
pub mod diag;
pub mod interrupt;
pub mod layer;
#[cfg(feature = "std")]
pub mod profile;
pub mod regs;
pub mod runtime;
pub mod scaling;
pub mod window;

#[cfg(test)]
pub(crate) mod sim;

// Re-exports
pub use config::{
    BackgroundColorSlot, BurstMode, ColorFormat, CscComponent, CscRange, CscType, DisplayMode,
    Endian, LayerConfig, ModeFamily, OutputMode,
};
pub use device::MixerDevice;
pub use diag::{Diagnostic, DiagnosticSink, LogSink};
pub use interrupt::InterruptReport;
pub use layer::{GraphicsControl, LayerInfo};
#[cfg(feature = "std")]
pub use profile::MixerProfile;
pub use runtime::{PollDelay, RunState, SpinDelay, STOP_POLL_BUDGET};
pub use scaling::{compute_scaling_factor, Axis};
pub use window::{MmioWindow, RegisterWindow};

use serde::Deserialize;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Compositing plane addressed by a layer-scoped call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum Layer {
    /// Motion-video plane fed by the video processor
    Video = 0,
    /// First graphics plane
    Graphics0 = 1,
    /// Second graphics plane
    Graphics1 = 2,
}

impl Layer {
    /// All layers, in register order
    pub const ALL: [Layer; 3] = [Layer::Video, Layer::Graphics0, Layer::Graphics1];

    /// True for the two graphics planes
    pub const fn is_graphics(&self) -> bool {
        matches!(self, Layer::Graphics0 | Layer::Graphics1)
    }
}

impl TryFrom<u32> for Layer {
    type Error = MixerError;

    fn try_from(code: u32) -> MixerResult<Self> {
        match code {
            0 => Ok(Layer::Video),
            1 => Ok(Layer::Graphics0),
            2 => Ok(Layer::Graphics1),
            _ => {
                log::error!("invalid layer parameter = {}", code);
                Err(MixerError::InvalidParameter)
            }
        }
    }
}

/// Mixer error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MixerError {
    /// Unrecognized layer, mode, output mode, color slot or CSC component,
    /// or a graphics-only operation aimed at the video layer
    #[error("invalid parameter")]
    InvalidParameter,
    /// Graphics base address is not a multiple of the bus word size
    #[error("base address {0:#010x} is not word aligned")]
    UnalignedAddress(u32),
    /// The stop sequence did not observe the run bit clear
    #[error("mixer still running after {0} status polls")]
    HardwareTimeout(u32),
}

/// Result type for mixer operations
pub type MixerResult<T> = Result<T, MixerError>;
