//! Mixer profiles
//!
//! A profile is the full stopped-state setup of the mixer in one TOML file:
//!
//! ```toml
//! csc = "yuv709_limited"
//!
//! [status]
//! burst = "burst16"
//! endian = "little"
//!
//! [display]
//! mode = "hd1080i60"
//! output = "hdmi"
//!
//! [[background]]
//! slot = "color0"
//! y = 16
//! cb = 128
//! cr = 128
//!
//! [[layers]]
//! layer = "graphics0"
//! show = true
//! alpha = 255
//! priority = 2
//! color_format = "argb8888"
//! base_address = 0x48000000
//! span = 1920
//! width = 1920
//! height = 1080
//! dst_width = 1920
//! dst_height = 1080
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::{
    BackgroundColorSlot, BurstMode, CscType, DisplayMode, Endian, LayerConfig, OutputMode,
};
use crate::device::MixerDevice;
use crate::diag::DiagnosticSink;
use crate::runtime::PollDelay;
use crate::window::RegisterWindow;
use crate::{Layer, MixerResult};

/// Number of background color registers
const BACKGROUND_SLOTS: usize = 3;

/// Status register setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusSetup {
    pub burst: BurstMode,
    pub endian: Endian,
}

/// Display timing and output routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySetup {
    pub mode: DisplayMode,
    pub output: OutputMode,
}

/// Background dither enables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DitherSetup {
    pub cr: bool,
    pub cb: bool,
    pub y: bool,
}

/// One background color register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackgroundSetup {
    pub slot: BackgroundColorSlot,
    pub y: u8,
    pub cb: u8,
    pub cr: u8,
}

/// One `init_layer` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LayerSetup {
    pub layer: Layer,
    #[serde(flatten)]
    pub config: LayerConfig,
}

/// Complete stopped-state mixer setup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixerProfile {
    pub status: StatusSetup,
    pub display: DisplaySetup,
    /// Canned CSC preset; coefficients are left alone when absent
    #[serde(default)]
    pub csc: Option<CscType>,
    #[serde(default)]
    pub dither: DitherSetup,
    #[serde(default)]
    pub background: Vec<BackgroundSetup>,
    #[serde(default)]
    pub layers: Vec<LayerSetup>,
}

impl MixerProfile {
    /// Parse a profile from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let profile: Self = toml::from_str(content).context("Failed to parse mixer profile")?;

        if profile.background.len() > BACKGROUND_SLOTS {
            anyhow::bail!(
                "Mixer profile sets {} background colors, hardware has {}",
                profile.background.len(),
                BACKGROUND_SLOTS
            );
        }

        Ok(profile)
    }

    /// Read and parse a profile file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mixer profile: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid mixer profile: {}", path.display()))
    }
}

impl<W: RegisterWindow, S: DiagnosticSink, D: PollDelay> MixerDevice<W, S, D> {
    /// Program a whole profile into a stopped mixer
    ///
    /// Applies status, display mode, CSC preset, dither, background colors
    /// and then each layer in file order. The first failing layer aborts the
    /// sequence; registers already written keep their new values.
    pub fn apply_profile(&mut self, profile: &MixerProfile) -> MixerResult<()> {
        log::info!(
            "applying mixer profile: {:?} on {:?}, {} layers",
            profile.display.mode,
            profile.display.output,
            profile.layers.len()
        );

        self.init_status_register(profile.status.burst, profile.status.endian);
        self.set_display_mode(profile.display.mode, profile.display.output);

        if let Some(csc) = profile.csc {
            self.init_csc_coefficients_default(csc);
        }

        let dither = profile.dither;
        self.init_dither_enable(dither.cr, dither.cb, dither.y);

        for bg in &profile.background {
            self.init_background_color(bg.slot, bg.y, bg.cb, bg.cr);
        }

        for setup in &profile.layers {
            self.init_layer(profile.display.mode, setup.layer, &setup.config)?;
        }

        Ok(())
    }
}
