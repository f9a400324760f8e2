//! # Stopped-State Configuration
//!
//! Status register, display mode, background, CSC and layer initialization.
//! All of it is issued while the mixer is stopped; the hardware latches the
//! result when `start()` sets the run bit.
//!
//! ## Display mode families
//!
//! | Family   | HD | PAL/1080 | Progressive | RGB range        |
//! |----------|----|----------|-------------|------------------|
//! | NTSC     | 0  | 0        | 0           | 601, 0-255       |
//! | PAL      | 0  | 1        | 0           | 601, 0-255       |
//! | 480p     | 0  | 0        | 1           | 601, 16-235      |
//! | 576p     | 0  | 1        | 1           | 601, 16-235      |
//! | 720p     | 1  | 0        | 1           | 709, 16-235      |
//! | 1080i    | 1  | 1        | 0           | 709, 16-235      |
//! | 1080p    | 1  | 1        | 1           | 709, 16-235      |

use serde::Deserialize;

use crate::device::MixerDevice;
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::layer::GraphicsControl;
use crate::regs::{
    assign, bg_bits, cfg_bits, csc_bits, grp_geom, mxr_reg, status_bits, video_cfg,
};
use crate::runtime::PollDelay;
use crate::scaling::{Axis, SCALE_NONE};
use crate::window::RegisterWindow;
use crate::{Layer, MixerError, MixerResult};

/// Map a raw code onto a fieldless enum, failing with `InvalidParameter`
macro_rules! raw_code_conversion {
    ($ty:ident, $what:literal, [$($variant:ident),+ $(,)?]) => {
        impl TryFrom<u32> for $ty {
            type Error = MixerError;

            fn try_from(code: u32) -> MixerResult<Self> {
                $(
                    if code == $ty::$variant as u32 {
                        return Ok($ty::$variant);
                    }
                )+
                log::error!("invalid {} parameter = {}", $what, code);
                Err(MixerError::InvalidParameter)
            }
        }
    };
}

// ============================================================================
// STATUS REGISTER
// ============================================================================

/// DMA burst length of the mixer's memory reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum BurstMode {
    Burst8 = 0,
    Burst16 = 1,
}

raw_code_conversion!(BurstMode, "burst", [Burst8, Burst16]);

/// Byte order of source pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum Endian {
    Big = 0,
    Little = 1,
}

raw_code_conversion!(Endian, "endian", [Big, Little]);

// ============================================================================
// DISPLAY / OUTPUT MODES
// ============================================================================

/// Broadcast standard the mixer is timed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum DisplayMode {
    NtscM = 0,
    Ntsc443,
    PalBdghi,
    PalM,
    PalN,
    PalNc,
    Pal60,
    Sd480p60Wide,
    Sd480p60,
    Sd480p59,
    Sd576p50Wide,
    Sd576p50,
    Hd720p60,
    Hd720p50,
    Hd1080i60,
    Hd1080i50,
    Hd1080p60,
    Hd1080p50,
    Hd720p59,
    Hd1080i59,
    Hd1080p59,
    Hd1080p30,
}

raw_code_conversion!(
    DisplayMode,
    "mode",
    [
        NtscM, Ntsc443, PalBdghi, PalM, PalN, PalNc, Pal60, Sd480p60Wide, Sd480p60, Sd480p59,
        Sd576p50Wide, Sd576p50, Hd720p60, Hd720p50, Hd1080i60, Hd1080i50, Hd1080p60, Hd1080p50,
        Hd720p59, Hd1080i59, Hd1080p59, Hd1080p30,
    ]
);

/// Display modes grouped by how they program `CFG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFamily {
    Ntsc,
    Pal,
    Sd480p,
    Sd576p,
    Hd720p,
    Hd1080i,
    Hd1080p,
}

impl DisplayMode {
    pub const fn family(&self) -> ModeFamily {
        use DisplayMode::*;
        match self {
            NtscM | Ntsc443 => ModeFamily::Ntsc,
            PalBdghi | PalM | PalN | PalNc | Pal60 => ModeFamily::Pal,
            Sd480p60Wide | Sd480p60 | Sd480p59 => ModeFamily::Sd480p,
            Sd576p50Wide | Sd576p50 => ModeFamily::Sd576p,
            Hd720p50 | Hd720p59 | Hd720p60 => ModeFamily::Hd720p,
            Hd1080i50 | Hd1080i59 | Hd1080i60 => ModeFamily::Hd1080i,
            Hd1080p50 | Hd1080p59 | Hd1080p60 | Hd1080p30 => ModeFamily::Hd1080p,
        }
    }

    /// One of the 1080i variants
    pub const fn is_hd_interlaced(&self) -> bool {
        matches!(self.family(), ModeFamily::Hd1080i)
    }
}

/// Physical output the mixer feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum OutputMode {
    Composite = 0,
    Svideo,
    ComponentYpbprInterlaced,
    ComponentYpbprProgressive,
    ComponentRgbProgressive,
    Hdmi,
    HdmiRgb,
    Dvi,
}

raw_code_conversion!(
    OutputMode,
    "output mode",
    [
        Composite,
        Svideo,
        ComponentYpbprInterlaced,
        ComponentYpbprProgressive,
        ComponentRgbProgressive,
        Hdmi,
        HdmiRgb,
        Dvi,
    ]
);

impl OutputMode {
    /// Routed through the SDO analog encoder
    pub const fn is_analog(&self) -> bool {
        !matches!(self, OutputMode::Hdmi | OutputMode::HdmiRgb | OutputMode::Dvi)
    }
}

// ============================================================================
// LAYER SETUP
// ============================================================================

/// Source pixel format of a graphics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ColorFormat {
    Rgb565 = 4,
    Argb1555 = 5,
    Argb4444 = 6,
    Argb8888 = 7,
}

raw_code_conversion!(ColorFormat, "color format", [Rgb565, Argb1555, Argb4444, Argb8888]);

/// Full description of one layer for `init_layer`
///
/// The video layer only uses `window_blend`, `alpha`, `priority` and `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LayerConfig {
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub window_blend: bool,
    pub alpha: u8,
    pub priority: u8,
    pub color_format: ColorFormat,
    /// Replace pixels equal to `blank_color` (color keying)
    #[serde(default)]
    pub blank_change: bool,
    #[serde(default)]
    pub pixel_blend: bool,
    #[serde(default)]
    pub premultiplied: bool,
    #[serde(default)]
    pub blank_color: u32,
    pub base_address: u32,
    /// Line stride in pixels
    pub span: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub src_offset_x: u32,
    #[serde(default)]
    pub src_offset_y: u32,
    #[serde(default)]
    pub dst_offset_x: u32,
    #[serde(default)]
    pub dst_offset_y: u32,
    pub dst_width: u32,
    pub dst_height: u32,
}

impl LayerConfig {
    /// Blend and format controls carried by this configuration
    pub const fn control(&self) -> GraphicsControl {
        GraphicsControl {
            premultiplied: self.premultiplied,
            pixel_blend: self.pixel_blend,
            window_blend: self.window_blend,
            blank_change: self.blank_change,
            color_format: self.color_format,
            alpha: self.alpha,
            blank_color: self.blank_color,
        }
    }
}

// ============================================================================
// BACKGROUND / CSC
// ============================================================================

/// One of the three background color registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum BackgroundColorSlot {
    Color0 = 0,
    Color1 = 1,
    Color2 = 2,
}

raw_code_conversion!(BackgroundColorSlot, "color slot", [Color0, Color1, Color2]);

impl BackgroundColorSlot {
    const fn register(&self) -> usize {
        match self {
            BackgroundColorSlot::Color0 => mxr_reg::BG_COLOR0,
            BackgroundColorSlot::Color1 => mxr_reg::BG_COLOR1,
            BackgroundColorSlot::Color2 => mxr_reg::BG_COLOR2,
        }
    }
}

/// Output plane of the color-space converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CscComponent {
    Y = 0,
    Cb = 1,
    Cr = 2,
}

raw_code_conversion!(CscComponent, "component", [Y, Cb, Cr]);

/// Y output range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CscRange {
    /// 16-235
    Narrow,
    /// 0-255
    Wide,
}

/// Canned RGB to YCbCr conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum CscType {
    /// BT.601, limited range
    Yuv601Limited = 0,
    /// BT.601, full range
    Yuv601Full = 1,
    /// BT.709, limited range
    Yuv709Limited = 2,
    /// BT.709, full range
    Yuv709Full = 3,
}

raw_code_conversion!(
    CscType,
    "csc_type",
    [Yuv601Limited, Yuv601Full, Yuv709Limited, Yuv709Full]
);

impl CscType {
    /// Packed `CM_COEFF_Y`, `CM_COEFF_CB`, `CM_COEFF_CR` words
    pub const fn coefficients(&self) -> [u32; 3] {
        match self {
            CscType::Yuv601Limited => [
                (0 << 30) | (153 << 20) | (300 << 10) | 58,
                (936 << 20) | (851 << 10) | 262,
                (262 << 20) | (805 << 10) | 982,
            ],
            CscType::Yuv601Full => [
                (1 << 30) | (132 << 20) | (258 << 10) | 50,
                (948 << 20) | (875 << 10) | 225,
                (225 << 20) | (836 << 10) | 988,
            ],
            CscType::Yuv709Limited => [
                (0 << 30) | (109 << 20) | (366 << 10) | 36,
                (964 << 20) | (822 << 10) | 216,
                (262 << 20) | (787 << 10) | 1000,
            ],
            CscType::Yuv709Full => [
                (1 << 30) | (94 << 20) | (314 << 10) | 32,
                (972 << 20) | (851 << 10) | 225,
                (225 << 20) | (820 << 10) | 1004,
            ],
        }
    }
}

// ============================================================================
// CONFIGURATION OPERATIONS
// ============================================================================

impl<W: RegisterWindow, S: DiagnosticSink, D: PollDelay> MixerDevice<W, S, D> {
    /// Program the status register: reserved bit, burst length
    /// and source endianness. Overwrites the run bit, so only while stopped.
    pub fn init_status_register(&mut self, burst: BurstMode, endian: Endian) {
        log::debug!("init_status_register({:?}, {:?})", burst, endian);
        let mut reg = status_bits::RESERVED;
        if burst == BurstMode::Burst16 {
            reg |= status_bits::BURST16;
        }
        if endian == Endian::Big {
            reg |= status_bits::BIG_ENDIAN;
        }
        self.write(mxr_reg::STATUS, reg);
    }

    /// Program scan mode, RGB range and output routing in `CFG`
    pub fn set_display_mode(&mut self, mode: DisplayMode, output: OutputMode) {
        log::debug!("set_display_mode({:?}, {:?})", mode, output);
        let mut reg = self.read(mxr_reg::CFG) & !cfg_bits::SCAN_MASK;

        let (scan, range) = match mode.family() {
            ModeFamily::Ntsc => (0, cfg_bits::RGB601_0_255),
            ModeFamily::Pal => (cfg_bits::SCAN_PAL, cfg_bits::RGB601_0_255),
            ModeFamily::Sd480p => (cfg_bits::SCAN_PROGRESSIVE, cfg_bits::RGB601_16_235),
            ModeFamily::Sd576p => (
                cfg_bits::SCAN_PAL | cfg_bits::SCAN_PROGRESSIVE,
                cfg_bits::RGB601_16_235,
            ),
            ModeFamily::Hd720p => (
                cfg_bits::SCAN_HD | cfg_bits::SCAN_PROGRESSIVE,
                cfg_bits::RGB709_16_235,
            ),
            ModeFamily::Hd1080i => (
                cfg_bits::SCAN_HD | cfg_bits::SCAN_HD_1080,
                cfg_bits::RGB709_16_235,
            ),
            ModeFamily::Hd1080p => (
                cfg_bits::SCAN_HD | cfg_bits::SCAN_HD_1080 | cfg_bits::SCAN_PROGRESSIVE,
                cfg_bits::RGB709_16_235,
            ),
        };
        reg = cfg_bits::RGB_RANGE.replace(reg | scan, range);

        reg = match output {
            OutputMode::Hdmi => {
                cfg_bits::OUT_FMT.replace(reg | cfg_bits::DST_HDMI, cfg_bits::OUT_YUV444)
            }
            OutputMode::HdmiRgb | OutputMode::Dvi => {
                cfg_bits::OUT_FMT.replace(reg | cfg_bits::DST_HDMI, cfg_bits::OUT_RGB888)
            }
            _ => cfg_bits::OUT_FMT.replace(reg & !cfg_bits::DST_HDMI, cfg_bits::OUT_YUV444),
        };

        self.write(mxr_reg::CFG, reg);
    }

    /// Initialize one layer in full
    ///
    /// For a graphics layer this writes blend controls, blank color,
    /// geometry, base address, position and scale codes. A vertical
    /// up-scale under a 1080i mode cannot use the scaler; the mixer is
    /// switched to progressive output instead, and a 1080i layer without
    /// vertical scaling puts interlaced output back. Priority and visibility
    /// are written last.
    ///
    /// An unaligned base address is rejected before any register is written.
    pub fn init_layer(
        &mut self,
        mode: DisplayMode,
        layer: Layer,
        config: &LayerConfig,
    ) -> MixerResult<()> {
        log::debug!("init_layer({:?}, {:?}, {:?})", mode, layer, config);

        match layer {
            Layer::Video => {
                self.modify(mxr_reg::VIDEO_CFG, |reg| {
                    let reg = assign(reg, video_cfg::BLEND_ENABLE, config.window_blend);
                    let reg = video_cfg::ALPHA.replace(reg, u32::from(config.alpha));
                    reg & !video_cfg::PIXEL_LIMITER
                });
            }
            Layer::Graphics0 | Layer::Graphics1 => {
                let bank = layer.graphics_bank()?;
                if config.base_address % grp_geom::BASE_ALIGN != 0 {
                    log::error!("address is not word align = {:#010x}", config.base_address);
                    return Err(MixerError::UnalignedAddress(config.base_address));
                }

                let control = config.control();
                self.write(bank.cfg, control.apply(0));
                self.write(bank.blank, control.blank_color);

                self.set_geometry(
                    layer,
                    config.span,
                    config.width,
                    config.height,
                    config.src_offset_x,
                    config.src_offset_y,
                )?;
                self.set_base_address(layer, config.base_address)?;
                self.set_position(layer, config.dst_offset_x, config.dst_offset_y)?;

                let h_factor = self.scaling_factor(config.width, config.dst_width, Axis::Horizontal);
                let v_factor = self.scaling_factor(config.height, config.dst_height, Axis::Vertical);

                let mut wh = grp_geom::V_SCALE.replace(
                    grp_geom::H_SCALE.replace(self.read(bank.wh), SCALE_NONE),
                    SCALE_NONE,
                );

                if mode.is_hd_interlaced() {
                    // The scaler can't double lines of an interlaced frame;
                    // progressive output repeats them instead.
                    let progressive = v_factor != SCALE_NONE;
                    self.modify(mxr_reg::CFG, |reg| {
                        assign(reg, cfg_bits::SCAN_PROGRESSIVE, progressive)
                    });
                } else {
                    wh = grp_geom::V_SCALE.replace(wh, v_factor);
                }

                wh = grp_geom::H_SCALE.replace(wh, h_factor);
                self.write(bank.wh, wh);
            }
        }

        self.set_priority(layer, config.priority);
        self.set_visibility(layer, config.show);
        Ok(())
    }

    /// Set one background color (Y, Cb, Cr, 8 bits each)
    pub fn set_background_color(&mut self, slot: BackgroundColorSlot, y: u8, cb: u8, cr: u8) {
        log::debug!("set_background_color({:?}, {}, {}, {})", slot, y, cb, cr);
        let reg = bg_bits::COLOR_Y.encode(u32::from(y))
            | bg_bits::COLOR_CB.encode(u32::from(cb))
            | bg_bits::COLOR_CR.encode(u32::from(cr));
        self.write(slot.register(), reg);
    }

    /// Stopped-state form of `set_background_color`
    pub fn init_background_color(&mut self, slot: BackgroundColorSlot, y: u8, cb: u8, cr: u8) {
        self.set_background_color(slot, y, cb, cr);
    }

    /// Write one CSC coefficient triple (10-bit signed fixed point each)
    ///
    /// `range` is only encoded for the Y plane.
    pub fn init_csc_coefficients(
        &mut self,
        component: CscComponent,
        range: CscRange,
        coeff0: u32,
        coeff1: u32,
        coeff2: u32,
    ) {
        log::debug!(
            "init_csc_coefficients({:?}, {:?}, {}, {}, {})",
            component,
            range,
            coeff0,
            coeff1,
            coeff2
        );
        let triple = csc_bits::COEFF_0.encode(coeff0)
            | csc_bits::COEFF_1.encode(coeff1)
            | csc_bits::COEFF_2.encode(coeff2);

        match component {
            CscComponent::Y => {
                let wide = if range == CscRange::Wide {
                    csc_bits::Y_WIDE_RANGE
                } else {
                    0
                };
                self.write(mxr_reg::CM_COEFF_Y, wide | triple);
            }
            CscComponent::Cb => self.write(mxr_reg::CM_COEFF_CB, triple),
            CscComponent::Cr => self.write(mxr_reg::CM_COEFF_CR, triple),
        }
    }

    /// Load one of the canned RGB to YCbCr coefficient sets
    pub fn init_csc_coefficients_default(&mut self, csc: CscType) {
        log::debug!("init_csc_coefficients_default({:?})", csc);
        let [y, cb, cr] = csc.coefficients();
        self.write(mxr_reg::CM_COEFF_Y, y);
        self.write(mxr_reg::CM_COEFF_CB, cb);
        self.write(mxr_reg::CM_COEFF_CR, cr);
    }

    /// `init_csc_coefficients_default` for a raw preset code
    ///
    /// Unknown codes are reported and write nothing.
    pub fn init_csc_coefficients_default_raw(&mut self, code: u32) {
        match CscType::try_from(code) {
            Ok(csc) => self.init_csc_coefficients_default(csc),
            Err(_) => self.report(Diagnostic::UnknownCscType(code)),
        }
    }

    /// Enable or disable background dithering per output plane
    pub fn init_dither_enable(&mut self, cr_enable: bool, cb_enable: bool, y_enable: bool) {
        log::debug!(
            "init_dither_enable(cr={}, cb={}, y={})",
            cr_enable,
            cb_enable,
            y_enable
        );
        self.modify(mxr_reg::BG_CFG, |reg| {
            let reg = assign(reg, bg_bits::CR_DITHER_EN, cr_enable);
            let reg = assign(reg, bg_bits::CB_DITHER_EN, cb_enable);
            assign(reg, bg_bits::Y_DITHER_EN, y_enable)
        });
    }
}
