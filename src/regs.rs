//! # Mixer Register Map
//!
//! Offsets and bit fields of the S5PV210 mixer register block. This layout
//! is the hardware contract: field widths, positions and the canned CSC
//! constants must not change.
//!
//! | Offset | Register        | Purpose                                  |
//! |--------|-----------------|------------------------------------------|
//! | 0x00   | STATUS          | run bit, burst, endianness               |
//! | 0x04   | CFG             | scan mode, output path, layer show bits  |
//! | 0x08   | INT_EN          | underflow interrupt enables              |
//! | 0x0C   | INT_STATUS      | fired bits (write 1 to clear)            |
//! | 0x10   | LAYER_CFG       | per-layer priority                       |
//! | 0x14   | VIDEO_CFG       | video blend / alpha                      |
//! | 0x20   | GRAPHIC0_*      | graphics 0 bank (cfg..blank)             |
//! | 0x40   | GRAPHIC1_*      | graphics 1 bank (cfg..blank)             |
//! | 0x60   | BG_CFG          | background dither                        |
//! | 0x64   | BG_COLOR0..2    | background colors                        |
//! | 0x80   | CM_COEFF_Y..CR  | RGB to YCbCr coefficients                |

// ============================================================================
// FIELD ACCESSOR
// ============================================================================

/// A contiguous bit field inside a 32-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Mask of the field in register position
    pub const fn mask(&self) -> u32 {
        (((1u64 << self.width) - 1) as u32) << self.shift
    }

    /// Place `value` into the field, truncating to its width
    pub const fn encode(&self, value: u32) -> u32 {
        (value << self.shift) & self.mask()
    }

    /// Extract the field from a register value
    pub const fn decode(&self, reg: u32) -> u32 {
        (reg & self.mask()) >> self.shift
    }

    /// Replace the field in `reg`, leaving every other bit alone
    pub const fn replace(&self, reg: u32, value: u32) -> u32 {
        (reg & !self.mask()) | self.encode(value)
    }
}

/// Set or clear `bits` in `reg`
#[inline]
pub const fn assign(reg: u32, bits: u32, on: bool) -> u32 {
    if on {
        reg | bits
    } else {
        reg & !bits
    }
}

// ============================================================================
// REGISTER OFFSETS
// ============================================================================

/// Register offsets from the window base
pub mod mxr_reg {
    /// Run control and bus setup
    pub const STATUS: usize = 0x0000;
    /// Scan mode, output path and layer show bits
    pub const CFG: usize = 0x0004;
    /// Interrupt enable
    pub const INT_EN: usize = 0x0008;
    /// Interrupt status
    pub const INT_STATUS: usize = 0x000C;
    /// Layer priority
    pub const LAYER_CFG: usize = 0x0010;
    /// Video plane configuration
    pub const VIDEO_CFG: usize = 0x0014;

    pub const GRAPHIC0_CFG: usize = 0x0020;
    pub const GRAPHIC0_BASE: usize = 0x0024;
    pub const GRAPHIC0_SPAN: usize = 0x0028;
    pub const GRAPHIC0_SXY: usize = 0x002C;
    pub const GRAPHIC0_WH: usize = 0x0030;
    pub const GRAPHIC0_DXY: usize = 0x0034;
    pub const GRAPHIC0_BLANK: usize = 0x0038;

    pub const GRAPHIC1_CFG: usize = 0x0040;
    pub const GRAPHIC1_BASE: usize = 0x0044;
    pub const GRAPHIC1_SPAN: usize = 0x0048;
    pub const GRAPHIC1_SXY: usize = 0x004C;
    pub const GRAPHIC1_WH: usize = 0x0050;
    pub const GRAPHIC1_DXY: usize = 0x0054;
    pub const GRAPHIC1_BLANK: usize = 0x0058;

    /// Background dither
    pub const BG_CFG: usize = 0x0060;
    pub const BG_COLOR0: usize = 0x0064;
    pub const BG_COLOR1: usize = 0x0068;
    pub const BG_COLOR2: usize = 0x006C;

    pub const CM_COEFF_Y: usize = 0x0080;
    pub const CM_COEFF_CB: usize = 0x0084;
    pub const CM_COEFF_CR: usize = 0x0088;

    /// Size of the register window in bytes
    pub const WINDOW_SIZE: usize = 0x0090;
}

/// Every named register, for diagnostic dumps
pub const REGISTER_NAMES: &[(&str, usize)] = &[
    ("STATUS", mxr_reg::STATUS),
    ("CFG", mxr_reg::CFG),
    ("INT_EN", mxr_reg::INT_EN),
    ("INT_STATUS", mxr_reg::INT_STATUS),
    ("LAYER_CFG", mxr_reg::LAYER_CFG),
    ("VIDEO_CFG", mxr_reg::VIDEO_CFG),
    ("GRAPHIC0_CFG", mxr_reg::GRAPHIC0_CFG),
    ("GRAPHIC0_BASE", mxr_reg::GRAPHIC0_BASE),
    ("GRAPHIC0_SPAN", mxr_reg::GRAPHIC0_SPAN),
    ("GRAPHIC0_SXY", mxr_reg::GRAPHIC0_SXY),
    ("GRAPHIC0_WH", mxr_reg::GRAPHIC0_WH),
    ("GRAPHIC0_DXY", mxr_reg::GRAPHIC0_DXY),
    ("GRAPHIC0_BLANK", mxr_reg::GRAPHIC0_BLANK),
    ("GRAPHIC1_CFG", mxr_reg::GRAPHIC1_CFG),
    ("GRAPHIC1_BASE", mxr_reg::GRAPHIC1_BASE),
    ("GRAPHIC1_SPAN", mxr_reg::GRAPHIC1_SPAN),
    ("GRAPHIC1_SXY", mxr_reg::GRAPHIC1_SXY),
    ("GRAPHIC1_WH", mxr_reg::GRAPHIC1_WH),
    ("GRAPHIC1_DXY", mxr_reg::GRAPHIC1_DXY),
    ("GRAPHIC1_BLANK", mxr_reg::GRAPHIC1_BLANK),
    ("BG_CFG", mxr_reg::BG_CFG),
    ("BG_COLOR0", mxr_reg::BG_COLOR0),
    ("BG_COLOR1", mxr_reg::BG_COLOR1),
    ("BG_COLOR2", mxr_reg::BG_COLOR2),
    ("CM_COEFF_Y", mxr_reg::CM_COEFF_Y),
    ("CM_COEFF_CB", mxr_reg::CM_COEFF_CB),
    ("CM_COEFF_CR", mxr_reg::CM_COEFF_CR),
];

/// Register bank of one graphics plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsBank {
    pub cfg: usize,
    pub base: usize,
    pub span: usize,
    pub sxy: usize,
    pub wh: usize,
    pub dxy: usize,
    pub blank: usize,
}

pub const GRAPHIC0_BANK: GraphicsBank = GraphicsBank {
    cfg: mxr_reg::GRAPHIC0_CFG,
    base: mxr_reg::GRAPHIC0_BASE,
    span: mxr_reg::GRAPHIC0_SPAN,
    sxy: mxr_reg::GRAPHIC0_SXY,
    wh: mxr_reg::GRAPHIC0_WH,
    dxy: mxr_reg::GRAPHIC0_DXY,
    blank: mxr_reg::GRAPHIC0_BLANK,
};

pub const GRAPHIC1_BANK: GraphicsBank = GraphicsBank {
    cfg: mxr_reg::GRAPHIC1_CFG,
    base: mxr_reg::GRAPHIC1_BASE,
    span: mxr_reg::GRAPHIC1_SPAN,
    sxy: mxr_reg::GRAPHIC1_SXY,
    wh: mxr_reg::GRAPHIC1_WH,
    dxy: mxr_reg::GRAPHIC1_DXY,
    blank: mxr_reg::GRAPHIC1_BLANK,
};

// ============================================================================
// STATUS
// ============================================================================

pub mod status_bits {
    /// Mixer run request; hardware keeps it set until the current frame drains
    pub const MIXER_START: u32 = 1 << 0;
    /// Reserved bit, must be written as 1
    pub const RESERVED: u32 = 1 << 2;
    /// Big-endian source pixel data
    pub const BIG_ENDIAN: u32 = 1 << 3;
    /// 16-beat DMA bursts (clear: 8-beat)
    pub const BURST16: u32 = 1 << 7;
}

// ============================================================================
// CFG
// ============================================================================

pub mod cfg_bits {
    use super::Field;

    /// HD scan (clear: SD)
    pub const SCAN_HD: u32 = 1 << 0;
    /// SD: PAL timing (clear: NTSC)
    pub const SCAN_PAL: u32 = 1 << 1;
    /// HD: 1080-line timing (clear: 720); shares bit 1 with `SCAN_PAL`
    pub const SCAN_HD_1080: u32 = 1 << 1;
    /// Progressive scan (clear: interlaced)
    pub const SCAN_PROGRESSIVE: u32 = 1 << 2;
    /// Scan-related bits rewritten by a display mode change
    pub const SCAN_MASK: u32 = SCAN_HD | SCAN_PAL | SCAN_PROGRESSIVE;

    pub const VIDEO_LAYER_SHOW: u32 = 1 << 3;
    pub const GRAPHIC0_LAYER_SHOW: u32 = 1 << 4;
    pub const GRAPHIC1_LAYER_SHOW: u32 = 1 << 5;

    /// Route output to HDMI (clear: SDO analog path)
    pub const DST_HDMI: u32 = 1 << 7;
    /// Output pixel encoding: 0 = YUV444, 1 = RGB888
    pub const OUT_FMT: Field = Field::new(8, 1);
    /// RGB input range / matrix select
    pub const RGB_RANGE: Field = Field::new(9, 2);

    pub const OUT_YUV444: u32 = 0;
    pub const OUT_RGB888: u32 = 1;

    pub const RGB601_0_255: u32 = 0;
    pub const RGB601_16_235: u32 = 1;
    pub const RGB709_0_255: u32 = 2;
    pub const RGB709_16_235: u32 = 3;
}

// ============================================================================
// LAYER_CFG
// ============================================================================

pub mod layer_cfg {
    use super::Field;

    pub const VIDEO_PRIORITY: Field = Field::new(0, 4);
    pub const GRAPHIC0_PRIORITY: Field = Field::new(4, 4);
    pub const GRAPHIC1_PRIORITY: Field = Field::new(8, 4);
}

// ============================================================================
// VIDEO_CFG
// ============================================================================

pub mod video_cfg {
    use super::Field;

    /// Video plane alpha
    pub const ALPHA: Field = Field::new(0, 8);
    /// Window blending for the video plane
    pub const BLEND_ENABLE: u32 = 1 << 16;
    /// YUV pixel limiter
    pub const PIXEL_LIMITER: u32 = 1 << 17;
}

// ============================================================================
// GRAPHICn_*
// ============================================================================

pub mod grp_cfg {
    use super::Field;

    /// Graphics plane alpha
    pub const ALPHA: Field = Field::new(0, 8);
    /// Source color format, see `ColorFormat`
    pub const COLOR_FORMAT: Field = Field::new(8, 4);
    /// Per-pixel alpha blending
    pub const PIXEL_BLEND_ENABLE: u32 = 1 << 16;
    /// Whole-window alpha blending
    pub const WIN_BLEND_ENABLE: u32 = 1 << 17;
    /// Source pixels are alpha-premultiplied
    pub const PRE_MUL: u32 = 1 << 20;
    /// Disable blank-color keying (set: pixels equal to the blank color are kept)
    pub const COLOR_KEY_DISABLE: u32 = 1 << 21;
}

pub mod grp_geom {
    use super::Field;

    /// Line stride in pixels
    pub const SPAN: Field = Field::new(0, 15);
    pub const HEIGHT: Field = Field::new(0, 11);
    pub const WIDTH: Field = Field::new(16, 11);
    /// Vertical scale code in GRAPHICn_WH
    pub const V_SCALE: Field = Field::new(12, 2);
    /// Horizontal scale code in GRAPHICn_WH
    pub const H_SCALE: Field = Field::new(28, 2);
    /// Y offset in GRAPHICn_SXY / GRAPHICn_DXY
    pub const OFFSET_Y: Field = Field::new(0, 11);
    /// X offset in GRAPHICn_SXY / GRAPHICn_DXY
    pub const OFFSET_X: Field = Field::new(16, 11);

    /// Graphics base addresses must be aligned to the 32-bit bus word
    pub const BASE_ALIGN: u32 = 4;
}

// ============================================================================
// BACKGROUND
// ============================================================================

pub mod bg_bits {
    use super::Field;

    pub const Y_DITHER_EN: u32 = 1 << 17;
    pub const CB_DITHER_EN: u32 = 1 << 18;
    pub const CR_DITHER_EN: u32 = 1 << 19;

    pub const COLOR_CR: Field = Field::new(0, 8);
    pub const COLOR_CB: Field = Field::new(8, 8);
    pub const COLOR_Y: Field = Field::new(16, 8);
}

// ============================================================================
// CM_COEFF_*
// ============================================================================

pub mod csc_bits {
    use super::Field;

    pub const COEFF_2: Field = Field::new(0, 10);
    pub const COEFF_1: Field = Field::new(10, 10);
    pub const COEFF_0: Field = Field::new(20, 10);
    /// Y register only: wide (full) output range
    pub const Y_WIDE_RANGE: u32 = 1 << 30;
}

// ============================================================================
// INTERRUPTS
// ============================================================================

pub mod int_bits {
    /// Graphics 0 underflow (INT_EN enable / INT_STATUS fired)
    pub const GRP0: u32 = 1 << 8;
    /// Graphics 1 underflow
    pub const GRP1: u32 = 1 << 9;
    /// Video underflow
    pub const VP: u32 = 1 << 10;
    /// Top-level "mixer interrupt fired" in INT_STATUS
    pub const MXR_FIRED: u32 = 1 << 15;

    /// Every fired bit the driver acknowledges
    pub const ALL_FIRED: u32 = MXR_FIRED | VP | GRP0 | GRP1;
}
