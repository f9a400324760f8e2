//! Per-layer runtime control
//!
//! These operations are issued while the mixer is running. Every write is a
//! read-modify-write of the current register value so fields belonging to
//! other layers, or to other settings of the same layer, are left alone.
//! Nothing here is atomic across registers.

use crate::config::ColorFormat;
use crate::device::MixerDevice;
use crate::diag::DiagnosticSink;
use crate::regs::{
    assign, cfg_bits, grp_cfg, grp_geom, layer_cfg, mxr_reg, video_cfg, Field, GraphicsBank,
    GRAPHIC0_BANK, GRAPHIC1_BANK,
};
use crate::runtime::PollDelay;
use crate::window::RegisterWindow;
use crate::{Layer, MixerError, MixerResult};

impl Layer {
    /// Show bit in `CFG`
    pub(crate) const fn show_bit(&self) -> u32 {
        match self {
            Layer::Video => cfg_bits::VIDEO_LAYER_SHOW,
            Layer::Graphics0 => cfg_bits::GRAPHIC0_LAYER_SHOW,
            Layer::Graphics1 => cfg_bits::GRAPHIC1_LAYER_SHOW,
        }
    }

    /// Priority field in `LAYER_CFG`
    pub(crate) const fn priority_field(&self) -> Field {
        match self {
            Layer::Video => layer_cfg::VIDEO_PRIORITY,
            Layer::Graphics0 => layer_cfg::GRAPHIC0_PRIORITY,
            Layer::Graphics1 => layer_cfg::GRAPHIC1_PRIORITY,
        }
    }

    /// The layer's own configuration register
    pub(crate) const fn cfg_register(&self) -> usize {
        match self {
            Layer::Video => mxr_reg::VIDEO_CFG,
            Layer::Graphics0 => mxr_reg::GRAPHIC0_CFG,
            Layer::Graphics1 => mxr_reg::GRAPHIC1_CFG,
        }
    }

    /// Register bank of a graphics layer; the video plane has none
    pub(crate) fn graphics_bank(&self) -> MixerResult<&'static GraphicsBank> {
        match self {
            Layer::Graphics0 => Ok(&GRAPHIC0_BANK),
            Layer::Graphics1 => Ok(&GRAPHIC1_BANK),
            Layer::Video => {
                log::error!("invalid layer parameter = {:?}", self);
                Err(MixerError::InvalidParameter)
            }
        }
    }
}

/// Visibility and priority of a layer as read back from hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerInfo {
    pub visible: bool,
    pub priority: u8,
}

/// Blending and format controls of a graphics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsControl {
    /// Source pixels carry premultiplied alpha
    pub premultiplied: bool,
    /// Blend using per-pixel alpha
    pub pixel_blend: bool,
    /// Blend the whole window with `alpha`
    pub window_blend: bool,
    /// Replace pixels equal to `blank_color` (color keying)
    pub blank_change: bool,
    pub color_format: ColorFormat,
    pub alpha: u8,
    pub blank_color: u32,
}

impl GraphicsControl {
    /// Fold these controls into a `GRAPHICn_CFG` value
    pub(crate) fn apply(&self, reg: u32) -> u32 {
        let mut reg = assign(reg, grp_cfg::COLOR_KEY_DISABLE, !self.blank_change);
        reg = assign(reg, grp_cfg::PRE_MUL, self.premultiplied);
        reg = assign(reg, grp_cfg::WIN_BLEND_ENABLE, self.window_blend);
        reg = assign(reg, grp_cfg::PIXEL_BLEND_ENABLE, self.pixel_blend);
        reg = grp_cfg::COLOR_FORMAT.replace(reg, self.color_format as u32);
        grp_cfg::ALPHA.replace(reg, u32::from(self.alpha))
    }
}

impl<W: RegisterWindow, S: DiagnosticSink, D: PollDelay> MixerDevice<W, S, D> {
    /// Show or hide a layer
    pub fn set_visibility(&mut self, layer: Layer, show: bool) {
        log::debug!("set_visibility({:?}, {})", layer, show);
        self.modify(mxr_reg::CFG, |reg| assign(reg, layer.show_bit(), show));
    }

    /// Set a layer's compositing priority
    pub fn set_priority(&mut self, layer: Layer, priority: u8) {
        log::debug!("set_priority({:?}, {})", layer, priority);
        let field = layer.priority_field();
        self.modify(mxr_reg::LAYER_CFG, |reg| {
            field.replace(reg, u32::from(priority))
        });
    }

    /// Enable or disable whole-window alpha blending
    pub fn set_window_blend(&mut self, layer: Layer, enable: bool) {
        log::debug!("set_window_blend({:?}, {})", layer, enable);
        let bit = match layer {
            Layer::Video => video_cfg::BLEND_ENABLE,
            Layer::Graphics0 | Layer::Graphics1 => grp_cfg::WIN_BLEND_ENABLE,
        };
        self.modify(layer.cfg_register(), |reg| assign(reg, bit, enable));
    }

    /// Set a layer's window alpha
    pub fn set_alpha(&mut self, layer: Layer, alpha: u8) {
        log::debug!("set_alpha({:?}, {})", layer, alpha);
        let field = match layer {
            Layer::Video => video_cfg::ALPHA,
            Layer::Graphics0 | Layer::Graphics1 => grp_cfg::ALPHA,
        };
        self.modify(layer.cfg_register(), |reg| {
            field.replace(reg, u32::from(alpha))
        });
    }

    /// Point a graphics layer at a new framebuffer
    ///
    /// The address must be a multiple of the bus word size; nothing is
    /// written otherwise.
    pub fn set_base_address(&mut self, layer: Layer, address: u32) -> MixerResult<()> {
        log::debug!("set_base_address({:?}, {:#010x})", layer, address);
        let bank = layer.graphics_bank()?;
        if address % grp_geom::BASE_ALIGN != 0 {
            log::error!("address is not word align = {:#010x}", address);
            return Err(MixerError::UnalignedAddress(address));
        }
        self.write(bank.base, address);
        Ok(())
    }

    /// Move a graphics layer's destination origin
    pub fn set_position(&mut self, layer: Layer, x: u32, y: u32) -> MixerResult<()> {
        log::debug!("set_position({:?}, {}, {})", layer, x, y);
        let bank = layer.graphics_bank()?;
        self.modify(bank.dxy, |reg| {
            grp_geom::OFFSET_Y.replace(grp_geom::OFFSET_X.replace(reg, x), y)
        });
        Ok(())
    }

    /// Set a graphics layer's source geometry
    ///
    /// Scale codes in `GRAPHICn_WH` are preserved.
    pub fn set_geometry(
        &mut self,
        layer: Layer,
        span: u32,
        width: u32,
        height: u32,
        src_x: u32,
        src_y: u32,
    ) -> MixerResult<()> {
        log::debug!(
            "set_geometry({:?}, {}, {}, {}, {}, {})",
            layer,
            span,
            width,
            height,
            src_x,
            src_y
        );
        let bank = layer.graphics_bank()?;
        self.modify(bank.span, |reg| grp_geom::SPAN.replace(reg, span));
        self.modify(bank.wh, |reg| {
            grp_geom::HEIGHT.replace(grp_geom::WIDTH.replace(reg, width), height)
        });
        self.modify(bank.sxy, |reg| {
            grp_geom::OFFSET_Y.replace(grp_geom::OFFSET_X.replace(reg, src_x), src_y)
        });
        Ok(())
    }

    /// Update a graphics layer's blending and format controls and its blank
    /// color, leaving geometry alone
    pub fn set_graphics_control(
        &mut self,
        layer: Layer,
        control: &GraphicsControl,
    ) -> MixerResult<()> {
        log::debug!("set_graphics_control({:?}, {:?})", layer, control);
        let bank = layer.graphics_bank()?;
        self.modify(bank.cfg, |reg| control.apply(reg));
        self.write(bank.blank, control.blank_color);
        Ok(())
    }

    /// Read back a layer's visibility and priority
    pub fn layer_info(&self, layer: Layer) -> LayerInfo {
        let visible = self.read(mxr_reg::CFG) & layer.show_bit() != 0;
        let priority = layer.priority_field().decode(self.read(mxr_reg::LAYER_CFG)) as u8;
        LayerInfo { visible, priority }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimWindow;

    fn control() -> GraphicsControl {
        GraphicsControl {
            premultiplied: true,
            pixel_blend: true,
            window_blend: false,
            blank_change: false,
            color_format: ColorFormat::Argb8888,
            alpha: 0x80,
            blank_color: 0x00FF_00FF,
        }
    }

    #[test]
    fn test_visibility_toggles_only_its_bit() {
        for layer in Layer::ALL {
            for show in [true, false] {
                for initial in [0u32, 0xFFFF_FFFF] {
                    let sim = SimWindow::new();
                    sim.poke(mxr_reg::CFG, initial);
                    let mut dev = MixerDevice::new(&sim);

                    dev.set_visibility(layer, show);

                    let expected = assign(initial, layer.show_bit(), show);
                    assert_eq!(sim.peek(mxr_reg::CFG), expected, "{:?} {}", layer, show);
                    for other in Layer::ALL.iter().filter(|l| **l != layer) {
                        assert_eq!(
                            sim.peek(mxr_reg::CFG) & other.show_bit(),
                            initial & other.show_bit()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_priority_is_masked_write() {
        let sim = SimWindow::new();
        sim.poke(mxr_reg::LAYER_CFG, 0xFFFF_F000 | 0x321);
        let mut dev = MixerDevice::new(&sim);

        dev.set_priority(Layer::Graphics0, 3);
        assert_eq!(sim.peek(mxr_reg::LAYER_CFG), 0xFFFF_F000 | 0x331);

        dev.set_priority(Layer::Video, 0);
        assert_eq!(sim.peek(mxr_reg::LAYER_CFG), 0xFFFF_F000 | 0x330);

        assert_eq!(dev.layer_info(Layer::Graphics1).priority, 3);
        assert_eq!(dev.layer_info(Layer::Graphics0).priority, 3);
    }

    #[test]
    fn test_window_blend_bits_differ_per_plane() {
        let sim = SimWindow::new();
        let mut dev = MixerDevice::new(&sim);

        dev.set_window_blend(Layer::Video, true);
        dev.set_window_blend(Layer::Graphics1, true);

        assert_eq!(sim.peek(mxr_reg::VIDEO_CFG), video_cfg::BLEND_ENABLE);
        assert_eq!(sim.peek(mxr_reg::GRAPHIC1_CFG), grp_cfg::WIN_BLEND_ENABLE);
        assert_eq!(sim.peek(mxr_reg::GRAPHIC0_CFG), 0);

        dev.set_window_blend(Layer::Video, false);
        assert_eq!(sim.peek(mxr_reg::VIDEO_CFG), 0);
    }

    #[test]
    fn test_alpha_preserves_other_fields() {
        let sim = SimWindow::new();
        sim.poke(mxr_reg::GRAPHIC0_CFG, grp_cfg::PRE_MUL | 0x0712);
        sim.poke(mxr_reg::VIDEO_CFG, video_cfg::BLEND_ENABLE);
        let mut dev = MixerDevice::new(&sim);

        dev.set_alpha(Layer::Graphics0, 0xAB);
        dev.set_alpha(Layer::Video, 0x40);

        assert_eq!(sim.peek(mxr_reg::GRAPHIC0_CFG), grp_cfg::PRE_MUL | 0x07AB);
        assert_eq!(sim.peek(mxr_reg::VIDEO_CFG), video_cfg::BLEND_ENABLE | 0x40);
    }

    #[test]
    fn test_base_address_rejects_unaligned_without_writing() {
        let sim = SimWindow::new();
        let mut dev = MixerDevice::new(&sim);

        for address in [1u32, 2, 3, 0x1000_0001, 0x1000_0006, u32::MAX] {
            assert_eq!(
                dev.set_base_address(Layer::Graphics0, address),
                Err(MixerError::UnalignedAddress(address))
            );
        }
        assert!(sim.writes().is_empty());
    }

    #[test]
    fn test_base_address_writes_aligned_value() {
        let sim = SimWindow::new();
        let mut dev = MixerDevice::new(&sim);

        for address in [0u32, 4, 0x4000_0000, 0xFFFF_FFFC] {
            sim.clear_writes();
            assert!(dev.set_base_address(Layer::Graphics1, address).is_ok());
            assert_eq!(sim.writes(), vec![(mxr_reg::GRAPHIC1_BASE, address)]);
        }
    }

    #[test]
    fn test_graphics_only_ops_reject_video() {
        let sim = SimWindow::new();
        let mut dev = MixerDevice::new(&sim);

        assert_eq!(
            dev.set_base_address(Layer::Video, 0x1000),
            Err(MixerError::InvalidParameter)
        );
        assert_eq!(
            dev.set_position(Layer::Video, 1, 2),
            Err(MixerError::InvalidParameter)
        );
        assert_eq!(
            dev.set_geometry(Layer::Video, 1, 2, 3, 4, 5),
            Err(MixerError::InvalidParameter)
        );
        assert_eq!(
            dev.set_graphics_control(Layer::Video, &control()),
            Err(MixerError::InvalidParameter)
        );
        assert!(sim.writes().is_empty());
    }

    #[test]
    fn test_invalid_raw_layer_code() {
        assert_eq!(Layer::try_from(3), Err(MixerError::InvalidParameter));
        assert_eq!(Layer::try_from(2), Ok(Layer::Graphics1));
    }

    #[test]
    fn test_position_encoding() {
        let sim = SimWindow::new();
        let mut dev = MixerDevice::new(&sim);

        dev.set_position(Layer::Graphics0, 100, 50).unwrap();

        assert_eq!(sim.peek(mxr_reg::GRAPHIC0_DXY), (100 << 16) | 50);
    }

    #[test]
    fn test_geometry_keeps_scale_codes() {
        let sim = SimWindow::new();
        sim.poke(
            mxr_reg::GRAPHIC1_WH,
            grp_geom::H_SCALE.encode(1) | grp_geom::V_SCALE.encode(2),
        );
        let mut dev = MixerDevice::new(&sim);

        dev.set_geometry(Layer::Graphics1, 720, 640, 480, 8, 16).unwrap();

        assert_eq!(sim.peek(mxr_reg::GRAPHIC1_SPAN), 720);
        assert_eq!(
            sim.peek(mxr_reg::GRAPHIC1_WH),
            (1 << 28) | (640 << 16) | (2 << 12) | 480
        );
        assert_eq!(sim.peek(mxr_reg::GRAPHIC1_SXY), (8 << 16) | 16);
    }

    #[test]
    fn test_graphics_control_read_modify_write() {
        let sim = SimWindow::new();
        sim.poke(mxr_reg::GRAPHIC0_CFG, grp_cfg::WIN_BLEND_ENABLE | (1 << 25));
        let mut dev = MixerDevice::new(&sim);

        dev.set_graphics_control(Layer::Graphics0, &control()).unwrap();

        assert_eq!(
            sim.peek(mxr_reg::GRAPHIC0_CFG),
            (1 << 25)
                | grp_cfg::COLOR_KEY_DISABLE
                | grp_cfg::PRE_MUL
                | grp_cfg::PIXEL_BLEND_ENABLE
                | (7 << 8)
                | 0x80
        );
        assert_eq!(sim.peek(mxr_reg::GRAPHIC0_BLANK), 0x00FF_00FF);
    }

    #[test]
    fn test_layer_info_reads_back() {
        let sim = SimWindow::new();
        let mut dev = MixerDevice::new(&sim);

        dev.set_visibility(Layer::Graphics1, true);
        dev.set_priority(Layer::Graphics1, 2);

        assert_eq!(
            dev.layer_info(Layer::Graphics1),
            LayerInfo {
                visible: true,
                priority: 2
            }
        );
        assert!(!dev.layer_info(Layer::Video).visible);
    }
}
