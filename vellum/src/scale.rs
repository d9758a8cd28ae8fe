//! Aspect-preserving size fitting.

use crate::{Component, Size};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleMode {
    /// The whole size fits inside the area.
    #[default]
    Fit,
    /// The size covers the whole area.
    Fill,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleOptions {
    /// When `false`, the ratio is capped at 1.
    pub allow_enlarge: bool,
    /// Rounds the result to whole pixels.
    pub snap_to_pixel: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            allow_enlarge: false,
            snap_to_pixel: true,
        }
    }
}

impl ScaleOptions {
    pub fn with_allow_enlarge(mut self, allow_enlarge: bool) -> Self {
        self.allow_enlarge = allow_enlarge;
        self
    }

    pub fn with_snap_to_pixel(mut self, snap_to_pixel: bool) -> Self {
        self.snap_to_pixel = snap_to_pixel;
        self
    }
}

pub fn scale(size: Size, area: Size, mode: ScaleMode, options: ScaleOptions) -> Size {
    match mode {
        ScaleMode::Fit => scale_to_fit(size, area, options),
        ScaleMode::Fill => scale_to_fill(size, area, options),
    }
}

pub fn scale_to_fit(size: Size, area: Size, options: ScaleOptions) -> Size {
    if is_degenerate(size) {
        return size;
    }
    let ratio = (area.width / size.width).min(area.height / size.height);
    scale_by_ratio(size, ratio, options)
}

pub fn scale_to_fill(size: Size, area: Size, options: ScaleOptions) -> Size {
    if is_degenerate(size) {
        return size;
    }
    let ratio = (area.width / size.width).max(area.height / size.height);
    scale_by_ratio(size, ratio, options)
}

/// Resizes `component` so its current size is scaled into `area`.
pub fn scale_component(
    component: &mut dyn Component,
    area: Size,
    mode: ScaleMode,
    options: ScaleOptions,
) {
    let size = Size::new(component.width(), component.height());
    let scaled = scale(size, area, mode, options);
    if scaled != size {
        component.resize(scaled.width, scaled.height);
    }
}

/// Returns `width / height`, or 0 for a zero height.
pub fn width_to_height_ratio(size: Size) -> f32 {
    if size.height == 0.0 {
        return 0.0;
    }
    size.width / size.height
}

/// Returns `height / width`, or 0 for a zero width.
pub fn height_to_width_ratio(size: Size) -> f32 {
    if size.width == 0.0 {
        return 0.0;
    }
    size.height / size.width
}

fn is_degenerate(size: Size) -> bool {
    if size.width <= 0.0 || size.height <= 0.0 {
        vwarn!(width = size.width, height = size.height, "cannot scale an empty size");
        return true;
    }
    false
}

fn scale_by_ratio(size: Size, ratio: f32, options: ScaleOptions) -> Size {
    let ratio = if options.allow_enlarge {
        ratio
    } else {
        ratio.min(1.0)
    };
    let scaled = Size::new(size.width * ratio, size.height * ratio);
    if options.snap_to_pixel {
        Size::new(scaled.width.round(), scaled.height.round())
    } else {
        scaled
    }
}
