//! Layout strategies that position a box's children, and the pure alignment helper.

use core::fmt;

use crate::{Component, Direction, HorizontalAlign, Point, Size, VerticalAlign};

/// Margins, gaps and alignment shared by every layout strategy.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSettings {
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub v_align: VerticalAlign,
    pub h_align: HorizontalAlign,
}

impl LayoutSettings {
    pub fn with_margins(mut self, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        self.margin_left = left;
        self.margin_right = right;
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    pub fn with_gaps(mut self, horizontal_gap: f32, vertical_gap: f32) -> Self {
        self.horizontal_gap = horizontal_gap;
        self.vertical_gap = vertical_gap;
        self
    }

    pub fn with_v_align(mut self, v_align: VerticalAlign) -> Self {
        self.v_align = v_align;
        self
    }

    pub fn with_h_align(mut self, h_align: HorizontalAlign) -> Self {
        self.h_align = h_align;
        self
    }
}

/// A strategy that positions the children of a box within `width` x `height`.
///
/// `apply` validates each child before reading its size, so the positions reflect the children's
/// current content.
pub trait LayoutBehavior: fmt::Debug + 'static {
    fn settings(&self) -> &LayoutSettings;
    fn settings_mut(&mut self) -> &mut LayoutSettings;

    /// The axis children are stacked along.
    fn direction(&self) -> Direction;

    fn apply(&self, children: &mut [Box<dyn Component>], width: f32, height: f32);
}

/// Stacks children left to right.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HorizontalLayout {
    pub settings: LayoutSettings,
}

impl HorizontalLayout {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }
}

impl LayoutBehavior for HorizontalLayout {
    fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut LayoutSettings {
        &mut self.settings
    }

    fn direction(&self) -> Direction {
        Direction::Horizontal
    }

    fn apply(&self, children: &mut [Box<dyn Component>], _width: f32, height: f32) {
        let s = &self.settings;
        let mut x = s.margin_left;
        for child in children.iter_mut() {
            child.validate_now();
            let (child_width, child_height) = (child.width(), child.height());
            let y = match s.v_align {
                VerticalAlign::Top => s.margin_top,
                VerticalAlign::Center => s.margin_top + (height - child_height) * 0.5,
                VerticalAlign::Bottom => height - s.margin_bottom - child_height,
            };
            child.move_to(x, y);
            x += child_width + s.horizontal_gap;
        }
    }
}

/// Stacks children top to bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VerticalLayout {
    pub settings: LayoutSettings,
}

impl VerticalLayout {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }
}

impl LayoutBehavior for VerticalLayout {
    fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut LayoutSettings {
        &mut self.settings
    }

    fn direction(&self) -> Direction {
        Direction::Vertical
    }

    fn apply(&self, children: &mut [Box<dyn Component>], width: f32, _height: f32) {
        let s = &self.settings;
        let mut y = s.margin_top;
        for child in children.iter_mut() {
            child.validate_now();
            let (child_width, child_height) = (child.width(), child.height());
            let x = match s.h_align {
                HorizontalAlign::Left => s.margin_left,
                HorizontalAlign::Center => s.margin_left + (width - child_width) * 0.5,
                HorizontalAlign::Right => width - s.margin_right - child_width,
            };
            child.move_to(x, y);
            y += child_height + s.vertical_gap;
        }
    }
}

/// Computes where a `child` sits inside `parent`.
///
/// Only the axes with an alignment are positioned; the other coordinate stays 0. `offset` is
/// added afterwards.
pub fn align(
    child: Size,
    parent: Size,
    v_align: Option<VerticalAlign>,
    h_align: Option<HorizontalAlign>,
    offset: Option<Point>,
) -> Point {
    let mut out = Point::ZERO;
    if let Some(v) = v_align {
        out.y = match v {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Center => (parent.height - child.height) * 0.5,
            VerticalAlign::Bottom => parent.height - child.height,
        };
    }
    if let Some(h) = h_align {
        out.x = match h {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => (parent.width - child.width) * 0.5,
            HorizontalAlign::Right => parent.width - child.width,
        };
    }
    if let Some(offset) = offset {
        out.x += offset.x;
        out.y += offset.y;
    }
    out
}

/// Validates `child` and returns its aligned position inside `parent`.
pub fn align_component(
    child: &mut dyn Component,
    parent: Size,
    v_align: Option<VerticalAlign>,
    h_align: Option<HorizontalAlign>,
    offset: Option<Point>,
) -> Point {
    child.validate_now();
    let size = Size::new(child.width(), child.height());
    align(size, parent, v_align, h_align, offset)
}
