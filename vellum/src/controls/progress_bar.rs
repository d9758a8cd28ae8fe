use core::fmt;
use std::rc::Rc;

use crate::container::Pane;
use crate::controls::Label;
use crate::{Component, DirtyFlags, HorizontalAlign, Placement, VerticalAlign};

/// Formats `(minimum, maximum, value)` into the bar's caption.
pub type ProgressTextEmitter = Rc<dyn Fn(f32, f32, f32) -> String>;

/// A track skin with a fill skin sized to the completed fraction, and an optional caption.
///
/// The pane skin is the track and spans the whole bar. The fill is inset by the bar padding and
/// grows toward `direction`. The caption is the text emitter's output, else the fixed text,
/// else `"<done> / <range>"`.
pub struct ProgressBar {
    pane: Pane,
    label: Label,
    fill: Option<Box<dyn Component>>,
    minimum: f32,
    maximum: f32,
    value: f32,
    direction: Placement,
    bar_padding: f32,
    display_text: bool,
    text: Option<String>,
    text_emitter: Option<ProgressTextEmitter>,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        let mut label = Label::new("");
        label.set_v_align(VerticalAlign::Center);
        label.set_h_align(HorizontalAlign::Center);
        Self {
            pane: Pane::with_size(100.0, 16.0),
            label,
            fill: None,
            minimum: 0.0,
            maximum: 1.0,
            value: 0.0,
            direction: Placement::Right,
            bar_padding: 0.0,
            display_text: false,
            text: None,
            text_emitter: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.value, value, DirtyFlags::STATE);
    }

    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn set_minimum(&mut self, minimum: f32) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.minimum, minimum, DirtyFlags::STATE);
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    pub fn set_maximum(&mut self, maximum: f32) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.maximum, maximum, DirtyFlags::STATE);
    }

    /// Completed fraction of the range, clamped to `[0, 1]`. An empty or inverted range reads
    /// as `0`.
    pub fn percent_complete(&self) -> f32 {
        let range = self.maximum - self.minimum;
        if range <= 0.0 || !range.is_finite() {
            return 0.0;
        }
        ((self.value - self.minimum) / range).clamp(0.0, 1.0)
    }

    pub fn direction(&self) -> Placement {
        self.direction
    }

    /// The edge the fill grows toward.
    pub fn set_direction(&mut self, direction: Placement) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.direction, direction, DirtyFlags::SIZE);
    }

    pub fn set_bar_padding(&mut self, padding: f32) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.bar_padding, padding, DirtyFlags::SIZE);
    }

    pub fn set_track_skin(&mut self, skin: Option<Box<dyn Component>>) -> Option<Box<dyn Component>> {
        self.pane.set_skin(skin)
    }

    pub fn fill(&self) -> Option<&dyn Component> {
        self.fill.as_deref()
    }

    /// Replaces the fill skin and hands the previous one back.
    pub fn set_fill_skin(&mut self, skin: Option<Box<dyn Component>>) -> Option<Box<dyn Component>> {
        self.pane.core.invalidate(DirtyFlags::SKIN);
        core::mem::replace(&mut self.fill, skin)
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn display_text(&self) -> bool {
        self.display_text
    }

    pub fn set_display_text(&mut self, display: bool) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.display_text, display, DirtyFlags::TEXT);
    }

    /// Fixed caption, used when no text emitter is set.
    pub fn set_text(&mut self, text: Option<String>) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.text, text, DirtyFlags::TEXT);
    }

    pub fn set_text_emitter(&mut self, emitter: impl Fn(f32, f32, f32) -> String + 'static) {
        self.text_emitter = Some(Rc::new(emitter));
        self.pane.core.invalidate(DirtyFlags::TEXT);
    }

    pub fn clear_text_emitter(&mut self) {
        if self.text_emitter.take().is_some() {
            self.pane.core.invalidate(DirtyFlags::TEXT);
        }
    }

    /// The caption the bar shows while `display_text` is on.
    pub fn caption(&self) -> String {
        if let Some(emitter) = &self.text_emitter {
            emitter(self.minimum, self.maximum, self.value)
        } else if let Some(text) = &self.text {
            text.clone()
        } else {
            let done = (self.value - self.minimum).floor();
            let range = (self.maximum - self.minimum).floor();
            format!("{done} / {range}")
        }
    }

    fn draw_text(&mut self) {
        self.label.core_mut().node.visible = self.display_text;
        if self.display_text {
            let caption = self.caption();
            self.label.set_text(caption);
        }
    }

    fn draw_layout(&mut self) {
        let (width, height) = (self.pane.core.width(), self.pane.core.height());
        let padding = self.bar_padding;
        let percent = self.percent_complete();
        if let Some(fill) = self.fill.as_deref_mut() {
            let inner_width = (width - padding * 2.0).max(0.0);
            let inner_height = (height - padding * 2.0).max(0.0);
            let (fill_width, fill_height) = match self.direction {
                Placement::Left | Placement::Right => (inner_width * percent, inner_height),
                Placement::Up | Placement::Down => (inner_width, inner_height * percent),
            };
            let (x, y) = match self.direction {
                Placement::Right => (padding, padding),
                Placement::Left => (width - padding - fill_width, padding),
                Placement::Down => (padding, padding),
                Placement::Up => (padding, height - padding - fill_height),
            };
            fill.resize(fill_width, fill_height);
            fill.move_to(x, y);
            fill.validate_now();
        }
        if self.display_text {
            self.label.resize(width, height);
            self.label.validate_now();
        }
    }
}

impl fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressBar")
            .field("core", &self.pane.core)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("value", &self.value)
            .field("direction", &self.direction)
            .field("display_text", &self.display_text)
            .finish_non_exhaustive()
    }
}

impl Component for ProgressBar {
    impl_component_core!(self.pane.core);

    fn draw(&mut self) {
        if self.pane.core.is_invalid(DirtyFlags::SKIN) {
            self.pane.core.invalidate(DirtyFlags::STATE);
        }
        if self.pane.core.is_invalid(DirtyFlags::STATE) {
            self.pane.core.invalidate(DirtyFlags::TEXT | DirtyFlags::SIZE);
        }
        if self.pane.core.is_invalid(DirtyFlags::TEXT) {
            self.draw_text();
            self.pane.core.invalidate(DirtyFlags::SIZE);
        }
        if self.pane.core.is_invalid(DirtyFlags::SIZE) {
            self.draw_layout();
        }
        self.pane.draw_skin();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.pane.visit(f);
        if let Some(fill) = self.fill.as_deref_mut() {
            f(fill);
        }
        f(&mut self.label);
    }
}
