use crate::layout::align;
use crate::theme::{TextStyle, Theme};
use crate::{Component, ComponentCore, DirtyFlags, HorizontalAlign, Point, Size, VerticalAlign};

/// A single text field aligned inside the label's box.
#[derive(Debug)]
pub struct Label {
    core: ComponentCore,
    text: String,
    style: TextStyle,
    disabled_style: Option<TextStyle>,
    word_wrap: bool,
    v_align: VerticalAlign,
    h_align: HorizontalAlign,
    offset: Point,
    theme: Theme,
    text_size: Size,
    text_position: Point,
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_theme(text, Theme::current())
    }

    pub fn with_theme(text: impl Into<String>, theme: Theme) -> Self {
        Self {
            core: ComponentCore::with_size(100.0, 24.0),
            text: text.into(),
            style: theme.text_style.clone(),
            disabled_style: theme.disabled_text_style.clone(),
            word_wrap: false,
            v_align: VerticalAlign::Center,
            h_align: HorizontalAlign::Left,
            offset: Point::ZERO,
            theme,
            text_size: Size::ZERO,
            text_position: Point::ZERO,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.core
            .invalidation()
            .assign(&mut self.text, text.into(), DirtyFlags::TEXT);
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    pub fn set_word_wrap(&mut self, word_wrap: bool) {
        self.core
            .invalidation()
            .assign(&mut self.word_wrap, word_wrap, DirtyFlags::TEXT);
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.core
            .invalidation()
            .assign(&mut self.style, style, DirtyFlags::STATE);
    }

    pub fn set_disabled_text_style(&mut self, style: Option<TextStyle>) {
        self.core
            .invalidation()
            .assign(&mut self.disabled_style, style, DirtyFlags::STATE);
    }

    /// The style the text is drawn with right now.
    pub fn active_style(&self) -> &TextStyle {
        match (&self.disabled_style, self.core.enabled()) {
            (Some(disabled), false) => disabled,
            _ => &self.style,
        }
    }

    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.core
            .invalidation()
            .assign(&mut self.offset, Point::new(x, y), DirtyFlags::SIZE);
    }

    pub fn set_v_align(&mut self, v_align: VerticalAlign) {
        self.core
            .invalidation()
            .assign(&mut self.v_align, v_align, DirtyFlags::SIZE);
    }

    pub fn set_h_align(&mut self, h_align: HorizontalAlign) {
        self.core
            .invalidation()
            .assign(&mut self.h_align, h_align, DirtyFlags::SIZE);
    }

    /// Measured size of the text, zero when the text is empty.
    pub fn content_size(&self) -> Size {
        self.text_size
    }

    /// Top-left corner of the text inside the label.
    pub fn text_position(&self) -> Point {
        self.text_position
    }

    fn draw_text(&mut self) {
        let wrap_width = self.word_wrap.then_some(self.core.width());
        self.text_size = if self.text.is_empty() {
            Size::ZERO
        } else {
            self.theme
                .measurer
                .measure(&self.text, self.active_style(), wrap_width)
        };
    }
}

impl Component for Label {
    impl_component_core!(self.core);

    fn draw(&mut self) {
        let rewrap = self.word_wrap && self.core.is_invalid(DirtyFlags::SIZE);
        if rewrap || self.core.is_invalid(DirtyFlags::TEXT | DirtyFlags::STATE) {
            self.draw_text();
            self.core.invalidate(DirtyFlags::SIZE);
        }
        if self.core.is_invalid(DirtyFlags::SIZE) {
            let bounds = Size::new(self.core.width(), self.core.height());
            self.text_position = align(
                self.text_size,
                bounds,
                Some(self.v_align),
                Some(self.h_align),
                Some(self.offset),
            );
        }
    }
}
