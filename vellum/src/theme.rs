//! Text styling defaults and the pluggable text measurer.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use crate::Size;

/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    /// `0xRRGGBB`.
    pub fill: u32,
    /// Line height as a multiple of `font_size`.
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_owned(),
            font_size: 14.0,
            fill: 0xffffff,
            line_height: 1.2,
        }
    }
}

impl TextStyle {
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_fill(mut self, fill: u32) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }
}

/// Measures laid out text. A real backend supplies font metrics; the default estimates them.
pub trait TextMeasurer {
    /// `wrap_width` is set when the text should wrap at that width.
    fn measure(&self, text: &str, style: &TextStyle, wrap_width: Option<f32>) -> Size;
}

/// Every glyph advances by `font_size * advance`; wrapping breaks at any character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    pub advance: f32,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance: 0.5 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, wrap_width: Option<f32>) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let glyph = style.font_size * self.advance;
        let line_height = style.font_size * style.line_height;
        let mut width: f32 = 0.0;
        let mut lines = 0usize;
        for line in text.lines() {
            let line_width = line.chars().count() as f32 * glyph;
            match wrap_width {
                Some(wrap) if wrap > 0.0 && line_width > wrap => {
                    let per_line = (wrap / glyph).floor().max(1.0);
                    let count = line.chars().count() as f32;
                    lines += (count / per_line).ceil() as usize;
                    width = width.max(per_line * glyph);
                }
                _ => {
                    lines += 1;
                    width = width.max(line_width);
                }
            }
        }
        Size::new(width, lines.max(1) as f32 * line_height)
    }
}

/// Default text styles and the measurer labels use.
#[derive(Clone)]
pub struct Theme {
    pub text_style: TextStyle,
    pub disabled_text_style: Option<TextStyle>,
    pub measurer: Rc<dyn TextMeasurer>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_style: TextStyle::default(),
            disabled_text_style: None,
            measurer: Rc::new(FixedAdvanceMeasurer::default()),
        }
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("text_style", &self.text_style)
            .field("disabled_text_style", &self.disabled_text_style)
            .finish_non_exhaustive()
    }
}

thread_local! {
    static CURRENT: RefCell<Theme> = RefCell::new(Theme::default());
}

impl Theme {
    /// The theme new components pick up on this thread.
    pub fn current() -> Theme {
        CURRENT.with(|theme| theme.borrow().clone())
    }

    /// Replaces the thread's default theme. Existing components keep the theme they were built
    /// with.
    pub fn set_current(theme: Theme) {
        CURRENT.with(|current| *current.borrow_mut() = theme);
    }

    pub fn with_text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = text_style;
        self
    }

    pub fn with_disabled_text_style(mut self, text_style: Option<TextStyle>) -> Self {
        self.disabled_text_style = text_style;
        self
    }

    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Rc::new(measurer);
        self
    }
}
