use crate::Direction;

/// Configuration for a [`crate::VirtualList`].
///
/// The tile fields (`column_width`, `horizontal_gap`, `direction`) only affect a
/// [`crate::TileList`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOptions {
    pub width: f32,
    pub height: f32,
    pub row_height: f32,
    /// Space between rows.
    pub vertical_gap: f32,
    /// Space between the viewport edge and the rows, on every side.
    pub content_padding: f32,

    pub selectable: bool,
    pub allow_multiple_selection: bool,
    /// Upper bound for a multiple selection made by clicking. 0 means unlimited.
    pub max_selected: usize,

    pub column_width: f32,
    /// Space between columns.
    pub horizontal_gap: f32,
    /// The axis a tile list scrolls along.
    pub direction: Direction,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            row_height: 32.0,
            vertical_gap: 0.0,
            content_padding: 0.0,
            selectable: false,
            allow_multiple_selection: false,
            max_selected: 0,
            column_width: 80.0,
            horizontal_gap: 0.0,
            direction: Direction::Vertical,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_vertical_gap(mut self, vertical_gap: f32) -> Self {
        self.vertical_gap = vertical_gap;
        self
    }

    pub fn with_content_padding(mut self, content_padding: f32) -> Self {
        self.content_padding = content_padding;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_allow_multiple_selection(mut self, allow: bool) -> Self {
        self.allow_multiple_selection = allow;
        self
    }

    pub fn with_max_selected(mut self, max_selected: usize) -> Self {
        self.max_selected = max_selected;
        self
    }

    pub fn with_column_width(mut self, column_width: f32) -> Self {
        self.column_width = column_width;
        self
    }

    pub fn with_horizontal_gap(mut self, horizontal_gap: f32) -> Self {
        self.horizontal_gap = horizontal_gap;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}
