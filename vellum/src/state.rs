use crate::VisibleWindow;

/// A pair of scroll offsets.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollPosition {
    pub vertical: f32,
    pub horizontal: f32,
}

impl ScrollPosition {
    pub const ZERO: Self = Self {
        vertical: 0.0,
        horizontal: 0.0,
    };

    pub fn new(vertical: f32, horizontal: f32) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

/// A lightweight, serializable snapshot of a list's scroll position and selection.
///
/// This is useful for restoring UI state across sessions without keeping the list (or its
/// renderers) alive. The window is informational; restoring recomputes it.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListState {
    pub scroll: ScrollPosition,
    pub selected_indices: Vec<usize>,
    pub window: VisibleWindow,
}
