//! Clamped two-axis scrolling over a content area larger than the viewport.

use crate::container::Pane;
use crate::{Component, DirtyFlags, Rect, ScrollPosition, Size};

/// A pane that scrolls its content.
///
/// The maximum scroll offset on each axis is `max(0, content - (size - 2 * padding))`. Scroll
/// positions are always kept inside `[0, max]`.
#[derive(Debug)]
pub struct ScrollPane {
    pub pane: Pane,
    content: Size,
    padding: f32,
    position: ScrollPosition,
}

impl Default for ScrollPane {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollPane {
    pub fn new() -> Self {
        Self::from_pane(Pane::new())
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        Self::from_pane(Pane::with_size(width, height))
    }

    fn from_pane(pane: Pane) -> Self {
        Self {
            pane,
            content: Size::ZERO,
            padding: 0.0,
            position: ScrollPosition::ZERO,
        }
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn set_content_size(&mut self, width: f32, height: f32) {
        let invalidation = self.pane.core.invalidation();
        invalidation.assign(&mut self.content, Size::new(width, height), DirtyFlags::SIZE);
    }

    /// Stores a content size computed during a draw pass.
    pub(crate) fn store_content_size(&mut self, size: Size) {
        self.content = size;
    }

    pub fn content_padding(&self) -> f32 {
        self.padding
    }

    pub fn set_content_padding(&mut self, padding: f32) {
        let invalidation = self.pane.core.invalidation();
        invalidation.assign(&mut self.padding, padding, DirtyFlags::SIZE);
    }

    pub fn inner_size(&self) -> Size {
        let core = &self.pane.core;
        Size::new(
            (core.width() - 2.0 * self.padding).max(0.0),
            (core.height() - 2.0 * self.padding).max(0.0),
        )
    }

    /// The viewport inside the padding. Content outside it is masked.
    pub fn inner_rect(&self) -> Rect {
        let inner = self.inner_size();
        Rect::new(self.padding, self.padding, inner.width, inner.height)
    }

    pub fn max_scroll(&self) -> ScrollPosition {
        let inner = self.inner_size();
        ScrollPosition::new(
            (self.content.height - inner.height).max(0.0),
            (self.content.width - inner.width).max(0.0),
        )
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    pub fn clamp(&self, target: ScrollPosition) -> ScrollPosition {
        let max = self.max_scroll();
        ScrollPosition::new(
            target.vertical.clamp(0.0, max.vertical),
            target.horizontal.clamp(0.0, max.horizontal),
        )
    }

    /// Clamps and stores `target`, marking `SCROLL` dirty if the position moved.
    pub fn store_position(&mut self, target: ScrollPosition) -> bool {
        let clamped = self.clamp(target);
        let invalidation = self.pane.core.invalidation();
        invalidation.assign(&mut self.position, clamped, DirtyFlags::SCROLL)
    }

    /// Re-clamps the current position against the current maxima without invalidating.
    pub fn clamp_position(&mut self) {
        self.position = self.clamp(self.position);
    }

    /// The mask and skin stages shared by every scrolling component.
    pub fn draw_chrome(&mut self) {
        if self.pane.core.is_invalid(DirtyFlags::SIZE) {
            self.pane.core.node.mask = Some(self.inner_rect());
        }
        self.pane.draw_skin();
    }
}

impl Component for ScrollPane {
    impl_component_core!(self.pane.core);

    fn draw(&mut self) {
        if self.pane.core.is_invalid(DirtyFlags::SIZE | DirtyFlags::SCROLL) {
            self.clamp_position();
        }
        self.draw_chrome();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.pane.visit(f);
    }
}

impl Scrollable for ScrollPane {
    fn scroll_pane(&self) -> &ScrollPane {
        self
    }

    fn scroll_pane_mut(&mut self) -> &mut ScrollPane {
        self
    }
}

/// A component with a [`ScrollPane`] whose position can be driven programmatically.
///
/// Setting a position clamps it and, if it moved, validates the component synchronously so the
/// visible content is current when the call returns.
pub trait Scrollable: Component {
    fn scroll_pane(&self) -> &ScrollPane;
    fn scroll_pane_mut(&mut self) -> &mut ScrollPane;

    /// Brings the content size up to date before a position is clamped against it.
    fn measure_content(&mut self) {}

    /// The position that brings data `index` to the top (or left) of the viewport.
    fn index_scroll_target(&self, _index: usize) -> ScrollPosition {
        self.scroll_position()
    }

    /// The position of page `page`, one viewport per page.
    fn page_scroll_target(&self, page: usize) -> ScrollPosition {
        let pane = self.scroll_pane();
        ScrollPosition::new(
            pane.inner_size().height * page as f32,
            pane.position().horizontal,
        )
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll_pane().position()
    }

    fn max_scroll_position(&self) -> ScrollPosition {
        self.scroll_pane().max_scroll()
    }

    fn vertical_scroll_position(&self) -> f32 {
        self.scroll_pane().position().vertical
    }

    fn horizontal_scroll_position(&self) -> f32 {
        self.scroll_pane().position().horizontal
    }

    fn set_vertical_scroll_position(&mut self, vertical: f32) {
        let horizontal = self.horizontal_scroll_position();
        self.scroll_to(ScrollPosition::new(vertical, horizontal));
    }

    fn set_horizontal_scroll_position(&mut self, horizontal: f32) {
        let vertical = self.vertical_scroll_position();
        self.scroll_to(ScrollPosition::new(vertical, horizontal));
    }

    /// Clamps `target` against the up to date content size.
    fn clamp_scroll_target(&mut self, target: ScrollPosition) -> ScrollPosition {
        self.measure_content();
        self.scroll_pane().clamp(target)
    }

    fn scroll_to(&mut self, target: ScrollPosition) {
        self.measure_content();
        if self.scroll_pane_mut().store_position(target) {
            self.validate_now();
        }
    }

    fn scroll_by(&mut self, vertical: f32, horizontal: f32) {
        let current = self.scroll_position();
        self.scroll_to(ScrollPosition::new(
            current.vertical + vertical,
            current.horizontal + horizontal,
        ));
    }

    fn scroll_to_index(&mut self, index: usize) {
        let target = self.index_scroll_target(index);
        self.scroll_to(target);
    }

    fn scroll_to_page(&mut self, page: usize) {
        let target = self.page_scroll_target(page);
        self.scroll_to(target);
    }
}
