//! Virtualized lists: only the rows (or tiles) inside the viewport get a renderer, and renderers
//! are recycled as the window moves.

use core::cell::RefCell;
use core::cmp::Ordering;
use core::fmt;
use std::rc::{Rc, Weak};

use crate::key::{ItemKey, ItemMap, ItemSet};
use crate::renderer::{LabelEmitter, LabelItemRenderer, RendererFactory};
use crate::scroll::{ScrollPane, Scrollable};
use crate::{
    ChangeEvent, ChangeKind, Component, DataProvider, Direction, DirtyFlags, Event, EventEmitter,
    EventType, InvalidationSet, ItemRenderer, ListOptions, ListState, NodeId, Point, PointerEvent,
    Rect, Result, ScrollPosition, Selection, Size, SubscriptionId, VisibleWindow,
};

/// Decides whether the renderer of an item is enabled.
pub type EnabledPredicate<T> = Rc<dyn Fn(&T) -> bool>;

/// The geometry an [`Arrangement`] works with during one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListMetrics {
    /// Viewport size inside the content padding.
    pub inner: Size,
    pub row_height: f32,
    pub vertical_gap: f32,
    pub len: usize,
}

impl ListMetrics {
    pub fn padded_row(&self) -> f32 {
        step(self.row_height, self.vertical_gap)
    }
}

/// How a virtual list maps data indexes onto the plane.
pub trait Arrangement: fmt::Debug + 'static {
    fn from_options(options: &ListOptions) -> Self
    where
        Self: Sized;

    fn content_size(&self, metrics: &ListMetrics) -> Size;

    /// Rows visible along the vertical axis, rounded up.
    fn rows_count(&self, metrics: &ListMetrics) -> usize {
        visible_lines(metrics.inner.height, metrics.row_height, metrics.vertical_gap)
    }

    /// The indexes to render for `scroll`, including one line of slack past each edge.
    fn window(&self, metrics: &ListMetrics, scroll: ScrollPosition) -> VisibleWindow;

    /// Offset of the renderer container inside the list. It moves by less than one line; the
    /// window start absorbs whole lines.
    fn origin(&self, metrics: &ListMetrics, scroll: ScrollPosition, padding: f32) -> Point;

    /// Position of the renderer for `index` inside the renderer container.
    fn slot(&self, metrics: &ListMetrics, index: usize, window: VisibleWindow) -> Point;

    fn renderer_size(&self, metrics: &ListMetrics) -> Size;

    fn index_target(
        &self,
        metrics: &ListMetrics,
        index: usize,
        current: ScrollPosition,
    ) -> ScrollPosition;

    fn page_target(
        &self,
        metrics: &ListMetrics,
        page: usize,
        current: ScrollPosition,
    ) -> ScrollPosition;

    fn pages_count(&self, metrics: &ListMetrics) -> usize;
}

/// One full-width row per item, scrolling vertically.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowLayout;

impl Arrangement for RowLayout {
    fn from_options(_options: &ListOptions) -> Self {
        Self
    }

    fn content_size(&self, m: &ListMetrics) -> Size {
        let height = m.len as f32 * m.padded_row() - m.vertical_gap;
        Size::new(m.inner.width, height.max(0.0))
    }

    fn window(&self, m: &ListMetrics, scroll: ScrollPosition) -> VisibleWindow {
        let start = first_line(scroll.vertical, m.padded_row()).min(m.len);
        let end = m
            .len
            .min(start.saturating_add(self.rows_count(m).saturating_add(2)));
        VisibleWindow {
            start_index: start,
            end_index: end,
        }
    }

    fn origin(&self, m: &ListMetrics, scroll: ScrollPosition, padding: f32) -> Point {
        Point::new(
            padding - scroll.horizontal,
            padding - scroll.vertical % m.padded_row(),
        )
    }

    fn slot(&self, m: &ListMetrics, index: usize, window: VisibleWindow) -> Point {
        let row = index.saturating_sub(window.start_index);
        Point::new(0.0, row as f32 * m.padded_row())
    }

    fn renderer_size(&self, m: &ListMetrics) -> Size {
        Size::new(m.inner.width, m.row_height)
    }

    fn index_target(&self, m: &ListMetrics, index: usize, current: ScrollPosition) -> ScrollPosition {
        ScrollPosition::new(index as f32 * m.padded_row(), current.horizontal)
    }

    fn page_target(&self, m: &ListMetrics, page: usize, current: ScrollPosition) -> ScrollPosition {
        let page_height = self.rows_count(m) as f32 * m.padded_row();
        ScrollPosition::new(page as f32 * page_height, current.horizontal)
    }

    fn pages_count(&self, m: &ListMetrics) -> usize {
        let content = self.content_size(m).height;
        let per_page = self.rows_count(m) as f32;
        (content / m.padded_row() / per_page).ceil() as usize
    }
}

/// A grid of fixed-size tiles. A vertical tile list fills rows left to right and scrolls
/// vertically; a horizontal one fills columns top to bottom and scrolls horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileLayout {
    pub column_width: f32,
    pub horizontal_gap: f32,
    pub direction: Direction,
}

impl Default for TileLayout {
    fn default() -> Self {
        Self::from_options(&ListOptions::default())
    }
}

impl TileLayout {
    fn padded_column(&self) -> f32 {
        step(self.column_width, self.horizontal_gap)
    }

    /// Tiles per line across the scrolled axis: as many as fit, at least one.
    pub fn cross_count(&self, m: &ListMetrics) -> usize {
        match self.direction {
            Direction::Vertical => {
                fitting_lines(m.inner.width, self.column_width, self.horizontal_gap)
            }
            Direction::Horizontal => {
                fitting_lines(m.inner.height, m.row_height, m.vertical_gap)
            }
        }
    }

    /// Columns in view: the columns per row of a vertical list, or the visible columns of a
    /// horizontal one.
    pub fn columns_count(&self, m: &ListMetrics) -> usize {
        match self.direction {
            Direction::Vertical => self.cross_count(m),
            Direction::Horizontal => {
                visible_lines(m.inner.width, self.column_width, self.horizontal_gap)
            }
        }
    }

    fn main_step(&self, m: &ListMetrics) -> f32 {
        match self.direction {
            Direction::Vertical => m.padded_row(),
            Direction::Horizontal => self.padded_column(),
        }
    }

    fn main_offset(&self, scroll: ScrollPosition) -> f32 {
        match self.direction {
            Direction::Vertical => scroll.vertical,
            Direction::Horizontal => scroll.horizontal,
        }
    }

    fn visible_main_lines(&self, m: &ListMetrics) -> usize {
        match self.direction {
            Direction::Vertical => visible_lines(m.inner.height, m.row_height, m.vertical_gap),
            Direction::Horizontal => {
                visible_lines(m.inner.width, self.column_width, self.horizontal_gap)
            }
        }
    }
}

impl Arrangement for TileLayout {
    fn from_options(options: &ListOptions) -> Self {
        Self {
            column_width: options.column_width,
            horizontal_gap: options.horizontal_gap,
            direction: options.direction,
        }
    }

    fn content_size(&self, m: &ListMetrics) -> Size {
        let cross = self.cross_count(m);
        let lines = m.len.div_ceil(cross);
        let (columns, rows) = match self.direction {
            Direction::Vertical => (cross, lines),
            Direction::Horizontal => (lines, cross),
        };
        Size::new(
            (columns as f32 * self.padded_column() - self.horizontal_gap).max(0.0),
            (rows as f32 * m.padded_row() - m.vertical_gap).max(0.0),
        )
    }

    fn rows_count(&self, m: &ListMetrics) -> usize {
        match self.direction {
            Direction::Vertical => visible_lines(m.inner.height, m.row_height, m.vertical_gap),
            Direction::Horizontal => self.cross_count(m),
        }
    }

    fn window(&self, m: &ListMetrics, scroll: ScrollPosition) -> VisibleWindow {
        let cross = self.cross_count(m);
        let first = first_line(self.main_offset(scroll), self.main_step(m));
        let start = first.saturating_mul(cross).min(m.len);
        let span = self.visible_main_lines(m).saturating_add(2).saturating_mul(cross);
        VisibleWindow {
            start_index: start,
            end_index: m.len.min(start.saturating_add(span)),
        }
    }

    fn origin(&self, m: &ListMetrics, scroll: ScrollPosition, padding: f32) -> Point {
        match self.direction {
            Direction::Vertical => Point::new(
                padding - scroll.horizontal,
                padding - scroll.vertical % m.padded_row(),
            ),
            Direction::Horizontal => Point::new(
                padding - scroll.horizontal % self.padded_column(),
                padding - scroll.vertical,
            ),
        }
    }

    fn slot(&self, m: &ListMetrics, index: usize, window: VisibleWindow) -> Point {
        let cross = self.cross_count(m);
        let offset = index.saturating_sub(window.start_index);
        let (column, row) = match self.direction {
            Direction::Vertical => (offset % cross, offset / cross),
            Direction::Horizontal => (offset / cross, offset % cross),
        };
        Point::new(
            column as f32 * self.padded_column(),
            row as f32 * m.padded_row(),
        )
    }

    fn renderer_size(&self, m: &ListMetrics) -> Size {
        Size::new(self.column_width, m.row_height)
    }

    fn index_target(&self, m: &ListMetrics, index: usize, current: ScrollPosition) -> ScrollPosition {
        let line = (index / self.cross_count(m)) as f32;
        match self.direction {
            Direction::Vertical => ScrollPosition::new(line * m.padded_row(), current.horizontal),
            Direction::Horizontal => {
                ScrollPosition::new(current.vertical, line * self.padded_column())
            }
        }
    }

    fn page_target(&self, m: &ListMetrics, page: usize, current: ScrollPosition) -> ScrollPosition {
        let page_extent = self.visible_main_lines(m) as f32 * self.main_step(m);
        let offset = page as f32 * page_extent;
        match self.direction {
            Direction::Vertical => ScrollPosition::new(offset, current.horizontal),
            Direction::Horizontal => ScrollPosition::new(current.vertical, offset),
        }
    }

    fn pages_count(&self, m: &ListMetrics) -> usize {
        let content = self.content_size(m);
        let main = match self.direction {
            Direction::Vertical => content.height,
            Direction::Horizontal => content.width,
        };
        let per_page = self.visible_main_lines(m) as f32;
        (main / self.main_step(m) / per_page).ceil() as usize
    }
}

fn step(extent: f32, gap: f32) -> f32 {
    let step = extent + gap;
    if step > 0.0 {
        step
    } else {
        vwarn!(extent, gap, "non-positive line extent; using 1");
        1.0
    }
}

fn first_line(offset: f32, step: f32) -> usize {
    (offset.max(0.0) / step).floor() as usize
}

/// Lines needed to cover `extent`, a partial line counting as one.
fn visible_lines(extent: f32, line: f32, gap: f32) -> usize {
    (((extent + gap) / step(line, gap)).ceil() as usize).max(1)
}

/// Whole lines that fit in `extent`.
fn fitting_lines(extent: f32, line: f32, gap: f32) -> usize {
    (((extent + gap) / step(line, gap)).floor() as usize).max(1)
}

/// List state reachable from provider and renderer listeners.
#[derive(Debug)]
struct ListShared {
    selection: Selection,
    selectable: bool,
    allow_multiple: bool,
    max_selected: usize,
    enabled: bool,
    /// Items bound to an active renderer after the last pass.
    rendered: ItemSet,
    /// Rendered items whose renderer must be rebound on the next pass.
    invalid: ItemSet,
    discard_renderers: bool,
}

impl ListShared {
    fn new(options: &ListOptions) -> Self {
        Self {
            selection: Selection::new(),
            selectable: options.selectable,
            allow_multiple: options.allow_multiple_selection,
            max_selected: options.max_selected,
            enabled: true,
            rendered: ItemSet::new(),
            invalid: ItemSet::new(),
            discard_renderers: false,
        }
    }

    fn apply_change<T>(&mut self, event: &ChangeEvent<T>) {
        match event.kind {
            ChangeKind::InvalidateAll => {
                self.selection.clear();
                self.discard_renderers = true;
            }
            ChangeKind::Invalidate => {
                for item in &event.items {
                    let key = ItemKey::of(item);
                    if self.rendered.contains(&key) {
                        self.invalid.insert(key);
                    }
                }
            }
            _ => {
                self.selection.apply_change(event);
            }
        }
    }

    /// Applies a click on `index` to the selection.
    fn toggle(&mut self, index: usize) {
        if self.selection.contains(index) {
            if self.allow_multiple {
                self.selection.remove(index);
            } else {
                self.selection.clear();
            }
        } else if self.allow_multiple {
            if self.max_selected == 0 || self.selection.len() < self.max_selected {
                self.selection.insert(index);
            }
        } else {
            self.selection.replace(index);
        }
    }
}

fn provider_listener<T>(
    shared: Weak<RefCell<ListShared>>,
    invalidation: Weak<InvalidationSet>,
) -> impl Fn(&ChangeEvent<T>) + 'static {
    move |event| {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        shared.borrow_mut().apply_change(event);
        if let Some(invalidation) = invalidation.upgrade() {
            invalidation.invalidate(DirtyFlags::DATA);
        }
    }
}

fn item_tap_listener(
    shared: Weak<RefCell<ListShared>>,
    emitter: Weak<EventEmitter>,
    invalidation: Weak<InvalidationSet>,
    list: NodeId,
) -> impl Fn(&Event) + 'static {
    move |event| {
        let (Some(shared), Some(emitter)) = (shared.upgrade(), emitter.upgrade()) else {
            return;
        };
        let Some(index) = event.index else {
            return;
        };
        if !shared.borrow().enabled {
            return;
        }
        emitter.emit(&Event {
            kind: EventType::ItemClick,
            target: list,
            index: Some(index),
        });
        let current = {
            let mut shared = shared.borrow_mut();
            if !shared.selectable {
                return;
            }
            shared.toggle(index);
            shared.selection.current()
        };
        if let Some(invalidation) = invalidation.upgrade() {
            invalidation.invalidate(DirtyFlags::SELECTION);
        }
        emitter.emit(&Event {
            kind: EventType::SelectionChange,
            target: list,
            index: current,
        });
    }
}

/// A scrollable view over a [`DataProvider`] that renders only the visible window.
///
/// Each pass reclaims the active renderers, then fills the window: a renderer still showing the
/// same (valid) item is reused as is, otherwise one is taken from the pool and rebound, and only
/// when the pool is empty is a new one built with the factory. The number of renderers ever
/// built is therefore bounded by the largest window, not by the data length.
///
/// Selection is kept as data indexes and remapped on every structural change of the provider.
pub struct VirtualList<T: 'static, A: Arrangement = RowLayout> {
    scroll: ScrollPane,
    arrangement: A,
    row_height: f32,
    vertical_gap: f32,
    shared: Rc<RefCell<ListShared>>,
    provider: Option<DataProvider<T>>,
    subscription: Option<SubscriptionId>,
    factory: RendererFactory<T>,
    label_emitter: Option<LabelEmitter<T>>,
    enabled_predicate: Option<EnabledPredicate<T>>,
    active: Vec<Box<dyn ItemRenderer<T>>>,
    available: Vec<Box<dyn ItemRenderer<T>>>,
    window: VisibleWindow,
    list_origin: Point,
    renderers_constructed: usize,
}

pub type List<T> = VirtualList<T, RowLayout>;
pub type TileList<T> = VirtualList<T, TileLayout>;

impl<T: fmt::Display + 'static> VirtualList<T, RowLayout> {
    /// A list whose rows show each item's `Display` text.
    pub fn new(options: ListOptions) -> Self {
        Self::with_factory(options, LabelItemRenderer::display_factory())
    }
}

impl<T: fmt::Display + 'static> VirtualList<T, TileLayout> {
    /// A tile list whose tiles show each item's `Display` text.
    pub fn new(options: ListOptions) -> Self {
        Self::with_factory(options, LabelItemRenderer::display_factory())
    }
}

impl<T: 'static> VirtualList<T, TileLayout> {
    pub fn columns_count(&self) -> usize {
        self.arrangement.columns_count(&self.metrics())
    }

    /// Resizes the list to show exactly `count` columns.
    pub fn set_columns_count(&mut self, count: usize) {
        let layout = self.arrangement;
        let count = count.max(1) as f32;
        let width = count * (layout.column_width + layout.horizontal_gap) - layout.horizontal_gap
            + 2.0 * self.scroll.content_padding();
        self.set_component_width(width);
    }

    pub fn set_column_width(&mut self, column_width: f32) {
        let invalidation = self.scroll.pane.core.invalidation();
        invalidation.assign(
            &mut self.arrangement.column_width,
            column_width,
            DirtyFlags::SIZE,
        );
    }

    pub fn set_horizontal_gap(&mut self, gap: f32) {
        let invalidation = self.scroll.pane.core.invalidation();
        invalidation.assign(&mut self.arrangement.horizontal_gap, gap, DirtyFlags::SIZE);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        let invalidation = self.scroll.pane.core.invalidation();
        invalidation.assign(&mut self.arrangement.direction, direction, DirtyFlags::SIZE);
    }
}

impl<T: 'static, A: Arrangement> VirtualList<T, A> {
    pub fn with_factory(options: ListOptions, factory: RendererFactory<T>) -> Self {
        let mut scroll = ScrollPane::with_size(options.width, options.height);
        scroll.set_content_padding(options.content_padding);
        Self {
            scroll,
            arrangement: A::from_options(&options),
            row_height: options.row_height,
            vertical_gap: options.vertical_gap,
            shared: Rc::new(RefCell::new(ListShared::new(&options))),
            provider: None,
            subscription: None,
            factory,
            label_emitter: None,
            enabled_predicate: None,
            active: Vec::new(),
            available: Vec::new(),
            window: VisibleWindow::default(),
            list_origin: Point::ZERO,
            renderers_constructed: 0,
        }
    }

    /// Uses `provider` from the start.
    pub fn with_data_provider(mut self, provider: DataProvider<T>) -> Self {
        self.set_data_provider(Some(provider));
        self
    }

    pub fn arrangement(&self) -> &A {
        &self.arrangement
    }

    pub fn metrics(&self) -> ListMetrics {
        ListMetrics {
            inner: self.scroll.inner_size(),
            row_height: self.row_height,
            vertical_gap: self.vertical_gap,
            len: self.len(),
        }
    }

    /// The provider, created empty on first use.
    pub fn data_provider(&mut self) -> DataProvider<T> {
        match &self.provider {
            Some(provider) => provider.clone(),
            None => {
                let provider = DataProvider::new();
                self.attach(provider.clone());
                provider
            }
        }
    }

    /// Replaces the provider. Selection and every renderer are dropped.
    pub fn set_data_provider(&mut self, provider: Option<DataProvider<T>>) {
        let same = match (&self.provider, &provider) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        self.detach();
        if let Some(provider) = provider {
            self.attach(provider);
        }
        self.shared.borrow_mut().selection.clear();
        self.clear_all_renderers();
    }

    fn attach(&mut self, provider: DataProvider<T>) {
        let listener = provider_listener(
            Rc::downgrade(&self.shared),
            Rc::downgrade(self.scroll.pane.core.invalidation()),
        );
        self.subscription = Some(provider.subscribe(listener));
        self.provider = Some(provider);
        self.scroll.pane.core.invalidate(DirtyFlags::DATA);
    }

    fn detach(&mut self) {
        if let (Some(provider), Some(id)) = (self.provider.take(), self.subscription.take()) {
            provider.unsubscribe(id);
        }
    }

    pub fn len(&self) -> usize {
        self.provider.as_ref().map_or(0, DataProvider::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item_at(&self, index: usize) -> Result<Rc<T>> {
        match &self.provider {
            Some(provider) => provider.item_at(index),
            None => Err(crate::Error::IndexOutOfRange { index, len: 0 }),
        }
    }

    pub fn add_item(&mut self, item: impl Into<Rc<T>>) {
        self.data_provider().add_item(item);
    }

    pub fn add_item_at(&mut self, item: impl Into<Rc<T>>, index: usize) -> Result<()> {
        self.data_provider().add_item_at(item, index)
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = Rc<T>>) {
        self.data_provider().add_items(items);
    }

    pub fn remove_item(&mut self, item: &Rc<T>) -> Option<Rc<T>> {
        self.provider.as_ref()?.remove_item(item)
    }

    pub fn remove_item_at(&mut self, index: usize) -> Result<Rc<T>> {
        self.data_provider().remove_item_at(index)
    }

    pub fn remove_all(&mut self) {
        if let Some(provider) = &self.provider {
            provider.remove_all();
        }
    }

    pub fn replace_item_at(&mut self, item: impl Into<Rc<T>>, index: usize) -> Result<Rc<T>> {
        self.data_provider().replace_item_at(item, index)
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        if let Some(provider) = &self.provider {
            provider.sort_by(compare);
        }
    }

    /// Forces the renderer of `item` to rebind on the next pass, if it is rendered.
    pub fn invalidate_item(&mut self, item: &Rc<T>) {
        let key = ItemKey::of(item);
        let marked = {
            let mut shared = self.shared.borrow_mut();
            shared.rendered.contains(&key) && shared.invalid.insert(key)
        };
        if marked {
            self.scroll.pane.core.invalidate(DirtyFlags::DATA);
        }
    }

    pub fn invalidate_item_at(&mut self, index: usize) -> Result<()> {
        let item = self.item_at(index)?;
        self.invalidate_item(&item);
        Ok(())
    }

    /// Destroys every renderer, active and pooled. The next pass builds new ones.
    pub fn clear_all_renderers(&mut self) {
        for mut renderer in self.active.drain(..).chain(self.available.drain(..)) {
            renderer.destroy();
        }
        {
            let mut shared = self.shared.borrow_mut();
            shared.rendered.clear();
            shared.invalid.clear();
        }
        self.scroll.pane.core.invalidate(DirtyFlags::DATA);
    }

    pub fn set_renderer_factory(&mut self, factory: RendererFactory<T>) {
        self.factory = factory;
        self.scroll.pane.core.invalidate(DirtyFlags::RENDERER);
    }

    /// Formats the text of every renderer, overriding the renderer's own formatting.
    pub fn set_label_emitter(&mut self, emitter: impl Fn(&T) -> String + 'static) {
        let emitter: LabelEmitter<T> = Rc::new(emitter);
        self.label_emitter = Some(emitter);
        self.scroll.pane.core.invalidate(DirtyFlags::DATA);
    }

    pub fn clear_label_emitter(&mut self) {
        if self.label_emitter.take().is_some() {
            self.scroll.pane.core.invalidate(DirtyFlags::DATA);
        }
    }

    /// Renderers of items failing `predicate` are disabled and ignore taps.
    pub fn set_enabled_predicate(&mut self, predicate: impl Fn(&T) -> bool + 'static) {
        let predicate: EnabledPredicate<T> = Rc::new(predicate);
        self.enabled_predicate = Some(predicate);
        self.scroll.pane.core.invalidate(DirtyFlags::DATA);
    }

    pub fn clear_enabled_predicate(&mut self) {
        if self.enabled_predicate.take().is_some() {
            self.scroll.pane.core.invalidate(DirtyFlags::DATA);
        }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn set_row_height(&mut self, row_height: f32) {
        let invalidation = self.scroll.pane.core.invalidation();
        invalidation.assign(&mut self.row_height, row_height, DirtyFlags::SIZE);
    }

    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    pub fn set_vertical_gap(&mut self, gap: f32) {
        let invalidation = self.scroll.pane.core.invalidation();
        invalidation.assign(&mut self.vertical_gap, gap, DirtyFlags::SIZE);
    }

    pub fn set_content_padding(&mut self, padding: f32) {
        self.scroll.set_content_padding(padding);
    }

    pub fn selectable(&self) -> bool {
        self.shared.borrow().selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.shared.borrow_mut().selectable = selectable;
        self.scroll.pane.core.invalidate(DirtyFlags::SELECTION);
    }

    pub fn set_allow_multiple_selection(&mut self, allow: bool) {
        self.shared.borrow_mut().allow_multiple = allow;
        self.scroll.pane.core.invalidate(DirtyFlags::SELECTION);
    }

    /// Caps multi-selection at `max_selected` items; `0` means unlimited. A tap that would
    /// select past the cap is dropped and the selection stays as it was.
    pub fn set_max_selected(&mut self, max_selected: usize) {
        self.shared.borrow_mut().max_selected = max_selected;
        self.scroll.pane.core.invalidate(DirtyFlags::SELECTION);
    }

    /// The most recently selected index.
    pub fn selected_index(&self) -> Option<usize> {
        self.shared.borrow().selection.current()
    }

    /// Ignored unless the list is selectable. `None` clears the selection.
    pub fn set_selected_index(&mut self, index: Option<usize>) {
        self.set_selected_indices(index);
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.shared.borrow().selection.indices().to_vec()
    }

    /// Ignored unless the list is selectable. Out of range indexes are dropped.
    pub fn set_selected_indices(&mut self, indices: impl IntoIterator<Item = usize>) {
        if !self.selectable() {
            return;
        }
        self.replace_selection(indices);
    }

    fn replace_selection(&mut self, indices: impl IntoIterator<Item = usize>) {
        let len = self.len();
        let selection = Selection::from_indices(indices.into_iter().filter(|&i| i < len));
        self.shared.borrow_mut().selection = selection;
        self.scroll.pane.core.invalidate(DirtyFlags::SELECTION);
    }

    /// The item at the most recently selected index.
    pub fn selected_item(&self) -> Option<Rc<T>> {
        self.item_at(self.selected_index()?).ok()
    }

    pub fn set_selected_item(&mut self, item: Option<&Rc<T>>) {
        let index = item.and_then(|item| self.provider.as_ref()?.item_index(item));
        self.set_selected_index(index);
    }

    pub fn selected_items(&self) -> Vec<Rc<T>> {
        self.selected_indices()
            .into_iter()
            .filter_map(|i| self.item_at(i).ok())
            .collect()
    }

    /// Selects the given items, skipping any that are not in the provider.
    pub fn set_selected_items(&mut self, items: &[Rc<T>]) {
        let indices: Vec<usize> = match &self.provider {
            Some(provider) => items
                .iter()
                .filter_map(|item| provider.item_index(item))
                .collect(),
            None => Vec::new(),
        };
        self.set_selected_indices(indices);
    }

    pub fn clear_selection(&mut self) {
        self.shared.borrow_mut().selection.clear();
        self.scroll.pane.core.invalidate(DirtyFlags::SELECTION);
    }

    pub fn is_item_selected(&self, item: &Rc<T>) -> bool {
        let Some(index) = self.provider.as_ref().and_then(|p| p.item_index(item)) else {
            return false;
        };
        self.shared.borrow().selection.contains(index)
    }

    pub fn scroll_to_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            self.scroll_to_index(index);
        }
    }

    /// The active renderer showing `item`.
    pub fn item_renderer(&self, item: &Rc<T>) -> Option<&dyn ItemRenderer<T>> {
        self.active
            .iter()
            .find(|r| r.data().is_some_and(|data| Rc::ptr_eq(data, item)))
            .map(|r| r.as_ref())
    }

    pub fn renderer_for_index(&self, index: usize) -> Option<&dyn ItemRenderer<T>> {
        self.active
            .iter()
            .find(|r| r.index() == Some(index))
            .map(|r| r.as_ref())
    }

    pub fn renderer_for_index_mut(&mut self, index: usize) -> Option<&mut dyn ItemRenderer<T>> {
        match self.active.iter_mut().find(|r| r.index() == Some(index)) {
            Some(renderer) => Some(renderer.as_mut()),
            None => None,
        }
    }

    /// Active renderers in index order.
    pub fn active_renderers(&self) -> impl Iterator<Item = &dyn ItemRenderer<T>> {
        self.active.iter().map(|r| r.as_ref())
    }

    /// Renderers parked in the pool.
    pub fn available_renderers(&self) -> usize {
        self.available.len()
    }

    /// Renderers built by the factory since the list was created.
    pub fn renderers_constructed(&self) -> usize {
        self.renderers_constructed
    }

    pub fn visible_window(&self) -> VisibleWindow {
        self.window
    }

    /// Offset of the renderer container after the last pass.
    pub fn list_origin(&self) -> Point {
        self.list_origin
    }

    pub fn rows_count(&self) -> usize {
        self.arrangement.rows_count(&self.metrics())
    }

    /// Resizes the list to show exactly `count` rows.
    pub fn set_rows_count(&mut self, count: usize) {
        let count = count.max(1) as f32;
        let height = count * (self.row_height + self.vertical_gap) - self.vertical_gap
            + 2.0 * self.scroll.content_padding();
        self.set_component_height(height);
    }

    pub fn pages_count(&self) -> usize {
        self.arrangement.pages_count(&self.metrics())
    }

    pub fn list_state(&self) -> ListState {
        ListState {
            scroll: self.scroll.position(),
            selected_indices: self.selected_indices(),
            window: self.window,
        }
    }

    pub fn restore_list_state(&mut self, state: &ListState) {
        self.replace_selection(state.selected_indices.iter().copied());
        self.scroll_to(state.scroll);
        self.validate_now();
    }

    fn update_content_size(&mut self) {
        let size = self.arrangement.content_size(&self.metrics());
        self.scroll.store_content_size(size);
    }

    fn construct_renderer(&mut self) -> Box<dyn ItemRenderer<T>> {
        let renderer = (self.factory)();
        self.renderers_constructed += 1;
        let core = &self.scroll.pane.core;
        let listener = item_tap_listener(
            Rc::downgrade(&self.shared),
            Rc::downgrade(core.node.emitter()),
            Rc::downgrade(core.invalidation()),
            core.id(),
        );
        renderer.core().node.on(EventType::PointerTap, listener);
        vtrace!(total = self.renderers_constructed, "renderer constructed");
        renderer
    }

    fn park(&mut self, mut renderer: Box<dyn ItemRenderer<T>>) {
        renderer.set_data(None);
        renderer.set_index(None);
        renderer.set_selected(false);
        self.available.push(renderer);
    }

    fn draw_list(&mut self) {
        self.scroll.clamp_position();
        let metrics = self.metrics();
        let scroll = self.scroll.position();
        self.list_origin =
            self.arrangement
                .origin(&metrics, scroll, self.scroll.content_padding());

        let window = self.arrangement.window(&metrics, scroll);
        let items: Vec<Rc<T>> = match &self.provider {
            Some(provider) => (window.start_index..window.end_index)
                .filter_map(|i| provider.item_at(i).ok())
                .collect(),
            None => Vec::new(),
        };
        let wanted: ItemSet = items.iter().map(ItemKey::of).collect();
        let (invalid, selection) = {
            let mut shared = self.shared.borrow_mut();
            (
                core::mem::take(&mut shared.invalid),
                shared.selection.clone(),
            )
        };

        let mut reuse: ItemMap<Box<dyn ItemRenderer<T>>> = ItemMap::new();
        for renderer in core::mem::take(&mut self.active) {
            match renderer.data().map(ItemKey::of) {
                Some(key)
                    if wanted.contains(&key)
                        && !invalid.contains(&key)
                        && !reuse.contains_key(&key) =>
                {
                    reuse.insert(key, renderer);
                }
                _ => self.park(renderer),
            }
        }

        let size = self.arrangement.renderer_size(&metrics);
        let mut rendered = ItemSet::with_capacity(items.len());
        for (offset, item) in items.iter().enumerate() {
            let index = window.start_index + offset;
            let key = ItemKey::of(item);
            let mut renderer = match reuse.remove(&key) {
                Some(renderer) => renderer,
                None => {
                    let mut renderer = match self.available.pop() {
                        Some(renderer) => renderer,
                        None => self.construct_renderer(),
                    };
                    renderer.set_data(Some(Rc::clone(item)));
                    renderer
                }
            };
            renderer.set_index(Some(index));
            let slot = self.arrangement.slot(&metrics, index, window);
            renderer.move_to(slot.x, slot.y);
            if renderer.width() != size.width || renderer.height() != size.height {
                renderer.resize(size.width, size.height);
            }
            renderer.set_label_emitter(self.label_emitter.clone());
            renderer.set_selected(selection.contains(index));
            let enabled = self.enabled_predicate.as_ref().is_none_or(|p| p(&**item));
            renderer.set_enabled(enabled);
            renderer.validate_now();
            rendered.insert(key);
            self.active.push(renderer);
        }
        for (_, renderer) in reuse {
            self.park(renderer);
        }

        if window != self.window {
            vdebug!(
                start = window.start_index,
                end = window.end_index,
                pooled = self.available.len(),
                "visible window"
            );
        }
        self.window = window;
        self.shared.borrow_mut().rendered = rendered;
    }
}

impl<T: 'static, A: Arrangement> Component for VirtualList<T, A> {
    impl_component_core!(self.scroll.pane.core);

    fn draw(&mut self) {
        let discard = core::mem::take(&mut self.shared.borrow_mut().discard_renderers);
        if discard {
            self.clear_all_renderers();
        }
        let core = &self.scroll.pane.core;
        if core.is_invalid(DirtyFlags::SIZE | DirtyFlags::DATA) {
            self.update_content_size();
        }
        if self.scroll.pane.core.is_invalid(DirtyFlags::RENDERER) {
            self.clear_all_renderers();
        }
        let list_flags =
            DirtyFlags::DATA | DirtyFlags::SCROLL | DirtyFlags::SIZE | DirtyFlags::SELECTION;
        if self.scroll.pane.core.is_invalid(list_flags) {
            self.draw_list();
        }
        self.scroll.draw_chrome();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.scroll.pane.visit(f);
        for renderer in &mut self.active {
            f(renderer.as_mut());
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.shared.borrow_mut().enabled = enabled;
        self.scroll.pane.core.set_enabled(enabled);
    }

    /// Routes a positioned event to the renderer under it, then re-emits it on the list.
    fn handle_pointer(&mut self, event: PointerEvent) {
        let core = &self.scroll.pane.core;
        if core.is_destroyed() || !core.enabled() {
            return;
        }
        if let Some(local) = event.local {
            if self.scroll.inner_rect().contains(local) {
                let point = Point::new(local.x - self.list_origin.x, local.y - self.list_origin.y);
                let hit = self.active.iter_mut().find(|r| {
                    let node = &r.core().node;
                    Rect::new(node.x, node.y, r.width(), r.height()).contains(point)
                });
                if let Some(renderer) = hit {
                    let node = &renderer.core().node;
                    let inside = Point::new(point.x - node.x, point.y - node.y);
                    renderer.handle_pointer(PointerEvent::at(event.kind, inside));
                }
            }
        }
        self.scroll.pane.core.node.emit(event.kind);
    }

    fn on_destroy(&mut self) {
        self.detach();
        for mut renderer in self.available.drain(..) {
            renderer.destroy();
        }
    }
}

impl<T: 'static, A: Arrangement> Scrollable for VirtualList<T, A> {
    fn scroll_pane(&self) -> &ScrollPane {
        &self.scroll
    }

    fn scroll_pane_mut(&mut self) -> &mut ScrollPane {
        &mut self.scroll
    }

    fn measure_content(&mut self) {
        self.update_content_size();
    }

    fn index_scroll_target(&self, index: usize) -> ScrollPosition {
        self.arrangement
            .index_target(&self.metrics(), index, self.scroll.position())
    }

    fn page_scroll_target(&self, page: usize) -> ScrollPosition {
        self.arrangement
            .page_target(&self.metrics(), page, self.scroll.position())
    }
}

impl<T: 'static, A: Arrangement> Drop for VirtualList<T, A> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T: 'static, A: Arrangement> fmt::Debug for VirtualList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualList")
            .field("core", &self.scroll.pane.core)
            .field("arrangement", &self.arrangement)
            .field("len", &self.len())
            .field("window", &self.window)
            .field("active", &self.active.len())
            .field("available", &self.available.len())
            .field("renderers_constructed", &self.renderers_constructed)
            .finish_non_exhaustive()
    }
}
