//! Skinned panes, auto-sizing boxes and the declarative layout builder.

use std::collections::HashMap;

use crate::layout::{HorizontalLayout, LayoutBehavior, LayoutSettings, VerticalLayout};
use crate::{
    Component, ComponentCore, Direction, DirtyFlags, EventType, HorizontalAlign, ListenerId,
    NodeId, Size, VerticalAlign,
};

const DEFAULT_PANE_SIZE: f32 = 100.0;

/// A component with an optional background skin stretched to its size.
///
/// The skin is owned beside the child list and rendered before the children. Swapping it marks
/// `SKIN` dirty, which the next pass turns into a `SIZE` pass that fits the new skin.
#[derive(Debug)]
pub struct Pane {
    pub core: ComponentCore,
    skin: Option<Box<dyn Component>>,
}

impl Default for Pane {
    fn default() -> Self {
        Self::new()
    }
}

impl Pane {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_PANE_SIZE, DEFAULT_PANE_SIZE)
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            core: ComponentCore::with_size(width, height),
            skin: None,
        }
    }

    pub fn skin(&self) -> Option<&dyn Component> {
        self.skin.as_deref()
    }

    pub fn skin_mut(&mut self) -> Option<&mut (dyn Component + 'static)> {
        self.skin.as_deref_mut()
    }

    /// Replaces the background skin and hands the previous one back to the caller.
    pub fn set_skin(&mut self, skin: Option<Box<dyn Component>>) -> Option<Box<dyn Component>> {
        if self.skin.is_none() && skin.is_none() {
            return None;
        }
        self.core.invalidate(DirtyFlags::SKIN);
        core::mem::replace(&mut self.skin, skin)
    }

    /// The `SKIN` and `SIZE` stages of a pane's draw. Composite components call this from their
    /// own `draw` after their content stages.
    pub fn draw_skin(&mut self) {
        if self.core.is_invalid(DirtyFlags::SKIN) {
            self.core.invalidate(DirtyFlags::SIZE);
        }
        if self.core.is_invalid(DirtyFlags::SIZE) {
            let (width, height) = (self.core.width(), self.core.height());
            if let Some(skin) = self.skin.as_deref_mut() {
                if skin.width() != width || skin.height() != height {
                    skin.resize(width, height);
                }
                skin.validate_now();
            }
        }
    }

    /// Visits the skin, then the child list.
    pub fn visit(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        if let Some(skin) = self.skin.as_deref_mut() {
            f(skin);
        }
        for child in self.core.children_mut() {
            f(child.as_mut());
        }
    }
}

impl Component for Pane {
    impl_component_core!(self.core);

    fn draw(&mut self) {
        self.draw_skin();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.visit(f);
    }
}

/// A pane that positions its children with a [`LayoutBehavior`] and sizes itself to fit them.
///
/// Children are watched for `Resize`, so a child growing re-lays out the box on the next pass. A
/// box whose own size changes emits `Resize` in turn, which lets nested boxes converge.
#[derive(Debug)]
pub struct BoxContainer<L: LayoutBehavior> {
    pane: Pane,
    layout: L,
    content: Size,
    resize_listeners: HashMap<NodeId, ListenerId>,
}

pub type HBox = BoxContainer<HorizontalLayout>;
pub type VBox = BoxContainer<VerticalLayout>;

impl HBox {
    pub fn new() -> Self {
        Self::with_layout(HorizontalLayout::default())
    }
}

impl Default for HBox {
    fn default() -> Self {
        Self::new()
    }
}

impl VBox {
    pub fn new() -> Self {
        Self::with_layout(VerticalLayout::default())
    }
}

impl Default for VBox {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LayoutBehavior> BoxContainer<L> {
    pub fn with_layout(layout: L) -> Self {
        Self {
            pane: Pane::new(),
            layout,
            content: Size::ZERO,
            resize_listeners: HashMap::new(),
        }
    }

    pub fn pane(&self) -> &Pane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut Pane {
        &mut self.pane
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Size of the laid out children, without margins.
    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn settings(&self) -> &LayoutSettings {
        self.layout.settings()
    }

    pub fn set_settings(&mut self, settings: LayoutSettings) {
        let invalidation = self.pane.core.invalidation();
        invalidation.assign(self.layout.settings_mut(), settings, DirtyFlags::SIZE);
    }

    pub fn set_margins(&mut self, left: f32, right: f32, top: f32, bottom: f32) {
        let settings = self.layout.settings().with_margins(left, right, top, bottom);
        self.set_settings(settings);
    }

    pub fn set_horizontal_gap(&mut self, gap: f32) {
        let mut settings = *self.layout.settings();
        settings.horizontal_gap = gap;
        self.set_settings(settings);
    }

    pub fn set_vertical_gap(&mut self, gap: f32) {
        let mut settings = *self.layout.settings();
        settings.vertical_gap = gap;
        self.set_settings(settings);
    }

    pub fn set_v_align(&mut self, v_align: VerticalAlign) {
        let settings = self.layout.settings().with_v_align(v_align);
        self.set_settings(settings);
    }

    pub fn set_h_align(&mut self, h_align: HorizontalAlign) {
        let settings = self.layout.settings().with_h_align(h_align);
        self.set_settings(settings);
    }

    fn draw_layout(&mut self) {
        let settings = *self.layout.settings();
        let direction = self.layout.direction();
        let core = &mut self.pane.core;

        let mut cross: f32 = 0.0;
        for child in core.children_mut() {
            child.validate_now();
            let extent = match direction {
                Direction::Horizontal => child.height(),
                Direction::Vertical => child.width(),
            };
            cross = cross.max(extent);
        }
        let (width, height) = match direction {
            Direction::Horizontal => (self.content.width, cross),
            Direction::Vertical => (cross, self.content.height),
        };
        self.layout.apply(core.children_mut(), width, height);

        let main = core.children().last().map_or(0.0, |last| {
            let node = &last.core().node;
            match direction {
                Direction::Horizontal => node.x + last.width() - settings.margin_left,
                Direction::Vertical => node.y + last.height() - settings.margin_top,
            }
        });
        self.content = match direction {
            Direction::Horizontal => Size::new(main, cross),
            Direction::Vertical => Size::new(cross, main),
        };

        let width = self.content.width + settings.margin_left + settings.margin_right;
        let height = self.content.height + settings.margin_top + settings.margin_bottom;
        if width != core.width() || height != core.height() {
            core.set_size_silently(width, height);
            core.node.emit(EventType::Resize);
        }
    }
}

impl<L: LayoutBehavior> Component for BoxContainer<L> {
    impl_component_core!(self.pane.core);

    fn draw(&mut self) {
        if self.pane.core.is_invalid(DirtyFlags::SIZE) {
            self.draw_layout();
        }
        self.pane.draw_skin();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.pane.visit(f);
    }

    fn on_child_added(&mut self, index: usize) {
        let core = &self.pane.core;
        if let Some(child) = core.children().get(index) {
            let listener = core.watch_child_resize(child.as_ref());
            self.resize_listeners.insert(child.id(), listener);
        }
        core.invalidate(DirtyFlags::SIZE);
    }

    fn on_child_removed(&mut self, child: &mut dyn Component) {
        if let Some(listener) = self.resize_listeners.remove(&child.id()) {
            child.core().node.off(listener);
        }
        self.pane.core.invalidate(DirtyFlags::SIZE);
    }

    fn on_destroy(&mut self) {
        self.resize_listeners.clear();
    }
}

enum LayoutItem {
    Nested(LayoutBuilder),
    Component(Box<dyn Component>),
}

/// Declarative construction of nested [`HBox`]/[`VBox`] trees.
///
/// ```
/// use vellum::{Component, Container, Direction, LayoutBuilder};
///
/// let tree = LayoutBuilder::new(Direction::Vertical)
///     .with_v_gap(4.0)
///     .add(Box::new(Container::with_size(40.0, 10.0)))
///     .add_layout(
///         LayoutBuilder::new(Direction::Horizontal)
///             .add(Box::new(Container::with_size(10.0, 10.0)))
///             .add(Box::new(Container::with_size(10.0, 10.0))),
///     )
///     .build();
/// assert_eq!(tree.num_children(), 2);
/// ```
pub struct LayoutBuilder {
    direction: Direction,
    h_align: HorizontalAlign,
    v_align: VerticalAlign,
    h_gap: f32,
    v_gap: f32,
    items: Vec<LayoutItem>,
}

impl LayoutBuilder {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            h_align: HorizontalAlign::Left,
            v_align: VerticalAlign::Top,
            h_gap: 0.0,
            v_gap: 0.0,
            items: Vec::new(),
        }
    }

    pub fn add(mut self, component: Box<dyn Component>) -> Self {
        self.items.push(LayoutItem::Component(component));
        self
    }

    pub fn add_layout(mut self, builder: LayoutBuilder) -> Self {
        self.items.push(LayoutItem::Nested(builder));
        self
    }

    pub fn with_h_align(mut self, h_align: HorizontalAlign) -> Self {
        self.h_align = h_align;
        self
    }

    pub fn with_v_align(mut self, v_align: VerticalAlign) -> Self {
        self.v_align = v_align;
        self
    }

    pub fn with_h_gap(mut self, h_gap: f32) -> Self {
        self.h_gap = h_gap;
        self
    }

    pub fn with_v_gap(mut self, v_gap: f32) -> Self {
        self.v_gap = v_gap;
        self
    }

    pub fn build(self) -> Box<dyn Component> {
        let settings = LayoutSettings::default()
            .with_gaps(self.h_gap, self.v_gap)
            .with_h_align(self.h_align)
            .with_v_align(self.v_align);
        let mut layout: Box<dyn Component> = match self.direction {
            Direction::Horizontal => Box::new(HBox::with_layout(HorizontalLayout::new(settings))),
            Direction::Vertical => Box::new(VBox::with_layout(VerticalLayout::new(settings))),
        };
        for item in self.items {
            let child = match item {
                LayoutItem::Nested(builder) => builder.build(),
                LayoutItem::Component(component) => component,
            };
            layout.add_child(child);
        }
        layout
    }
}
