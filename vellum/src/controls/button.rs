use crate::container::Pane;
use crate::controls::{Interaction, InteractiveSkins, Label, SkinState};
use crate::layout::align;
use crate::{
    Component, DirtyFlags, HorizontalAlign, Placement, Point, PointerEvent, Size, VerticalAlign,
};

const DEFAULT_ICON_GAP: f32 = 4.0;

/// A skinned, clickable label with an optional icon.
#[derive(Debug)]
pub struct Button {
    pane: Pane,
    interaction: Interaction,
    skins: InteractiveSkins,
    label: Label,
    icon: Option<Box<dyn Component>>,
    icon_placement: Placement,
    icon_gap: f32,
    v_align: VerticalAlign,
    h_align: HorizontalAlign,
    content_offset: Point,
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_label(Label::new(text))
    }

    pub fn with_label(label: Label) -> Self {
        Self {
            pane: Pane::with_size(80.0, 24.0),
            interaction: Interaction::default(),
            skins: InteractiveSkins::new(),
            label,
            icon: None,
            icon_placement: Placement::Left,
            icon_gap: DEFAULT_ICON_GAP,
            v_align: VerticalAlign::Center,
            h_align: HorizontalAlign::Center,
            content_offset: Point::ZERO,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
        self.pane.core.invalidate(DirtyFlags::TEXT);
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn selected(&self) -> bool {
        self.interaction.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.interaction.selected, selected, DirtyFlags::STATE);
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.interaction.selectable = selectable;
    }

    /// Sets the skin shown in `state` and returns the skin it replaces.
    pub fn set_state_skin(
        &mut self,
        state: SkinState,
        skin: Option<Box<dyn Component>>,
    ) -> Option<Box<dyn Component>> {
        let previous = self.skins.insert(&mut self.pane, state, skin);
        self.pane.core.invalidate(DirtyFlags::STATE);
        previous
    }

    pub fn shown_skin(&self) -> Option<SkinState> {
        self.skins.shown()
    }

    pub fn icon(&self) -> Option<&dyn Component> {
        self.icon.as_deref()
    }

    pub fn set_icon(&mut self, icon: Option<Box<dyn Component>>) -> Option<Box<dyn Component>> {
        self.pane.core.invalidate(DirtyFlags::ICON);
        core::mem::replace(&mut self.icon, icon)
    }

    pub fn set_icon_placement(&mut self, placement: Placement) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.icon_placement, placement, DirtyFlags::SIZE);
    }

    pub fn set_icon_gap(&mut self, gap: f32) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.icon_gap, gap, DirtyFlags::SIZE);
    }

    pub fn set_v_align(&mut self, v_align: VerticalAlign) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.v_align, v_align, DirtyFlags::SIZE);
    }

    pub fn set_h_align(&mut self, h_align: HorizontalAlign) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.h_align, h_align, DirtyFlags::SIZE);
    }

    pub fn set_content_offset(&mut self, x: f32, y: f32) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.content_offset, Point::new(x, y), DirtyFlags::SIZE);
    }

    fn draw_label(&mut self) {
        self.label.validate_now();
        let size = self.label.content_size();
        if size.width != self.label.width() || size.height != self.label.height() {
            self.label.resize(size.width, size.height);
            self.label.validate_now();
        }
    }

    fn draw_state(&mut self) {
        let enabled = self.pane.core.enabled();
        let target = self.interaction.skin_state(enabled);
        self.skins
            .apply(&mut self.pane, target, self.interaction.selected);
        if self.label.enabled() != enabled {
            self.label.set_enabled(enabled);
            self.pane.core.invalidate(DirtyFlags::TEXT);
        }
    }

    fn content_size(&self) -> Size {
        let mut size = self.label.content_size();
        if let Some(icon) = self.icon.as_deref() {
            match self.icon_placement {
                Placement::Left | Placement::Right => {
                    let gap = if size.width > 0.0 { self.icon_gap } else { 0.0 };
                    size.width += icon.width() + gap;
                    size.height = size.height.max(icon.height());
                }
                Placement::Up | Placement::Down => {
                    let gap = if size.height > 0.0 { self.icon_gap } else { 0.0 };
                    size.height += icon.height() + gap;
                    size.width = size.width.max(icon.width());
                }
            }
        }
        size
    }

    fn draw_layout(&mut self) {
        let content = self.content_size();
        let bounds = Size::new(self.pane.core.width(), self.pane.core.height());
        let mut origin = align(
            content,
            bounds,
            Some(self.v_align),
            Some(self.h_align),
            Some(self.content_offset),
        );
        let label = self.label.content_size();
        if let Some(icon) = self.icon.as_deref_mut() {
            let (icon_width, icon_height) = (icon.width(), icon.height());
            let h_gap = if label.width > 0.0 { self.icon_gap } else { 0.0 };
            let v_gap = if label.height > 0.0 { self.icon_gap } else { 0.0 };
            match self.icon_placement {
                Placement::Up => {
                    icon.move_to(origin.x + (content.width - icon_width) * 0.5, origin.y);
                    origin.y += icon_height + v_gap;
                }
                Placement::Down => {
                    icon.move_to(
                        origin.x + (content.width - icon_width) * 0.5,
                        origin.y + content.height - icon_height,
                    );
                }
                Placement::Left => {
                    icon.move_to(origin.x, origin.y + (content.height - icon_height) * 0.5);
                    origin.x += icon_width + h_gap;
                }
                Placement::Right => {
                    icon.move_to(
                        origin.x + content.width - icon_width,
                        origin.y + (content.height - icon_height) * 0.5,
                    );
                }
            }
        }
        self.label.move_to(origin.x, origin.y);
    }
}

impl Component for Button {
    impl_component_core!(self.pane.core);

    fn draw(&mut self) {
        if self.pane.core.is_invalid(DirtyFlags::STATE) {
            self.draw_state();
        }
        if self.pane.core.is_invalid(DirtyFlags::ICON) {
            if let Some(icon) = self.icon.as_deref_mut() {
                icon.validate_now();
            }
            self.pane.core.invalidate(DirtyFlags::SIZE);
        }
        if self.pane.core.is_invalid(DirtyFlags::TEXT) {
            self.draw_label();
            self.pane.core.invalidate(DirtyFlags::SIZE);
        }
        if self.pane.core.is_invalid(DirtyFlags::SIZE) {
            self.draw_layout();
        }
        self.pane.draw_skin();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.pane.visit(f);
        if let Some(icon) = self.icon.as_deref_mut() {
            f(icon);
        }
        f(&mut self.label);
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        let core = &self.pane.core;
        if core.is_destroyed() || !core.enabled() {
            return;
        }
        if self.interaction.handle(&event, core.hit_area()) {
            core.invalidate(DirtyFlags::STATE);
        }
        core.node.emit(event.kind);
    }

    fn on_destroy(&mut self) {
        self.skins.destroy_parked();
    }
}
