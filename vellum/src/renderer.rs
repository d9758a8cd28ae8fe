//! The contract between a virtualized list and the views it recycles.

use core::fmt;
use std::rc::Rc;

use crate::container::Pane;
use crate::controls::{Interaction, InteractiveSkins, Label, SkinState};
use crate::{Component, DirtyFlags, EventType, HorizontalAlign, PointerEvent, VerticalAlign};

/// Turns an item into the text its renderer shows.
pub type LabelEmitter<T> = Rc<dyn Fn(&T) -> String>;

/// Builds a fresh, unbound renderer for a list's pool.
pub type RendererFactory<T> = Rc<dyn Fn() -> Box<dyn ItemRenderer<T>>>;

/// A view a list binds to one data item at a time.
///
/// Renderers are recycled: the list rebinds `data` and `index` as rows scroll in and out, and
/// destroys a renderer only when its whole pool is discarded. `enabled` is the component flag.
///
/// A renderer reports a tap by emitting `PointerTap` with its index on its own node; the list
/// listens for it once, at construction.
pub trait ItemRenderer<T: 'static>: Component {
    fn data(&self) -> Option<&Rc<T>>;

    /// Binds `data`. Binding always marks `DATA` dirty, even for the same item, so a rebind
    /// refreshes the view.
    fn set_data(&mut self, data: Option<Rc<T>>);

    fn index(&self) -> Option<usize>;
    fn set_index(&mut self, index: Option<usize>);

    fn selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);

    fn set_label_emitter(&mut self, emitter: Option<LabelEmitter<T>>);
}

/// The stock renderer: interactive skins behind a centered label.
///
/// The label shows the label emitter's text, else the fallback formatter's, else nothing.
pub struct LabelItemRenderer<T> {
    pane: Pane,
    interaction: Interaction,
    skins: InteractiveSkins,
    label: Label,
    data: Option<Rc<T>>,
    index: Option<usize>,
    label_emitter: Option<LabelEmitter<T>>,
    fallback: Option<LabelEmitter<T>>,
}

impl<T: 'static> Default for LabelItemRenderer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> LabelItemRenderer<T> {
    pub fn new() -> Self {
        let mut label = Label::new("");
        label.set_v_align(VerticalAlign::Center);
        label.set_h_align(HorizontalAlign::Center);
        Self {
            pane: Pane::new(),
            interaction: Interaction::default(),
            skins: InteractiveSkins::new(),
            label,
            data: None,
            index: None,
            label_emitter: None,
            fallback: None,
        }
    }

    /// Used when no label emitter is set.
    pub fn with_fallback(mut self, fallback: impl Fn(&T) -> String + 'static) -> Self {
        self.fallback = Some(Rc::new(fallback));
        self
    }

    /// A factory producing renderers that format items with `Display` when no emitter is set.
    pub fn display_factory() -> RendererFactory<T>
    where
        T: fmt::Display,
    {
        Rc::new(|| -> Box<dyn ItemRenderer<T>> {
            Box::new(LabelItemRenderer::<T>::new().with_fallback(|item| item.to_string()))
        })
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

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

    fn draw_data(&mut self) {
        let text = match (&self.data, &self.label_emitter, &self.fallback) {
            (Some(data), Some(emitter), _) => emitter(&**data),
            (Some(data), None, Some(fallback)) => fallback(&**data),
            _ => String::new(),
        };
        self.label.set_text(text);
    }
}

impl<T> fmt::Debug for LabelItemRenderer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelItemRenderer")
            .field("core", &self.pane.core)
            .field("index", &self.index)
            .field("bound", &self.data.is_some())
            .field("interaction", &self.interaction)
            .field("text", &self.label.text())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Component for LabelItemRenderer<T> {
    impl_component_core!(self.pane.core);

    fn draw(&mut self) {
        if self.pane.core.is_invalid(DirtyFlags::DATA) {
            self.draw_data();
        }
        if self.pane.core.is_invalid(DirtyFlags::STATE) {
            let enabled = self.pane.core.enabled();
            let target = self.interaction.skin_state(enabled);
            self.skins
                .apply(&mut self.pane, target, self.interaction.selected);
            self.label.set_enabled(enabled);
            self.pane.core.invalidate(DirtyFlags::SIZE);
        }
        if self.pane.core.is_invalid(DirtyFlags::SIZE) {
            self.label.resize(self.pane.core.width(), self.pane.core.height());
        }
        self.label.validate_now();
        self.pane.draw_skin();
    }

    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        self.pane.visit(f);
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
        if event.kind == EventType::PointerTap {
            core.node.emit_indexed(EventType::PointerTap, self.index);
        } else {
            core.node.emit(event.kind);
        }
    }

    fn on_destroy(&mut self) {
        self.skins.destroy_parked();
        self.data = None;
    }
}

impl<T: 'static> ItemRenderer<T> for LabelItemRenderer<T> {
    fn data(&self) -> Option<&Rc<T>> {
        self.data.as_ref()
    }

    fn set_data(&mut self, data: Option<Rc<T>>) {
        self.data = data;
        self.pane.core.invalidate(DirtyFlags::DATA);
    }

    fn index(&self) -> Option<usize> {
        self.index
    }

    fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    fn selected(&self) -> bool {
        self.interaction.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.pane
            .core
            .invalidation()
            .assign(&mut self.interaction.selected, selected, DirtyFlags::STATE);
    }

    fn set_label_emitter(&mut self, emitter: Option<LabelEmitter<T>>) {
        let same = match (&self.label_emitter, &emitter) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.label_emitter = emitter;
            self.pane.core.invalidate(DirtyFlags::DATA);
        }
    }
}
