//! A LIFO stack of popups with animated transitions.

use core::fmt;
use std::rc::Rc;

use vellum::{Component, ComponentCore, EventType, NodeId, Pane, Size};

use crate::{Easing, Tween, TweenProperty, TweenScheduler};

/// Builds the input-blocking layer shown beneath a modal popup.
pub type OverlayFactory = Rc<dyn Fn() -> Box<dyn Component>>;

/// Runs once a hidden popup is detached. Receives the popup unless it was destroyed.
pub type HideCallback = Box<dyn FnOnce(Option<Box<dyn Component>>)>;

pub const OVERLAY_FADE_MS: u64 = 100;
pub const POPUP_FADE_MS: u64 = 250;
/// How far below its resting place a popup starts sliding in.
pub const POPUP_SLIDE: f32 = 20.0;

/// How [`PopupManager::show`] places a popup.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShowOptions {
    /// Adds an overlay beneath the popup and suspends this popup when another one is shown.
    pub modal: bool,
    /// Centers the popup on the stage. Otherwise its own position is kept.
    pub centered: bool,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            modal: true,
            centered: true,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    pub fn with_offset(mut self, offset_x: f32, offset_y: f32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }
}

enum Phase {
    Showing,
    Shown,
    Suspending,
    Suspended,
    Hiding {
        destroy: bool,
        on_complete: Option<HideCallback>,
    },
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Showing => f.write_str("Showing"),
            Self::Shown => f.write_str("Shown"),
            Self::Suspending => f.write_str("Suspending"),
            Self::Suspended => f.write_str("Suspended"),
            Self::Hiding { destroy, .. } => {
                f.debug_struct("Hiding").field("destroy", destroy).finish()
            }
        }
    }
}

#[derive(Debug)]
struct Entry {
    popup: NodeId,
    overlay: Option<NodeId>,
    modal: bool,
    rest_y: f32,
    phase: Phase,
}

/// Owns a layer of popups and their overlays.
///
/// Showing a popup while a modal popup is active suspends the active one: it fades out, is hidden
/// and kept on a stack, and receives `FocusOut`. The new popup becomes active and receives
/// `FocusIn`. When the active popup finishes hiding, the most recently suspended popup fades back
/// in and becomes active again.
///
/// Transitions advance only in [`PopupManager::tick`]; the host calls it every frame with its
/// clock. The manager is itself a [`Component`], so the layer validates and renders with the rest
/// of the scene.
pub struct PopupManager {
    core: ComponentCore,
    stage: Size,
    overlay_factory: OverlayFactory,
    entries: Vec<Entry>,
    stack: Vec<NodeId>,
    active: Option<NodeId>,
    tweens: TweenScheduler,
}

impl PopupManager {
    pub fn new(stage_width: f32, stage_height: f32) -> Self {
        Self {
            core: ComponentCore::with_size(stage_width, stage_height),
            stage: Size::new(stage_width, stage_height),
            overlay_factory: Rc::new(default_overlay),
            entries: Vec::new(),
            stack: Vec::new(),
            active: None,
            tweens: TweenScheduler::new(),
        }
    }

    pub fn set_overlay_factory(&mut self, factory: impl Fn() -> Box<dyn Component> + 'static) {
        self.overlay_factory = Rc::new(factory);
    }

    pub fn stage_size(&self) -> Size {
        self.stage
    }

    /// Resizes the layer and every overlay. Popups keep their positions.
    pub fn resize_stage(&mut self, width: f32, height: f32) {
        self.stage = Size::new(width, height);
        self.resize(width, height);
        let overlays: Vec<NodeId> = self.entries.iter().filter_map(|e| e.overlay).collect();
        for overlay in overlays {
            if let Some(child) = self.child_mut(overlay) {
                child.resize(width, height);
            }
        }
    }

    /// The popup that has focus.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Suspended popups, bottom first.
    pub fn suspended(&self) -> &[NodeId] {
        &self.stack
    }

    /// Returns `true` while `id` is managed, including while it is hiding.
    pub fn contains_popup(&self, id: NodeId) -> bool {
        self.entry_index(id).is_some()
    }

    pub fn popup_count(&self) -> usize {
        self.entries.len()
    }

    pub fn overlay_of(&self, id: NodeId) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|e| e.popup == id)
            .and_then(|e| e.overlay)
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Looks up a popup or overlay owned by the layer.
    pub fn popup(&self, id: NodeId) -> Option<&dyn Component> {
        self.core
            .children()
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.as_ref())
    }

    pub fn popup_mut(&mut self, id: NodeId) -> Option<&mut dyn Component> {
        self.child_mut(id)
    }

    /// Adds `popup` to the layer and starts its entrance. Returns its id.
    pub fn show(
        &mut self,
        mut popup: Box<dyn Component>,
        options: ShowOptions,
        now_ms: u64,
    ) -> NodeId {
        let id = popup.id();
        if let Some(active) = self.active {
            let suspend = self.entry_index(active).is_some_and(|index| {
                let entry = &self.entries[index];
                entry.modal && matches!(entry.phase, Phase::Showing | Phase::Shown)
            });
            if suspend {
                self.suspend(active, now_ms);
            }
        }

        let overlay = if options.modal {
            let mut overlay = (self.overlay_factory)();
            overlay.resize(self.stage.width, self.stage.height);
            overlay.move_to(0.0, 0.0);
            overlay.core_mut().node.alpha = 0.0;
            let overlay_id = overlay.id();
            self.add_child(overlay);
            self.tweens.start(
                overlay_id,
                TweenProperty::Alpha,
                Tween::new(0.0, 1.0, now_ms, OVERLAY_FADE_MS, Easing::Linear),
            );
            Some(overlay_id)
        } else {
            None
        };

        if options.centered {
            popup.validate_now();
            let x = (self.stage.width - popup.width()) * 0.5 + options.offset_x;
            let y = (self.stage.height - popup.height()) * 0.5 + options.offset_y;
            popup.move_to(x, y);
        }
        let rest_y = popup.core().node.y;
        let node = &mut popup.core_mut().node;
        node.alpha = 0.0;
        node.visible = true;
        node.y = rest_y + POPUP_SLIDE;
        self.add_child(popup);

        self.tweens.start(
            id,
            TweenProperty::Alpha,
            Tween::new(0.0, 1.0, now_ms, POPUP_FADE_MS, Easing::InQuad),
        );
        self.tweens.start(
            id,
            TweenProperty::Y,
            Tween::new(rest_y + POPUP_SLIDE, rest_y, now_ms, POPUP_FADE_MS, Easing::InQuad),
        );
        self.entries.push(Entry {
            popup: id,
            overlay,
            modal: options.modal,
            rest_y,
            phase: Phase::Showing,
        });
        self.active = Some(id);
        vdebug!(
            popup = id.get(),
            modal = options.modal,
            suspended = self.stack.len(),
            "show popup"
        );
        self.emit(id, EventType::FocusIn);
        id
    }

    /// Starts hiding `id`. See [`PopupManager::hide_with`].
    pub fn hide(&mut self, id: NodeId, destroy: bool, now_ms: u64) -> bool {
        self.hide_inner(id, destroy, None, now_ms)
    }

    /// Fades `id` and its overlay out, then detaches them. The overlay is always destroyed; the
    /// popup only when `destroy` is set, otherwise it is handed to `on_complete`.
    ///
    /// A suspended popup is detached immediately. Returns `false` if `id` is not managed or is
    /// already hiding; `on_complete` is dropped without running in that case.
    pub fn hide_with(
        &mut self,
        id: NodeId,
        destroy: bool,
        now_ms: u64,
        on_complete: impl FnOnce(Option<Box<dyn Component>>) + 'static,
    ) -> bool {
        self.hide_inner(id, destroy, Some(Box::new(on_complete)), now_ms)
    }

    fn hide_inner(
        &mut self,
        id: NodeId,
        destroy: bool,
        on_complete: Option<HideCallback>,
        now_ms: u64,
    ) -> bool {
        let Some(index) = self.entry_index(id) else {
            vwarn!(popup = id.get(), "hide of an unmanaged popup");
            return false;
        };
        if matches!(self.entries[index].phase, Phase::Hiding { .. }) {
            return false;
        }
        if let Some(pos) = self.stack.iter().position(|&s| s == id) {
            self.stack.remove(pos);
            vdebug!(popup = id.get(), "hide suspended popup");
            let entry = self.entries.remove(index);
            self.finish_hide(entry, destroy, on_complete, now_ms);
            return true;
        }

        vdebug!(popup = id.get(), destroy, "hide popup");
        let entry = &mut self.entries[index];
        entry.phase = Phase::Hiding {
            destroy,
            on_complete,
        };
        let overlay = entry.overlay;
        let rest_y = entry.rest_y;
        self.tweens.cancel(id, TweenProperty::Y);
        if let Some(child) = self.child_mut(id) {
            child.core_mut().node.y = rest_y;
        }
        self.fade_out(id, POPUP_FADE_MS, Easing::InQuad, now_ms);
        if let Some(overlay) = overlay {
            self.fade_out(overlay, OVERLAY_FADE_MS, Easing::Linear, now_ms);
        }
        true
    }

    /// Advances every transition to `now_ms`. Returns `false` when nothing was animating.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let samples = self.tweens.tick(now_ms);
        if samples.is_empty() {
            return false;
        }
        let mut faded = Vec::new();
        for sample in &samples {
            if let Some(child) = self.child_mut(sample.node) {
                sample
                    .property
                    .apply(&mut child.core_mut().node, sample.value);
            }
            if sample.done && sample.property == TweenProperty::Alpha {
                faded.push(sample.node);
            }
        }
        for id in faded {
            self.on_faded(id, now_ms);
        }
        true
    }

    fn on_faded(&mut self, id: NodeId, now_ms: u64) {
        let Some(index) = self.entry_index(id) else {
            return;
        };
        match self.entries[index].phase {
            Phase::Showing => self.entries[index].phase = Phase::Shown,
            Phase::Suspending => {
                self.entries[index].phase = Phase::Suspended;
                if let Some(child) = self.child_mut(id) {
                    child.core_mut().node.visible = false;
                }
            }
            Phase::Hiding { .. } => {
                let entry = self.entries.remove(index);
                if let Phase::Hiding {
                    destroy,
                    on_complete,
                } = entry.phase
                {
                    let entry = Entry {
                        phase: Phase::Shown,
                        ..entry
                    };
                    self.finish_hide(entry, destroy, on_complete, now_ms);
                }
            }
            Phase::Shown | Phase::Suspended => {}
        }
    }

    fn suspend(&mut self, id: NodeId, now_ms: u64) {
        let Some(index) = self.entry_index(id) else {
            return;
        };
        let rest_y = self.entries[index].rest_y;
        self.entries[index].phase = Phase::Suspending;
        self.tweens.cancel(id, TweenProperty::Y);
        if let Some(child) = self.child_mut(id) {
            child.core_mut().node.y = rest_y;
        }
        self.fade_out(id, POPUP_FADE_MS, Easing::InQuad, now_ms);
        self.stack.push(id);
        vdebug!(popup = id.get(), depth = self.stack.len(), "suspend popup");
        self.emit(id, EventType::FocusOut);
    }

    fn reactivate(&mut self, id: NodeId, now_ms: u64) {
        let Some(index) = self.entry_index(id) else {
            return;
        };
        self.entries[index].phase = Phase::Showing;
        let from = match self.child_mut(id) {
            Some(child) => {
                let node = &mut child.core_mut().node;
                node.visible = true;
                node.alpha
            }
            None => 0.0,
        };
        self.tweens.start(
            id,
            TweenProperty::Alpha,
            Tween::new(from, 1.0, now_ms, POPUP_FADE_MS, Easing::InQuad),
        );
        self.active = Some(id);
        vdebug!(popup = id.get(), depth = self.stack.len(), "reactivate popup");
        self.emit(id, EventType::FocusIn);
    }

    fn finish_hide(
        &mut self,
        entry: Entry,
        destroy: bool,
        on_complete: Option<HideCallback>,
        now_ms: u64,
    ) {
        let id = entry.popup;
        self.tweens.cancel_node(id);
        if let Some(overlay) = entry.overlay {
            self.tweens.cancel_node(overlay);
            if let Some(mut overlay) = self.remove_child(overlay) {
                overlay.destroy();
            }
        }

        let detached = match self.remove_child(id) {
            Some(mut popup) if destroy => {
                popup.destroy();
                None
            }
            Some(mut popup) => {
                let node = &mut popup.core_mut().node;
                node.alpha = 1.0;
                node.visible = true;
                node.y = entry.rest_y;
                Some(popup)
            }
            None => None,
        };

        if self.active == Some(id) {
            self.active = None;
            if let Some(next) = self.stack.pop() {
                self.reactivate(next, now_ms);
            }
        }
        if let Some(on_complete) = on_complete {
            on_complete(detached);
        }
    }

    fn fade_out(&mut self, id: NodeId, duration_ms: u64, easing: Easing, now_ms: u64) {
        let from = self.popup(id).map_or(0.0, |c| c.core().node.alpha);
        self.tweens.start(
            id,
            TweenProperty::Alpha,
            Tween::new(from, 0.0, now_ms, duration_ms, easing),
        );
    }

    fn entry_index(&self, id: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.popup == id)
    }

    fn child_mut(&mut self, id: NodeId) -> Option<&mut dyn Component> {
        match self.core.children_mut().iter_mut().find(|c| c.id() == id) {
            Some(child) => Some(child.as_mut()),
            None => None,
        }
    }

    fn emit(&self, id: NodeId, kind: EventType) {
        if let Some(popup) = self.popup(id) {
            popup.core().node.emit(kind);
        }
    }
}

fn default_overlay() -> Box<dyn Component> {
    let mut overlay = Pane::new();
    overlay.core.node.interactive = true;
    Box::new(overlay)
}

impl fmt::Debug for PopupManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupManager")
            .field("core", &self.core)
            .field("stage", &self.stage)
            .field("entries", &self.entries)
            .field("stack", &self.stack)
            .field("active", &self.active)
            .field("tweens", &self.tweens.len())
            .finish_non_exhaustive()
    }
}

impl Component for PopupManager {
    vellum::impl_component_core!(self.core);

    fn on_destroy(&mut self) {
        self.tweens.clear();
        self.entries.clear();
        self.stack.clear();
        self.active = None;
    }
}
