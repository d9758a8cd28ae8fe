use std::collections::HashMap;

use crate::container::Pane;
use crate::{Component, EventType, PointerEvent, Rect};

/// Pointer state of an interactive component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerState {
    #[default]
    Up,
    Over,
    Down,
}

/// The skin slot that matches an interaction state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkinState {
    Up,
    Over,
    Down,
    SelectedUp,
    SelectedOver,
    SelectedDown,
    Disabled,
}

/// The up/over/down state machine plus the optional toggle selection of buttons and renderers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
    pub state: PointerState,
    pub selected: bool,
    /// A tap toggles `selected` when set.
    pub selectable: bool,
}

impl Interaction {
    /// Applies a pointer event. Returns `true` if the pointer state or the selection changed.
    ///
    /// A release returns to `Over` when it lands inside the hit area (or its position is unknown),
    /// otherwise to `Up`.
    pub fn handle(&mut self, event: &PointerEvent, hit_area: Option<Rect>) -> bool {
        let before = *self;
        match event.kind {
            EventType::PointerOver => self.state = PointerState::Over,
            EventType::PointerOut | EventType::PointerUpOutside => self.state = PointerState::Up,
            EventType::PointerDown => self.state = PointerState::Down,
            EventType::PointerUp => {
                let inside = match (hit_area, event.local) {
                    (Some(area), Some(local)) => area.contains(local),
                    _ => true,
                };
                self.state = if inside {
                    PointerState::Over
                } else {
                    PointerState::Up
                };
            }
            EventType::PointerTap => {
                if self.selectable {
                    self.selected = !self.selected;
                }
            }
            _ => {}
        }
        *self != before
    }

    pub fn skin_state(&self, enabled: bool) -> SkinState {
        if !enabled {
            return SkinState::Disabled;
        }
        match (self.selected, self.state) {
            (false, PointerState::Up) => SkinState::Up,
            (false, PointerState::Over) => SkinState::Over,
            (false, PointerState::Down) => SkinState::Down,
            (true, PointerState::Up) => SkinState::SelectedUp,
            (true, PointerState::Over) => SkinState::SelectedOver,
            (true, PointerState::Down) => SkinState::SelectedDown,
        }
    }
}

/// Per-state skins of an interactive component.
///
/// The skin for the current state lives in the pane's skin slot; every other skin is parked here.
#[derive(Debug, Default)]
pub struct InteractiveSkins {
    parked: HashMap<SkinState, Box<dyn Component>>,
    shown: Option<SkinState>,
}

impl InteractiveSkins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Option<SkinState> {
        self.shown
    }

    pub fn has(&self, state: SkinState) -> bool {
        self.shown == Some(state) || self.parked.contains_key(&state)
    }

    /// Sets the skin for `state` and returns the one it replaces. If that state is on screen, the
    /// pane's skin slot is emptied so the next [`InteractiveSkins::apply`] shows the new skin.
    pub fn insert(
        &mut self,
        pane: &mut Pane,
        state: SkinState,
        skin: Option<Box<dyn Component>>,
    ) -> Option<Box<dyn Component>> {
        let previous = if self.shown == Some(state) {
            self.shown = None;
            pane.set_skin(None)
        } else {
            self.parked.remove(&state)
        };
        if let Some(skin) = skin {
            self.parked.insert(state, skin);
        }
        previous
    }

    /// Shows the skin for `target`, falling back to the selected-up skin while selected, then to
    /// the up skin. Returns `true` if the pane's skin changed.
    pub fn apply(&mut self, pane: &mut Pane, target: SkinState, selected: bool) -> bool {
        let resolved = self.resolve(target, selected);
        if resolved == self.shown {
            return false;
        }
        if let Some(shown) = self.shown.take() {
            if let Some(skin) = pane.set_skin(None) {
                self.parked.insert(shown, skin);
            }
        }
        if let Some(state) = resolved {
            if let Some(skin) = self.parked.remove(&state) {
                pane.set_skin(Some(skin));
                self.shown = Some(state);
            }
        }
        true
    }

    fn resolve(&self, target: SkinState, selected: bool) -> Option<SkinState> {
        let mut candidates = vec![target];
        if selected {
            candidates.push(SkinState::SelectedUp);
        }
        candidates.push(SkinState::Up);
        candidates.into_iter().find(|&state| self.has(state))
    }

    /// Destroys every parked skin. The shown skin belongs to the pane and is destroyed with it.
    pub fn destroy_parked(&mut self) {
        for skin in self.parked.values_mut() {
            skin.destroy();
        }
        self.parked.clear();
    }
}
