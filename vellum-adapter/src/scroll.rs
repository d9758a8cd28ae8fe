use vellum::{ScrollPosition, Scrollable};

use crate::{Easing, Tween, TweenProperty, TweenScheduler};

/// Drives a [`Scrollable`] (usually a [`vellum::List`] or [`vellum::TileList`]) with animated
/// scrolling.
///
/// This type holds no clock. Hosts drive it by calling:
/// - `on_scroll` when the user scrolls (wheel, drag)
/// - `tick(now_ms)` every frame while [`ScrollController::is_animating`] is `true`
///
/// Targets are clamped against the target's content when a transition starts, and each `tick`
/// applies the sampled position through [`Scrollable::scroll_to`], which revalidates the list.
#[derive(Debug)]
pub struct ScrollController<S> {
    target: S,
    tweens: TweenScheduler,
}

impl<S: Scrollable> ScrollController<S> {
    pub fn new(target: S) -> Self {
        Self {
            target,
            tweens: TweenScheduler::new(),
        }
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut S {
        &mut self.target
    }

    pub fn into_target(self) -> S {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn cancel_animation(&mut self) {
        self.tweens.cancel_node(self.target.id());
    }

    /// Applies a user scroll. This cancels any active tween.
    pub fn on_scroll(&mut self, position: ScrollPosition) {
        self.cancel_animation();
        self.target.scroll_to(position);
    }

    /// Advances the transition.
    ///
    /// Returns the applied position while animating, `None` when idle.
    pub fn tick(&mut self, now_ms: u64) -> Option<ScrollPosition> {
        if self.tweens.is_empty() {
            return None;
        }
        let mut position = self.target.scroll_position();
        for sample in self.tweens.tick(now_ms) {
            match sample.property {
                TweenProperty::ScrollVertical => position.vertical = sample.value,
                TweenProperty::ScrollHorizontal => position.horizontal = sample.value,
                _ => {}
            }
        }
        self.target.scroll_to(position);
        Some(self.target.scroll_position())
    }

    /// Scrolls immediately. Returns the applied (clamped) position.
    pub fn scroll_to_index(&mut self, index: usize) -> ScrollPosition {
        self.cancel_animation();
        self.target.scroll_to_index(index);
        self.target.scroll_position()
    }

    /// Scrolls immediately. Returns the applied (clamped) position.
    pub fn scroll_to_position(&mut self, position: ScrollPosition) -> ScrollPosition {
        self.cancel_animation();
        self.target.scroll_to(position);
        self.target.scroll_position()
    }

    /// Starts a transition that brings `index` into view.
    ///
    /// Returns the clamped target position.
    pub fn start_tween_to_index(
        &mut self,
        index: usize,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> ScrollPosition {
        let to = self.target.index_scroll_target(index);
        self.start_tween_to_position(to, now_ms, duration_ms, easing)
    }

    /// Returns the clamped target position.
    pub fn start_tween_to_page(
        &mut self,
        page: usize,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> ScrollPosition {
        let to = self.target.page_scroll_target(page);
        self.start_tween_to_position(to, now_ms, duration_ms, easing)
    }

    /// Starts a transition to `position`, replacing any running one.
    ///
    /// Returns the clamped target position.
    pub fn start_tween_to_position(
        &mut self,
        position: ScrollPosition,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> ScrollPosition {
        let to = self.target.clamp_scroll_target(position);
        let from = self.target.scroll_position();
        let id = self.target.id();
        self.tweens.cancel_node(id);
        if from.vertical != to.vertical {
            let tween = Tween::new(from.vertical, to.vertical, now_ms, duration_ms, easing);
            self.tweens.start(id, TweenProperty::ScrollVertical, tween);
        }
        if from.horizontal != to.horizontal {
            let tween = Tween::new(from.horizontal, to.horizontal, now_ms, duration_ms, easing);
            self.tweens.start(id, TweenProperty::ScrollHorizontal, tween);
        }
        to
    }
}
