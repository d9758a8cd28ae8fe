use vellum::{Node, NodeId};

use crate::Tween;

/// The node value a scheduled tween drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TweenProperty {
    Alpha,
    X,
    Y,
    ScrollVertical,
    ScrollHorizontal,
}

impl TweenProperty {
    /// Writes `value` to `node`. Scroll properties are not node state and are left to the caller;
    /// returns `false` for them.
    pub fn apply(self, node: &mut Node, value: f32) -> bool {
        match self {
            Self::Alpha => node.alpha = value.clamp(0.0, 1.0),
            Self::X => node.x = value,
            Self::Y => node.y = value,
            Self::ScrollVertical | Self::ScrollHorizontal => return false,
        }
        true
    }
}

/// One value produced by [`TweenScheduler::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSample {
    pub node: NodeId,
    pub property: TweenProperty,
    pub value: f32,
    /// The tween reached its end and was removed.
    pub done: bool,
}

#[derive(Clone, Copy, Debug)]
struct Running {
    node: NodeId,
    property: TweenProperty,
    tween: Tween,
}

/// Running tweens, at most one per `(node, property)`.
///
/// Starting a tween for a key that is already animating replaces the running one, so a
/// re-targeted transition never fights an older one. Cancelling drops tweens without a final
/// sample.
#[derive(Clone, Debug, Default)]
pub struct TweenScheduler {
    running: Vec<Running>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Returns `true` if a running tween for the same key was replaced.
    pub fn start(&mut self, node: NodeId, property: TweenProperty, tween: Tween) -> bool {
        let replaced = self.cancel(node, property);
        if replaced {
            vtrace!(node = node.get(), ?property, "replace tween");
        }
        self.running.push(Running {
            node,
            property,
            tween,
        });
        replaced
    }

    pub fn cancel(&mut self, node: NodeId, property: TweenProperty) -> bool {
        let before = self.running.len();
        self.running
            .retain(|r| !(r.node == node && r.property == property));
        self.running.len() != before
    }

    /// Cancels every tween of `node`. Returns how many were dropped.
    pub fn cancel_node(&mut self, node: NodeId) -> usize {
        let before = self.running.len();
        self.running.retain(|r| r.node != node);
        before - self.running.len()
    }

    pub fn clear(&mut self) {
        self.running.clear();
    }

    pub fn is_running(&self, node: NodeId, property: TweenProperty) -> bool {
        self.get(node, property).is_some()
    }

    pub fn is_node_running(&self, node: NodeId) -> bool {
        self.running.iter().any(|r| r.node == node)
    }

    pub fn get(&self, node: NodeId, property: TweenProperty) -> Option<&Tween> {
        self.running
            .iter()
            .find(|r| r.node == node && r.property == property)
            .map(|r| &r.tween)
    }

    /// Samples every running tween at `now_ms`, in start order. Finished tweens report
    /// `done: true` with their end value and are removed.
    pub fn tick(&mut self, now_ms: u64) -> Vec<TweenSample> {
        let samples: Vec<TweenSample> = self
            .running
            .iter()
            .map(|r| TweenSample {
                node: r.node,
                property: r.property,
                value: r.tween.sample(now_ms),
                done: r.tween.is_done(now_ms),
            })
            .collect();
        self.running.retain(|r| !r.tween.is_done(now_ms));
        samples
    }
}
