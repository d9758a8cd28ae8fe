//! Clock-driven helpers for the `vellum` crate.
//!
//! `vellum` validates and lays out components but never animates. This crate adds the pieces that
//! need a frame clock, all driven by explicit `tick(now_ms)` calls from the host:
//!
//! - [`Tween`] and [`Easing`]
//! - [`TweenScheduler`], running at most one tween per node and property
//! - [`ScrollController`], animated scrolling for lists
//! - [`PopupManager`], a LIFO stack of modal and modeless popups
//!
//! It is framework-agnostic; nothing here touches a real renderer.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod popup;
mod scheduler;
mod scroll;
mod tween;

#[cfg(test)]
mod tests;

pub use popup::{
    HideCallback, OVERLAY_FADE_MS, OverlayFactory, POPUP_FADE_MS, POPUP_SLIDE, PopupManager,
    ShowOptions,
};
pub use scheduler::{TweenProperty, TweenSample, TweenScheduler};
pub use scroll::ScrollController;
pub use tween::{Easing, Tween};
