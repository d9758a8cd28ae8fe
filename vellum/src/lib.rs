//! Invalidation-driven UI components and a recycling virtualized list engine.
//!
//! For adapter-level utilities (tweens, animated scrolling, popups), see the `vellum-adapter`
//! crate.
//!
//! Every [`Component`] keeps a set of dirty [`DirtyFlags`]. Setters only mark flags; the next
//! validation pass runs `draw` once with every flag raised since the last pass, then clears them.
//! On top of that lifecycle the crate provides:
//! - box layouts ([`HBox`], [`VBox`], [`LayoutBuilder`]) and aspect scaling ([`scale`])
//! - an observable [`DataProvider`] emitting exact change events
//! - [`List`] and [`TileList`], which render only the visible window and recycle
//!   [`ItemRenderer`]s, remapping selection as the data changes
//!
//! It is renderer-agnostic. A host is expected to provide:
//! - a frame clock driving [`Stage::frame`]
//! - pointer events, forwarded with [`Component::handle_pointer`]
//! - text metrics, through [`theme::TextMeasurer`]
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod component;
mod container;
pub mod controls;
mod data;
mod error;
mod invalidation;
mod key;
pub mod layout;
mod list;
mod node;
mod options;
mod renderer;
pub mod scale;
mod scroll;
mod selection;
mod stage;
mod state;
pub mod theme;
mod types;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentCore, Container, UpdateAction};
pub use container::{BoxContainer, HBox, LayoutBuilder, Pane, VBox};
pub use data::{ChangeEvent, ChangeKind, ChangeListener, DataProvider, SubscriptionId};
pub use error::{Error, Result};
pub use invalidation::{DirtyFlags, InvalidationSet};
pub use key::ItemKey;
pub use list::{
    Arrangement, EnabledPredicate, List, ListMetrics, RowLayout, TileLayout, TileList,
    VirtualList,
};
pub use node::{Event, EventEmitter, EventType, Listener, ListenerId, Node, NodeId, PointerEvent};
pub use options::ListOptions;
pub use renderer::{ItemRenderer, LabelEmitter, LabelItemRenderer, RendererFactory};
pub use scroll::{ScrollPane, Scrollable};
pub use selection::Selection;
pub use stage::Stage;
pub use state::{ListState, ScrollPosition};
pub use types::{
    Direction, HorizontalAlign, Placement, Point, Rect, Size, VerticalAlign, VisibleWindow,
};
