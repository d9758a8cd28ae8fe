//! The retained scene node every component decorates, and its event emitter.

use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::rc::Rc;

use crate::{Point, Rect};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// A process-unique node identity, stable for the node's whole life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Resize,
    PointerOver,
    PointerOut,
    PointerDown,
    PointerUp,
    PointerUpOutside,
    PointerTap,
    ItemClick,
    SelectionChange,
    /// Never emitted by this crate. Hosts that load textures emit it on the node that
    /// displays the image.
    ImageLoaded,
    FocusIn,
    FocusOut,
}

/// A pointer interaction delivered to a component, in the component's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: EventType,
    pub local: Option<Point>,
}

impl PointerEvent {
    pub fn new(kind: EventType) -> Self {
        Self { kind, local: None }
    }

    pub fn at(kind: EventType, local: Point) -> Self {
        Self {
            kind,
            local: Some(local),
        }
    }

    pub fn tap() -> Self {
        Self::new(EventType::PointerTap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventType,
    /// The emitting node.
    pub target: NodeId,
    /// Data index carried by list and item renderer events.
    pub index: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Rc<dyn Fn(&Event)>;

/// Typed `on`/`off`/`emit` subscription list.
///
/// Emission snapshots the listener list first, so a listener may subscribe or unsubscribe while
/// being notified.
#[derive(Default)]
pub struct EventEmitter {
    listeners: RefCell<Vec<(ListenerId, EventType, Listener)>>,
    next_id: Cell<u64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, kind: EventType, listener: impl Fn(&Event) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, kind, Rc::new(listener)));
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _, _)| *l != id);
        listeners.len() != before
    }

    pub fn emit(&self, event: &Event) {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        for listener in matching {
            listener(event);
        }
    }

    pub fn listener_count(&self, kind: EventType) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Geometry, visibility and events of one element of the scene tree.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
    pub alpha: f32,
    pub mask: Option<Rect>,
    pub interactive: bool,
    emitter: Rc<EventEmitter>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            x: 0.0,
            y: 0.0,
            visible: true,
            alpha: 1.0,
            mask: None,
            interactive: false,
            emitter: Rc::new(EventEmitter::new()),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn emitter(&self) -> &Rc<EventEmitter> {
        &self.emitter
    }

    pub fn on(&self, kind: EventType, listener: impl Fn(&Event) + 'static) -> ListenerId {
        self.emitter.on(kind, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    pub fn emit(&self, kind: EventType) {
        self.emit_indexed(kind, None);
    }

    pub fn emit_indexed(&self, kind: EventType, index: Option<usize>) {
        self.emitter.emit(&Event {
            kind,
            target: self.id,
            index,
        });
    }
}
