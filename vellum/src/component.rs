//! The component lifecycle: deferred redraw through invalidation, child ownership, deferred
//! update actions and destruction.

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use crate::{
    DirtyFlags, Error, EventType, InvalidationSet, ListenerId, Node, NodeId, PointerEvent, Rect,
    Result,
};

/// A deferred action run once by [`Component::update`]. The second argument is the frame time in
/// milliseconds.
pub type UpdateAction = Box<dyn FnOnce(&mut dyn Component, u64)>;

struct UpdateRequest {
    id: Option<String>,
    action: UpdateAction,
}

/// The state every component carries: its scene node, explicit size, invalidation set, owned
/// children and pending update actions.
pub struct ComponentCore {
    pub node: Node,
    width: f32,
    height: f32,
    enabled: bool,
    hit_area: Option<Rect>,
    invalidation: Rc<InvalidationSet>,
    children: Vec<Box<dyn Component>>,
    updates: Vec<UpdateRequest>,
    update_requested_at: Option<u64>,
    destroyed: bool,
}

impl Default for ComponentCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentCore {
    pub fn new() -> Self {
        Self::with_size(0.0, 0.0)
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            node: Node::new(),
            width,
            height,
            enabled: true,
            hit_area: None,
            invalidation: Rc::new(InvalidationSet::new()),
            children: Vec::new(),
            updates: Vec::new(),
            update_requested_at: None,
            destroyed: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Overwrites the size without invalidating or emitting. Used by `draw` implementations that
    /// derive their own size from content.
    pub fn set_size_silently(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if the flag changed, in which case `STATE` is dirty.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.invalidation
            .assign(&mut self.enabled, enabled, DirtyFlags::STATE)
    }

    pub fn hit_area(&self) -> Option<Rect> {
        self.hit_area
    }

    pub fn invalidation(&self) -> &Rc<InvalidationSet> {
        &self.invalidation
    }

    pub fn invalidate(&self, flags: DirtyFlags) {
        self.invalidation.invalidate(flags);
    }

    pub fn is_invalid(&self, flags: DirtyFlags) -> bool {
        self.invalidation.is_invalid(flags)
    }

    pub fn children(&self) -> &[Box<dyn Component>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.children
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn pending_updates(&self) -> usize {
        self.updates.len()
    }

    /// The frame time at which the oldest pending update was requested, once a frame has seen it.
    pub fn update_requested_at(&self) -> Option<u64> {
        self.update_requested_at
    }

    /// Marks this component `SIZE` dirty whenever `child` emits `Resize`.
    pub(crate) fn watch_child_resize(&self, child: &dyn Component) -> ListenerId {
        let weak = Rc::downgrade(&self.invalidation);
        child.core().node.on(EventType::Resize, move |_| {
            if let Some(invalidation) = weak.upgrade() {
                invalidation.invalidate(DirtyFlags::SIZE);
            }
        })
    }
}

impl fmt::Debug for ComponentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCore")
            .field("id", &self.node.id())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("enabled", &self.enabled)
            .field("flags", &self.invalidation.flags())
            .field("children", &self.children.len())
            .field("updates", &self.updates.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

/// A visual element whose expensive recomputation is deferred until it is validated.
///
/// Implementors supply [`Component::core`]/[`Component::core_mut`] (see
/// [`crate::impl_component_core`]) and override the template methods they need: [`Component::draw`]
/// does the work for whatever flags are dirty, [`Component::after_draw`] runs after it, and
/// [`Component::for_each_child`] lists every owned subcomponent so render and destroy reach them.
///
/// A freshly constructed component is fully invalid. Setters follow "compare, assign, invalidate"
/// and never redraw by themselves; the next [`Component::validate_now`] (or the frame's
/// [`Component::render`] traversal) does.
pub trait Component: Any {
    fn core(&self) -> &ComponentCore;
    fn core_mut(&mut self) -> &mut ComponentCore;

    fn draw(&mut self) {}

    fn after_draw(&mut self) {
        let core = self.core_mut();
        core.hit_area = Some(Rect::new(0.0, 0.0, core.width, core.height));
    }

    /// Visits every owned subcomponent, including ones that are not in the public child list.
    fn for_each_child(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        for child in &mut self.core_mut().children {
            f(child.as_mut());
        }
    }

    fn on_child_added(&mut self, _index: usize) {}

    fn on_child_removed(&mut self, _child: &mut dyn Component) {}

    fn on_destroy(&mut self) {}

    /// Handles a pointer interaction. The default re-emits it on this node while enabled.
    fn handle_pointer(&mut self, event: PointerEvent) {
        let core = self.core();
        if core.destroyed || !core.enabled {
            return;
        }
        core.node.emit(event.kind);
    }

    fn id(&self) -> NodeId {
        self.core().node.id()
    }

    fn width(&self) -> f32 {
        self.core().width
    }

    fn height(&self) -> f32 {
        self.core().height
    }

    fn enabled(&self) -> bool {
        self.core().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.core_mut().set_enabled(enabled);
    }

    fn invalidate(&self, flags: DirtyFlags) {
        self.core().invalidation.invalidate(flags);
    }

    fn is_invalid(&self, flags: DirtyFlags) -> bool {
        self.core().invalidation.is_invalid(flags)
    }

    fn is_destroyed(&self) -> bool {
        self.core().destroyed
    }

    /// Runs a validation pass if anything is dirty.
    ///
    /// The outermost pass clears every flag once `draw` and `after_draw` return. A call made while
    /// a pass is already running redraws without clearing, so flags raised mid-pass stay visible
    /// to the rest of the outer pass.
    fn validate_now(&mut self) {
        let invalidation = Rc::clone(&self.core().invalidation);
        if self.core().destroyed || invalidation.is_valid() {
            return;
        }
        if invalidation.is_validating() {
            self.draw();
            self.after_draw();
            return;
        }
        vtrace!(id = self.id().get(), flags = ?invalidation.flags(), "validate");
        invalidation.begin_pass();
        self.draw();
        self.after_draw();
        invalidation.finish_pass();
    }

    /// Redraws regardless of the dirty flags and without clearing them.
    fn draw_now(&mut self) {
        if self.core().destroyed {
            return;
        }
        self.draw();
    }

    /// Validates every subcomponent depth-first, then this component if it is dirty.
    fn render(&mut self) {
        if self.core().destroyed {
            return;
        }
        self.for_each_child(&mut |child| child.render());
        if self.is_invalid(DirtyFlags::ALL) {
            self.validate_now();
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        let core = self.core_mut();
        core.width = width;
        core.height = height;
        core.invalidation.invalidate(DirtyFlags::SIZE);
        core.node.emit(EventType::Resize);
    }

    fn set_component_width(&mut self, width: f32) {
        let height = self.core().height;
        self.resize(width, height);
    }

    fn set_component_height(&mut self, height: f32) {
        let width = self.core().width;
        self.resize(width, height);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.core_mut().node.set_position(x, y);
    }

    /// Queues `action` for the next [`Component::update`]. A request with the id of a pending one
    /// replaces it.
    fn request_update(&mut self, id: Option<&str>, action: UpdateAction) {
        let core = self.core_mut();
        if core.destroyed {
            return;
        }
        if let Some(id) = id {
            core.updates.retain(|r| r.id.as_deref() != Some(id));
        }
        core.updates.push(UpdateRequest {
            id: id.map(str::to_owned),
            action,
        });
    }

    /// Returns `true` if a pending request with `id` was dropped.
    fn cancel_update(&mut self, id: &str) -> bool {
        let core = self.core_mut();
        let before = core.updates.len();
        core.updates.retain(|r| r.id.as_deref() != Some(id));
        if core.updates.is_empty() {
            core.update_requested_at = None;
        }
        core.updates.len() != before
    }

    fn clear_update_requests(&mut self) {
        let core = self.core_mut();
        core.updates.clear();
        core.update_requested_at = None;
    }

    /// Runs the pending update actions of this component and its subtree.
    ///
    /// Actions requested while running are deferred to the following call.
    fn update(&mut self, now_ms: u64) {
        if self.core().destroyed {
            return;
        }
        let pending = core::mem::take(&mut self.core_mut().updates);
        if !pending.is_empty() {
            self.core_mut().update_requested_at.get_or_insert(now_ms);
        }
        for request in pending {
            if self.core().destroyed {
                break;
            }
            (request.action)(self.as_component_mut(), now_ms);
        }
        if self.core().updates.is_empty() {
            self.core_mut().update_requested_at = None;
        }
        self.for_each_child(&mut |child| child.update(now_ms));
    }

    fn as_component_mut(&mut self) -> &mut dyn Component;

    fn num_children(&self) -> usize {
        self.core().children.len()
    }

    fn add_child(&mut self, child: Box<dyn Component>) {
        let index = self.core().children.len();
        self.core_mut().children.push(child);
        self.on_child_added(index);
    }

    /// Inserts `child` at `index`, which may equal the current child count.
    fn add_child_at(&mut self, child: Box<dyn Component>, index: usize) -> Result<()> {
        let len = self.core().children.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.core_mut().children.insert(index, child);
        self.on_child_added(index);
        Ok(())
    }

    fn remove_child_at(&mut self, index: usize) -> Result<Box<dyn Component>> {
        let len = self.core().children.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let mut child = self.core_mut().children.remove(index);
        self.on_child_removed(child.as_mut());
        Ok(child)
    }

    /// Detaches the child with `id`, if this component owns it directly.
    fn remove_child(&mut self, id: NodeId) -> Option<Box<dyn Component>> {
        let index = self.core().children.iter().position(|c| c.id() == id)?;
        self.remove_child_at(index).ok()
    }

    fn child_at(&self, index: usize) -> Option<&dyn Component> {
        self.core().children.get(index).map(|c| c.as_ref())
    }

    fn child_at_mut(&mut self, index: usize) -> Option<&mut dyn Component> {
        match self.core_mut().children.get_mut(index) {
            Some(child) => Some(child.as_mut()),
            None => None,
        }
    }

    fn swap_children_at(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.core().children.len();
        for index in [a, b] {
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
        }
        let core = self.core_mut();
        core.children.swap(a, b);
        core.invalidation.invalidate(DirtyFlags::SIZE);
        Ok(())
    }

    /// Returns `true` if `id` is this component or any descendant reachable through the child
    /// list.
    fn contains(&self, id: NodeId) -> bool {
        self.id() == id || self.core().children.iter().any(|c| c.contains(id))
    }

    /// Tears the component down: subcomponents are destroyed, listeners and pending updates are
    /// dropped. Destroying twice is a no-op, and a destroyed component never validates again.
    fn destroy(&mut self) {
        if self.core().destroyed {
            return;
        }
        vtrace!(id = self.id().get(), "destroy");
        self.core_mut().destroyed = true;
        self.on_destroy();
        self.for_each_child(&mut |child| child.destroy());
        let core = self.core_mut();
        core.children.clear();
        core.updates.clear();
        core.update_requested_at = None;
        core.hit_area = None;
        core.node.emitter().clear();
    }
}

impl dyn Component {
    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        (self as &dyn Any).downcast_ref::<C>()
    }

    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        (self as &mut dyn Any).downcast_mut::<C>()
    }

    pub fn is<C: Component>(&self) -> bool {
        (self as &dyn Any).is::<C>()
    }
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.core(), f)
    }
}

/// A plain component that only owns children.
#[derive(Debug, Default)]
pub struct Container {
    core: ComponentCore,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            core: ComponentCore::with_size(width, height),
        }
    }
}

impl Component for Container {
    impl_component_core!(self.core);
}
