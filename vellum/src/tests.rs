use crate::*;

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use crate::controls::{Button, Label, SkinState};
use crate::layout::LayoutSettings;
use crate::scale::{ScaleMode, ScaleOptions};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// Counts draws and records the flags each draw saw.
#[derive(Debug, Default)]
struct DrawCounter {
    core: ComponentCore,
    draws: Rc<Cell<usize>>,
    seen: Rc<Cell<DirtyFlags>>,
    destroyed: Rc<Cell<usize>>,
    reenter: bool,
}

impl DrawCounter {
    fn new() -> Self {
        Self::default()
    }
}

impl Component for DrawCounter {
    impl_component_core!(self.core);

    fn draw(&mut self) {
        self.draws.set(self.draws.get() + 1);
        self.seen.set(self.core.invalidation().flags());
        if self.reenter && self.draws.get() == 1 {
            self.core.invalidate(DirtyFlags::SCROLL);
            self.validate_now();
        }
    }

    fn on_destroy(&mut self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

fn provider(len: u32) -> DataProvider<u32> {
    DataProvider::from_values(0..len)
}

fn list_with(options: ListOptions, len: u32) -> (List<u32>, DataProvider<u32>) {
    let data = provider(len);
    let mut list = List::new(options).with_data_provider(data.clone());
    list.validate_now();
    (list, data)
}

fn renderer_text<T: 'static>(renderer: &dyn ItemRenderer<T>) -> String {
    let component: &dyn Component = renderer;
    component
        .downcast_ref::<LabelItemRenderer<T>>()
        .map(|r| r.label().text().to_owned())
        .unwrap_or_default()
}

fn record_events(node: &Node, kind: EventType) -> Rc<RefCell<Vec<Option<usize>>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    node.on(kind, move |event| sink.borrow_mut().push(event.index));
    log
}

#[test]
fn new_component_is_fully_invalid_and_validates_once() {
    let mut counter = DrawCounter::new();
    assert!(counter.is_invalid(DirtyFlags::ALL));
    assert!(counter.is_invalid(DirtyFlags::TEXT));

    counter.validate_now();
    assert_eq!(counter.draws.get(), 1);
    assert_eq!(counter.seen.get(), DirtyFlags::ALL);
    assert!(counter.core().invalidation().is_valid());

    counter.validate_now();
    assert_eq!(counter.draws.get(), 1);
}

#[test]
fn flags_raised_between_passes_are_drawn_together() {
    let mut counter = DrawCounter::new();
    counter.validate_now();

    counter.invalidate(DirtyFlags::SIZE);
    counter.invalidate(DirtyFlags::DATA);
    counter.invalidate(DirtyFlags::SIZE);
    counter.validate_now();

    assert_eq!(counter.draws.get(), 2);
    assert_eq!(counter.seen.get(), DirtyFlags::SIZE | DirtyFlags::DATA);
    assert!(!counter.is_invalid(DirtyFlags::ALL));
}

#[test]
fn assign_only_invalidates_on_change() {
    let set = InvalidationSet::new();
    set.finish_pass();
    let mut width = 10.0_f32;

    assert!(!set.assign(&mut width, 10.0, DirtyFlags::SIZE));
    assert!(set.is_valid());

    assert!(set.assign(&mut width, 12.0, DirtyFlags::SIZE));
    assert_eq!(width, 12.0);
    assert!(set.is_invalid(DirtyFlags::SIZE));
    assert!(!set.is_invalid(DirtyFlags::DATA));
}

#[test]
fn dirty_flags_contains_and_intersects() {
    let flags = DirtyFlags::SIZE | DirtyFlags::SCROLL;
    assert!(flags.contains(DirtyFlags::SIZE));
    assert!(!flags.contains(DirtyFlags::SIZE | DirtyFlags::DATA));
    assert!(flags.intersects(DirtyFlags::SIZE | DirtyFlags::DATA));
    assert!(DirtyFlags::ALL.contains(DirtyFlags::ICON));
    assert!(DirtyFlags::NONE.is_empty());
}

#[test]
fn reentrant_validation_redraws_without_clearing() {
    let mut counter = DrawCounter {
        reenter: true,
        ..DrawCounter::default()
    };
    counter.validate_now();

    assert_eq!(counter.draws.get(), 2);
    assert!(counter.core().invalidation().is_valid());
    assert!(!counter.core().invalidation().is_validating());
}

#[test]
fn destroyed_component_stays_inert() {
    let mut parent = DrawCounter::new();
    let child = DrawCounter::new();
    let child_destroyed = Rc::clone(&child.destroyed);
    parent.add_child(Box::new(child));
    parent.validate_now();

    parent.destroy();
    parent.destroy();
    assert_eq!(parent.destroyed.get(), 1);
    assert_eq!(child_destroyed.get(), 1);
    assert_eq!(parent.num_children(), 0);
    assert!(parent.is_destroyed());

    parent.invalidate(DirtyFlags::SIZE);
    parent.validate_now();
    parent.render();
    assert_eq!(parent.draws.get(), 1);
}

#[test]
fn destroy_drops_listeners_and_updates() {
    let mut counter = DrawCounter::new();
    let log = record_events(&counter.core().node, EventType::Resize);
    counter.request_update(None, Box::new(|_, _| {}));

    counter.destroy();
    assert_eq!(counter.core().pending_updates(), 0);
    counter.core().node.emit(EventType::Resize);
    assert!(log.borrow().is_empty());

    counter.request_update(None, Box::new(|_, _| {}));
    assert_eq!(counter.core().pending_updates(), 0);
}

#[test]
fn update_actions_run_once_and_replace_by_id() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut container = Container::new();
    for (id, value) in [(Some("a"), 1), (Some("a"), 2), (None, 3)] {
        let sink = Rc::clone(&log);
        container.request_update(id, Box::new(move |_, _| sink.borrow_mut().push(value)));
    }
    assert_eq!(container.core().pending_updates(), 2);

    container.update(16);
    assert_eq!(*log.borrow(), vec![2, 3]);
    assert_eq!(container.core().update_requested_at(), None);

    container.update(32);
    assert_eq!(*log.borrow(), vec![2, 3]);
}

#[test]
fn cancel_update_reports_whether_it_dropped_a_request() {
    let mut container = Container::new();
    container.request_update(Some("fade"), Box::new(|_, _| {}));
    assert!(container.cancel_update("fade"));
    assert!(!container.cancel_update("fade"));
    assert_eq!(container.core().pending_updates(), 0);
}

#[test]
fn updates_requested_while_updating_wait_for_the_next_frame() {
    let runs = Rc::new(Cell::new(0));
    let mut container = Container::new();
    let outer = Rc::clone(&runs);
    container.request_update(
        None,
        Box::new(move |component, _| {
            outer.set(outer.get() + 1);
            let inner = Rc::clone(&outer);
            component.request_update(None, Box::new(move |_, _| inner.set(inner.get() + 1)));
        }),
    );

    container.update(0);
    assert_eq!(runs.get(), 1);
    assert_eq!(container.core().pending_updates(), 1);
    assert_eq!(container.core().update_requested_at(), Some(0));

    container.update(16);
    assert_eq!(runs.get(), 2);
    assert_eq!(container.core().pending_updates(), 0);
}

#[test]
fn update_reaches_children() {
    let hits = Rc::new(Cell::new(0));
    let mut child = Container::new();
    let sink = Rc::clone(&hits);
    child.request_update(None, Box::new(move |_, now| sink.set(now)));
    let mut root = Container::new();
    root.add_child(Box::new(child));

    root.update(48);
    assert_eq!(hits.get(), 48);
}

#[test]
fn child_indexes_are_validated() {
    let mut root = Container::new();
    let err = root
        .add_child_at(Box::new(Container::new()), 1)
        .unwrap_err();
    assert_eq!(err, Error::IndexOutOfRange { index: 1, len: 0 });
    assert_eq!(err.to_string(), "index 1 out of range for length 0");

    root.add_child_at(Box::new(Container::new()), 0).unwrap();
    let second = Container::new();
    let second_id = second.id();
    root.add_child(Box::new(second));
    assert!(root.contains(second_id));

    assert!(root.swap_children_at(0, 2).is_err());
    root.swap_children_at(0, 1).unwrap();
    assert_eq!(root.child_at(0).map(|c| c.id()), Some(second_id));

    assert!(root.remove_child_at(5).is_err());
    let removed = root.remove_child(second_id).unwrap();
    assert_eq!(removed.id(), second_id);
    assert!(!root.contains(second_id));
    assert_eq!(root.num_children(), 1);
}

#[test]
fn resize_invalidates_and_emits() {
    let mut counter = DrawCounter::new();
    counter.validate_now();
    let log = record_events(&counter.core().node, EventType::Resize);

    counter.resize(40.0, 20.0);
    assert!(counter.is_invalid(DirtyFlags::SIZE));
    assert_eq!(log.borrow().len(), 1);

    counter.validate_now();
    assert_eq!(counter.core().hit_area(), Some(Rect::new(0.0, 0.0, 40.0, 20.0)));
}

#[test]
fn downcast_recovers_the_concrete_component() {
    let boxed: Box<dyn Component> = Box::new(Label::new("hi"));
    assert!(boxed.is::<Label>());
    assert_eq!(boxed.downcast_ref::<Label>().map(Label::text), Some("hi"));
    assert!(boxed.downcast_ref::<Container>().is_none());
}

#[test]
fn stage_frame_runs_updates_then_renders() {
    let mut stage = Stage::new(320.0, 240.0);
    let counter = DrawCounter::new();
    let draws = Rc::clone(&counter.draws);
    stage.add_child(Box::new(counter));

    stage.frame(0);
    assert_eq!(stage.frames(), 1);
    assert_eq!(draws.get(), 1);

    stage.frame(16);
    assert_eq!(draws.get(), 1);

    if let Some(child) = stage.root_mut().child_at_mut(0) {
        child.invalidate(DirtyFlags::STATE);
    }
    stage.frame(32);
    assert_eq!(draws.get(), 2);
}

#[test]
fn emitter_snapshots_listeners_before_dispatch() {
    let emitter = Rc::new(EventEmitter::new());
    let calls = Rc::new(Cell::new(0));
    let id = Rc::new(Cell::new(None));

    let weak = Rc::downgrade(&emitter);
    let (counter, own_id) = (Rc::clone(&calls), Rc::clone(&id));
    let listener = emitter.on(EventType::FocusIn, move |_| {
        counter.set(counter.get() + 1);
        if let (Some(emitter), Some(id)) = (weak.upgrade(), own_id.get()) {
            emitter.off(id);
        }
    });
    id.set(Some(listener));

    let event = Event {
        kind: EventType::FocusIn,
        target: Node::new().id(),
        index: None,
    };
    emitter.emit(&event);
    emitter.emit(&event);
    assert_eq!(calls.get(), 1);
    assert_eq!(emitter.listener_count(EventType::FocusIn), 0);
}

#[test]
fn node_ids_are_unique() {
    let a = Node::new();
    let b = Node::new();
    assert_ne!(a.id(), b.id());
}

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    kind: ChangeKind,
    start: usize,
    end: usize,
    items: usize,
}

fn record_changes<T: 'static>(data: &DataProvider<T>) -> Rc<RefCell<Vec<Recorded>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    data.subscribe(move |event| {
        sink.borrow_mut().push(Recorded {
            kind: event.kind,
            start: event.start_index,
            end: event.end_index,
            items: event.items.len(),
        });
    });
    log
}

fn rec(kind: ChangeKind, start: usize, end: usize, items: usize) -> Recorded {
    Recorded {
        kind,
        start,
        end,
        items,
    }
}

#[test]
fn provider_emits_exact_change_events() {
    let data = DataProvider::<u32>::new();
    let log = record_changes(&data);

    data.add_item(10_u32);
    data.add_items_at([Rc::new(11), Rc::new(12)], 0).unwrap();
    data.remove_item_at(1).unwrap();
    let old = data.replace_item_at(20_u32, 0).unwrap();
    data.invalidate_item_at(1).unwrap();
    data.invalidate();
    let removed = data.remove_all();

    assert_eq!(*old, 11);
    assert_eq!(removed.len(), 2);
    assert_eq!(
        *log.borrow(),
        vec![
            rec(ChangeKind::Add, 0, 0, 1),
            rec(ChangeKind::Add, 0, 1, 2),
            rec(ChangeKind::Remove, 1, 1, 1),
            rec(ChangeKind::Replace, 0, 0, 1),
            rec(ChangeKind::Invalidate, 1, 1, 1),
            rec(ChangeKind::InvalidateAll, 0, 2, 2),
            rec(ChangeKind::RemoveAll, 0, 2, 2),
        ]
    );
}

#[test]
fn provider_rejects_bad_indexes_without_emitting() {
    let data = provider(2);
    let log = record_changes(&data);

    assert_eq!(
        data.add_item_at(9_u32, 3),
        Err(Error::IndexOutOfRange { index: 3, len: 2 })
    );
    assert!(data.remove_item_at(2).is_err());
    assert!(data.replace_item_at(1_u32, 2).is_err());
    assert!(data.invalidate_item_at(5).is_err());
    assert!(data.item_at(2).is_err());
    data.add_items_at(Vec::new(), 1).unwrap();
    data.add_items(Vec::new());

    assert!(log.borrow().is_empty());
    assert_eq!(data.len(), 2);

    data.add_item_at(9_u32, 2).unwrap();
    assert_eq!(*data.item_at(2).unwrap(), 9);
}

#[test]
fn provider_uses_identity_not_equality() {
    let a = Rc::new(7_u32);
    let b = Rc::new(7_u32);
    let data = DataProvider::from_items(vec![Rc::clone(&a), Rc::clone(&b), Rc::clone(&a)]);

    assert_eq!(data.item_index(&b), Some(1));
    assert_eq!(data.item_index(&a), Some(0));
    assert!(data.remove_item(&a).is_some());
    assert_eq!(data.item_index(&a), Some(1));
    assert!(data.remove_item(&Rc::new(7)).is_none());
    assert!(!data.invalidate_item(&Rc::new(7)));
}

#[test]
fn sort_reports_the_permutation() {
    let data: DataProvider<u32> = [30, 10, 20].into_iter().collect();
    let permutation = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&permutation);
    data.subscribe(move |event| *sink.borrow_mut() = event.permutation.clone());

    data.sort();
    let values: Vec<u32> = data.items().iter().map(|v| **v).collect();
    assert_eq!(values, vec![10, 20, 30]);
    assert_eq!(*permutation.borrow(), Some(vec![1, 2, 0]));
}

#[test]
fn listeners_can_read_the_provider_and_unsubscribe() {
    let data = provider(1);
    let seen = Rc::new(Cell::new(0));
    let (reader, sink) = (data.clone(), Rc::clone(&seen));
    let id = data.subscribe(move |_| sink.set(reader.len()));

    data.add_item(5_u32);
    assert_eq!(seen.get(), 2);
    assert!(data.unsubscribe(id));
    assert!(!data.unsubscribe(id));
    data.add_item(6_u32);
    assert_eq!(seen.get(), 2);
    assert_eq!(data.subscriber_count(), 0);
}

fn change(kind: ChangeKind, start: usize, end: usize) -> ChangeEvent<u32> {
    ChangeEvent {
        kind,
        items: Vec::new(),
        start_index: start,
        end_index: end,
        permutation: None,
    }
}

#[test]
fn selection_remaps_across_a_removed_range() {
    let mut selection = Selection::from_indices([2, 5, 7]);
    assert!(selection.apply_change(&change(ChangeKind::Remove, 3, 4)));
    assert_eq!(selection.indices(), &[2, 3, 5]);

    let mut selection = Selection::from_indices([2, 3, 9]);
    selection.apply_change(&change(ChangeKind::Remove, 3, 4));
    assert_eq!(selection.indices(), &[2, 7]);
}

#[test]
fn selection_shifts_past_an_insertion() {
    let mut selection = Selection::from_indices([1, 4, 2]);
    selection.apply_change(&change(ChangeKind::Add, 2, 4));
    assert_eq!(selection.indices(), &[1, 7, 5]);
    assert_eq!(selection.current(), Some(5));
}

#[test]
fn selection_follows_a_sort() {
    let mut selection = Selection::from_indices([0, 2]);
    let mut event = change(ChangeKind::Sort, 0, 2);
    event.permutation = Some(vec![1, 2, 0]);
    selection.apply_change(&event);
    assert_eq!(selection.indices(), &[2, 1]);

    assert!(selection.apply_change(&change(ChangeKind::Sort, 0, 2)));
    assert!(selection.is_empty());
}

#[test]
fn selection_ignores_replace_and_clears_on_remove_all() {
    let mut selection = Selection::from_indices([1, 1, 3]);
    assert_eq!(selection.len(), 2);
    assert!(!selection.apply_change(&change(ChangeKind::Replace, 1, 1)));
    assert!(!selection.apply_change(&change(ChangeKind::Invalidate, 3, 3)));
    assert!(selection.apply_change(&change(ChangeKind::RemoveAll, 0, 4)));
    assert!(selection.is_empty());
}

#[test]
fn list_renders_only_the_visible_window() {
    let (list, _data) = list_with(ListOptions::default(), 50);

    assert_eq!(
        list.visible_window(),
        VisibleWindow {
            start_index: 0,
            end_index: 6
        }
    );
    assert_eq!(list.active_renderers().count(), 6);
    assert_eq!(list.renderers_constructed(), 6);
    assert_eq!(list.scroll_pane().content_size(), Size::new(100.0, 1600.0));
    assert_eq!(list.max_scroll_position(), ScrollPosition::new(1500.0, 0.0));

    let third = list.renderer_for_index(2).unwrap();
    assert_eq!(renderer_text(third), "2");
    assert_eq!(third.core().node.position(), Point::new(0.0, 64.0));
    assert_eq!((third.width(), third.height()), (100.0, 32.0));
}

#[test]
fn scrolling_moves_the_window_and_recycles() {
    let (mut list, _data) = list_with(ListOptions::default(), 50);

    list.set_vertical_scroll_position(40.0);
    assert_eq!(list.visible_window().start_index, 1);
    assert_eq!(list.visible_window().end_index, 7);
    assert_eq!(list.list_origin(), Point::new(0.0, -8.0));
    assert_eq!(list.renderers_constructed(), 6);
    assert_eq!(list.available_renderers(), 0);

    let first = list.renderer_for_index(1).unwrap();
    assert_eq!(first.core().node.position(), Point::ZERO);
    assert!(list.renderer_for_index(0).is_none());

    list.set_vertical_scroll_position(10_000.0);
    assert_eq!(list.vertical_scroll_position(), 1500.0);
    assert_eq!(
        list.visible_window(),
        VisibleWindow {
            start_index: 46,
            end_index: 50
        }
    );
    assert_eq!(list.active_renderers().count(), 4);
    assert_eq!(list.available_renderers(), 2);
    assert_eq!(renderer_text(list.renderer_for_index(49).unwrap()), "49");
}

#[test]
fn renderer_count_is_bounded_by_the_window() {
    let (mut list, _data) = list_with(ListOptions::default(), 500);

    let mut offset = 0.0;
    while offset <= 16_000.0 {
        list.set_vertical_scroll_position(offset);
        offset += 7.0;
    }
    list.scroll_to_index(0);

    assert_eq!(list.renderers_constructed(), 6);
    assert_eq!(
        list.active_renderers().count() + list.available_renderers(),
        6
    );
    assert_eq!(renderer_text(list.renderer_for_index(0).unwrap()), "0");
}

#[test]
fn active_renderers_match_the_window() {
    let (mut list, _data) = list_with(ListOptions::default().with_vertical_gap(4.0), 30);
    let mut rng = Lcg::new(7);

    for _ in 0..40 {
        let max = list.max_scroll_position().vertical;
        let target = rng.gen_range_usize(0, max as usize + 1) as f32;
        list.set_vertical_scroll_position(target);

        let window = list.visible_window();
        let indexes: Vec<usize> = list.active_renderers().filter_map(|r| r.index()).collect();
        let expected: Vec<usize> = (window.start_index..window.end_index).collect();
        assert_eq!(indexes, expected);
        for renderer in list.active_renderers() {
            let index = renderer.index().unwrap();
            assert_eq!(renderer_text(renderer), index.to_string());
            let y = (index - window.start_index) as f32 * 36.0;
            assert_eq!(renderer.core().node.y, y);
        }
    }
}

#[test]
fn scroll_position_is_reclamped_when_content_shrinks() {
    let (mut list, data) = list_with(ListOptions::default(), 50);
    list.set_vertical_scroll_position(1500.0);

    for _ in 0..10 {
        data.remove_item_at(0).unwrap();
    }
    list.validate_now();
    assert_eq!(list.vertical_scroll_position(), 1180.0);
    assert_eq!(list.visible_window().end_index, 40);

    data.remove_all();
    list.validate_now();
    assert_eq!(list.vertical_scroll_position(), 0.0);
    assert!(list.visible_window().is_empty());
    assert_eq!(list.active_renderers().count(), 0);
}

#[test]
fn empty_list_has_no_renderers() {
    let mut list = List::<u32>::new(ListOptions::default());
    list.validate_now();
    assert!(list.is_empty());
    assert!(list.visible_window().is_empty());
    assert_eq!(list.renderers_constructed(), 0);
    assert_eq!(list.pages_count(), 0);
    assert!(list.item_at(0).is_err());
}

#[test]
fn list_mutators_forward_to_the_provider() {
    let mut list = List::<u32>::new(ListOptions::default());
    list.add_item(1_u32);
    list.add_item(3_u32);
    list.add_item_at(2_u32, 1).unwrap();
    assert!(list.add_item_at(9_u32, 7).is_err());
    list.validate_now();

    let texts: Vec<String> = list.active_renderers().map(renderer_text).collect();
    assert_eq!(texts, vec!["1", "2", "3"]);

    let data = list.data_provider();
    assert_eq!(data.len(), 3);
    assert_eq!(*list.remove_item_at(0).unwrap(), 1);
    assert_eq!(*list.replace_item_at(20_u32, 0).unwrap(), 2);
    list.sort_by(|a, b| b.cmp(a));
    list.validate_now();

    let texts: Vec<String> = list.active_renderers().map(renderer_text).collect();
    assert_eq!(texts, vec!["20", "3"]);
}

#[test]
fn tapping_a_renderer_selects_its_index() {
    let (mut list, _data) = list_with(ListOptions::default().with_selectable(true), 20);
    let clicks = record_events(&list.core().node, EventType::ItemClick);
    let changes = record_events(&list.core().node, EventType::SelectionChange);

    list.renderer_for_index_mut(2)
        .unwrap()
        .handle_pointer(PointerEvent::tap());
    assert_eq!(list.selected_index(), Some(2));
    assert_eq!(*clicks.borrow(), vec![Some(2)]);
    assert_eq!(*changes.borrow(), vec![Some(2)]);

    assert!(list.is_invalid(DirtyFlags::SELECTION));
    list.validate_now();
    assert!(list.renderer_for_index(2).unwrap().selected());
    assert!(!list.renderer_for_index(1).unwrap().selected());

    list.renderer_for_index_mut(2)
        .unwrap()
        .handle_pointer(PointerEvent::tap());
    assert_eq!(list.selected_index(), None);
    assert_eq!(*changes.borrow(), vec![Some(2), None]);
}

#[test]
fn positioned_taps_are_routed_to_the_renderer_underneath() {
    let (mut list, _data) = list_with(ListOptions::default().with_selectable(true), 20);
    list.set_vertical_scroll_position(40.0);

    // Row 3 spans 96..128 in content space, 56..88 in the viewport.
    list.handle_pointer(PointerEvent::at(EventType::PointerTap, Point::new(10.0, 60.0)));
    assert_eq!(list.selected_index(), Some(3));

    list.handle_pointer(PointerEvent::at(EventType::PointerTap, Point::new(10.0, 150.0)));
    assert_eq!(list.selected_index(), Some(3));
}

#[test]
fn clicks_on_a_plain_list_do_not_select() {
    let (mut list, _data) = list_with(ListOptions::default(), 20);
    let clicks = record_events(&list.core().node, EventType::ItemClick);

    list.renderer_for_index_mut(1)
        .unwrap()
        .handle_pointer(PointerEvent::tap());
    assert_eq!(*clicks.borrow(), vec![Some(1)]);
    assert_eq!(list.selected_index(), None);

    list.set_selected_index(Some(1));
    assert_eq!(list.selected_index(), None);
}

#[test]
fn multiple_selection_respects_the_limit() {
    let options = ListOptions::default()
        .with_selectable(true)
        .with_allow_multiple_selection(true)
        .with_max_selected(2);
    let (mut list, _data) = list_with(options, 20);

    for index in [1, 3, 5] {
        list.renderer_for_index_mut(index)
            .unwrap()
            .handle_pointer(PointerEvent::tap());
    }
    assert_eq!(list.selected_indices(), vec![1, 3]);

    list.renderer_for_index_mut(1)
        .unwrap()
        .handle_pointer(PointerEvent::tap());
    assert_eq!(list.selected_indices(), vec![3]);
    assert_eq!(list.selected_index(), Some(3));
}

#[test]
fn disabled_lists_and_items_ignore_taps() {
    let (mut list, _data) = list_with(ListOptions::default().with_selectable(true), 20);
    list.set_enabled_predicate(|value: &u32| value % 2 == 0);
    list.validate_now();
    assert!(!list.renderer_for_index(1).unwrap().enabled());
    assert!(list.renderer_for_index(2).unwrap().enabled());

    list.renderer_for_index_mut(1)
        .unwrap()
        .handle_pointer(PointerEvent::tap());
    assert_eq!(list.selected_index(), None);

    list.set_enabled(false);
    list.renderer_for_index_mut(2)
        .unwrap()
        .handle_pointer(PointerEvent::tap());
    assert_eq!(list.selected_index(), None);

    list.set_enabled(true);
    list.clear_enabled_predicate();
    list.validate_now();
    assert!(list.renderer_for_index(1).unwrap().enabled());
}

#[test]
fn selection_setters_validate_indexes_and_items() {
    let (mut list, data) = list_with(
        ListOptions::default()
            .with_selectable(true)
            .with_allow_multiple_selection(true),
        10,
    );

    list.set_selected_indices([4, 12, 2, 4]);
    assert_eq!(list.selected_indices(), vec![4, 2]);
    assert_eq!(list.selected_index(), Some(2));
    assert_eq!(list.selected_item().map(|v| *v), Some(2));

    let item = data.item_at(7).unwrap();
    list.set_selected_item(Some(&item));
    assert_eq!(list.selected_indices(), vec![7]);
    assert!(list.is_item_selected(&item));
    assert!(!list.is_item_selected(&Rc::new(7)));

    let items = vec![data.item_at(1).unwrap(), Rc::new(99), data.item_at(3).unwrap()];
    list.set_selected_items(&items);
    let selected: Vec<u32> = list.selected_items().iter().map(|v| **v).collect();
    assert_eq!(selected, vec![1, 3]);

    list.set_selected_items(&[]);
    assert!(list.selected_indices().is_empty());

    list.set_selected_index(Some(5));
    list.clear_selection();
    assert_eq!(list.selected_index(), None);
}

#[test]
fn list_selection_follows_provider_changes() {
    let (mut list, data) = list_with(
        ListOptions::default()
            .with_selectable(true)
            .with_allow_multiple_selection(true),
        10,
    );
    list.set_selected_indices([2, 5, 7]);

    data.remove_item_at(3).unwrap();
    data.remove_item_at(3).unwrap();
    assert_eq!(list.selected_indices(), vec![2, 3, 5]);

    data.add_item_at(100_u32, 0).unwrap();
    assert_eq!(list.selected_indices(), vec![3, 4, 6]);

    data.invalidate();
    assert!(list.selected_indices().is_empty());
}

#[test]
fn selected_items_survive_random_edits() {
    let data = provider(40);
    let mut list = List::new(
        ListOptions::default()
            .with_selectable(true)
            .with_allow_multiple_selection(true),
    )
    .with_data_provider(data.clone());
    let mut rng = Lcg::new(0x5eed);

    let picks: Vec<usize> = (0..8).map(|_| rng.gen_range_usize(0, 40)).collect();
    list.set_selected_indices(picks.iter().copied());
    let mut expected: Vec<Rc<u32>> = Vec::new();
    for &index in &picks {
        let item = data.item_at(index).unwrap();
        if !expected.iter().any(|e| Rc::ptr_eq(e, &item)) {
            expected.push(item);
        }
    }

    for step in 0..200_u32 {
        if data.is_empty() || rng.gen_bool() {
            let index = rng.gen_range_usize(0, data.len() + 1);
            data.add_item_at(1000 + step, index).unwrap();
        } else {
            let index = rng.gen_range_usize(0, data.len());
            let removed = data.remove_item_at(index).unwrap();
            expected.retain(|e| !Rc::ptr_eq(e, &removed));
        }
        if step % 50 == 49 {
            data.sort_by(|a, b| b.cmp(a));
        }
        list.validate_now();

        let selected = list.selected_items();
        assert_eq!(selected.len(), expected.len());
        for (actual, wanted) in selected.iter().zip(&expected) {
            assert!(Rc::ptr_eq(actual, wanted));
        }
    }
}

struct Tally {
    value: Cell<u32>,
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.get())
    }
}

#[test]
fn in_place_edits_show_only_after_invalidation() {
    let data = DataProvider::from_values((0..10).map(|i| Tally {
        value: Cell::new(i),
    }));
    let mut list = List::new(ListOptions::default()).with_data_provider(data.clone());
    list.validate_now();

    let first = data.item_at(0).unwrap();
    first.value.set(7);
    list.validate_now();
    list.set_vertical_scroll_position(1.0);
    assert_eq!(renderer_text(list.renderer_for_index(0).unwrap()), "0");

    data.invalidate_item(&first);
    list.validate_now();
    assert_eq!(renderer_text(list.renderer_for_index(0).unwrap()), "7");
    assert_eq!(list.renderers_constructed(), 6);

    first.value.set(8);
    list.invalidate_item_at(0).unwrap();
    list.validate_now();
    assert_eq!(renderer_text(list.renderer_for_index(0).unwrap()), "8");
}

#[test]
fn invalidate_all_rebuilds_every_renderer() {
    let (mut list, data) = list_with(ListOptions::default(), 20);
    assert_eq!(list.renderers_constructed(), 6);

    data.invalidate();
    list.validate_now();
    assert_eq!(list.renderers_constructed(), 12);
    assert_eq!(list.active_renderers().count(), 6);
    assert_eq!(list.available_renderers(), 0);
}

#[test]
fn label_emitter_overrides_display() {
    let (mut list, _data) = list_with(ListOptions::default(), 5);
    list.set_label_emitter(|value: &u32| format!("#{value}"));
    list.validate_now();
    assert_eq!(renderer_text(list.renderer_for_index(3).unwrap()), "#3");

    list.clear_label_emitter();
    list.validate_now();
    assert_eq!(renderer_text(list.renderer_for_index(3).unwrap()), "3");
}

/// A renderer without a label that counts how often it is bound.
struct CountingRow {
    core: ComponentCore,
    data: Option<Rc<String>>,
    index: Option<usize>,
    selected: bool,
    binds: Rc<Cell<usize>>,
}

impl Component for CountingRow {
    impl_component_core!(self.core);

    fn draw(&mut self) {
        if self.core.is_invalid(DirtyFlags::DATA) && self.data.is_some() {
            self.binds.set(self.binds.get() + 1);
        }
    }
}

impl ItemRenderer<String> for CountingRow {
    fn data(&self) -> Option<&Rc<String>> {
        self.data.as_ref()
    }

    fn set_data(&mut self, data: Option<Rc<String>>) {
        self.data = data;
        self.core.invalidate(DirtyFlags::DATA);
    }

    fn index(&self) -> Option<usize> {
        self.index
    }

    fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    fn selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn set_label_emitter(&mut self, _emitter: Option<LabelEmitter<String>>) {}
}

fn counting_factory(binds: &Rc<Cell<usize>>) -> RendererFactory<String> {
    let binds = Rc::clone(binds);
    Rc::new(move || -> Box<dyn ItemRenderer<String>> {
        Box::new(CountingRow {
            core: ComponentCore::new(),
            data: None,
            index: None,
            selected: false,
            binds: Rc::clone(&binds),
        })
    })
}

#[test]
fn reused_renderers_are_not_rebound() {
    let binds = Rc::new(Cell::new(0));
    let data: DataProvider<String> = (0..50).map(|i| format!("row {i}")).collect();
    let mut list = List::with_factory(ListOptions::default(), counting_factory(&binds))
        .with_data_provider(data);
    list.validate_now();
    assert_eq!(binds.get(), 6);

    // One row scrolls out, one scrolls in: only the new one binds.
    list.set_vertical_scroll_position(32.0);
    assert_eq!(binds.get(), 7);

    list.set_vertical_scroll_position(33.0);
    assert_eq!(binds.get(), 7);
}

#[test]
fn changing_the_factory_replaces_every_renderer() {
    let binds = Rc::new(Cell::new(0));
    let (mut list, _data) = list_with(ListOptions::default(), 20);
    let strings: DataProvider<String> = (0..20).map(|i| i.to_string()).collect();
    let mut text_list = List::<String>::new(ListOptions::default()).with_data_provider(strings);
    text_list.validate_now();
    assert_eq!(text_list.renderers_constructed(), 6);

    text_list.set_renderer_factory(counting_factory(&binds));
    text_list.validate_now();
    assert_eq!(text_list.renderers_constructed(), 12);
    assert_eq!(binds.get(), 6);
    assert!(renderer_text(text_list.renderer_for_index(0).unwrap()).is_empty());

    list.clear_all_renderers();
    list.validate_now();
    assert_eq!(list.renderers_constructed(), 12);
}

#[test]
fn replacing_the_provider_resets_selection() {
    let (mut list, data) = list_with(ListOptions::default().with_selectable(true), 20);
    list.set_selected_index(Some(4));

    list.set_data_provider(Some(data.clone()));
    assert_eq!(list.selected_index(), Some(4));

    let other = provider(3);
    list.set_data_provider(Some(other.clone()));
    assert_eq!(list.selected_index(), None);
    assert_eq!(data.subscriber_count(), 0);
    assert_eq!(other.subscriber_count(), 1);

    list.validate_now();
    assert_eq!(list.active_renderers().count(), 3);

    drop(list);
    assert_eq!(other.subscriber_count(), 0);
}

#[test]
fn destroying_a_list_destroys_its_renderers() {
    let (mut list, data) = list_with(ListOptions::default(), 50);
    list.set_vertical_scroll_position(1500.0);
    assert_eq!(list.available_renderers(), 2);

    list.destroy();
    assert_eq!(data.subscriber_count(), 0);
    assert_eq!(list.available_renderers(), 0);
    assert!(list.active_renderers().all(|r| r.is_destroyed()));
}

#[test]
fn rows_and_pages() {
    let (mut list, _data) = list_with(ListOptions::default(), 50);
    assert_eq!(list.rows_count(), 4);
    assert_eq!(list.pages_count(), 13);

    list.scroll_to_page(2);
    assert_eq!(list.vertical_scroll_position(), 256.0);

    list.set_rows_count(5);
    assert_eq!(list.height(), 160.0);
    assert_eq!(list.rows_count(), 5);
    assert_eq!(list.pages_count(), 10);
}

#[test]
fn gaps_and_padding_shape_the_content() {
    let options = ListOptions::default()
        .with_vertical_gap(8.0)
        .with_content_padding(10.0);
    let (list, _data) = list_with(options, 3);

    assert_eq!(list.scroll_pane().content_size(), Size::new(80.0, 112.0));
    assert_eq!(list.list_origin(), Point::new(10.0, 10.0));
    assert_eq!(list.core().node.mask, Some(Rect::new(10.0, 10.0, 80.0, 80.0)));
    let second = list.renderer_for_index(1).unwrap();
    assert_eq!(second.core().node.y, 40.0);
    assert_eq!(second.width(), 80.0);
}

#[test]
fn scroll_to_selected_brings_the_selection_to_the_top() {
    let (mut list, _data) = list_with(ListOptions::default().with_selectable(true), 50);
    list.set_selected_index(Some(20));
    list.scroll_to_selected();
    assert_eq!(list.vertical_scroll_position(), 640.0);
    assert_eq!(list.visible_window().start_index, 20);

    list.scroll_by(-10.0, 0.0);
    assert_eq!(list.vertical_scroll_position(), 630.0);
}

#[test]
fn list_state_round_trips_between_lists() {
    let options = ListOptions::default()
        .with_selectable(true)
        .with_allow_multiple_selection(true);
    let (mut source, _data) = list_with(options, 50);
    source.set_selected_indices([3, 9]);
    source.set_vertical_scroll_position(200.0);
    let state = source.list_state();
    assert_eq!(state.scroll, ScrollPosition::new(200.0, 0.0));
    assert_eq!(state.selected_indices, vec![3, 9]);

    let (mut restored, _other) = list_with(options, 50);
    restored.restore_list_state(&state);
    assert_eq!(restored.selected_indices(), vec![3, 9]);
    assert_eq!(restored.visible_window(), source.visible_window());
}

fn tile_options() -> ListOptions {
    ListOptions::default()
        .with_size(200.0, 100.0)
        .with_column_width(50.0)
        .with_row_height(50.0)
}

#[test]
fn tile_list_fills_rows_of_columns() {
    let mut tiles = TileList::<u32>::new(tile_options()).with_data_provider(provider(20));
    tiles.validate_now();

    assert_eq!(tiles.columns_count(), 4);
    assert_eq!(tiles.rows_count(), 2);
    assert_eq!(
        tiles.visible_window(),
        VisibleWindow {
            start_index: 0,
            end_index: 16
        }
    );
    assert_eq!(tiles.scroll_pane().content_size(), Size::new(200.0, 250.0));

    let tile = tiles.renderer_for_index(5).unwrap();
    assert_eq!(tile.core().node.position(), Point::new(50.0, 50.0));
    assert_eq!((tile.width(), tile.height()), (50.0, 50.0));

    tiles.scroll_to_index(9);
    assert_eq!(tiles.vertical_scroll_position(), 100.0);
    assert_eq!(tiles.visible_window().start_index, 8);
    assert_eq!(tiles.visible_window().end_index, 20);

    tiles.set_columns_count(3);
    assert_eq!(tiles.width(), 150.0);
    tiles.validate_now();
    assert_eq!(tiles.columns_count(), 3);
}

#[test]
fn horizontal_tile_list_fills_columns_of_rows() {
    let options = tile_options()
        .with_size(100.0, 200.0)
        .with_direction(Direction::Horizontal);
    let mut tiles = TileList::<u32>::new(options).with_data_provider(provider(20));
    tiles.validate_now();

    assert_eq!(tiles.rows_count(), 4);
    assert_eq!(tiles.columns_count(), 2);
    assert_eq!(tiles.visible_window().end_index, 16);
    assert_eq!(tiles.scroll_pane().content_size(), Size::new(250.0, 200.0));
    assert_eq!(
        tiles.renderer_for_index(5).unwrap().core().node.position(),
        Point::new(50.0, 50.0)
    );

    tiles.set_horizontal_scroll_position(60.0);
    assert_eq!(tiles.visible_window().start_index, 4);
    assert_eq!(tiles.list_origin(), Point::new(-10.0, 0.0));

    tiles.scroll_to_index(12);
    assert_eq!(tiles.horizontal_scroll_position(), 150.0);
}

#[test]
fn negative_scroll_positions_clamp_to_zero() {
    let (mut list, _data) = list_with(ListOptions::default(), 50);
    list.set_vertical_scroll_position(640.0);
    assert_eq!(list.vertical_scroll_position(), 640.0);

    list.set_vertical_scroll_position(-5.0);
    assert_eq!(list.vertical_scroll_position(), 0.0);
    assert_eq!(list.visible_window().start_index, 0);

    let options = tile_options()
        .with_size(100.0, 200.0)
        .with_direction(Direction::Horizontal);
    let mut tiles = TileList::<u32>::new(options).with_data_provider(provider(20));
    tiles.validate_now();
    tiles.set_horizontal_scroll_position(100.0);
    assert_eq!(tiles.horizontal_scroll_position(), 100.0);

    tiles.set_horizontal_scroll_position(-20.0);
    assert_eq!(tiles.horizontal_scroll_position(), 0.0);

    tiles.scroll_to(ScrollPosition::new(-10.0, -3.0));
    assert_eq!(tiles.scroll_position(), ScrollPosition::new(0.0, 0.0));
    assert_eq!(tiles.list_origin(), Point::ZERO);
}

#[test]
fn degenerate_row_height_still_produces_a_window() {
    let options = ListOptions::default().with_row_height(0.0);
    let (list, _data) = list_with(options, 500);
    let window = list.visible_window();
    assert_eq!(window.start_index, 0);
    assert!(window.end_index > 0);
}

#[test]
fn tiny_line_extents_saturate_instead_of_overflowing() {
    let options = ListOptions::default().with_row_height(1e-30);
    let (list, _data) = list_with(options, 10);
    assert_eq!(
        list.visible_window(),
        VisibleWindow {
            start_index: 0,
            end_index: 10
        }
    );

    let options = ListOptions::default()
        .with_row_height(1e-30)
        .with_column_width(1e-30);
    let mut tiles = TileList::<u32>::new(options).with_data_provider(provider(10));
    tiles.validate_now();
    assert_eq!(
        tiles.visible_window(),
        VisibleWindow {
            start_index: 0,
            end_index: 10
        }
    );
    assert_eq!(tiles.active_renderers().count(), 10);
}

#[test]
fn hbox_sizes_to_its_children() {
    let mut hbox = HBox::new();
    hbox.set_horizontal_gap(10.0);
    hbox.add_child(Box::new(Container::with_size(50.0, 20.0)));
    hbox.add_child(Box::new(Container::with_size(30.0, 40.0)));
    hbox.validate_now();

    assert_eq!((hbox.width(), hbox.height()), (90.0, 40.0));
    assert_eq!(hbox.content_size(), Size::new(90.0, 40.0));
    let first = hbox.child_at(0).unwrap().core().node.position();
    let second = hbox.child_at(1).unwrap().core().node.position();
    assert_eq!(first, Point::new(0.0, 10.0));
    assert_eq!(second, Point::new(60.0, 0.0));

    hbox.set_margins(5.0, 5.0, 2.0, 2.0);
    hbox.validate_now();
    assert_eq!((hbox.width(), hbox.height()), (100.0, 44.0));
    assert_eq!(hbox.child_at(0).unwrap().core().node.x, 5.0);
}

#[test]
fn hbox_relayouts_when_a_child_resizes() {
    let mut hbox = HBox::new();
    hbox.add_child(Box::new(Container::with_size(50.0, 20.0)));
    hbox.add_child(Box::new(Container::with_size(30.0, 20.0)));
    hbox.validate_now();
    let resized = record_events(&hbox.core().node, EventType::Resize);

    hbox.child_at_mut(0).unwrap().resize(70.0, 20.0);
    assert!(hbox.is_invalid(DirtyFlags::SIZE));
    hbox.validate_now();
    assert_eq!(hbox.width(), 100.0);
    assert_eq!(hbox.child_at(1).unwrap().core().node.x, 70.0);
    assert_eq!(resized.borrow().len(), 1);

    let removed = hbox.remove_child_at(0).unwrap();
    hbox.validate_now();
    assert_eq!(hbox.width(), 30.0);
    assert_eq!(removed.core().node.emitter().listener_count(EventType::Resize), 0);
}

#[test]
fn vbox_aligns_children_across() {
    let mut vbox = VBox::new();
    vbox.set_settings(
        LayoutSettings::default()
            .with_gaps(0.0, 5.0)
            .with_h_align(HorizontalAlign::Right),
    );
    vbox.add_child(Box::new(Container::with_size(40.0, 10.0)));
    vbox.add_child(Box::new(Container::with_size(20.0, 10.0)));
    vbox.validate_now();

    assert_eq!((vbox.width(), vbox.height()), (40.0, 25.0));
    assert_eq!(
        vbox.child_at(1).unwrap().core().node.position(),
        Point::new(20.0, 15.0)
    );
}

#[test]
fn layout_builder_nests_boxes() {
    let mut tree = LayoutBuilder::new(Direction::Vertical)
        .with_v_gap(4.0)
        .add(Box::new(Container::with_size(40.0, 10.0)))
        .add_layout(
            LayoutBuilder::new(Direction::Horizontal)
                .with_h_gap(2.0)
                .add(Box::new(Container::with_size(10.0, 10.0)))
                .add(Box::new(Container::with_size(10.0, 10.0))),
        )
        .build();
    tree.validate_now();

    assert!(tree.is::<VBox>());
    assert_eq!((tree.width(), tree.height()), (40.0, 24.0));
    let row = tree.child_at(1).unwrap();
    assert!(row.is::<HBox>());
    assert_eq!((row.width(), row.height()), (22.0, 10.0));
    assert_eq!(row.core().node.position(), Point::new(0.0, 14.0));
}

#[test]
fn align_positions_on_each_requested_axis() {
    let child = Size::new(20.0, 10.0);
    let parent = Size::new(100.0, 50.0);

    let centered = layout::align(
        child,
        parent,
        Some(VerticalAlign::Center),
        Some(HorizontalAlign::Center),
        None,
    );
    assert_eq!(centered, Point::new(40.0, 20.0));

    let bottom_right = layout::align(
        child,
        parent,
        Some(VerticalAlign::Bottom),
        Some(HorizontalAlign::Right),
        Some(Point::new(-2.0, -3.0)),
    );
    assert_eq!(bottom_right, Point::new(78.0, 37.0));

    let vertical_only = layout::align(child, parent, Some(VerticalAlign::Bottom), None, None);
    assert_eq!(vertical_only, Point::new(0.0, 40.0));
}

#[test]
fn scale_fit_and_fill() {
    let area = Size::new(100.0, 100.0);
    let options = ScaleOptions::default();

    assert_eq!(
        scale::scale(Size::new(200.0, 100.0), area, ScaleMode::Fit, options),
        Size::new(100.0, 50.0)
    );
    assert_eq!(
        scale::scale(Size::new(50.0, 25.0), area, ScaleMode::Fill, options),
        Size::new(50.0, 25.0)
    );

    let enlarge = options.with_allow_enlarge(true);
    assert_eq!(
        scale::scale_to_fill(Size::new(50.0, 25.0), area, enlarge),
        Size::new(200.0, 100.0)
    );
    assert_eq!(
        scale::scale_to_fit(Size::new(3.0, 7.0), Size::new(10.0, 10.0), enlarge),
        Size::new(4.0, 10.0)
    );

    let exact = enlarge.with_snap_to_pixel(false);
    let fitted = scale::scale_to_fit(Size::new(3.0, 7.0), Size::new(10.0, 10.0), exact);
    assert_close(fitted.width, 30.0 / 7.0);

    let empty = Size::new(0.0, 10.0);
    assert_eq!(scale::scale_to_fit(empty, area, enlarge), empty);
}

#[test]
fn scale_component_and_ratios() {
    let mut image = Container::with_size(400.0, 200.0);
    image.validate_now();
    scale::scale_component(
        &mut image,
        Size::new(100.0, 100.0),
        ScaleMode::Fit,
        ScaleOptions::default(),
    );
    assert_eq!((image.width(), image.height()), (100.0, 50.0));
    assert!(image.is_invalid(DirtyFlags::SIZE));

    assert_eq!(scale::width_to_height_ratio(Size::new(4.0, 2.0)), 2.0);
    assert_eq!(scale::height_to_width_ratio(Size::new(4.0, 2.0)), 0.5);
    assert_eq!(scale::width_to_height_ratio(Size::new(4.0, 0.0)), 0.0);
}

#[test]
fn pane_fits_its_skin() {
    let mut pane = Pane::with_size(60.0, 30.0);
    pane.set_skin(Some(Box::new(Container::with_size(1.0, 1.0))));
    pane.validate_now();
    let skin = pane.skin().unwrap();
    assert_eq!((skin.width(), skin.height()), (60.0, 30.0));

    pane.resize(80.0, 30.0);
    pane.validate_now();
    assert_eq!(pane.skin().unwrap().width(), 80.0);

    let old = pane.set_skin(None);
    assert!(old.is_some());
    assert!(pane.is_invalid(DirtyFlags::SKIN));
}

#[test]
fn label_measures_and_aligns_text() {
    let mut label = Label::new("Hello");
    label.validate_now();
    assert_eq!(label.content_size().width, 35.0);
    assert_close(label.content_size().height, 16.8);
    assert_close(label.text_position().y, 3.6);
    assert_eq!(label.text_position().x, 0.0);

    label.set_h_align(HorizontalAlign::Right);
    label.validate_now();
    assert_eq!(label.text_position().x, 65.0);

    label.set_text("");
    label.validate_now();
    assert_eq!(label.content_size(), Size::ZERO);
}

#[test]
fn label_uses_the_disabled_style_when_disabled() {
    let disabled = theme::TextStyle::default().with_font_size(10.0);
    let mut label = Label::new("abcd");
    label.set_disabled_text_style(Some(disabled));
    label.validate_now();
    assert_eq!(label.content_size().width, 28.0);

    label.set_enabled(false);
    label.validate_now();
    assert_eq!(label.active_style().font_size, 10.0);
    assert_eq!(label.content_size().width, 20.0);
}

#[test]
fn label_rewraps_when_narrowed() {
    let mut label = Label::new("abcdefghij");
    label.set_word_wrap(true);
    label.validate_now();
    assert_eq!(label.content_size().width, 70.0);

    label.resize(35.0, 24.0);
    label.validate_now();
    assert_eq!(label.content_size().width, 35.0);
    assert_close(label.content_size().height, 2.0 * 16.8);
}

#[test]
fn button_centers_label_and_icon() {
    let mut button = Button::new("Go");
    button.validate_now();
    let label = button.label();
    assert_eq!((label.width(), label.height().round()), (14.0, 17.0));
    assert_eq!(label.core().node.x, 33.0);
    assert_close(label.core().node.y, 3.6);

    button.set_icon(Some(Box::new(Container::with_size(10.0, 10.0))));
    button.validate_now();
    let icon = button.icon().unwrap().core().node.position();
    assert_eq!(icon.x, 26.0);
    assert_close(icon.y, 7.0);
    assert_eq!(button.label().core().node.x, 40.0);

    button.set_icon_placement(Placement::Right);
    button.validate_now();
    assert_eq!(button.label().core().node.x, 26.0);
    assert_eq!(button.icon().unwrap().core().node.x, 44.0);
}

#[test]
fn button_swaps_skins_with_pointer_state() {
    let mut button = Button::new("Ok");
    button.set_state_skin(SkinState::Up, Some(Box::new(Container::new())));
    button.set_state_skin(SkinState::Over, Some(Box::new(Container::new())));
    button.validate_now();
    assert_eq!(button.shown_skin(), Some(SkinState::Up));

    button.handle_pointer(PointerEvent::new(EventType::PointerOver));
    button.validate_now();
    assert_eq!(button.shown_skin(), Some(SkinState::Over));

    button.handle_pointer(PointerEvent::new(EventType::PointerDown));
    button.validate_now();
    assert_eq!(button.shown_skin(), Some(SkinState::Up));

    button.handle_pointer(PointerEvent::at(EventType::PointerUp, Point::new(500.0, 5.0)));
    button.validate_now();
    assert_eq!(button.interaction().state, controls::PointerState::Up);

    button.set_enabled(false);
    button.validate_now();
    assert_eq!(button.shown_skin(), Some(SkinState::Up));
    assert!(!button.label().enabled());
}

#[test]
fn selectable_button_toggles_on_tap() {
    let mut button = Button::new("Toggle");
    button.set_selectable(true);
    let taps = record_events(&button.core().node, EventType::PointerTap);

    button.handle_pointer(PointerEvent::tap());
    assert!(button.selected());
    button.handle_pointer(PointerEvent::tap());
    assert!(!button.selected());
    assert_eq!(taps.borrow().len(), 2);

    button.set_enabled(false);
    button.handle_pointer(PointerEvent::tap());
    assert!(!button.selected());
    assert_eq!(taps.borrow().len(), 2);
}

#[test]
fn progress_bar_sizes_fill_to_completed_fraction() {
    let mut bar = controls::ProgressBar::new();
    bar.set_fill_skin(Some(Box::new(Container::new())));
    bar.set_bar_padding(2.0);
    bar.set_maximum(10.0);
    bar.set_value(5.0);
    bar.validate_now();

    assert_eq!(bar.percent_complete(), 0.5);
    let fill = bar.fill().unwrap();
    assert_eq!((fill.width(), fill.height()), (48.0, 12.0));
    assert_eq!(fill.core().node.position(), Point::new(2.0, 2.0));

    bar.set_direction(Placement::Left);
    bar.validate_now();
    assert_eq!(bar.fill().unwrap().core().node.position(), Point::new(50.0, 2.0));

    bar.set_direction(Placement::Up);
    bar.set_value(20.0);
    bar.validate_now();
    assert_eq!(bar.percent_complete(), 1.0);
    let fill = bar.fill().unwrap();
    assert_eq!((fill.width(), fill.height()), (96.0, 12.0));
    assert_eq!(fill.core().node.position(), Point::new(2.0, 2.0));

    bar.set_minimum(10.0);
    assert_eq!(bar.percent_complete(), 0.0);
}

#[test]
fn progress_bar_caption_prefers_emitter_then_text() {
    let mut bar = controls::ProgressBar::new();
    bar.set_maximum(10.0);
    bar.set_value(3.5);
    bar.validate_now();
    assert!(!bar.label().core().node.visible);

    bar.set_display_text(true);
    bar.validate_now();
    assert!(bar.label().core().node.visible);
    assert_eq!(bar.label().text(), "3 / 10");

    bar.set_text(Some("loading".to_owned()));
    bar.validate_now();
    assert_eq!(bar.label().text(), "loading");

    bar.set_text_emitter(|min, max, value| format!("{:.0}%", (value - min) / (max - min) * 100.0));
    bar.validate_now();
    assert_eq!(bar.label().text(), "35%");

    bar.clear_text_emitter();
    bar.validate_now();
    assert_eq!(bar.label().text(), "loading");
}

#[test]
fn renderer_skins_follow_selection() {
    let mut renderer = LabelItemRenderer::<u32>::new();
    renderer.set_state_skin(SkinState::Up, Some(Box::new(Container::new())));
    renderer.set_state_skin(SkinState::SelectedUp, Some(Box::new(Container::new())));
    renderer.set_data(Some(Rc::new(3)));
    renderer.validate_now();
    assert_eq!(renderer.shown_skin(), Some(SkinState::Up));
    assert_eq!(renderer.label().text(), "");

    renderer.set_selected(true);
    renderer.validate_now();
    assert_eq!(renderer.shown_skin(), Some(SkinState::SelectedUp));

    renderer.handle_pointer(PointerEvent::new(EventType::PointerOver));
    renderer.validate_now();
    assert_eq!(renderer.shown_skin(), Some(SkinState::SelectedUp));
}

#[test]
fn theme_is_picked_up_at_construction() {
    let previous = theme::Theme::current();
    theme::Theme::set_current(
        previous
            .clone()
            .with_text_style(theme::TextStyle::default().with_font_size(20.0)),
    );
    let mut label = Label::new("ab");
    theme::Theme::set_current(previous);

    label.validate_now();
    assert_eq!(label.content_size().width, 20.0);
    assert_eq!(Label::new("ab").text_style().font_size, 14.0);
}
