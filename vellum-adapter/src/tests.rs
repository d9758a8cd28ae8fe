use crate::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vellum::{
    Component, DataProvider, EventType, List, ListOptions, Node, NodeId, Pane, ScrollPosition,
    Scrollable,
};

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

fn record_focus(node: &Node) -> Rc<RefCell<Vec<EventType>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventType::FocusIn, EventType::FocusOut] {
        let sink = Rc::clone(&log);
        node.on(kind, move |event| sink.borrow_mut().push(event.kind));
    }
    log
}

fn popup(width: f32, height: f32) -> Box<dyn Component> {
    Box::new(Pane::with_size(width, height))
}

fn alpha(manager: &PopupManager, id: NodeId) -> f32 {
    manager
        .popup(id)
        .map_or(f32::NAN, |c| c.core().node.alpha)
}

#[test]
fn tween_samples_clamp_to_the_end_value() {
    let tween = Tween::new(0.0, 100.0, 0, 100, Easing::Linear);
    assert_close(tween.sample(0), 0.0);
    assert_close(tween.sample(50), 50.0);
    assert_close(tween.sample(150), 100.0);
    assert!(!tween.is_done(99));
    assert!(tween.is_done(100));

    let eased = Tween::new(0.0, 100.0, 0, 100, Easing::InQuad);
    assert_close(eased.sample(50), 25.0);
    let out = Tween::new(0.0, 100.0, 0, 100, Easing::OutQuad);
    assert_close(out.sample(50), 75.0);

    assert_eq!(Tween::new(1.0, 2.0, 5, 0, Easing::Linear).duration_ms, 1);
}

#[test]
fn tween_retarget_starts_from_the_current_value() {
    let mut tween = Tween::new(0.0, 100.0, 0, 100, Easing::Linear);
    tween.retarget(50, 0.0, 100);
    assert_close(tween.from, 50.0);
    assert_eq!(tween.start_ms, 50);
    assert_close(tween.sample(100), 25.0);
}

#[test]
fn easings_fix_both_ends() {
    for easing in [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::SmoothStep,
        Easing::EaseInOutCubic,
    ] {
        assert_close(easing.sample(0.0), 0.0);
        assert_close(easing.sample(1.0), 1.0);
    }
}

#[test]
fn scheduler_keeps_one_tween_per_node_and_property() {
    let node = Node::new();
    let id = node.id();
    let mut tweens = TweenScheduler::new();

    assert!(!tweens.start(id, TweenProperty::Alpha, Tween::new(0.0, 1.0, 0, 100, Easing::Linear)));
    assert!(tweens.start(id, TweenProperty::Alpha, Tween::new(1.0, 0.0, 0, 100, Easing::Linear)));
    assert!(!tweens.start(id, TweenProperty::X, Tween::new(0.0, 10.0, 0, 200, Easing::Linear)));
    assert_eq!(tweens.len(), 2);
    assert_close(
        tweens
            .get(id, TweenProperty::Alpha)
            .map_or(f32::NAN, |t| t.from),
        1.0,
    );

    let samples = tweens.tick(100);
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].property, TweenProperty::Alpha);
    assert!(samples[0].done);
    assert_close(samples[0].value, 0.0);
    assert!(!samples[1].done);
    assert_close(samples[1].value, 5.0);
    assert_eq!(tweens.len(), 1);
    assert!(tweens.is_running(id, TweenProperty::X));
    assert!(!tweens.is_running(id, TweenProperty::Alpha));

    let samples = tweens.tick(300);
    assert!(samples[0].done);
    assert_close(samples[0].value, 10.0);
    assert!(tweens.is_empty());
    assert!(tweens.tick(400).is_empty());
}

#[test]
fn scheduler_cancels_per_key_and_per_node() {
    let a = Node::new().id();
    let b = Node::new().id();
    let mut tweens = TweenScheduler::new();
    let tween = Tween::new(0.0, 1.0, 0, 100, Easing::Linear);
    tweens.start(a, TweenProperty::Alpha, tween);
    tweens.start(a, TweenProperty::Y, tween);
    tweens.start(b, TweenProperty::Alpha, tween);

    assert!(tweens.cancel(b, TweenProperty::Alpha));
    assert!(!tweens.cancel(b, TweenProperty::Alpha));
    assert!(tweens.is_node_running(a));
    assert_eq!(tweens.cancel_node(a), 2);
    assert!(tweens.is_empty());
}

#[test]
fn tween_properties_write_node_state() {
    let mut node = Node::new();
    assert!(TweenProperty::Alpha.apply(&mut node, 1.5));
    assert!(TweenProperty::X.apply(&mut node, 12.0));
    assert!(TweenProperty::Y.apply(&mut node, -4.0));
    assert!(!TweenProperty::ScrollVertical.apply(&mut node, 99.0));
    assert_close(node.alpha, 1.0);
    assert_close(node.x, 12.0);
    assert_close(node.y, -4.0);
}

fn scroll_list() -> ScrollController<List<u32>> {
    // 50 rows of 32 in a 100x100 viewport: content 1600, max scroll 1500.
    let mut list = List::new(ListOptions::default())
        .with_data_provider(DataProvider::from_values(0..50_u32));
    list.validate_now();
    ScrollController::new(list)
}

#[test]
fn controller_tween_drives_the_list() {
    let mut c = scroll_list();
    let to = c.start_tween_to_index(10, 0, 100, Easing::SmoothStep);
    assert_eq!(to, ScrollPosition::new(320.0, 0.0));
    assert!(c.is_animating());

    let mut last = 0.0;
    for now_ms in [0_u64, 10, 20, 40, 80, 100] {
        let position = c.tick(now_ms).map_or(f32::NAN, |p| p.vertical);
        assert!(position >= last);
        last = position;
    }
    assert!(!c.is_animating());
    assert_eq!(c.tick(120), None);
    assert_close(c.target().vertical_scroll_position(), 320.0);
    assert_eq!(c.target().visible_window().start_index, 10);
}

#[test]
fn controller_clamps_targets() {
    let mut c = scroll_list();
    let to = c.start_tween_to_position(ScrollPosition::new(5000.0, 40.0), 0, 50, Easing::Linear);
    assert_eq!(to, ScrollPosition::new(1500.0, 0.0));
    assert_eq!(c.tick(50), Some(to));

    assert_eq!(c.scroll_to_index(2), ScrollPosition::new(64.0, 0.0));
    assert_eq!(
        c.start_tween_to_page(2, 100, 100, Easing::Linear),
        ScrollPosition::new(256.0, 0.0)
    );
}

#[test]
fn user_scroll_cancels_the_tween() {
    let mut c = scroll_list();
    c.start_tween_to_page(2, 0, 100, Easing::Linear);
    assert!(c.tick(50).is_some());

    c.on_scroll(ScrollPosition::new(64.0, 0.0));
    assert!(!c.is_animating());
    assert_eq!(c.tick(60), None);
    assert_close(c.into_target().vertical_scroll_position(), 64.0);
}

#[test]
fn modal_popup_fades_and_slides_in() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let p = popup(100.0, 50.0);
    let focus = record_focus(&p.core().node);
    let id = manager.show(p, ShowOptions::default(), 0);

    assert_eq!(manager.active(), Some(id));
    assert_eq!(manager.num_children(), 2);
    let overlay = manager.overlay_of(id).unwrap_or(id);
    assert_ne!(overlay, id);
    let overlay_view = manager.popup(overlay).map(|o| (o.width(), o.height()));
    assert_eq!(overlay_view, Some((400.0, 300.0)));
    assert_eq!(&*focus.borrow(), &[EventType::FocusIn]);

    let view = manager.popup(id).map(|p| p.core().node.position());
    assert_eq!(view.map(|p| (p.x, p.y)), Some((150.0, 145.0)));
    assert_close(alpha(&manager, id), 0.0);

    assert!(manager.tick(100));
    assert_close(alpha(&manager, overlay), 1.0);
    assert_close(alpha(&manager, id), 0.16);
    let y = manager.popup(id).map_or(f32::NAN, |p| p.core().node.y);
    assert_close(y, 141.8);

    manager.tick(250);
    assert_close(alpha(&manager, id), 1.0);
    let y = manager.popup(id).map_or(f32::NAN, |p| p.core().node.y);
    assert_close(y, 125.0);
    assert!(!manager.is_animating());
    assert!(!manager.tick(300));
}

#[test]
fn modal_popups_stack_and_reactivate() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let first = popup(100.0, 50.0);
    let first_focus = record_focus(&first.core().node);
    let first = manager.show(first, ShowOptions::default(), 0);
    manager.tick(250);

    let second = popup(80.0, 40.0);
    let second_focus = record_focus(&second.core().node);
    let second = manager.show(second, ShowOptions::default(), 300);
    assert_eq!(manager.active(), Some(second));
    assert_eq!(manager.suspended(), &[first]);
    assert_eq!(
        &*first_focus.borrow(),
        &[EventType::FocusIn, EventType::FocusOut]
    );

    manager.tick(550);
    let first_view = manager.popup(first).map(|p| p.core().node.visible);
    assert_eq!(first_view, Some(false));
    assert_close(alpha(&manager, first), 0.0);

    let done = Rc::new(Cell::new(0));
    let sink = Rc::clone(&done);
    assert!(manager.hide_with(second, true, 600, move |popup| {
        assert!(popup.is_none());
        sink.set(sink.get() + 1);
    }));
    assert!(!manager.hide(second, true, 610));

    manager.tick(700);
    assert_close(alpha(&manager, second), 0.84);
    assert_eq!(done.get(), 0);

    manager.tick(850);
    assert_eq!(done.get(), 1);
    assert!(!manager.contains_popup(second));
    assert_eq!(manager.active(), Some(first));
    assert!(manager.suspended().is_empty());
    assert_eq!(manager.num_children(), 2);
    assert_eq!(
        &*second_focus.borrow(),
        &[EventType::FocusIn]
    );
    assert_eq!(
        &*first_focus.borrow(),
        &[EventType::FocusIn, EventType::FocusOut, EventType::FocusIn]
    );

    manager.tick(1100);
    assert_close(alpha(&manager, first), 1.0);
    let first_view = manager.popup(first).map(|p| p.core().node.visible);
    assert_eq!(first_view, Some(true));
}

#[test]
fn hidden_popup_is_handed_back_when_not_destroyed() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let mut p = popup(100.0, 50.0);
    p.move_to(10.0, 20.0);
    let options = ShowOptions::new().with_modal(false).with_centered(false);
    let id = manager.show(p, options, 0);
    assert_eq!(manager.num_children(), 1);
    assert_eq!(manager.overlay_of(id), None);

    let back: Rc<RefCell<Option<Box<dyn Component>>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&back);
    manager.hide_with(id, false, 100, move |popup| *sink.borrow_mut() = popup);
    manager.tick(350);

    assert_eq!(manager.popup_count(), 0);
    assert_eq!(manager.num_children(), 0);
    assert_eq!(manager.active(), None);
    let back = back.borrow();
    let Some(popup) = back.as_ref() else {
        panic!("popup was not handed back");
    };
    assert_eq!(popup.id(), id);
    assert!(!popup.is_destroyed());
    assert_close(popup.core().node.alpha, 1.0);
    assert_close(popup.core().node.y, 20.0);
}

#[test]
fn hiding_a_suspended_popup_detaches_it_at_once() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let first = manager.show(popup(100.0, 50.0), ShowOptions::default(), 0);
    let second = manager.show(popup(100.0, 50.0), ShowOptions::default(), 10);
    assert_eq!(manager.num_children(), 4);

    assert!(manager.hide(first, true, 20));
    assert!(!manager.contains_popup(first));
    assert!(manager.suspended().is_empty());
    assert_eq!(manager.num_children(), 2);
    assert_eq!(manager.active(), Some(second));

    manager.hide(second, true, 30);
    manager.tick(300);
    assert_eq!(manager.active(), None);
    assert_eq!(manager.num_children(), 0);
    assert!(!manager.is_animating());
}

#[test]
fn modeless_popup_is_not_suspended() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let modeless = ShowOptions::new().with_modal(false);
    let first = manager.show(popup(100.0, 50.0), modeless, 0);
    let second = manager.show(popup(100.0, 50.0), ShowOptions::default(), 0);

    assert!(manager.suspended().is_empty());
    assert_eq!(manager.active(), Some(second));
    manager.tick(250);
    assert_close(alpha(&manager, first), 1.0);
}

#[test]
fn hide_replaces_a_running_entrance() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let id = manager.show(popup(100.0, 50.0), ShowOptions::default(), 0);
    manager.tick(100);
    assert!(manager.hide(id, true, 100));

    manager.tick(250);
    assert!(manager.contains_popup(id));
    let y = manager.popup(id).map_or(f32::NAN, |p| p.core().node.y);
    assert_close(y, 125.0);

    manager.tick(350);
    assert!(!manager.contains_popup(id));
    assert!(!manager.hide(id, true, 400));
}

#[test]
fn popup_offsets_and_stage_resize() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let options = ShowOptions::new().with_offset(5.0, -10.0);
    let id = manager.show(popup(100.0, 50.0), options, 0);
    manager.tick(250);
    let position = manager.popup(id).map(|p| p.core().node.position());
    assert_eq!(position.map(|p| (p.x, p.y)), Some((155.0, 115.0)));

    manager.resize_stage(800.0, 600.0);
    let overlay = manager.overlay_of(id).and_then(|o| manager.popup(o));
    assert_eq!(overlay.map(|o| (o.width(), o.height())), Some((800.0, 600.0)));
    assert_eq!(manager.stage_size().width, 800.0);
}

#[test]
fn custom_overlay_factory_is_used() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let built = Rc::new(Cell::new(0));
    let counter = Rc::clone(&built);
    manager.set_overlay_factory(move || {
        counter.set(counter.get() + 1);
        Box::new(Pane::new())
    });
    manager.show(popup(10.0, 10.0), ShowOptions::default(), 0);
    manager.show(popup(10.0, 10.0), ShowOptions::new().with_modal(false), 0);
    assert_eq!(built.get(), 1);
}

#[test]
fn destroying_the_manager_cancels_transitions() {
    let mut manager = PopupManager::new(400.0, 300.0);
    let id = manager.show(popup(100.0, 50.0), ShowOptions::default(), 0);
    let fired = Rc::new(Cell::new(false));
    let sink = Rc::clone(&fired);
    manager.hide_with(id, false, 10, move |_| sink.set(true));

    manager.destroy();
    assert!(manager.is_destroyed());
    assert_eq!(manager.popup_count(), 0);
    assert!(!manager.is_animating());
    assert!(!manager.tick(500));
    assert!(!fired.get());
}
