use vellum::{Component, EventType, Pane};
use vellum_adapter::{PopupManager, ShowOptions};

fn dialog(name: &'static str, width: f32, height: f32) -> Box<dyn Component> {
    let pane = Pane::with_size(width, height);
    pane.core.node.on(EventType::FocusIn, move |_| println!("{name}: focus in"));
    pane.core.node.on(EventType::FocusOut, move |_| println!("{name}: focus out"));
    Box::new(pane)
}

fn run_until_idle(manager: &mut PopupManager, now_ms: &mut u64) {
    while manager.tick(*now_ms) {
        *now_ms += 16;
    }
}

fn main() {
    // Example: a confirmation dialog stacked over a settings dialog.
    let mut manager = PopupManager::new(800.0, 600.0);
    let mut now_ms = 0u64;

    let settings = manager.show(dialog("settings", 400.0, 300.0), ShowOptions::default(), now_ms);
    run_until_idle(&mut manager, &mut now_ms);

    let confirm = manager.show(dialog("confirm", 200.0, 100.0), ShowOptions::default(), now_ms);
    println!("suspended={:?} active={:?}", manager.suspended(), manager.active());
    run_until_idle(&mut manager, &mut now_ms);

    manager.hide_with(confirm, true, now_ms, |_| println!("confirm: closed"));
    run_until_idle(&mut manager, &mut now_ms);
    println!(
        "active={:?} (settings={settings:?}) layer children={}",
        manager.active(),
        manager.num_children()
    );

    manager.hide_with(settings, false, now_ms, |popup| {
        println!("settings: detached, kept={}", popup.is_some());
    });
    run_until_idle(&mut manager, &mut now_ms);
    println!("done at t={now_ms} popups={}", manager.popup_count());
}
