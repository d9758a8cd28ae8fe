use vellum::{DataProvider, List, ListOptions};
use vellum_adapter::{Easing, ScrollController};

fn main() {
    // Example: animated scrolling with a host-provided clock.
    //
    // A host would:
    // - start a tween (e.g. in response to a "scroll to index" command)
    // - call tick(now_ms) every frame while animating
    // - draw the list's active renderers after each tick
    let list = List::new(ListOptions::new().with_size(320.0, 200.0).with_row_height(24.0))
        .with_data_provider(DataProvider::from_values(0..10_000_u32));
    let mut c = ScrollController::new(list);

    let target = c.start_tween_to_index(2_000, 0, 240, Easing::SmoothStep);
    println!("target={target:?}");

    let mut now_ms = 0u64;
    while let Some(position) = c.tick(now_ms) {
        if now_ms % 80 == 0 {
            println!(
                "t={now_ms} offset={} window={:?}",
                position.vertical,
                c.target().visible_window()
            );
        }
        now_ms += 16;
    }

    println!(
        "done: window={:?} renderers={}",
        c.target().visible_window(),
        c.target().renderers_constructed()
    );
}
