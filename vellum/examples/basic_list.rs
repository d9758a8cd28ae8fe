// Example: a virtualized list over 10,000 items that recycles a handful of renderers.
use vellum::{
    ChangeKind, Component, DataProvider, List, ListOptions, Scrollable, TileList,
};

fn main() {
    let data = DataProvider::from_values((0..10_000).map(|i| format!("item {i}")));
    let mut list = List::new(
        ListOptions::new()
            .with_size(240.0, 160.0)
            .with_row_height(32.0)
            .with_selectable(true),
    )
    .with_data_provider(data.clone());

    data.subscribe(|change| {
        if change.kind != ChangeKind::Invalidate {
            println!("data changed: {change:?}");
        }
    });

    list.validate_now();
    println!(
        "window={:?} renderers={}",
        list.visible_window(),
        list.renderers_constructed()
    );

    list.scroll_to_index(5_000);
    list.set_selected_index(Some(5_001));
    list.validate_now();
    for renderer in list.active_renderers() {
        let position = renderer.core().node.position();
        println!(
            "index={:?} y={} selected={}",
            renderer.index(),
            position.y,
            renderer.selected()
        );
    }
    println!("renderers after scrolling={}", list.renderers_constructed());

    // Inserting above the selection shifts it instead of dropping it.
    list.add_item_at("inserted".to_owned(), 0).ok();
    println!("selected after insert={:?}", list.selected_index());

    let state = list.list_state();
    println!("state={state:?}");

    let mut tiles = TileList::new(
        ListOptions::new()
            .with_size(200.0, 100.0)
            .with_column_width(50.0)
            .with_row_height(50.0),
    )
    .with_data_provider(DataProvider::from_values(0..100_u32));
    tiles.validate_now();
    println!(
        "tiles: columns={} pages={} window={:?}",
        tiles.columns_count(),
        tiles.pages_count(),
        tiles.visible_window()
    );
}
