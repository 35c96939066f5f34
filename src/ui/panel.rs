//! The room panel
//!
//! Lists every object with its pick id and animation state, offers a toggle
//! per object that bypasses the picker, and shows how the last click
//! resolved.

use crate::performance::FrameStats;
use crate::picking::{PickOutcome, Pickable};
use crate::room::{Direction, Room};

pub fn room_panel(ui: &imgui::Ui, room: &mut Room, stats: &FrameStats) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.28).clamp(320.0, 440.0);

    ui.window("Room")
        .size([panel_width, 0.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_object_table(ui, room);
            ui.separator();
            render_last_pick(ui, room);
            ui.separator();
            stats.render_section(ui);
            ui.separator();
            ui.text_disabled("Click furniture to open or close it.");
            ui.text_disabled("Drag to orbit, Shift+drag to pan, Shift+C to reset.");
        });
}

fn render_object_table(ui: &imgui::Ui, room: &mut Room) {
    let mut toggled = None;

    if let Some(_table) = ui.begin_table("objects", 4) {
        ui.table_setup_column("Object");
        ui.table_setup_column("Id");
        ui.table_setup_column("State");
        ui.table_setup_column("");
        ui.table_headers_row();

        for object in room.objects() {
            let id = object.pick_id();
            ui.table_next_row();

            ui.table_next_column();
            ui.text(object.name());
            if ui.is_item_hovered() {
                ui.tooltip_text(object.furniture().kind_name());
            }

            ui.table_next_column();
            ui.text(format!("{}", id.get()));

            ui.table_next_column();
            imgui::ProgressBar::new(object.progress())
                .size([-1.0, 0.0])
                .overlay_text(state_label(object.direction(), object.animation().is_at_rest()))
                .build(ui);

            ui.table_next_column();
            let _id_token = ui.push_id_usize(id.get() as usize);
            if ui.small_button("Toggle") {
                toggled = Some(id);
            }
        }
    }

    if let Some(id) = toggled {
        if room.interact_with(id).is_some() {
            log::debug!("{} toggled from the panel", id);
        }
    }
}

fn render_last_pick(ui: &imgui::Ui, room: &Room) {
    match room.last_outcome() {
        PickOutcome::NoClick => {}
        PickOutcome::OutOfBounds => ui.text("Last click: off the surface"),
        PickOutcome::Missed(id) => ui.text(format!("Last click: nothing ({})", id)),
        PickOutcome::Hit { id, .. } => ui.text(format!("Last click: {}", id)),
        PickOutcome::Failed => ui.text_colored([1.0, 0.4, 0.4, 1.0], "Last click: failed"),
    }

    match room.last_hit() {
        Some(object) => ui.text(format!(
            "Last hit: {} [{}]",
            object.name(),
            object.pick_id()
        )),
        None => ui.text_disabled("Nothing picked yet"),
    }
}

fn state_label(direction: Direction, at_rest: bool) -> &'static str {
    match (direction, at_rest) {
        (Direction::Opening, true) => "open",
        (Direction::Opening, false) => "opening",
        (Direction::Closing, true) => "closed",
        (Direction::Closing, false) => "closing",
    }
}
