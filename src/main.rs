use anyhow::{bail, Context};
use cgmath::{Point3, Transform};

use parlour::config::RoomConfig;
use parlour::gfx::SoftwareRenderer;
use parlour::performance::FrameStats;
use parlour::picking::{PickOutcome, Pickable};
use parlour::room::Room;
use parlour::ParlourApp;

/// Frames between two scripted clicks in headless mode
const CLICK_INTERVAL: u64 = 8;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RoomConfig::from_env().context("Invalid configuration")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => ParlourApp::new(config)?.run(),
        [flag, frames] if flag == "--headless" => {
            let frames: u64 = frames
                .parse()
                .with_context(|| format!("--headless expects a frame count, got {:?}", frames))?;
            run_headless(config, frames)
        }
        _ => bail!("usage: parlour [--headless FRAMES]"),
    }
}

/// Renders `frames` frames on the CPU, clicking each object in turn
fn run_headless(config: RoomConfig, frames: u64) -> anyhow::Result<()> {
    let (width, height) = config.window_size;
    let mut room = Room::furnished(&config).context("Failed to number the room's objects")?;
    let mut renderer = SoftwareRenderer::new(width, height);
    let mut stats = FrameStats::new();
    log::info!("Headless run: {} frames at {}x{}", frames, width, height);

    for frame in 0..frames {
        if frame > 0 && frame % CLICK_INTERVAL == 0 {
            let target = ((frame / CLICK_INTERVAL - 1) as usize) % room.objects().len();
            if let Some((x, y)) = aim_at(&room, &renderer, target) {
                log::info!(
                    "Clicking {} at ({:.0}, {:.0})",
                    room.objects()[target].name(),
                    x,
                    y
                );
                room.capture_click(x, y, (width, height));
            }
        }

        stats.begin_frame();
        let result = room.render_frame(&mut renderer);
        stats.record_pick(&room.last_outcome());
        match result {
            Ok(PickOutcome::Hit { id, index }) => {
                log::info!("  hit {} ({})", room.objects()[index].name(), id)
            }
            Ok(PickOutcome::Missed(id)) => log::info!("  missed ({})", id),
            Ok(PickOutcome::OutOfBounds) => log::info!("  off the surface"),
            Ok(PickOutcome::NoClick | PickOutcome::Failed) => {}
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => log::warn!("Frame {} skipped: {}", frame, err),
        }
        stats.end_frame();
    }

    let picks = stats.picks();
    log::info!(
        "{} frames, {:.2}ms avg; {} readbacks, {} dispatches, {} misses",
        stats.frames(),
        stats.metrics().frame_time_ms,
        picks.readbacks,
        picks.dispatches,
        picks.misses
    );
    for object in room.objects() {
        log::info!(
            "  {:<14} {:>6}  {:?} {:.2}",
            object.name(),
            object.pick_id().to_string(),
            object.direction(),
            object.progress()
        );
    }
    Ok(())
}

/// Screen position of the centre of an object's first part
fn aim_at(room: &Room, renderer: &SoftwareRenderer, index: usize) -> Option<(f64, f64)> {
    let part = room.objects().get(index)?.parts().first()?;
    renderer.to_screen(part.transform.transform_point(Point3::new(0.0, 0.0, 0.0)))
}
