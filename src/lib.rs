//! Parlour
//!
//! An interactive furnished room rendered with wgpu. Clicking a piece of
//! furniture opens or closes it; the object under the cursor is found by
//! drawing every object in a unique flat colour off-screen and reading back
//! the pixel under the click.

pub mod app;
pub mod config;
pub mod gfx;
pub mod performance;
pub mod picking;
pub mod prelude;
pub mod room;
pub mod ui;
pub mod wgpu_utils;

pub use app::ParlourApp;

/// Creates the windowed app from `PARLOUR_*` environment settings
pub fn default() -> anyhow::Result<ParlourApp> {
    ParlourApp::new(config::RoomConfig::from_env()?)
}
