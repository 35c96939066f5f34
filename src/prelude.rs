//! # Parlour prelude
//!
//! ```no_run
//! use parlour::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = RoomConfig::default().with_animation_frames(30);
//!     ParlourApp::new(config)?.run()
//! }
//! ```

pub use crate::app::ParlourApp;
pub use crate::config::RoomConfig;
pub use crate::default;

pub use crate::gfx::{BackendError, RenderBackend, RenderEngine, SoftwareRenderer};
pub use crate::gfx::camera::CameraManager;
pub use crate::gfx::resources::{Light, Material};

pub use crate::picking::{IdColor, ObjectId, PickOutcome, Pickable};

pub use crate::room::{Animation, Direction, Furniture, Room, RoomObject};

pub use crate::performance::{FrameMetrics, FrameStats};

pub use cgmath::{Matrix4, Point3, Vector3};
pub use imgui::Ui;
