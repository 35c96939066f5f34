//! # User interface
//!
//! Dear ImGui overlay for the room window.
//!
//! - [`UiManager`] wires imgui to winit and wgpu and reports whether imgui
//!   wants the pointer, in which case clicks are kept away from the picker.
//! - [`room_panel`] lists the furniture with ids and animation state, and
//!   shows the last pick and frame statistics.

pub mod manager;
pub mod panel;

pub use manager::{InputCapture, UiManager};
pub use panel::room_panel;
