//! Click bookkeeping and interaction dispatch

use super::{ObjectId, Pickable};

/// A pointer click in render-surface pixels.
///
/// `surface` is the size of the surface the coordinates were measured
/// against; the decoder rescales to the framebuffer from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub x: f64,
    pub y: f64,
    pub surface: (u32, u32),
}

impl ClickEvent {
    pub fn new(x: f64, y: f64, surface: (u32, u32)) -> Self {
        Self { x, y, surface }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    /// A click is stored and will be resolved by the next pick pass.
    AwaitingDecode,
    /// The click has been matched (or not) and is about to be cleared.
    Dispatched,
}

/// Holds at most one click and routes its decoded id to one object.
#[derive(Debug, Default)]
pub struct Dispatcher {
    state: DispatchState,
    click: Option<ClickEvent>,
}

impl Dispatcher {
    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn pending(&self) -> Option<&ClickEvent> {
        self.click.as_ref()
    }

    /// Stores a click. A later click before the next frame replaces it.
    pub fn capture(&mut self, click: ClickEvent) {
        self.click = Some(click);
        self.state = DispatchState::AwaitingDecode;
    }

    /// Hands the stored click to the decoder.
    pub fn take_click(&mut self) -> Option<ClickEvent> {
        match self.state {
            DispatchState::AwaitingDecode => self.click.take(),
            _ => None,
        }
    }

    /// Calls `interact()` on the first object carrying `id`.
    ///
    /// Returns the index of that object. [`ObjectId::NO_SELECTION`] never
    /// matches, not even an object that was never numbered.
    pub fn dispatch<P: Pickable>(&mut self, id: ObjectId, objects: &mut [P]) -> Option<usize> {
        self.state = DispatchState::Dispatched;

        if !id.is_selection() {
            return None;
        }

        let index = objects.iter().position(|object| object.pick_id() == id)?;
        objects[index].interact();
        Some(index)
    }

    /// Drops the click whatever the outcome and returns to idle.
    pub fn finish(&mut self) {
        self.click = None;
        self.state = DispatchState::Idle;
    }
}
