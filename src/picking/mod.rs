//! Colour-ID object picking
//!
//! Each frame with a pending click runs the same four steps:
//!
//! 1. [`PickingPass`] draws every object in its flat identifying colour,
//! 2. [`PixelDecoder`] reads back the pixel under the click and decodes it,
//! 3. [`Dispatcher`] hands the decoded id to the matching object's
//!    `interact()`,
//! 4. the framebuffer is cleared so the flat pass is never shown.
//!
//! [`PickingPipeline`] strings these together; [`IdAllocator`] numbers the
//! objects once when the scene is built.

pub mod allocator;
pub mod decoder;
pub mod dispatcher;
pub mod id;
pub mod pass;

pub use allocator::IdAllocator;
pub use decoder::PixelDecoder;
pub use dispatcher::{ClickEvent, DispatchState, Dispatcher};
pub use id::{decode, encode, IdColor, ObjectId, MAX_ID};
pub use pass::PickingPass;

use thiserror::Error;

use crate::gfx::backend::{BackendError, RenderBackend};

/// Errors raised while numbering objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickingError {
    #[error("id {id} does not fit into 24 bits of colour")]
    IdOutOfRange { id: u32 },

    #[error("base id 0 is reserved for \"no selection\"")]
    ReservedBaseOffset,

    #[error("cannot number {requested} objects: only {available} ids left above the base")]
    IdSpaceExhausted { requested: usize, available: u32 },
}

/// Identity and tag assigned by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickTag {
    pub id: ObjectId,
    pub color: IdColor,
}

impl PickTag {
    /// Tag carried by objects that have not been numbered yet.
    pub const UNASSIGNED: PickTag = PickTag {
        id: ObjectId::NO_SELECTION,
        color: IdColor::BACKGROUND,
    };
}

/// A scene entity the picking pipeline can number, draw and interact with.
pub trait Pickable {
    /// Current tag, [`PickTag::UNASSIGNED`] before allocation.
    fn pick_tag(&self) -> PickTag;

    /// Stores the tag handed out by the allocator.
    fn set_pick_tag(&mut self, tag: PickTag);

    /// Draws the object with every material replaced by its tag colour.
    fn draw_flat(&self, backend: &mut dyn RenderBackend);

    /// Reacts to being clicked. Must not fail.
    fn interact(&mut self);

    fn pick_id(&self) -> ObjectId {
        self.pick_tag().id
    }
}

/// Result of one frame of picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// No click was waiting.
    NoClick,
    /// The click landed outside the framebuffer.
    OutOfBounds,
    /// Background, or an id no object carries.
    Missed(ObjectId),
    /// `interact()` was called on `objects[index]`.
    Hit { id: ObjectId, index: usize },
    /// The frame failed before the click could be decoded; it was dropped.
    Failed,
}

/// Pass, readback, dispatch and clear, run once per frame.
#[derive(Debug)]
pub struct PickingPipeline {
    pass: PickingPass,
    decoder: PixelDecoder,
    dispatcher: Dispatcher,
    /// Clear applied after dispatch, before the real pass.
    background: wgpu::Color,
}

impl PickingPipeline {
    pub fn new(background: wgpu::Color) -> Self {
        Self {
            pass: PickingPass::default(),
            decoder: PixelDecoder,
            dispatcher: Dispatcher::default(),
            background,
        }
    }

    /// Records a click to be resolved on the next frame.
    pub fn capture(&mut self, click: ClickEvent) {
        self.dispatcher.capture(click);
    }

    pub fn state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    pub fn has_pending_click(&self) -> bool {
        self.dispatcher.state() == DispatchState::AwaitingDecode
    }

    /// Drops a pending click without resolving it.
    ///
    /// Returns whether there was one.
    pub fn discard_click(&mut self) -> bool {
        let pending = self.has_pending_click();
        self.dispatcher.finish();
        pending
    }

    /// Runs one frame of picking against `objects`.
    ///
    /// The pick pass and the trailing clear happen every frame. The click is
    /// consumed before readback, so it is gone even when readback fails.
    pub fn process<P: Pickable>(
        &mut self,
        objects: &mut [P],
        backend: &mut dyn RenderBackend,
    ) -> Result<PickOutcome, BackendError> {
        self.pass.render(objects, backend);

        let outcome = match self.dispatcher.take_click() {
            None => Ok(PickOutcome::NoClick),
            Some(click) => self.resolve_click(&click, objects, backend),
        };

        backend.clear(self.background);
        outcome
    }

    fn resolve_click<P: Pickable>(
        &mut self,
        click: &ClickEvent,
        objects: &mut [P],
        backend: &mut dyn RenderBackend,
    ) -> Result<PickOutcome, BackendError> {
        let Some((x, y)) = self.decoder.locate(click, backend.framebuffer_size()) else {
            self.dispatcher.dispatch(ObjectId::NO_SELECTION, objects);
            self.dispatcher.finish();
            log::debug!("click at ({}, {}) lies outside the framebuffer", click.x, click.y);
            return Ok(PickOutcome::OutOfBounds);
        };

        let id = match self.decoder.read(backend, x, y) {
            Ok(id) => id,
            Err(err) => {
                self.dispatcher.finish();
                return Err(err);
            }
        };

        let hit = self.dispatcher.dispatch(id, objects);
        self.dispatcher.finish();

        Ok(match hit {
            Some(index) => {
                log::info!("picked object {} (index {}) at pixel ({}, {})", id, index, x, y);
                PickOutcome::Hit { id, index }
            }
            None => {
                log::debug!("click at pixel ({}, {}) matched no object ({})", x, y, id);
                PickOutcome::Missed(id)
            }
        })
    }
}

impl Default for PickingPipeline {
    fn default() -> Self {
        Self::new(wgpu::Color::BLACK)
    }
}
