//! The furnished room: object registry, lights, camera and frame driver
//!
//! [`Room::render_frame`] runs one frame against any [`RenderBackend`]:
//!
//! 1. lights are gathered from the global light and every object, at the
//!    progress the objects are about to reach,
//! 2. the backend starts the frame with camera and lights,
//! 3. every object advances its animation and rebuilds its parts,
//! 4. the picking pipeline draws the id pass, resolves a pending click and
//!    clears,
//! 5. every object is drawn with its real materials,
//! 6. the backend ends the frame.
//!
//! Steps 4 and 5 read the same part transforms, so what the user sees is
//! what gets picked. If the backend cannot start a frame, nothing advances
//! and a pending click is dropped rather than resolved against a later
//! scene.

pub mod animation;
pub mod furniture;
pub mod layout;
pub mod object;

pub use animation::{Animation, Direction};
pub use furniture::Furniture;
pub use object::{Part, RoomObject};

use cgmath::Point3;

use crate::config::RoomConfig;
use crate::gfx::backend::{BackendError, FrameGlobals, RenderBackend};
use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::resources::{Light, LightBuffer};
use crate::picking::{
    ClickEvent, IdAllocator, ObjectId, PickOutcome, Pickable, PickingError, PickingPipeline,
};

/// Bluish fill light from outside the room.
pub fn global_light() -> Light {
    Light::new(Point3::new(-30.0, 50.0, -20.0), [0.2, 0.4, 1.0], 3000.0)
}

pub struct Room {
    objects: Vec<RoomObject>,
    picking: PickingPipeline,
    camera: CameraManager,
    global_light: Light,
    last_outcome: PickOutcome,
    last_hit: Option<ObjectId>,
}

impl Room {
    /// The default room, numbered from `config.base_id`.
    pub fn furnished(config: &RoomConfig) -> Result<Self, PickingError> {
        Self::with_objects(layout::furnished(config.animation_frames), config)
    }

    /// A room holding exactly `objects`, in registry order.
    pub fn with_objects(
        mut objects: Vec<RoomObject>,
        config: &RoomConfig,
    ) -> Result<Self, PickingError> {
        let allocator = IdAllocator::new(config.base_id)?;
        allocator.allocate(&mut objects)?;
        log::info!(
            "Room ready with {} objects, ids {}..{}",
            objects.len(),
            allocator.base(),
            allocator.base() as usize + objects.len()
        );

        let (width, height) = config.window_size;
        let aspect = width.max(1) as f32 / height.max(1) as f32;

        Ok(Self {
            objects,
            picking: PickingPipeline::new(config.background),
            camera: CameraManager::new(
                OrbitCamera::room_view(aspect),
                CameraController::new(0.005, 0.5),
            ),
            global_light: global_light(),
            last_outcome: PickOutcome::NoClick,
            last_hit: None,
        })
    }

    pub fn objects(&self) -> &[RoomObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&RoomObject> {
        self.objects.iter().find(|o| o.pick_id() == id)
    }

    pub fn camera(&self) -> &CameraManager {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraManager {
        &mut self.camera
    }

    /// Outcome of the most recent frame's picking.
    pub fn last_outcome(&self) -> PickOutcome {
        self.last_outcome
    }

    /// Most recent object hit by a click, across frames.
    pub fn last_hit(&self) -> Option<&RoomObject> {
        self.last_hit.and_then(|id| self.object(id))
    }

    pub fn has_pending_click(&self) -> bool {
        self.picking.has_pending_click()
    }

    /// Records a click at `(x, y)` on a surface of `surface` pixels.
    ///
    /// Resolved during the next [`render_frame`](Self::render_frame).
    pub fn capture_click(&mut self, x: f64, y: f64, surface: (u32, u32)) {
        log::debug!("click captured at ({:.1}, {:.1}) on {:?}", x, y, surface);
        self.picking.capture(ClickEvent::new(x, y, surface));
    }

    /// Toggles the object carrying `id` without going through the picker.
    pub fn interact_with(&mut self, id: ObjectId) -> Option<usize> {
        if !id.is_selection() {
            return None;
        }
        let index = self.objects.iter().position(|o| o.pick_id() == id)?;
        self.objects[index].interact();
        Some(index)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Camera and lights for the current animation state.
    pub fn frame_globals(&self) -> FrameGlobals {
        self.globals_with(|object| object.progress())
    }

    fn globals_with(&self, progress: impl Fn(&RoomObject) -> f32) -> FrameGlobals {
        let mut lights = LightBuffer::new();
        lights.push(self.global_light);
        for object in &self.objects {
            object.contribute_lights_at(progress(object), &mut lights);
        }

        FrameGlobals {
            view_proj: self.camera.view_proj(),
            eye: self.camera.eye(),
            lights,
        }
    }

    /// Renders one frame; see the module docs for the order of steps.
    ///
    /// A failed frame still consumes the click; `last_outcome` then reports
    /// [`PickOutcome::Failed`].
    pub fn render_frame(
        &mut self,
        backend: &mut dyn RenderBackend,
    ) -> Result<PickOutcome, BackendError> {
        let globals = self.globals_with(|object| object.animation().next_progress());
        if let Err(err) = backend.begin_frame(&globals) {
            self.last_outcome = if self.picking.discard_click() {
                log::warn!("frame failed to start, dropping pending click");
                PickOutcome::Failed
            } else {
                PickOutcome::NoClick
            };
            return Err(err);
        }

        for object in &mut self.objects {
            object.advance();
            object.update_transform();
        }

        let had_click = self.picking.has_pending_click();
        let outcome = self.picking.process(&mut self.objects, backend);
        self.last_outcome = match &outcome {
            Ok(outcome) => *outcome,
            Err(_) if had_click => PickOutcome::Failed,
            Err(_) => PickOutcome::NoClick,
        };
        if let Ok(PickOutcome::Hit { id, .. }) = outcome {
            self.last_hit = Some(id);
        }
        let outcome = outcome?;

        for object in &self.objects {
            object.draw_real(backend);
        }
        backend.end_frame()?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::DrawCall;
    use crate::gfx::resources::Material;
    use crate::gfx::software::SoftwareRenderer;
    use crate::performance::FrameStats;
    use crate::picking::IdColor;
    use crate::room::furniture::{Lamp, Wall};
    use cgmath::{Matrix4, Vector3};

    const SIZE: u32 = 64;

    fn slab(name: &str, x: f32) -> RoomObject {
        RoomObject::new(
            name,
            Furniture::Wall(Wall::new([2.0, 2.0, 0.2])),
            Matrix4::from_translation(Vector3::new(x, 0.0, 0.0)),
            20,
        )
    }

    /// Two slabs side by side, camera straight on.
    fn two_slab_room() -> Room {
        let config = RoomConfig::default().with_window_size(SIZE, SIZE);
        let mut room = Room::with_objects(vec![slab("A", -3.0), slab("B", 3.0)], &config)
            .expect("two objects fit");
        room.camera_mut().camera = OrbitCamera::new(20.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        room
    }

    fn pixel_of(room: &Room, point: Point3<f32>) -> (f64, f64) {
        let mut projector = SoftwareRenderer::new(SIZE, SIZE);
        projector.begin_frame(&room.frame_globals()).unwrap();
        projector.to_screen(point).expect("point in front of the camera")
    }

    fn directions(room: &Room) -> Vec<Direction> {
        room.objects().iter().map(|o| o.direction()).collect()
    }

    /// Delegates to a software renderer but fails every readback.
    struct BrokenReadback(SoftwareRenderer);

    impl RenderBackend for BrokenReadback {
        fn framebuffer_size(&self) -> (u32, u32) {
            self.0.framebuffer_size()
        }
        fn begin_frame(&mut self, globals: &FrameGlobals) -> Result<(), BackendError> {
            self.0.begin_frame(globals)
        }
        fn draw_flat(&mut self, call: &DrawCall, color: IdColor) {
            self.0.draw_flat(call, color)
        }
        fn read_pixel(&mut self, _x: u32, _y: u32) -> Result<[u8; 4], BackendError> {
            Err(BackendError::Readback("mapping failed".to_string()))
        }
        fn clear(&mut self, color: wgpu::Color) {
            self.0.clear(color)
        }
        fn draw_shaded(&mut self, call: &DrawCall, material: &Material) {
            self.0.draw_shaded(call, material)
        }
        fn end_frame(&mut self) -> Result<(), BackendError> {
            self.0.end_frame()
        }
    }

    /// Refuses to start any frame.
    struct SurfaceTimeout(SoftwareRenderer);

    impl RenderBackend for SurfaceTimeout {
        fn framebuffer_size(&self) -> (u32, u32) {
            self.0.framebuffer_size()
        }
        fn begin_frame(&mut self, _globals: &FrameGlobals) -> Result<(), BackendError> {
            Err(BackendError::Surface(wgpu::SurfaceError::Timeout))
        }
        fn draw_flat(&mut self, call: &DrawCall, color: IdColor) {
            self.0.draw_flat(call, color)
        }
        fn read_pixel(&mut self, x: u32, y: u32) -> Result<[u8; 4], BackendError> {
            self.0.read_pixel(x, y)
        }
        fn clear(&mut self, color: wgpu::Color) {
            self.0.clear(color)
        }
        fn draw_shaded(&mut self, call: &DrawCall, material: &Material) {
            self.0.draw_shaded(call, material)
        }
        fn end_frame(&mut self) -> Result<(), BackendError> {
            self.0.end_frame()
        }
    }

    #[test]
    fn test_ids_allocated_in_order() {
        let room = two_slab_room();
        let ids: Vec<u32> = room.objects().iter().map(|o| o.pick_id().get()).collect();
        assert_eq!(ids, vec![1000, 1001]);
    }

    #[test]
    fn test_click_on_b_toggles_only_b() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);
        let (x, y) = pixel_of(&room, Point3::new(3.0, 0.0, 0.2));

        room.capture_click(x, y, (SIZE, SIZE));
        let outcome = room.render_frame(&mut backend).unwrap();

        assert_eq!(
            outcome,
            PickOutcome::Hit {
                id: ObjectId(1001),
                index: 1
            }
        );
        assert_eq!(directions(&room), vec![Direction::Closing, Direction::Opening]);
        assert_eq!(room.last_hit().map(|o| o.name()), Some("B"));
    }

    #[test]
    fn test_background_click_interacts_with_nothing() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);

        room.capture_click(0.0, 0.0, (SIZE, SIZE));
        let outcome = room.render_frame(&mut backend).unwrap();

        assert_eq!(outcome, PickOutcome::Missed(ObjectId::NO_SELECTION));
        assert_eq!(directions(&room), vec![Direction::Closing; 2]);
        assert_eq!(backend.readback_count(), 1);
    }

    #[test]
    fn test_click_consumed_after_one_frame() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);
        let (x, y) = pixel_of(&room, Point3::new(-3.0, 0.0, 0.2));

        room.capture_click(x, y, (SIZE, SIZE));
        assert!(room.has_pending_click());
        room.render_frame(&mut backend).unwrap();
        assert!(!room.has_pending_click());

        let outcome = room.render_frame(&mut backend).unwrap();
        assert_eq!(outcome, PickOutcome::NoClick);
        assert_eq!(backend.readback_count(), 1);
        // Toggled once, not twice
        assert_eq!(directions(&room), vec![Direction::Opening, Direction::Closing]);
    }

    #[test]
    fn test_click_scaled_from_surface_size() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);
        let (x, y) = pixel_of(&room, Point3::new(3.0, 0.0, 0.2));

        // Same spot measured on a surface twice as large
        room.capture_click(x * 2.0, y * 2.0, (SIZE * 2, SIZE * 2));
        let outcome = room.render_frame(&mut backend).unwrap();
        assert!(matches!(outcome, PickOutcome::Hit { index: 1, .. }));
    }

    #[test]
    fn test_out_of_bounds_click_skips_readback() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);

        room.capture_click(SIZE as f64 + 10.0, 5.0, (SIZE, SIZE));
        let outcome = room.render_frame(&mut backend).unwrap();

        assert_eq!(outcome, PickOutcome::OutOfBounds);
        assert_eq!(backend.readback_count(), 0);
        assert!(!room.has_pending_click());
        assert_eq!(directions(&room), vec![Direction::Closing; 2]);
    }

    #[test]
    fn test_id_colors_never_presented() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);
        let (x, y) = pixel_of(&room, Point3::new(3.0, 0.0, 0.2));

        room.capture_click(x, y, (SIZE, SIZE));
        room.render_frame(&mut backend).unwrap();

        let id_colors: Vec<[u8; 4]> = room
            .objects()
            .iter()
            .map(|o| o.pick_tag().color.to_rgba8())
            .collect();
        assert!(backend
            .presented()
            .iter()
            .all(|pixel| !id_colors.contains(pixel)));
        // The slabs were drawn, just not in their id colours
        let background = backend.presented()[0];
        assert!(backend.presented().iter().any(|pixel| *pixel != background));
    }

    #[test]
    fn test_failed_readback_propagates_and_clears_click() {
        let mut room = two_slab_room();
        let mut broken = BrokenReadback(SoftwareRenderer::new(SIZE, SIZE));
        let (x, y) = pixel_of(&room, Point3::new(3.0, 0.0, 0.2));

        room.capture_click(x, y, (SIZE, SIZE));
        let result = room.render_frame(&mut broken);
        assert!(matches!(result, Err(BackendError::Readback(_))));
        assert!(!room.has_pending_click());
        assert_eq!(room.last_outcome(), PickOutcome::Failed);
        assert_eq!(directions(&room), vec![Direction::Closing; 2]);

        let mut healthy = SoftwareRenderer::new(SIZE, SIZE);
        assert_eq!(room.render_frame(&mut healthy).unwrap(), PickOutcome::NoClick);
    }

    #[test]
    fn test_frame_that_fails_to_start_drops_click_and_holds_animation() {
        let mut room = two_slab_room();
        room.interact_with(ObjectId(1000));
        let (x, y) = pixel_of(&room, Point3::new(3.0, 0.0, 0.2));

        room.capture_click(x, y, (SIZE, SIZE));
        let mut stalled = SurfaceTimeout(SoftwareRenderer::new(SIZE, SIZE));
        let result = room.render_frame(&mut stalled);

        assert!(matches!(
            result,
            Err(BackendError::Surface(wgpu::SurfaceError::Timeout))
        ));
        assert!(!room.has_pending_click());
        assert_eq!(room.last_outcome(), PickOutcome::Failed);
        assert_eq!(room.objects()[0].progress(), 0.0);
        assert_eq!(directions(&room), vec![Direction::Opening, Direction::Closing]);

        // Without a click the failed frame reports nothing to pick
        assert!(room.render_frame(&mut stalled).is_err());
        assert_eq!(room.last_outcome(), PickOutcome::NoClick);

        let mut healthy = SoftwareRenderer::new(SIZE, SIZE);
        assert_eq!(room.render_frame(&mut healthy).unwrap(), PickOutcome::NoClick);
        assert_eq!(room.objects()[0].progress(), 0.05);
    }

    #[test]
    fn test_only_consumed_clicks_count_as_failures() {
        let mut room = two_slab_room();
        let mut stats = FrameStats::new();
        let mut stalled = SurfaceTimeout(SoftwareRenderer::new(SIZE, SIZE));
        let mut broken = BrokenReadback(SoftwareRenderer::new(SIZE, SIZE));

        // Failed frames with nothing to pick
        assert!(room.render_frame(&mut stalled).is_err());
        stats.record_pick(&room.last_outcome());
        assert!(room.render_frame(&mut broken).is_ok());
        stats.record_pick(&room.last_outcome());
        assert_eq!(stats.picks().failures, 0);

        room.capture_click(1.0, 1.0, (SIZE, SIZE));
        assert!(room.render_frame(&mut broken).is_err());
        stats.record_pick(&room.last_outcome());
        room.capture_click(1.0, 1.0, (SIZE, SIZE));
        assert!(room.render_frame(&mut stalled).is_err());
        stats.record_pick(&room.last_outcome());

        assert_eq!(stats.picks().failures, 2);
        assert_eq!(stats.picks().readbacks, 0);
    }

    #[test]
    fn test_lights_match_the_frame_being_drawn() {
        let config = RoomConfig::default().with_window_size(SIZE, SIZE);
        let lamp = RoomObject::new(
            "Lamp",
            Furniture::Lamp(Lamp::floor()),
            Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.0)),
            1,
        );
        let mut room = Room::with_objects(vec![lamp], &config).unwrap();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);

        room.interact_with(ObjectId(1000));
        room.render_frame(&mut backend).unwrap();
        // The one-frame switch-off lands in this very frame
        assert_eq!(room.objects()[0].progress(), 1.0);
        assert_eq!(backend.globals().lights.len(), 1);
    }

    #[test]
    fn test_animation_runs_after_pick() {
        let mut room = two_slab_room();
        let mut backend = SoftwareRenderer::new(SIZE, SIZE);
        let (x, y) = pixel_of(&room, Point3::new(3.0, 0.0, 0.2));

        room.capture_click(x, y, (SIZE, SIZE));
        room.render_frame(&mut backend).unwrap();
        for _ in 0..30 {
            room.render_frame(&mut backend).unwrap();
        }
        assert_eq!(room.objects()[1].progress(), 1.0);
        assert_eq!(room.objects()[0].progress(), 0.0);
    }

    #[test]
    fn test_clicking_lamp_switches_it_off() {
        let config = RoomConfig::default().with_window_size(160, 120);
        let lamp = RoomObject::new("Lamp", Furniture::Lamp(Lamp::floor()), Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.0)), 20);
        let mut room = Room::with_objects(vec![lamp], &config).unwrap();
        let mut backend = SoftwareRenderer::new(160, 120);

        let bulb = Point3::new(0.0, Lamp::floor().bulb_height(), 0.0);
        let mut projector = SoftwareRenderer::new(160, 120);
        projector.begin_frame(&room.frame_globals()).unwrap();
        let (x, y) = projector.to_screen(bulb).unwrap();

        let lit = room.frame_globals().lights.len();
        room.capture_click(x, y, (160, 120));
        let outcome = room.render_frame(&mut backend).unwrap();
        assert!(matches!(outcome, PickOutcome::Hit { index: 0, .. }));

        for _ in 0..20 {
            room.render_frame(&mut backend).unwrap();
        }
        // Only the global light remains
        assert_eq!(lit, 2);
        assert_eq!(room.frame_globals().lights.len(), 1);
    }

    #[test]
    fn test_interact_with_ignores_unknown_ids() {
        let mut room = two_slab_room();
        assert_eq!(room.interact_with(ObjectId::NO_SELECTION), None);
        assert_eq!(room.interact_with(ObjectId(4242)), None);
        assert_eq!(room.interact_with(ObjectId(1000)), Some(0));
        assert_eq!(room.objects()[0].direction(), Direction::Opening);
    }

    #[test]
    fn test_furnished_room_renders_headless() {
        let config = RoomConfig::default();
        let mut room = Room::furnished(&config).unwrap();
        let mut backend = SoftwareRenderer::new(120, 80);

        let ids: Vec<u32> = room.objects().iter().map(|o| o.pick_id().get()).collect();
        let expected: Vec<u32> = (1000..1000 + room.objects().len() as u32).collect();
        assert_eq!(ids, expected);

        assert_eq!(room.render_frame(&mut backend).unwrap(), PickOutcome::NoClick);
        assert_eq!(backend.frame_count(), 1);
    }

    #[test]
    fn test_exhausted_id_space_rejected() {
        let config = RoomConfig::default().with_base_id(crate::picking::MAX_ID);
        let result = Room::with_objects(vec![slab("A", 0.0), slab("B", 1.0)], &config);
        assert!(matches!(result, Err(PickingError::IdSpaceExhausted { .. })));
    }
}
