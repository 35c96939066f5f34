use anyhow::Context as _;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::RoomConfig;
use crate::gfx::{BackendError, RenderEngine};
use crate::performance::FrameStats;
use crate::picking::PickOutcome;
use crate::room::Room;
use crate::ui::{room_panel, UiManager};

type Overlay = fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView);

/// The windowed room: one winit window, one wgpu engine, one imgui overlay
pub struct ParlourApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: RoomConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    room: Room,
    stats: FrameStats,
    /// Last pointer position in physical pixels
    cursor: Option<PhysicalPosition<f64>>,
    /// Where the left button went down, while it is held
    press: Option<PhysicalPosition<f64>>,
    fatal: Option<anyhow::Error>,
}

impl ParlourApp {
    pub fn new(config: RoomConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        let room = Room::furnished(&config).context("Failed to number the room's objects")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                room,
                stats: FrameStats::new(),
                cursor: None,
                press: None,
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    ///
    /// A fatal graphics error ends the loop and is returned here.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop failed")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("Parlour")
                    .with_inner_size(LogicalSize::new(width, height)),
            )
            .context("Failed to create window")?;
        let window_handle = Arc::new(window);

        let PhysicalSize { width, height } = window_handle.inner_size();
        let vsync = self.config.vsync;
        let window_clone = window_handle.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width.max(1), height.max(1), vsync).await
        })
        .context("Failed to initialize the renderer")?;

        self.room.resize(width, height);

        if self.config.show_ui {
            self.ui_manager = Some(UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            ));
        }

        log::info!(
            "Window ready at {}x{} ({:?})",
            width,
            height,
            renderer.surface_format()
        );
        self.render_engine = Some(renderer);
        self.window = Some(window_handle);
        Ok(())
    }

    fn handle_mouse_button(&mut self, state: ElementState, window: &Window) {
        match state {
            ElementState::Pressed => self.press = self.cursor,
            ElementState::Released => {
                let (Some(press), Some(release)) = (self.press.take(), self.cursor) else {
                    return;
                };
                if !is_click(press, release, self.config.click_tolerance) {
                    return;
                }
                let size = window.inner_size();
                self.room
                    .capture_click(release.x, release.y, (size.width, size.height));
                window.request_redraw();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let AppState {
            window,
            render_engine,
            ui_manager,
            room,
            stats,
            ..
        } = self;
        let (Some(window), Some(engine)) = (window.as_ref(), render_engine.as_mut()) else {
            return;
        };

        stats.begin_frame();
        let result = room.render_frame(engine);
        let action = frame_action(&result);
        stats.record_pick(&room.last_outcome());

        match result {
            Ok(PickOutcome::Hit { id, index }) => {
                log::info!("Picked {} ({})", room.objects()[index].name(), id);
            }
            Err(ref err) if action == FrameAction::Discard => {
                log::warn!("Frame skipped: {}", err);
            }
            _ => {}
        }

        match action {
            FrameAction::Present => match ui_manager.as_mut() {
                Some(ui_manager) => {
                    ui_manager.build(window, |ui| room_panel(ui, room, stats));
                    engine.present(Some(
                        |device: &wgpu::Device,
                         queue: &wgpu::Queue,
                         encoder: &mut wgpu::CommandEncoder,
                         view: &wgpu::TextureView| {
                            ui_manager.render(device, queue, encoder, view);
                        },
                    ));
                }
                None => engine.present(None::<Overlay>),
            },
            FrameAction::Discard | FrameAction::Exit => engine.discard_frame(),
        }
        stats.end_frame();

        if let Err(err) = result {
            if action == FrameAction::Exit {
                self.fail(event_loop, err.into());
            }
        }
    }
}

/// What to do with the surface frame after [`Room::render_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameAction {
    Present,
    /// Recoverable failure: drop the half-built frame and carry on
    Discard,
    Exit,
}

fn frame_action(result: &Result<PickOutcome, BackendError>) -> FrameAction {
    match result {
        Ok(_) => FrameAction::Present,
        Err(err) if err.is_fatal() => FrameAction::Exit,
        Err(_) => FrameAction::Discard,
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let WindowEvent::CursorMoved { position, .. } = event {
            self.cursor = Some(position);
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_window_event(&window, &event).any() {
                // A press that started on the panel is not a scene click
                self.press = None;
                self.room.camera_mut().controller.release();
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                } = event
                {
                    event_loop.exit();
                    return;
                }
                self.room.camera_mut().process_keyboard_event(&event);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.handle_mouse_button(state, &window),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
                self.room.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() {
            return;
        }

        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.capture().mouse {
                return;
            }
        }

        self.room.camera_mut().process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

/// Press and release close enough together to count as a click, not a drag
fn is_click(press: PhysicalPosition<f64>, release: PhysicalPosition<f64>, tolerance: f64) -> bool {
    let dx = release.x - press.x;
    let dy = release.y - press.y;
    (dx * dx + dy * dy).sqrt() <= tolerance
}
