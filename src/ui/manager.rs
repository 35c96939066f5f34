//! ImGui integration for the room window
//!
//! Owns the imgui context, the winit platform glue and the wgpu renderer.
//! Each frame the widgets are built with [`UiManager::build`] before the
//! room is presented, then drawn on top of the shaded pass by
//! [`UiManager::render`].

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

const FONT_SIZE: f32 = 18.0;

/// Which inputs imgui wants for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputCapture {
    pub mouse: bool,
    pub keyboard: bool,
}

impl InputCapture {
    pub fn any(self) -> bool {
        self.mouse || self.keyboard
    }
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
    /// Set by `build`, consumed by `render`
    frame_built: bool,
}

impl UiManager {
    /// Locked DPI keeps pointer coordinates in physical pixels, the same
    /// space clicks are captured in.
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: output_color_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
            frame_built: false,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Feeds pointer, keyboard and focus events to imgui
    ///
    /// Returns what imgui captures afterwards; captured input must not reach
    /// the picker or the camera.
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> InputCapture {
        let relevant = matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::CursorLeft { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::ModifiersChanged(_)
                | WindowEvent::Focused(_)
        );
        if relevant {
            let wrapped: Event<()> = Event::WindowEvent {
                window_id: window.id(),
                event: event.clone(),
            };
            self.platform
                .handle_event(self.context.io_mut(), window, &wrapped);
        }
        self.capture()
    }

    pub fn capture(&self) -> InputCapture {
        let io = self.context.io();
        InputCapture {
            mouse: io.want_capture_mouse,
            keyboard: io.want_capture_keyboard,
        }
    }

    /// Starts an imgui frame and runs `build_ui` to lay out the widgets
    pub fn build<F>(&mut self, window: &Window, build_ui: F)
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Skipping UI frame: {}", e);
            return;
        }

        let ui = self.context.frame();
        build_ui(&ui);

        let cursor = ui.mouse_cursor();
        if self.last_cursor != cursor {
            self.last_cursor = cursor;
            self.platform.prepare_render(&ui, window);
        }
        self.frame_built = true;
    }

    /// Draws the widgets from the last [`build`](Self::build) over `target`
    ///
    /// Loads rather than clears, so the room stays underneath.
    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
    ) {
        if !std::mem::take(&mut self.frame_built) {
            return;
        }
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::error!("UI overlay failed: {}", e);
        }
    }
}
