//! WGPU-based implementation of [`RenderBackend`]
//!
//! Flat (id) draws and shaded draws never share a target. Flat draws are
//! queued and rasterized into an off-screen `Rgba8Unorm` pick target when a
//! pixel is read back; shaded draws are queued and rendered into the surface
//! at [`end_frame`](RenderBackend::end_frame). The surface texture is held
//! until [`RenderEngine::present`] so a UI overlay can be drawn on top.

use std::{collections::HashMap, ops::Range, sync::Arc};
use wgpu::{util::DeviceExt, Device, TextureFormat};

use crate::gfx::{
    backend::{BackendError, DrawCall, FrameGlobals, RenderBackend},
    geometry::Primitive,
    resources::{GlobalBindings, GlobalUBO, GlobalUBOContent, Material, TextureResource},
};
use crate::picking::IdColor;

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::vertex::InstanceRaw;

/// Row pitch wgpu requires for texture-to-buffer copies
const COPY_ROW_ALIGNMENT: u64 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Surface texture acquired for the frame in progress
struct FrameTarget {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    rendered: bool,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pick_target: TextureResource,
    pick_depth: TextureResource,
    readback_buffer: wgpu::Buffer,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    meshes: HashMap<Primitive, GpuMesh>,

    frame: Option<FrameTarget>,
    flat_draws: Vec<(Primitive, InstanceRaw)>,
    shaded_draws: Vec<(Primitive, InstanceRaw)>,
    /// Clear still owed to the pick target before the next flat flush
    pick_clear: Option<wgpu::Color>,
    surface_clear: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width`, `height` - Initial surface size in pixels
    /// * `vsync` - Present with `Fifo` instead of `Immediate`
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| BackendError::AdapterUnavailable(e.to_string()))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        device.set_device_lost_callback(|reason, message| {
            log::error!("Device lost ({:?}): {}", reason, message);
        });

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| {
                BackendError::AdapterUnavailable("surface reports no formats".to_string())
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, config.width, config.height, "depth_texture");
        let pick_target = TextureResource::create_pick_target(&device, config.width, config.height);
        let pick_depth =
            TextureResource::create_depth_texture(&device, config.width, config.height, "pick_depth");

        let readback_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Readback Buffer"),
            size: COPY_ROW_ALIGNMENT,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let global_ubo = GlobalUBO::new(&device, "Globals UBO");
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let meshes = Primitive::ALL
            .iter()
            .map(|&primitive| (primitive, upload_mesh(&device, primitive)))
            .collect();

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        if let Err(e) = pipeline_manager.load_shader("shaded", include_str!("shaders/shaded.wgsl")) {
            log::error!("{}", e);
        }
        if let Err(e) = pipeline_manager.load_shader("pick", include_str!("shaders/pick.wgsl")) {
            log::error!("{}", e);
        }

        pipeline_manager.register_pipeline(
            "Shaded",
            PipelineConfig::default()
                .with_label("SHADED")
                .with_shader("shaded")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_opaque_target(format)
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()]),
        );
        pipeline_manager.register_pipeline(
            "Pick",
            PipelineConfig::default()
                .with_label("PICK")
                .with_shader("pick")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_opaque_target(TextureResource::PICK_FORMAT)
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for e in errors {
                log::error!("{}", e);
            }
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            pick_target,
            pick_depth,
            readback_buffer,
            pipeline_manager,
            global_ubo,
            global_bindings,
            meshes,
            frame: None,
            flat_draws: Vec::new(),
            shaded_draws: Vec::new(),
            pick_clear: Some(wgpu::Color::BLACK),
            surface_clear: wgpu::Color::BLACK,
        })
    }

    /// Draws the optional overlay onto the finished frame and presents it
    ///
    /// The overlay renders after the shaded pass, so it must load rather
    /// than clear the target.
    pub fn present<F>(&mut self, overlay: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let Some(frame) = self.frame.take() else {
            return;
        };
        if !frame.rendered {
            log::warn!("Presenting a frame that was never ended");
        }

        if let Some(overlay) = overlay {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Overlay Encoder"),
                });
            overlay(&self.device, &self.queue, &mut encoder, &frame.view);
            self.queue.submit(std::iter::once(encoder.finish()));
        }

        frame.surface_texture.present();
    }

    /// Resizes the surface and every size-dependent target
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "depth_texture");
        self.pick_target = TextureResource::create_pick_target(&self.device, width, height);
        self.pick_depth =
            TextureResource::create_depth_texture(&self.device, width, height, "pick_depth");
        self.pick_clear = Some(wgpu::Color::BLACK);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn acquire(&mut self) -> Result<wgpu::SurfaceTexture, BackendError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(self.surface.get_current_texture()?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rasterizes queued flat draws into the pick target
    fn flush_flat(&mut self, encoder: &mut wgpu::CommandEncoder) {
        let draws = std::mem::take(&mut self.flat_draws);
        let clear = self.pick_clear.take();
        let Some(pipeline) = self.pipeline_manager.pipeline("Pick") else {
            log::error!("Pick pipeline missing");
            return;
        };

        let (instances, ranges) = batch_by_primitive(&draws);
        let instance_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Pick Instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pick Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.pick_target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: clear.map_or(wgpu::LoadOp::Load, wgpu::LoadOp::Clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.pick_depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: clear.map_or(wgpu::LoadOp::Load, |_| wgpu::LoadOp::Clear(1.0)),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
        draw_batches(&mut pass, &self.meshes, &instance_buffer, &ranges);
    }

    /// Blocking map of the readback buffer, following the queue submit
    ///
    /// Every exit leaves the buffer unmapped, ready for the next click.
    fn map_readback(&self) -> Result<[u8; 4], BackendError> {
        let slice = self.readback_buffer.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        // A failed poll never fires the callback, so do not wait on it
        let status = match self.device.poll(wgpu::PollType::Wait) {
            Err(e) => MapStatus::PollFailed(e.to_string()),
            Ok(_) => match futures::executor::block_on(rx) {
                Ok(Ok(())) => MapStatus::Mapped,
                Ok(Err(e)) => MapStatus::MapFailed(e.to_string()),
                Err(_) => MapStatus::CallbackDropped,
            },
        };

        if status == MapStatus::Mapped {
            let mapped = slice.get_mapped_range();
            let mut pixel = [0u8; 4];
            pixel.copy_from_slice(&mapped[..4]);
            drop(mapped);
            self.readback_buffer.unmap();
            return Ok(pixel);
        }
        if status.map_pending() {
            self.readback_buffer.unmap();
        }
        Err(status.into_error())
    }

    /// Drops the frame in progress without presenting it
    pub fn discard_frame(&mut self) {
        self.flat_draws.clear();
        self.shaded_draws.clear();
        self.pick_clear = Some(wgpu::Color::BLACK);
        if self.frame.take().is_some() {
            log::debug!("Discarded unpresented frame");
        }
    }
}

/// How a readback map ended
#[derive(Debug, Clone, PartialEq, Eq)]
enum MapStatus {
    Mapped,
    /// The device poll errored before the map resolved
    PollFailed(String),
    /// The map resolved with an error; the buffer is idle again
    MapFailed(String),
    /// The callback went away without reporting
    CallbackDropped,
}

impl MapStatus {
    /// Whether `map_async` is still outstanding and must be cancelled by an unmap
    fn map_pending(&self) -> bool {
        matches!(self, MapStatus::PollFailed(_) | MapStatus::CallbackDropped)
    }

    fn into_error(self) -> BackendError {
        match self {
            MapStatus::Mapped => BackendError::Readback("buffer mapped".to_string()),
            MapStatus::PollFailed(reason) | MapStatus::MapFailed(reason) => {
                BackendError::Readback(reason)
            }
            MapStatus::CallbackDropped => {
                BackendError::DeviceLost("readback callback dropped".to_string())
            }
        }
    }
}

impl RenderBackend for RenderEngine {
    fn framebuffer_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn begin_frame(&mut self, globals: &FrameGlobals) -> Result<(), BackendError> {
        if self.frame.take().is_some() {
            log::warn!("Previous frame was never presented");
        }
        self.global_ubo
            .write(&self.queue, &GlobalUBOContent::from(globals));

        let surface_texture = self.acquire()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(FrameTarget {
            surface_texture,
            view,
            rendered: false,
        });
        self.flat_draws.clear();
        self.shaded_draws.clear();
        Ok(())
    }

    fn draw_flat(&mut self, call: &DrawCall, color: IdColor) {
        self.flat_draws
            .push((call.primitive, InstanceRaw::flat(call.model, color)));
    }

    fn read_pixel(&mut self, x: u32, y: u32) -> Result<[u8; 4], BackendError> {
        let (width, height) = self.framebuffer_size();
        if x >= width || y >= height {
            return Err(BackendError::PixelOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Pick Encoder"),
            });
        if !self.flat_draws.is_empty() || self.pick_clear.is_some() {
            self.flush_flat(&mut encoder);
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.pick_target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(COPY_ROW_ALIGNMENT as u32),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        self.map_readback()
    }

    fn clear(&mut self, color: wgpu::Color) {
        self.flat_draws.clear();
        self.shaded_draws.clear();
        self.pick_clear = Some(color);
        self.surface_clear = color;
    }

    fn draw_shaded(&mut self, call: &DrawCall, material: &Material) {
        self.shaded_draws
            .push((call.primitive, InstanceRaw::shaded(call.model, material)));
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let Some(frame) = self.frame.as_mut() else {
            return Err(BackendError::NotInFrame);
        };
        let Some(pipeline) = self.pipeline_manager.pipeline("Shaded") else {
            return Err(BackendError::DeviceLost("shaded pipeline missing".to_string()));
        };

        let draws = std::mem::take(&mut self.shaded_draws);
        let (instances, ranges) = batch_by_primitive(&draws);
        let instance_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Shaded Instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shaded Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.surface_clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            draw_batches(&mut pass, &self.meshes, &instance_buffer, &ranges);
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        frame.rendered = true;
        // Next frame's pick pass starts from a cleared target
        self.pick_clear = Some(wgpu::Color::BLACK);
        Ok(())
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::Immediate
    }
}

fn upload_mesh(device: &wgpu::Device, primitive: Primitive) -> GpuMesh {
    let geometry = primitive.geometry();
    let label = format!("{:?}", primitive);

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertices", label)),
        contents: bytemuck::cast_slice(&geometry.to_vertices()),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Indices", label)),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: geometry.indices.len() as u32,
    }
}

/// Groups draws by mesh so each primitive is one instanced draw call
///
/// Order within a primitive is preserved.
fn batch_by_primitive(
    draws: &[(Primitive, InstanceRaw)],
) -> (Vec<InstanceRaw>, Vec<(Primitive, Range<u32>)>) {
    let mut instances = Vec::with_capacity(draws.len());
    let mut ranges = Vec::new();

    for primitive in Primitive::ALL {
        let start = instances.len() as u32;
        instances.extend(
            draws
                .iter()
                .filter(|(p, _)| *p == primitive)
                .map(|(_, raw)| *raw),
        );
        let end = instances.len() as u32;
        if end > start {
            ranges.push((primitive, start..end));
        }
    }

    // wgpu rejects zero-sized buffers
    if instances.is_empty() {
        instances.push(bytemuck::Zeroable::zeroed());
    }
    (instances, ranges)
}

fn draw_batches(
    pass: &mut wgpu::RenderPass<'_>,
    meshes: &HashMap<Primitive, GpuMesh>,
    instance_buffer: &wgpu::Buffer,
    ranges: &[(Primitive, Range<u32>)],
) {
    pass.set_vertex_buffer(1, instance_buffer.slice(..));
    for (primitive, range) in ranges {
        let Some(mesh) = meshes.get(primitive) else {
            continue;
        };
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, range.clone());
    }
}
