//! # Render Engine
//!
//! Owns the wgpu surface, device and queue, the depth attachment, the
//! quad pipeline with its uniform bindings, and records one render pass
//! per frame. Construction is async because adapter and device requests
//! are; the caller blocks on it once at startup.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use cgmath::Vector3;
use winit::window::Window;

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    mesh::{MeshBuffer, Vertex, QUAD_VERTICES},
    resources::{
        bindings::{GlobalUBO, TransformUBO, TransformUniform, UniformBindings},
        texture_resource::TextureResource,
    },
    shader::{self, ShaderSet},
};

/// Fixed world-space placement of the quad.
const QUAD_POSITION: Vector3<f32> = Vector3::new(2.0, 0.0, -3.0);

/// Mid-gray clear color behind the quad.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 1.0,
};

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline: wgpu::RenderPipeline,
    global_ubo: GlobalUBO,
    global_bindings: UniformBindings,
    transform_ubo: TransformUBO,
    transform_bindings: UniformBindings,
    quad: MeshBuffer,
}

impl RenderEngine {
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        vertex_shader: &Path,
        fragment_shader: &Path,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create render surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter found")?;

        let adapter_info = adapter.get_info();
        log::info!(
            "rendering with {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to acquire GPU device")?;

        // Validation failures outside an explicit error scope are logged
        // and rendering continues with whatever state results.
        device.on_uncaptured_error(Box::new(|error| {
            log::error!("wgpu error: {error}");
        }));

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "Depth Texture");

        let shaders = ShaderSet::load(&device, vertex_shader, fragment_shader)?;

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = UniformBindings::new(&device, "Globals", &global_ubo);

        let transform_ubo = TransformUBO::new_with_data(
            &device,
            &TransformUniform::from_translation(QUAD_POSITION),
        );
        let transform_bindings = UniformBindings::new(&device, "Transform", &transform_ubo);

        let quad = MeshBuffer::new(&device, "Quad Vertex Buffer", &QUAD_VERTICES);

        let pipeline = build_quad_pipeline(
            &device,
            &shaders,
            format,
            &global_bindings,
            &transform_bindings,
        )?;

        log::info!("render engine ready: {format:?} surface, {width}x{height}");

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pipeline,
            global_ubo,
            global_bindings,
            transform_ubo,
            transform_bindings,
            quad,
        })
    }

    /// Write the frame's camera matrices into the globals uniform.
    /// Called once per frame before `render_frame`.
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        self.global_ubo.update_content(&self.queue, camera_uniform);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "Depth Texture");
    }

    /// Acquire the next surface texture, record the quad pass and
    /// present. Recoverable surface losses reconfigure and skip the
    /// frame; only device memory exhaustion is fatal.
    pub fn render_frame(&mut self) -> Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                anyhow::bail!("surface out of memory");
            }
            Err(other) => {
                log::warn!("surface error: {other}, skipping frame");
                return Ok(());
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // The model transform is constant; the skip-write check in the
        // uniform wrapper turns this into a no-op after the first frame.
        self.transform_ubo.update_content(
            &self.queue,
            TransformUniform::from_translation(QUAD_POSITION),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(1, self.transform_bindings.bind_group(), &[]);
            render_pass.set_vertex_buffer(0, self.quad.buffer().slice(..));
            render_pass.draw(0..self.quad.vertex_count(), 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}

/// Build the quad pipeline: the two stage modules joined over the quad's
/// vertex layout, depth-tested against the shared attachment. Culling is
/// off so the quad stays visible from behind.
fn build_quad_pipeline(
    device: &wgpu::Device,
    shaders: &ShaderSet,
    format: wgpu::TextureFormat,
    globals: &UniformBindings,
    transform: &UniformBindings,
) -> Result<wgpu::RenderPipeline, shader::ShaderError> {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Quad Pipeline Layout"),
        bind_group_layouts: &[globals.layout(), transform.layout()],
        push_constant_ranges: &[],
    });

    shader::link_scope(device, || {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shaders.vertex,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shaders.fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    })
}
