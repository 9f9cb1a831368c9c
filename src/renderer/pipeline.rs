//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::scene::scene_vertices;
use super::vertex::Vertex;
use crate::settings::Settings;
use crate::sim::Snapshot;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Arena dimensions for coordinate mapping
    pub arena_size: (f32, f32),
    /// Clear color; alpha 0 lets a page background show through
    clear: wgpu::Color,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        arena_size: (f32, f32),
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("asteroid-arena-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // Prefer premultiplied alpha so a transparent clear reveals the page background
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps.alpha_modes[0]
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Create initial vertex buffer (will be updated each frame)
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            arena_size,
            clear: wgpu::Color::BLACK,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Flat fill used behind the scene
    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear = wgpu::Color {
            r: rgba[0] as f64,
            g: rgba[1] as f64,
            b: rgba[2] as f64,
            a: rgba[3] as f64,
        };
    }

    /// Convert arena coordinates (origin top-left, y down) to NDC
    pub fn game_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        arena_to_ndc(x, y, self.arena_size, self.size)
    }

    /// Tessellate a snapshot and draw it
    pub fn render(
        &mut self,
        snapshot: &Snapshot,
        settings: &Settings,
    ) -> Result<(), wgpu::SurfaceError> {
        let vertices = scene_vertices(snapshot, settings);
        self.render_vertices(&vertices)
    }

    /// Upload vertices and render
    pub fn render_vertices(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        // Convert vertices to NDC
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let (x, y) = self.game_to_ndc(v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();

        // An empty buffer is not allowed; keep last frame's if nothing to draw
        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Letterboxed mapping of the arena rectangle into NDC (-1..1, y up)
pub fn arena_to_ndc(x: f32, y: f32, arena: (f32, f32), viewport: (u32, u32)) -> (f32, f32) {
    let (aw, ah) = arena;
    let (vw, vh) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);

    let nx = x / aw * 2.0 - 1.0;
    let ny = 1.0 - y / ah * 2.0;

    let arena_aspect = aw / ah;
    let view_aspect = vw / vh;
    if view_aspect > arena_aspect {
        // Viewport wider than arena: pillarbox
        (nx * arena_aspect / view_aspect, ny)
    } else {
        // Taller: letterbox
        (nx, ny * view_aspect / arena_aspect)
    }
}

/// Inverse of `arena_to_ndc` for pointer input given in viewport pixels (y down)
pub fn viewport_to_arena(px: f32, py: f32, arena: (f32, f32), viewport: (f32, f32)) -> (f32, f32) {
    let (aw, ah) = arena;
    let (vw, vh) = (viewport.0.max(1.0), viewport.1.max(1.0));
    let scale = (vw / aw).min(vh / ah);
    let offset_x = (vw - aw * scale) / 2.0;
    let offset_y = (vh - ah * scale) / 2.0;
    ((px - offset_x) / scale, (py - offset_y) / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_corners_map_to_ndc() {
        let arena = (800.0, 600.0);
        let viewport = (800, 600);
        assert_eq!(arena_to_ndc(0.0, 0.0, arena, viewport), (-1.0, 1.0));
        assert_eq!(arena_to_ndc(800.0, 600.0, arena, viewport), (1.0, -1.0));
        assert_eq!(arena_to_ndc(400.0, 300.0, arena, viewport), (0.0, 0.0));
    }

    #[test]
    fn test_wide_viewport_pillarboxes() {
        let (x, y) = arena_to_ndc(800.0, 0.0, (800.0, 600.0), (1600, 600));
        assert!((x - 0.5).abs() < 1e-6);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_tall_viewport_letterboxes() {
        let (x, y) = arena_to_ndc(0.0, 0.0, (800.0, 600.0), (800, 1200));
        assert_eq!(x, -1.0);
        assert!((y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_to_arena_inverts_letterbox() {
        // 1600x600 viewport pillarboxes an 800x600 arena by 400px each side
        let (x, y) = viewport_to_arena(400.0, 0.0, (800.0, 600.0), (1600.0, 600.0));
        assert_eq!((x, y), (0.0, 0.0));
        let (x, y) = viewport_to_arena(800.0, 300.0, (800.0, 600.0), (1600.0, 600.0));
        assert_eq!((x, y), (400.0, 300.0));
        // Half-size viewport scales up
        let (x, y) = viewport_to_arena(200.0, 150.0, (800.0, 600.0), (400.0, 300.0));
        assert_eq!((x, y), (400.0, 300.0));
    }
}
