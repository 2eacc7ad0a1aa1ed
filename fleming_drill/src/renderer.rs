//! GPU rendering for the apparatus and hand scenes
//!
//! Two pipelines share one camera bind group and a depth buffer: lit
//! triangles for solid geometry and an unlit line list for field lines.

use common::{
    create_depth_view, create_dynamic_vertex_buffer, Camera3D, CameraUniform, GraphicsContext,
    LineVertex, MeshVertex, DEPTH_FORMAT,
};

use crate::scene::SceneGeometry;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.93,
    g: 0.94,
    b: 0.97,
    a: 1.0,
};

/// Number of vertices of each kind uploaded for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub triangles: u32,
    pub lines: u32,
}

pub struct SceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    mesh_buffer: wgpu::Buffer,
    max_mesh_vertices: usize,

    line_pipeline: wgpu::RenderPipeline,
    line_buffer: wgpu::Buffer,
    max_line_vertices: usize,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
}

impl SceneRenderer {
    pub fn new(ctx: &GraphicsContext, max_mesh_vertices: usize, max_line_vertices: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Drill Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/drill.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Drill Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil_state = Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_mesh",
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_mesh",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_stencil_state.clone(),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_line",
                buffers: &[LineVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_line",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: depth_stencil_state,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let mesh_buffer =
            create_dynamic_vertex_buffer::<MeshVertex>(device, "Mesh Buffer", max_mesh_vertices);
        let line_buffer =
            create_dynamic_vertex_buffer::<LineVertex>(device, "Line Buffer", max_line_vertices);
        let depth_view = create_depth_view(device, ctx.size);

        Self {
            mesh_pipeline,
            mesh_buffer,
            max_mesh_vertices,
            line_pipeline,
            line_buffer,
            max_line_vertices,
            camera_buffer,
            camera_bind_group,
            depth_view,
        }
    }

    pub fn resize(&mut self, ctx: &GraphicsContext) {
        self.depth_view = create_depth_view(&ctx.device, ctx.size);
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera3D) {
        let uniform = CameraUniform::from_camera(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload the scene, truncating to whole primitives that fit the buffers
    pub fn update_scene(&self, queue: &wgpu::Queue, geometry: &SceneGeometry) -> DrawCounts {
        let counts = clamp_counts(
            geometry.triangles.len(),
            geometry.lines.len(),
            self.max_mesh_vertices,
            self.max_line_vertices,
        );

        if counts.triangles as usize != geometry.triangles.len()
            || counts.lines as usize != geometry.lines.len()
        {
            log::warn!(
                "scene exceeds vertex buffers ({} mesh, {} line vertices), truncating",
                geometry.triangles.len(),
                geometry.lines.len()
            );
        }

        let triangles = &geometry.triangles[..counts.triangles as usize];
        let lines = &geometry.lines[..counts.lines as usize];
        if !triangles.is_empty() {
            queue.write_buffer(&self.mesh_buffer, 0, bytemuck::cast_slice(triangles));
        }
        if !lines.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(lines));
        }

        counts
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        counts: DrawCounts,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if counts.triangles > 0 {
            render_pass.set_pipeline(&self.mesh_pipeline);
            render_pass.set_vertex_buffer(0, self.mesh_buffer.slice(..));
            render_pass.draw(0..counts.triangles, 0..1);
        }

        if counts.lines > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            render_pass.draw(0..counts.lines, 0..1);
        }
    }
}

/// Clamp vertex counts to capacity, rounded down to whole triangles and segments
fn clamp_counts(mesh: usize, lines: usize, max_mesh: usize, max_lines: usize) -> DrawCounts {
    let mesh = mesh.min(max_mesh);
    let lines = lines.min(max_lines);
    DrawCounts {
        triangles: (mesh - mesh % 3) as u32,
        lines: (lines - lines % 2) as u32,
    }
}
