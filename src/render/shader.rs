//! # Shaders: The Two Draw Pipelines
//!
//! Everything on screen is one unit quad pushed through one of two
//! pipelines:
//!
//! ```text
//! flat pipeline          textured pipeline
//!   vertex: position       vertex: position + per-quad UV buffer
//!   fragment: tint color   fragment: sample atlas, blend with tint
//! ```
//!
//! The quad is a 1x1 triangle strip centered on the origin, shared by every
//! draw; a renderable's [`Transform`](crate::math::Transform) scales,
//! rotates, and positions it. Per-draw state (camera matrix, model matrix,
//! tint) travels in a small uniform buffer created fresh for each draw
//! call. That is deliberate: wgpu queue writes coalesce at submit, so
//! reusing one uniform buffer across draws inside a pass would leave every
//! draw seeing the last write. Tiny per-draw buffers keep the renderer
//! immediate-mode, which is the whole teaching point of this engine.
//!
//! Sprite-capable draws read their UVs from a second vertex buffer slot
//! owned by the renderable. Sprites rewrite that buffer when their element
//! window changes (again at mutation time, not draw time, for the same
//! coalescing reason).
//!
//! Shader modules and pipelines are validated inside wgpu error scopes so
//! a bad WGSL edit produces [`EngineError::Compile`]/[`EngineError::Link`]
//! instead of a device loss.

use wgpu::util::DeviceExt;

use crate::error::EngineError;
use crate::math::{Mat4, Rect};
use crate::resources::TextureUploader;

use super::frame::Frame;
use super::gpu::GpuContext;

/// Per-draw uniform data: camera view-projection, model matrix, tint.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub camera: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl DrawUniform {
    pub fn new(camera: Mat4, model: Mat4, tint: [f32; 4]) -> Self {
        Self {
            camera: camera.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            tint,
        }
    }
}

/// The shared GPU state for 2D drawing: both pipelines, the bind group
/// layouts, the sampler, and the unit-quad vertex buffers.
pub struct Shaders {
    pub(crate) flat_pipeline: wgpu::RenderPipeline,
    pub(crate) textured_pipeline: wgpu::RenderPipeline,
    pub(crate) draw_bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) texture_bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) sampler: wgpu::Sampler,
    /// Unit quad positions, triangle-strip order.
    quad_positions: wgpu::Buffer,
    /// Full-texture UVs for plain (non-sprite) textured draws.
    full_uvs: wgpu::Buffer,
}

/// The unit quad: corners at ±0.5, triangle-strip winding.
const QUAD_POSITIONS: [f32; 8] = [
    0.5, 0.5, //
    -0.5, 0.5, //
    0.5, -0.5, //
    -0.5, -0.5,
];

const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: 8,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
};

const UV_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: 8,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![1 => Float32x2],
};

impl Shaders {
    pub fn new(gpu: &GpuContext) -> Result<Self, EngineError> {
        let device = &gpu.device;

        let flat_module = compile_module(device, "flat shader", include_str!("flat.wgsl"))?;
        let textured_module =
            compile_module(device, "textured shader", include_str!("textured.wgsl"))?;

        // Bind group 0: the per-draw uniform.
        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("draw uniform layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        // Bind group 1: texture + sampler, textured pipeline only.
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let flat_pipeline = build_pipeline(
            gpu,
            "flat pipeline",
            &flat_module,
            &[&draw_bind_group_layout],
            &[POSITION_LAYOUT],
        )?;
        let textured_pipeline = build_pipeline(
            gpu,
            "textured pipeline",
            &textured_module,
            &[&draw_bind_group_layout, &texture_bind_group_layout],
            &[POSITION_LAYOUT, UV_LAYOUT],
        )?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let quad_positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("unit quad positions"),
            contents: bytemuck::cast_slice(&QUAD_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let full_uvs = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("full-texture uvs"),
            contents: bytemuck::cast_slice(&Rect::FULL.corners()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            flat_pipeline,
            textured_pipeline,
            draw_bind_group_layout,
            texture_bind_group_layout,
            sampler,
            quad_positions,
            full_uvs,
        })
    }

    /// The cloned-handle bundle texture load workers upload through.
    pub fn uploader(&self, gpu: &GpuContext) -> TextureUploader {
        TextureUploader {
            device: gpu.device.clone(),
            queue: gpu.queue.clone(),
            layout: self.texture_bind_group_layout.clone(),
            sampler: self.sampler.clone(),
        }
    }

    /// A mutable per-quad UV buffer, initialized to `rect`. Owned by
    /// sprite renderables and glyphs; rewritten with [`Shaders::write_uvs`].
    pub fn uv_buffer(&self, gpu: &GpuContext, rect: Rect) -> wgpu::Buffer {
        gpu.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sprite uvs"),
                contents: bytemuck::cast_slice(&rect.corners()),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Overwrite a UV buffer in place. Called at mutation time; the write
    /// lands with the next queue submit.
    pub fn write_uvs(&self, gpu: &GpuContext, buffer: &wgpu::Buffer, rect: Rect) {
        gpu.queue
            .write_buffer(buffer, 0, bytemuck::cast_slice(&rect.corners()));
    }

    fn draw_bind_group(&self, gpu: &GpuContext, uniform: DrawUniform) -> wgpu::BindGroup {
        let buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("draw uniform"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw uniform bind group"),
            layout: &self.draw_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    /// Draw the unit quad as a solid color.
    pub fn draw_flat(&self, gpu: &GpuContext, frame: &mut Frame, uniform: DrawUniform) {
        let bind_group = self.draw_bind_group(gpu, uniform);
        let pass = frame.pass();
        pass.set_pipeline(&self.flat_pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_positions.slice(..));
        pass.draw(0..4, 0..1);
    }

    /// Draw the unit quad textured. `uvs` of `None` uses the shared
    /// full-texture buffer; sprites pass their own.
    pub fn draw_textured(
        &self,
        gpu: &GpuContext,
        frame: &mut Frame,
        uniform: DrawUniform,
        texture_bind_group: &wgpu::BindGroup,
        uvs: Option<&wgpu::Buffer>,
    ) {
        let bind_group = self.draw_bind_group(gpu, uniform);
        let uvs = uvs.unwrap_or(&self.full_uvs);
        let pass = frame.pass();
        pass.set_pipeline(&self.textured_pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_bind_group(1, texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_positions.slice(..));
        pass.set_vertex_buffer(1, uvs.slice(..));
        pass.draw(0..4, 0..1);
    }
}

/// Compile a WGSL module inside a validation error scope.
fn compile_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, EngineError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(EngineError::Compile {
            label: label.to_string(),
            reason: err.to_string(),
        }),
        None => Ok(module),
    }
}

/// Build one quad pipeline; validation failures become [`EngineError::Link`].
fn build_pipeline(
    gpu: &GpuContext,
    label: &str,
    module: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_buffers: &[wgpu::VertexBufferLayout<'_>],
) -> Result<wgpu::RenderPipeline, EngineError> {
    let device = &gpu.device;
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: vertex_buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // 2D quads are double-sided
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(EngineError::Link {
            label: label.to_string(),
            reason: err.to_string(),
        }),
        None => Ok(pipeline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uniform_is_gpu_sized() {
        // Two mat4s plus a vec4, tightly packed.
        assert_eq!(std::mem::size_of::<DrawUniform>(), 144);
    }

    #[test]
    fn quad_is_centered_and_unit_sized() {
        let xs: Vec<f32> = QUAD_POSITIONS.iter().step_by(2).copied().collect();
        let ys: Vec<f32> = QUAD_POSITIONS.iter().skip(1).step_by(2).copied().collect();
        assert!(xs.iter().all(|x| x.abs() == 0.5));
        assert!(ys.iter().all(|y| y.abs() == 0.5));
    }
}
