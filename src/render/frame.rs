//! One frame of drawing against the window surface.
//!
//! [`Frame::begin`] acquires the surface texture, clears the whole canvas,
//! and opens a render pass; renderables draw into it; [`Frame::finish`]
//! submits and presents. The pass is detached from the encoder's lifetime
//! with `forget_lifetime` so the frame can carry both without
//! self-reference; wgpu keeps the attachment alive internally.

use crate::error::EngineError;

use super::gpu::GpuContext;

/// The canvas clear color, behind every camera viewport.
#[derive(Debug, Clone, Copy)]
pub struct CanvasColor(pub [f64; 4]);

impl Default for CanvasColor {
    fn default() -> Self {
        // Light gray, so unclaimed canvas is visibly not a camera.
        Self([0.9, 0.9, 0.9, 1.0])
    }
}

/// An in-progress frame: the acquired surface, its encoder, and the open
/// render pass.
pub struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    encoder: wgpu::CommandEncoder,
    pass: wgpu::RenderPass<'static>,
}

impl Frame {
    /// Acquire the next surface image and open a pass cleared to `canvas`.
    ///
    /// A lost or outdated surface is reconfigured and reported as
    /// [`EngineError::SurfaceUnavailable`]; the caller skips the frame and
    /// tries again next redraw.
    pub fn begin(gpu: &mut GpuContext, canvas: CanvasColor) -> Result<Self, EngineError> {
        let surface_texture = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.surface_size();
                gpu.resize(w, h);
                return Err(EngineError::SurfaceUnavailable(
                    "surface lost, reconfigured".to_string(),
                ));
            }
            Err(e) => return Err(EngineError::SurfaceUnavailable(e.to_string())),
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: canvas.0[0],
                            g: canvas.0[1],
                            b: canvas.0[2],
                            a: canvas.0[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        Ok(Self {
            surface_texture,
            encoder,
            pass,
        })
    }

    /// The open render pass, for issuing draw and viewport calls.
    pub fn pass(&mut self) -> &mut wgpu::RenderPass<'static> {
        &mut self.pass
    }

    /// Close the pass, submit the encoder, and present.
    pub fn finish(self, gpu: &GpuContext) {
        let Self {
            surface_texture,
            encoder,
            pass,
        } = self;
        drop(pass);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}
