//! # Camera: World Coordinates to Canvas Pixels
//!
//! A camera owns two rectangles:
//!
//! ```text
//! world space (WC)                      canvas (pixels)
//! ┌────────────────────────┐            ┌──────────────────────────┐
//! │        height =        │            │   ┌viewport──────┐       │
//! │   width · vp.h / vp.w  │   ─────►   │   │              │       │
//! │     ┌─center           │            │   │              │       │
//! │     ▼        width     │            │   └──────────────┘       │
//! └────────────────────────┘            └──────────────────────────┘
//! ```
//!
//! The world window is defined by its center and width only; the height
//! follows from the viewport's aspect ratio, so world shapes never distort.
//! [`Camera::view_proj`] maps that window to clip space: translate the
//! center to the origin, then scale to the 2x2 clip square.
//!
//! [`Camera::set_view_and_clear`] prepares a frame for this camera's draws:
//! it sets the viewport, clears just that region to the camera's background
//! color, and leaves the viewport in place. The region clear is a scissored
//! flat-quad draw because a wgpu `LoadOp::Clear` always wipes the whole
//! attachment; there is no partial clear op.
//!
//! Viewport coordinates use a bottom-left origin like world space; the
//! flip to wgpu's top-left pixel origin happens at the GPU boundary.

use crate::math::{Mat4, Vec2, Vec3};

use super::frame::Frame;
use super::gpu::GpuContext;
use super::shader::{DrawUniform, Shaders};

pub struct Camera {
    center: Vec2,
    width: f32,
    /// `[x, y, w, h]` in canvas pixels, bottom-left origin.
    viewport: [f32; 4],
    background: [f32; 4],
}

impl Camera {
    pub fn new(center: Vec2, width: f32, viewport: [f32; 4]) -> Self {
        Self {
            center,
            width,
            viewport,
            background: [0.8, 0.8, 0.8, 1.0],
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x, y);
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// World-window height, implied by the viewport aspect ratio.
    pub fn height(&self) -> f32 {
        self.width * self.viewport[3] / self.viewport[2]
    }

    pub fn viewport(&self) -> [f32; 4] {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: [f32; 4]) {
        self.viewport = viewport;
    }

    pub fn background(&self) -> [f32; 4] {
        self.background
    }

    pub fn set_background(&mut self, color: [f32; 4]) {
        self.background = color;
    }

    /// World window to clip space: center to origin, then scale the
    /// window to the 2x2 clip square.
    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(2.0 / self.width, 2.0 / self.height(), 1.0))
            * Mat4::from_translation(Vec3::new(-self.center.x, -self.center.y, 0.0))
    }

    /// The viewport rectangle flipped to wgpu's top-left pixel origin and
    /// clamped to the surface. wgpu rejects rectangles that poke outside
    /// the render target, so a window shrunk below the viewport must not
    /// pass the full rect through. `None` when nothing remains on screen.
    fn gpu_viewport(&self, surface_w: f32, surface_h: f32) -> Option<[f32; 4]> {
        let [x, y, w, h] = self.viewport;
        let flipped_y = surface_h - (y + h);

        let left = x.max(0.0);
        let top = flipped_y.max(0.0);
        let right = (x + w).min(surface_w);
        let bottom = (flipped_y + h).min(surface_h);
        if right <= left || bottom <= top {
            return None;
        }
        Some([left, top, right - left, bottom - top])
    }

    /// Point the frame at this camera: set the viewport, clear it to the
    /// background color, and leave the viewport active for the camera's
    /// draws. A viewport entirely off the surface leaves the frame
    /// untouched.
    pub fn set_view_and_clear(&self, gpu: &GpuContext, shaders: &Shaders, frame: &mut Frame) {
        let (surface_w, surface_h) = gpu.surface_size();
        let Some([x, y, w, h]) = self.gpu_viewport(surface_w as f32, surface_h as f32) else {
            return;
        };

        {
            let pass = frame.pass();
            pass.set_viewport(x, y, w, h, 0.0, 1.0);
            pass.set_scissor_rect(x as u32, y as u32, w as u32, h as u32);
        }

        // Fill the scissored viewport: a unit quad scaled to cover all of
        // clip space, under an identity camera.
        let fill = DrawUniform::new(
            Mat4::IDENTITY,
            Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0)),
            self.background,
        );
        shaders.draw_flat(gpu, frame, fill);

        frame.pass().set_scissor_rect(0, 0, surface_w, surface_h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    fn camera() -> Camera {
        Camera::new(Vec2::new(20.0, 60.0), 20.0, [20.0, 40.0, 600.0, 300.0])
    }

    #[test]
    fn height_follows_viewport_aspect() {
        assert!((camera().height() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn center_maps_to_clip_origin() {
        let c = camera();
        let p = c.view_proj() * Vec4::new(20.0, 60.0, 0.0, 1.0);
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn window_corners_map_to_clip_corners() {
        let c = camera();
        let top_right = c.view_proj()
            * Vec4::new(
                c.center().x + c.width() / 2.0,
                c.center().y + c.height() / 2.0,
                0.0,
                1.0,
            );
        assert!((top_right.x - 1.0).abs() < 1e-6);
        assert!((top_right.y - 1.0).abs() < 1e-6);

        let bottom_left = c.view_proj() * Vec4::new(10.0, 55.0, 0.0, 1.0);
        assert!((bottom_left.x + 1.0).abs() < 1e-6);
        assert!((bottom_left.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn viewport_origin_flips_for_the_gpu() {
        // Bottom-left (20, 40) on a 480px-tall surface is top-left row 140.
        let vp = camera().gpu_viewport(640.0, 480.0);
        assert_eq!(vp, Some([20.0, 140.0, 600.0, 300.0]));
    }

    #[test]
    fn viewport_clamps_to_a_shrunken_surface() {
        // Window resized to 300x200: the flip puts the rect's top at -140,
        // and both edges overhang. The clamped rect must stay inside the
        // surface with no negative coordinates.
        let vp = camera().gpu_viewport(300.0, 200.0);
        assert_eq!(vp, Some([20.0, 0.0, 280.0, 160.0]));
    }

    #[test]
    fn viewport_off_the_surface_is_empty() {
        assert_eq!(camera().gpu_viewport(10.0, 10.0), None);
    }
}
