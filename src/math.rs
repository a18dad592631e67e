//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. [`Transform`] holds the position, scale, and
//! rotation of a renderable and produces its model matrix.

use std::f32::consts::TAU;

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// A 2D transform: position, scale (width/height), and Z rotation.
///
/// Rotation is kept normalized to `[0, 2π)` on every write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec2,
    scale: Vec2,
    rotation: f32,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position += Vec2::new(dx, dy);
    }

    /// Scale doubles as the quad's width and height in world units.
    pub fn size(&self) -> Vec2 {
        self.scale
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.scale = Vec2::new(width, height);
    }

    pub fn grow(&mut self, delta: f32) {
        self.scale += Vec2::splat(delta);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation in radians, normalized to `[0, 2π)`.
    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians.rem_euclid(TAU);
    }

    pub fn set_rotation_degrees(&mut self, degrees: f32) {
        self.set_rotation(degrees.to_radians());
    }

    pub fn rotate(&mut self, delta_radians: f32) {
        self.set_rotation(self.rotation + delta_radians);
    }

    /// The model matrix: translate, then rotate about Z, then scale.
    ///
    /// Scale applies to the vertices first, rotation next, translation
    /// last, matching the column-vector convention of the GPU.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.extend(0.0))
            * Mat4::from_rotation_z(self.rotation)
            * Mat4::from_scale(self.scale.extend(1.0))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// A normalized sub-rectangle of a texture (UV space, 0.0–1.0).
///
/// This is the window of a texture that a sprite renders: `left`/`right`
/// along U, `bottom`/`top` along V, with (0,0) the bottom-left of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Rect {
    /// The full texture.
    pub const FULL: Self = Self {
        left: 0.0,
        right: 1.0,
        bottom: 0.0,
        top: 1.0,
    };

    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Build from pixel coordinates and the texture dimensions.
    pub fn from_pixels(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        tex_w: f32,
        tex_h: f32,
    ) -> Self {
        Self {
            left: left / tex_w,
            right: right / tex_w,
            bottom: bottom / tex_h,
            top: top / tex_h,
        }
    }

    /// Corner UVs in triangle-strip order: top-right, top-left,
    /// bottom-right, bottom-left. Matches the unit-quad vertex order.
    pub fn corners(&self) -> [f32; 8] {
        [
            self.right, self.top,
            self.left, self.top,
            self.right, self.bottom,
            self.left, self.bottom,
        ]
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn rotation_stays_normalized() {
        let mut t = Transform::new();
        t.set_rotation(3.0 * PI);
        assert!((t.rotation() - PI).abs() < 1e-6);

        t.set_rotation(-PI / 2.0);
        assert!((t.rotation() - 3.0 * PI / 2.0).abs() < 1e-6);

        for _ in 0..1000 {
            t.rotate(0.1);
            assert!(t.rotation() >= 0.0 && t.rotation() < TAU);
        }
    }

    #[test]
    fn rotation_invariant_under_full_turns() {
        let mut a = Transform::new();
        let mut b = Transform::new();
        a.set_rotation(1.25);
        b.set_rotation(1.25 + 4.0 * TAU);
        assert!((a.rotation() - b.rotation()).abs() < 1e-4);
    }

    #[test]
    fn matrix_composition_order() {
        // Scale innermost, then rotate, then translate: the unit-quad corner
        // (0.5, 0.5) scaled by (2, 4) becomes (1, 2); rotating 90° sends it
        // to (-2, 1); the translation then offsets it.
        let mut t = Transform::new();
        t.set_position(10.0, 20.0);
        t.set_size(2.0, 4.0);
        t.set_rotation(PI / 2.0);

        let p = t.matrix() * Vec4::new(0.5, 0.5, 0.0, 1.0);
        assert!((p.x - (10.0 - 2.0)).abs() < 1e-4);
        assert!((p.y - (20.0 + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn degrees_convert_and_normalize() {
        let mut t = Transform::new();
        t.set_rotation_degrees(450.0);
        assert!((t.rotation() - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn rect_from_pixels() {
        let r = Rect::from_pixels(32.0, 64.0, 0.0, 16.0, 128.0, 32.0);
        assert_eq!(r.left, 0.25);
        assert_eq!(r.right, 0.5);
        assert_eq!(r.bottom, 0.0);
        assert_eq!(r.top, 0.5);
    }

    #[test]
    fn rect_corners_match_strip_order() {
        let c = Rect::new(0.1, 0.2, 0.3, 0.4).corners();
        assert_eq!(c, [0.2, 0.4, 0.1, 0.4, 0.2, 0.3, 0.1, 0.3]);
    }
}
