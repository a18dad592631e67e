//! # Renderables: Things That Draw Themselves
//!
//! A [`Renderable`] is one drawable quad: a transform, a color, and a
//! [`RenderKind`] that decides what fills the quad. The kinds form a
//! capability ladder, each adding one ability to the previous:
//!
//! ```text
//! Flat            solid color quad
//! Texture         whole image on the quad
//! Sprite          + a movable UV window into the image
//! AnimatedSprite  + an Animator stepping that window along a strip
//! Text            a sprite per glyph of a bitmap font
//! ```
//!
//! GPU-facing mutations (sprite region changes, animation steps, text
//! edits) rewrite per-renderable UV buffers at mutation time. `draw` itself
//! is read-only; it only records draw calls. Texture-backed kinds hold
//! their resource *keys*, not the resources; the map is consulted at draw
//! time, and a key that is not loaded fails the draw with
//! [`EngineError::MissingResource`].

use crate::animation::{AnimationKind, Animator};
use crate::context::Context;
use crate::error::EngineError;
use crate::math::{Rect, Transform, Vec2};
use crate::render::camera::Camera;
use crate::render::frame::Frame;
use crate::render::shader::DrawUniform;
use crate::resources::font::{self, CharInfo};
use crate::resources::texture;

/// A uniform strip of animation frames inside a texture, in UV units.
/// Frame `i` starts at `first_left + i * (width + padding)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteStrip {
    pub first_left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub frame_count: u32,
}

impl SpriteStrip {
    /// The UV window of frame `index`.
    pub fn frame_rect(&self, index: u32) -> Rect {
        let left = self.first_left + index as f32 * (self.width + self.padding);
        Rect::new(left, left + self.width, self.top - self.height, self.top)
    }
}

/// One cached glyph of a text renderable: its UV buffer and metrics.
pub struct Glyph {
    uvs: wgpu::Buffer,
    info: CharInfo,
}

pub enum RenderKind {
    Flat,
    Texture {
        key: String,
    },
    Sprite {
        key: String,
        region: Rect,
        uvs: wgpu::Buffer,
    },
    AnimatedSprite {
        key: String,
        strip: SpriteStrip,
        animator: Animator,
        uvs: wgpu::Buffer,
    },
    Text {
        font_name: String,
        text: String,
        /// `None` for characters the font has no glyph for; they still
        /// occupy a character cell.
        glyphs: Vec<Option<Glyph>>,
    },
}

pub struct Renderable {
    pub transform: Transform,
    color: [f32; 4],
    kind: RenderKind,
}

impl Renderable {
    /// A solid-color quad. The color *is* the pixel output.
    pub fn flat(color: [f32; 4]) -> Self {
        Self {
            transform: Transform::new(),
            color,
            kind: RenderKind::Flat,
        }
    }

    /// A quad showing the whole texture under `key`. The default tint
    /// alpha of 0 leaves the texture unmodified.
    pub fn textured(key: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(),
            color: [1.0, 1.0, 1.0, 0.0],
            kind: RenderKind::Texture { key: key.into() },
        }
    }

    /// A sprite: a textured quad with its own UV window, initially the
    /// full texture.
    pub fn sprite(ctx: &Context, key: impl Into<String>) -> Self {
        let uvs = ctx.shaders.uv_buffer(&ctx.gpu, Rect::FULL);
        Self {
            transform: Transform::new(),
            color: [1.0, 1.0, 1.0, 0.0],
            kind: RenderKind::Sprite {
                key: key.into(),
                region: Rect::FULL,
                uvs,
            },
        }
    }

    /// An animated sprite walking a one-frame strip until
    /// [`set_sprite_sequence`](Self::set_sprite_sequence) is called.
    pub fn animated_sprite(ctx: &Context, key: impl Into<String>) -> Self {
        let strip = SpriteStrip {
            first_left: 0.0,
            top: 1.0,
            width: 1.0,
            height: 1.0,
            padding: 0.0,
            frame_count: 1,
        };
        let uvs = ctx.shaders.uv_buffer(&ctx.gpu, strip.frame_rect(0));
        Self {
            transform: Transform::new(),
            color: [1.0, 1.0, 1.0, 0.0],
            kind: RenderKind::AnimatedSprite {
                key: key.into(),
                strip,
                animator: Animator::new(AnimationKind::Forward, 1, 1),
                uvs,
            },
        }
    }

    /// A text renderable over the bitmap font `font_name` (both halves of
    /// the font must already be loaded). Sizes itself so each character
    /// cell is `height` world units tall.
    pub fn text(
        ctx: &Context,
        font_name: impl Into<String>,
        text: impl Into<String>,
        height: f32,
    ) -> Result<Self, EngineError> {
        let mut r = Self {
            transform: Transform::new(),
            color: [0.0, 0.0, 0.0, 1.0],
            kind: RenderKind::Text {
                font_name: font_name.into(),
                text: String::new(),
                glyphs: Vec::new(),
            },
        };
        r.set_text(ctx, text)?;
        r.set_text_height(ctx, height)?;
        Ok(r)
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// For flat quads this is the fill; for textured kinds a tint whose
    /// alpha is the blend weight (0 shows the raw texture).
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    pub fn kind(&self) -> &RenderKind {
        &self.kind
    }

    // ── Sprite region control ────────────────────────────────────────

    /// Set a sprite's UV window directly in texture coordinates.
    pub fn set_sprite_region(&mut self, ctx: &Context, region: Rect) {
        if let RenderKind::Sprite {
            region: current,
            uvs,
            ..
        } = &mut self.kind
        {
            *current = region;
            ctx.shaders.write_uvs(&ctx.gpu, uvs, region);
        }
    }

    /// Set a sprite's UV window in pixel coordinates of its texture.
    pub fn set_sprite_region_pixels(
        &mut self,
        ctx: &Context,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    ) -> Result<(), EngineError> {
        let RenderKind::Sprite { key, .. } = &self.kind else {
            return Ok(());
        };
        let tex = texture::get(&ctx.resources, key)?;
        let region = Rect::from_pixels(left, right, bottom, top, tex.width as f32, tex.height as f32);
        self.set_sprite_region(ctx, region);
        Ok(())
    }

    // ── Animation control ────────────────────────────────────────────

    /// Define the animation strip in pixel coordinates of the texture.
    /// `top`/`left` locate the first frame's top-left corner; frames are
    /// `width`x`height` with `padding` pixels between them. Restarts the
    /// animation.
    #[allow(clippy::too_many_arguments)]
    pub fn set_sprite_sequence(
        &mut self,
        ctx: &Context,
        top: f32,
        left: f32,
        width: f32,
        height: f32,
        frame_count: u32,
        padding: f32,
    ) -> Result<(), EngineError> {
        let RenderKind::AnimatedSprite {
            key,
            strip,
            animator,
            uvs,
        } = &mut self.kind
        else {
            return Ok(());
        };
        let tex = texture::get(&ctx.resources, key)?;
        let (tex_w, tex_h) = (tex.width as f32, tex.height as f32);

        *strip = SpriteStrip {
            first_left: left / tex_w,
            top: top / tex_h,
            width: width / tex_w,
            height: height / tex_h,
            padding: padding / tex_w,
            frame_count: frame_count.max(1),
        };
        let kind = animator.kind();
        let interval = animator.update_interval();
        *animator = Animator::new(kind, frame_count, interval);
        ctx.shaders
            .write_uvs(&ctx.gpu, uvs, strip.frame_rect(animator.current_frame()));
        Ok(())
    }

    pub fn set_animation_kind(&mut self, ctx: &Context, kind: AnimationKind) {
        if let RenderKind::AnimatedSprite {
            strip,
            animator,
            uvs,
            ..
        } = &mut self.kind
        {
            animator.set_kind(kind);
            ctx.shaders
                .write_uvs(&ctx.gpu, uvs, strip.frame_rect(animator.current_frame()));
        }
    }

    /// Updates per frame advance; larger is slower.
    pub fn set_animation_speed(&mut self, interval: u32) {
        if let RenderKind::AnimatedSprite { animator, .. } = &mut self.kind {
            animator.set_update_interval(interval);
        }
    }

    pub fn nudge_animation_speed(&mut self, delta: i32) {
        if let RenderKind::AnimatedSprite { animator, .. } = &mut self.kind {
            animator.nudge_update_interval(delta);
        }
    }

    /// Advance the animation by one game-loop update, rewriting the UV
    /// window when the frame steps. Call once per update.
    pub fn update_animation(&mut self, ctx: &Context) {
        if let RenderKind::AnimatedSprite {
            strip,
            animator,
            uvs,
            ..
        } = &mut self.kind
        {
            if animator.update() {
                ctx.shaders
                    .write_uvs(&ctx.gpu, uvs, strip.frame_rect(animator.current_frame()));
            }
        }
    }

    // ── Text control ─────────────────────────────────────────────────

    /// Replace the string, rebuilding the per-glyph UV cache. Characters
    /// the font lacks are kept as empty cells and logged once here.
    pub fn set_text(&mut self, ctx: &Context, text: impl Into<String>) -> Result<(), EngineError> {
        let RenderKind::Text {
            font_name,
            text: current,
            glyphs,
        } = &mut self.kind
        else {
            return Ok(());
        };
        let new_text = text.into();
        glyphs.clear();
        for ch in new_text.chars() {
            match font::char_info(&ctx.resources, font_name, ch)? {
                Some(info) => glyphs.push(Some(Glyph {
                    uvs: ctx.shaders.uv_buffer(&ctx.gpu, info.uv),
                    info,
                })),
                None => {
                    log::warn!("font '{font_name}' has no glyph for {ch:?}");
                    glyphs.push(None);
                }
            }
        }
        *current = new_text;
        Ok(())
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            RenderKind::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Size the transform so character cells are `height` world units
    /// tall, using the font's 'A' for the aspect ratio.
    pub fn set_text_height(&mut self, ctx: &Context, height: f32) -> Result<(), EngineError> {
        let RenderKind::Text {
            font_name, text, ..
        } = &self.kind
        else {
            return Ok(());
        };
        let aspect = font::char_info(&ctx.resources, font_name, 'A')?
            .map(|info| info.aspect_ratio)
            .unwrap_or(1.0);
        let cell_width = height * aspect;
        let count = text.chars().count() as f32;
        self.transform.set_size(cell_width * count, height);
        Ok(())
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Record this renderable's draw calls into the frame under `camera`.
    pub fn draw(
        &self,
        ctx: &Context,
        camera: &Camera,
        frame: &mut Frame,
    ) -> Result<(), EngineError> {
        let view_proj = camera.view_proj();
        match &self.kind {
            RenderKind::Flat => {
                let uniform = DrawUniform::new(view_proj, self.transform.matrix(), self.color);
                ctx.shaders.draw_flat(&ctx.gpu, frame, uniform);
            }
            RenderKind::Texture { key } => {
                let tex = texture::get(&ctx.resources, key)
                    .map_err(|_| EngineError::MissingResource(key.clone()))?;
                let uniform = DrawUniform::new(view_proj, self.transform.matrix(), self.color);
                ctx.shaders
                    .draw_textured(&ctx.gpu, frame, uniform, &tex.bind_group, None);
            }
            RenderKind::Sprite { key, uvs, .. }
            | RenderKind::AnimatedSprite { key, uvs, .. } => {
                let tex = texture::get(&ctx.resources, key)
                    .map_err(|_| EngineError::MissingResource(key.clone()))?;
                let uniform = DrawUniform::new(view_proj, self.transform.matrix(), self.color);
                ctx.shaders
                    .draw_textured(&ctx.gpu, frame, uniform, &tex.bind_group, Some(uvs));
            }
            RenderKind::Text {
                font_name, glyphs, ..
            } => {
                let atlas = texture::get(&ctx.resources, &font::image_name(font_name))
                    .map_err(|_| EngineError::MissingResource(font_name.clone()))?;

                let count = glyphs.len().max(1) as f32;
                let cell_width = self.transform.size().x / count;
                let cell_height = self.transform.size().y;
                let origin = self.transform.position();

                let mut x_pos = origin.x;
                for glyph in glyphs {
                    if let Some(glyph) = glyph {
                        let (pos, size) = glyph_placement(
                            cell_width,
                            cell_height,
                            Vec2::new(x_pos, origin.y),
                            &glyph.info,
                        );
                        let mut cell = Transform::new();
                        cell.set_position(pos.x, pos.y);
                        cell.set_size(size.x, size.y);

                        let uniform = DrawUniform::new(view_proj, cell.matrix(), self.color);
                        ctx.shaders.draw_textured(
                            &ctx.gpu,
                            frame,
                            uniform,
                            &atlas.bind_group,
                            Some(&glyph.uvs),
                        );
                    }
                    x_pos += cell_width;
                }
            }
        }
        Ok(())
    }
}

/// Where one glyph quad sits inside its character cell: center position
/// and size in world units.
fn glyph_placement(cell_width: f32, cell_height: f32, cell_pos: Vec2, info: &CharInfo) -> (Vec2, Vec2) {
    let size = Vec2::new(cell_width * info.width, cell_height * info.height);
    let offset = Vec2::new(
        cell_width * info.width_offset * 0.5,
        cell_height * info.height_offset * 0.5,
    );
    (cell_pos - offset, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_frames_advance_by_width_plus_padding() {
        let strip = SpriteStrip {
            first_left: 0.1,
            top: 0.8,
            width: 0.2,
            height: 0.25,
            padding: 0.05,
            frame_count: 3,
        };
        let f0 = strip.frame_rect(0);
        assert!((f0.left - 0.1).abs() < 1e-6);
        assert!((f0.right - 0.3).abs() < 1e-6);
        assert!((f0.top - 0.8).abs() < 1e-6);
        assert!((f0.bottom - 0.55).abs() < 1e-6);

        let f2 = strip.frame_rect(2);
        assert!((f2.left - 0.6).abs() < 1e-6);
        assert!((f2.right - 0.8).abs() < 1e-6);
    }

    #[test]
    fn glyph_fills_its_cell_when_metrics_are_unit() {
        let info = CharInfo {
            uv: Rect::FULL,
            width: 1.0,
            height: 1.0,
            width_offset: 0.0,
            height_offset: 0.0,
            aspect_ratio: 1.0,
        };
        let (pos, size) = glyph_placement(2.0, 3.0, Vec2::new(5.0, 7.0), &info);
        assert_eq!(pos, Vec2::new(5.0, 7.0));
        assert_eq!(size, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn glyph_offsets_shift_against_the_pen() {
        let info = CharInfo {
            uv: Rect::FULL,
            width: 0.5,
            height: 0.75,
            width_offset: 0.2,
            height_offset: 0.4,
            aspect_ratio: 1.0,
        };
        let (pos, size) = glyph_placement(2.0, 4.0, Vec2::new(0.0, 0.0), &info);
        assert_eq!(size, Vec2::new(1.0, 3.0));
        assert!((pos.x - (-0.2)).abs() < 1e-6);
        assert!((pos.y - (-0.8)).abs() < 1e-6);
    }
}
