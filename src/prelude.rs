//! Convenience re-exports: `use eldr::prelude::*` for the common items.

pub use crate::animation::{AnimationKind, Animator};
pub use crate::context::Context;
pub use crate::error::EngineError;
pub use crate::game::{Game, UPDATES_PER_SECOND};
pub use crate::input::{Input, KeyCode};
pub use crate::level;
pub use crate::math::{Mat4, Rect, Transform, Vec2, Vec3, Vec4};
pub use crate::render::{Camera, Frame, GpuContext, Shaders};
pub use crate::renderable::{RenderKind, Renderable, SpriteStrip};
pub use crate::resources::{font, text, texture, xml, Artifact, Codec, ResourceMap};
pub use crate::scene::{Scene, Transition};

#[cfg(feature = "audio")]
pub use crate::audio::{AudioEngine, SoundData};
