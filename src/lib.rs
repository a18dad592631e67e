//! # Eldr: A Teaching 2D Game Engine
//!
//! A small scene-based 2D engine built on winit and wgpu: ref-counted
//! async resource loading, camera viewports over world coordinates, a
//! renderable ladder from flat quads up to animated sprites and bitmap
//! text, and a fixed-timestep scene loop.
//!
//! Start with `use eldr::prelude::*`, implement [`Scene`](scene::Scene),
//! and hand it to [`Game::run`](game::Game::run).

pub mod animation;
pub mod context;
pub mod error;
pub mod game;
pub mod input;
pub mod level;
pub mod math;
pub mod prelude;
pub mod render;
pub mod renderable;
pub mod resources;
pub mod scene;
pub(crate) mod window;

#[cfg(feature = "audio")]
pub mod audio;
