//! # Scenes: The Game's Unit of Organization
//!
//! A [`Scene`] is one self-contained stage of a game (a level, a menu, a
//! cutscene) with a strict lifecycle the loop enforces:
//!
//! ```text
//! load ──► [barrier: all pending resources resolve] ──► init
//!                                                        │
//!                       ┌────────────────────────────────┤
//!                       ▼                                ▼
//!                update (fixed step) ◄────────────► draw (per frame)
//!                       │
//!          Transition::Next ──► unload ──► next scene's load ...
//!          Transition::Stop ──► unload ──► loop exits
//! ```
//!
//! `load` only *requests* resources; it must not touch them. By the time
//! `init` runs, every request has resolved (the loop waits on the resource
//! map), so `init` can build renderables from loaded data without
//! checking. `unload` releases what `load` requested; a scene that skips
//! this leaks references and keeps its resources alive.

use crate::context::Context;
use crate::error::EngineError;
use crate::render::Frame;

/// What the loop should do after an update.
pub enum Transition {
    /// Keep running this scene.
    Continue,
    /// Unload this scene and start the given one.
    Next(Box<dyn Scene>),
    /// Unload this scene and exit the loop.
    Stop,
}

pub trait Scene {
    /// Request resources. Runs once, before anything is loaded; do not
    /// read resources here.
    fn load(&mut self, ctx: &mut Context);

    /// Build initial state. Every resource requested in `load` is
    /// resolved by now.
    fn init(&mut self, ctx: &mut Context);

    /// One fixed-timestep update.
    fn update(&mut self, ctx: &mut Context) -> Transition;

    /// Record this scene's draws into the frame.
    fn draw(&self, ctx: &Context, frame: &mut Frame) -> Result<(), EngineError>;

    /// Release the resources requested in `load`.
    fn unload(&mut self, ctx: &mut Context);
}
