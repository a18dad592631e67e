//! # The Game Loop: Fixed Updates, Free-Running Draws
//!
//! The loop runs scene updates at a fixed 60 steps per second regardless
//! of how fast frames render. Each redraw draws once, then runs as many
//! fixed updates as wall-clock time has accumulated:
//!
//! ```text
//! redraw ──► draw ──► lag += elapsed ──► while lag >= TICK { update; lag -= TICK }
//! ```
//!
//! Fixed steps keep gameplay deterministic: movement per update is a
//! constant, so a slow machine gets fewer *frames* but the same
//! *simulation*. A stall produces a burst of catch-up updates rather than
//! a longer step.
//!
//! [`Game`] is the entry point: configure the window, then [`Game::run`]
//! with the opening [`Scene`]. `run` blocks until the scene chain ends
//! with [`Transition::Stop`](crate::scene::Transition::Stop) or the window
//! closes.

use std::time::{Duration, Instant};

use winit::event_loop::EventLoop;

use crate::error::EngineError;
use crate::render::frame::CanvasColor;
use crate::scene::Scene;
use crate::window::App;

/// Fixed update rate of the scene loop.
pub const UPDATES_PER_SECOND: u32 = 60;

pub(crate) const TICK: Duration = Duration::from_micros(1_000_000 / UPDATES_PER_SECOND as u64);

/// Accumulates wall-clock time and doles it out in fixed ticks.
pub(crate) struct LoopTimer {
    previous: Instant,
    lag: Duration,
}

impl LoopTimer {
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            lag: Duration::ZERO,
        }
    }

    /// Forget accumulated time. Called after loading stalls so the first
    /// running frame doesn't replay the stall as a burst of updates.
    pub fn reset(&mut self) {
        self.previous = Instant::now();
        self.lag = Duration::ZERO;
    }

    /// Account the time since the last call and return how many fixed
    /// updates are now due.
    pub fn due_updates(&mut self) -> u32 {
        let now = Instant::now();
        self.lag += now - self.previous;
        self.previous = now;
        drain_ticks(&mut self.lag)
    }
}

fn drain_ticks(lag: &mut Duration) -> u32 {
    let mut updates = 0;
    while *lag >= TICK {
        *lag -= TICK;
        updates += 1;
    }
    updates
}

/// Window configuration and loop entry point.
pub struct Game {
    pub(crate) title: String,
    pub(crate) canvas_size: (u32, u32),
    pub(crate) canvas: CanvasColor,
}

impl Game {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            canvas_size: (640, 480),
            canvas: CanvasColor::default(),
        }
    }

    /// Window inner size in pixels.
    pub fn canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_size = (width, height);
        self
    }

    /// Clear color of the canvas outside any camera viewport.
    pub fn canvas_color(mut self, color: [f64; 4]) -> Self {
        self.canvas = CanvasColor(color);
        self
    }

    /// Run the loop starting from `scene`. Blocks until the game stops.
    pub fn run(self, scene: Box<dyn Scene>) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::InvalidState(format!("event loop creation failed: {e}")))?;
        event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

        let mut app = App::new(self, scene);
        event_loop
            .run_app(&mut app)
            .map_err(|e| EngineError::InvalidState(format!("event loop error: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_matches_update_rate() {
        assert_eq!(TICK, Duration::from_micros(16_666));
    }

    #[test]
    fn drain_yields_one_update_per_tick() {
        let mut lag = Duration::from_millis(50);
        assert_eq!(drain_ticks(&mut lag), 3);
        assert_eq!(lag, Duration::from_millis(50) - 3 * TICK);
        assert!(lag < TICK);
    }

    #[test]
    fn drain_keeps_sub_tick_remainders() {
        let mut lag = Duration::from_millis(10);
        assert_eq!(drain_ticks(&mut lag), 0);
        assert_eq!(lag, Duration::from_millis(10));

        lag += Duration::from_millis(10);
        assert_eq!(drain_ticks(&mut lag), 1);
    }
}
