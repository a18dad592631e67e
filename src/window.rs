//! Window management and the winit event loop driver.
//!
//! [`App`] implements [`winit::application::ApplicationHandler`] and runs
//! the scene lifecycle: window + GPU bring-up on resume, the scene's
//! `load`, the resource barrier, `init`, then the steady draw/update loop
//! inside `RedrawRequested`. Scene transitions re-enter the loading state;
//! the whole chain tears down when a scene stops or the window closes.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::context::Context;
use crate::game::{Game, LoopTimer};
use crate::render::Frame;
use crate::scene::{Scene, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    /// No window or GPU yet.
    Unloaded,
    /// Scene `load` has run; waiting to resolve resources and `init`.
    Loading,
    Running,
    Stopping,
}

/// Reports the first draw failure of a scene, then goes quiet until the
/// next scene starts. A renderable referencing a missing resource fails
/// identically every frame; one loud report, not a 60 Hz warning stream.
#[derive(Debug, Default)]
struct DrawFailureGate {
    reported: bool,
}

impl DrawFailureGate {
    fn arm(&mut self) {
        self.reported = false;
    }

    /// True exactly once per armed period.
    fn first(&mut self) -> bool {
        !std::mem::replace(&mut self.reported, true)
    }
}

pub(crate) struct App {
    config: Game,
    window: Option<Arc<Window>>,
    ctx: Option<Context>,
    scene: Box<dyn Scene>,
    state: LoopState,
    timer: LoopTimer,
    draw_failures: DrawFailureGate,
}

impl App {
    pub fn new(config: Game, scene: Box<dyn Scene>) -> Self {
        Self {
            config,
            window: None,
            ctx: None,
            scene,
            state: LoopState::Unloaded,
            timer: LoopTimer::new(),
            draw_failures: DrawFailureGate::default(),
        }
    }

    /// Join the scene's pending loads and run `init`. A load failure is
    /// fatal for the whole game: a scene never starts half-provisioned.
    fn finish_loading(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = &mut self.ctx else { return };
        match ctx.resources.wait_on_all_pending() {
            Ok(()) => {
                self.scene.init(ctx);
                self.state = LoopState::Running;
                self.timer.reset();
                self.draw_failures.arm();
            }
            Err(e) => {
                log::error!("scene startup failed: {e}");
                self.state = LoopState::Stopping;
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.canvas_size;
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(width as f64, height as f64));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut ctx = match Context::new(window.clone(), self.config.canvas) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("engine bring-up failed: {e}");
                event_loop.exit();
                return;
            }
        };

        self.scene.load(&mut ctx);
        self.state = LoopState::Loading;
        self.ctx = Some(ctx);

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested, exiting");
                if let Some(ctx) = &mut self.ctx {
                    if matches!(self.state, LoopState::Loading | LoopState::Running) {
                        self.scene.unload(ctx);
                    }
                }
                self.state = LoopState::Stopping;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(ctx) = &mut self.ctx {
                    ctx.gpu.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(ctx) = &mut self.ctx {
                        match event.state {
                            ElementState::Pressed => ctx.input.press(key_code),
                            ElementState::Released => ctx.input.release(key_code),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if self.state == LoopState::Loading {
                    self.finish_loading(event_loop);
                }
                if self.state != LoopState::Running {
                    return;
                }
                let Some(ctx) = &mut self.ctx else { return };

                // Draw first so the screen reflects the last completed
                // update, then run however many fixed updates are due.
                match Frame::begin(&mut ctx.gpu, ctx.canvas) {
                    Ok(mut frame) => {
                        if let Err(e) = self.scene.draw(ctx, &mut frame) {
                            if self.draw_failures.first() {
                                log::error!("scene draw failed: {e}");
                            }
                        }
                        frame.finish(&ctx.gpu);
                    }
                    Err(e) => log::warn!("skipping frame: {e}"),
                }

                for _ in 0..self.timer.due_updates() {
                    let transition = self.scene.update(ctx);
                    ctx.input.end_tick();
                    match transition {
                        Transition::Continue => {}
                        Transition::Next(next) => {
                            self.scene.unload(ctx);
                            self.scene = next;
                            self.scene.load(ctx);
                            self.state = LoopState::Loading;
                            break;
                        }
                        Transition::Stop => {
                            self.scene.unload(ctx);
                            self.state = LoopState::Stopping;
                            event_loop.exit();
                            break;
                        }
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DrawFailureGate;

    #[test]
    fn failure_gate_reports_once_per_scene() {
        let mut gate = DrawFailureGate::default();
        assert!(gate.first());
        assert!(!gate.first());
        assert!(!gate.first());

        gate.arm();
        assert!(gate.first());
        assert!(!gate.first());
    }
}
