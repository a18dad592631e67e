//! Sprites: the three animation kinds side by side.
//!
//! Three copies of the same strip run Forward, Backward, and Swing.
//! Digits 1/2/3 set every sprite to that kind; Up/Down arrows change the
//! animation speed; Q quits.
//!
//! Expects `assets/minion_sprite.png`.

use eldr::prelude::*;

const SPRITE_SHEET: &str = "assets/minion_sprite.png";

struct Sprites {
    camera: Option<Camera>,
    minions: Vec<Renderable>,
}

impl Scene for Sprites {
    fn load(&mut self, ctx: &mut Context) {
        ctx.load_texture(SPRITE_SHEET);
    }

    fn init(&mut self, ctx: &mut Context) {
        self.camera = Some(Camera::new(
            Vec2::new(0.0, 0.0),
            30.0,
            [0.0, 0.0, 640.0, 480.0],
        ));

        let kinds = [
            AnimationKind::Forward,
            AnimationKind::Backward,
            AnimationKind::Swing,
        ];
        for (i, kind) in kinds.into_iter().enumerate() {
            let mut minion = Renderable::animated_sprite(&*ctx, SPRITE_SHEET);
            minion
                .set_sprite_sequence(&*ctx, 512.0, 0.0, 204.0, 164.0, 5, 0.0)
                .expect("sheet loaded in init");
            minion.set_animation_kind(&*ctx, kind);
            minion.set_animation_speed(10);
            minion.transform.set_position(0.0, 7.0 - 7.0 * i as f32);
            minion.transform.set_size(6.0, 4.8);
            self.minions.push(minion);
        }
    }

    fn update(&mut self, ctx: &mut Context) -> Transition {
        if ctx.input.just_pressed(KeyCode::KeyQ) {
            return Transition::Stop;
        }

        let picked = [
            (KeyCode::Digit1, AnimationKind::Forward),
            (KeyCode::Digit2, AnimationKind::Backward),
            (KeyCode::Digit3, AnimationKind::Swing),
        ]
        .into_iter()
        .find(|(key, _)| ctx.input.just_pressed(*key));
        if let Some((_, kind)) = picked {
            for minion in &mut self.minions {
                minion.set_animation_kind(&*ctx, kind);
            }
        }

        // Larger interval is slower.
        if ctx.input.just_pressed(KeyCode::ArrowDown) {
            for minion in &mut self.minions {
                minion.nudge_animation_speed(2);
            }
        }
        if ctx.input.just_pressed(KeyCode::ArrowUp) {
            for minion in &mut self.minions {
                minion.nudge_animation_speed(-2);
            }
        }

        for minion in &mut self.minions {
            minion.update_animation(&*ctx);
        }
        Transition::Continue
    }

    fn draw(&self, ctx: &Context, frame: &mut Frame) -> Result<(), EngineError> {
        let camera = self.camera.as_ref().expect("init ran");
        camera.set_view_and_clear(&ctx.gpu, &ctx.shaders, frame);
        for minion in &self.minions {
            minion.draw(ctx, camera, frame)?;
        }
        Ok(())
    }

    fn unload(&mut self, ctx: &mut Context) {
        ctx.unload(SPRITE_SHEET);
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    Game::new("eldr - sprites")
        .canvas_size(640, 480)
        .run(Box::new(Sprites {
            camera: None,
            minions: Vec::new(),
        }))
}
