//! Portal: sprites, animation, and bitmap text in one scene.
//!
//! Arrow keys move the hero (wrapping at the right edge), the minions
//! swing through their animation strip, and a status line tracks the
//! hero. Q quits.
//!
//! Expects `assets/minion_sprite.png` and the `assets/fonts/system` font
//! pair next to the working directory.

use eldr::prelude::*;

const SPRITE_SHEET: &str = "assets/minion_sprite.png";
const FONT: &str = "assets/fonts/system";

struct Portal {
    camera: Option<Camera>,
    hero: Option<Renderable>,
    minions: Vec<Renderable>,
    status: Option<Renderable>,
}

impl Portal {
    fn new() -> Self {
        Self {
            camera: None,
            hero: None,
            minions: Vec::new(),
            status: None,
        }
    }
}

impl Scene for Portal {
    fn load(&mut self, ctx: &mut Context) {
        ctx.load_texture(SPRITE_SHEET);
        ctx.load_font(FONT);
    }

    fn init(&mut self, ctx: &mut Context) {
        self.camera = Some(Camera::new(
            Vec2::new(20.0, 60.0),
            20.0,
            [20.0, 40.0, 600.0, 300.0],
        ));

        // The hero is a static region of the sheet.
        let mut hero = Renderable::sprite(&*ctx, SPRITE_SHEET);
        hero.set_sprite_region_pixels(&*ctx, 0.0, 120.0, 0.0, 180.0)
            .expect("sprite sheet loaded in init");
        hero.transform.set_position(20.0, 60.0);
        hero.transform.set_size(2.0, 3.0);
        self.hero = Some(hero);

        // Two minions walking the same strip in different directions.
        for (y, kind) in [(65.0, AnimationKind::Swing), (56.0, AnimationKind::Backward)] {
            let mut minion = Renderable::animated_sprite(&*ctx, SPRITE_SHEET);
            minion
                .set_sprite_sequence(&*ctx, 512.0, 0.0, 204.0, 164.0, 5, 0.0)
                .expect("sprite sheet loaded in init");
            minion.set_animation_kind(&*ctx, kind);
            minion.set_animation_speed(12);
            minion.transform.set_position(26.0, y);
            minion.transform.set_size(3.0, 2.4);
            self.minions.push(minion);
        }

        let mut status =
            Renderable::text(&*ctx, FONT, "Status: ready", 1.0).expect("font loaded in init");
        status.set_color([0.0, 0.0, 0.0, 1.0]);
        status.transform.set_position(12.0, 64.0);
        self.status = Some(status);
    }

    fn update(&mut self, ctx: &mut Context) -> Transition {
        if ctx.input.just_pressed(KeyCode::KeyQ) {
            return Transition::Stop;
        }

        let hero = self.hero.as_mut().expect("init ran");
        const SPEED: f32 = 0.05; // world units per update
        if ctx.input.pressed(KeyCode::ArrowRight) {
            hero.transform.translate(SPEED, 0.0);
            if hero.transform.position().x > 30.0 {
                hero.transform.set_position(10.0, 60.0);
            }
        }
        if ctx.input.pressed(KeyCode::ArrowLeft) {
            hero.transform.translate(-SPEED, 0.0);
        }

        for minion in &mut self.minions {
            minion.update_animation(&*ctx);
        }

        let x = hero.transform.position().x;
        let status = self.status.as_mut().expect("init ran");
        status
            .set_text(&*ctx, format!("Status: hero x = {x:.2}"))
            .expect("font stays loaded");

        Transition::Continue
    }

    fn draw(&self, ctx: &Context, frame: &mut Frame) -> Result<(), EngineError> {
        let camera = self.camera.as_ref().expect("init ran");
        camera.set_view_and_clear(&ctx.gpu, &ctx.shaders, frame);

        for minion in &self.minions {
            minion.draw(ctx, camera, frame)?;
        }
        self.hero.as_ref().expect("init ran").draw(ctx, camera, frame)?;
        self.status.as_ref().expect("init ran").draw(ctx, camera, frame)?;
        Ok(())
    }

    fn unload(&mut self, ctx: &mut Context) {
        ctx.unload(SPRITE_SHEET);
        ctx.unload_font(FONT);
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    Game::new("eldr - portal")
        .canvas_size(640, 480)
        .run(Box::new(Portal::new()))
}
