//! Blue level: XML-driven scenes and scene switching.
//!
//! Two scenes load their camera and squares from level files and swap on
//! N; Q quits from either. With the `audio` feature each scene owns a
//! background track that starts at `init` and stops at `unload`.
//!
//! Expects `assets/level.xml` and `assets/blue_level.xml`.

use eldr::prelude::*;

struct Level {
    name: &'static str,
    file: &'static str,
    /// Level file of the scene N switches to.
    next_file: &'static str,
    #[cfg(feature = "audio")]
    background: &'static str,
    camera: Option<Camera>,
    squares: Vec<Renderable>,
}

fn gray_level() -> Level {
    Level {
        name: "gray",
        file: "assets/level.xml",
        next_file: "assets/blue_level.xml",
        #[cfg(feature = "audio")]
        background: "assets/bg_clip.mp3",
        camera: None,
        squares: Vec::new(),
    }
}

fn blue_level() -> Level {
    Level {
        name: "blue",
        file: "assets/blue_level.xml",
        next_file: "assets/level.xml",
        #[cfg(feature = "audio")]
        background: "assets/blue_level_clip.mp3",
        camera: None,
        squares: Vec::new(),
    }
}

fn level_for(file: &str) -> Level {
    if file.contains("blue") {
        blue_level()
    } else {
        gray_level()
    }
}

impl Scene for Level {
    fn load(&mut self, ctx: &mut Context) {
        ctx.load_xml(self.file);
        #[cfg(feature = "audio")]
        ctx.load_sound(self.background);
    }

    fn init(&mut self, ctx: &mut Context) {
        let root = xml::get(&ctx.resources, self.file).expect("level resolved by the barrier");
        let spec = level::parse(root).expect("well-formed level");
        self.camera = Some(spec.camera.build());
        self.squares = spec.build_squares();
        log::info!("level '{}' up: {} squares", self.name, self.squares.len());

        #[cfg(feature = "audio")]
        if let Some(audio) = &mut ctx.audio {
            if let Err(e) = audio.play_background(&ctx.resources, self.background, 0.5) {
                log::warn!("background audio: {e}");
            }
        }
    }

    fn update(&mut self, ctx: &mut Context) -> Transition {
        if ctx.input.just_pressed(KeyCode::KeyQ) {
            return Transition::Stop;
        }
        if ctx.input.just_pressed(KeyCode::KeyN) {
            return Transition::Next(Box::new(level_for(self.next_file)));
        }

        // Nudge the first square so the scene visibly runs.
        if let Some(square) = self.squares.first_mut() {
            square.transform.rotate(0.03);
        }
        Transition::Continue
    }

    fn draw(&self, ctx: &Context, frame: &mut Frame) -> Result<(), EngineError> {
        let camera = self.camera.as_ref().expect("init ran");
        camera.set_view_and_clear(&ctx.gpu, &ctx.shaders, frame);
        for square in &self.squares {
            square.draw(ctx, camera, frame)?;
        }
        Ok(())
    }

    fn unload(&mut self, ctx: &mut Context) {
        #[cfg(feature = "audio")]
        {
            if let Some(audio) = &mut ctx.audio {
                audio.stop_background();
            }
            ctx.unload(self.background);
        }
        ctx.unload(self.file);
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    Game::new("eldr - blue level")
        .canvas_size(640, 480)
        .run(Box::new(gray_level()))
}
