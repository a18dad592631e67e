//! The engine context handed to scenes.
//!
//! [`Context`] bundles everything a scene touches: the GPU, the shader
//! pipelines, the resource map, keyboard input, and (with the `audio`
//! feature) the audio engine. Scenes receive `&mut Context` in their
//! lifecycle methods; the convenience `load_*` wrappers route loads
//! through the resource map with the right codec.

use std::sync::Arc;

use crate::error::EngineError;
use crate::input::{Input, KeyCode};
use crate::render::frame::CanvasColor;
use crate::render::{GpuContext, Shaders};
use crate::resources::{Codec, LoadTicket, ResourceMap, TextureUploader};

pub struct Context {
    pub gpu: GpuContext,
    pub shaders: Shaders,
    pub resources: ResourceMap,
    pub input: Input<KeyCode>,
    pub canvas: CanvasColor,
    /// `None` when the audio backend failed to initialize; the engine
    /// runs silent rather than refusing to start.
    #[cfg(feature = "audio")]
    pub audio: Option<crate::audio::AudioEngine>,
}

impl Context {
    pub(crate) fn new(
        window: Arc<winit::window::Window>,
        canvas: CanvasColor,
    ) -> Result<Self, EngineError> {
        let gpu = GpuContext::new(window)?;
        let shaders = Shaders::new(&gpu)?;
        #[cfg(feature = "audio")]
        let audio = match crate::audio::AudioEngine::new() {
            Ok(engine) => Some(engine),
            Err(e) => {
                log::warn!("audio unavailable, running silent: {e}");
                None
            }
        };
        Ok(Self {
            gpu,
            shaders,
            resources: ResourceMap::new(),
            input: Input::new(),
            canvas,
            #[cfg(feature = "audio")]
            audio,
        })
    }

    pub fn texture_uploader(&self) -> TextureUploader {
        self.shaders.uploader(&self.gpu)
    }

    pub fn load_text(&mut self, key: &str) -> Option<LoadTicket> {
        self.resources.load(key, Codec::Text)
    }

    pub fn load_xml(&mut self, key: &str) -> Option<LoadTicket> {
        self.resources.load(key, Codec::Xml)
    }

    pub fn load_texture(&mut self, key: &str) -> Option<LoadTicket> {
        let uploader = self.texture_uploader();
        self.resources.load(key, Codec::Texture(uploader))
    }

    /// Request both halves of a bitmap font under its base name.
    pub fn load_font(&mut self, font_name: &str) -> Vec<LoadTicket> {
        let uploader = self.texture_uploader();
        crate::resources::font::load(&mut self.resources, font_name, uploader)
    }

    pub fn unload_font(&mut self, font_name: &str) -> bool {
        crate::resources::font::unload(&mut self.resources, font_name)
    }

    #[cfg(feature = "audio")]
    pub fn load_sound(&mut self, key: &str) -> Option<LoadTicket> {
        self.resources.load(key, Codec::Sound)
    }

    pub fn unload(&mut self, key: &str) -> bool {
        self.resources.unload(key)
    }
}
