//! Texture resources: decoded images uploaded to the GPU.
//!
//! A texture's decode *and* upload both happen on the load worker. That
//! works because wgpu devices, queues, bind group layouts and samplers are
//! internally reference counted and `Clone + Send`; the [`TextureUploader`]
//! carried inside `Codec::Texture` is exactly that bundle of cloned
//! handles. By the time the loading barrier returns, the artifact is a
//! ready-to-bind GPU texture, not pixel bytes.

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::error::EngineError;

use super::{Codec, LoadTicket, ResourceMap};

/// A GPU-resident texture: its bind group (view + sampler) and the source
/// image dimensions in pixels.
pub struct Texture {
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

/// Cloned GPU handles a load worker needs to turn a decoded image into a
/// bound [`Texture`].
#[derive(Clone)]
pub struct TextureUploader {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) layout: wgpu::BindGroupLayout,
    pub(crate) sampler: wgpu::Sampler,
}

impl TextureUploader {
    /// Upload `img` and build its bind group against the texture layout.
    pub(crate) fn upload(&self, label: &str, img: &RgbaImage) -> Texture {
        let (width, height) = img.dimensions();

        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Texture {
            bind_group,
            width,
            height,
        }
    }
}

pub fn load(map: &mut ResourceMap, key: &str, uploader: TextureUploader) -> Option<LoadTicket> {
    map.load(key, Codec::Texture(uploader))
}

/// The uploaded texture for `key`, or [`EngineError::NotLoaded`].
pub fn get<'a>(map: &'a ResourceMap, key: &str) -> Result<&'a Texture, EngineError> {
    map.get(key)?
        .as_texture()
        .ok_or_else(|| EngineError::NotLoaded(key.to_string()))
}

pub fn unload(map: &mut ResourceMap, key: &str) -> bool {
    map.unload(key)
}
