//! Rendering: GPU context, shader pipelines, frames, and cameras.

pub mod camera;
pub mod frame;
pub mod gpu;
pub mod shader;

pub use camera::Camera;
pub use frame::Frame;
pub use gpu::GpuContext;
pub use shader::Shaders;
