// VIEW: GPU setup, shader programs, textures, rendering
pub mod gpu_init;
pub mod render;
pub mod shader;
pub mod texture;

pub use gpu_init::GpuContext;
pub use render::ProgramBinding;
pub use shader::{read_shader_source, ShaderError, ShaderProgram, ShaderStage};
pub use texture::SceneTexture;
