// Re-export all public modules so they can be used from main.rs
pub mod logging;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;

pub use controller::{CameraController, InputState};
pub use model::{cube_mesh, CameraRig, MoveDirection, Scene, Vertex};
pub use view::{GpuContext, ShaderError, ShaderProgram};
