// MODEL: camera state and scene data
pub mod camera;
pub mod mesh;
pub mod scene;

pub use camera::{CameraRig, MoveDirection};
pub use mesh::{cube_mesh, Mesh, MeshBuffer, Vertex};
pub use scene::Scene;
