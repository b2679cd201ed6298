// CONTROLLER: input state and camera update logic
pub mod camera_controller;
pub mod input;

pub use camera_controller::CameraController;
pub use input::InputState;
