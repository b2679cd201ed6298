use std::collections::HashSet;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Keyboard state plus the toggles derived from it.
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
    pub wireframe_mode: bool,
    pub quit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            wireframe_mode: false,
            quit_requested: false,
        }
    }

    pub fn process_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(code);
                match code {
                    KeyCode::Escape => self.quit_requested = true,
                    // 1/2 select fill / wireframe raster mode
                    KeyCode::Digit1 => self.wireframe_mode = false,
                    KeyCode::Digit2 => self.wireframe_mode = true,
                    _ => {}
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&code);
            }
        }
    }

    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed_keys.contains(&code)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_mode_toggles() {
        let mut input = InputState::new();
        assert!(!input.wireframe_mode);
        input.process_key(KeyCode::Digit2, ElementState::Pressed);
        assert!(input.wireframe_mode);
        input.process_key(KeyCode::Digit1, ElementState::Pressed);
        assert!(!input.wireframe_mode);
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputState::new();
        input.process_key(KeyCode::Escape, ElementState::Pressed);
        assert!(input.quit_requested);
    }

    #[test]
    fn release_clears_pressed_key() {
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.is_pressed(KeyCode::KeyW));
        input.process_key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_pressed(KeyCode::KeyW));
    }
}
