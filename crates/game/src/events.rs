//! Window and device event handling for GameState.

use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::CursorGrabMode;

use crate::state::GamePhase;

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return false;
                };
                self.input.process_keyboard(key, event.state);
                if !event.state.is_pressed() || event.repeat {
                    return false;
                }

                match key {
                    KeyCode::Escape => self.release_cursor(),
                    KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => self.continue_session(),
                    _ => {}
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                // Seen before capture, so the click that captures never fires.
                self.input.process_mouse_button(button, state);

                if state == ElementState::Pressed && button == MouseButton::Left {
                    match self.session.phase {
                        GamePhase::Playing => {
                            if !self.input.is_cursor_locked() {
                                self.capture_cursor();
                            }
                        }
                        GamePhase::Loading => {}
                        GamePhase::MainMenu | GamePhase::Won | GamePhase::Failed => self.continue_session(),
                    }
                }
                false
            }
            WindowEvent::Touch(touch) => {
                self.handle_touch(touch);
                false
            }
            WindowEvent::Focused(false) => {
                self.release_cursor();
                false
            }
            _ => false,
        }
    }

    /// Handle device events (e.g. raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.is_cursor_locked() {
                self.input.process_mouse_motion(delta);
            }
        }
    }

    /// One finger drags the view; other fingers are ignored.
    fn handle_touch(&mut self, touch: Touch) {
        let at = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => {
                if self.look_touch.is_none() {
                    self.look_touch = Some((touch.id, at));
                }
            }
            TouchPhase::Moved => {
                if let Some((id, last)) = self.look_touch {
                    if id == touch.id {
                        self.input.process_touch_drag(at - last);
                        self.look_touch = Some((id, at));
                    }
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.look_touch.is_some_and(|(id, _)| id == touch.id) {
                    self.look_touch = None;
                }
            }
        }
    }

    /// Leave the menu or a result screen, or skip the wait for clue text.
    fn continue_session(&mut self) {
        match self.session.phase {
            GamePhase::MainMenu | GamePhase::Won | GamePhase::Failed => {
                self.session.advance(self.audio.as_mut());
            }
            GamePhase::Loading => self.session.skip_loading(self.audio.as_mut()),
            GamePhase::Playing => {}
        }
    }

    pub(crate) fn capture_cursor(&mut self) {
        let _ = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        self.window.set_cursor_visible(false);
        self.input.set_cursor_locked(true);
    }

    pub(crate) fn release_cursor(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.input.set_cursor_locked(false);
    }
}
