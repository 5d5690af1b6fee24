//! Pointer and keyboard injection using enigo
//!
//! `InputBackend` is the boundary to the OS input collaborator; the
//! dispatcher only ever talks through it. `EnigoBackend` is the real
//! implementation and provides two methods for typing text:
//! - **Direct**: enigo's native text input (default)
//! - **Clipboard**: copy text to clipboard, then send Cmd/Ctrl+V

use arboard::Clipboard;
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use std::thread;
use std::time::Duration;

use super::grammar::MouseButton;

/// Input method for typing text
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InputMethod {
    /// Use enigo's native text input directly (default)
    #[default]
    Direct,
    /// Copy to clipboard, then paste with Cmd/Ctrl+V
    Clipboard,
}

impl InputMethod {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "clipboard" => InputMethod::Clipboard,
            _ => InputMethod::Direct,
        }
    }
}

/// Error type for input operations
#[derive(Debug)]
pub enum ControlError {
    Input(String),
    Clipboard(String),
    /// The key name is valid vocabulary but this platform cannot deliver it
    UnsupportedKey(String),
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::Input(msg) => write!(f, "Input error: {}", msg),
            ControlError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            ControlError::UnsupportedKey(name) => {
                write!(f, "Key \"{}\" is not available on this platform", name)
            }
        }
    }
}

impl std::error::Error for ControlError {}

/// OS input primitives the dispatcher drives. Mouse operations act at the
/// current pointer position; key arguments are canonical key names.
pub trait InputBackend {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), ControlError>;
    fn move_rel(&mut self, dx: i32, dy: i32) -> Result<(), ControlError>;
    fn click(&mut self, button: MouseButton) -> Result<(), ControlError>;
    fn double_click(&mut self) -> Result<(), ControlError>;
    fn button_down(&mut self, button: MouseButton) -> Result<(), ControlError>;
    fn button_up(&mut self, button: MouseButton) -> Result<(), ControlError>;
    /// Positive amount scrolls up, negative scrolls down.
    fn scroll(&mut self, amount: i32) -> Result<(), ControlError>;
    fn key_down(&mut self, key: &str) -> Result<(), ControlError>;
    fn key_up(&mut self, key: &str) -> Result<(), ControlError>;
    fn tap_key(&mut self, key: &str) -> Result<(), ControlError>;
    fn type_text(&mut self, text: &str) -> Result<(), ControlError>;
}

/// Number of interpolation steps for a glided pointer move.
const MOVE_STEPS: u32 = 24;

/// Real input backend using enigo
pub struct EnigoBackend {
    enigo: Enigo,
    clipboard: Clipboard,
    method: InputMethod,
    /// Time a pointer move is spread over; zero jumps instantly
    move_duration: Duration,
}

impl EnigoBackend {
    pub fn new(method: InputMethod, move_duration: Duration) -> Result<Self, ControlError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| ControlError::Input(format!("Failed to initialize Enigo: {}", e)))?;
        let clipboard = Clipboard::new()
            .map_err(|e| ControlError::Clipboard(format!("Failed to initialize clipboard: {}", e)))?;

        Ok(Self {
            enigo,
            clipboard,
            method,
            move_duration,
        })
    }

    /// Get the platform-specific modifier key (Cmd on macOS, Ctrl elsewhere)
    fn modifier_key() -> Key {
        #[cfg(target_os = "macos")]
        {
            Key::Meta
        }
        #[cfg(not(target_os = "macos"))]
        {
            Key::Control
        }
    }

    fn pointer(&self) -> Result<(i32, i32), ControlError> {
        self.enigo
            .location()
            .map_err(|e| ControlError::Input(format!("Failed to read pointer position: {}", e)))
    }

    /// Glide the pointer to an absolute position over `move_duration`.
    fn glide_to(&mut self, x: i32, y: i32) -> Result<(), ControlError> {
        if self.move_duration.is_zero() {
            return self
                .enigo
                .move_mouse(x, y, Coordinate::Abs)
                .map_err(|e| ControlError::Input(format!("Failed to move pointer: {}", e)));
        }

        let (sx, sy) = self.pointer()?;
        let steps = MOVE_STEPS as i32;
        let pause = self.move_duration / MOVE_STEPS;
        for i in 1..=steps {
            let ix = sx + (x - sx) * i / steps;
            let iy = sy + (y - sy) * i / steps;
            self.enigo
                .move_mouse(ix, iy, Coordinate::Abs)
                .map_err(|e| ControlError::Input(format!("Failed to move pointer: {}", e)))?;
            thread::sleep(pause);
        }
        Ok(())
    }

    fn press_named(&mut self, key: &str, direction: Direction) -> Result<(), ControlError> {
        let k = key_from_name(key).ok_or_else(|| ControlError::UnsupportedKey(key.to_string()))?;
        self.enigo
            .key(k, direction)
            .map_err(|e| ControlError::Input(format!("Failed to send key {}: {}", key, e)))
    }

    /// Type text via clipboard (copy to clipboard, then paste)
    fn type_via_clipboard(&mut self, text: &str) -> Result<(), ControlError> {
        // Save current clipboard content (best effort)
        let old_content = self.clipboard.get_text().ok();

        self.clipboard
            .set_text(text)
            .map_err(|e| ControlError::Clipboard(format!("Failed to set clipboard: {}", e)))?;

        // Small delay for clipboard to be ready
        thread::sleep(Duration::from_millis(50));

        if let Err(e) = self.send_paste() {
            eprintln!("[INPUT] Paste failed: {}", e);
            if let Some(old) = old_content {
                let _ = self.clipboard.set_text(old);
            }
            return Err(e);
        }

        // Small delay for paste to complete
        thread::sleep(Duration::from_millis(100));

        // Restore old clipboard content (best effort)
        if let Some(old) = old_content {
            let _ = self.clipboard.set_text(old);
        }

        Ok(())
    }

    /// Send paste command (Cmd+V on macOS, Ctrl+V elsewhere)
    fn send_paste(&mut self) -> Result<(), ControlError> {
        let modifier = Self::modifier_key();
        self.enigo
            .key(modifier, Direction::Press)
            .map_err(|e| ControlError::Input(format!("Failed to press modifier: {}", e)))?;
        thread::sleep(Duration::from_millis(10));
        self.enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| ControlError::Input(format!("Failed to click v: {}", e)))?;
        thread::sleep(Duration::from_millis(50));
        self.enigo
            .key(modifier, Direction::Release)
            .map_err(|e| ControlError::Input(format!("Failed to release modifier: {}", e)))
    }

    fn type_direct(&mut self, text: &str) -> Result<(), ControlError> {
        self.enigo
            .text(text)
            .map_err(|e| ControlError::Input(format!("Failed to type text: {}", e)))
    }
}

impl InputBackend for EnigoBackend {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), ControlError> {
        self.glide_to(x, y)
    }

    fn move_rel(&mut self, dx: i32, dy: i32) -> Result<(), ControlError> {
        let (sx, sy) = self.pointer()?;
        self.glide_to(sx + dx, sy + dy)
    }

    fn click(&mut self, button: MouseButton) -> Result<(), ControlError> {
        self.enigo
            .button(enigo_button(button), Direction::Click)
            .map_err(|e| ControlError::Input(format!("Failed to {} click: {}", button.as_str(), e)))
    }

    fn double_click(&mut self) -> Result<(), ControlError> {
        self.click(MouseButton::Left)?;
        thread::sleep(Duration::from_millis(40));
        self.click(MouseButton::Left)
    }

    fn button_down(&mut self, button: MouseButton) -> Result<(), ControlError> {
        self.enigo
            .button(enigo_button(button), Direction::Press)
            .map_err(|e| {
                ControlError::Input(format!("Failed to hold {} button: {}", button.as_str(), e))
            })
    }

    fn button_up(&mut self, button: MouseButton) -> Result<(), ControlError> {
        self.enigo
            .button(enigo_button(button), Direction::Release)
            .map_err(|e| {
                ControlError::Input(format!("Failed to release {} button: {}", button.as_str(), e))
            })
    }

    fn scroll(&mut self, amount: i32) -> Result<(), ControlError> {
        // enigo counts positive scroll as downward; our contract is the
        // reverse (positive = up, like the wheel)
        self.enigo
            .scroll(-amount, Axis::Vertical)
            .map_err(|e| ControlError::Input(format!("Failed to scroll: {}", e)))
    }

    fn key_down(&mut self, key: &str) -> Result<(), ControlError> {
        self.press_named(key, Direction::Press)
    }

    fn key_up(&mut self, key: &str) -> Result<(), ControlError> {
        self.press_named(key, Direction::Release)
    }

    fn tap_key(&mut self, key: &str) -> Result<(), ControlError> {
        self.press_named(key, Direction::Click)
    }

    fn type_text(&mut self, text: &str) -> Result<(), ControlError> {
        if text.is_empty() {
            return Ok(());
        }

        match self.method {
            InputMethod::Direct => self.type_direct(text),
            InputMethod::Clipboard => {
                // Try clipboard, fall back to direct if it fails
                match self.type_via_clipboard(text) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        eprintln!("[INPUT] Clipboard method failed: {}, trying direct", e);
                        self.type_direct(text)
                    }
                }
            }
        }
    }
}

fn enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Middle => Button::Middle,
        MouseButton::Right => Button::Right,
    }
}

/// Map a canonical key name to the enigo key. Single characters map to
/// `Key::Unicode`; `None` means the platform has no such key.
fn key_from_name(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key::Unicode(c));
    }

    let key = match name {
        "alt" | "option" => Key::Alt,
        "backspace" => Key::Backspace,
        "capslock" => Key::CapsLock,
        "command" | "meta" | "win" => Key::Meta,
        "ctrl" => Key::Control,
        "del" | "delete" => Key::Delete,
        "down" => Key::DownArrow,
        "end" => Key::End,
        "enter" | "return" => Key::Return,
        "esc" | "escape" => Key::Escape,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "home" => Key::Home,
        "left" => Key::LeftArrow,
        "pagedown" => Key::PageDown,
        "pageup" => Key::PageUp,
        "right" => Key::RightArrow,
        "shift" => Key::Shift,
        "space" => Key::Space,
        "tab" => Key::Tab,
        "up" => Key::UpArrow,
        "volumedown" => Key::VolumeDown,
        "volumemute" => Key::VolumeMute,
        "volumeup" => Key::VolumeUp,
        #[cfg(not(target_os = "macos"))]
        "insert" => Key::Insert,
        #[cfg(not(target_os = "macos"))]
        "printscreen" => Key::PrintScr,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_method_from_str() {
        assert_eq!(InputMethod::from_str("direct"), InputMethod::Direct);
        assert_eq!(InputMethod::from_str("Direct"), InputMethod::Direct);
        assert_eq!(InputMethod::from_str("clipboard"), InputMethod::Clipboard);
        assert_eq!(InputMethod::from_str("Clipboard"), InputMethod::Clipboard);
        assert_eq!(InputMethod::from_str("unknown"), InputMethod::Direct);
    }

    #[test]
    fn test_single_characters_map_to_unicode() {
        assert_eq!(key_from_name("a"), Some(Key::Unicode('a')));
        assert_eq!(key_from_name("7"), Some(Key::Unicode('7')));
        assert_eq!(key_from_name(";"), Some(Key::Unicode(';')));
    }

    #[test]
    fn test_named_keys_map() {
        assert_eq!(key_from_name("ctrl"), Some(Key::Control));
        assert_eq!(key_from_name("esc"), Some(Key::Escape));
        assert_eq!(key_from_name("pagedown"), Some(Key::PageDown));
        assert_eq!(key_from_name("command"), Some(Key::Meta));
        assert_eq!(key_from_name("option"), Some(Key::Alt));
        assert_eq!(key_from_name("banana"), None);
    }

    #[test]
    fn test_vocabulary_keys_are_deliverable() {
        // Every canonical key name the grammar accepts should map to a key,
        // except the few that genuinely do not exist on this platform
        use super::super::keys::is_key_name;

        #[cfg(not(target_os = "macos"))]
        let platform_gaps: &[&str] = &[];
        #[cfg(target_os = "macos")]
        let platform_gaps: &[&str] = &["insert", "printscreen"];

        for name in [
            "alt", "backspace", "ctrl", "del", "down", "end", "enter", "esc", "f1", "f12",
            "home", "insert", "left", "pagedown", "pageup", "printscreen", "right", "shift",
            "space", "tab", "up", "volumedown", "volumeup", "win",
        ] {
            assert!(is_key_name(name));
            if platform_gaps.contains(&name) {
                assert!(key_from_name(name).is_none());
            } else {
                assert!(key_from_name(name).is_some(), "{:?} has no key mapping", name);
            }
        }
    }
}
