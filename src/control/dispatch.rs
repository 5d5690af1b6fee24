//! Action dispatcher
//!
//! Turns a validated `Action` into calls on the input backend. Dispatch
//! performs no validation of its own; the grammar is the sole gate, so
//! every action arriving here is complete and well-typed.

use super::grammar::{Action, Direction};
use super::input::{ControlError, InputBackend};

/// Whether the interpretation loop should keep going after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A quit action was dispatched; no further utterances are processed
    Quit,
}

/// Drives an input backend from validated actions.
pub struct Dispatcher<B: InputBackend> {
    backend: B,
    verbose: bool,
}

impl<B: InputBackend> Dispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            verbose: false,
        }
    }

    /// Enable verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute one action. Dispatching the same action twice issues the
    /// same backend call sequence; no state is carried between calls.
    pub fn dispatch(&mut self, action: &Action) -> Result<Outcome, ControlError> {
        if self.verbose {
            eprintln!("[DISPATCH] {:?}", action);
        }

        match action {
            Action::MoveAbsolute { x, y } => self.backend.move_to(*x, *y)?,
            Action::MoveRelative {
                direction,
                distance,
            } => {
                let (ux, uy) = direction.unit();
                self.backend.move_rel(ux * distance, uy * distance)?;
            }
            Action::Click { button } => self.backend.click(*button)?,
            Action::DoubleClick => self.backend.double_click()?,
            Action::HoldButton { button } => self.backend.button_down(*button)?,
            Action::ReleaseButton { button } => self.backend.button_up(*button)?,
            Action::Scroll { direction, amount } => {
                let amount = match direction {
                    Direction::Down => -*amount,
                    _ => *amount,
                };
                self.backend.scroll(amount)?;
            }
            Action::PressKey { key } => self.backend.tap_key(key)?,
            Action::HoldKey { key } => self.backend.key_down(key)?,
            Action::ReleaseKey { key } => self.backend.key_up(key)?,
            Action::TypeText { text } => self.backend.type_text(text)?,
            Action::RunHotkey { keys } => {
                // Press in spoken order, release in exact reverse order.
                // Releasing forward changes the chord the OS sees.
                for key in keys {
                    self.backend.key_down(key)?;
                }
                for key in keys.iter().rev() {
                    self.backend.key_up(key)?;
                }
            }
            Action::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::grammar::MouseButton;

    /// Backend that records every call instead of touching the OS.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<String>,
    }

    impl InputBackend for RecordingBackend {
        fn move_to(&mut self, x: i32, y: i32) -> Result<(), ControlError> {
            self.calls.push(format!("move_to {} {}", x, y));
            Ok(())
        }
        fn move_rel(&mut self, dx: i32, dy: i32) -> Result<(), ControlError> {
            self.calls.push(format!("move_rel {} {}", dx, dy));
            Ok(())
        }
        fn click(&mut self, button: MouseButton) -> Result<(), ControlError> {
            self.calls.push(format!("click {}", button.as_str()));
            Ok(())
        }
        fn double_click(&mut self) -> Result<(), ControlError> {
            self.calls.push("double_click".into());
            Ok(())
        }
        fn button_down(&mut self, button: MouseButton) -> Result<(), ControlError> {
            self.calls.push(format!("button_down {}", button.as_str()));
            Ok(())
        }
        fn button_up(&mut self, button: MouseButton) -> Result<(), ControlError> {
            self.calls.push(format!("button_up {}", button.as_str()));
            Ok(())
        }
        fn scroll(&mut self, amount: i32) -> Result<(), ControlError> {
            self.calls.push(format!("scroll {}", amount));
            Ok(())
        }
        fn key_down(&mut self, key: &str) -> Result<(), ControlError> {
            self.calls.push(format!("key_down {}", key));
            Ok(())
        }
        fn key_up(&mut self, key: &str) -> Result<(), ControlError> {
            self.calls.push(format!("key_up {}", key));
            Ok(())
        }
        fn tap_key(&mut self, key: &str) -> Result<(), ControlError> {
            self.calls.push(format!("tap_key {}", key));
            Ok(())
        }
        fn type_text(&mut self, text: &str) -> Result<(), ControlError> {
            self.calls.push(format!("type_text {}", text));
            Ok(())
        }
    }

    fn dispatch_calls(action: &Action) -> Vec<String> {
        let mut dispatcher = Dispatcher::new(RecordingBackend::default());
        dispatcher.dispatch(action).unwrap();
        dispatcher.backend.calls
    }

    #[test]
    fn test_hotkey_presses_forward_releases_reverse() {
        let action = Action::RunHotkey {
            keys: vec!["ctrl".into(), "shift".into(), "esc".into()],
        };
        assert_eq!(
            dispatch_calls(&action),
            vec![
                "key_down ctrl",
                "key_down shift",
                "key_down esc",
                "key_up esc",
                "key_up shift",
                "key_up ctrl",
            ]
        );
    }

    #[test]
    fn test_relative_move_scales_unit_vector() {
        assert_eq!(
            dispatch_calls(&Action::MoveRelative {
                direction: Direction::Left,
                distance: 20,
            }),
            vec!["move_rel -20 0"]
        );
        assert_eq!(
            dispatch_calls(&Action::MoveRelative {
                direction: Direction::Up,
                distance: 5,
            }),
            vec!["move_rel 0 -5"]
        );
        assert_eq!(
            dispatch_calls(&Action::MoveRelative {
                direction: Direction::Down,
                distance: 7,
            }),
            vec!["move_rel 0 7"]
        );
    }

    #[test]
    fn test_scroll_direction_sign() {
        assert_eq!(
            dispatch_calls(&Action::Scroll {
                direction: Direction::Up,
                amount: 3,
            }),
            vec!["scroll 3"]
        );
        assert_eq!(
            dispatch_calls(&Action::Scroll {
                direction: Direction::Down,
                amount: 3,
            }),
            vec!["scroll -3"]
        );
    }

    #[test]
    fn test_mouse_actions() {
        assert_eq!(
            dispatch_calls(&Action::MoveAbsolute { x: 100, y: 250 }),
            vec!["move_to 100 250"]
        );
        assert_eq!(
            dispatch_calls(&Action::Click {
                button: MouseButton::Right
            }),
            vec!["click right"]
        );
        assert_eq!(dispatch_calls(&Action::DoubleClick), vec!["double_click"]);
        assert_eq!(
            dispatch_calls(&Action::HoldButton {
                button: MouseButton::Left
            }),
            vec!["button_down left"]
        );
        assert_eq!(
            dispatch_calls(&Action::ReleaseButton {
                button: MouseButton::Left
            }),
            vec!["button_up left"]
        );
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(
            dispatch_calls(&Action::PressKey { key: "enter".into() }),
            vec!["tap_key enter"]
        );
        assert_eq!(
            dispatch_calls(&Action::HoldKey { key: "shift".into() }),
            vec!["key_down shift"]
        );
        assert_eq!(
            dispatch_calls(&Action::ReleaseKey { key: "shift".into() }),
            vec!["key_up shift"]
        );
        assert_eq!(
            dispatch_calls(&Action::TypeText {
                text: "hello world".into()
            }),
            vec!["type_text hello world"]
        );
    }

    #[test]
    fn test_quit_issues_no_backend_calls() {
        let mut dispatcher = Dispatcher::new(RecordingBackend::default());
        let outcome = dispatcher.dispatch(&Action::Quit).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert!(dispatcher.backend.calls.is_empty());
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        // Same action twice -> same call sequence, on one dispatcher
        let actions = [
            Action::RunHotkey {
                keys: vec!["ctrl".into(), "c".into()],
            },
            Action::MoveRelative {
                direction: Direction::Right,
                distance: 12,
            },
            Action::TypeText {
                text: "again".into(),
            },
        ];
        for action in &actions {
            let mut dispatcher = Dispatcher::new(RecordingBackend::default());
            dispatcher.dispatch(action).unwrap();
            let first = dispatcher.backend.calls.clone();
            dispatcher.backend.calls.clear();
            dispatcher.dispatch(action).unwrap();
            assert_eq!(first, dispatcher.backend.calls);
        }
    }
}
