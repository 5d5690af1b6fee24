//! Voice command interpretation and dispatch
//!
//! Turns normalized utterance tokens into concrete pointer and keyboard
//! actions.
//!
//! # Pipeline
//!
//! - **Canonicalize**: spoken key phrases collapse to canonical tokens
//!   ("page down" -> "pagedown", "control" -> "ctrl")
//! - **Match**: the first two tokens name a command in the grammar table;
//!   arity and argument kinds are checked uniformly
//! - **Dispatch**: the validated action drives the input backend, including
//!   press-forward/release-reverse ordering for hotkey chords

mod dispatch;
mod grammar;
mod input;
mod keys;

pub use dispatch::{Dispatcher, Outcome};
pub use grammar::{Action, ArgKind, Arity, Direction, Grammar, MatchResult, MouseButton, Rejection};
pub use input::{ControlError, EnigoBackend, InputBackend, InputMethod};
pub use keys::{canonicalize, is_key_name};
