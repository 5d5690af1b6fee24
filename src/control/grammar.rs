//! Command grammar and utterance matching
//!
//! Every voice command is identified by its first two tokens (the "base
//! key"). The grammar is an immutable table mapping base keys to command
//! shapes: an arity rule plus per-argument kind constraints. Matching an
//! utterance is one uniform walk over that table instead of a chain of
//! per-command special cases, so arity and type checks cannot drift apart
//! between commands.

use std::collections::HashMap;
use std::fmt;

use super::keys;

/// Pointer movement direction for relative moves and scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in screen coordinates (y grows downward).
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Mouse button named in click/hold/release commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "left" => Some(MouseButton::Left),
            "middle" => Some(MouseButton::Middle),
            "right" => Some(MouseButton::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

/// Kind constraint a command places on one of its argument tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Non-negative integer
    Numeric,
    /// Member of the canonical key vocabulary
    KeyName,
    /// One of left, middle, right. Buttons are named inside base keys, so
    /// no table entry constrains a trailing token with this kind.
    #[allow(dead_code)]
    ButtonName,
    /// Anything; rejoined verbatim
    FreeText,
    /// One of up, down, left, right. Same situation as ButtonName.
    #[allow(dead_code)]
    DirectionName,
}

impl ArgKind {
    pub fn accepts(self, token: &str) -> bool {
        match self {
            ArgKind::Numeric => {
                token.bytes().all(|b| b.is_ascii_digit()) && token.parse::<i32>().is_ok()
            }
            ArgKind::KeyName => keys::is_key_name(token),
            ArgKind::ButtonName => MouseButton::from_token(token).is_some(),
            ArgKind::FreeText => !token.is_empty(),
            ArgKind::DirectionName => Direction::from_token(token).is_some(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ArgKind::Numeric => "a number",
            ArgKind::KeyName => "a key name",
            ArgKind::ButtonName => "a mouse button",
            ArgKind::FreeText => "text",
            ArgKind::DirectionName => "a direction",
        }
    }
}

/// Token-count rule for a command: an exact total, or a minimum number of
/// tokens after the two-token base key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic { min_args: usize },
}

/// A fully validated input action, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveAbsolute { x: i32, y: i32 },
    MoveRelative { direction: Direction, distance: i32 },
    Click { button: MouseButton },
    DoubleClick,
    HoldButton { button: MouseButton },
    ReleaseButton { button: MouseButton },
    Scroll { direction: Direction, amount: i32 },
    PressKey { key: String },
    HoldKey { key: String },
    ReleaseKey { key: String },
    TypeText { text: String },
    RunHotkey { keys: Vec<String> },
    Quit,
}

/// Why an utterance failed to match any command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooFewTokens,
    UnknownCommand,
    ArityMismatch { expected: Arity, found: usize },
    ArgumentTypeMismatch { position: usize, expected: ArgKind },
    InvalidKeyName { name: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooFewTokens => write!(f, "commands need at least two words"),
            Rejection::UnknownCommand => write!(f, "not a command I know"),
            Rejection::ArityMismatch { expected, found } => match expected {
                Arity::Fixed(n) => write!(f, "expected {} words, heard {}", n, found),
                Arity::Variadic { min_args } => {
                    write!(f, "needs at least {} more word(s) after the command", min_args)
                }
            },
            Rejection::ArgumentTypeMismatch { position, expected } => {
                write!(f, "word {} should be {}", position + 1, expected.describe())
            }
            Rejection::InvalidKeyName { name } => {
                write!(f, "\"{}\" is not a key I can press", name)
            }
        }
    }
}

/// Outcome of matching one utterance against the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(Action),
    Rejected(Rejection),
}

/// What a matched command does; button/direction implied by the base key is
/// captured here so building the action never re-parses the base tokens.
#[derive(Debug, Clone, Copy)]
enum CommandKind {
    MoveTo,
    MoveBy(Direction),
    Click(MouseButton),
    DoubleClick,
    HoldButton(MouseButton),
    ReleaseButton(MouseButton),
    Scroll(Direction),
    PressKey,
    HoldKey,
    ReleaseKey,
    Hotkey,
    TypeThis,
    Quit,
}

struct CommandSpec {
    arity: Arity,
    /// Kind constraints for tokens after the base key. For `Variadic`
    /// commands the single listed kind applies to every trailing token.
    args: &'static [ArgKind],
    kind: CommandKind,
}

const NO_ARGS: &[ArgKind] = &[];
const COORD_ARGS: &[ArgKind] = &[ArgKind::Numeric, ArgKind::Numeric];
const DISTANCE_ARG: &[ArgKind] = &[ArgKind::Numeric];
const KEY_ARG: &[ArgKind] = &[ArgKind::KeyName];
const TEXT_ARG: &[ArgKind] = &[ArgKind::FreeText];

/// Immutable command table, built once at startup and shared by reference.
pub struct Grammar {
    table: HashMap<&'static str, CommandSpec>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let mut table = HashMap::new();

        table.insert(
            "move to",
            CommandSpec {
                arity: Arity::Fixed(4),
                args: COORD_ARGS,
                kind: CommandKind::MoveTo,
            },
        );

        for (key, direction) in [
            ("move up", Direction::Up),
            ("move down", Direction::Down),
            ("move left", Direction::Left),
            ("move right", Direction::Right),
        ] {
            table.insert(
                key,
                CommandSpec {
                    arity: Arity::Fixed(3),
                    args: DISTANCE_ARG,
                    kind: CommandKind::MoveBy(direction),
                },
            );
        }

        for (key, button) in [
            ("left click", MouseButton::Left),
            ("right click", MouseButton::Right),
            ("middle click", MouseButton::Middle),
        ] {
            table.insert(
                key,
                CommandSpec {
                    arity: Arity::Fixed(2),
                    args: NO_ARGS,
                    kind: CommandKind::Click(button),
                },
            );
        }

        table.insert(
            "double click",
            CommandSpec {
                arity: Arity::Fixed(2),
                args: NO_ARGS,
                kind: CommandKind::DoubleClick,
            },
        );

        for (key, button) in [
            ("hold left", MouseButton::Left),
            ("hold right", MouseButton::Right),
            ("hold middle", MouseButton::Middle),
        ] {
            table.insert(
                key,
                CommandSpec {
                    arity: Arity::Fixed(2),
                    args: NO_ARGS,
                    kind: CommandKind::HoldButton(button),
                },
            );
        }

        for (key, button) in [
            ("release left", MouseButton::Left),
            ("release right", MouseButton::Right),
            ("release middle", MouseButton::Middle),
        ] {
            table.insert(
                key,
                CommandSpec {
                    arity: Arity::Fixed(2),
                    args: NO_ARGS,
                    kind: CommandKind::ReleaseButton(button),
                },
            );
        }

        for (key, direction) in [("scroll up", Direction::Up), ("scroll down", Direction::Down)] {
            table.insert(
                key,
                CommandSpec {
                    arity: Arity::Fixed(3),
                    args: DISTANCE_ARG,
                    kind: CommandKind::Scroll(direction),
                },
            );
        }

        for (key, kind) in [
            ("hold key", CommandKind::HoldKey),
            ("release key", CommandKind::ReleaseKey),
            ("press key", CommandKind::PressKey),
        ] {
            table.insert(
                key,
                CommandSpec {
                    arity: Arity::Fixed(3),
                    args: KEY_ARG,
                    kind,
                },
            );
        }

        table.insert(
            "use shortcut",
            CommandSpec {
                arity: Arity::Variadic { min_args: 1 },
                args: KEY_ARG,
                kind: CommandKind::Hotkey,
            },
        );

        table.insert(
            "type this",
            CommandSpec {
                arity: Arity::Variadic { min_args: 1 },
                args: TEXT_ARG,
                kind: CommandKind::TypeThis,
            },
        );

        table.insert(
            "quit program",
            CommandSpec {
                arity: Arity::Fixed(2),
                args: NO_ARGS,
                kind: CommandKind::Quit,
            },
        );

        Self { table }
    }

    /// Match a normalized, canonicalized token sequence against the grammar.
    ///
    /// Base-key lookup is exact-string on the first two tokens only; the
    /// table keys are disjoint, so at most one command can match.
    pub fn interpret(&self, tokens: &[String]) -> MatchResult {
        if tokens.len() < 2 {
            return MatchResult::Rejected(Rejection::TooFewTokens);
        }

        let base = format!("{} {}", tokens[0], tokens[1]);
        let Some(spec) = self.table.get(base.as_str()) else {
            return MatchResult::Rejected(Rejection::UnknownCommand);
        };

        match spec.arity {
            Arity::Variadic { min_args } => {
                if tokens.len() < 2 + min_args {
                    return MatchResult::Rejected(Rejection::ArityMismatch {
                        expected: spec.arity,
                        found: tokens.len(),
                    });
                }
                if let Some(&kind) = spec.args.first() {
                    for (position, token) in tokens.iter().enumerate().skip(2) {
                        if !kind.accepts(token) {
                            return MatchResult::Rejected(match kind {
                                ArgKind::KeyName => Rejection::InvalidKeyName {
                                    name: token.clone(),
                                },
                                _ => Rejection::ArgumentTypeMismatch {
                                    position,
                                    expected: kind,
                                },
                            });
                        }
                    }
                }
            }
            Arity::Fixed(n) => {
                if tokens.len() != n {
                    return MatchResult::Rejected(Rejection::ArityMismatch {
                        expected: spec.arity,
                        found: tokens.len(),
                    });
                }
                for (i, &kind) in spec.args.iter().enumerate() {
                    let position = i + 2;
                    if !kind.accepts(&tokens[position]) {
                        return MatchResult::Rejected(Rejection::ArgumentTypeMismatch {
                            position,
                            expected: kind,
                        });
                    }
                }
            }
        }

        MatchResult::Matched(build_action(spec.kind, tokens))
    }

    /// Print the voice command reference card.
    pub fn print_reference() {
        eprintln!(
            "
╭─────────────────────────────────────────────────────────────╮
│                  VOICE COMMANDS                             │
├─────────────────────────────────────────────────────────────┤
│ POINTER                                                     │
│   move to <x> <y>            glide to screen coordinates    │
│   move up/down/left/right <n>   nudge n pixels              │
│   left/right/middle click    click at the current spot      │
│   double click               double click                   │
│   hold left/right/middle     press and hold a button        │
│   release left/right/middle  let a held button go           │
│   scroll up/down <n>         scroll n notches               │
├─────────────────────────────────────────────────────────────┤
│ KEYBOARD                                                    │
│   press key <key>            tap a key once                 │
│   hold key <key>             press and hold a key           │
│   release key <key>          let a held key go              │
│   use shortcut <key> <key>…  chord, e.g. ctrl shift esc     │
│   type this <words>…         type the words verbatim        │
├─────────────────────────────────────────────────────────────┤
│ KEY NAMES                                                   │
│   letters, digits, punctuation, and names like ctrl,        │
│   shift, esc, tab, enter, space, pagedown, volumeup, f1-f12 │
│   (spoken forms like \"page down\" collapse automatically)    │
├─────────────────────────────────────────────────────────────┤
│ CONTROL                                                     │
│   quit program               stop listening and exit        │
╰─────────────────────────────────────────────────────────────╯
"
        );
    }
}

/// Numeric tokens were validated by `ArgKind::accepts`; the fallback only
/// guards against grammar-table drift.
fn numeric(token: &str) -> i32 {
    token.parse().unwrap_or(0)
}

fn build_action(kind: CommandKind, tokens: &[String]) -> Action {
    match kind {
        CommandKind::MoveTo => Action::MoveAbsolute {
            x: numeric(&tokens[2]),
            y: numeric(&tokens[3]),
        },
        CommandKind::MoveBy(direction) => Action::MoveRelative {
            direction,
            distance: numeric(&tokens[2]),
        },
        CommandKind::Click(button) => Action::Click { button },
        CommandKind::DoubleClick => Action::DoubleClick,
        CommandKind::HoldButton(button) => Action::HoldButton { button },
        CommandKind::ReleaseButton(button) => Action::ReleaseButton { button },
        CommandKind::Scroll(direction) => Action::Scroll {
            direction,
            amount: numeric(&tokens[2]),
        },
        CommandKind::PressKey => Action::PressKey {
            key: tokens[2].clone(),
        },
        CommandKind::HoldKey => Action::HoldKey {
            key: tokens[2].clone(),
        },
        CommandKind::ReleaseKey => Action::ReleaseKey {
            key: tokens[2].clone(),
        },
        CommandKind::Hotkey => Action::RunHotkey {
            keys: tokens[2..].to_vec(),
        },
        CommandKind::TypeThis => Action::TypeText {
            text: tokens[2..].join(" "),
        },
        CommandKind::Quit => Action::Quit,
    }
}
