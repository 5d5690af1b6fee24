//! Canonical key names and spoken-phrase canonicalization
//!
//! Transcribed speech names keys the way people say them ("page down",
//! "control"); the input layer wants the single-token canonical forms
//! ("pagedown", "ctrl"). This module owns the canonical vocabulary and the
//! phrase rewrites that collapse spoken names into it.

/// Multi-character canonical key names the input layer can deliver.
///
/// Single printable characters ("a", "7", ";") are always valid key names
/// and are not listed here.
const NAMED_KEYS: &[&str] = &[
    "alt",
    "backspace",
    "capslock",
    "command",
    "ctrl",
    "del",
    "delete",
    "down",
    "end",
    "enter",
    "esc",
    "escape",
    "f1",
    "f2",
    "f3",
    "f4",
    "f5",
    "f6",
    "f7",
    "f8",
    "f9",
    "f10",
    "f11",
    "f12",
    "home",
    "insert",
    "left",
    "meta",
    "option",
    "pagedown",
    "pageup",
    "printscreen",
    "return",
    "right",
    "shift",
    "space",
    "tab",
    "up",
    "volumedown",
    "volumemute",
    "volumeup",
    "win",
];

/// Spoken phrase -> canonical token rewrites, longest phrase first so that
/// overlapping sources ("page down" contains "down") cannot interfere.
/// No rewrite output matches another rewrite's source phrase.
const REWRITES: &[(&str, &str)] = &[
    ("print screen", "printscreen"),
    ("volume down", "volumedown"),
    ("volume up", "volumeup"),
    ("page down", "pagedown"),
    ("page up", "pageup"),
    ("control", "ctrl"),
];

/// Whether a normalized token names a key the dispatcher can press.
pub fn is_key_name(token: &str) -> bool {
    if NAMED_KEYS.contains(&token) {
        return true;
    }
    // Any single printable character is a key in its own right
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(_), None))
}

/// Collapse multi-word spoken key names into canonical single tokens.
///
/// The rewrites must run on the joined utterance so that multi-word phrases
/// can match across token boundaries.
pub fn canonicalize(tokens: &[String]) -> Vec<String> {
    let mut joined = tokens.join(" ");
    for (phrase, replacement) in REWRITES {
        joined = joined.replace(phrase, replacement);
    }
    joined.split_whitespace().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_collapses_spoken_key_names() {
        assert_eq!(toks("pagedown"), canonicalize(&toks("page down")));
        assert_eq!(toks("pageup"), canonicalize(&toks("page up")));
        assert_eq!(toks("volumedown"), canonicalize(&toks("volume down")));
        assert_eq!(toks("volumeup"), canonicalize(&toks("volume up")));
        assert_eq!(toks("printscreen"), canonicalize(&toks("print screen")));
        assert_eq!(toks("ctrl"), canonicalize(&toks("control")));
    }

    #[test]
    fn test_rewrites_inside_longer_utterances() {
        assert_eq!(
            toks("press key pagedown"),
            canonicalize(&toks("press key page down"))
        );
        assert_eq!(
            toks("use shortcut ctrl shift esc"),
            canonicalize(&toks("use shortcut control shift esc"))
        );
    }

    #[test]
    fn test_plain_utterances_pass_through() {
        assert_eq!(toks("move to 10 20"), canonicalize(&toks("move to 10 20")));
        assert_eq!(toks("left click"), canonicalize(&toks("left click")));
    }

    #[test]
    fn test_idempotent_on_canonical_input() {
        for s in ["use shortcut ctrl shift esc", "press key pagedown", "move up 50"] {
            let once = canonicalize(&toks(s));
            let twice = canonicalize(&once);
            assert_eq!(once, twice, "canonicalize not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_key_name_membership() {
        for name in ["ctrl", "shift", "esc", "pagedown", "volumeup", "f12", "a", "7", ";"] {
            assert!(is_key_name(name), "{:?} should be a key name", name);
        }
        for name in ["banana", "page down", "", "ab"] {
            assert!(!is_key_name(name), "{:?} should not be a key name", name);
        }
    }
}
