//! Inbound transcription boundary
//!
//! The speech collaborator hands us lowercase text or a structured failure;
//! this module owns that envelope, the lexical cleanup that turns raw text
//! into tokens, and the stdin stand-in source used when no recognizer is
//! wired up.

use std::io::{self, BufRead};
use std::thread;

/// One utterance from the speech collaborator.
///
/// `success` is false when the collaborator itself failed (its error text
/// is reported verbatim); `error` with `success` true means speech was
/// heard but not understood.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub success: bool,
    pub error: Option<String>,
    pub text: Option<String>,
}

impl Transcription {
    pub fn heard(text: String) -> Self {
        Self {
            success: true,
            error: None,
            text: Some(text),
        }
    }

    pub fn unrecognized() -> Self {
        Self {
            success: true,
            error: Some("Unable to recognize speech.".to_string()),
            text: None,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            text: None,
        }
    }
}

/// Clean a raw transcription and split it into tokens.
///
/// `-`, `/` and `\` are spoken-coordinate separators, not words. The
/// `" 00"` rewrite repairs two-digit numbers the transcriber concatenates
/// onto a coordinate ("move to 10 00"); it runs in a single pass and is
/// deliberately no smarter than that.
///
/// Lowercase input is the caller's precondition; no case folding happens
/// here.
pub fn normalize(raw: &str) -> Vec<String> {
    let cleaned = raw
        .replace(['-', '/', '\\'], " ")
        .replace(" 00", " 0 0");
    cleaned.split_whitespace().map(String::from).collect()
}

/// Feed lowercased stdin lines into `tx` as transcriptions, one per line.
///
/// The reader runs on its own thread; dropping the last receiver or
/// reaching end of input ends it. An empty line plays the role of audio
/// the recognizer could not make out.
pub fn start_stdin_source(tx: flume::Sender<Transcription>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let transcription = match line {
                Ok(line) => {
                    let line = line.trim().to_lowercase();
                    if line.is_empty() {
                        Transcription::unrecognized()
                    } else {
                        Transcription::heard(line)
                    }
                }
                Err(e) => Transcription::failed(format!("Error reading input: {}", e)),
            };
            if tx.send(transcription).is_err() {
                break;
            }
        }
    });
}
