mod config;
mod control;
mod transcript;

use config::Config;
use control::{Dispatcher, EnigoBackend, Grammar, InputBackend, InputMethod, MatchResult, Outcome};
use transcript::Transcription;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "handsfree",
    about = "Control the mouse and keyboard with voice commands"
)]
struct Cli {
    /// Path to a config file (default: ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text injection method: "direct" or "clipboard" (overrides config)
    #[arg(long)]
    input_method: Option<String>,

    /// Log interpreter and dispatch internals to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the voice command reference
    Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Command::Commands)) {
        Grammar::print_reference();
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let method = InputMethod::from_str(cli.input_method.as_deref().unwrap_or(&config.input.method));

    let grammar = Grammar::new();
    let backend = EnigoBackend::new(method, Duration::from_millis(config.input.move_duration_ms))?;
    let mut dispatcher = Dispatcher::new(backend).with_verbose(cli.verbose);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    // The stdin reader stands in for the speech collaborator: one line,
    // one utterance, already lowercased
    let (tx, rx) = flume::bounded::<Transcription>(8);
    transcript::start_stdin_source(tx);

    println!("Please say a voice command!");

    while running.load(Ordering::SeqCst) {
        // Poll so Ctrl+C is honored while waiting for the next utterance
        let utterance = match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(t) => t,
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        };

        if !handle_utterance(&grammar, &mut dispatcher, &utterance, cli.verbose) {
            break;
        }
        println!("Please say a voice command!");
    }

    Ok(())
}

/// Process one utterance end to end. Returns false when the loop should
/// stop (quit command dispatched).
fn handle_utterance<B: InputBackend>(
    grammar: &Grammar,
    dispatcher: &mut Dispatcher<B>,
    utterance: &Transcription,
    verbose: bool,
) -> bool {
    if !utterance.success {
        // Collaborator failure: report its message verbatim and keep going
        eprintln!(
            "{}",
            utterance.error.as_deref().unwrap_or("Transcription failed.")
        );
        return true;
    }

    if let Some(error) = &utterance.error {
        println!("{} Please try saying that again.", error);
        return true;
    }

    let Some(text) = &utterance.text else {
        return true;
    };

    let tokens = control::canonicalize(&transcript::normalize(text));
    if verbose {
        eprintln!("[PARSE] tokens: {:?}", tokens);
    }

    match grammar.interpret(&tokens) {
        MatchResult::Matched(action) => {
            println!("You said: {}. Executing command...", text);
            match dispatcher.dispatch(&action) {
                Ok(Outcome::Quit) => {
                    println!("Now quitting...");
                    return false;
                }
                Ok(Outcome::Continue) => {}
                Err(e) => eprintln!("[INPUT] {}", e),
            }
        }
        MatchResult::Rejected(reason) => {
            println!(
                "{} is an invalid command ({}). Please try another one!",
                text, reason
            );
        }
    }

    true
}
