//! Interactive card number field (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `term`.
//! Network changes are logged and drive the icon row.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};

use tui_ccfield::config::FieldConfig;
use tui_ccfield::core::{last_four, CardFormatter, InputState};
use tui_ccfield::input::{handle_key_event, should_quit};
use tui_ccfield::logging;
use tui_ccfield::term::{FieldView, FrameBuffer, TerminalRenderer, Viewport};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "tui-ccfield", about = "Card number entry field with live network detection")]
struct Args {
    /// Pre-filled card number
    #[arg(long, default_value = "")]
    initial: String,

    /// TOML file with additional card networks
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Digit cap while no network is detected
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    max_digits: Option<u16>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = FieldConfig::from_env()?
        .with_rules_path(args.rules)
        .with_max_unknown_digits(args.max_digits.map(usize::from))
        .with_log_path(args.log_file);

    if let Some(path) = &config.log_path {
        logging::init_file_logger(path, args.verbose)?;
    }

    let formatter = config.formatter()?;
    let initial = formatter.init(&args.initial);
    info!(network = ?initial.network_changed, "card field ready");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &formatter, initial.state);

    // Always try to restore terminal state.
    let _ = term.exit();

    let state = result?;
    info!(
        network = %state.network,
        last_four = %last_four(&state.text),
        "card field closed"
    );
    println!("{}\t{}", state.network, state.text);
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    formatter: &CardFormatter,
    mut state: InputState,
) -> Result<InputState> {
    let view = FieldView::default();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let caret = view.render_into(formatter, &state, Viewport::new(w, h), &mut fb);
        term.draw(&fb, caret)?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if should_quit(key) {
                    return Ok(state);
                }
                let Some(action) = handle_key_event(key) else {
                    continue;
                };

                let outcome = formatter.on_edit(&state, action);
                if outcome.rejected {
                    debug!(action = action.as_str(), "input rejected");
                } else if action.edits_text() {
                    debug!(
                        action = action.as_str(),
                        digits = outcome.state.digit_count(),
                        "field edited"
                    );
                }
                if let Some(network) = &outcome.network_changed {
                    info!(network = %network, "network changed");
                }
                state = outcome.state;
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
