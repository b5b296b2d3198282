//! Non-interactive formatter: prints `network<TAB>display` per card number.
//!
//! Numbers come from the command line, or one per line on stdin. With
//! `--keys` an edit script is replayed against an empty field instead.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::debug;

use tui_ccfield::config::FieldConfig;
use tui_ccfield::core::{digits_only, masked, CardFormatter};
use tui_ccfield::logging;
use tui_ccfield::types::EditAction;

#[derive(Debug, Parser)]
#[command(name = "format-card", about = "Detect card networks and group card numbers")]
struct Args {
    /// Card numbers (read from stdin when omitted)
    numbers: Vec<String>,

    /// Replay edit actions, e.g. "4 1 1 1 home backspace selectAll 3 7"
    #[arg(long, value_name = "ACTIONS", conflicts_with = "numbers")]
    keys: Option<String>,

    /// TOML file with additional card networks
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Digit cap while no network is detected
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    max_digits: Option<u16>,

    /// Hide all but the last four digits
    #[arg(long)]
    masked: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn format_line(formatter: &CardFormatter, input: &str, hide: bool) -> String {
    let digits = digits_only(input);
    let rule = formatter.detect_type(&digits);
    let display = if hide {
        masked(&formatter.format(&digits, rule), rule)
    } else {
        formatter.format(&digits, rule)
    };
    debug!(network = %rule.name, digits = digits.len(), "formatted");
    format!("{}\t{}", rule.name, display)
}

/// Replay `script` on an empty field; returns `network<TAB>text<TAB>caret`.
fn replay(formatter: &CardFormatter, script: &str) -> Result<String> {
    let mut state = formatter.empty();
    for token in script.split_whitespace() {
        let action =
            EditAction::from_str(token).ok_or_else(|| anyhow!("unknown edit action `{token}`"))?;
        let out = formatter.on_edit(&state, action);
        if let Some(network) = &out.network_changed {
            debug!(action = action.as_str(), network = %network, "network changed");
        }
        state = out.state;
    }
    Ok(format!("{}\t{}\t{}", state.network, state.text, state.cursor()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_stderr_logger(args.verbose);

    let formatter = FieldConfig::from_env()?
        .with_rules_path(args.rules)
        .with_max_unknown_digits(args.max_digits.map(usize::from))
        .formatter()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(script) = &args.keys {
        writeln!(out, "{}", replay(&formatter, script)?)?;
    } else if args.numbers.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            writeln!(out, "{}", format_line(&formatter, &line, args.masked))?;
        }
    } else {
        for number in &args.numbers {
            writeln!(out, "{}", format_line(&formatter, number, args.masked))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_ccfield::core::RuleTable;

    #[test]
    fn formats_with_network_prefix() {
        let f = CardFormatter::new(RuleTable::builtin());
        assert_eq!(
            format_line(&f, "4111-1111-1111-1111", false),
            "visa\t4111 1111 1111 1111"
        );
        assert_eq!(
            format_line(&f, "370000000000002", true),
            "amex\t•••• •••••• •0002"
        );
    }

    #[test]
    fn replays_edit_script() {
        let f = CardFormatter::new(RuleTable::builtin());
        assert_eq!(replay(&f, "4 1 1 1 1").unwrap(), "visa\t4111 1\t6");
        assert_eq!(
            replay(&f, "4 1 1 1 home delete 3 7").unwrap(),
            "amex\t3711 1\t2"
        );
        assert_eq!(replay(&f, "").unwrap(), "unknown\t\t0");
    }

    #[test]
    fn replay_rejects_unknown_action() {
        let f = CardFormatter::new(RuleTable::builtin());
        let err = replay(&f, "4 jump").unwrap_err();
        assert!(err.to_string().contains("jump"));
    }
}
