//! Replay driver for the palette engine.
//!
//! Loads an optional TOML configuration, then reads one JSON event per line from
//! stdin, dispatches it and prints a JSON snapshot of the palette to stdout.
//! Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! palette-machine [CONFIG.toml] < events.jsonl
//! ```
//!
//! Each input line is an event in wire form:
//!
//! ```text
//! {"type": "search", "value": "t"}
//! {"type": "keydown", "keyEvent": {"key": "ArrowDown"}}
//! {"type": "keydown", "keyEvent": {"key": "Enter"}}
//! ```
//!
//! Each output line is either a snapshot
//! (`{"event": ..., "dispatch": ..., "view": ...}`) or an error record
//! (`{"event": ..., "error": ...}`). Event errors are reported and skipped; the
//! driver keeps reading.

use palette_machine::{initialize, observability, Config, Dispatch, Event, PaletteView};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

#[derive(Serialize)]
struct Snapshot<'a> {
    event: &'a str,
    dispatch: &'a Dispatch,
    view: PaletteView,
}

#[derive(Serialize)]
struct Failure<'a> {
    event: &'a str,
    error: String,
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("palette-machine: {e}");
            return ExitCode::FAILURE;
        }
    };

    observability::init_tracing(&config);

    match replay(&config, io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay aborted");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> palette_machine::Result<Config> {
    std::env::args()
        .nth(1)
        .map_or_else(|| Ok(Config::default()), Config::from_file)
}

fn replay(
    config: &Config,
    input: impl BufRead,
    mut output: impl Write,
) -> palette_machine::Result<()> {
    let mut machine = initialize(config, |item| {
        tracing::info!(value = %item.value, "item chosen");
    });

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = match Event::from_json(line).and_then(|event| {
            let name = event.name();
            machine.send(event).map(|dispatch| (name, dispatch))
        }) {
            Ok((name, dispatch)) => serde_json::to_string(&Snapshot {
                event: name,
                dispatch: &dispatch,
                view: PaletteView::from_context(machine.context()),
            }),
            Err(e) => {
                tracing::warn!(line = line_no + 1, error = %e, "event rejected");
                serde_json::to_string(&Failure {
                    event: line,
                    error: e.to_string(),
                })
            }
        }
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(output, "{record}")?;
    }

    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_machine::Item;

    fn run(config: &Config, input: &str) -> Vec<serde_json::Value> {
        let mut output = Vec::new();
        replay(config, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn prints_one_snapshot_per_event() {
        let config = Config {
            items: vec![Item::new("one"), Item::new("two")],
            ..Config::default()
        };
        let input = concat!(
            r#"{"type":"keydown","keyEvent":{"key":"ArrowDown"}}"#,
            "\n\n",
            r#"{"type":"keydown","keyEvent":{"key":"Enter"}}"#,
            "\n",
        );
        let records = run(&config, input);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["view"]["selected_index"], 1);
        assert_eq!(records[1]["dispatch"]["default_prevented"], true);
        assert_eq!(records[1]["dispatch"]["changed"][0]["value"], "two");
    }

    #[test]
    fn reports_bad_lines_and_continues() {
        let config = Config {
            items: vec![Item::new("one")],
            ..Config::default()
        };
        let records = run(&config, "not json\n{\"type\":\"jump-to-last\"}\n");

        assert_eq!(records.len(), 2);
        assert!(records[0]["error"].as_str().unwrap().starts_with("Invalid event"));
        assert_eq!(records[1]["event"], "jump-to-last");
    }
}
