//! Command-line utility replaying tracking scenarios through the overlay engine.

mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use std::fs;
use std::path::PathBuf;

/// Text rendering helpers used by the CLI.
mod render {
    use crate::scenario::StepLine;

    fn ids(label: char, ids: &[i32]) -> String {
        if ids.is_empty() {
            return String::new();
        }
        let list: Vec<String> = ids.iter().map(i32::to_string).collect();
        format!(" {label}[{}]", list.join(","))
    }

    /// Format one replay step as a single line.
    pub fn line(step: &StepLine) -> String {
        let session = step
            .session
            .map_or_else(|| "-".to_string(), |raw| raw.to_string());
        let mut out = format!("{:>3} {:<12} session={session}", step.step, step.kind);
        if step.kind == "frame" {
            let mode = if step.fit_to_scan {
                "find-image"
            } else {
                "showing"
            };
            out.push_str(&format!(" images={} mode={mode}", step.images));
            out.push_str(&ids('+', &step.created));
            out.push_str(&ids('-', &step.destroyed));
            out.push_str(&ids('!', &step.lookup_failures));
        }
        if let Some(err) = &step.error {
            out.push_str(&format!(" ({err})"));
        }
        out
    }
}

/// Replay a JSON tracking scenario and print what the engine did at each step.
#[derive(Parser, Debug)]
#[command(author, version, about = "Replay AR tracking scenarios", long_about = None)]
struct Cli {
    /// Path to the scenario JSON file.
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// One human-readable line per step.
    Text,
    /// One JSON object per step.
    Ndjson,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.scenario)
        .with_context(|| format!("failed to read scenario {:?}", cli.scenario))?;
    let lines = scenario::run(scenario::parse(&text)?)?;

    for line in &lines {
        match cli.format {
            Format::Text => println!("{}", render::line(line)),
            Format::Ndjson => println!("{}", serde_json::to_string(line)?),
        }
    }

    Ok(())
}
