use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_core::config::FolioConfig;
use folio_core::logging;

use crate::error::Result;
use crate::replay::{ReplayReport, replay_with, trace_header};
use crate::scenario::Scenario;
use crate::trace::TraceRecorder;

#[derive(Debug, Parser)]
#[command(
    name = "folio-replay",
    about = "Replay scripted scroll sessions and record decision traces",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a scenario file.
    Run(RunArgs),

    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Scenario JSON file.
    pub scenario: PathBuf,

    /// Write a JSONL trace here.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Overlay FOLIO_* environment variables on the scenario's config.
    #[arg(long)]
    pub env: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Start from this scenario's config instead of the defaults.
    #[arg(long)]
    pub scenario: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(cli.log_json);
    run(cli, &mut io::stdout().lock())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_scenario(args, out),
        Commands::Config(args) => print_config(args, out),
    }
}

fn run_scenario(args: RunArgs, out: &mut dyn Write) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let config = if args.env {
        scenario.config.clone().overlay(|key| std::env::var(key).ok())
    } else {
        scenario.config.clone()
    };
    config.validate()?;

    let report = match &args.out {
        Some(path) => {
            let mut trace = TraceRecorder::create(path, &trace_header(&scenario, &config))?;
            replay_with(&scenario, &config, Some(&mut trace))?
        }
        None => replay_with::<io::Sink>(&scenario, &config, None)?,
    };
    write_report(&report, out)
}

fn write_report(report: &ReplayReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "scenario: {}", report.scenario)?;
    writeln!(out, "outputs:  {}", report.records.len())?;
    writeln!(
        out,
        "active:   {}",
        report.final_active.as_ref().map_or("-", |s| s.as_str())
    )?;
    let revealed: Vec<String> = report.revealed.iter().map(ToString::to_string).collect();
    writeln!(out, "revealed: [{}]", revealed.join(", "))?;
    if let Some(checksum) = &report.checksum {
        writeln!(out, "checksum: {checksum}")?;
    }
    Ok(())
}

fn print_config(args: ConfigArgs, out: &mut dyn Write) -> Result<()> {
    let base = match &args.scenario {
        Some(path) => Scenario::load(path)?.config,
        None => FolioConfig::default(),
    };
    let config = base.overlay(|key| std::env::var(key).ok());
    config.validate()?;
    serde_json::to_writer_pretty(&mut *out, &config)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from(["folio-replay", "--log-json", "run", "s.json", "--out", "t.jsonl"]).unwrap();
        assert!(cli.log_json);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.scenario, PathBuf::from("s.json"));
                assert_eq!(args.out, Some(PathBuf::from("t.jsonl")));
                assert!(!args.env);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_scenario_is_reported() {
        let cli = Cli::try_parse_from(["folio-replay", "run", "/nonexistent/scenario.json"]).unwrap();
        let err = run(cli, &mut Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
