use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use laneboard_core::BoardConfig;

use crate::error::{HarnessError, Result};
use crate::replay::replay;
use crate::scenario::Scenario;

#[derive(Debug, Parser)]
#[command(
    name = "laneboard-harness",
    about = "Replay scripted lane board gestures and inspect the resulting board",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON scenario and print the report as JSON.
    Replay(ReplayArgs),

    /// Print the effective board config.
    #[command(name = "print-config")]
    PrintConfig(PrintConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Scenario file.
    pub scenario: PathBuf,

    /// Board config (TOML or JSON) overriding the scenario's own.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct PrintConfigArgs {
    /// Config file to load; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(&args, out),
        Commands::PrintConfig(args) => run_print_config(&args, out),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Option<BoardConfig>> {
    path.map(BoardConfig::from_file)
        .transpose()
        .map_err(HarnessError::from)
}

fn run_replay(args: &ReplayArgs, out: &mut dyn Write) -> Result<()> {
    let scenario = Scenario::from_file(&args.scenario)?;
    let config = load_config(args.config.as_ref())?;
    tracing::info!(
        target: "laneboard.harness",
        scenario = %args.scenario.display(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );
    let report = replay(&scenario, config)?;
    let rendered = match args.format {
        ReportFormat::Json if args.pretty => serde_json::to_string_pretty(&report)?,
        ReportFormat::Json => serde_json::to_string(&report)?,
        ReportFormat::Text => report.render_text(),
    };
    writeln!(out, "{}", rendered.trim_end()).map_err(|e| HarnessError::io("<stdout>", e))
}

fn run_print_config(args: &PrintConfigArgs, out: &mut dyn Write) -> Result<()> {
    let config = load_config(args.config.as_ref())?.unwrap_or_default();
    let rendered = match args.format {
        ConfigFormat::Toml => config
            .to_toml_string()
            .map_err(|e| HarnessError::Render(e.to_string()))?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
    };
    writeln!(out, "{}", rendered.trim_end()).map_err(|e| HarnessError::io("<stdout>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    fn run_to_string(cli: Cli) -> Result<String> {
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn print_config_defaults_as_toml() {
        let text = run_to_string(Cli {
            command: Commands::PrintConfig(PrintConfigArgs {
                config: None,
                format: ConfigFormat::Toml,
            }),
        })
        .unwrap();
        assert!(text.contains("threshold_px = 140.0"));
        assert!(text.contains("[preview]"));
    }

    #[test]
    fn print_config_reads_partial_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, r#"{ "auto_scroll": { "max_speed_px": 32.0 } }"#).unwrap();
        let text = run_to_string(Cli {
            command: Commands::PrintConfig(PrintConfigArgs {
                config: Some(path),
                format: ConfigFormat::Json,
            }),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["auto_scroll"]["max_speed_px"], 32.0);
        assert_eq!(value["auto_scroll"]["threshold_px"], 140.0);
    }

    #[test]
    fn replay_missing_scenario_is_io_error() {
        let error = run_to_string(Cli {
            command: Commands::Replay(ReplayArgs {
                scenario: PathBuf::from("/nonexistent/scenario.json"),
                config: None,
                format: ReportFormat::Json,
                pretty: false,
            }),
        })
        .unwrap_err();
        assert!(matches!(error, HarnessError::Io { .. }));
    }

    #[test]
    fn parses_replay_flags() {
        let cli = Cli::try_parse_from([
            "laneboard-harness",
            "replay",
            "s.json",
            "--format",
            "text",
            "--pretty",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert!(args.pretty);
                assert_eq!(args.format, ReportFormat::Text);
                assert_eq!(args.scenario, PathBuf::from("s.json"));
            }
            Commands::PrintConfig(_) => panic!("expected replay"),
        }
    }
}
