//! HostelBite storefront E2E runner
//!
//! ```bash
//! # Everything, headless, against a staging origin
//! BASE_URL=http://staging.local:5173 hostelbite-e2e run --headless
//!
//! # One scenario, slowed down for a demo, browser kept open afterwards
//! hostelbite-e2e run checkout --slow-mo 400 --keep-open
//! ```
//!
//! Exit status is 0 when every scenario passed, 1 when any failed and 2 for
//! usage errors.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hostelbite_e2e::config::ProcessEnv;
use hostelbite_e2e::{
    scenarios, ConfigResolver, OutputFormat, OverridesFile, Reporter, ScenarioDef, ScenarioRunner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "hostelbite-e2e")]
#[command(version, about = "Browser-driven end-to-end scenarios for the HostelBite storefront")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios (all of them when none are named)
    Run(RunArgs),
    /// List registered scenarios
    List,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Scenario names, in the order to run them
    scenarios: Vec<String>,

    /// Override a setting, e.g. `--set baseUrl=http://localhost:4173`
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,

    /// TOML file of setting overrides
    #[arg(long, value_name = "FILE")]
    overrides: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Scenarios to run at once, each in its own browser
    #[arg(long, default_value = "1")]
    parallel: usize,

    /// Run Chromium without a window
    #[arg(long)]
    headless: bool,

    /// Keep the browser open after each scenario until Ctrl+C
    #[arg(long)]
    keep_open: bool,

    /// Pause this many milliseconds between steps
    #[arg(long, value_name = "MS")]
    slow_mo: Option<u64>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

impl RunArgs {
    /// Overrides from the file, then `--set`, then the dedicated flags
    fn resolver(&self) -> anyhow::Result<ConfigResolver<ProcessEnv>> {
        let mut resolver = ConfigResolver::from_process_env();

        if let Some(path) = &self.overrides {
            let file = OverridesFile::from_file(path)?;
            resolver.extend_overrides(file.entries());
        }
        resolver.extend_overrides(self.set.iter().cloned());

        if self.headless {
            resolver.set_override("headless", "true");
        }
        if self.keep_open {
            resolver.set_override("keepOpen", "true");
        }
        if let Some(ms) = self.slow_mo {
            resolver.set_override("slowMoMs", ms.to_string());
        }
        Ok(resolver)
    }

    fn selected(&self) -> anyhow::Result<Vec<ScenarioDef>> {
        if self.scenarios.is_empty() {
            return Ok(scenarios::ALL.to_vec());
        }
        self.scenarios
            .iter()
            .map(|name| {
                scenarios::find(name).copied().with_context(|| {
                    format!(
                        "Unknown scenario '{}'. Available: {}",
                        name,
                        scenarios::names().collect::<Vec<_>>().join(", ")
                    )
                })
            })
            .collect()
    }
}

fn init_tracing() {
    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hostelbite_e2e=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn list() {
    for scenario in scenarios::ALL {
        println!("{:<24} {}", scenario.name, scenario.description);
    }
}

async fn run(args: RunArgs) -> ExitCode {
    let prepared = args.selected().and_then(|selected| Ok((selected, args.resolver()?)));
    let (selected, resolver) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let runner = ScenarioRunner::new(resolver).with_parallelism(args.parallel);
    let results = runner.run_suite("storefront", &selected).await;

    let reporter = Reporter::new(args.format);
    let reported = match &args.output {
        Some(path) => reporter
            .write_to_file(&results, path)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => reporter.report(&results),
    };
    if let Err(e) = reported {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    }

    if results.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::List => {
            list();
            ExitCode::SUCCESS
        }
        Command::Run(args) => run(args).await,
    }
}
