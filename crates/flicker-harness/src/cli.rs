use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::capture::{self, RecordedCapture, SessionId};
use crate::config::{HarnessConfig, RunConfig};
use crate::error::Result;
use crate::fixtures::{SeedFixtureArgs, run_seed_fixture};
use crate::report::{SuiteReport, trace_checksum};
use crate::scenario::{SCENARIOS, configs_for, find_scenario, run_on_trace, run_scenario};
use crate::trampoline::SCENARIO_NAME;

#[derive(Debug, Parser)]
#[command(
    name = "flicker-harness",
    about = "Run flicker assertion suites against recorded window/layer traces",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assert a recorded trace against a scenario suite.
    Run(RunArgs),

    /// Print the run configurations of a scenario.
    Configs {
        #[arg(long, default_value = SCENARIO_NAME)]
        scenario: String,
    },

    /// Validate a capture file and print its checksum.
    #[command(name = "check-trace")]
    CheckTrace {
        #[arg(long)]
        trace: PathBuf,
    },

    /// Print registered scenarios.
    Scenarios,

    /// Write a synthetic capture for a scenario.
    #[command(name = "seed-fixture")]
    SeedFixture(SeedFixtureArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Capture file to evaluate.
    #[arg(long)]
    pub trace: PathBuf,

    #[arg(long, default_value = SCENARIO_NAME)]
    pub scenario: String,

    /// Single configuration, e.g. `ROTATION_0_GESTURAL_NAV`. Defaults to
    /// every configuration of the scenario.
    #[arg(long)]
    pub config: Option<String>,

    /// Require the capture to belong to this session.
    #[arg(long)]
    pub session: Option<String>,

    /// Print JSON reports instead of text summaries.
    #[arg(long)]
    pub json: bool,
}

pub fn run_from_env() -> Result<()> {
    let harness = HarnessConfig::from_env();
    crate::logging::init(harness.log_json);
    let cli = Cli::parse();
    run_with(cli, &harness)
}

pub fn run(cli: Cli) -> Result<()> {
    run_with(cli, &HarnessConfig::from_env())
}

pub fn run_with(cli: Cli, harness: &HarnessConfig) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let reports = run_suites(&args, harness)?;
            print_reports(&reports, args.json)?;
            match reports.into_iter().find(SuiteReport::has_blocking_failures) {
                Some(report) => report.into_result().map(|_| ()),
                None => Ok(()),
            }
        }
        Commands::Configs { scenario } => {
            let scenario = find_scenario(&scenario)?;
            for config in configs_for(scenario, harness) {
                println!("{config}");
            }
            Ok(())
        }
        Commands::CheckTrace { trace } => {
            let loaded = capture::load_trace(&trace)?;
            println!(
                "{}: {} snapshots, {}",
                trace.display(),
                loaded.len(),
                trace_checksum(&loaded)?
            );
            Ok(())
        }
        Commands::Scenarios => {
            for scenario in SCENARIOS {
                println!("{}\t{}", scenario.name, scenario.description);
            }
            Ok(())
        }
        Commands::SeedFixture(args) => run_seed_fixture(args),
    }
}

/// Evaluate the scenario once per selected configuration.
pub fn run_suites(args: &RunArgs, harness: &HarnessConfig) -> Result<Vec<SuiteReport>> {
    let scenario = find_scenario(&args.scenario)?;
    let configs = match &args.config {
        Some(name) => vec![RunConfig::from_name(name)?],
        None => configs_for(scenario, harness),
    };

    match &args.session {
        Some(session) => {
            let session = SessionId::new(session.as_str());
            let mut source = RecordedCapture::new(&args.trace);
            configs
                .iter()
                .map(|config| run_scenario(scenario, config, &mut source, &session, harness))
                .collect()
        }
        None => {
            let trace = capture::load_trace(&args.trace)?;
            configs
                .iter()
                .map(|config| run_on_trace(scenario, config, &trace, harness))
                .collect()
        }
    }
}

fn print_reports(reports: &[SuiteReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            print!("{}", report.summary());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::NavigationMode;
    use crate::error::HarnessError;
    use crate::fixtures::TrampolineVariant;

    use super::*;

    fn seed(dir: &Path, variant: TrampolineVariant) -> PathBuf {
        let out = dir.join("capture.json");
        run_seed_fixture(SeedFixtureArgs {
            out: out.clone(),
            variant,
            session: "s1".into(),
            width: 1080,
            height: 2400,
        })
        .unwrap();
        out
    }

    fn run_args(trace: PathBuf) -> RunArgs {
        RunArgs {
            trace,
            scenario: SCENARIO_NAME.into(),
            config: None,
            session: None,
            json: false,
        }
    }

    #[test]
    fn scenarios_command_dispatches_successfully() {
        let result = run_with(
            Cli {
                command: Commands::Scenarios,
            },
            &HarnessConfig::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn configs_command_rejects_unknown_scenario() {
        let result = run_with(
            Cli {
                command: Commands::Configs {
                    scenario: "nope".into(),
                },
            },
            &HarnessConfig::default(),
        );
        assert!(matches!(result, Err(HarnessError::UnknownScenario { .. })));
    }

    #[test]
    fn clean_fixture_passes_every_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(seed(dir.path(), TrampolineVariant::Clean));
        let reports = run_suites(&args, &HarnessConfig::default()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.failed == 0));
        assert!(
            run_with(
                Cli {
                    command: Commands::Run(args)
                },
                &HarnessConfig::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn regressed_fixture_fails_with_suite_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(seed(dir.path(), TrampolineVariant::TrampolineFlash));
        let err = run_with(
            Cli {
                command: Commands::Run(args),
            },
            &HarnessConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn single_config_and_session_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(seed(dir.path(), TrampolineVariant::Clean));
        args.config = Some("ROTATION_0_3_BUTTON_NAV".into());
        args.session = Some("s1".into());
        let reports = run_suites(&args, &HarnessConfig::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].config, "ROTATION_0_3_BUTTON_NAV");

        args.session = Some("other".into());
        assert!(matches!(
            run_suites(&args, &HarnessConfig::default()),
            Err(HarnessError::SessionMismatch { .. })
        ));
    }

    #[test]
    fn navigation_filter_limits_reports() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(seed(dir.path(), TrampolineVariant::Clean));
        let harness = HarnessConfig {
            navigation_mode: Some(NavigationMode::Gestural),
            ..HarnessConfig::default()
        };
        let reports = run_suites(&args, &harness).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].config, "ROTATION_0_GESTURAL_NAV");
    }

    #[test]
    fn check_trace_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_with(
            Cli {
                command: Commands::CheckTrace {
                    trace: dir.path().join("missing.json"),
                },
            },
            &HarnessConfig::default(),
        );
        assert!(matches!(result, Err(HarnessError::MissingCapture { .. })));
    }
}
