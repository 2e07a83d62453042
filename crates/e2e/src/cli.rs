//! Command line of the scenario harness
//!
//! The harness is a `harness = false` test target, so cargo hands it the
//! same arguments it would give libtest: a positional filter plus flags
//! such as `--exact` or `--test-threads 1`. Those are accepted next to the
//! harness's own options. The filter selects scenarios and the rest are
//! ignored.

use clap::Parser;
use coffeecart_daemon::DaemonConfig;
use std::path::PathBuf;
use tracing::info;

use crate::error::{E2eError, E2eResult};
use crate::runner::{RunnerConfig, TestRunner, TestSuiteResult};

#[derive(Parser, Debug, Clone)]
#[command(name = "coffeecart-e2e")]
#[command(about = "Scenario runner for Coffee Cart")]
pub struct HarnessArgs {
    /// Path to test specs directory
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/specs"))]
    pub specs: PathBuf,

    /// Run only tests matching this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only a specific test by name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Session configuration for specs that bring none
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run timers on the wall clock instead of a paused one
    #[arg(long)]
    pub real_time: bool,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Scenario name substring or tag, as passed by `cargo test <filter>`
    #[arg(hide = true)]
    pub filter: Option<String>,

    /// Match the filter against whole names
    #[arg(long, hide = true)]
    pub exact: bool,

    /// Print scenario names instead of running them
    #[arg(long, hide = true)]
    pub list: bool,

    /// Run only ignored tests; scenarios are never ignored
    #[arg(long, hide = true)]
    pub ignored: bool,

    #[arg(long, hide = true)]
    pub include_ignored: bool,

    #[arg(long, hide = true)]
    pub nocapture: bool,

    #[arg(long, hide = true)]
    pub show_output: bool,

    #[arg(short, long, hide = true)]
    pub quiet: bool,

    #[arg(long, hide = true)]
    pub test: bool,

    #[arg(long, hide = true)]
    pub bench: bool,

    #[arg(long, hide = true)]
    pub test_threads: Option<usize>,

    #[arg(long, hide = true)]
    pub format: Option<String>,

    #[arg(long, hide = true)]
    pub color: Option<String>,

    #[arg(long, hide = true)]
    pub skip: Vec<String>,

    #[arg(short = 'Z', hide = true)]
    pub unstable: Vec<String>,
}

impl HarnessArgs {
    /// Whether a finished suite counts as a pass
    ///
    /// An unfiltered run must execute at least one scenario. A filter that
    /// selects nothing passes, the way libtest treats it.
    pub fn passed(&self, suite: &TestSuiteResult) -> bool {
        suite.failed == 0 && (suite.total > 0 || self.filter.is_some() || self.ignored)
    }
}

/// Run the scenarios the arguments select and write the results file
pub async fn run(args: HarnessArgs) -> E2eResult<bool> {
    let session = match &args.config {
        Some(path) => DaemonConfig::load(path)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))?,
        None => DaemonConfig::default(),
    };

    let runner = TestRunner::with_config(RunnerConfig {
        session,
        specs_dir: args.specs.clone(),
        output_dir: args
            .output
            .clone()
            .unwrap_or_else(|| RunnerConfig::default().output_dir),
    });

    if args.list {
        for name in runner.list(args.filter.as_deref(), args.exact)? {
            println!("{}: test", name);
        }
        return Ok(true);
    }

    let results = if args.ignored {
        info!("No ignored scenarios");
        runner.run_specs(&[]).await?
    } else if let Some(name) = &args.name {
        TestSuiteResult::single(runner.run_test(name).await?)
    } else if let Some(tag) = &args.tag {
        runner.run_tagged(tag).await?
    } else if let Some(filter) = &args.filter {
        runner.run_filtered(filter, args.exact).await?
    } else {
        runner.run_all().await?
    };

    runner.write_results(&results)?;

    Ok(args.passed(&results))
}
