//! Test runner that plays scenarios against fresh storefront sessions

use coffeecart_daemon::DaemonConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::driver::{StepResult, StorefrontDriver};
use crate::error::{E2eError, E2eResult};
use crate::spec::TestSpec;

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    /// Suite made of one result
    pub fn single(result: TestResult) -> Self {
        Self {
            total: 1,
            passed: usize::from(result.success),
            failed: usize::from(!result.success),
            duration_ms: result.duration_ms,
            results: vec![result],
        }
    }
}

/// Main scenario runner
pub struct TestRunner {
    /// Session configuration for specs that bring none
    session: DaemonConfig,

    /// Test specs directory
    specs_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            session: config.session,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// Run all tests in the specs directory
    pub async fn run_all(&self) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run tests matching a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<TestSpec> = TestSpec::filter_by_tag(&specs, tag)
            .into_iter()
            .cloned()
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run the tests a cargo-style filter selects
    ///
    /// A spec is picked when its name contains `filter` (equals it with
    /// `exact`) or when it carries `filter` as a tag. Selecting nothing is
    /// an empty suite, not an error.
    pub async fn run_filtered(&self, filter: &str, exact: bool) -> E2eResult<TestSuiteResult> {
        let selected = self.select(Some(filter), exact)?;
        if selected.is_empty() {
            info!("No scenario matches filter {:?}", filter);
        }
        self.run_specs(&selected).await
    }

    /// Names of the tests a filter selects, all of them without one
    pub fn list(&self, filter: Option<&str>, exact: bool) -> E2eResult<Vec<String>> {
        Ok(self
            .select(filter, exact)?
            .into_iter()
            .map(|s| s.name)
            .collect())
    }

    fn select(&self, filter: Option<&str>, exact: bool) -> E2eResult<Vec<TestSpec>> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let Some(filter) = filter else {
            return Ok(specs);
        };

        Ok(specs
            .into_iter()
            .filter(|s| {
                let by_name = if exact {
                    s.name == filter
                } else {
                    s.name.contains(filter)
                };
                by_name || s.tags.iter().any(|t| t == filter)
            })
            .collect())
    }

    /// Run a specific test by name
    pub async fn run_test(&self, name: &str) -> E2eResult<TestResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Test not found: {}", name)))?;

        self.run_spec(&spec).await
    }

    /// Run a list of test specs
    pub async fn run_specs(&self, specs: &[TestSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} test(s)...", specs.len());

        for spec in specs {
            match self.run_spec(spec).await {
                Ok(result) => {
                    if result.success {
                        passed += 1;
                        info!("✓ {} ({} ms)", result.name, result.duration_ms);
                    } else {
                        failed += 1;
                        error!(
                            "✗ {} - {}",
                            result.name,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    results.push(result);
                }
                Err(e) => {
                    failed += 1;
                    error!("✗ {} - {}", spec.name, e);
                    results.push(TestResult {
                        name: spec.name.clone(),
                        success: false,
                        duration_ms: 0,
                        steps: vec![],
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(TestSuiteResult {
            total: specs.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Run a single test spec in its own session
    pub async fn run_spec(&self, spec: &TestSpec) -> E2eResult<TestResult> {
        let start = Instant::now();
        debug!("Running test: {}", spec.name);

        let driver = StorefrontDriver::new(spec.config.as_ref().unwrap_or(&self.session))?;

        let mut step_results = Vec::new();
        let mut test_error: Option<String> = None;

        for step in &spec.steps {
            let result = driver.execute_step(step).await;

            if !result.success {
                test_error = result.error.clone();
                step_results.push(result);
                break; // Stop on first failure
            }

            step_results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let success = test_error.is_none();

        Ok(TestResult {
            name: spec.name.clone(),
            success,
            duration_ms,
            steps: step_results,
            error: test_error,
        })
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub session: DaemonConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            session: DaemonConfig::default(),
            specs_dir: PathBuf::from("tests/specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(dir: &std::path::Path) -> TestRunner {
        TestRunner::with_config(RunnerConfig {
            specs_dir: dir.join("specs"),
            output_dir: dir.join("out"),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_stops_on_first_failure() {
        let spec = TestSpec::from_yaml(
            r#"
name: broken
steps:
  - action: activate
    item: espresso
  - action: assert
    cart_count: 5
  - action: activate
    item: espresso
"#,
        )
        .unwrap();

        let result = TestRunner::new().run_spec(&spec).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.steps.len(), 2);
        assert!(result.error.unwrap().contains("cart count"));
    }

    #[tokio::test]
    async fn test_each_spec_gets_a_fresh_session() {
        let spec = TestSpec::from_yaml(
            r#"
name: one-cup
steps:
  - action: activate
    item: mocha
  - action: assert
    cart_count: 1
"#,
        )
        .unwrap();

        let suite = TestRunner::new()
            .run_specs(&[spec.clone(), spec])
            .await
            .unwrap();
        assert_eq!(suite.passed, 2);
        assert_eq!(suite.failed, 0);
    }

    #[tokio::test]
    async fn test_run_tagged_from_directory_and_write_results() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("specs")).unwrap();
        std::fs::write(
            dir.path().join("specs/a.yaml"),
            "name: a\ntags: [smoke]\nsteps:\n  - action: assert\n    total: \"$0.00\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("specs/b.yml"),
            "name: b\nsteps:\n  - action: assert\n    cart_count: 3\n",
        )
        .unwrap();

        let runner = runner(dir.path());
        let smoke = runner.run_tagged("smoke").await.unwrap();
        assert_eq!((smoke.total, smoke.passed), (1, 1));

        let all = runner.run_all().await.unwrap();
        assert_eq!((all.total, all.passed, all.failed), (2, 1, 1));

        let path = runner.write_results(&all).unwrap();
        let written: TestSuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.results[1].name, "b");

        assert!(runner.run_test("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_run_filtered_by_name_or_tag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("specs")).unwrap();
        for (file, body) in [
            ("a.yaml", "name: promo_offer
tags: [menu]
steps: []
"),
            ("b.yaml", "name: promo_accept
steps: []
"),
            ("c.yaml", "name: checkout
steps:
  - action: assert
    cart_count: 3
"),
        ] {
            std::fs::write(dir.path().join("specs").join(file), body).unwrap();
        }
        let runner = runner(dir.path());

        let promo = runner.run_filtered("promo", false).await.unwrap();
        assert_eq!((promo.total, promo.passed), (2, 2));

        let exact = runner.run_filtered("promo", true).await.unwrap();
        assert_eq!(exact.total, 0);

        let tagged = runner.run_filtered("menu", true).await.unwrap();
        assert_eq!(tagged.results[0].name, "promo_offer");

        assert_eq!(runner.list(Some("promo_"), false).unwrap().len(), 2);
        assert_eq!(runner.list(None, false).unwrap().len(), 3);

        let none = runner.run_filtered("no_such_scenario", false).await.unwrap();
        assert_eq!((none.total, none.failed), (0, 0));

        let all = runner.run_all().await.unwrap();
        assert_eq!(all.total, all.passed + all.failed);
        assert_eq!(all.failed, 1);
    }
}
