#![forbid(unsafe_code)]

//! Flicker suites: named cases of scoped assertions.
//!
//! # Invariants
//!
//! 1. Every case is evaluated, even after an earlier case fails.
//! 2. A failed `Flaky` case is reported but only blocks the run when
//!    [`HarnessConfig::include_flaky`] is set.
//! 3. Evaluation is read-only over the trace; running a suite twice yields
//!    identical reports.

use flicker_assert::ScopedAssertion;
use flicker_core::StateTrace;
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::config::{HarnessConfig, RunConfig};
use crate::error::Result;
use crate::report::{CaseReport, ScopedVerdict, SuiteReport};

/// How a case failure is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    /// Must pass.
    Presubmit,
    /// Known to fail intermittently; tracked by `bug_id`.
    Flaky { bug_id: u64 },
}

impl CaseClass {
    #[inline]
    pub fn is_flaky(self) -> bool {
        matches!(self, Self::Flaky { .. })
    }
}

/// One named case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteCase {
    pub name: String,
    pub class: CaseClass,
    pub assertions: Vec<ScopedAssertion>,
}

impl SuiteCase {
    pub fn presubmit(name: impl Into<String>, assertions: Vec<ScopedAssertion>) -> Self {
        Self {
            name: name.into(),
            class: CaseClass::Presubmit,
            assertions,
        }
    }

    pub fn flaky(name: impl Into<String>, bug_id: u64, assertions: Vec<ScopedAssertion>) -> Self {
        Self {
            name: name.into(),
            class: CaseClass::Flaky { bug_id },
            assertions,
        }
    }

    fn run(&self, trace: &StateTrace, harness: &HarnessConfig) -> CaseReport {
        let verdicts = self
            .assertions
            .iter()
            .map(|assertion| ScopedVerdict {
                scope: assertion.scope,
                verdict: assertion.evaluate(trace),
            })
            .collect();
        CaseReport::new(self.name.clone(), self.class, verdicts, harness.include_flaky)
    }
}

/// Ordered collection of cases sharing one trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlickerSuite {
    name: String,
    cases: Vec<SuiteCase>,
}

impl FlickerSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    #[must_use]
    pub fn case(mut self, case: SuiteCase) -> Self {
        self.cases.push(case);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn cases(&self) -> &[SuiteCase] {
        &self.cases
    }

    /// Evaluate every case against `trace`.
    pub fn run(
        &self,
        trace: &StateTrace,
        config: &RunConfig,
        harness: &HarnessConfig,
    ) -> Result<SuiteReport> {
        let config_name = config.name();
        let _span = info_span!(
            "flicker.suite",
            suite = %self.name,
            config = %config_name,
            cases = self.cases.len(),
        )
        .entered();

        let cases: Vec<CaseReport> = self
            .cases
            .iter()
            .map(|case| {
                let report = case.run(trace, harness);
                if !report.passed {
                    warn!(case = %report.name, blocking = report.blocking, "case failed");
                }
                report
            })
            .collect();

        let report = SuiteReport::new(&self.name, config_name, trace, cases)?;
        info!(
            passed = report.passed,
            failed = report.failed,
            flaky_failed = report.flaky_failed,
            "suite finished"
        );
        Ok(report)
    }
}
