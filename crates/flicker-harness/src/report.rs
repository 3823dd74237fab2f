#![forbid(unsafe_code)]

//! Suite run reports.
//!
//! A [`SuiteReport`] records the verdict of every scoped assertion of every
//! case, plus a BLAKE3 checksum of the evaluated trace so a CI log points at
//! the exact capture that produced it.

use flicker_assert::{Scope, Verdict};
use flicker_core::StateTrace;
use serde::Serialize;

use crate::error::{HarnessError, Result};
use crate::suite::CaseClass;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Verdict of one scoped assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedVerdict {
    pub scope: Scope,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Outcome of one suite case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub class: CaseClass,
    pub verdicts: Vec<ScopedVerdict>,
    /// Every assertion matched.
    pub passed: bool,
    /// Failed and counts against the run.
    pub blocking: bool,
}

impl CaseReport {
    pub fn new(
        name: impl Into<String>,
        class: CaseClass,
        verdicts: Vec<ScopedVerdict>,
        flaky_blocks: bool,
    ) -> Self {
        let passed = verdicts.iter().all(|v| v.verdict.is_matched());
        let blocking = !passed && (!class.is_flaky() || flaky_blocks);
        Self {
            name: name.into(),
            class,
            verdicts,
            passed,
            blocking,
        }
    }

    /// One line, e.g. `FAIL trampolineLayerNeverVisible`.
    #[must_use]
    pub fn summary(&self) -> String {
        let status = match (self.passed, self.blocking) {
            (true, _) => "PASS",
            (false, true) => "FAIL",
            (false, false) => "FLAKY",
        };
        match self.class {
            CaseClass::Presubmit => format!("{status} {}", self.name),
            CaseClass::Flaky { bug_id } => format!("{status} {} (flaky, b/{bug_id})", self.name),
        }
    }
}

/// Outcome of running a suite over one trace under one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub config: String,
    /// `blake3:<hex>` of the JSON-serialized trace.
    pub trace_checksum: String,
    pub snapshots: usize,
    pub cases: Vec<CaseReport>,
    pub passed: usize,
    pub failed: usize,
    /// Failures of flaky cases that did not block.
    pub flaky_failed: usize,
}

impl SuiteReport {
    pub fn new(
        suite: impl Into<String>,
        config: impl Into<String>,
        trace: &StateTrace,
        cases: Vec<CaseReport>,
    ) -> Result<Self> {
        let passed = cases.iter().filter(|c| c.passed).count();
        let flaky_failed = cases.iter().filter(|c| !c.passed && !c.blocking).count();
        Ok(Self {
            suite: suite.into(),
            config: config.into(),
            trace_checksum: trace_checksum(trace)?,
            snapshots: trace.len(),
            failed: cases.len() - passed,
            passed,
            flaky_failed,
            cases,
        })
    }

    /// Number of failed cases that block the run.
    #[must_use]
    pub fn blocking_failures(&self) -> usize {
        self.failed - self.flaky_failed
    }

    #[must_use]
    pub fn has_blocking_failures(&self) -> bool {
        self.blocking_failures() > 0
    }

    /// Format a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Suite {} [{}]: {} cases ({} pass, {} fail, {} flaky) over {} snapshots, checksum {}\n",
            self.suite,
            self.config,
            self.cases.len(),
            self.passed,
            self.blocking_failures(),
            self.flaky_failed,
            self.snapshots,
            self.trace_checksum
        );
        for case in &self.cases {
            out.push_str(&format!("  {}\n", case.summary()));
            for scoped in &case.verdicts {
                if let Some(failure) = scoped.verdict.failure() {
                    out.push_str(&format!("    [{}] {failure}\n", scoped.scope));
                }
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `Err(SuiteFailed)` when any case blocks.
    pub fn into_result(self) -> Result<Self> {
        if self.has_blocking_failures() {
            return Err(HarnessError::SuiteFailed {
                suite: self.suite.clone(),
                config: self.config.clone(),
                failed: self.blocking_failures(),
            });
        }
        Ok(self)
    }
}

/// BLAKE3 checksum of a trace's JSON form.
pub fn trace_checksum(trace: &StateTrace) -> Result<String> {
    let bytes = serde_json::to_vec(trace)?;
    Ok(format!("blake3:{}", blake3::hash(&bytes).to_hex()))
}
