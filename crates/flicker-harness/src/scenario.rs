#![forbid(unsafe_code)]

//! Scenario registry and the setup → capture → assert pipeline.
//!
//! A scenario couples a suite builder with the run configurations it is
//! parameterized over. State observed during setup (the display bounds
//! before the transition) is carried in a [`TransitionContext`] rather
//! than shared mutable state.

use flicker_core::{Rect, Region, StateTrace};
use tracing::{debug, info};

use crate::capture::{self, SessionId, TraceCapture};
use crate::config::{HarnessConfig, RunConfig};
use crate::error::{HarnessError, Result};
use crate::report::SuiteReport;
use crate::suite::FlickerSuite;
use crate::trampoline;

/// Setup state handed from the setup phase to the assertions.
#[derive(Debug, Clone, Default)]
pub struct TransitionContext {
    start_display_bounds: Rect,
}

impl TransitionContext {
    pub fn new(start_display_bounds: Rect) -> Self {
        Self { start_display_bounds }
    }

    /// Read the display bounds from the first snapshot of `trace`.
    pub fn from_setup(trace: &StateTrace) -> Result<Self> {
        let bounds = trace
            .first()
            .and_then(|snapshot| snapshot.display())
            .ok_or(HarnessError::MissingDisplayBounds)?;
        debug!(%bounds, "captured start display bounds");
        Ok(Self::new(bounds))
    }

    #[inline]
    pub fn start_display_bounds(&self) -> Rect {
        self.start_display_bounds
    }

    pub fn start_display_region(&self) -> Result<Region> {
        Ok(Region::from_rect(self.start_display_bounds)?)
    }
}

/// A registered flicker scenario.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    /// Build the suite from setup state.
    pub suite: fn(&TransitionContext) -> Result<FlickerSuite>,
    /// Configurations the scenario runs under.
    pub configs: fn() -> Vec<RunConfig>,
}

pub const SCENARIOS: &[Scenario] = &[Scenario {
    name: trampoline::SCENARIO_NAME,
    description: "launch a trampoline activity that opens a secondary activity in a split",
    suite: trampoline::open_trampoline_suite,
    configs: RunConfig::non_rotation_tests,
}];

pub fn find_scenario(name: &str) -> Result<&'static Scenario> {
    SCENARIOS
        .iter()
        .find(|scenario| scenario.name == name)
        .ok_or_else(|| HarnessError::UnknownScenario {
            name: name.to_string(),
        })
}

/// Capture, set up, and assert one scenario under one configuration.
pub fn run_scenario(
    scenario: &Scenario,
    config: &RunConfig,
    source: &mut dyn TraceCapture,
    session: &SessionId,
    harness: &HarnessConfig,
) -> Result<SuiteReport> {
    info!(scenario = scenario.name, %config, %session, "running scenario");
    let trace = capture::ingest(source, session)?;
    run_on_trace(scenario, config, &trace, harness)
}

/// Assert an already-ingested trace.
pub fn run_on_trace(
    scenario: &Scenario,
    config: &RunConfig,
    trace: &StateTrace,
    harness: &HarnessConfig,
) -> Result<SuiteReport> {
    let context = TransitionContext::from_setup(trace)?;
    let suite = (scenario.suite)(&context)?;
    suite.run(trace, config, harness)
}

/// Every configuration of `scenario` allowed by `harness`.
pub fn configs_for(scenario: &Scenario, harness: &HarnessConfig) -> Vec<RunConfig> {
    harness.filter((scenario.configs)())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flicker_core::Snapshot;

    #[test]
    fn context_reads_first_snapshot_display() {
        let trace = StateTrace::ingest([
            Snapshot::builder(0)
                .display(Rect::new(0, 0, 1080, 2400))
                .build()
                .unwrap(),
            Snapshot::builder(1)
                .display(Rect::new(0, 0, 2400, 1080))
                .build()
                .unwrap(),
        ])
        .unwrap();
        let context = TransitionContext::from_setup(&trace).unwrap();
        assert_eq!(context.start_display_bounds(), Rect::new(0, 0, 1080, 2400));
        assert_eq!(context.start_display_region().unwrap().area(), 1080 * 2400);
    }

    #[test]
    fn missing_display_bounds_is_an_error() {
        let trace = StateTrace::ingest([Snapshot::builder(0).build().unwrap()]).unwrap();
        let err = TransitionContext::from_setup(&trace).unwrap_err();
        assert!(matches!(err, HarnessError::MissingDisplayBounds));
        let err = TransitionContext::from_setup(&StateTrace::empty()).unwrap_err();
        assert!(matches!(err, HarnessError::MissingDisplayBounds));
    }

    #[test]
    fn registry_lookup() {
        assert_eq!(find_scenario("open-trampoline").unwrap().name, "open-trampoline");
        assert!(matches!(
            find_scenario("close-trampoline"),
            Err(HarnessError::UnknownScenario { .. })
        ));
    }

    #[test]
    fn configs_respect_navigation_filter() {
        let scenario = find_scenario("open-trampoline").unwrap();
        assert_eq!(configs_for(scenario, &HarnessConfig::default()).len(), 2);
        let harness = HarnessConfig {
            navigation_mode: Some(crate::config::NavigationMode::ThreeButton),
            ..HarnessConfig::default()
        };
        assert_eq!(configs_for(scenario, &harness).len(), 1);
    }
}
