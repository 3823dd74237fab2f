#![forbid(unsafe_code)]

//! Run configurations and harness settings.
//!
//! Flicker scenarios run once per [`RunConfig`]: an orientation paired with
//! a navigation mode. The sets below replace annotation-driven parameter
//! factories with plain lists that any test loop can iterate.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `FLICKER_INCLUDE_FLAKY` | flaky case failures become blocking |
//! | `FLICKER_NAV_MODE` | restrict runs to `3_BUTTON_NAV` or `GESTURAL_NAV` |
//! | `FLICKER_LOG_JSON` | emit JSON logs |

use serde::Serialize;

use crate::error::{HarnessError, Result};

/// Display rotation during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Self::Rotation0,
        Self::Rotation90,
        Self::Rotation180,
        Self::Rotation270,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rotation0 => "ROTATION_0",
            Self::Rotation90 => "ROTATION_90",
            Self::Rotation180 => "ROTATION_180",
            Self::Rotation270 => "ROTATION_270",
        }
    }
}

/// System navigation mode during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NavigationMode {
    ThreeButton,
    Gestural,
}

impl NavigationMode {
    pub const ALL: [NavigationMode; 2] = [Self::ThreeButton, Self::Gestural];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ThreeButton => "3_BUTTON_NAV",
            Self::Gestural => "GESTURAL_NAV",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

/// One parameterization of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RunConfig {
    pub orientation: Orientation,
    pub navigation_mode: NavigationMode,
}

impl RunConfig {
    pub const fn new(orientation: Orientation, navigation_mode: NavigationMode) -> Self {
        Self {
            orientation,
            navigation_mode,
        }
    }

    /// Stable name, e.g. `ROTATION_0_GESTURAL_NAV`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.orientation.name(), self.navigation_mode.name())
    }

    /// Look up any orientation/navigation pair by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Result<Self> {
        Orientation::ALL
            .into_iter()
            .flat_map(|o| NavigationMode::ALL.into_iter().map(move |n| Self::new(o, n)))
            .find(|config| config.name() == name)
            .ok_or_else(|| HarnessError::UnknownConfig {
                name: name.to_string(),
            })
    }

    /// Natural orientation under every navigation mode.
    pub fn non_rotation_tests() -> Vec<RunConfig> {
        cross(&[Orientation::Rotation0])
    }

    /// Natural and quarter-turn orientations under every navigation mode.
    pub fn rotation_tests() -> Vec<RunConfig> {
        cross(&[Orientation::Rotation0, Orientation::Rotation90])
    }
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

fn cross(orientations: &[Orientation]) -> Vec<RunConfig> {
    NavigationMode::ALL
        .into_iter()
        .flat_map(|nav| orientations.iter().map(move |&o| RunConfig::new(o, nav)))
        .collect()
}

/// Harness settings read from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Treat failures of flaky cases as blocking.
    pub include_flaky: bool,
    /// Only run configurations with this navigation mode.
    pub navigation_mode: Option<NavigationMode>,
    /// Emit JSON-formatted logs.
    pub log_json: bool,
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        Self {
            include_flaky: env_flag("FLICKER_INCLUDE_FLAKY"),
            navigation_mode: std::env::var("FLICKER_NAV_MODE")
                .ok()
                .and_then(|name| NavigationMode::from_name(name.trim())),
            log_json: env_flag("FLICKER_LOG_JSON"),
        }
    }

    /// Drop configurations excluded by `FLICKER_NAV_MODE`.
    pub fn filter(&self, configs: Vec<RunConfig>) -> Vec<RunConfig> {
        match self.navigation_mode {
            Some(mode) => configs
                .into_iter()
                .filter(|c| c.navigation_mode == mode)
                .collect(),
            None => configs,
        }
    }
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}
