#![forbid(unsafe_code)]

//! Trace capture sources.
//!
//! The harness never talks to a device. A [`TraceCapture`] hands back the
//! snapshots recorded for a session, either from a JSON file written by an
//! external capture pipeline or from an in-memory fixture.
//!
//! # Capture file format
//!
//! ```json
//! { "session": "open-trampoline-1", "snapshots": [ { "timestamp": 0, ... } ] }
//! ```
//!
//! A bare JSON array of snapshots is also accepted.

use std::path::{Path, PathBuf};

use flicker_core::{Snapshot, StateTrace};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{HarnessError, Result};

/// Identifies one capture run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of recorded snapshots.
pub trait TraceCapture {
    /// Snapshots captured for `session`, in capture order.
    fn capture(&mut self, session: &SessionId) -> Result<Vec<Snapshot>>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum CaptureFile {
    Session {
        #[serde(default)]
        session: Option<SessionId>,
        snapshots: Vec<Snapshot>,
    },
    Bare(Vec<Snapshot>),
}

/// Reads a capture written to disk by an external pipeline.
#[derive(Debug, Clone)]
pub struct RecordedCapture {
    path: PathBuf,
}

impl RecordedCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshots` as a capture file for `session`.
    pub fn write(path: &Path, session: &SessionId, snapshots: &[Snapshot]) -> Result<()> {
        let file = CaptureFile::Session {
            session: Some(session.clone()),
            snapshots: snapshots.to_vec(),
        };
        std::fs::write(path, serde_json::to_vec_pretty(&file)?)?;
        Ok(())
    }
}

impl TraceCapture for RecordedCapture {
    fn capture(&mut self, session: &SessionId) -> Result<Vec<Snapshot>> {
        if !self.path.exists() {
            return Err(HarnessError::MissingCapture {
                path: self.path.clone(),
            });
        }
        let bytes = std::fs::read(&self.path)?;
        let file: CaptureFile = serde_json::from_slice(&bytes)?;
        let snapshots = match file {
            CaptureFile::Session {
                session: Some(recorded),
                ..
            } if recorded != *session => {
                return Err(HarnessError::SessionMismatch {
                    expected: session.to_string(),
                    actual: recorded.to_string(),
                });
            }
            CaptureFile::Session { snapshots, .. } | CaptureFile::Bare(snapshots) => snapshots,
        };
        debug!(
            path = %self.path.display(),
            snapshots = snapshots.len(),
            "read capture file"
        );
        Ok(snapshots)
    }
}

/// In-memory capture for fixtures and tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureCapture {
    snapshots: Vec<Snapshot>,
}

impl FixtureCapture {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }
}

impl TraceCapture for FixtureCapture {
    fn capture(&mut self, _session: &SessionId) -> Result<Vec<Snapshot>> {
        Ok(self.snapshots.clone())
    }
}

/// Capture a session and validate it into a [`StateTrace`].
pub fn ingest(capture: &mut dyn TraceCapture, session: &SessionId) -> Result<StateTrace> {
    let snapshots = capture.capture(session)?;
    let trace = StateTrace::ingest(snapshots)?;
    info!(%session, snapshots = trace.len(), "trace ingested");
    Ok(trace)
}

/// Load a capture file regardless of the session it was recorded under.
pub fn load_trace(path: &Path) -> Result<StateTrace> {
    if !path.exists() {
        return Err(HarnessError::MissingCapture {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;
    let file: CaptureFile = serde_json::from_slice(&bytes)?;
    let snapshots = match file {
        CaptureFile::Session { snapshots, .. } | CaptureFile::Bare(snapshots) => snapshots,
    };
    Ok(StateTrace::ingest(snapshots)?)
}
