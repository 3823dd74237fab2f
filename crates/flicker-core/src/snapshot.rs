#![forbid(unsafe_code)]

//! Captured window-manager and compositor state at one instant.
//!
//! A [`Snapshot`] pairs the window list (window manager view) with the
//! layer list (compositor view). Both are immutable once built; geometry
//! is validated at construction so every query is infallible.

use serde::{Deserialize, Serialize};

use crate::component::ComponentId;
use crate::geometry::{InvalidRegionError, Rect};
use crate::region::Region;

/// Monotonic capture time in nanoseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    #[inline]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Which list of a snapshot an assertion inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Window-manager windows.
    Window,
    /// Compositor layers.
    Layer,
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Window => f.write_str("window"),
            Self::Layer => f.write_str("layer"),
        }
    }
}

/// A window as reported by the window manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub component: ComponentId,
    pub visible: bool,
    pub bounds: Rect,
}

/// A layer as reported by the compositor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerState {
    pub component: ComponentId,
    pub visible: bool,
    pub region: Region,
}

/// One captured UI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord")]
pub struct Snapshot {
    timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<Rect>,
    windows: Vec<WindowState>,
    layers: Vec<LayerState>,
}

/// Unvalidated wire form of [`Snapshot`].
#[derive(Deserialize)]
struct SnapshotRecord {
    timestamp: Timestamp,
    #[serde(default)]
    display: Option<Rect>,
    #[serde(default)]
    windows: Vec<WindowState>,
    #[serde(default)]
    layers: Vec<LayerState>,
}

impl TryFrom<SnapshotRecord> for Snapshot {
    type Error = InvalidRegionError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        Snapshot::new(record.timestamp, record.display, record.windows, record.layers)
    }
}

impl Snapshot {
    /// Build a snapshot, validating display and window geometry.
    ///
    /// Layer regions are validated when the [`Region`] is built.
    pub fn new(
        timestamp: Timestamp,
        display: Option<Rect>,
        windows: Vec<WindowState>,
        layers: Vec<LayerState>,
    ) -> Result<Self, InvalidRegionError> {
        if let Some(display) = display {
            display.validate()?;
        }
        for window in &windows {
            window.bounds.validate()?;
        }
        Ok(Self {
            timestamp,
            display,
            windows,
            layers,
        })
    }

    /// Start building a snapshot captured at `timestamp`.
    pub fn builder(timestamp: u64) -> SnapshotBuilder {
        SnapshotBuilder::new(Timestamp(timestamp))
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Physical display bounds, when the capture reported them.
    #[inline]
    pub fn display(&self) -> Option<Rect> {
        self.display
    }

    #[inline]
    pub fn windows(&self) -> &[WindowState] {
        &self.windows
    }

    #[inline]
    pub fn layers(&self) -> &[LayerState] {
        &self.layers
    }

    /// First window matching `component`.
    pub fn window(&self, component: &ComponentId) -> Option<&WindowState> {
        self.windows.iter().find(|w| &w.component == component)
    }

    /// First layer matching `component`.
    pub fn layer(&self, component: &ComponentId) -> Option<&LayerState> {
        self.layers.iter().find(|l| &l.component == component)
    }

    /// True when any entry on `surface` matches `component`.
    pub fn contains(&self, surface: Surface, component: &ComponentId) -> bool {
        match surface {
            Surface::Window => self.window(component).is_some(),
            Surface::Layer => self.layer(component).is_some(),
        }
    }

    /// True when some matching entry on `surface` is reported visible.
    ///
    /// Absent components are not visible.
    pub fn is_visible(&self, surface: Surface, component: &ComponentId) -> bool {
        match surface {
            Surface::Window => self
                .windows
                .iter()
                .any(|w| &w.component == component && w.visible),
            Surface::Layer => self
                .layers
                .iter()
                .any(|l| &l.component == component && l.visible),
        }
    }

    /// Union of the visible geometry of every matching entry.
    ///
    /// Empty when the component is absent or invisible.
    pub fn visible_region(&self, surface: Surface, component: &ComponentId) -> Region {
        match surface {
            Surface::Window => {
                let rects: Vec<Rect> = self
                    .windows
                    .iter()
                    .filter(|w| &w.component == component && w.visible)
                    .map(|w| w.bounds)
                    .collect();
                Region::from_valid_rects(&rects)
            }
            Surface::Layer => self
                .layers
                .iter()
                .filter(|l| &l.component == component && l.visible)
                .fold(Region::new(), |acc, l| acc.union(&l.region)),
        }
    }
}

/// Fluent construction of [`Snapshot`] values for fixtures and captures.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    timestamp: Timestamp,
    display: Option<Rect>,
    windows: Vec<WindowState>,
    layers: Vec<LayerState>,
}

impl SnapshotBuilder {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            display: None,
            windows: Vec::new(),
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn display(mut self, bounds: Rect) -> Self {
        self.display = Some(bounds);
        self
    }

    #[must_use]
    pub fn window(mut self, component: ComponentId, visible: bool, bounds: Rect) -> Self {
        self.windows.push(WindowState {
            component,
            visible,
            bounds,
        });
        self
    }

    #[must_use]
    pub fn layer(mut self, component: ComponentId, visible: bool, region: Region) -> Self {
        self.layers.push(LayerState {
            component,
            visible,
            region,
        });
        self
    }

    /// Convenience for a layer covering one rectangle.
    pub fn layer_rect(
        self,
        component: ComponentId,
        visible: bool,
        bounds: Rect,
    ) -> Result<Self, InvalidRegionError> {
        let region = Region::from_rect(bounds)?;
        Ok(self.layer(component, visible, region))
    }

    pub fn build(self) -> Result<Snapshot, InvalidRegionError> {
        Snapshot::new(self.timestamp, self.display, self.windows, self.layers)
    }
}
