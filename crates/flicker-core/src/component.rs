#![forbid(unsafe_code)]

//! Component identifiers used to match windows and layers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Identifies an app component (package + class) or a bare layer name.
///
/// Matching is equality-only. Bare layer names such as
/// `"Animation Background"` use an empty package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId {
    #[serde(default)]
    package: Cow<'static, str>,
    class: Cow<'static, str>,
}

impl ComponentId {
    /// Create an identifier from owned or borrowed parts.
    pub fn new(package: impl Into<Cow<'static, str>>, class: impl Into<Cow<'static, str>>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }

    /// Identifier usable in `const` items.
    #[must_use]
    pub const fn from_static(package: &'static str, class: &'static str) -> Self {
        Self {
            package: Cow::Borrowed(package),
            class: Cow::Borrowed(class),
        }
    }

    /// Identifier for a layer that has no owning package.
    pub fn layer(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new("", name)
    }

    #[inline]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.class)
        } else {
            write!(f, "{}/{}", self.package, self.class)
        }
    }
}
