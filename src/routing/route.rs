//! Compiled route entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::matcher::PathPattern;

/// Identity of an external view component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// What a matched route does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Mount a view.
    View(ViewId),
    /// Restart resolution against another location.
    Redirect(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::View(view) => write!(f, "view {}", view),
            Target::Redirect(to) => write!(f, "redirect {}", to),
        }
    }
}

/// A validated route entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: Option<String>,
    pub pattern: PathPattern,
    pub target: Target,
}

impl Route {
    /// Name for logs and resolutions; unnamed routes fall back to their pattern.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.pattern.as_str())
    }
}
