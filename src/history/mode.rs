//! Address-bar encoding.
//!
//! Matching never sees the encoding; it only decides how a resolved
//! location is written to (and read back from) the address bar.

use serde::{Deserialize, Serialize};

use crate::routing::location::Location;

/// How locations appear in the address bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Clean paths: `/base/node/42`.
    #[default]
    Path,
    /// Fragment addressing: `/base/#/node/42`.
    Hash,
}

/// History mode bound to a base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addressing {
    mode: HistoryMode,
    /// Normalised: empty for the root, otherwise `/prefix` without trailing slash.
    base: String,
}

impl Addressing {
    pub fn new(mode: HistoryMode, base: &str) -> Self {
        let trimmed = base.trim_end_matches('/');
        let base = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self { mode, base }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Base path, `/` for the root.
    pub fn base(&self) -> &str {
        if self.base.is_empty() {
            "/"
        } else {
            &self.base
        }
    }

    /// Encode a location for the address bar.
    pub fn href(&self, location: &Location) -> String {
        match self.mode {
            HistoryMode::Path => format!("{}{}", self.base, location),
            HistoryMode::Hash => format!("{}/#{}", self.base, location),
        }
    }

    /// Decode an address-bar href back into a navigation target.
    ///
    /// Returns `None` when the href lies outside the base.
    pub fn target_from_href(&self, href: &str) -> Option<String> {
        match self.mode {
            HistoryMode::Path => self.strip_base(href).map(str::to_string),
            HistoryMode::Hash => {
                let (before, after) = href.split_once('#').unwrap_or((href, ""));
                self.strip_base(before).filter(|rest| *rest == "/")?;
                if after.is_empty() {
                    Some("/".to_string())
                } else if after.starts_with('/') {
                    Some(after.to_string())
                } else {
                    Some(format!("/{}", after))
                }
            }
        }
    }

    /// Remove the base from a request path.
    ///
    /// `/app`, `/app/` and `/app/map` are under base `/app`; `/apple` is not.
    pub fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.base.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}
