//! Navigation targets.
//!
//! A target is a site-relative URL reference (`/node/42?tab=meta#top`). It is
//! parsed against a fixed origin so dot segments are normalised and foreign
//! origins can be rejected.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::routing::resolver::ResolveError;

const ORIGIN: &str = "http://app.localhost/";

/// A parsed navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

impl Location {
    pub fn parse(target: &str) -> Result<Self, ResolveError> {
        let invalid = |source| ResolveError::InvalidTarget {
            target: target.to_string(),
            source,
        };
        let base = Url::parse(ORIGIN).map_err(invalid)?;
        let url = base.join(target).map_err(invalid)?;

        if url.origin() != base.origin() {
            return Err(ResolveError::ExternalTarget {
                target: target.to_string(),
            });
        }

        Ok(Self {
            path: url.path().to_string(),
            query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
            fragment: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    /// The path with percent-escapes decoded, for reporting.
    pub fn decoded_path(&self) -> String {
        match urlencoding::decode(&self.path) {
            Ok(path) => path.into_owned(),
            Err(_) => self.path.clone(),
        }
    }

    /// Path plus query, without the fragment.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
