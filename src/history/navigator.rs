//! Navigation driver.
//!
//! # Responsibilities
//! - Resolve navigation requests (push, replace, named, back/forward)
//! - Commit the final, post-redirect href to history
//! - Track the mounted view
//!
//! # Design Decisions
//! - Failed resolution leaves history and the mounted view untouched
//! - `&mut self` on every navigation: events are handled one at a time,
//!   in the order they are dispatched

use std::sync::Arc;

use crate::history::memory::History;
use crate::history::mode::Addressing;
use crate::routing::matcher::Params;
use crate::routing::resolver::{Resolution, ResolveError, Resolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Push,
    Replace,
}

/// Drives a [`History`] through a shared [`Resolver`].
pub struct Navigator<H: History> {
    resolver: Arc<Resolver>,
    addressing: Addressing,
    history: H,
    current: Option<Resolution>,
}

impl<H: History> Navigator<H> {
    pub fn new(resolver: Arc<Resolver>, addressing: Addressing, history: H) -> Self {
        Self {
            resolver,
            addressing,
            history,
            current: None,
        }
    }

    /// Resolve whatever the history currently shows (root when empty) and
    /// mount it, rewriting the active entry to its canonical href.
    pub fn start(&mut self) -> Result<&Resolution, ResolveError> {
        let target = match self.history.current() {
            Some(href) => self
                .addressing
                .target_from_href(href)
                .ok_or_else(|| ResolveError::ExternalTarget {
                    target: href.to_string(),
                })?,
            None => "/".to_string(),
        };
        self.commit(&target, Commit::Replace)
    }

    pub fn push(&mut self, target: &str) -> Result<&Resolution, ResolveError> {
        self.commit(target, Commit::Push)
    }

    pub fn replace(&mut self, target: &str) -> Result<&Resolution, ResolveError> {
        self.commit(target, Commit::Replace)
    }

    /// Navigate to a route by name.
    pub fn push_named(&mut self, name: &str, params: &Params) -> Result<&Resolution, ResolveError> {
        let target = self.resolver.href_for(name, params)?;
        self.commit(&target, Commit::Push)
    }

    pub fn back(&mut self) -> Result<Option<&Resolution>, ResolveError> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Result<Option<&Resolution>, ResolveError> {
        self.go(1)
    }

    /// Move through history and mount whatever the new entry resolves to.
    ///
    /// `Ok(None)` when the move is out of range.
    pub fn go(&mut self, delta: isize) -> Result<Option<&Resolution>, ResolveError> {
        let Some(href) = self.history.go(delta).map(str::to_owned) else {
            return Ok(None);
        };
        let resolved = match self.addressing.target_from_href(&href) {
            Some(target) => self.resolver.resolve(&target),
            None => Err(ResolveError::ExternalTarget { target: href }),
        };

        let resolution = match resolved {
            Ok(resolution) => resolution,
            Err(err) => {
                // Step back onto the entry whose view is still mounted.
                self.history.go(-delta);
                tracing::warn!(delta, error = %err, "History traversal rejected");
                return Err(err);
            }
        };
        tracing::debug!(delta, view = %resolution.view, "History traversal");
        let mounted: &Resolution = self.current.insert(resolution);
        Ok(Some(mounted))
    }

    /// The mounted view, if any navigation has succeeded.
    pub fn current(&self) -> Option<&Resolution> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn addressing(&self) -> &Addressing {
        &self.addressing
    }

    fn commit(&mut self, target: &str, commit: Commit) -> Result<&Resolution, ResolveError> {
        let resolution = match self.resolver.resolve(target) {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::warn!(target_path = target, error = %err, "Navigation rejected");
                return Err(err);
            }
        };

        let href = self.addressing.href(&resolution.location);
        tracing::debug!(
            target_path = target,
            href = %href,
            view = %resolution.view,
            commit = ?commit,
            "Navigation committed"
        );
        match commit {
            Commit::Push => self.history.push(href),
            Commit::Replace => self.history.replace(href),
        }
        let mounted: &Resolution = self.current.insert(resolution);
        Ok(mounted)
    }
}
