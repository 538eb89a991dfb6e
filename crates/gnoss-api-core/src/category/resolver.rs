//! Category Resolver
//!
//! Turns human-authored category text into the category ids the platform
//! expects on a resource. Resolution is all-or-nothing: either every
//! requested name resolves or the whole call fails with
//! [`GnossApiError::CategoryResolution`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GnossApiError, Result};

use super::name::matches_name;
use super::source::{CategoryCache, CategorySource};
use super::tree::CategoryTree;

/// How requested names are matched against the directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// `Root|Child|Leaf` paths walked from the roots
    #[default]
    Hierarchical,
    /// Plain names matched anywhere, including localized variants
    Flat,
}

impl ResolutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Names to resolve within one community
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub scope: String,
    pub names: Vec<String>,
    pub mode: ResolutionMode,
}

impl ResolutionRequest {
    pub fn hierarchical<I, S>(scope: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: scope.into(),
            names: paths.into_iter().map(Into::into).collect(),
            mode: ResolutionMode::Hierarchical,
        }
    }

    pub fn flat<I, S>(scope: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: scope.into(),
            names: names.into_iter().map(Into::into).collect(),
            mode: ResolutionMode::Flat,
        }
    }
}

/// Successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReport {
    pub scope: String,
    pub mode: ResolutionMode,
    /// One id per path (hierarchical) or the deduplicated matches (flat)
    pub ids: Vec<Uuid>,
}

impl CategoryTree {
    /// Resolve each path to the id of its last segment.
    ///
    /// The result has one id per input path, in input order.
    pub fn resolve_hierarchical<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(paths.len());
        let mut unresolved = Vec::new();

        for path in paths {
            let path = path.as_ref();
            match self.find_path(path) {
                Some(node) => ids.push(node.id()),
                None => unresolved.push(path.to_string()),
            }
        }

        self.finish(ResolutionMode::Hierarchical, ids, unresolved)
    }

    /// Resolve plain names against every category, wherever it sits.
    ///
    /// One name may match several categories; each category appears once
    /// in the result, in order of first match.
    pub fn resolve_flat<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        let mut unresolved = Vec::new();

        for name in names {
            let name = name.as_ref();
            if !seen_names.insert(name) {
                continue;
            }

            let mut matched = false;
            for category in self.categories() {
                if matches_name(&category.name, name) {
                    matched = true;
                    if seen_ids.insert(category.id) {
                        ids.push(category.id);
                    }
                }
            }

            if !matched {
                unresolved.push(name.to_string());
            }
        }

        self.finish(ResolutionMode::Flat, ids, unresolved)
    }

    /// Resolve in the given mode
    pub fn resolve<S: AsRef<str>>(&self, mode: ResolutionMode, names: &[S]) -> Result<Vec<Uuid>> {
        match mode {
            ResolutionMode::Hierarchical => self.resolve_hierarchical(names),
            ResolutionMode::Flat => self.resolve_flat(names),
        }
    }

    fn finish(
        &self,
        mode: ResolutionMode,
        ids: Vec<Uuid>,
        unresolved: Vec<String>,
    ) -> Result<Vec<Uuid>> {
        if unresolved.is_empty() {
            return Ok(ids);
        }

        tracing::debug!(
            scope = %self.scope(),
            %mode,
            unresolved = ?unresolved,
            orphans = self.orphans().count(),
            "category resolution failed"
        );
        Err(GnossApiError::CategoryResolution { mode, unresolved })
    }
}

/// Fetches the directory for a scope and resolves names against it
pub struct CategoryResolver<'a, S: CategorySource + ?Sized> {
    source: &'a S,
    cache: Option<&'a CategoryCache>,
}

impl<'a, S: CategorySource + ?Sized> CategoryResolver<'a, S> {
    /// Resolver that fetches a fresh directory on every call
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Resolver that reuses snapshots held by `cache`
    pub fn with_cache(source: &'a S, cache: &'a CategoryCache) -> Self {
        Self {
            source,
            cache: Some(cache),
        }
    }

    /// Current tree for a scope
    pub fn snapshot(&self, scope: &str) -> Result<Arc<CategoryTree>> {
        match self.cache {
            Some(cache) => cache.get_or_fetch(self.source, scope),
            None => {
                let directory = self.source.fetch_categories(scope)?;
                Ok(Arc::new(CategoryTree::build(directory)))
            }
        }
    }

    pub fn resolve(&self, request: &ResolutionRequest) -> Result<ResolutionReport> {
        let tree = self.snapshot(&request.scope)?;
        let ids = tree.resolve(request.mode, request.names.as_slice())?;
        Ok(ResolutionReport {
            scope: request.scope.clone(),
            mode: request.mode,
            ids,
        })
    }

    pub fn resolve_hierarchical<T: AsRef<str>>(&self, scope: &str, paths: &[T]) -> Result<Vec<Uuid>> {
        self.snapshot(scope)?.resolve_hierarchical(paths)
    }

    pub fn resolve_flat<T: AsRef<str>>(&self, scope: &str, names: &[T]) -> Result<Vec<Uuid>> {
        self.snapshot(scope)?.resolve_flat(names)
    }
}
