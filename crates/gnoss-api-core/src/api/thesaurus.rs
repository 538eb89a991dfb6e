//! Thesaurus endpoints and category name resolution

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{CategoryCache, CategoryResolver, ResolutionReport, ResolutionRequest};
use crate::client::GnossClient;
use crate::error::Result;

use super::require_scope;

/// A semantic thesaurus of a community ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thesaurus {
    pub source: String,
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Concept URI
    pub subject: String,
    /// Label, possibly multi-valued (`text@lang|||text@lang`)
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Serialize)]
struct ConceptBody<'a> {
    community_short_name: &'a str,
    source: &'a str,
    #[serde(flatten)]
    concept: &'a Concept,
}

#[derive(Serialize)]
struct DeleteConceptBody<'a> {
    community_short_name: &'a str,
    source: &'a str,
    subject: &'a str,
}

#[derive(Debug, Clone)]
pub struct ThesaurusApi {
    client: GnossClient,
}

impl ThesaurusApi {
    pub(crate) fn new(client: GnossClient) -> Self {
        Self { client }
    }

    pub fn get_thesaurus(&self, community: &str, source: &str) -> Result<Thesaurus> {
        require_scope(
            self.client.get(
                "thesaurus/get-thesaurus",
                &[("community_short_name", community), ("source", source)],
            ),
            community,
        )
    }

    pub fn add_concept(&self, community: &str, source: &str, concept: &Concept) -> Result<()> {
        self.client.post_unit(
            "thesaurus/add-concept",
            &ConceptBody {
                community_short_name: community,
                source,
                concept,
            },
        )
    }

    pub fn delete_concept(&self, community: &str, source: &str, subject: &str) -> Result<()> {
        self.client.post_unit(
            "thesaurus/delete-concept",
            &DeleteConceptBody {
                community_short_name: community,
                source,
                subject,
            },
        )
    }

    // ========== Category resolution ==========

    /// Ids of the categories named by `|`-delimited root-to-leaf paths.
    ///
    /// One id per path, in input order. Fails without partial results if
    /// any path does not resolve.
    pub fn resolve_hierarchical<T: AsRef<str>>(&self, community: &str, paths: &[T]) -> Result<Vec<Uuid>> {
        let source = self.client.community();
        CategoryResolver::new(&source).resolve_hierarchical(community, paths)
    }

    /// Ids of every category whose name, or any localized variant of it,
    /// equals one of `names`. Deduplicated, in order of first match.
    pub fn resolve_flat<T: AsRef<str>>(&self, community: &str, names: &[T]) -> Result<Vec<Uuid>> {
        let source = self.client.community();
        CategoryResolver::new(&source).resolve_flat(community, names)
    }

    pub fn resolve(&self, request: &ResolutionRequest) -> Result<ResolutionReport> {
        let source = self.client.community();
        CategoryResolver::new(&source).resolve(request)
    }

    /// Like [`resolve`](Self::resolve), reusing the snapshot held by `cache`
    pub fn resolve_cached(&self, request: &ResolutionRequest, cache: &CategoryCache) -> Result<ResolutionReport> {
        let source = self.client.community();
        CategoryResolver::with_cache(&source, cache).resolve(request)
    }
}
