//! Bulk resource operations
//!
//! Each item is attempted on its own: a failure is logged and recorded in
//! the [`BulkReport`], and the batch moves on. Only retryable failures
//! (see [`GnossApiError::is_retryable`]) are attempted again, after a fixed
//! delay.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{CategoryCache, CategoryResolver, CategorySource, ResolutionMode};
use crate::config::{LoadConfig, DEFAULT_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use crate::error::{GnossApiError, Result};

use super::resource::{LoadResourceParams, ModifyResourceParams, ResourceApi};

/// A resource as authored by a person: categories are still text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    /// Required to modify; optional to load
    #[serde(default)]
    pub resource_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category paths or names, per [`BulkOptions::category_mode`]
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ResourceDraft {
    fn load_params(&self, community: &str, categories: Vec<Uuid>) -> LoadResourceParams {
        LoadResourceParams {
            community_short_name: community.to_string(),
            resource_id: self.resource_id,
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            categories,
        }
    }

    fn modify_params(&self, community: &str, categories: Vec<Uuid>) -> Result<ModifyResourceParams> {
        let resource_id = self.resource_id.ok_or_else(|| GnossApiError::InvalidResource {
            reason: format!("'{}' has no resource_id to modify", self.title),
        })?;
        Ok(ModifyResourceParams {
            community_short_name: community.to_string(),
            resource_id,
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            categories,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOptions {
    /// Total tries per item, at least one
    pub attempts: u32,
    pub retry_delay: Duration,
    pub category_mode: ResolutionMode,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            category_mode: ResolutionMode::default(),
        }
    }
}

impl BulkOptions {
    pub fn from_config(load: &LoadConfig) -> Self {
        Self {
            attempts: load.attempts,
            retry_delay: load.retry_delay(),
            ..Self::default()
        }
    }

    pub fn with_category_mode(mut self, mode: ResolutionMode) -> Self {
        self.category_mode = mode;
        self
    }
}

/// An item that still failed after its last attempt
#[derive(Debug)]
pub struct BulkFailure {
    /// Position in the input batch
    pub index: usize,
    pub resource_id: Option<Uuid>,
    pub attempts: u32,
    pub error: GnossApiError,
}

#[derive(Debug, Default)]
pub struct BulkReport {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, operation: &str, index: usize, resource_id: Option<Uuid>, outcome: (Result<Uuid>, u32)) {
        match outcome {
            (Ok(id), _) => self.succeeded.push(id),
            (Err(error), attempts) => {
                tracing::warn!(
                    operation,
                    index,
                    resource_id = ?resource_id,
                    attempts,
                    error = %error,
                    "resource failed, continuing with the batch"
                );
                self.failed.push(BulkFailure {
                    index,
                    resource_id,
                    attempts,
                    error,
                });
            }
        }
    }

    fn log_summary(&self, operation: &str, community: &str) {
        tracing::info!(
            operation,
            community,
            succeeded = self.succeeded.len(),
            failed = self.failed.len(),
            "bulk operation finished"
        );
    }
}

/// Run `op` until it succeeds, fails for good, or runs out of attempts.
/// Returns the outcome with the number of attempts made.
fn with_attempts<T>(options: &BulkOptions, mut op: impl FnMut() -> Result<T>) -> (Result<T>, u32) {
    let limit = options.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return (Ok(value), attempt),
            Err(e) if e.is_retryable() && attempt < limit => {
                tracing::debug!(attempt, limit, error = %e, "retrying");
                if !options.retry_delay.is_zero() {
                    thread::sleep(options.retry_delay);
                }
                attempt += 1;
            }
            Err(e) => return (Err(e), attempt),
        }
    }
}

impl ResourceApi {
    /// Load every draft, resolving its category text first.
    ///
    /// The community directory is fetched once for the whole batch.
    pub fn load_resources(&self, community: &str, drafts: &[ResourceDraft], options: &BulkOptions) -> BulkReport {
        let source = self.client().community();
        let cache = CategoryCache::new();
        let resolver = CategoryResolver::with_cache(&source, &cache);
        let mut report = BulkReport::default();

        for (index, draft) in drafts.iter().enumerate() {
            let outcome = with_attempts(options, || {
                let categories = resolve_categories(&resolver, community, draft, options.category_mode)?;
                self.load_resource(&draft.load_params(community, categories))
            });
            report.record("load", index, draft.resource_id, outcome);
        }

        report.log_summary("load", community);
        report
    }

    /// Modify every draft in place; each must carry a `resource_id`
    pub fn modify_resources(&self, community: &str, drafts: &[ResourceDraft], options: &BulkOptions) -> BulkReport {
        let source = self.client().community();
        let cache = CategoryCache::new();
        let resolver = CategoryResolver::with_cache(&source, &cache);
        let mut report = BulkReport::default();

        for (index, draft) in drafts.iter().enumerate() {
            let outcome = with_attempts(options, || {
                let categories = resolve_categories(&resolver, community, draft, options.category_mode)?;
                let params = draft.modify_params(community, categories)?;
                self.modify_resource(&params)?;
                Ok(params.resource_id)
            });
            report.record("modify", index, draft.resource_id, outcome);
        }

        report.log_summary("modify", community);
        report
    }

    pub fn delete_resources(&self, community: &str, resource_ids: &[Uuid], options: &BulkOptions) -> BulkReport {
        let mut report = BulkReport::default();

        for (index, &resource_id) in resource_ids.iter().enumerate() {
            let outcome = with_attempts(options, || {
                self.delete_resource(community, resource_id)?;
                Ok(resource_id)
            });
            report.record("delete", index, Some(resource_id), outcome);
        }

        report.log_summary("delete", community);
        report
    }
}

fn resolve_categories<S>(
    resolver: &CategoryResolver<'_, S>,
    community: &str,
    draft: &ResourceDraft,
    mode: ResolutionMode,
) -> Result<Vec<Uuid>>
where
    S: CategorySource + ?Sized,
{
    if draft.categories.is_empty() {
        return Ok(Vec::new());
    }
    resolver
        .snapshot(community)?
        .resolve(mode, draft.categories.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::http::mock::{test_client, MockTransport};
    use crate::http::HttpMethod;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn options(attempts: u32) -> BulkOptions {
        BulkOptions {
            attempts,
            retry_delay: Duration::ZERO,
            category_mode: ResolutionMode::Hierarchical,
        }
    }

    fn draft(title: &str, categories: &[&str]) -> ResourceDraft {
        ResourceDraft {
            title: title.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..ResourceDraft::default()
        }
    }

    fn transport_with_directory() -> std::sync::Arc<MockTransport> {
        let transport = MockTransport::new();
        transport.reply(
            HttpMethod::Get,
            "community/get-categories",
            200,
            &format!(
                r#"[
                    {{"category_id": "{}", "category_name": "Tech", "parent_category_id": null}},
                    {{"category_id": "{}", "category_name": "AI", "parent_category_id": "{}"}}
                ]"#,
                id(1),
                id(2),
                id(1)
            ),
        );
        transport
    }

    #[test]
    fn test_load_attaches_resolved_ids() {
        let transport = transport_with_directory();
        transport.reply(HttpMethod::Post, "resource/load-resource", 200, &format!("\"{}\"", id(100)));
        let api = test_client(&transport).resources();

        let report = api.load_resources(
            "c",
            &[draft("One", &["Tech|AI"]), draft("Two", &["Tech"])],
            &options(3),
        );

        assert!(report.is_complete());
        assert_eq!(report.succeeded, vec![id(100), id(100)]);
        // directory fetched once for the batch
        assert_eq!(transport.requests_to("community/get-categories").len(), 1);

        let loads = transport.requests_to("resource/load-resource");
        let body: serde_json::Value = serde_json::from_str(loads[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["categories"], serde_json::json!([id(2).to_string()]));
    }

    #[test]
    fn test_transport_errors_are_retried_up_to_attempts() {
        let transport = transport_with_directory();
        transport.reply(HttpMethod::Post, "resource/load-resource", 503, "busy");
        transport.reply(HttpMethod::Post, "resource/load-resource", 503, "busy");
        transport.reply(HttpMethod::Post, "resource/load-resource", 200, &format!("\"{}\"", id(100)));
        let api = test_client(&transport).resources();

        let report = api.load_resources("c", &[draft("One", &["Tech"])], &options(3));
        assert!(report.is_complete());
        assert_eq!(transport.requests_to("resource/load-resource").len(), 3);
    }

    #[test]
    fn test_gives_up_after_last_attempt() {
        let transport = transport_with_directory();
        transport.fail_connection(HttpMethod::Post, "resource/load-resource");
        let api = test_client(&transport).resources();

        let report = api.load_resources("c", &[draft("One", &[])], &options(2));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].attempts, 2);
        assert!(matches!(
            report.failed[0].error,
            GnossApiError::Transport(TransportError::Connection { .. })
        ));
        assert_eq!(transport.requests_to("resource/load-resource").len(), 2);
    }

    #[test]
    fn test_accepted_load_with_undecodable_answer_is_posted_once() {
        let transport = transport_with_directory();
        transport.reply(HttpMethod::Post, "resource/load-resource", 200, "<html>ok</html>");
        let api = test_client(&transport).resources();

        let report = api.load_resources("c", &[draft("One", &["Tech"])], &options(3));

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].attempts, 1);
        assert!(matches!(
            report.failed[0].error,
            GnossApiError::Transport(TransportError::MalformedBody { .. })
        ));
        assert_eq!(transport.requests_to("resource/load-resource").len(), 1);
    }

    #[test]
    fn test_resolution_errors_are_not_retried_and_batch_continues() {
        let transport = transport_with_directory();
        transport.reply(HttpMethod::Post, "resource/load-resource", 200, &format!("\"{}\"", id(100)));
        let api = test_client(&transport).resources();

        let report = api.load_resources(
            "c",
            &[draft("Bad", &["Tech|Robotics"]), draft("Good", &["Tech|AI"])],
            &options(5),
        );

        assert_eq!(report.succeeded, vec![id(100)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 0);
        assert_eq!(report.failed[0].attempts, 1);
        assert!(matches!(
            report.failed[0].error,
            GnossApiError::CategoryResolution { .. }
        ));
        // only the good draft reached the platform
        assert_eq!(transport.requests_to("resource/load-resource").len(), 1);
    }

    #[test]
    fn test_flat_mode_resolves_names() {
        let transport = transport_with_directory();
        transport.reply(HttpMethod::Post, "resource/load-resource", 200, &format!("\"{}\"", id(100)));
        let api = test_client(&transport).resources();

        let opts = options(1).with_category_mode(ResolutionMode::Flat);
        let report = api.load_resources("c", &[draft("One", &["AI"])], &opts);
        assert!(report.is_complete());
    }

    #[test]
    fn test_modify_requires_resource_id() {
        let transport = transport_with_directory();
        transport.reply(HttpMethod::Post, "resource/modify-resource", 200, "");
        let api = test_client(&transport).resources();

        let with_id = ResourceDraft {
            resource_id: Some(id(7)),
            ..draft("Known", &["Tech"])
        };
        let report = api.modify_resources("c", &[draft("Unknown", &[]), with_id], &options(3));

        assert_eq!(report.succeeded, vec![id(7)]);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0].error,
            GnossApiError::InvalidResource { .. }
        ));
    }

    #[test]
    fn test_delete_client_errors_are_not_retried() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Post, "resource/delete-resource", 400, "bad id");
        let api = test_client(&transport).resources();

        let report = api.delete_resources("c", &[id(1), id(2)], &options(4));
        assert_eq!(report.failed.len(), 2);
        assert_eq!(transport.requests_to("resource/delete-resource").len(), 2);
    }

    #[test]
    fn test_draft_json_defaults() {
        let draft: ResourceDraft =
            serde_json::from_str(r#"{"title": "T", "categories": ["Tech|AI"]}"#).unwrap();
        assert_eq!(draft.resource_id, None);
        assert_eq!(draft.categories, vec!["Tech|AI".to_string()]);
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_options_from_config() {
        let load = LoadConfig {
            attempts: 2,
            retry_delay_ms: 250,
            ..LoadConfig::default()
        };
        let options = BulkOptions::from_config(&load);
        assert_eq!(options.attempts, 2);
        assert_eq!(options.retry_delay, Duration::from_millis(250));
        assert_eq!(options.category_mode, ResolutionMode::Hierarchical);
    }
}
