//! Resource endpoints
//!
//! Single-resource calls, locking, and the three calls of a massive load.
//! Bulk variants live in `bulk.rs`, the lock guard in `lease.rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::GnossClient;
use crate::error::{GnossApiError, Result, TransportError};

use super::lease::ResourceLease;
use super::not_found_as_none;

/// Lock duration requested when the caller does not pick one
pub const DEFAULT_LOCK_SECONDS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category ids, as attached by the resolver
    #[serde(default)]
    pub categories: Vec<Uuid>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Body of `resource/load-resource`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResourceParams {
    pub community_short_name: String,
    /// Fixed id for the new resource; the platform assigns one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

/// Body of `resource/modify-resource`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyResourceParams {
    pub community_short_name: String,
    pub resource_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

/// One package of a massive load, ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageUpload {
    pub load_id: Uuid,
    pub package_name: String,
    /// SHA-256 of `content`, lowercase hex
    pub checksum: String,
    pub triple_count: usize,
    /// N-Triples
    pub content: String,
}

#[derive(Serialize)]
struct ResourceRef<'a> {
    community_short_name: &'a str,
    resource_id: Uuid,
}

#[derive(Serialize)]
struct LockBody<'a> {
    community_short_name: &'a str,
    resource_id: Uuid,
    lock_seconds: u32,
}

#[derive(Serialize)]
struct UnlockBody<'a> {
    community_short_name: &'a str,
    resource_id: Uuid,
    token: &'a str,
}

#[derive(Serialize)]
struct CreateLoadBody<'a> {
    community_short_name: &'a str,
    load_name: &'a str,
}

#[derive(Serialize)]
struct LoadRef {
    load_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct ResourceApi {
    client: GnossClient,
}

impl ResourceApi {
    pub(crate) fn new(client: GnossClient) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &GnossClient {
        &self.client
    }

    /// `None` when the resource does not exist
    pub fn get_resource(&self, community: &str, resource_id: Uuid) -> Result<Option<Resource>> {
        let id = resource_id.to_string();
        not_found_as_none(self.client.get(
            "resource/get-resource",
            &[("community_short_name", community), ("resource_id", &id)],
        ))
    }

    /// Create a resource and return its id
    pub fn load_resource(&self, params: &LoadResourceParams) -> Result<Uuid> {
        let id: Uuid = self.client.post("resource/load-resource", params)?;
        tracing::debug!(community = %params.community_short_name, resource_id = %id, "loaded resource");
        Ok(id)
    }

    pub fn modify_resource(&self, params: &ModifyResourceParams) -> Result<()> {
        self.client.post_unit("resource/modify-resource", params)
    }

    pub fn delete_resource(&self, community: &str, resource_id: Uuid) -> Result<()> {
        self.client.post_unit(
            "resource/delete-resource",
            &ResourceRef {
                community_short_name: community,
                resource_id,
            },
        )
    }

    // ========== Locking ==========

    /// Lock a resource for `lock_seconds`.
    ///
    /// The lease sends the lock token with every call made through it and
    /// unlocks the resource when released or dropped.
    pub fn lock_resource(&self, community: &str, resource_id: Uuid, lock_seconds: u32) -> Result<ResourceLease> {
        let answer: Result<Option<String>> = self.client.post(
            "resource/lock-resource",
            &LockBody {
                community_short_name: community,
                resource_id,
                lock_seconds,
            },
        );

        let token = match answer {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) | Err(GnossApiError::Transport(TransportError::Status { status: 409, .. })) => {
                return Err(GnossApiError::LockNotAcquired { resource_id });
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(community, %resource_id, "resource locked");
        let context = self.client.context().clone().with_lock_token(token.clone());
        let locked = ResourceApi::new(self.client.with_context(context));
        Ok(ResourceLease::new(locked, community, resource_id, token))
    }

    pub(crate) fn unlock_resource(&self, community: &str, resource_id: Uuid, token: &str) -> Result<()> {
        self.client.post_unit(
            "resource/unlock-resource",
            &UnlockBody {
                community_short_name: community,
                resource_id,
                token,
            },
        )
    }

    // ========== Massive load ==========

    /// Open a massive load and return its id
    pub fn create_massive_load(&self, community: &str, load_name: &str) -> Result<Uuid> {
        self.client.post(
            "resource/create-massive-load",
            &CreateLoadBody {
                community_short_name: community,
                load_name,
            },
        )
    }

    pub fn upload_package(&self, package: &PackageUpload) -> Result<()> {
        self.client
            .post_unit("resource/upload-massive-load-package", package)
    }

    pub fn close_massive_load(&self, load_id: Uuid) -> Result<()> {
        self.client
            .post_unit("resource/close-massive-load", &LoadRef { load_id })
    }
}
