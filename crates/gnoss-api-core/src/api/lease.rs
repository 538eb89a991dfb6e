//! Scoped resource lock

use uuid::Uuid;

use crate::error::{GnossApiError, Result};

use super::resource::{ModifyResourceParams, Resource, ResourceApi};

/// A held lock on one resource.
///
/// Calls made through the lease carry the lock token. The lock is given
/// back by [`release`](Self::release), or on drop if that was never called;
/// a failed unlock on drop is only logged.
#[derive(Debug)]
pub struct ResourceLease {
    api: ResourceApi,
    community: String,
    resource_id: Uuid,
    token: String,
    released: bool,
}

impl ResourceLease {
    pub(crate) fn new(api: ResourceApi, community: &str, resource_id: Uuid, token: String) -> Self {
        Self {
            api,
            community: community.to_string(),
            resource_id,
            token,
            released: false,
        }
    }

    pub fn resource_id(&self) -> Uuid {
        self.resource_id
    }

    pub fn community(&self) -> &str {
        &self.community
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn get(&self) -> Result<Option<Resource>> {
        self.api.get_resource(&self.community, self.resource_id)
    }

    /// Modify the leased resource. `params` must target it.
    pub fn modify(&self, params: &ModifyResourceParams) -> Result<()> {
        if params.resource_id != self.resource_id || params.community_short_name != self.community {
            return Err(GnossApiError::InvalidResource {
                reason: format!(
                    "lease holds {}/{}, not {}/{}",
                    self.community, self.resource_id, params.community_short_name, params.resource_id
                ),
            });
        }
        self.api.modify_resource(params)
    }

    /// Unlock now and report the outcome
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.unlock()
    }

    fn unlock(&self) -> Result<()> {
        self.api
            .unlock_resource(&self.community, self.resource_id, &self.token)?;
        tracing::debug!(community = %self.community, resource_id = %self.resource_id, "resource unlocked");
        Ok(())
    }
}

impl Drop for ResourceLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.unlock() {
            tracing::warn!(
                community = %self.community,
                resource_id = %self.resource_id,
                error = %e,
                "failed to release resource lock"
            );
        }
    }
}
