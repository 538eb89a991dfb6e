//! Massive load upload

use uuid::Uuid;

use crate::api::{PackageUpload, ResourceApi};
use crate::error::{GnossApiError, Result};

use super::buffer::PackageFile;

/// Sends finished packages as one massive load: create, upload each
/// package in order, close.
///
/// A failed package stops the upload and leaves the load open, so the
/// platform never processes a partial load.
pub struct MassiveLoader {
    api: ResourceApi,
    community: String,
    load_name: String,
}

impl MassiveLoader {
    pub fn new(api: ResourceApi, community: impl Into<String>, load_name: impl Into<String>) -> Self {
        Self {
            api,
            community: community.into(),
            load_name: load_name.into(),
        }
    }

    /// Upload `packages` and return the load id
    pub fn upload(&self, packages: &[PackageFile]) -> Result<Uuid> {
        if packages.is_empty() {
            return Err(GnossApiError::MassiveLoad {
                message: format!("load '{}' has no packages", self.load_name),
            });
        }

        let load_id = self.api.create_massive_load(&self.community, &self.load_name)?;
        tracing::info!(
            community = %self.community,
            load = %self.load_name,
            %load_id,
            packages = packages.len(),
            "massive load created"
        );

        for package in packages {
            let upload = PackageUpload {
                load_id,
                package_name: package.name(),
                checksum: package.checksum.clone(),
                triple_count: package.triple_count,
                content: package.read_verified()?,
            };
            self.api.upload_package(&upload).map_err(|e| {
                tracing::warn!(%load_id, package = %upload.package_name, error = %e, "package upload failed");
                e
            })?;
            tracing::debug!(%load_id, package = %upload.package_name, triples = package.triple_count, "package uploaded");
        }

        self.api.close_massive_load(load_id)?;
        tracing::info!(%load_id, "massive load closed");
        Ok(load_id)
    }
}
