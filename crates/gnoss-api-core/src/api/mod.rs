//! Typed façades over the platform endpoints
//!
//! Each façade wraps a [`GnossClient`](crate::GnossClient) clone and maps one
//! area of the API:
//!
//! - [`CommunityApi`]: community info, members and the category directory
//! - [`ThesaurusApi`]: thesaurus concepts and category name resolution
//! - [`ResourceApi`]: single, locked, bulk and massive-load resource calls
//! - [`UserApi`], [`NotificationApi`], [`RolApi`]

mod bulk;
mod community;
mod lease;
mod notification;
mod resource;
mod rol;
mod thesaurus;
mod user;

pub use bulk::{BulkFailure, BulkOptions, BulkReport, ResourceDraft};
pub use community::{CommunityApi, CommunityInfo, Member};
pub use lease::ResourceLease;
pub use notification::{Mail, NotificationApi};
pub use resource::{
    LoadResourceParams, ModifyResourceParams, PackageUpload, Resource, ResourceApi,
    DEFAULT_LOCK_SECONDS,
};
pub use rol::{NewRol, Rol, RolApi};
pub use thesaurus::{Concept, Thesaurus, ThesaurusApi};
pub use user::{NewUser, User, UserApi};

use crate::error::{GnossApiError, Result, TransportError};

/// `404`, `null` and empty answers all mean the scope does not exist
pub(crate) fn require_scope<T>(result: Result<Option<T>>, scope: &str) -> Result<T> {
    match not_found_as_none(result)? {
        Some(value) => Ok(value),
        None => Err(GnossApiError::ScopeNotFound {
            scope: scope.to_string(),
        }),
    }
}

/// Lookups answer `404` or an empty body for unknown entities
pub(crate) fn not_found_as_none<T>(result: Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Err(GnossApiError::Transport(TransportError::Status { status: 404, .. })) => Ok(None),
        other => other,
    }
}
