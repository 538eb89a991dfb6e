pub mod api;
pub mod category;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod massive;

pub use api::{
    BulkFailure, BulkOptions, BulkReport, CommunityApi, NotificationApi, ResourceApi,
    ResourceDraft, ResourceLease, RolApi, ThesaurusApi, UserApi,
};
pub use client::GnossClient;
pub use config::{Config, LogFormat};
pub use error::{GnossApiError, Result, TransportError};
pub use http::{OAuthCredentials, RequestContext};

// Category resolution
pub use category::{
    Category, CategoryCache, CategoryDirectory, CategoryResolver, CategorySource, CategoryTree,
    ResolutionMode, ResolutionReport, ResolutionRequest,
};

// Massive load
pub use massive::{MassiveLoadBuffer, MassiveLoader, PackageFile, Triple, TripleObject};
