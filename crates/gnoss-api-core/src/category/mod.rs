//! # Category Module
//!
//! Resolves human-authored category text to the category ids of a
//! community thesaurus.
//!
//! ## Design
//!
//! The platform only reports a flat list of categories with parent
//! pointers. Resources, on the other hand, are authored with readable
//! category text, either as hierarchical paths (`Region|Country|City`) or as
//! plain names that may match a localized variant (`Región` in
//! `Region@en|||Región@es`).
//!
//! Resolution is all-or-nothing: one unknown name fails the whole request
//! with [`GnossApiError::CategoryResolution`](crate::GnossApiError::CategoryResolution).
//!
//! ## Modules
//!
//! - `model`: wire model and the flat directory
//! - `name`: path and multi-language name encoding
//! - `tree`: O(n) tree builder and path walking
//! - `resolver`: hierarchical and flat resolution
//! - `source`: directory sources and the snapshot cache
//!
//! ## Example
//!
//! ```rust
//! use gnoss_api_core::category::{Category, CategoryDirectory, CategoryTree};
//! use uuid::Uuid;
//!
//! let tech = Uuid::new_v4();
//! let ai = Uuid::new_v4();
//! let directory = CategoryDirectory::new(
//!     "my-community",
//!     vec![
//!         Category::new(tech, "Tech"),
//!         Category::new(ai, "AI").with_parent(tech),
//!     ],
//! );
//!
//! let tree = CategoryTree::build(directory);
//! assert_eq!(tree.resolve_hierarchical(&["Tech|AI"]).unwrap(), vec![ai]);
//! assert_eq!(tree.resolve_flat(&["AI"]).unwrap(), vec![ai]);
//! assert!(tree.resolve_hierarchical(&["Tech|Nope"]).is_err());
//! ```
//!
//! Against the live platform (network access required):
//!
//! ```rust,ignore
//! use gnoss_api_core::{Config, GnossClient};
//!
//! let client = GnossClient::from_config(&config)?;
//! let ids = client.thesaurus().resolve_hierarchical("my-community", &["Tech|AI"])?;
//! ```

mod model;
pub mod name;
mod resolver;
mod source;
mod tree;

// Re-exports
pub use model::{Category, CategoryDirectory};
pub use resolver::{CategoryResolver, ResolutionMode, ResolutionReport, ResolutionRequest};
pub use source::{CategoryCache, CategorySource};
pub use tree::{CategoryNode, CategoryTree};
