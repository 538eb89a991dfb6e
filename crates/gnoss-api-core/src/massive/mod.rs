//! Massive load
//!
//! Large imports bypass the per-resource endpoints: resources are written
//! as N-Triples into package files on disk, then uploaded as one load.
//!
//! ## Usage
//!
//! ```ignore
//! let mut buffer = MassiveLoadBuffer::create(&work_dir, "nightly", 1000)?;
//! buffer.add_resource(id, &triples)?;
//! let packages = buffer.finish()?;
//! MassiveLoader::new(client.resources(), "my-community", "nightly").upload(&packages)?;
//! ```

mod buffer;
mod loader;
mod triple;

pub use buffer::{compute_checksum, MassiveLoadBuffer, PackageFile};
pub use loader::MassiveLoader;
pub use triple::{Triple, TripleObject};
