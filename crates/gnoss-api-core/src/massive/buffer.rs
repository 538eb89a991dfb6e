//! On-disk package buffer for massive loads

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{GnossApiError, Result};

use super::triple::Triple;

/// A closed package file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub path: PathBuf,
    pub triple_count: usize,
    pub resource_count: usize,
    /// SHA-256 of the file, lowercase hex
    pub checksum: String,
}

impl PackageFile {
    /// File name, used as package name on upload
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Package content, checked against the recorded checksum
    pub fn read_verified(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path)?;
        let actual = compute_checksum(content.as_bytes());
        if actual != self.checksum {
            return Err(GnossApiError::MassiveLoad {
                message: format!(
                    "checksum mismatch for {}: expected {}, found {}",
                    self.path.display(),
                    self.checksum,
                    actual
                ),
            });
        }
        Ok(content)
    }
}

pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

struct OpenPackage {
    path: PathBuf,
    writer: BufWriter<File>,
    hasher: Sha256,
    triple_count: usize,
    resource_count: usize,
}

impl OpenPackage {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            hasher: Sha256::new(),
            triple_count: 0,
            resource_count: 0,
        })
    }

    fn write(&mut self, lines: &str, triples: usize) -> Result<()> {
        self.writer.write_all(lines.as_bytes())?;
        self.hasher.update(lines.as_bytes());
        self.triple_count += triples;
        self.resource_count += 1;
        Ok(())
    }

    fn close(mut self) -> Result<PackageFile> {
        self.writer.flush()?;
        Ok(PackageFile {
            path: self.path,
            triple_count: self.triple_count,
            resource_count: self.resource_count,
            checksum: hex::encode(self.hasher.finalize()),
        })
    }
}

/// Writes resources as N-Triples into `<work_dir>/<load_name>/package_<n>.nt`.
///
/// A package is closed before it would exceed `package_size` triples. The
/// triples of one resource always land in the same package, so a resource
/// bigger than `package_size` gets a package of its own.
pub struct MassiveLoadBuffer {
    dir: PathBuf,
    package_size: usize,
    current: Option<OpenPackage>,
    closed: Vec<PackageFile>,
}

impl MassiveLoadBuffer {
    pub fn create(work_dir: &Path, load_name: &str, package_size: usize) -> Result<Self> {
        if package_size == 0 {
            return Err(GnossApiError::MassiveLoad {
                message: "package size must be at least 1".to_string(),
            });
        }
        if load_name.is_empty() || load_name.contains(['/', '\\']) || load_name == ".." {
            return Err(GnossApiError::MassiveLoad {
                message: format!("invalid load name: '{}'", load_name),
            });
        }

        let dir = work_dir.join(load_name);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            package_size,
            current: None,
            closed: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Packages closed so far
    pub fn packages(&self) -> &[PackageFile] {
        &self.closed
    }

    pub fn add_resource(&mut self, resource_id: Uuid, triples: &[Triple]) -> Result<()> {
        if triples.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for triple in triples {
            lines.push_str(&triple.to_ntriples());
            lines.push('\n');
        }

        let full = self
            .current
            .as_ref()
            .is_some_and(|p| p.triple_count > 0 && p.triple_count + triples.len() > self.package_size);
        if full {
            self.rotate()?;
        }

        let package = match self.current.take() {
            Some(package) => package,
            None => OpenPackage::create(self.next_path())?,
        };
        let package = self.current.insert(package);
        package.write(&lines, triples.len())?;

        tracing::trace!(%resource_id, triples = triples.len(), package = %package.path.display(), "buffered resource");
        Ok(())
    }

    /// Close the open package and return every package in order
    pub fn finish(mut self) -> Result<Vec<PackageFile>> {
        self.rotate()?;
        tracing::debug!(dir = %self.dir.display(), packages = self.closed.len(), "massive load buffer finished");
        Ok(self.closed)
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(package) = self.current.take() {
            self.closed.push(package.close()?);
        }
        Ok(())
    }

    fn next_path(&self) -> PathBuf {
        self.dir.join(format!("package_{}.nt", self.closed.len() + 1))
    }
}
