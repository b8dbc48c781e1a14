//! Asset location module.
//!
//! Maps the safe relative path produced by the resolver onto a concrete
//! file, hiding whether assets live in a plain directory or in an
//! installed bundle.

pub mod path;

use std::io;
use std::path::{Path, PathBuf};

/// Narrow seam between the serving logic and asset storage.
///
/// `rel` is always a resolver-produced relative path: no leading slash, no
/// dot segments. The empty string names the root itself.
pub trait AssetLocator: Send + Sync {
    fn exists(&self, rel: &str) -> bool;
    fn is_dir(&self, rel: &str) -> bool;
    fn real_path(&self, rel: &str) -> PathBuf;
    /// Human-readable description for the startup banner.
    fn describe(&self) -> String;
}

/// Assets served straight from a directory on disk.
pub struct DiskLocator {
    root: PathBuf,
}

impl DiskLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLocator for DiskLocator {
    fn exists(&self, rel: &str) -> bool {
        self.real_path(rel).exists()
    }

    fn is_dir(&self, rel: &str) -> bool {
        self.real_path(rel).is_dir()
    }

    fn real_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Assets installed as a named bundle under a common base directory.
///
/// A spec such as `site:static/img` resolves to
/// `{bundle_dir}/site/static/img`. The bundle directory is validated once
/// at construction so a typo fails at startup, not per request.
pub struct BundleLocator {
    bundle: String,
    root: PathBuf,
}

impl AssetLocator for BundleLocator {
    fn exists(&self, rel: &str) -> bool {
        self.real_path(rel).exists()
    }

    fn is_dir(&self, rel: &str) -> bool {
        self.real_path(rel).is_dir()
    }

    fn real_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn describe(&self) -> String {
        format!("bundle {} ({})", self.bundle, self.root.display())
    }
}

/// Build a locator from an asset spec.
///
/// `"bundle:sub/dir"` selects a bundle installed under `bundle_dir`;
/// anything else is treated as a plain filesystem root.
pub fn from_spec(spec: &str, bundle_dir: Option<&Path>) -> io::Result<Box<dyn AssetLocator>> {
    match spec.split_once(':') {
        Some((bundle, sub)) => {
            let base = bundle_dir.ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("asset spec '{spec}' requires assets.bundle_dir to be set"),
                )
            })?;
            let root = base.join(bundle).join(sub);
            if !root.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("bundle root '{}' does not exist", root.display()),
                ));
            }
            Ok(Box::new(BundleLocator {
                bundle: bundle.to_string(),
                root,
            }))
        }
        None => Ok(Box::new(DiskLocator::new(spec))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_disk_locator_resolution() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/site.css"), "body {}").unwrap();

        let locator = DiskLocator::new(dir.path());
        assert!(locator.exists("css/site.css"));
        assert!(locator.exists("css"));
        assert!(locator.is_dir("css"));
        assert!(!locator.is_dir("css/site.css"));
        assert!(!locator.exists("css/other.css"));
        assert_eq!(locator.real_path("css/site.css"), dir.path().join("css/site.css"));
    }

    #[test]
    fn test_empty_rel_names_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let locator = DiskLocator::new(dir.path());
        assert!(locator.is_dir(""));
    }

    #[test]
    fn test_bundle_spec_resolution() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("site/static")).unwrap();
        fs::write(dir.path().join("site/static/a.txt"), "a").unwrap();

        let locator = from_spec("site:static", Some(dir.path())).unwrap();
        assert!(locator.exists("a.txt"));
        assert!(locator.describe().contains("site"));
    }

    #[test]
    fn test_bundle_spec_without_base_dir_fails() {
        assert!(from_spec("site:static", None).is_err());
    }

    #[test]
    fn test_missing_bundle_fails_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        assert!(from_spec("nope:static", Some(dir.path())).is_err());
    }

    #[test]
    fn test_plain_path_spec_is_disk() {
        let locator = from_spec("static", None).unwrap();
        assert!(locator.describe().starts_with("directory"));
    }
}
