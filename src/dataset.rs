//! Image set discovery and pairing.
//!
//! An [`ImageSet`] is every JPEG under a directory tree, sorted by full path.
//! Ground truth and submission sets are paired by position after sorting,
//! and each pair must agree on its file name.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Accepted file name suffixes. Matching is case-sensitive.
pub const JPEG_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// Which side of the comparison an image tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSetKind {
    /// Reference images supplied by the challenge.
    GroundTruth,
    /// Images produced by a participant.
    Submission,
}

impl fmt::Display for ImageSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroundTruth => write!(f, "Ground truth"),
            Self::Submission => write!(f, "Submission"),
        }
    }
}

/// Returns true if `name` ends with one of [`JPEG_SUFFIXES`].
#[must_use]
pub fn has_jpeg_suffix(name: &str) -> bool {
    JPEG_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// File name component of `path`, or an empty string.
///
/// Comparisons between images use this raw form; see [`display_name`] for
/// the lossy string used in messages.
#[must_use]
pub fn basename(path: &Path) -> &OsStr {
    path.file_name().unwrap_or_default()
}

/// File name component of `path` as a (possibly lossy) string.
#[must_use]
pub fn display_name(path: &Path) -> String {
    basename(path).to_string_lossy().into_owned()
}

/// All JPEG images under one directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    /// Which side this set is.
    pub kind: ImageSetKind,

    /// Absolute root the tree was scanned from.
    pub root: PathBuf,

    /// Absolute image paths, sorted byte-wise by full path.
    pub paths: Vec<PathBuf>,
}

impl ImageSet {
    /// Recursively scan `root` for images.
    ///
    /// Every file in the tree must carry a `.jpg` or `.jpeg` suffix; the
    /// first one that does not aborts the scan with [`Error::InvalidFile`].
    pub fn scan(root: impl AsRef<Path>, kind: ImageSetKind) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|source| Error::Scan {
            path: root.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        scan_recursive(&root, kind, &mut paths)?;
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        debug!(set = %kind, root = %root.display(), images = paths.len(), "scanned image set");

        Ok(Self { kind, root, paths })
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if the tree held no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over image paths in sort order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Fail if two images in this set share a basename.
    ///
    /// Positional pairing is only sound when basenames are unique per tree.
    pub fn check_unique_names(&self) -> Result<()> {
        let mut seen: HashMap<&OsStr, &Path> = HashMap::with_capacity(self.paths.len());
        for path in &self.paths {
            if let Some(first) = seen.insert(basename(path), path) {
                return Err(Error::DuplicateFilename {
                    set: self.kind,
                    name: display_name(path),
                    first: first.to_path_buf(),
                    second: path.clone(),
                });
            }
        }
        Ok(())
    }
}

fn scan_recursive(current: &Path, kind: ImageSetKind, images: &mut Vec<PathBuf>) -> Result<()> {
    let scan_err = |source: std::io::Error| Error::Scan {
        path: current.to_path_buf(),
        source,
    };

    // file_type() does not follow symlinks.
    let mut entries = fs::read_dir(current)
        .map_err(scan_err)?
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(scan_err)?;

    // Listing order is platform dependent; sort so the first invalid file
    // reported is stable across runs.
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in entries {
        if file_type.is_dir() {
            scan_recursive(&path, kind, images)?;
        } else if file_type.is_symlink() && path.is_dir() {
            // Linked directories are listed but never descended.
            debug!(set = %kind, path = %path.display(), "skipping symlinked directory");
        } else if has_jpeg_suffix(&basename(&path).to_string_lossy()) {
            images.push(path);
        } else {
            return Err(Error::InvalidFile { set: kind, path });
        }
    }

    Ok(())
}

/// A ground truth image and the submitted image scored against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair<'a> {
    /// Basename shared by both files, lossily converted for display.
    pub name: String,
    /// Submitted image.
    pub submission: &'a Path,
    /// Ground truth image.
    pub ground_truth: &'a Path,
}

/// Pair two sets by position after sorting.
///
/// Checks, in order: equal counts, unique basenames within each set, and
/// matching basenames for each positional pair.
pub fn pair_sets<'a>(
    submission: &'a ImageSet,
    ground_truth: &'a ImageSet,
) -> Result<Vec<ImagePair<'a>>> {
    if submission.len() != ground_truth.len() {
        return Err(Error::CountMismatch {
            submitted: submission.len(),
            expected: ground_truth.len(),
        });
    }

    ground_truth.check_unique_names()?;
    submission.check_unique_names()?;

    ground_truth
        .iter()
        .zip(submission.iter())
        .map(|(gt, sub)| {
            if basename(gt) != basename(sub) {
                return Err(Error::UnexpectedFilename {
                    actual: display_name(sub),
                    expected: display_name(gt),
                });
            }
            Ok(ImagePair {
                name: display_name(gt),
                submission: sub,
                ground_truth: gt,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn names(set: &ImageSet) -> Vec<String> {
        set.iter()
            .map(|p| p.strip_prefix(&set.root).unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        assert!(has_jpeg_suffix("a.jpg"));
        assert!(has_jpeg_suffix("a.jpeg"));
        assert!(!has_jpeg_suffix("a.JPG"));
        assert!(!has_jpeg_suffix("a.png"));
        assert!(!has_jpeg_suffix("jpg"));
    }

    #[test]
    fn test_scan_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "a.jpeg");
        touch(dir.path(), "nested/c.jpg");

        let set = ImageSet::scan(dir.path(), ImageSetKind::GroundTruth).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(names(&set), vec!["a.jpeg", "b.jpg", "nested/c.jpg"]);
        assert!(set.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_scan_rejects_other_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "sub/readme.txt");

        let err = ImageSet::scan(dir.path(), ImageSetKind::Submission).unwrap_err();
        match err {
            Error::InvalidFile { set, path } => {
                assert_eq!(set, ImageSetKind::Submission);
                assert!(path.ends_with("sub/readme.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_rejects_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A.JPG");
        let err = ImageSet::scan(dir.path(), ImageSetKind::GroundTruth).unwrap_err();
        assert!(matches!(err, Error::InvalidFile { set: ImageSetKind::GroundTruth, .. }));
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = ImageSet::scan(dir.path().join("nope"), ImageSetKind::GroundTruth).unwrap_err();
        assert!(matches!(err, Error::Scan { .. }));
    }

    #[test]
    fn test_pair_count_mismatch() {
        let gt = TempDir::new().unwrap();
        let sub = TempDir::new().unwrap();
        touch(gt.path(), "a.jpg");
        touch(gt.path(), "b.jpg");
        touch(sub.path(), "a.jpg");

        let gt = ImageSet::scan(gt.path(), ImageSetKind::GroundTruth).unwrap();
        let sub = ImageSet::scan(sub.path(), ImageSetKind::Submission).unwrap();
        let err = pair_sets(&sub, &gt).unwrap_err();
        assert!(matches!(err, Error::CountMismatch { submitted: 1, expected: 2 }));
    }

    #[test]
    fn test_pair_unexpected_filename() {
        let gt = TempDir::new().unwrap();
        let sub = TempDir::new().unwrap();
        touch(gt.path(), "a.jpg");
        touch(sub.path(), "z.jpg");

        let gt = ImageSet::scan(gt.path(), ImageSetKind::GroundTruth).unwrap();
        let sub = ImageSet::scan(sub.path(), ImageSetKind::Submission).unwrap();
        match pair_sets(&sub, &gt).unwrap_err() {
            Error::UnexpectedFilename { actual, expected } => {
                assert_eq!(actual, "z.jpg");
                assert_eq!(expected, "a.jpg");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pair_duplicate_basenames() {
        let gt = TempDir::new().unwrap();
        let sub = TempDir::new().unwrap();
        touch(gt.path(), "x/a.jpg");
        touch(gt.path(), "y/a.jpg");
        touch(sub.path(), "x/a.jpg");
        touch(sub.path(), "y/a.jpg");

        let gt = ImageSet::scan(gt.path(), ImageSetKind::GroundTruth).unwrap();
        let sub = ImageSet::scan(sub.path(), ImageSetKind::Submission).unwrap();
        let err = pair_sets(&sub, &gt).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateFilename { set: ImageSetKind::GroundTruth, ref name, .. } if name == "a.jpg"
        ));
    }

    #[test]
    fn test_pair_parallel_trees() {
        let gt = TempDir::new().unwrap();
        let sub = TempDir::new().unwrap();
        for rel in ["a.jpg", "set1/b.jpg", "set2/c.jpeg"] {
            touch(gt.path(), rel);
            touch(sub.path(), rel);
        }

        let gt = ImageSet::scan(gt.path(), ImageSetKind::GroundTruth).unwrap();
        let sub = ImageSet::scan(sub.path(), ImageSetKind::Submission).unwrap();
        let pairs = pair_sets(&sub, &gt).unwrap();
        let names: Vec<_> = pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpeg"]);
        assert!(pairs[1].submission.starts_with(&sub.root));
        assert!(pairs[1].ground_truth.starts_with(&gt.root));
    }

    #[test]
    #[cfg(unix)]
    fn test_scan_skips_symlinked_dirs() {
        use std::os::unix::fs::symlink;

        let elsewhere = TempDir::new().unwrap();
        touch(elsewhere.path(), "z.jpg");

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg");
        symlink(elsewhere.path(), dir.path().join("linked")).unwrap();
        symlink(dir.path(), dir.path().join("loop")).unwrap();

        let set = ImageSet::scan(dir.path(), ImageSetKind::Submission).unwrap();
        assert_eq!(names(&set), vec!["a.jpg"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_scan_keeps_symlinked_files() {
        use std::os::unix::fs::symlink;

        let elsewhere = TempDir::new().unwrap();
        touch(elsewhere.path(), "real.jpg");
        touch(elsewhere.path(), "notes.txt");

        let dir = TempDir::new().unwrap();
        symlink(elsewhere.path().join("real.jpg"), dir.path().join("a.jpg")).unwrap();
        let set = ImageSet::scan(dir.path(), ImageSetKind::Submission).unwrap();
        assert_eq!(names(&set), vec!["a.jpg"]);

        symlink(elsewhere.path().join("notes.txt"), dir.path().join("b.txt")).unwrap();
        let err = ImageSet::scan(dir.path(), ImageSetKind::Submission).unwrap_err();
        assert!(matches!(err, Error::InvalidFile { .. }));
    }

    // Linux filesystems accept arbitrary bytes in names; macOS does not.
    #[test]
    #[cfg(target_os = "linux")]
    fn test_non_utf8_names_compare_raw() {
        use std::os::unix::ffi::OsStrExt;

        let first = OsStr::from_bytes(b"\xffa.jpg");
        let second = OsStr::from_bytes(b"\xfea.jpg");
        assert_eq!(first.to_string_lossy(), second.to_string_lossy());

        let gt = TempDir::new().unwrap();
        let sub = TempDir::new().unwrap();
        fs::write(gt.path().join(first), b"").unwrap();
        fs::write(sub.path().join(second), b"").unwrap();

        let gt_set = ImageSet::scan(gt.path(), ImageSetKind::GroundTruth).unwrap();
        let sub_set = ImageSet::scan(sub.path(), ImageSetKind::Submission).unwrap();
        let err = pair_sets(&sub_set, &gt_set).unwrap_err();
        assert!(matches!(err, Error::UnexpectedFilename { .. }));

        // Distinct raw names in one tree are not duplicates.
        fs::create_dir(gt.path().join("x")).unwrap();
        fs::write(gt.path().join("x").join(second), b"").unwrap();
        let gt_set = ImageSet::scan(gt.path(), ImageSetKind::GroundTruth).unwrap();
        gt_set.check_unique_names().unwrap();
    }
}
