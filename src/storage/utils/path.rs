// Path helper utilities shared across storage operations
use crate::error::{InvalidPathSnafu, Result};
use snafu::ensure;

pub const ROOT: &str = "/";

/// Normalize a caller supplied remote path into `/a/b/c` form.
///
/// Repeated and trailing slashes are dropped and a leading slash is added.
/// Empty paths and `.`/`..` segments are rejected.
pub fn normalize_remote_path(path: &str) -> Result<String> {
    ensure!(
        !path.trim().is_empty(),
        InvalidPathSnafu {
            path: path.to_string()
        }
    );

    let mut segments = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        ensure!(
            segment != "." && segment != "..",
            InvalidPathSnafu {
                path: path.to_string()
            }
        );
        segments.push(segment);
    }

    Ok(format!("/{}", segments.join("/")))
}

pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Every proper ancestor of a normalized path, top-down, excluding the root.
///
/// `/a/b/c` yields `["/a", "/a/b"]`.
pub fn ancestors(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    (1..segments.len())
        .map(|i| format!("/{}", segments[..i].join("/")))
        .collect()
}

/// Return a new String that guarantees a trailing '/'.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
