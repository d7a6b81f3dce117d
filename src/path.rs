// SPDX-License-Identifier: MIT
//! Resource path helpers
//!
//! Files are addressed by absolute slash-separated paths (`/assets/a.txt`).
//! Directories are keyed with a trailing slash (`/assets/`).

/// Reason a path cannot name a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathProblem {
    Empty,
    NotAbsolute,
    TrailingSlash,
    EmptySegment,
    DotSegment,
    ContainsNul,
    SegmentTooLong(usize),
}

impl std::fmt::Display for PathProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathProblem::Empty => write!(f, "path is empty"),
            PathProblem::NotAbsolute => write!(f, "path must start with '/'"),
            PathProblem::TrailingSlash => write!(f, "path must not end with '/'"),
            PathProblem::EmptySegment => write!(f, "path contains an empty segment"),
            PathProblem::DotSegment => write!(f, "path contains '.' or '..'"),
            PathProblem::ContainsNul => write!(f, "path contains a nul byte"),
            PathProblem::SegmentTooLong(len) => {
                write!(f, "path segment is {} bytes, maximum is {}", len, u16::MAX)
            }
        }
    }
}

/// Check that `path` names a file that can be stored in a bundle
pub fn validate_resource_path(path: &str) -> Result<(), PathProblem> {
    if path.is_empty() {
        return Err(PathProblem::Empty);
    }
    if !path.starts_with('/') {
        return Err(PathProblem::NotAbsolute);
    }
    if path.ends_with('/') {
        return Err(PathProblem::TrailingSlash);
    }
    if path.contains('\0') {
        return Err(PathProblem::ContainsNul);
    }

    for segment in path[1..].split('/') {
        match segment {
            "" => return Err(PathProblem::EmptySegment),
            "." | ".." => return Err(PathProblem::DotSegment),
            // +1 for the trailing slash of directory keys
            s if s.len() + 1 > u16::MAX as usize => {
                return Err(PathProblem::SegmentTooLong(s.len()))
            }
            _ => {}
        }
    }

    Ok(())
}

/// Key of the directory containing `key`, `None` for the root
pub fn parent_key(key: &str) -> Option<&str> {
    if key == "/" || key.is_empty() {
        return None;
    }
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    trimmed.rfind('/').map(|idx| &key[..=idx])
}

/// Keys of every directory above `path`, outermost first
///
/// `/a/b/c.txt` yields `/`, `/a/`, `/a/b/`.
pub fn ancestor_keys(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(idx, _)| &path[..=idx])
        .filter(move |dir| dir.len() < path.len())
}

/// Normalize a lookup path
///
/// Repeated slashes collapse, `.` segments disappear and `..` removes the
/// previous segment (never climbing above the root). A trailing slash is
/// kept so directory lookups stay distinguishable from file lookups.
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut canonical = String::with_capacity(path.len() + 1);
    canonical.push('/');
    canonical.push_str(&segments.join("/"));
    if path.ends_with('/') && !segments.is_empty() {
        canonical.push('/');
    }
    canonical
}

/// Key used to look `path` up as a directory (always ends in `/`)
pub fn directory_key(path: &str) -> String {
    let mut key = canonicalize(path);
    if !key.ends_with('/') {
        key.push('/');
    }
    key
}

/// Join a manifest prefix with a file name or alias
pub fn join_prefix(prefix: &str, name: &str) -> String {
    canonicalize(&format!("/{}/{}", prefix, name))
}
