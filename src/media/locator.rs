use std::path::{Path, PathBuf};

use url::Url;

use crate::errors::MediaError;

/// Clip container extensions accepted for local files
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "mkv", "ogv"];

/// Where relative media locators are resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBase {
    /// The service that sent the sequence, e.g. `http://127.0.0.1:5000`
    Remote(Url),
    /// A local directory mirroring the service's static files
    Directory(PathBuf),
}

impl MediaBase {
    /// Interpret a configured base as a URL when it has an http(s) scheme,
    /// otherwise as a directory
    pub fn parse(base: &str) -> Self {
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::Directory(PathBuf::from(base)),
        }
    }
}

/// A locator after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocator {
    File(PathBuf),
    Remote(Url),
}

impl std::fmt::Display for ResolvedLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Resolve `locator` against `base`
///
/// Absolute http(s) and file URLs are used as they are. Anything else is
/// joined onto the base; for a directory base a leading `/` is stripped so
/// `/static/videos/hello.mp4` lands inside the directory.
pub fn resolve(locator: &str, base: &MediaBase) -> Result<ResolvedLocator, MediaError> {
    let locator = locator.trim();
    if locator.is_empty() {
        return Err(load_failed(locator, "empty locator"));
    }

    if let Ok(url) = Url::parse(locator) {
        return match url.scheme() {
            "http" | "https" => Ok(ResolvedLocator::Remote(url)),
            "file" => url
                .to_file_path()
                .map(ResolvedLocator::File)
                .map_err(|_| load_failed(locator, "invalid file URL")),
            other => Err(load_failed(locator, &format!("unsupported scheme '{}'", other))),
        };
    }

    match base {
        MediaBase::Remote(url) => url
            .join(locator)
            .map(ResolvedLocator::Remote)
            .map_err(|e| load_failed(locator, &e.to_string())),
        MediaBase::Directory(dir) => Ok(ResolvedLocator::File(dir.join(locator.trim_start_matches('/')))),
    }
}

/// Whether the path carries a known video container extension
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_failed(locator: &str, reason: &str) -> MediaError {
    MediaError::LoadFailed {
        locator: locator.to_string(),
        reason: reason.to_string(),
    }
}
