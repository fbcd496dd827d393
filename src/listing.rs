//! Directory listers: where a category's filenames come from.
//!
//! A [`DirectoryLister`] answers one question, "which files are in this
//! category?", and either returns the names or a [`ListingError`]. Two
//! implementations ship:
//!
//! - [`GitHubLister`]: `GET` against the GitHub contents API. The payload is
//!   a JSON array of entries; only each entry's `name` is used.
//! - [`LocalLister`]: reads `<root>/<category>/` from disk, non-recursively.
//!
//! Errors follow a three-way taxonomy (transport, API status, malformed
//! payload). The resolver treats all three the same way; the distinction
//! exists for logs.

use crate::config::{GalleryConfig, ListerConfig};
use crate::types::{CategoryKey, RawListing};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API returned status {status}")]
    Api { status: u16 },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Lists the filenames of one category.
pub trait DirectoryLister {
    fn list(&self, category: &CategoryKey) -> Result<RawListing, ListingError>;
}

impl<T: DirectoryLister + ?Sized> DirectoryLister for &T {
    fn list(&self, category: &CategoryKey) -> Result<RawListing, ListingError> {
        (**self).list(category)
    }
}

impl<T: DirectoryLister + ?Sized> DirectoryLister for Box<T> {
    fn list(&self, category: &CategoryKey) -> Result<RawListing, ListingError> {
        (**self).list(category)
    }
}

/// Reject category names that would leave their own directory or URL
/// segment (`..`, separators, empty).
pub fn check_category(category: &CategoryKey) -> Result<(), ListingError> {
    let key = category.as_str();
    if key.trim().is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
        return Err(ListingError::Transport(format!(
            "invalid category name '{key}'"
        )));
    }
    Ok(())
}

/// Percent-encode one URL path segment; RFC 3986 unreserved bytes pass through.
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Which lister a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListerSource {
    Github,
    Local,
}

/// Build the configured lister. `root` anchors relative local paths.
pub fn build_lister(config: &GalleryConfig, root: &Path) -> Box<dyn DirectoryLister> {
    match config.lister.source {
        ListerSource::Github => Box::new(GitHubLister::new(&config.lister)),
        ListerSource::Local => Box::new(LocalLister::new(root.join(&config.gallery.image_root))),
    }
}

// ============================================================================
// GitHub contents API
// ============================================================================

#[derive(Deserialize)]
struct ContentEntry {
    name: String,
}

/// Parse a contents API response body into filenames, in payload order.
///
/// The body must be a JSON array of objects with a string `name`; other
/// fields (`type`, `sha`, `download_url`, ...) are ignored.
pub fn parse_contents_payload(body: &str) -> Result<RawListing, ListingError> {
    let entries: Vec<ContentEntry> =
        serde_json::from_str(body).map_err(|e| ListingError::MalformedPayload(e.to_string()))?;
    Ok(entries.into_iter().map(|e| e.name).collect())
}

/// Lists a category through the GitHub contents API.
pub struct GitHubLister {
    agent: ureq::Agent,
    api_url: String,
    user_agent: String,
}

impl GitHubLister {
    pub fn new(config: &ListerConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            api_url: config.api_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// The request URL for a category; the name is encoded as one path segment.
    pub fn url_for(&self, category: &CategoryKey) -> String {
        self.api_url
            .replace("{category}", &encode_path_segment(category.as_str()))
    }
}

impl DirectoryLister for GitHubLister {
    fn list(&self, category: &CategoryKey) -> Result<RawListing, ListingError> {
        check_category(category)?;
        let url = self.url_for(category);
        log::debug!("GET {url}");
        let mut response = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| ListingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::Api {
                status: status.as_u16(),
            });
        }
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ListingError::Transport(e.to_string()))?;
        parse_contents_payload(&body)
    }
}

// ============================================================================
// Local directory
// ============================================================================

/// Lists `<root>/<category>/` on disk. Subdirectories are not entered.
pub struct LocalLister {
    root: PathBuf,
}

impl LocalLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn category_dir(&self, category: &CategoryKey) -> Result<PathBuf, ListingError> {
        check_category(category)?;
        let dir = self.root.join(category.as_str());
        if !dir.is_dir() {
            return Err(ListingError::Transport(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(dir)
    }
}

impl DirectoryLister for LocalLister {
    fn list(&self, category: &CategoryKey) -> Result<RawListing, ListingError> {
        let dir = self.category_dir(category)?;
        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ListingError::Transport(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => log::debug!("skipping non-UTF-8 filename {}", entry.path().display()),
            }
        }
        Ok(names)
    }
}
