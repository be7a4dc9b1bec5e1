use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    foundation::error::{PressError, PressResult},
    scene::model::ImageKind,
};

/// Reference value that disables every layer drawing that asset.
pub const SKIP_SENTINEL: &str = "-";

/// A job-level asset reference: a local path, a URL, or the skip sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetRef {
    /// Layers of this kind are not drawn and the asset is never fetched.
    Skip,
    /// Path (relative to the resolver root) or `http(s)` URL.
    Reference(String),
}

impl AssetRef {
    /// Interpret a raw reference; `"-"` means skip.
    pub fn parse(raw: &str) -> Self {
        if raw == SKIP_SENTINEL {
            Self::Skip
        } else {
            Self::Reference(raw.to_owned())
        }
    }

    /// Whether this reference disables its layers.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// The reference string, unless skipped.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Skip => None,
            Self::Reference(s) => Some(s),
        }
    }
}

impl FromStr for AssetRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// The three asset slots image layers draw from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetSet {
    /// Logo asset.
    pub logo: AssetRef,
    /// Name asset.
    pub name: AssetRef,
    /// Background asset.
    pub background: AssetRef,
}

impl AssetSet {
    /// Every slot skipped.
    pub fn skip_all() -> Self {
        Self {
            logo: AssetRef::Skip,
            name: AssetRef::Skip,
            background: AssetRef::Skip,
        }
    }

    /// Reference for `kind`.
    pub fn get(&self, kind: ImageKind) -> &AssetRef {
        match kind {
            ImageKind::Logo => &self.logo,
            ImageKind::Name => &self.name,
            ImageKind::Background => &self.background,
        }
    }
}

/// Fetches raw asset bytes by reference.
pub trait AssetResolver: Send + Sync {
    /// Return the encoded bytes behind `reference`.
    fn fetch(&self, reference: &str) -> PressResult<Vec<u8>>;
}

/// Whether `reference` names a remote asset.
pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http")
}

/// Reads local paths under a root directory and, with the `remote-assets` feature,
/// downloads `http(s)` references.
#[derive(Debug)]
pub struct DefaultAssetResolver {
    root: PathBuf,
    #[cfg(feature = "remote-assets")]
    http: reqwest::blocking::Client,
}

impl DefaultAssetResolver {
    /// Resolve relative paths against `root`. Absolute paths are used as-is.
    pub fn new(root: impl Into<PathBuf>) -> PressResult<Self> {
        Ok(Self {
            root: root.into(),
            #[cfg(feature = "remote-assets")]
            http: reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .map_err(|e| PressError::config(format!("build http client: {e}")))?,
        })
    }

    /// Root directory for relative references.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fetch_local(&self, reference: &str) -> PressResult<Vec<u8>> {
        let path = self.root.join(reference);
        std::fs::read(&path)
            .map_err(|e| PressError::asset(format!("read asset '{}': {e}", path.display())))
    }

    #[cfg(feature = "remote-assets")]
    fn fetch_remote(&self, url: &str) -> PressResult<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| PressError::asset(format!("download '{url}': {e}")))?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "remote-assets"))]
    fn fetch_remote(&self, url: &str) -> PressResult<Vec<u8>> {
        Err(PressError::asset(format!(
            "cannot fetch '{url}': built without the `remote-assets` feature"
        )))
    }
}

impl AssetResolver for DefaultAssetResolver {
    fn fetch(&self, reference: &str) -> PressResult<Vec<u8>> {
        if is_remote(reference) {
            tracing::debug!(url = reference, "fetching remote asset");
            self.fetch_remote(reference)
        } else {
            self.fetch_local(reference)
        }
    }
}

/// Serves assets from memory. Useful for tests and for callers that already hold the bytes.
#[derive(Debug, Default)]
pub struct InMemoryAssetResolver {
    assets: HashMap<String, Vec<u8>>,
}

impl InMemoryAssetResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `reference`, replacing any previous entry.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(reference.into(), bytes);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }
}

impl AssetResolver for InMemoryAssetResolver {
    fn fetch(&self, reference: &str) -> PressResult<Vec<u8>> {
        self.assets
            .get(reference)
            .cloned()
            .ok_or_else(|| PressError::asset(format!("unknown asset '{reference}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
