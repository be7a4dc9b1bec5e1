//! Font selection for text layers.
//!
//! A run needs at most one font. It comes from, in order: the font config JSON (the last
//! entry flagged `web_font`), an explicitly configured font file, then the system's
//! monospace or sans-serif face.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use sha2::{Digest, Sha256};

use crate::foundation::{
    error::{PressError, PressResult},
    math::Fnv1a64,
};

/// Pixel size used when nothing else is configured.
pub const DEFAULT_FONT_SIZE_PX: f32 = 24.0;

/// Loaded font bytes plus the size text is shaped at.
#[derive(Clone)]
pub struct FontHandle {
    bytes: Arc<Vec<u8>>,
    index: u32,
    size_px: f32,
    source: String,
    fingerprint: u64,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("source", &self.source)
            .field("index", &self.index)
            .field("size_px", &self.size_px)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontHandle {
    /// Wrap raw font bytes. `index` selects the face inside a collection file.
    pub fn from_bytes(
        bytes: Vec<u8>,
        index: u32,
        size_px: f32,
        source: impl Into<String>,
    ) -> PressResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PressError::config(format!(
                "font size must be finite and > 0, got {size_px}"
            )));
        }
        if bytes.is_empty() {
            return Err(PressError::asset("font data is empty"));
        }
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&bytes);
        h.write_u8(0);
        h.write_bytes(&index.to_le_bytes());
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            size_px,
            source: source.into(),
            fingerprint: h.finish(),
        })
    }

    /// Read a font file from disk.
    pub fn load(path: &Path, size_px: f32) -> PressResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| PressError::asset(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(bytes, 0, size_px, path.display().to_string())
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the font bytes; cloning it never copies the data.
    pub fn shared_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    /// Face index inside the font file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Shaping size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Where the font came from (a path or `system:<postscript name>`).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identity of the font data and face index, hashed once when the handle is built.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Hex SHA-256 of the font file, for diagnostics.
    pub fn sha256_hex(&self) -> String {
        let digest = Sha256::digest(self.bytes.as_slice());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Source of the single font a run shapes text with.
pub trait FontResolver: Send + Sync {
    /// Produce the font. Called at most once per run, before any layer is drawn.
    fn resolve(&self) -> PressResult<FontHandle>;
}

/// Always hands out the same preloaded font.
#[derive(Clone, Debug)]
pub struct FixedFontResolver(pub FontHandle);

impl FontResolver for FixedFontResolver {
    fn resolve(&self) -> PressResult<FontHandle> {
        Ok(self.0.clone())
    }
}

/// Font resolution driven by a font config file, an explicit font path and the system.
#[derive(Clone, Debug)]
pub struct ConfiguredFontResolver {
    /// Font config JSON mapping names to `{ "file": ..., "web_font": ... }` entries.
    pub config_path: Option<PathBuf>,
    /// Directory config entries' `file` values are relative to.
    pub fonts_dir: PathBuf,
    /// Font file used when the config yields nothing.
    pub font_path: Option<PathBuf>,
    /// Shaping size in pixels.
    pub size_px: f32,
    /// Whether to fall back to an installed system face.
    pub system_fallback: bool,
}

impl Default for ConfiguredFontResolver {
    fn default() -> Self {
        Self {
            config_path: None,
            fonts_dir: PathBuf::from("fonts"),
            font_path: None,
            size_px: DEFAULT_FONT_SIZE_PX,
            system_fallback: true,
        }
    }
}

impl FontResolver for ConfiguredFontResolver {
    fn resolve(&self) -> PressResult<FontHandle> {
        if let Some(config) = &self.config_path
            && let Some(file) = web_font_file(config)?
        {
            let path = self.fonts_dir.join(&file);
            tracing::debug!(font = %path.display(), "using configured web font");
            return FontHandle::load(&path, self.size_px);
        }

        if let Some(path) = &self.font_path {
            return FontHandle::load(path, self.size_px);
        }

        if self.system_fallback {
            return system_font(self.size_px);
        }

        Err(PressError::asset(
            "no font available: set a font config, a font file, or enable system fonts",
        ))
    }
}

/// Read the font config at `path` and return the `file` of the last `web_font` entry.
///
/// A missing config file yields `Ok(None)`.
pub fn web_font_file(path: &Path) -> PressResult<Option<String>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PressError::config(format!(
                "read font config '{}': {e}",
                path.display()
            )));
        }
    };
    parse_web_font_file(&raw)
}

/// Parse font config JSON text; see [`web_font_file`].
pub fn parse_web_font_file(raw: &str) -> PressResult<Option<String>> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| PressError::config(format!("font config is not valid JSON: {e}")))?;
    let entries = value
        .as_object()
        .ok_or_else(|| PressError::config("font config must be a JSON object"))?;

    let mut chosen = None;
    for (name, entry) in entries {
        if !entry.get("web_font").is_some_and(truthy) {
            continue;
        }
        let file = entry
            .get("file")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                PressError::config(format!("font config entry '{name}' has no 'file' string"))
            })?;
        chosen = Some(file.to_owned());
    }
    Ok(chosen)
}

fn truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Load an installed monospace face, falling back to sans-serif then serif.
pub fn system_font(size_px: f32) -> PressResult<FontHandle> {
    use usvg::fontdb;

    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let families = [
        fontdb::Family::Monospace,
        fontdb::Family::SansSerif,
        fontdb::Family::Serif,
    ];
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| PressError::asset("no system fonts installed"))?;

    let name = db
        .face(id)
        .map(|f| f.post_script_name.clone())
        .unwrap_or_default();
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| PressError::asset(format!("system font '{name}' could not be read")))?;

    tracing::debug!(font = %name, "using system font");
    FontHandle::from_bytes(bytes, index, size_px, format!("system:{name}"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
