use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    assets::color::TintColor,
    foundation::error::{PressError, PressResult},
};

/// Fields a layer record may carry.
const LAYER_FIELDS: &[&str] = &[
    "type",
    "kind",
    "text",
    "filter",
    "hi_width",
    "hi_height",
    "hi_left",
    "hi_top",
    "angle",
];

/// Fields older design exports emit that carry no meaning for compositing.
const IGNORED_LAYER_FIELDS: &[&str] = &["hi_right", "hi_bottom", "logo", "font", "stroke_width"];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
/// Layer geometry in design-space units.
pub struct Placement {
    /// Width in design units.
    #[serde(default = "default_hi_extent")]
    pub hi_width: f64,
    /// Height in design units.
    #[serde(default = "default_hi_extent")]
    pub hi_height: f64,
    /// Left offset in design units.
    #[serde(default)]
    pub hi_left: f64,
    /// Top offset in design units.
    #[serde(default)]
    pub hi_top: f64,
    /// Rotation in radians.
    #[serde(default)]
    pub angle: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            hi_width: default_hi_extent(),
            hi_height: default_hi_extent(),
            hi_left: 0.0,
            hi_top: 0.0,
            angle: 0.0,
        }
    }
}

fn default_hi_extent() -> f64 {
    100.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which job-level asset an image layer draws.
pub enum ImageKind {
    /// The logo asset.
    Logo,
    /// The name asset.
    Name,
    /// The background asset.
    Background,
}

impl ImageKind {
    /// All kinds, in the order the CLI accepts their references.
    pub const ALL: [ImageKind; 3] = [ImageKind::Logo, ImageKind::Name, ImageKind::Background];

    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Logo => "logo",
            ImageKind::Name => "name",
            ImageKind::Background => "background",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// CSS-like color filter attached to an image layer.
pub enum FilterSpec {
    /// Replace hue with `amount` and force full saturation.
    #[serde(rename = "css_hue_rotate", alias = "hue_rotate")]
    HueRotate {
        /// Target hue on the 8-bit wheel (`0..=255`).
        #[serde(rename = "value", deserialize_with = "de_hue_amount")]
        amount: u8,
    },
    /// Invert the color channels, keeping alpha.
    #[serde(rename = "css_invert", alias = "invert")]
    Invert {},
    /// Recolor the grayscale of the image with a tint.
    #[serde(rename = "css_saturate", alias = "saturate")]
    SaturateTint {
        /// Tint color; white when absent.
        #[serde(default)]
        tint: TintColor,
        /// Strength as sent by the designer; carried through but not used by the tint math.
        #[serde(
            default,
            deserialize_with = "de_opt_number",
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<f64>,
    },
}

impl FilterSpec {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            FilterSpec::HueRotate { .. } => "hue_rotate",
            FilterSpec::Invert {} => "invert",
            FilterSpec::SaturateTint { .. } => "saturate_tint",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A text label drawn in solid black with the run's font.
pub struct TextLayer {
    /// UTF-8 text; empty text draws nothing.
    #[serde(default)]
    pub text: String,
    /// Design-space geometry.
    #[serde(flatten)]
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// An image overlay drawing one of the job's assets.
pub struct ImageLayer {
    /// Asset slot to draw.
    pub kind: ImageKind,
    /// Optional color filter applied to the source before compositing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    /// Design-space geometry.
    #[serde(flatten)]
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// One entry of the paint-ordered layer list.
pub enum LayerSpec {
    /// Text label.
    Text(TextLayer),
    /// Image overlay.
    Image(ImageLayer),
}

impl LayerSpec {
    /// Design-space geometry of this layer.
    pub fn placement(&self) -> &Placement {
        match self {
            LayerSpec::Text(t) => &t.placement,
            LayerSpec::Image(i) => &i.placement,
        }
    }

    /// Wire name of the layer type.
    pub fn type_name(&self) -> &'static str {
        match self {
            LayerSpec::Text(_) => "text",
            LayerSpec::Image(_) => "image",
        }
    }

    /// Parse one layer record, enforcing the field whitelist.
    pub fn from_value(index: usize, value: serde_json::Value) -> PressResult<Self> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(PressError::serde(format!(
                "layer {index}: expected a JSON object"
            )));
        };

        if let Some(unknown) = map
            .keys()
            .find(|k| !LAYER_FIELDS.contains(&k.as_str()) && !IGNORED_LAYER_FIELDS.contains(&k.as_str()))
        {
            return Err(PressError::serde(format!(
                "layer {index}: unknown field '{unknown}'"
            )));
        }
        for key in IGNORED_LAYER_FIELDS {
            if map.remove(*key).is_some() {
                tracing::debug!(layer = index, field = *key, "ignoring legacy layer field");
            }
        }

        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| PressError::serde(format!("layer {index}: {e}")))
    }
}

/// Parse a JSON array of layer records into paint-ordered [`LayerSpec`] values.
pub fn parse_layers(json: &str) -> PressResult<Vec<LayerSpec>> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| PressError::serde(format!("layer list is not valid JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(PressError::serde("layer list must be a JSON array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| LayerSpec::from_value(i, v))
        .collect()
}

fn de_hue_amount<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    let raw = match &v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(raw) = raw else {
        return Err(serde::de::Error::custom(format!(
            "hue amount must be an integer, got {v}"
        )));
    };
    u8::try_from(raw)
        .map_err(|_| serde::de::Error::custom(format!("hue amount {raw} is outside 0..=255")))
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(deserializer)?;
    match v {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("filter value \"{s}\" is not a number"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "filter value must be a number, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
