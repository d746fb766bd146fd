use std::fmt;

use serde::{
    de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::{Map, Value};
use texatlas_geometry::PixelRect;

use super::types::{FrameMap, Meta, Pivot, Size};

/// A single texture export with `frames` and `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    pub frames: LegacyFrames,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Frames are exported either as a list of frames with a `filename`,
/// or as a map from the frame name to the frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LegacyFrames {
    List(Vec<LegacyFrame>),
    Hash(FrameMap<LegacyFrame>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<PixelRect>,
    pub rotated: bool,
    pub trimmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_source_size: Option<PixelRect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Pivot>,
}

/// Takes a single optional field out of a frame object.
/// Errors name both the field and the frame it belongs to.
fn take<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    name: &str,
    location: &str,
) -> Result<Option<T>, String> {
    match fields.remove(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| format!("invalid `{name}` in {location}: {e}")),
    }
}

impl LegacyFrame {
    fn from_fields(mut fields: Map<String, Value>, location: &str) -> Result<Self, String> {
        Ok(Self {
            filename: take(&mut fields, "filename", location)?,
            frame: take(&mut fields, "frame", location)?,
            rotated: take(&mut fields, "rotated", location)?.unwrap_or_default(),
            trimmed: take(&mut fields, "trimmed", location)?.unwrap_or_default(),
            sprite_source_size: take(&mut fields, "spriteSourceSize", location)?,
            source_size: take(&mut fields, "sourceSize", location)?,
            pivot: take(&mut fields, "pivot", location)?,
        })
    }
}

struct LegacyFramesVisitor;

impl<'de> Visitor<'de> for LegacyFramesVisitor {
    type Value = LegacyFrames;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list or a map of frames")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut frames = Vec::new();
        while let Some(fields) = seq.next_element::<Map<String, Value>>()? {
            let location = match fields.get("filename").and_then(Value::as_str) {
                Some(name) => format!("frame `{name}`"),
                None => format!("frame #{}", frames.len()),
            };
            let frame = LegacyFrame::from_fields(fields, &location)
                .map_err(<A::Error as de::Error>::custom)?;
            frames.push(frame);
        }

        Ok(LegacyFrames::List(frames))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut frames = Vec::new();
        while let Some((name, fields)) = map.next_entry::<String, Map<String, Value>>()? {
            let frame = LegacyFrame::from_fields(fields, &format!("frame `{name}`"))
                .map_err(<A::Error as de::Error>::custom)?;
            frames.push((name, frame));
        }

        Ok(LegacyFrames::Hash(FrameMap(frames)))
    }
}

impl<'de> Deserialize<'de> for LegacyFrames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LegacyFramesVisitor)
    }
}
