use std::{fmt, marker::PhantomData};

use derive_more::Deref;
use nalgebra::{vector, Vector2};
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub x: f32,
    pub y: f32,
}

impl Size {
    pub fn vector(self) -> Vector2<i32> {
        vector![self.w, self.h]
    }
}

impl From<Vector2<i32>> for Size {
    fn from(v: Vector2<i32>) -> Self {
        Self { w: v.x, h: v.y }
    }
}

impl Point {
    pub fn vector(self) -> Vector2<i32> {
        vector![self.x, self.y]
    }
}

impl From<Vector2<i32>> for Point {
    fn from(v: Vector2<i32>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Pivot {
    pub fn vector(self) -> Vector2<f32> {
        vector![self.x, self.y]
    }
}

impl From<Vector2<f32>> for Pivot {
    fn from(v: Vector2<f32>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Exporter metadata. Every field is optional and passed through as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Exporters write it either as a number or as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smartupdate: Option<String>,
}

/// Frames keyed by their name, in document order.
///
/// Unlike a map, repeated names are kept as separate entries,
/// so the atlas builder gets to apply its duplicate policy to them.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct FrameMap<F>(pub Vec<(String, F)>);

impl<F> Default for FrameMap<F> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<F: Serialize> Serialize for FrameMap<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, frame) in &self.0 {
            map.serialize_entry(name, frame)?;
        }
        map.end()
    }
}

struct FrameMapVisitor<F>(PhantomData<F>);

impl<'de, F: Deserialize<'de>> Visitor<'de> for FrameMapVisitor<F> {
    type Value = FrameMap<F>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of frames")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut frames = Vec::new();
        while let Some(entry) = map.next_entry()? {
            frames.push(entry);
        }
        Ok(FrameMap(frames))
    }
}

impl<'de, F: Deserialize<'de>> Deserialize<'de> for FrameMap<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FrameMapVisitor(PhantomData))
    }
}
