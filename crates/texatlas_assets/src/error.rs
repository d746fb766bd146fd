use thiserror::Error;

/// Every way loading or querying an atlas can fail.
///
/// Errors produced while parsing are fatal to that parse: no partially
/// built atlas is ever handed out.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("malformed atlas stream at {field}: {reason}")]
    MalformedStream { field: String, reason: String },

    #[error("unable to detect atlas schema (frames: {frames}, textures: {textures}), expected exactly one of them")]
    SchemaDetection { frames: bool, textures: bool },

    #[error("missing required field `{field}` in {location}")]
    MissingRequiredField { location: String, field: &'static str },

    #[error("duplicate region name `{0}`")]
    DuplicateRegionName(String),

    #[error("unable to resolve image `{name}`")]
    AssetResolution {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid region `{region}`: {reason}")]
    InvalidRegion { region: String, reason: String },

    #[error("region `{0}` not found")]
    RegionNotFound(String),

    #[error("region index {index} is out of range, atlas has {len} regions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to load atlas `{path}`: {source}")]
    Asset {
        path: String,
        #[source]
        source: Box<AtlasError>,
    },
}

impl AtlasError {
    /// Attaches the path of the asset being loaded to the error.
    pub fn in_asset(self, path: impl Into<String>) -> Self {
        Self::Asset {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Returns the underlying error, skipping asset path wrappers.
    pub fn root(&self) -> &AtlasError {
        match self {
            Self::Asset { source, .. } => source.root(),
            e => e,
        }
    }

    pub(crate) fn invalid_region(region: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            region: region.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = AtlasError> = std::result::Result<T, E>;
