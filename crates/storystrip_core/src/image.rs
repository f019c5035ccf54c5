//! Image payloads and image-generation options.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Encoded image bytes as returned by the image collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
pub struct PanelImage(Vec<u8>);

impl PanelImage {
    /// Wraps encoded image bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the image, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of encoded bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Panel size offered by the image backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum PanelSize {
    /// 1024 x 1024
    #[default]
    #[serde(rename = "1024x1024")]
    #[strum(serialize = "1024x1024")]
    Square,
    /// 1024 x 1792
    #[serde(rename = "1024x1792")]
    #[strum(serialize = "1024x1792")]
    Portrait,
    /// 1792 x 1024
    #[serde(rename = "1792x1024")]
    #[strum(serialize = "1792x1024")]
    Landscape,
}

impl PanelSize {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PanelSize::Square => (1024, 1024),
            PanelSize::Portrait => (1024, 1792),
            PanelSize::Landscape => (1792, 1024),
        }
    }
}

/// Rendering quality requested from the image backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageQuality {
    /// Standard quality
    #[default]
    Standard,
    /// High definition
    Hd,
}

/// Encoding of generated panel images.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// JPEG with `output_compression`
    Jpeg,
}

impl ImageFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Options sent with every image request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct ImageOptions {
    /// Panel size
    size: PanelSize,
    /// Rendering quality
    quality: ImageQuality,
    /// Output encoding
    output_format: ImageFormat,
    /// Compression level 0..=100, only meaningful for JPEG
    output_compression: u8,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            size: PanelSize::default(),
            quality: ImageQuality::default(),
            output_format: ImageFormat::default(),
            output_compression: 100,
        }
    }
}

impl ImageOptions {
    /// Creates a builder for ImageOptions.
    pub fn builder() -> ImageOptionsBuilder {
        ImageOptionsBuilder::default()
    }
}
