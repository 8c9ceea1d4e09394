//! Image generation binding.
//!
//! This is a sibling of the chat completion protocol: one request, one
//! response, no transcript.

use serde::{Deserialize, Serialize};

/// Size of the generated images.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ImageSize {
    /// 256x256 pixels.
    #[default]
    #[serde(rename = "256x256")]
    Small,
    /// 512x512 pixels.
    #[serde(rename = "512x512")]
    Medium,
    /// 1024x1024 pixels.
    #[serde(rename = "1024x1024")]
    Large,
}

impl ImageSize {
    /// Returns the wire value of this size.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Small => "256x256",
            ImageSize::Medium => "512x512",
            ImageSize::Large => "1024x1024",
        }
    }
}

/// A request to generate images from a text prompt.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ImageRequest {
    /// What the images should show.
    pub prompt: String,
    /// Number of images to generate.
    pub n: u8,
    /// Size of every image.
    pub size: ImageSize,
}

impl ImageRequest {
    /// Creates a request for a single image of the default size.
    #[inline]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            n: 1,
            size: ImageSize::default(),
        }
    }

    /// Sets the number of images.
    #[inline]
    pub fn with_count(mut self, n: u8) -> Self {
        self.n = n;
        self
    }

    /// Sets the image size.
    #[inline]
    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }
}

/// The response of an image generation request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ImageResponse {
    /// Creation time in seconds since the Unix epoch.
    pub created: i64,
    /// The generated images.
    pub data: Vec<ImageData>,
}

impl ImageResponse {
    /// Returns the URLs of the images that were delivered by URL.
    ///
    /// Images delivered as inline base64 are skipped.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.data.iter().filter_map(|image| image.url.as_deref())
    }
}

/// One generated image, delivered either by URL or inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ImageData {
    /// Where the image can be downloaded.
    pub url: Option<String>,
    /// The image encoded as base64 JSON string.
    pub b64_json: Option<String>,
}
