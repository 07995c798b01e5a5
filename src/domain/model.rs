use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use uuid::Uuid;

/// A document as it moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub markdown: String,
    /// Assigned only when the augmentation path runs.
    pub id: Option<Uuid>,
}

impl Document {
    pub fn new(title: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            id: None,
        }
    }
}

/// One placeholder occurrence, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch {
    pub index: usize,
    pub prompt: String,
    /// Byte range of the whole tag in the source markdown.
    pub span: Range<usize>,
}

impl PlaceholderMatch {
    pub fn key(&self) -> ImageKey {
        ImageKey::from_index(self.index)
    }
}

/// Join key between generated images, stored images and substitution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn from_index(index: usize) -> Self {
        Self(format!("image_{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Raw image bytes as returned by a generation backend.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ImageData(Vec<u8>);

impl ImageData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_base64(encoded: &str) -> crate::utils::error::Result<Self> {
        Ok(Self(BASE64_STANDARD.decode(encoded.trim())?))
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.0)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageData({} bytes)", self.0.len())
    }
}

/// Successfully generated images, keyed by placeholder.
pub type ImageSet = BTreeMap<ImageKey, ImageData>;

/// Durable URLs returned by persistence. May hold a subset of the keys.
pub type UrlMap = BTreeMap<ImageKey, String>;

/// Arguments accepted by the `presentDocument` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentDocumentArgs {
    pub title: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    pub markdown: String,
}

/// Payload returned to the host tool runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentDocumentResult {
    pub message: String,
    pub title: String,
    pub data: DocumentData,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uuid: Option<Uuid>,
    pub instructions: String,
}
