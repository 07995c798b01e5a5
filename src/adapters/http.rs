use crate::domain::model::{ImageData, ImageKey, ImageSet, UrlMap};
use crate::domain::ports::{GenerationResult, ImageGenerator, ImageStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Accepts plain base64 as well as `data:<mime>;base64,<payload>` strings.
fn decode_image(encoded: &str) -> Result<ImageData> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => encoded,
    };
    ImageData::from_base64(payload)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    success: bool,
    image_data: Option<String>,
}

/// Image generation backend reached over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    client: Client,
    endpoint: String,
}

impl HttpImageGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        reference_images: &[ImageData],
    ) -> Result<GenerationResult> {
        let request = GenerateRequest {
            prompt,
            images: reference_images.iter().map(ImageData::to_base64).collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!("Generation backend responded with {}", response.status());

        let body: GenerateResponse = response.json().await?;
        let image = match body.image_data.as_deref() {
            Some(encoded) if body.success => Some(decode_image(encoded)?),
            _ => None,
        };

        Ok(GenerationResult {
            success: body.success,
            image,
        })
    }
}

#[derive(Debug, Serialize)]
struct SaveImagesRequest<'a> {
    uuid: Uuid,
    images: BTreeMap<&'a str, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveImagesResponse {
    #[serde(default)]
    image_urls: Option<BTreeMap<String, String>>,
}

/// Image persistence backend reached over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageStore {
    client: Client,
    endpoint: String,
}

impl HttpImageStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn save_images(&self, document_id: Uuid, images: &ImageSet) -> Result<UrlMap> {
        let request = SaveImagesRequest {
            uuid: document_id,
            images: images
                .iter()
                .map(|(key, image)| (key.as_str(), image.to_data_url()))
                .collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!("Storage backend responded with {}", response.status());

        let body: SaveImagesResponse = response.json().await?;
        Ok(body
            .image_urls
            .unwrap_or_default()
            .into_iter()
            .map(|(key, url)| (ImageKey::from(key.as_str()), url))
            .collect())
    }
}
