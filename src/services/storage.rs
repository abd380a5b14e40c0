use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::MediaStorageConfig;
use crate::database::models::AttachmentRef;

/// Resource class the media store files an object under. Documents go in
/// as raw blobs, everything else is treated as an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Raw,
}

impl AttachmentKind {
    pub fn for_filename(name: &str) -> Self {
        if name.ends_with(".pdf") || name.ends_with(".docx") {
            AttachmentKind::Raw
        } else {
            AttachmentKind::Image
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Raw => "raw",
        }
    }
}

/// Port to the hosted media store that keeps leave attachments.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<AttachmentRef>;
    async fn delete(&self, public_id: &str, kind: AttachmentKind) -> Result<()>;
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// Cloudinary-shaped HTTP client: signed form posts against the
/// `/{cloud_name}/{resource_type}/{action}` upload API.
pub struct CloudMediaStore {
    config: MediaStorageConfig,
    client: reqwest::Client,
}

impl CloudMediaStore {
    pub fn new(config: MediaStorageConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, kind: AttachmentKind, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/{}",
            self.config.cloud_name,
            kind.as_str(),
            action
        )
    }

    /// Request signature: the parameters sorted by name, joined with `&`,
    /// with the API secret appended, hashed.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);
        let to_sign = sorted
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl AttachmentStore for CloudMediaStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<AttachmentRef> {
        let kind = AttachmentKind::for_filename(filename);
        let timestamp = Utc::now().timestamp().to_string();
        let folder = "leave_app";
        let signature = self.sign(&[
            ("folder", folder),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ]);

        let data_uri = format!(
            "data:application/octet-stream;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );

        let form = [
            ("file", data_uri.as_str()),
            ("folder", folder),
            ("signature_algorithm", "sha256"),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint(kind, "upload"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("media upload failed: {} - {}", status, body));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(AttachmentRef {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str, kind: AttachmentKind) -> Result<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("public_id", public_id),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ]);

        let form = [
            ("public_id", public_id),
            ("signature_algorithm", "sha256"),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("media delete failed: {} - {}", status, body));
        }

        Ok(())
    }
}
