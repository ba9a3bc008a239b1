//! Image Storage
//! Mission: Keep uploaded profile and menu images, one folder per actor

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::auth::models::User;

/// What the client gets back after an upload
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageMeta {
    pub public_id: String,
    pub url: String,
    pub bytes: usize,
    pub format: Option<String>,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `data` under `folder`; `file_name` only contributes its extension
    async fn save(&self, folder: &str, file_name: Option<&str>, data: Vec<u8>) -> Result<ImageMeta>;
}

/// Folder for an actor's uploads: `restaurants/<email>` or `users/<email>`
pub fn folder_for(user: &User) -> String {
    let kind = if user.is_restaurant {
        "restaurants"
    } else {
        "users"
    };
    let email: String = user
        .user_email
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}/{}", kind, email)
}

/// Filesystem-backed store rooted at a directory
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, folder: &str, file_name: Option<&str>, data: Vec<u8>) -> Result<ImageMeta> {
        let format = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ").to_string();
        let public_id = format!("{}/{}", folder, stamp);
        let relative = match &format {
            Some(ext) => format!("{}.{}", public_id, ext),
            None => public_id.clone(),
        };

        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let bytes = data.len();
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("🖼️  Stored image {} ({} bytes)", public_id, bytes);

        Ok(ImageMeta {
            public_id,
            url: format!("/images/{}", relative),
            bytes,
            format,
        })
    }
}
