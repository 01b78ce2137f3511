//! Photo intake for store uploads.
//!
//! An upload is accepted only when its declared content type is `image/*`.
//! The stored file is named `{uuid}.{subtype}` and scaled down to the
//! configured maximum width, keeping the aspect ratio. Decoding and encoding
//! run on the blocking pool.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use image::{imageops::FilterType, GenericImageView};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("not an image: {0:?}")]
    NotAnImage(String),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not store image: {0}")]
    Io(#[from] std::io::Error),

    #[error("resize task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct PhotoIntake {
    dir: PathBuf,
    max_width: u32,
}

impl PhotoIntake {
    pub fn new(dir: impl Into<PathBuf>, max_width: u32) -> Self {
        Self {
            dir: dir.into(),
            max_width,
        }
    }

    /// Directory stored photos land in and are served from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate, resize and store an upload. Returns the stored file name.
    pub async fn accept(&self, content_type: &str, bytes: Bytes) -> Result<String, PhotoError> {
        let extension = image_extension(content_type)
            .ok_or_else(|| PhotoError::NotAnImage(content_type.to_string()))?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.dir.join(&filename);
        let max_width = self.max_width;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::task::spawn_blocking(move || resize_and_save(&bytes, max_width, &path)).await??;

        tracing::info!(file = %filename, "photos: stored upload");
        Ok(filename)
    }
}

/// Subtype of an `image/*` content type, usable as a file extension.
fn image_extension(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let subtype = essence.strip_prefix("image/")?;
    if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(subtype.to_string())
}

fn resize_and_save(bytes: &[u8], max_width: u32, path: &Path) -> Result<(), PhotoError> {
    let format = image::guess_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format)?;

    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Triangle)
    } else {
        img
    };

    img.save_with_format(path, format)?;
    Ok(())
}
