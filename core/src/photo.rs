//! Photo files: reading them for upload and rendering them as data URIs.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::error::{ApiError, Result};

pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// A photo read fully into memory. The file handle is closed before this
/// value is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PhotoUpload {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string());
        Ok(Self {
            file_name,
            content_type: PHOTO_CONTENT_TYPE.to_string(),
            data,
        })
    }
}

/// Reads `path` and returns it as a `data:image/jpeg;base64,...` URI.
pub fn encode_file_to_base64(path: &Path) -> Result<String> {
    let data = read(path)?;
    Ok(data_uri(PHOTO_CONTENT_TYPE, &data))
}

pub fn data_uri(content_type: &str, data: &[u8]) -> String {
    format!(
        "data:{content_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ApiError::Io {
        path: PathBuf::from(path),
        source,
    })
}
