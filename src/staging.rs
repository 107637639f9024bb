//! Single-slot image staging for the chat composer.

use crate::api::ImageUpload;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// How long the dropzone shows its "processing" state after a file lands.
pub const PROCESSING_FEEDBACK: Duration = Duration::from_millis(500);

/// Mime type and the extensions that map to it.
pub const ACCEPTED_TYPES: &[(&str, &[&str])] = &[
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/png", &["png"]),
    ("image/dicom", &["dcm"]),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("{name} is larger than the 10 MB limit")]
    TooLarge { name: String, size: u64 },

    #[error("{0} is not a supported image type (JPEG, PNG or DICOM)")]
    UnsupportedType(String),

    #[error("{0} is empty")]
    Empty(String),

    #[error("{0} could not be read")]
    Unreadable(String),
}

/// Last path component, for engines that hand out full paths.
pub fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Value for an `<input type="file" accept=...>` attribute.
pub fn accept_attribute() -> String {
    ACCEPTED_TYPES
        .iter()
        .flat_map(|(mime, exts)| {
            std::iter::once(mime.to_string()).chain(exts.iter().map(|ext| format!(".{ext}")))
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();
    ACCEPTED_TYPES
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(mime, _)| *mime)
}

/// Screens a file before reading it. An unknown size defers the size check
/// until the bytes are in hand.
pub fn prescreen(file_name: &str, size: Option<u64>) -> Result<(), StageError> {
    match size {
        Some(size) => screen(file_name, size).map(|_| ()),
        None => mime_for(file_name)
            .map(|_| ())
            .ok_or_else(|| StageError::UnsupportedType(file_name.to_string())),
    }
}

/// Type and size filter, applied before any bytes are read.
pub fn screen(file_name: &str, size: u64) -> Result<&'static str, StageError> {
    let mime =
        mime_for(file_name).ok_or_else(|| StageError::UnsupportedType(file_name.to_string()))?;
    if size > MAX_IMAGE_BYTES {
        return Err(StageError::TooLarge {
            name: file_name.to_string(),
            size,
        });
    }
    if size == 0 {
        return Err(StageError::Empty(file_name.to_string()));
    }
    Ok(mime)
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[derive(Clone, Debug, PartialEq)]
pub struct StagedImage {
    pub file_name: String,
    pub mime: &'static str,
    bytes: Arc<Vec<u8>>,
    pub preview: String,
}

impl StagedImage {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, StageError> {
        let file_name = file_name.into();
        let mime = screen(&file_name, bytes.len() as u64)?;
        let preview = data_url(mime, &bytes);
        Ok(Self {
            file_name,
            mime,
            bytes: Arc::new(bytes),
            preview,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_upload(&self) -> ImageUpload {
        ImageUpload {
            file_name: self.file_name.clone(),
            mime: self.mime.to_string(),
            bytes: self.bytes.as_ref().clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSlot {
    staged: Option<StagedImage>,
    processing: bool,
    generation: u64,
}

impl ImageSlot {
    /// Stages `image`, replacing whatever was there.
    ///
    /// Returns the generation to hand back to [`ImageSlot::mark_ready`].
    pub fn accept(&mut self, image: StagedImage) -> u64 {
        if let Some(previous) = &self.staged {
            tracing::debug!(replaced = %previous.file_name, "replacing staged image");
        }
        tracing::info!(file = %image.file_name, bytes = image.size(), "image staged");
        self.generation += 1;
        self.processing = true;
        self.staged = Some(image);
        self.generation
    }

    /// Ends processing for `generation`. Ignored once a newer image was staged.
    pub fn mark_ready(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.processing = false;
        true
    }

    pub fn is_processing(&self) -> bool {
        self.processing && self.staged.is_some()
    }

    pub fn get(&self) -> Option<&StagedImage> {
        self.staged.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_none()
    }

    /// Clears the slot. Safe to call when already empty.
    pub fn remove(&mut self) -> Option<StagedImage> {
        self.processing = false;
        self.staged.take()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_case_insensitive() {
        assert_eq!(mime_for("chest.PNG"), Some("image/png"));
        assert_eq!(mime_for("knee.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for("ct_slice.dcm"), Some("image/dicom"));
        assert_eq!(mime_for("report.pdf"), None);
        assert_eq!(mime_for("no_extension"), None);
    }

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("/home/clinic/scans/chest.png"), "chest.png");
        assert_eq!(base_name("chest.png"), "chest.png");
    }

    #[test]
    fn oversized_files_are_screened_out() {
        assert!(screen("scan.png", MAX_IMAGE_BYTES).is_ok());
        assert_eq!(
            screen("scan.png", MAX_IMAGE_BYTES + 1),
            Err(StageError::TooLarge {
                name: "scan.png".to_string(),
                size: MAX_IMAGE_BYTES + 1
            })
        );
    }

    #[test]
    fn unsupported_type_wins_over_size() {
        assert!(matches!(
            screen("movie.mp4", MAX_IMAGE_BYTES * 4),
            Err(StageError::UnsupportedType(_))
        ));
    }

    #[test]
    fn preview_is_a_data_url() {
        let image = StagedImage::from_bytes("dot.png", vec![0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(image.preview, "data:image/png;base64,iVBORw==");
        assert_eq!(image.to_upload().bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn accept_attribute_lists_types_and_extensions() {
        let accept = accept_attribute();
        assert!(accept.starts_with("image/jpeg,.jpg,.jpeg"));
        assert!(accept.ends_with("image/dicom,.dcm"));
    }

    #[test]
    fn slot_holds_one_image() {
        let mut slot = ImageSlot::default();
        slot.accept(StagedImage::from_bytes("a.png", vec![1]).unwrap());
        let second = slot.accept(StagedImage::from_bytes("b.jpg", vec![2]).unwrap());
        assert_eq!(slot.get().map(|i| i.file_name.as_str()), Some("b.jpg"));
        assert!(slot.is_processing());
        assert!(slot.mark_ready(second));
        assert!(!slot.is_processing());
    }

    #[test]
    fn stale_ready_signal_is_ignored() {
        let mut slot = ImageSlot::default();
        let first = slot.accept(StagedImage::from_bytes("a.png", vec![1]).unwrap());
        let second = slot.accept(StagedImage::from_bytes("b.png", vec![2]).unwrap());
        assert!(!slot.mark_ready(first));
        assert!(slot.is_processing());
        assert!(slot.mark_ready(second));
        assert!(!slot.is_processing());
    }

    #[test]
    fn unknown_size_defers_to_read() {
        assert_eq!(prescreen("scan.png", None), Ok(()));
        assert!(matches!(
            prescreen("notes.txt", None),
            Err(StageError::UnsupportedType(_))
        ));
        assert!(matches!(
            prescreen("scan.png", Some(0)),
            Err(StageError::Empty(_))
        ));
        assert!(matches!(
            prescreen("scan.png", Some(MAX_IMAGE_BYTES + 1)),
            Err(StageError::TooLarge { .. })
        ));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut slot = ImageSlot::default();
        slot.accept(StagedImage::from_bytes("a.png", vec![1]).unwrap());
        assert!(slot.remove().is_some());
        assert!(slot.remove().is_none());
        assert!(slot.remove().is_none());
        assert!(slot.is_empty());
    }
}
