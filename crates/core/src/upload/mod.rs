//! Project archive validation.
//!
//! An archive candidate is accepted when its declared media type is a zip
//! type or its file name ends in `.zip`. Rejection happens before any network
//! call is made.

use ct_protocol::run_models::UploadedArchive;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Canonical extension of project archives.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Media types that identify a zip archive.
const ARCHIVE_MEDIA_TYPES: &[&str] = &[
    "application/zip",
    "application/x-zip",
    "application/x-zip-compressed",
    "multipart/x-zip",
];

/// Errors raised before a run can start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file type. Please upload a .zip file.")]
    InvalidFileType { display_name: String },

    #[error("No project selected. Please upload a .zip file first.")]
    NoProjectSelected,
}

/// A file offered as a project archive, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCandidate {
    pub path: PathBuf,
    pub display_name: String,
    pub media_type: Option<String>,
}

impl ArchiveCandidate {
    /// Build a candidate with an explicitly declared media type.
    pub fn new(path: impl Into<PathBuf>, media_type: Option<String>) -> Self {
        let path = path.into();
        let display_name = display_name_of(&path);
        Self {
            path,
            display_name,
            media_type,
        }
    }

    /// Build a candidate whose media type is guessed from the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = mime_guess::from_path(&path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Self::new(path, media_type)
    }
}

fn display_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Accept or reject an archive candidate.
pub fn validate(candidate: &ArchiveCandidate) -> Result<UploadedArchive, ValidationError> {
    let declared_archive = candidate
        .media_type
        .as_deref()
        .is_some_and(is_archive_media_type);

    if declared_archive || candidate.display_name.ends_with(ARCHIVE_EXTENSION) {
        Ok(UploadedArchive {
            path: candidate.path.clone(),
            display_name: candidate.display_name.clone(),
        })
    } else {
        Err(ValidationError::InvalidFileType {
            display_name: candidate.display_name.clone(),
        })
    }
}

fn is_archive_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ARCHIVE_MEDIA_TYPES.contains(&essence.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_with_zip_media_type_is_accepted() {
        let candidate = ArchiveCandidate::new(
            "/uploads/project.zip",
            Some("application/zip".to_string()),
        );
        let archive = validate(&candidate).expect("zip should be accepted");
        assert_eq!(archive.display_name, "project.zip");
        assert_eq!(archive.path, PathBuf::from("/uploads/project.zip"));
    }

    #[test]
    fn test_rar_is_rejected() {
        let candidate = ArchiveCandidate::from_path("/uploads/project.rar");
        let err = validate(&candidate).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFileType { .. }));
        assert!(err.to_string().contains("Invalid file type"));
    }

    #[test]
    fn test_extension_alone_is_enough() {
        let candidate = ArchiveCandidate::new("build.zip", None);
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_media_type_alone_is_enough() {
        let candidate = ArchiveCandidate::new(
            "upload-blob",
            Some("application/x-zip-compressed".to_string()),
        );
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_media_type_parameters_are_ignored() {
        assert!(is_archive_media_type("Application/ZIP; charset=binary"));
        assert!(!is_archive_media_type("application/x-rar-compressed"));
        assert!(!is_archive_media_type(""));
    }

    #[test]
    fn test_from_path_guesses_zip_media_type() {
        let candidate = ArchiveCandidate::from_path("/tmp/app.zip");
        assert_eq!(candidate.media_type.as_deref(), Some("application/zip"));
        assert_eq!(candidate.display_name, "app.zip");
    }

    #[test]
    fn test_plain_text_is_rejected_even_if_named_like_zip_prefix() {
        let candidate = ArchiveCandidate::new("project.zip.txt", Some("text/plain".to_string()));
        assert!(validate(&candidate).is_err());
    }
}
