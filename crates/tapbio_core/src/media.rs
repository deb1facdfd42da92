//! Uploaded image files as inline `data:` URLs.
//!
//! The profile stores an avatar as a plain string, so an uploaded file is
//! carried inline as `data:<mime>;base64,<payload>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum MediaError {
    /// The file extension does not name a supported image type.
    UnsupportedType(PathBuf),
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for MediaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType(path) => write!(
                f,
                "`{}` is not a supported image (png, jpg, jpeg, gif, webp, svg, avif, bmp, ico)",
                path.display()
            ),
            Self::Read { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for MediaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedType(_) => None,
            Self::Read { source, .. } => Some(source),
        }
    }
}

/// Image MIME type for `path`, judged by its extension.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(mime)
}

/// Inline `data:` URL for `bytes` of type `mime`.
pub fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads an image file into a `data:` URL.
///
/// The type is checked before the file is read.
pub fn read_image_data_url(path: &Path) -> Result<String, MediaError> {
    let mime =
        image_mime_type(path).ok_or_else(|| MediaError::UnsupportedType(path.to_path_buf()))?;
    let bytes = std::fs::read(path).map_err(|source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image_data_url(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::{image_data_url, image_mime_type, read_image_data_url, MediaError};
    use std::path::Path;

    #[test]
    fn mime_type_follows_extension_case_insensitively() {
        assert_eq!(image_mime_type(Path::new("me.PNG")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("a/b.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("logo.svg")), Some("image/svg+xml"));
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("avatar")), None);
    }

    #[test]
    fn data_url_carries_standard_base64() {
        assert_eq!(
            image_data_url("image/png", &[0xfb, 0xff, 0x00]),
            "data:image/png;base64,+/8A"
        );
    }

    #[test]
    fn reads_file_into_data_url() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("avatar.gif");
        std::fs::write(&path, b"GIF89a").expect("write");

        assert_eq!(
            read_image_data_url(&path).expect("data url"),
            "data:image/gif;base64,R0lGODlh"
        );
    }

    #[test]
    fn unsupported_or_missing_files_are_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(
            read_image_data_url(&dir.path().join("cv.pdf")),
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            read_image_data_url(&dir.path().join("missing.png")),
            Err(MediaError::Read { .. })
        ));
    }
}
