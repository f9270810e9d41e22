//! Local lesson reading with encoding detection
//!
//! Lessons written on other platforms sometimes carry a BOM or are saved as
//! UTF-16. Those are decoded by BOM; anything else is read as UTF-8 with a
//! lossy fallback so a stray byte never blocks a lesson.

use crate::error::{FetchError, FetchResult};
use std::path::Path;

/// Detected encoding of a lesson file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
    /// Not valid UTF-8 (lossy conversion used)
    Unknown,
}

/// Detect encoding from raw bytes
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => TextEncoding::Utf8Bom,
        [0xFF, 0xFE, ..] => TextEncoding::Utf16Le,
        [0xFE, 0xFF, ..] => TextEncoding::Utf16Be,
        _ if std::str::from_utf8(bytes).is_ok() => TextEncoding::Utf8,
        _ => TextEncoding::Unknown,
    }
}

/// Decode bytes to text, returning whether replacement characters were needed
pub fn decode_text(bytes: &[u8]) -> (String, bool) {
    match detect_encoding(bytes) {
        TextEncoding::Utf8 => (String::from_utf8_lossy(bytes).into_owned(), false),
        TextEncoding::Utf8Bom => decode_utf8_lossy(&bytes[3..]),
        TextEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        TextEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        TextEncoding::Unknown => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

fn decode_utf8_lossy(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let mut lossy = bytes.len() % 2 != 0;
    let units = bytes.chunks_exact(2).map(|chunk| unit([chunk[0], chunk[1]]));

    let text = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    (text, lossy)
}

/// Read a lesson file, enforcing the size limit
pub async fn read_lesson_file(path: &Path, max_size: u64) -> FetchResult<String> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| read_error(path, e))?;

    if !metadata.is_file() {
        return Err(FetchError::Read {
            path: path.to_path_buf(),
            reason: "not a file".to_string(),
        });
    }

    let size = metadata.len();
    if size > max_size {
        return Err(FetchError::TooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| read_error(path, e))?;
    let (text, lossy) = decode_text(&bytes);
    if lossy {
        log::warn!("Lesson {} was not valid text; some characters were replaced", path.display());
    }
    Ok(text)
}

fn read_error(path: &Path, error: std::io::Error) -> FetchError {
    match error.kind() {
        std::io::ErrorKind::NotFound => FetchError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FetchError::Read {
            path: path.to_path_buf(),
            reason: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_encoding() {
        assert_eq!(detect_encoding("Hola".as_bytes()), TextEncoding::Utf8);
        assert_eq!(detect_encoding(&[0xEF, 0xBB, 0xBF, b'H']), TextEncoding::Utf8Bom);
        assert_eq!(detect_encoding(&[0xFF, 0xFE, b'H', 0]), TextEncoding::Utf16Le);
        assert_eq!(detect_encoding(&[0xFE, 0xFF, 0, b'H']), TextEncoding::Utf16Be);
        assert_eq!(detect_encoding(&[0xC3, 0x28]), TextEncoding::Unknown);
    }

    #[test]
    fn test_decode_utf16_le() {
        let bytes = [0xFF, 0xFE, b'#', 0, b' ', 0, b'A', 0];
        assert_eq!(decode_text(&bytes), ("# A".to_string(), false));
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'#', b' ', b'A'];
        assert_eq!(decode_text(&bytes).0, "# A");
    }

    #[tokio::test]
    async fn test_read_lesson_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intro.md");
        std::fs::write(&path, "# Intro\n\nTexto").unwrap();

        let text = read_lesson_file(&path, 1024).await.unwrap();
        assert_eq!(text, "# Intro\n\nTexto");
    }

    #[tokio::test]
    async fn test_read_missing_lesson() {
        let dir = TempDir::new().unwrap();
        let err = read_lesson_file(&dir.path().join("missing.md"), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_read_too_large() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.md");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let err = read_lesson_file(&path, 16).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { size: 64, max_size: 16, .. }));
    }
}
