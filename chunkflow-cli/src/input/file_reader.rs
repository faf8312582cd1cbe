//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads input documents as UTF-8 text
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Get file size in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("context.txt");

        let content = "First paragraph.\n日本語の段落です。";
        fs::write(&file_path, content).unwrap();

        assert_eq!(FileReader::read_text(&file_path).unwrap(), content);
        assert_eq!(
            FileReader::file_size(&file_path).unwrap(),
            content.len() as u64
        );
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/context.txt");

        let err = FileReader::read_text(path).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));

        let err = FileReader::file_size(path).unwrap_err();
        assert!(err.to_string().contains("Failed to get metadata"));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("binary.bin");
        fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(FileReader::read_text(&file_path).is_err());
    }
}
