use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

const MAX_PROMPT_SIZE: u64 = 1024 * 1024; // 1MB

/// Reads a system prompt from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read, exceeds 1 MB, or is not
/// valid UTF-8.
pub fn read_prompt_file(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to access system prompt file: {}", path.display()))?;

    let size = metadata.len();
    if size > MAX_PROMPT_SIZE {
        bail!(
            "System prompt file ({:.1} MB) exceeds maximum allowed size (1 MB): {}",
            size as f64 / 1024.0 / 1024.0,
            path.display()
        );
    }

    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read system prompt file: {}", path.display()))?;
    String::from_utf8(bytes).context("System prompt file is not valid UTF-8")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_prompt_file_multiline() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = "# HPC Assistant\n\n## Role\n- Help with workflow files.\n";
        write!(temp_file, "{content}").unwrap();

        let result = read_prompt_file(temp_file.path()).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_prompt_file(Path::new("/nonexistent/path/to/prompt.md"));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_prompt_file_exceeds_max_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large_prompt.md");
        fs::write(&file_path, "x".repeat(MAX_PROMPT_SIZE as usize + 1)).unwrap();

        let err = read_prompt_file(&file_path).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_read_prompt_file_invalid_utf8() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0xff, 0xfe, 0xfd]).unwrap();

        assert!(read_prompt_file(temp_file.path()).is_err());
    }
}
