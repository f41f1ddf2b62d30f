//! Loading recorded answers.

use std::path::Path;

use tracing::debug;

use crate::error::{GameError, GameResult};

/// Read a recorded answer from disk. Missing, unreadable, or empty files are
/// input errors.
pub async fn load_recording(path: &Path) -> GameResult<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| GameError::Input(format!("cannot read {}: {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(GameError::Input(format!("{} is empty", path.display())));
    }
    debug!(path = %path.display(), bytes = bytes.len(), "loaded recording");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF....WAVE").unwrap();
        let bytes = load_recording(file.path()).await.unwrap();
        assert_eq!(bytes, b"RIFF....WAVE");
    }

    #[tokio::test]
    async fn missing_and_empty_files_are_input_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_recording(&dir.path().join("nope.wav")).await.unwrap_err();
        assert!(matches!(err, GameError::Input(_)));

        let empty = tempfile::NamedTempFile::new().unwrap();
        let err = load_recording(empty.path()).await.unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }
}
