//! # Submission Archive
//!
//! A submission archive is a flat ZIP container: every response document
//! under its bare file name, plus one `submission_metadata.json`. Entries
//! are Deflate-compressed. The metadata is serialized in memory and written
//! straight into the container, so nothing besides the archive is left on
//! disk.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use cprobe_core::{sha256_file, FileDigest, ResponseDocument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::SubmitError;
use crate::metadata::{SubmissionMetadata, METADATA_FILE_NAME};

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Write `responses` and `metadata` into a new archive at `zip_path`.
///
/// An existing file at `zip_path` is replaced.
pub fn write_archive(
    zip_path: &Path,
    responses: &[ResponseDocument],
    metadata: &SubmissionMetadata,
) -> Result<(), SubmitError> {
    let file = File::create(zip_path).map_err(SubmitError::io(zip_path))?;
    let mut zip = ZipWriter::new(file);

    for response in responses {
        let bytes = response.read_bytes().map_err(SubmitError::io(&response.path))?;
        zip.start_file(response.name.as_str(), entry_options())?;
        zip.write_all(&bytes).map_err(SubmitError::io(zip_path))?;
        tracing::debug!(file = %response.name, bytes = bytes.len(), "added response");
    }

    let json = metadata.to_pretty_json()?;
    zip.start_file(METADATA_FILE_NAME, entry_options())?;
    zip.write_all(json.as_bytes()).map_err(SubmitError::io(zip_path))?;

    let mut file = zip.finish()?;
    file.flush().map_err(SubmitError::io(zip_path))?;
    Ok(())
}

/// Read the metadata document back out of an archive.
pub fn read_metadata(zip_path: &Path) -> Result<SubmissionMetadata, SubmitError> {
    let file = File::open(zip_path).map_err(SubmitError::io(zip_path))?;
    let mut archive = ZipArchive::new(file)?;
    let mut entry = archive.by_name(METADATA_FILE_NAME)?;
    let mut json = String::new();
    entry.read_to_string(&mut json).map_err(SubmitError::io(zip_path))?;
    Ok(serde_json::from_str(&json)?)
}

/// Names of every entry in an archive, in stored order.
pub fn entry_names(zip_path: &Path) -> Result<Vec<String>, SubmitError> {
    let file = File::open(zip_path).map_err(SubmitError::io(zip_path))?;
    let archive = ZipArchive::new(file)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Recompute the archive digest and compare it with `expected`.
pub fn verify_archive(zip_path: &Path, expected: &FileDigest) -> Result<bool, SubmitError> {
    let actual = sha256_file(zip_path).map_err(SubmitError::io(zip_path))?;
    let matches = actual == *expected;
    if !matches {
        tracing::warn!(
            path = %zip_path.display(),
            expected = %expected,
            actual = %actual,
            "archive checksum mismatch"
        );
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn responses(dir: &TempDir, files: &[(&str, &str)]) -> Vec<ResponseDocument> {
        files
            .iter()
            .map(|(name, body)| {
                let path = dir.path().join(name);
                std::fs::write(&path, body).unwrap();
                ResponseDocument {
                    name: name.to_string(),
                    path,
                }
            })
            .collect()
    }

    fn metadata(files: &[&str]) -> SubmissionMetadata {
        SubmissionMetadata {
            submission_id: "20260115_093000".into(),
            timestamp: "2026-01-15T09:30:00.000000".into(),
            num_responses: files.len(),
            response_files: files.iter().map(|f| f.to_string()).collect(),
            system_info: None,
            config: serde_json::json!({}),
        }
    }

    #[test]
    fn archive_holds_responses_and_metadata() {
        let dir = TempDir::new().unwrap();
        let docs = responses(&dir, &[("a.md", "# A"), ("b.md", "# B")]);
        let zip_path = dir.path().join("out.zip");
        write_archive(&zip_path, &docs, &metadata(&["a.md", "b.md"])).unwrap();

        assert_eq!(
            entry_names(&zip_path).unwrap(),
            vec!["a.md", "b.md", METADATA_FILE_NAME]
        );

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut body = String::new();
        archive.by_name("b.md").unwrap().read_to_string(&mut body).unwrap();
        assert_eq!(body, "# B");

        let meta = read_metadata(&zip_path).unwrap();
        assert_eq!(meta.num_responses, 2);
        assert_eq!(meta.response_files, vec!["a.md", "b.md"]);
    }

    #[test]
    fn no_staging_metadata_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let docs = responses(&dir, &[("a.md", "x")]);
        write_archive(&dir.path().join("out.zip"), &docs, &metadata(&["a.md"])).unwrap();
        assert!(!dir.path().join(METADATA_FILE_NAME).exists());
    }

    #[test]
    fn entries_are_deflated() {
        let dir = TempDir::new().unwrap();
        let docs = responses(&dir, &[("a.md", &"repeat ".repeat(500))]);
        let zip_path = dir.path().join("out.zip");
        write_archive(&zip_path, &docs, &metadata(&["a.md"])).unwrap();

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let entry = archive.by_name("a.md").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());
    }

    #[test]
    fn verify_detects_tampering() {
        let dir = TempDir::new().unwrap();
        let docs = responses(&dir, &[("a.md", "x")]);
        let zip_path = dir.path().join("out.zip");
        write_archive(&zip_path, &docs, &metadata(&["a.md"])).unwrap();

        let digest = sha256_file(&zip_path).unwrap();
        assert!(verify_archive(&zip_path, &digest).unwrap());

        let mut bytes = std::fs::read(&zip_path).unwrap();
        bytes.push(0);
        std::fs::write(&zip_path, bytes).unwrap();
        assert!(!verify_archive(&zip_path, &digest).unwrap());
    }

    #[test]
    fn read_metadata_on_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_metadata(&dir.path().join("nope.zip")).unwrap_err();
        assert!(matches!(err, SubmitError::Io { .. }));
    }
}
