//! Corpus loading: plain text, markdown, and PDF files from one directory.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Raw text extracted from one corpus file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    PlainText,
    Pdf,
}

fn source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" | "md" => Some(SourceKind::PlainText),
        "pdf" => Some(SourceKind::Pdf),
        _ => None,
    }
}

/// Read every supported file directly inside `dir`, sorted by file name.
///
/// Returns `Ok(None)` when the directory does not exist. Subdirectories and
/// unsupported extensions are skipped.
pub fn load_documents(dir: &Path) -> Result<Option<Vec<SourceDocument>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let Some(kind) = source_kind(&path) else {
            continue;
        };
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = match kind {
            SourceKind::PlainText => String::from_utf8_lossy(&fs::read(&path)?).into_owned(),
            SourceKind::Pdf => match read_pdf(&path)? {
                Some(text) => text,
                None => continue,
            },
        };
        debug!(file = %filename, chars = text.len(), "loaded corpus file");
        documents.push(SourceDocument { filename, text });
    }

    Ok(Some(documents))
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<Option<String>> {
    pdf_extract::extract_text(path)
        .map(Some)
        .map_err(|err| crate::error::ColloquyError::Retrieval(format!("read pdf {}: {err}", path.display())))
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> Result<Option<String>> {
    tracing::warn!(file = %path.display(), "pdf support disabled; skipping file");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(load_documents(&missing).unwrap(), None);
    }

    #[test]
    fn reads_text_and_markdown_non_recursively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "# Title\n\nBody").unwrap();
        fs::write(dir.path().join("a.TXT"), "plain").unwrap();
        fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "hidden").unwrap();

        let docs = load_documents(dir.path()).unwrap().unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["a.TXT", "b.md"]);
        assert_eq!(docs[0].text, "plain");
    }

    #[test]
    fn non_utf8_text_is_decoded_lossily() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.txt"), "fresh bread").unwrap();
        fs::write(dir.path().join("legacy.txt"), b"caf\xe9 menu\n").unwrap();

        let docs = load_documents(dir.path()).unwrap().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "fresh bread");
        assert_eq!(docs[1].filename, "legacy.txt");
        assert_eq!(docs[1].text, "caf\u{FFFD} menu\n");
    }
}
