use std::fs;

use tempfile::TempDir;

use colloquy::retrieval::{cosine_similarity, embed, split_chunks, DocumentIndex, IndexOptions};

fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pets.txt"), "The cat sat on the mat.").unwrap();
    fs::write(
        dir.path().join("handbook.md"),
        "# Vacation policy\n\nEmployees get twenty vacation days per year.\n\n\
         # Expenses\n\nSubmit expense reports within thirty days.",
    )
    .unwrap();
    fs::write(dir.path().join("NOTES.MD"), "Quarterly planning happens in March.").unwrap();
    fs::write(dir.path().join("data.csv"), "cat,mat,cat,mat").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/hidden.txt"), "cat mat cat mat").unwrap();
    dir
}

#[test]
fn indexes_supported_files_non_recursively() {
    let dir = corpus();
    let index = DocumentIndex::build(dir.path(), IndexOptions::default()).unwrap();

    let mut files: Vec<_> = index.documents().iter().map(|d| d.filename.as_str()).collect();
    files.dedup();
    assert_eq!(files, vec!["NOTES.MD", "handbook.md", "pets.txt"]);
}

#[test]
fn cat_mat_query_finds_the_pet_document() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pets.txt"), "The cat sat on the mat.").unwrap();
    let index = DocumentIndex::build(dir.path(), IndexOptions::default()).unwrap();

    let hits = index.search("cat mat", 5);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document.filename, "pets.txt");
    assert!(hits[0].similarity > 0.0);
}

#[test]
fn search_is_sorted_and_bounded() {
    let dir = corpus();
    let index = DocumentIndex::build(dir.path(), IndexOptions::default()).unwrap();

    let hits = index.search("vacation days per year", 2);
    assert_eq!(hits.len(), 2);
    assert!(hits[0].similarity >= hits[1].similarity);
    assert!(hits[0].document.text.contains("twenty vacation days"));

    let all = index.search("anything", 100);
    assert_eq!(all.len(), index.len());
    assert!(all.windows(2).all(|w| w[0].similarity >= w[1].similarity));
}

#[test]
fn small_chunk_size_splits_only_at_paragraphs() {
    let dir = corpus();
    let options = IndexOptions::builder().chunk_size(40).build();
    let index = DocumentIndex::build(dir.path(), options).unwrap();

    let handbook: Vec<_> = index
        .documents()
        .iter()
        .filter(|d| d.filename == "handbook.md")
        .map(|d| d.text.as_str())
        .collect();
    assert!(handbook.contains(&"Employees get twenty vacation days per year."));
    assert!(handbook.contains(&"Submit expense reports within thirty days."));
}

#[test]
fn missing_directory_gives_empty_index() {
    let dir = TempDir::new().unwrap();
    let index = DocumentIndex::build(dir.path().join("absent"), IndexOptions::default()).unwrap();
    assert!(index.is_empty());
    assert!(index.search("cat", 3).is_empty());
}

#[test]
fn embeddings_are_deterministic_and_normalized() {
    let a = embed("Hello hello world", 512);
    let b = embed("Hello hello world", 512);
    assert_eq!(a, b);

    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
    assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);

    let zero = embed("   ", 512);
    assert!(zero.iter().all(|x| *x == 0.0));
    assert_eq!(cosine_similarity(&a, &zero), 0.0);
}

#[test]
fn chunker_keeps_oversized_paragraph_whole() {
    let long = "word ".repeat(50);
    let text = format!("short one\n\n{}\n\nshort two", long.trim());
    let chunks = split_chunks(&text, 30);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1], long.trim());
}

#[test]
fn latin1_text_file_is_indexed_alongside_utf8() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.txt"), "The cat sat on the mat.").unwrap();
    fs::write(dir.path().join("legacy.txt"), b"caf\xe9 menu\n").unwrap();

    let index = DocumentIndex::build(dir.path(), IndexOptions::default()).unwrap();
    let files: Vec<_> = index.documents().iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(files, vec!["good.txt", "legacy.txt"]);
    assert!(index.documents()[1].text.contains("menu"));
}

#[cfg(feature = "pdf")]
mod pdf {
    use super::*;
    use colloquy::error::ColloquyError;

    /// A one-page PDF showing `text` in Helvetica, with a correct xref table.
    fn single_page_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    #[test]
    fn pdf_text_is_extracted_and_chunked() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("report.pdf"), single_page_pdf("Quarterly cat report")).unwrap();
        fs::write(dir.path().join("notes.txt"), "Flights to Lisbon leave every morning.").unwrap();

        let index = DocumentIndex::build(dir.path(), IndexOptions::default()).unwrap();
        let report: Vec<_> = index
            .documents()
            .iter()
            .filter(|d| d.filename == "report.pdf")
            .collect();
        assert_eq!(report.len(), 1);
        let squashed: String = report[0].text.split_whitespace().collect();
        assert!(squashed.contains("Quarterlycatreport"), "got {:?}", report[0].text);

        let hits = index.search("quarterly cat report", 1);
        assert_eq!(hits[0].document.filename, "report.pdf");
    }

    #[test]
    fn malformed_pdf_is_a_retrieval_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4\nthis is not a pdf body").unwrap();
        fs::write(dir.path().join("good.txt"), "The cat sat on the mat.").unwrap();

        let err = DocumentIndex::build(dir.path(), IndexOptions::default()).unwrap_err();
        assert!(matches!(err, ColloquyError::Retrieval(_)), "got {err:?}");
        assert!(err.to_string().contains("broken.pdf"));
    }
}
