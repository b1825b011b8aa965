//! Paragraph-aggregating text chunker.

/// Default maximum chunk size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 800;

const PARAGRAPH_BREAK: &str = "\n\n";

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Paragraphs (separated by a blank line) are packed greedily and joined with
/// a blank line. A boundary is only placed between paragraphs, so a paragraph
/// longer than `max_chars` becomes a chunk of its own instead of being cut.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for paragraph in normalized.split(PARAGRAPH_BREAK) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let paragraph_chars = paragraph.chars().count();

        if current_chars > 0 && current_chars + PARAGRAPH_BREAK.len() + paragraph_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if current_chars > 0 {
            current.push_str(PARAGRAPH_BREAK);
            current_chars += PARAGRAPH_BREAK.len();
        }
        current.push_str(paragraph);
        current_chars += paragraph_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_paragraphs_share_a_chunk() {
        let chunks = split_chunks("alpha\n\nbeta\r\n\r\ngamma", 100);
        assert_eq!(chunks, vec!["alpha\n\nbeta\n\ngamma".to_string()]);
    }

    #[test]
    fn boundary_falls_between_paragraphs() {
        let a = "a".repeat(40);
        let b = "b".repeat(40);
        let c = "c".repeat(15);
        let text = format!("{a}\n\n{b}\n\n{c}");

        let chunks = split_chunks(&text, 60);
        assert_eq!(chunks, vec![a.clone(), format!("{b}\n\n{c}")]);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 60);
        }
    }

    #[test]
    fn oversized_paragraph_is_its_own_chunk() {
        let long = "word ".repeat(50).trim().to_string();
        let text = format!("intro\n\n{long}\n\noutro");

        let chunks = split_chunks(&text, 40);
        assert_eq!(chunks, vec!["intro".to_string(), long, "outro".to_string()]);
    }

    #[test]
    fn paragraphs_are_never_split() {
        let paragraphs: Vec<String> = (0..20).map(|i| format!("paragraph {i}:{}", "x".repeat(i * 7))).collect();
        let text = paragraphs.join("\n\n");

        let chunks = split_chunks(&text, 120);
        let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split("\n\n")).collect();
        assert_eq!(rejoined, paragraphs.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn blank_input_has_no_chunks() {
        assert!(split_chunks("\n\n   \n\n", 800).is_empty());
    }

    #[test]
    fn size_counts_characters_not_bytes() {
        let a = "é".repeat(30);
        let b = "ü".repeat(30);
        let text = format!("{a}\n\n{b}");
        assert_eq!(split_chunks(&text, 62).len(), 1);
        assert_eq!(split_chunks(&text, 61).len(), 2);
    }
}
