//! Corpus file loading.
use crate::config::InputFormat;
use crate::error::CorpusError;
use std::io::ErrorKind;
use std::path::Path;

/// Read `path` as UTF-8 and extract the text to tokenize.
///
/// A missing file is reported as [`CorpusError::Missing`] so the batch runner
/// can skip it; invalid UTF-8 is [`CorpusError::Decode`].
pub fn read_corpus(path: &Path, format: InputFormat) -> Result<String, CorpusError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CorpusError::Missing(path.to_path_buf()),
        _ => CorpusError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|source| CorpusError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match format {
        InputFormat::Raw => text,
        InputFormat::Sentences => extract_sentences(&text).join("\n"),
    })
}

/// Sentence column of a `line-number \t sentence` file.
///
/// Lines are trimmed and blank ones skipped. A line without a tab is taken
/// whole; only the first tab separates the columns.
pub fn extract_sentences(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('\t') {
            Some((_, sentence)) => sentence,
            None => line,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(tag: &str, contents: &[u8]) -> PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("libngram_corpus_{}_{}.txt", tag, stamp));
        std::fs::write(&path, contents).expect("write temp corpus");
        path
    }

    #[test]
    fn extracts_sentence_column() {
        let text = "1\tLe chat dort.\n2\tIl pleut\taujourd'hui.\n\n   \nsans numéro\n3\t\n";
        assert_eq!(
            extract_sentences(text),
            vec!["Le chat dort.", "Il pleut\taujourd'hui.", "sans numéro", "3"]
        );
    }

    #[test]
    fn trailing_tab_is_trimmed_before_splitting() {
        // "3\t" trims to "3", which has no tab and is kept whole.
        assert_eq!(extract_sentences("3\t\n"), vec!["3"]);
    }

    #[test]
    fn handles_crlf_lines() {
        assert_eq!(extract_sentences("1\tone\r\n2\ttwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn reads_raw_file_verbatim() {
        let path = temp_file("raw", "azul\t{{x}}\n<b>ok</b>".as_bytes());
        let text = read_corpus(&path, InputFormat::Raw).expect("read");
        assert_eq!(text, "azul\t{{x}}\n<b>ok</b>");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reads_sentence_file() {
        let path = temp_file("sent", "1\tمرحبا بكم\n2\tأهلا\n".as_bytes());
        let text = read_corpus(&path, InputFormat::Sentences).expect("read");
        assert_eq!(text, "مرحبا بكم\nأهلا");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let path = std::env::temp_dir().join("libngram_definitely_absent_corpus.txt");
        let err = read_corpus(&path, InputFormat::Raw).unwrap_err();
        assert!(matches!(err, CorpusError::Missing(p) if p == path));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let path = temp_file("bad", &[b'o', b'k', 0xFF, 0xFE, b'\n']);
        let err = read_corpus(&path, InputFormat::Raw).unwrap_err();
        assert!(matches!(err, CorpusError::Decode { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
