//! @ai:module:intent Turn qualifying comments into a flat stream of tagged lines
//! @ai:module:layer application
//! @ai:module:public_api extract_lines, extract_all, ExtractedLine, SourceLine
//! @ai:module:depends_on config, partition, sources
//! @ai:module:stateless true

use crate::config::Patterns;
use crate::partition::{line_of, partition};
use crate::sources::SourceFile;
use std::path::{Path, PathBuf};

/// @ai:intent Where an extracted line came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub file: PathBuf,
    /// 1-based line of the start of the enclosing comment.
    pub line_number: usize,
    pub is_end_marker: bool,
}

/// @ai:intent One stripped comment line, or an end-of-comment sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLine {
    pub text: String,
    pub source: SourceLine,
}

impl ExtractedLine {
    pub fn content(text: impl Into<String>, file: impl Into<PathBuf>, line_number: usize) -> Self {
        Self {
            text: text.into(),
            source: SourceLine {
                file: file.into(),
                line_number,
                is_end_marker: false,
            },
        }
    }

    /// @ai:intent Sentinel placed after each qualifying comment
    pub fn end_marker(file: impl Into<PathBuf>) -> Self {
        Self {
            text: String::new(),
            source: SourceLine {
                file: file.into(),
                line_number: 0,
                is_end_marker: true,
            },
        }
    }

    pub fn is_end_marker(&self) -> bool {
        self.source.is_end_marker
    }
}

/// @ai:intent Extract the tagged lines of one file
/// @ai:post every qualifying comment with content is followed by exactly one sentinel
/// @ai:post no sentinel precedes the first content line
/// @ai:effects pure
pub fn extract_lines(file: &Path, text: &str, patterns: &Patterns) -> Vec<ExtractedLine> {
    let mut lines = Vec::new();
    let mut has_content = false;

    for span in partition(text).into_iter().filter(|s| s.is_comment()) {
        if !patterns.delimiter.is_match(span.text) {
            continue;
        }

        let line_number = line_of(text, span.start);
        for raw in span.text.lines() {
            let stripped = patterns.strip(raw);
            if !stripped.is_empty() {
                lines.push(ExtractedLine::content(stripped, file, line_number));
                has_content = true;
            }
        }

        if has_content {
            lines.push(ExtractedLine::end_marker(file));
        }
    }

    lines
}

/// @ai:intent Extract and concatenate the tagged lines of all files in order
/// @ai:effects pure
pub fn extract_all(files: &[SourceFile], patterns: &Patterns) -> Vec<ExtractedLine> {
    files
        .iter()
        .flat_map(|f| extract_lines(&f.path, &f.text, patterns))
        .collect()
}
