//! @ai:module:intent Data structures for parsed specification sections and their merge rules
//! @ai:module:layer domain
//! @ai:module:public_api Case, LineRange, PositionSpan, SubSection
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// @ai:intent A labeled sub-item of a section, such as one production of a grammar rule
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    pub signature: String,
    pub body: String,
}

impl Case {
    pub fn new(name: impl Into<String>, signature: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            body: body.into(),
        }
    }

    /// @ai:intent Check if this is the unnamed case of an algorithm-only section
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty() && self.signature.is_empty()
    }
}

/// @ai:intent Inclusive range of source lines within one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn single(line: usize) -> Self {
        Self { start: line, end: line }
    }

    /// @ai:intent Widen the range so it includes `line`
    pub fn extend(&mut self, line: usize) {
        self.start = self.start.min(line);
        self.end = self.end.max(line);
    }

    /// @ai:intent Smallest range covering both
    pub fn union(self, other: LineRange) -> LineRange {
        LineRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// @ai:intent Per-file first/last line of everything that contributed to a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSpan {
    files: BTreeMap<PathBuf, LineRange>,
}

impl PositionSpan {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Record that `line` of `file` contributed to the section
    /// @ai:post the range for `file` includes `line`
    /// @ai:effects pure
    pub fn extend(&mut self, file: &Path, line: usize) {
        match self.files.get_mut(file) {
            Some(range) => range.extend(line),
            None => {
                self.files.insert(file.to_path_buf(), LineRange::single(line));
            }
        }
    }

    /// @ai:intent Combine two spans file by file
    /// @ai:post files on both sides get the union of their ranges
    /// @ai:post files on one side keep that side's range
    /// @ai:effects pure
    pub fn merge(&self, other: &PositionSpan) -> Result<PositionSpan> {
        let keys: BTreeSet<&PathBuf> = self.files.keys().chain(other.files.keys()).collect();
        let mut files = BTreeMap::new();

        for file in keys {
            let range = match (self.files.get(file), other.files.get(file)) {
                (Some(a), Some(b)) => a.union(*b),
                (Some(a), None) => *a,
                (None, Some(b)) => *b,
                (None, None) => {
                    return Err(Error::Invariant(format!(
                        "{} is in neither position span being merged",
                        file.display()
                    )))
                }
            };
            files.insert(file.clone(), range);
        }

        Ok(PositionSpan { files })
    }

    pub fn get(&self, file: &Path) -> Option<LineRange> {
        self.files.get(file).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &LineRange)> {
        self.files.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// @ai:intent Human-facing position string
    /// @ai:example ({"/a/b.v": 3..7}) -> "b.v: 3 - 7"
    /// @ai:effects pure
    pub fn render(&self) -> String {
        self.files
            .iter()
            .map(|(file, range)| format!("{}: {} - {}", basename(file), range.start, range.end))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// @ai:intent Position string with a file link per entry, for HTML reports
    /// @ai:effects pure
    pub fn render_html(&self) -> String {
        self.files
            .iter()
            .map(|(file, range)| {
                format!(
                    "<a href='file:///{}'><b>{}</b>: {} - {}</a>",
                    file.display(),
                    basename(file),
                    range.start,
                    range.end
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// @ai:intent One section of the normative document as annotated in the sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    pub title: String,
    pub description: String,
    pub cases: BTreeSet<Case>,
    pub position: PositionSpan,
}

impl SubSection {
    /// @ai:intent Combine two parses of the same split section
    /// @ai:post title is the longer one, `self` wins ties
    /// @ai:post description is longer + "\n" + shorter
    /// @ai:post cases are the set union
    /// @ai:effects pure
    pub fn merge(&self, other: &SubSection) -> Result<SubSection> {
        let title = if char_len(&self.title) >= char_len(&other.title) {
            &self.title
        } else {
            &other.title
        };

        let (longer, shorter) = if char_len(&self.description) >= char_len(&other.description) {
            (&self.description, &other.description)
        } else {
            (&other.description, &self.description)
        };

        Ok(SubSection {
            title: title.clone(),
            description: format!("{}\n{}", longer, shorter),
            cases: self.cases.union(&other.cases).cloned().collect(),
            position: self.position.merge(&other.position)?,
        })
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
