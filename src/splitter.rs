//! @ai:module:intent Cut the extracted line stream into per-section blocks
//! @ai:module:layer application
//! @ai:module:public_api split_blocks, Block
//! @ai:module:depends_on config, extractor
//! @ai:module:stateless true

use crate::config::Patterns;
use crate::extractor::ExtractedLine;

/// @ai:intent Lines between two consecutive title lines, title line included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub identifier: &'a str,
    pub lines: &'a [ExtractedLine],
}

struct OpenBlock<'a> {
    identifier: &'a str,
    start: usize,
    discard: bool,
}

/// @ai:intent Split lines into blocks, keeping only those whose title is in scope
/// @ai:post blocks appear in stream order and never overlap
/// @ai:post lines before the first title line belong to no block
/// @ai:effects pure
pub fn split_blocks<'a>(lines: &'a [ExtractedLine], patterns: &Patterns) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock<'a>> = None;

    for (index, line) in lines.iter().enumerate() {
        if line.is_end_marker() {
            continue;
        }
        let Some(identifier) = patterns.title_identifier(&line.text) else {
            continue;
        };
        tracing::debug!("Title line {} ({})", identifier, line.text);

        if let Some(previous) = open.take() {
            close(&mut blocks, previous, &lines[..index]);
        }

        open = Some(OpenBlock {
            identifier,
            start: index,
            discard: !patterns.in_scope(&line.text),
        });
    }

    if let Some(last) = open {
        close(&mut blocks, last, lines);
    }

    blocks
}

fn close<'a>(blocks: &mut Vec<Block<'a>>, open: OpenBlock<'a>, lines: &'a [ExtractedLine]) {
    if open.discard {
        tracing::debug!("Discarding out-of-scope section {}", open.identifier);
        return;
    }
    blocks.push(Block {
        identifier: open.identifier,
        lines: &lines[open.start..],
    });
}
