//! @ai:module:intent Split Coq source text into alternating code and comment spans
//! @ai:module:layer domain
//! @ai:module:public_api partition, Span, SpanKind, line_of
//! @ai:module:stateless true
//!
//! Comments are `(* ... *)` and nest. String literals (`"..."`, with `""` as an
//! escaped quote) are opaque both in code and inside comments, so a `(*` or `*)`
//! inside a string never opens or closes anything.

/// @ai:intent Whether a span is program text or a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Code,
    Comment,
}

/// @ai:intent A contiguous piece of the source with its byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Span<'_> {
    /// @ai:intent Check if the span is a comment, delimiters included
    /// @ai:effects pure
    pub fn is_comment(&self) -> bool {
        self.kind == SpanKind::Comment
    }
}

/// @ai:intent Partition source text into ordered code/comment spans covering all of it
/// @ai:post spans are contiguous, non-empty and concatenate back to `text`
/// @ai:post an unterminated comment runs to the end of the text
/// @ai:effects pure
pub fn partition(text: &str) -> Vec<Span<'_>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut code_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'"' {
            pos = skip_string(bytes, pos);
        } else if opens_comment(bytes, pos) {
            push_span(&mut spans, text, SpanKind::Code, code_start, pos);
            let end = skip_comment(bytes, pos);
            push_span(&mut spans, text, SpanKind::Comment, pos, end);
            pos = end;
            code_start = end;
        } else {
            pos += 1;
        }
    }

    push_span(&mut spans, text, SpanKind::Code, code_start, bytes.len());
    spans
}

/// @ai:intent Convert a byte offset into a 1-based line number
/// @ai:example ("a\nb", 2) -> 2
/// @ai:effects pure
pub fn line_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

fn push_span<'a>(spans: &mut Vec<Span<'a>>, text: &'a str, kind: SpanKind, start: usize, end: usize) {
    if start < end {
        spans.push(Span {
            kind,
            text: &text[start..end],
            start,
            end,
        });
    }
}

fn opens_comment(bytes: &[u8], pos: usize) -> bool {
    bytes[pos] == b'(' && bytes.get(pos + 1) == Some(&b'*')
}

fn closes_comment(bytes: &[u8], pos: usize) -> bool {
    bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b')')
}

/// Returns the offset just past the closing quote, or the end of input.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let mut pos = open + 1;
    while pos < bytes.len() {
        if bytes[pos] == b'"' {
            if bytes.get(pos + 1) == Some(&b'"') {
                pos += 2;
                continue;
            }
            return pos + 1;
        }
        pos += 1;
    }
    bytes.len()
}

/// Returns the offset just past the matching `*)`, or the end of input.
fn skip_comment(bytes: &[u8], open: usize) -> usize {
    let mut depth = 1;
    let mut pos = open + 2;
    while pos < bytes.len() {
        if bytes[pos] == b'"' {
            pos = skip_string(bytes, pos);
        } else if opens_comment(bytes, pos) {
            depth += 1;
            pos += 2;
        } else if closes_comment(bytes, pos) {
            depth -= 1;
            pos += 2;
            if depth == 0 {
                return pos;
            }
        } else {
            pos += 1;
        }
    }
    bytes.len()
}
