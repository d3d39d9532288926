//! @ai:module:intent Parse one block of extracted lines into a SubSection
//! @ai:module:layer application
//! @ai:module:public_api parse_block, classify, transition, ParserState, LineKind, Action
//! @ai:module:depends_on config, extractor, section
//! @ai:module:stateless true
//!
//! The parser is a three-state machine, `Title -> Description -> Cases`. Pattern
//! matching happens once per line in [`classify`]; [`transition`] is a pure function
//! of the state and the classified line, so the machine can be tested on its own.

use crate::config::Patterns;
use crate::extractor::ExtractedLine;
use crate::section::{Case, PositionSpan, SubSection};
use std::collections::BTreeSet;

/// @ai:intent Which part of a section the parser is currently reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    Title,
    Description,
    Cases,
}

/// @ai:intent What a single extracted line is, as far as the state machine cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    EndMarker,
    CaseHeader { name: &'a str, signature: &'a str },
    AlgorithmStep,
    Text,
}

/// @ai:intent Side effect a transition has on the accumulators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    Nothing,
    AppendTitle,
    AppendDescription,
    StartCase { name: &'a str, signature: &'a str },
    /// The line opens the body of the section's single unnamed case.
    StartAnonymousCase,
    AppendCase,
}

/// @ai:intent Classify a line; case headers take precedence over algorithm steps
/// @ai:effects pure
pub fn classify<'a>(line: &'a ExtractedLine, patterns: &Patterns) -> LineKind<'a> {
    if line.is_end_marker() {
        return LineKind::EndMarker;
    }
    if let Some((name, signature)) = patterns.case_header(&line.text) {
        return LineKind::CaseHeader { name, signature };
    }
    if patterns.is_algorithm_step(&line.text) {
        return LineKind::AlgorithmStep;
    }
    LineKind::Text
}

/// @ai:intent Compute the next state and the accumulator effect for one line
/// @ai:post Cases is never left once entered
/// @ai:effects pure
pub fn transition<'a>(state: ParserState, kind: &LineKind<'a>) -> (ParserState, Action<'a>) {
    use ParserState::*;

    match (state, kind) {
        (Title, LineKind::EndMarker) => (Description, Action::Nothing),
        (_, LineKind::EndMarker) => (state, Action::Nothing),
        (_, LineKind::CaseHeader { name, signature }) => (
            Cases,
            Action::StartCase {
                name: *name,
                signature: *signature,
            },
        ),
        (Title | Description, LineKind::AlgorithmStep) => (Cases, Action::StartAnonymousCase),
        (Title, LineKind::Text) => (Description, Action::AppendTitle),
        (Description, LineKind::Text) => (Description, Action::AppendDescription),
        (Cases, LineKind::AlgorithmStep | LineKind::Text) => (Cases, Action::AppendCase),
    }
}

#[derive(Debug, Default)]
struct SubSectionBuilder {
    title: String,
    description: String,
    cases: BTreeSet<Case>,
    pending: Option<Case>,
    position: PositionSpan,
}

impl SubSectionBuilder {
    fn apply(&mut self, action: Action<'_>, text: &str) {
        match action {
            Action::Nothing => {}
            Action::AppendTitle => self.title.push_str(text),
            Action::AppendDescription => {
                self.description.push_str(text);
                self.description.push(' ');
            }
            Action::StartCase { name, signature } => {
                self.push_pending();
                self.pending = Some(Case::new(name, signature, ""));
            }
            Action::StartAnonymousCase => {
                self.push_pending();
                self.pending = Some(Case::new("", "", format!("{}\n", text)));
            }
            Action::AppendCase => {
                let case = self.pending.get_or_insert_with(|| Case::new("", "", ""));
                case.body.push_str(text);
                case.body.push('\n');
            }
        }
    }

    fn push_pending(&mut self) {
        if let Some(case) = self.pending.take() {
            self.cases.insert(case);
        }
    }

    fn finish(mut self) -> SubSection {
        self.push_pending();
        SubSection {
            title: self.title,
            description: self.description,
            cases: self.cases,
            position: self.position,
        }
    }
}

/// @ai:intent Parse one block, sentinels included, into a SubSection
/// @ai:post the title comes only from lines read before the first sentinel
/// @ai:post position covers every non-sentinel line of the block
/// @ai:effects pure
pub fn parse_block(lines: &[ExtractedLine], patterns: &Patterns) -> SubSection {
    let mut state = ParserState::default();
    let mut builder = SubSectionBuilder::default();

    for line in lines {
        if !line.is_end_marker() {
            builder
                .position
                .extend(&line.source.file, line.source.line_number);
        }

        let kind = classify(line, patterns);
        let (next, action) = transition(state, &kind);
        builder.apply(action, &line.text);
        state = next;
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::LineRange;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn line(text: &str, n: usize) -> ExtractedLine {
        ExtractedLine::content(text, "f.v", n)
    }

    fn end() -> ExtractedLine {
        ExtractedLine::end_marker("f.v")
    }

    #[test]
    fn test_transition_table() {
        use ParserState::*;
        assert_eq!(transition(Title, &LineKind::EndMarker), (Description, Action::Nothing));
        assert_eq!(transition(Cases, &LineKind::EndMarker), (Cases, Action::Nothing));
        assert_eq!(transition(Title, &LineKind::Text), (Description, Action::AppendTitle));
        assert_eq!(
            transition(Description, &LineKind::AlgorithmStep),
            (Cases, Action::StartAnonymousCase)
        );
        assert_eq!(transition(Cases, &LineKind::AlgorithmStep), (Cases, Action::AppendCase));
        assert_eq!(
            transition(Cases, &LineKind::CaseHeader { name: "A", signature: " b" }),
            (Cases, Action::StartCase { name: "A", signature: " b" })
        );
    }

    #[test]
    fn test_title_description_and_case() {
        let lines = vec![
            line("22.2.1 Patterns", 1),
            line("The RegExp constructor applies the grammar.", 1),
            end(),
            line("Pattern :: Disjunction", 5),
            line("1. Let m be CompileSubpattern.", 5),
            line("2. Return m.", 5),
            end(),
        ];
        let section = parse_block(&lines, &Patterns::default());

        assert_eq!(section.title, "22.2.1 Patterns");
        assert_eq!(section.description, "The RegExp constructor applies the grammar. ");
        assert_eq!(
            section.cases.into_iter().collect::<Vec<_>>(),
            vec![Case::new(
                "Pattern",
                " Disjunction",
                "1. Let m be CompileSubpattern.\n2. Return m.\n"
            )]
        );
    }

    #[test]
    fn test_algorithm_step_opens_anonymous_case() {
        let lines = vec![line("a. Do X", 3), line("b. Do Y", 3), end()];
        let section = parse_block(&lines, &Patterns::default());

        assert_eq!(section.title, "");
        let cases: Vec<_> = section.cases.into_iter().collect();
        assert_eq!(cases.len(), 1);
        assert!(cases[0].is_anonymous());
        assert!(cases[0].body.starts_with("a. Do X\n"));
        assert_eq!(cases[0].body, "a. Do X\nb. Do Y\n");
    }

    #[test]
    fn test_sentinel_closes_title() {
        let lines = vec![
            line("22.2.2 Pattern Semantics", 1),
            end(),
            line("A pattern is evaluated", 4),
            line("by compiling it.", 4),
            end(),
        ];
        let section = parse_block(&lines, &Patterns::default());

        assert_eq!(section.title, "22.2.2 Pattern Semantics");
        assert_eq!(section.description, "A pattern is evaluated by compiling it. ");
    }

    #[test]
    fn test_sentinel_before_any_text_moves_to_description() {
        let lines = vec![end(), line("Only description", 2)];
        let section = parse_block(&lines, &Patterns::default());
        assert_eq!(section.title, "");
        assert_eq!(section.description, "Only description ");
    }

    #[test]
    fn test_case_headers_split_cases() {
        let lines = vec![
            line("22.2.2.3 Alternative", 1),
            line("Alternative :: [empty]", 2),
            line("1. Return EmptyMatcher.", 2),
            line("Alternative :: Alternative Term", 3),
            line("1. Let m1 be ...", 3),
        ];
        let section = parse_block(&lines, &Patterns::default());
        let names: Vec<_> = section.cases.iter().map(|c| c.signature.as_str()).collect();
        assert_eq!(names, vec![" Alternative Term", " [empty]"]);
    }

    #[test]
    fn test_trailing_header_without_body_is_kept() {
        let lines = vec![line("22.2.2.4 Term", 1), line("Term :: Assertion", 2)];
        let section = parse_block(&lines, &Patterns::default());
        assert_eq!(
            section.cases.into_iter().collect::<Vec<_>>(),
            vec![Case::new("Term", " Assertion", "")]
        );
    }

    #[test]
    fn test_position_spans_files() {
        let lines = vec![
            line("22.2.1 Patterns", 10),
            end(),
            line("more", 14),
            ExtractedLine::content("elsewhere", "g.v", 2),
            ExtractedLine::end_marker("g.v"),
        ];
        let section = parse_block(&lines, &Patterns::default());

        assert_eq!(
            section.position.get(Path::new("f.v")),
            Some(LineRange { start: 10, end: 14 })
        );
        assert_eq!(
            section.position.get(Path::new("g.v")),
            Some(LineRange { start: 2, end: 2 })
        );
        assert_eq!(section.position.len(), 2);
    }
}
