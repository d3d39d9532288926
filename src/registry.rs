//! @ai:module:intent Build and query the registry of sections keyed by section number
//! @ai:module:layer application
//! @ai:module:public_api SectionRegistry, BuildStats
//! @ai:module:depends_on config, sources, extractor, splitter, parser, section, error
//! @ai:module:stateless false

use crate::config::{ExtractConfig, Patterns};
use crate::error::{Error, Result};
use crate::extractor::{extract_all, ExtractedLine};
use crate::parser::parse_block;
use crate::section::SubSection;
use crate::sources::{read_sources, SourceFile};
use crate::splitter::split_blocks;
use std::collections::BTreeMap;

/// @ai:intent Counters describing one build pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub files: usize,
    pub lines: usize,
    pub blocks: usize,
    pub merges: usize,
}

/// @ai:intent Complete mapping from section identifier to its parsed SubSection
/// @ai:invariant each identifier appears once; split sections are already merged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: BTreeMap<String, SubSection>,
    stats: BuildStats,
}

impl SectionRegistry {
    /// @ai:intent Read every configured source and build the registry
    /// @ai:effects fs:read
    pub fn build(config: &ExtractConfig) -> Result<Self> {
        let patterns = Patterns::compile(&config.patterns)?;
        let files = read_sources(config)?;
        Self::from_sources(&files, &patterns)
    }

    /// @ai:intent Build the registry from files already in memory
    /// @ai:effects pure
    pub fn from_sources(files: &[SourceFile], patterns: &Patterns) -> Result<Self> {
        let lines = extract_all(files, patterns);
        let mut registry = Self::from_lines(&lines, patterns)?;
        registry.stats.files = files.len();
        tracing::info!(
            "Built {} sections from {} files ({} lines, {} merges)",
            registry.len(),
            registry.stats.files,
            registry.stats.lines,
            registry.stats.merges
        );
        Ok(registry)
    }

    /// @ai:intent Build the registry from an already extracted line stream
    /// @ai:post a repeated identifier is merged into its earlier entry
    /// @ai:effects pure
    pub fn from_lines(lines: &[ExtractedLine], patterns: &Patterns) -> Result<Self> {
        let mut registry = Self::default();
        registry.stats.lines = lines.iter().filter(|l| !l.is_end_marker()).count();

        for block in split_blocks(lines, patterns) {
            let parsed = parse_block(block.lines, patterns);
            registry.stats.blocks += 1;
            registry.insert(block.identifier, parsed)?;
        }

        Ok(registry)
    }

    fn insert(&mut self, identifier: &str, parsed: SubSection) -> Result<()> {
        let merged = match self.sections.get(identifier) {
            Some(existing) => {
                tracing::warn!(
                    "Section {} is split; merging {} with {}",
                    identifier,
                    parsed.position.render(),
                    existing.position.render()
                );
                self.stats.merges += 1;
                parsed.merge(existing)?
            }
            None => parsed,
        };
        self.sections.insert(identifier.to_string(), merged);
        Ok(())
    }

    /// @ai:intent Fetch a section; an unknown identifier is an error, never an empty value
    /// @ai:effects pure
    pub fn lookup(&self, identifier: &str) -> Result<&SubSection> {
        self.sections
            .get(identifier)
            .ok_or_else(|| Error::SectionNotFound(identifier.to_string()))
    }

    pub fn get(&self, identifier: &str) -> Option<&SubSection> {
        self.sections.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.sections.contains_key(identifier)
    }

    /// @ai:intent Iterate sections ordered by identifier
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubSection)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{Case, LineRange};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const SEMANTICS: &str = r#"Require Import List.

(*>> 22.2.2 Pattern Semantics <<*)
(*>> A regular expression pattern is converted
     into an Abstract Closure. <<*)
Definition matcher := tt.

(*>> 22.2.2.3 Alternative <<*)
(*>> Alternative :: [empty] <<*)
(*>> 1. Return EmptyMatcher(). <<*)
Definition alt := tt.

(*>> 21.2 Number Objects <<*)
(*>> ignored text <<*)

(* an ordinary comment *)
(*>> 22.2.2.3 Alternative <<*)
(*>> Alternative :: Alternative Term <<*)
(*>> 1. Let m1 be CompileSubpattern. <<*)
"#;

    const COMPILE: &str = r#"(*>> 22.2.2.3 Alternative (continued) <<*)
(*>> Alternative :: [empty] <<*)
(*>> 1. Return EmptyMatcher(). <<*)

(*>> 22.2.2.4 Term <<*)
(*>> a. Let x be the matcher. <<*)
(*>> b. Return x. <<*)
"#;

    fn files() -> Vec<SourceFile> {
        vec![
            SourceFile::new("/theories/Semantics.v", SEMANTICS),
            SourceFile::new("/theories/Compile.v", COMPILE),
        ]
    }

    #[test]
    fn test_build_from_sources() {
        let registry = SectionRegistry::from_sources(&files(), &Patterns::default()).unwrap();

        let ids: Vec<_> = registry.identifiers().collect();
        assert_eq!(ids, vec!["22.2.2", "22.2.2.3", "22.2.2.4"]);

        let semantics = registry.lookup("22.2.2").unwrap();
        assert_eq!(semantics.title, "22.2.2 Pattern Semantics");
        assert_eq!(
            semantics.description,
            "A regular expression pattern is converted into an Abstract Closure. "
        );
        assert!(semantics.cases.is_empty());
        assert_eq!(semantics.position.render(), "Semantics.v: 3 - 4");
    }

    #[test]
    fn test_split_section_merged_across_files() {
        let registry = SectionRegistry::from_sources(&files(), &Patterns::default()).unwrap();
        let alternative = registry.lookup("22.2.2.3").unwrap();

        assert_eq!(alternative.title, "22.2.2.3 Alternative (continued)");
        assert_eq!(
            alternative.cases.iter().cloned().collect::<Vec<_>>(),
            vec![
                Case::new("Alternative", " Alternative Term", "1. Let m1 be CompileSubpattern.\n"),
                Case::new("Alternative", " [empty]", "1. Return EmptyMatcher().\n"),
            ]
        );
        assert_eq!(
            alternative.position.get(Path::new("/theories/Semantics.v")),
            Some(LineRange { start: 8, end: 19 })
        );
        assert_eq!(
            alternative.position.get(Path::new("/theories/Compile.v")),
            Some(LineRange { start: 1, end: 3 })
        );
        assert_eq!(registry.stats().merges, 2);
        assert_eq!(registry.stats().blocks, 5);
    }

    #[test]
    fn test_discarded_section_does_not_leak() {
        let registry = SectionRegistry::from_sources(&files(), &Patterns::default()).unwrap();
        assert!(!registry.contains("21.2"));
        let alternative = registry.lookup("22.2.2.3").unwrap();
        assert!(!alternative.description.contains("ignored"));
        assert!(alternative.cases.iter().all(|c| !c.body.contains("ignored")));
    }

    #[test]
    fn test_algorithm_only_section() {
        let registry = SectionRegistry::from_sources(&files(), &Patterns::default()).unwrap();
        let term = registry.lookup("22.2.2.4").unwrap();
        let cases: Vec<_> = term.cases.iter().collect();
        assert_eq!(cases.len(), 1);
        assert!(cases[0].is_anonymous());
        assert_eq!(cases[0].body, "a. Let x be the matcher.\nb. Return x.\n");
    }

    #[test]
    fn test_lookup_unknown_section_fails() {
        let registry = SectionRegistry::from_sources(&files(), &Patterns::default()).unwrap();
        let err = registry.lookup("22.2.9").unwrap_err();
        assert!(err.is_not_found());
        assert!(registry.get("22.2.9").is_none());
    }

    #[test]
    fn test_empty_section_is_found() {
        let files = vec![SourceFile::new("a.v", "(*>> 22.2.5 <<*)")];
        let registry = SectionRegistry::from_sources(&files, &Patterns::default()).unwrap();
        let section = registry.lookup("22.2.5").unwrap();
        assert_eq!(section.description, "");
        assert!(section.cases.is_empty());
    }

    #[test]
    fn test_build_reads_configured_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Compile.v"), COMPILE).unwrap();
        fs::create_dir(dir.path().join("old")).unwrap();
        fs::write(dir.path().join("old/Semantics.v"), SEMANTICS).unwrap();

        let config = ExtractConfig {
            sources: vec![dir.path().to_path_buf()],
            exclude: vec![dir.path().join("old")],
            ..Default::default()
        };
        let registry = SectionRegistry::build(&config).unwrap();

        let ids: Vec<_> = registry.identifiers().collect();
        assert_eq!(ids, vec!["22.2.2.3", "22.2.2.4"]);
        assert_eq!(registry.stats().files, 1);
        assert_eq!(
            registry.lookup("22.2.2.4").unwrap().position.render(),
            "Compile.v: 5 - 7"
        );
        assert_eq!(registry.lookup("22.2.2.3").unwrap().position.len(), 1);
    }

    #[test]
    fn test_build_fails_on_bad_pattern() {
        let mut config = ExtractConfig::default();
        config.patterns.title = "([".to_string();
        assert!(matches!(
            SectionRegistry::build(&config),
            Err(Error::InvalidPattern { name: "title", .. })
        ));
    }
}
