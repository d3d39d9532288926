//! @ai:module:intent Configuration for sources and the five annotation patterns
//! @ai:module:layer infrastructure
//! @ai:module:public_api ExtractConfig, PatternConfig, Patterns
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Top-level configuration for one registry build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractConfig {
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub patterns: PatternConfig,
}

/// @ai:intent Raw pattern strings, each independently overridable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternConfig {
    /// Searched anywhere in a title line; sections it misses are discarded.
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_case")]
    pub case_header: String,
    #[serde(default = "default_algorithm_step")]
    pub algorithm_step: String,
    #[serde(default = "default_title")]
    pub title: String,
    /// Literal tokens removed from each comment line before trimming.
    #[serde(default = "default_strip_tokens")]
    pub strip_tokens: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            exclude: Vec::new(),
            extensions: default_extensions(),
            patterns: PatternConfig::default(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            delimiter: default_delimiter(),
            case_header: default_case(),
            algorithm_step: default_algorithm_step(),
            title: default_title(),
            strip_tokens: default_strip_tokens(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["v".to_string()]
}

fn default_scope() -> String {
    r"(22\.2(?:\.[0-9]{0,2}){1,3})".to_string()
}

fn default_delimiter() -> String {
    r"^\(\*(\* )?>?>(.|\n)*?<<\*\)$".to_string()
}

fn default_case() -> String {
    r"([a-zA-Z0-9\[\]]+) ::((?:.|\n)*)".to_string()
}

fn default_algorithm_step() -> String {
    r"([0-9a-z]|i{2,})\. .*".to_string()
}

fn default_title() -> String {
    r"^[ -]*?((?:[0-9]+\.)+[0-9]+)(?: .*?|)$".to_string()
}

fn default_strip_tokens() -> Vec<String> {
    ["(** >>", "(*>>", "<<*)"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl ExtractConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// @ai:intent Compiled, immutable form of a PatternConfig passed to the build pass
#[derive(Debug, Clone)]
pub struct Patterns {
    pub scope: Regex,
    pub delimiter: Regex,
    pub case_header: Regex,
    pub algorithm_step: Regex,
    pub title: Regex,
    pub strip_tokens: Vec<String>,
}

impl Patterns {
    /// @ai:intent Compile every pattern, failing on the first malformed one
    /// @ai:post all patterns except scope only match at the start of their input
    /// @ai:effects pure
    pub fn compile(config: &PatternConfig) -> Result<Self> {
        if config.strip_tokens.iter().any(|t| t.is_empty()) {
            return Err(Error::Config("strip tokens must not be empty".to_string()));
        }

        Ok(Self {
            scope: compile_search("scope", &config.scope)?,
            delimiter: compile_anchored("delimiter", &config.delimiter)?,
            case_header: compile_anchored("case header", &config.case_header)?,
            algorithm_step: compile_anchored("algorithm step", &config.algorithm_step)?,
            title: compile_anchored("title", &config.title)?,
            strip_tokens: config.strip_tokens.clone(),
        })
    }

    /// @ai:intent Extract the section identifier of a title line, if it is one
    /// @ai:example ("22.2.2.1 Notation") -> Some("22.2.2.1")
    /// @ai:effects pure
    pub fn title_identifier<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.title.captures(line)?;
        let identifier = captures.get(1).or_else(|| captures.get(0))?;
        Some(identifier.as_str())
    }

    /// @ai:intent Check whether a title line is inside the target scope
    /// @ai:effects pure
    pub fn in_scope(&self, line: &str) -> bool {
        self.scope.is_match(line)
    }

    /// @ai:intent Split a case header into its name and signature
    /// @ai:effects pure
    pub fn case_header<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let captures = self.case_header.captures(line)?;
        let name = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        let signature = captures.get(2).map(|m| m.as_str()).unwrap_or("");
        Some((name, signature))
    }

    /// @ai:intent Check whether a line opens an implicit single-case algorithm
    /// @ai:effects pure
    pub fn is_algorithm_step(&self, line: &str) -> bool {
        self.algorithm_step.is_match(line)
    }

    /// @ai:intent Remove the delimiter tokens from one comment line and trim it
    /// @ai:effects pure
    pub fn strip(&self, line: &str) -> String {
        let mut stripped = line.replace('\n', "");
        for token in &self.strip_tokens {
            stripped = stripped.replace(token.as_str(), "");
        }
        stripped.trim().to_string()
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::compile(&PatternConfig::default()).expect("default patterns must compile")
    }
}

fn compile_anchored(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{})", pattern)).map_err(|source| Error::InvalidPattern { name, source })
}

fn compile_search(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern { name, source })
}
