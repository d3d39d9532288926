//! @ai:module:intent Extract specification annotations from Coq sources into a section registry
//! @ai:module:layer infrastructure
//! @ai:module:public_api config, error, extractor, output, parser, partition, registry, section, sources, splitter
//!
//! # coqspec
//!
//! Coq developments that mechanize a normative document often quote it in
//! special comments such as `(*>> 22.2.2.1 Notation <<*)`. This library pulls
//! those comments out of a set of `.v` files, groups them by section number and
//! parses each section into a title, a description and a set of cases, so the
//! result can be compared against the document itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use coqspec::{output, ExtractConfig, SectionRegistry};
//! use std::path::PathBuf;
//!
//! let config = ExtractConfig {
//!     sources: vec![PathBuf::from("theories")],
//!     ..Default::default()
//! };
//! let registry = SectionRegistry::build(&config).unwrap();
//! let section = registry.lookup("22.2.2.1").unwrap();
//! println!("{}", output::format_section("22.2.2.1", section, output::OutputFormat::Text));
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod output;
pub mod parser;
pub mod partition;
pub mod registry;
pub mod section;
pub mod sources;
pub mod splitter;

pub use config::{ExtractConfig, PatternConfig, Patterns};
pub use error::{Error, Result};
pub use extractor::{extract_all, extract_lines, ExtractedLine, SourceLine};
pub use output::{format_registry, format_section, to_json, OutputFormat};
pub use parser::{parse_block, ParserState};
pub use partition::{partition, Span, SpanKind};
pub use registry::{BuildStats, SectionRegistry};
pub use section::{Case, LineRange, PositionSpan, SubSection};
pub use sources::{enumerate_sources, read_sources, SourceFile};
pub use splitter::{split_blocks, Block};
