//! @ai:module:intent Format registry sections for different outputs (text, JSON, HTML)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_section, format_registry, to_json
//! @ai:module:depends_on registry, section
//! @ai:module:stateless true

use crate::registry::SectionRegistry;
use crate::section::{Case, PositionSpan, SubSection};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
    Html,
}

/// @ai:intent Serializable view of one section with its rendered position
#[derive(Debug, Serialize)]
struct SectionView<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    cases: &'a BTreeSet<Case>,
    position: String,
    files: &'a PositionSpan,
}

impl<'a> SectionView<'a> {
    fn new(id: &'a str, section: &'a SubSection) -> Self {
        Self {
            id,
            title: &section.title,
            description: &section.description,
            cases: &section.cases,
            position: section.position.render(),
            files: &section.position,
        }
    }
}

/// @ai:intent Format a single section
/// @ai:effects pure
pub fn format_section(id: &str, section: &SubSection, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&SectionView::new(id, section), false),
        OutputFormat::JsonPretty => to_json(&SectionView::new(id, section), true),
        OutputFormat::Text => format_section_text(id, section),
        OutputFormat::Html => format_section_html(id, section),
    }
}

/// @ai:intent Format every section of the registry in identifier order
/// @ai:effects pure
pub fn format_registry(registry: &SectionRegistry, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let views: Vec<_> = registry
                .iter()
                .map(|(id, section)| SectionView::new(id, section))
                .collect();
            to_json(&views, format == OutputFormat::JsonPretty)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for (id, section) in registry.iter() {
                output.push_str(&format_section_text(id, section));
                output.push('\n');
            }
            let stats = registry.stats();
            output.push_str(&format!(
                "{} sections from {} files ({} merged)\n",
                registry.len().to_string().bold(),
                stats.files,
                stats.merges
            ));
            output
        }
        OutputFormat::Html => {
            let mut output = String::from("<html>\n<body>\n");
            for (id, section) in registry.iter() {
                output.push_str(&format_section_html(id, section));
            }
            output.push_str("</body>\n</html>\n");
            output
        }
    }
}

fn format_section_text(id: &str, section: &SubSection) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} {}\n", id.cyan().bold(), section.title));
    if !section.position.is_empty() {
        output.push_str(&format!("  {}\n", section.position.render().dimmed()));
    }

    let description = section.description.trim();
    if !description.is_empty() {
        output.push_str(&format!("  {}\n", description));
    }

    for case in &section.cases {
        if case.is_anonymous() {
            output.push_str(&format!("  {}\n", "algorithm".yellow()));
        } else {
            output.push_str(&format!("  {} ::{}\n", case.name.yellow(), case.signature));
        }
        for line in case.body.lines() {
            output.push_str(&format!("    {}\n", line));
        }
    }

    output
}

fn format_section_html(id: &str, section: &SubSection) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "<section id='{}'>\n<h2>{}</h2>\n<p class='position'>{}</p>\n",
        escape_html(id),
        escape_html(&section.title),
        section.position.render_html()
    ));

    let description = section.description.trim();
    if !description.is_empty() {
        output.push_str(&format!("<p>{}</p>\n", escape_html(description)));
    }

    for case in &section.cases {
        if !case.is_anonymous() {
            output.push_str(&format!(
                "<h3>{} ::{}</h3>\n",
                escape_html(&case.name),
                escape_html(&case.signature)
            ));
        }
        output.push_str(&format!("<pre>{}</pre>\n", escape_html(&case.body)));
    }

    output.push_str("</section>\n");
    output
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
