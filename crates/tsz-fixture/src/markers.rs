//! Baseline contents split on `//// [file]` source markers.
//!
//! A marker line names the source file the following output was emitted
//! from. Markers are metadata: they are never part of the emitted code and
//! are dropped before comparison.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^//// \[(?P<file>[^\]]+)\]\s*$").expect("valid marker regex"));

/// One marker-delimited block of a baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// File named by the marker; `None` for text before the first marker.
    pub file_name: Option<String>,
    /// Lines following the marker, joined with `\n`, without a trailing newline.
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFile {
    pub sections: Vec<Section>,
}

impl FixtureFile {
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut sections = Vec::new();
        let mut current_name: Option<String> = None;
        let mut current_lines: Vec<&str> = Vec::new();
        let mut seen_marker = false;

        for line in text.lines() {
            if let Some(caps) = MARKER_RE.captures(line) {
                if seen_marker || !current_lines.is_empty() {
                    sections.push(Section {
                        file_name: current_name.take(),
                        body: current_lines.join("\n"),
                    });
                }
                current_name = Some(caps["file"].to_string());
                current_lines.clear();
                seen_marker = true;
            } else {
                current_lines.push(line);
            }
        }

        if seen_marker || !current_lines.is_empty() {
            sections.push(Section {
                file_name: current_name,
                body: current_lines.join("\n"),
            });
        }

        Self { sections }
    }

    /// A baseline holding `code` under a single marker for `file_name`.
    pub fn single(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            sections: vec![Section {
                file_name: Some(file_name.into()),
                body: code.into(),
            }],
        }
    }

    /// Emitted code with all markers removed.
    pub fn code(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.body.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// File named by the first marker.
    pub fn primary_source(&self) -> Option<&str> {
        self.sections
            .iter()
            .find_map(|section| section.file_name.as_deref())
    }

    /// On-disk form: marker lines followed by their bodies, newline terminated.
    ///
    /// `FixtureFile::parse(&file.render()) == file` for any parsed file. An
    /// unnamed section is written even when empty, since it has no marker to
    /// stand in for it.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for section in &self.sections {
            if let Some(file_name) = &section.file_name {
                lines.push(format!("//// [{file_name}]"));
            }
            if !section.body.is_empty() || section.file_name.is_none() {
                lines.push(section.body.clone());
            }
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Replace the code while keeping the marker of the first section.
    ///
    /// The emitter yields one output, which is compared against the bodies
    /// of all sections joined. A multi-section baseline therefore collapses
    /// into a single section under the first marker, holding that output.
    pub fn with_code(&self, code: &str) -> Self {
        let code = code.trim_end_matches(['\n', '\r']);
        match self.primary_source() {
            Some(file_name) => Self::single(file_name, code),
            None => Self {
                sections: vec![Section {
                    file_name: None,
                    body: code.to_string(),
                }],
            },
        }
    }
}
