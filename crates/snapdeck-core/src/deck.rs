//! Plain-text decks: the content a host lays out as stacked sections.
//!
//! ```text
//! --- #intro
//! # Studio
//! We build companies.
//!
//! --- #team
//! # Team
//! ...
//! ```
//!
//! A marker line is `---`, optionally followed by `#identifier`. Text before
//! the first marker becomes an untitled section when it is not blank.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::{Error, Result};

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^---\s*(?:#([A-Za-z][\w\-:.]*))?\s*$").expect("marker regex is valid")
    })
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^#{1,6}\s+(.+?)\s*$").expect("heading regex is valid"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSection {
    /// Anchor from the marker line, if any
    pub identifier: Option<String>,
    /// First heading of the section
    pub title: Option<String>,
    /// Section text without the marker line
    pub body: String,
}

impl DeckSection {
    /// Title for display: heading, then identifier, then a positional name
    pub fn display_title(&self, index: usize) -> String {
        self.title
            .clone()
            .or_else(|| self.identifier.clone())
            .unwrap_or_else(|| format!("Section {}", index + 1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Deck {
    pub sections: Vec<DeckSection>,
}

impl Deck {
    /// Parse deck text
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections = Vec::new();
        let mut current: Option<(Option<String>, Vec<&str>)> = None;
        let mut preamble: Vec<&str> = Vec::new();

        for line in text.lines() {
            if let Some(caps) = marker_regex().captures(line) {
                if let Some((identifier, lines)) = current.take() {
                    sections.push(build_section(identifier, &lines));
                } else if preamble.iter().any(|l| !l.trim().is_empty()) {
                    sections.push(build_section(None, &preamble));
                }
                let identifier = caps.get(1).map(|m| m.as_str().to_string());
                current = Some((identifier, Vec::new()));
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            } else {
                preamble.push(line);
            }
        }

        match current {
            Some((identifier, lines)) => sections.push(build_section(identifier, &lines)),
            None if preamble.iter().any(|l| !l.trim().is_empty()) => {
                sections.push(build_section(None, &preamble))
            }
            None => {}
        }

        if sections.is_empty() {
            return Err(Error::Deck("deck contains no sections".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for section in &sections {
            if let Some(id) = &section.identifier {
                if !seen.insert(id.as_str()) {
                    warn!(
                        identifier = %id,
                        "Duplicate section identifier; deep links use the first"
                    );
                }
            }
        }

        Ok(Self { sections })
    }

    /// Load and parse a deck file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            Error::Deck(msg) => Error::Deck(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn build_section(identifier: Option<String>, lines: &[&str]) -> DeckSection {
    let title = lines
        .iter()
        .find_map(|l| heading_regex().captures(l))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let start = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    let body = lines[start..end.max(start)].join("\n");

    DeckSection {
        identifier,
        title,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = "\
--- #intro
# Northwind Studio

We build companies from zero.

--- #work
## Portfolio
Three companies a year.
---
Untitled middle.
--- #team
# The Team
";

    #[test]
    fn test_parse_markers_and_titles() {
        let deck = Deck::parse(DECK).unwrap();
        assert_eq!(deck.len(), 4);

        assert_eq!(deck.sections[0].identifier.as_deref(), Some("intro"));
        assert_eq!(deck.sections[0].title.as_deref(), Some("Northwind Studio"));
        assert_eq!(
            deck.sections[0].body,
            "# Northwind Studio\n\nWe build companies from zero."
        );

        assert_eq!(deck.sections[1].title.as_deref(), Some("Portfolio"));
        assert_eq!(deck.sections[2].identifier, None);
        assert_eq!(deck.sections[2].display_title(2), "Section 3");
        assert_eq!(deck.sections[3].display_title(3), "The Team");
    }

    #[test]
    fn test_preamble_becomes_first_section() {
        let deck = Deck::parse("Hello there\n--- #next\nBody").unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.sections[0].identifier, None);
        assert_eq!(deck.sections[0].body, "Hello there");
        assert_eq!(deck.sections[1].display_title(1), "next");
    }

    #[test]
    fn test_blank_preamble_is_dropped() {
        let deck = Deck::parse("\n\n--- #only\ntext").unwrap();
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_text_without_markers_is_one_section() {
        let deck = Deck::parse("just words").unwrap();
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_empty_deck_is_error() {
        assert!(matches!(Deck::parse("   \n"), Err(Error::Deck(_))));
    }

    #[test]
    fn test_marker_requires_dashes_alone() {
        let deck = Deck::parse("--- #a\n----\n--- # not-an-id\n").unwrap();
        // "----" and "--- # not-an-id" are body text, not markers
        assert_eq!(deck.len(), 1);
        assert!(deck.sections[0].body.contains("----"));
    }
}
