//! Splits a model reply into the six template sections.
//!
//! Two passes over the text:
//! 1. **locate** every `**Label:**` marker occurrence, in offset order;
//! 2. **slice** each section from the end of its first marker to the start of
//!    the next located marker (any section), or to end-of-text.
//!
//! Sections whose marker never appears stay empty; they never borrow text
//! from a neighbour. Parsing is total: any input, including `""`, yields a
//! [`ParsedSections`].

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Template sections, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Context,
    Analysis,
    Risks,
    Recommendation,
    IsoClause,
    Conclusion,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Context,
        Section::Analysis,
        Section::Risks,
        Section::Recommendation,
        Section::IsoClause,
        Section::Conclusion,
    ];

    /// Header text as the model writes it.
    pub fn label(self) -> &'static str {
        match self {
            Section::Context => "Context",
            Section::Analysis => "Analysis",
            Section::Risks => "Risks",
            Section::Recommendation => "Recommendation",
            Section::IsoClause => "ISO Clause",
            Section::Conclusion => "Conclusion",
        }
    }

    /// Full marker, e.g. `**ISO Clause:**`.
    pub fn marker(self) -> &'static str {
        match self {
            Section::Context => "**Context:**",
            Section::Analysis => "**Analysis:**",
            Section::Risks => "**Risks:**",
            Section::Recommendation => "**Recommendation:**",
            Section::IsoClause => "**ISO Clause:**",
            Section::Conclusion => "**Conclusion:**",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.label() == label)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Raw extraction result; a field is empty when its marker was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSections {
    pub context: String,
    pub analysis: String,
    pub risks: String,
    pub recommendation: String,
    pub iso_clause: String,
    pub conclusion: String,
}

impl ParsedSections {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Context => &self.context,
            Section::Analysis => &self.analysis,
            Section::Risks => &self.risks,
            Section::Recommendation => &self.recommendation,
            Section::IsoClause => &self.iso_clause,
            Section::Conclusion => &self.conclusion,
        }
    }

    fn slot(&mut self, section: Section) -> &mut String {
        match section {
            Section::Context => &mut self.context,
            Section::Analysis => &mut self.analysis,
            Section::Risks => &mut self.risks,
            Section::Recommendation => &mut self.recommendation,
            Section::IsoClause => &mut self.iso_clause,
            Section::Conclusion => &mut self.conclusion,
        }
    }
}

/// One marker occurrence: which section, and the byte span of the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MarkerHit {
    section: Section,
    start: usize,
    end: usize,
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let labels = Section::ALL
            .iter()
            .map(|s| regex::escape(s.label()))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\*\*({labels}):\*\*")).expect("section marker pattern is valid")
    })
}

/// Pass 1: every marker occurrence, ordered by offset.
fn locate(text: &str) -> Vec<MarkerHit> {
    marker_regex()
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let section = Section::from_label(cap.get(1)?.as_str())?;
            Some(MarkerHit {
                section,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Extracts the six sections from `text`. Never fails.
pub fn parse_sections(text: &str) -> ParsedSections {
    let hits = locate(text);
    let mut out = ParsedSections::default();
    let mut seen = [false; Section::ALL.len()];

    // Pass 2: slice between consecutive hits; first occurrence wins.
    for (i, hit) in hits.iter().enumerate() {
        if seen[hit.section.index()] {
            continue;
        }
        seen[hit.section.index()] = true;

        let stop = hits.get(i + 1).map_or(text.len(), |next| next.start);
        *out.slot(hit.section) = text[hit.end..stop].trim().to_string();
    }

    out
}
