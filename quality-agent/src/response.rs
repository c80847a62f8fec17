use std::fmt;

use serde::Serialize;

use crate::parser::{ParsedSections, Section};

const DEFAULT_ANALYSIS: &str = "Analysis not available";
const DEFAULT_RISKS: &str = "No specific risks identified";
const DEFAULT_RECOMMENDATION: &str = "See ISO 9001:2015 requirements";
const DEFAULT_ISO_CLAUSE: &str = "Not applicable";
const DEFAULT_CONCLUSION: &str = "Analysis complete";
const DEFAULT_CONTEXT: &str = "Question not provided";

/// A structured answer. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityResponse {
    pub context: String,
    pub analysis: String,
    pub risks: String,
    pub recommendation: String,
    pub iso_clause: String,
    pub conclusion: String,
}

impl QualityResponse {
    /// Fills empty sections with their defaults; context falls back to `question`.
    pub fn from_sections(parsed: ParsedSections, question: &str) -> Self {
        fn or(value: String, fallback: &str) -> String {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        }

        Self {
            context: or(or(parsed.context, question), DEFAULT_CONTEXT),
            analysis: or(parsed.analysis, DEFAULT_ANALYSIS),
            risks: or(parsed.risks, DEFAULT_RISKS),
            recommendation: or(parsed.recommendation, DEFAULT_RECOMMENDATION),
            iso_clause: or(parsed.iso_clause, DEFAULT_ISO_CLAUSE),
            conclusion: or(parsed.conclusion, DEFAULT_CONCLUSION),
        }
    }

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
}

/// Renders the bold-header template block.
impl fmt::Display for QualityResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        for (i, section) in Section::ALL.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{} {}", section.marker(), self.get(section))?;
        }
        write!(f, "---")
    }
}
