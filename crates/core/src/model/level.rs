use serde::{Deserialize, Serialize};

use crate::model::language::Language;
use crate::model::rule::{StructuredRule, ValidationRule};

/// Score a level is worth when its data file does not say otherwise.
pub const DEFAULT_MAX_SCORE: u32 = 100;

//
// ─── CRITERIA ──────────────────────────────────────────────────────────────────
//

/// Raw validation fields as they appear in a level data file.
///
/// Which of these are meaningful depends on the track; [`Criteria::rule_for`]
/// resolves them into a single [`ValidationRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_answers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_properties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_contain: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub check_indentation: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_indent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_match: Option<Vec<String>>,
}

impl Criteria {
    /// Resolve the criteria into the rule that decides a submission.
    ///
    /// Accepted answers win whenever they are present, even as an empty list.
    /// A single answer or a pattern only counts when non-empty. Everything
    /// else falls through to the structured rule of `language`.
    #[must_use]
    pub fn rule_for(&self, language: Language) -> ValidationRule<'_> {
        if let Some(accepted) = self.accepted_answers.as_deref() {
            return ValidationRule::AcceptedAnswers(accepted);
        }
        if let Some(answer) = self.answer.as_deref().filter(|a| !a.is_empty()) {
            return ValidationRule::Answer(answer);
        }
        if let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) {
            return ValidationRule::Pattern(pattern);
        }
        ValidationRule::Structured(self.structured_for(language))
    }

    fn structured_for(&self, language: Language) -> StructuredRule<'_> {
        match language {
            Language::Html => StructuredRule::Html {
                required_tags: self.required_tags.as_deref(),
                must_include: self.must_include.as_deref(),
            },
            Language::Css => StructuredRule::Css {
                required_properties: self.required_properties.as_deref(),
            },
            Language::JavaScript => StructuredRule::JavaScript {
                must_contain: self.must_contain.as_deref(),
            },
            Language::Python => StructuredRule::Python {
                must_contain: self.must_contain.as_deref(),
                enforce_indent: self.check_indentation && self.requires_indent,
            },
            Language::Sql => StructuredRule::Sql {
                required_keywords: self.required_keywords.as_deref(),
            },
            Language::Networking => StructuredRule::Networking {
                must_match: self.must_match.as_deref(),
            },
        }
    }
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// One debugging puzzle within a track.
///
/// Levels are loaded from data files and never change afterwards; a level is
/// addressed by its index in the track's ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub criteria: Criteria,
}

impl Level {
    /// Points awarded for solving the level without hints.
    ///
    /// A missing or zero `maxScore` falls back to [`DEFAULT_MAX_SCORE`].
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
            .filter(|score| *score > 0)
            .unwrap_or(DEFAULT_MAX_SCORE)
    }

    #[must_use]
    pub fn hint(&self, n: usize) -> Option<&str> {
        self.hints.get(n).map(String::as_str)
    }

    #[must_use]
    pub fn rule_for(&self, language: Language) -> ValidationRule<'_> {
        self.criteria.rule_for(language)
    }
}
