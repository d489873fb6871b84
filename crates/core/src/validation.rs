//! Decides whether a submitted answer solves a level.
//!
//! Everything here is a pure function of `(language, level, submission)`.

use regex::RegexBuilder;

use crate::model::{Language, Level, StructuredRule, ValidationRule};

/// Check `submission` against the level's rule for `language`.
#[must_use]
pub fn validate(language: Language, level: &Level, submission: &str) -> bool {
    validate_rule(language, level.rule_for(language), submission)
}

/// Check `submission` against an already resolved rule.
///
/// A structured rule built for a different track than `language` never
/// passes.
#[must_use]
pub fn validate_rule(language: Language, rule: ValidationRule<'_>, submission: &str) -> bool {
    let clean = normalize(submission);

    match rule {
        ValidationRule::AcceptedAnswers(accepted) => accepted
            .iter()
            .any(|answer| clean.contains(&answer.to_lowercase())),
        ValidationRule::Answer(answer) => clean.contains(&answer.to_lowercase()),
        ValidationRule::Pattern(pattern) => matches_pattern(pattern, submission),
        ValidationRule::Structured(rule) if rule.language() == language => {
            check_structured(rule, submission)
        }
        ValidationRule::Structured(_) => false,
    }
}

fn normalize(submission: &str) -> String {
    submission.trim().to_lowercase()
}

fn matches_pattern(pattern: &str, submission: &str) -> bool {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(submission))
}

fn contains_all(haystack: &str, needles: Option<&[String]>) -> bool {
    needles.is_some_and(|needles| needles.iter().all(|n| haystack.contains(n.as_str())))
}

fn check_structured(rule: StructuredRule<'_>, submission: &str) -> bool {
    match rule {
        StructuredRule::Html {
            required_tags,
            must_include,
        } => {
            let clean = normalize(submission);
            if let Some(tags) = required_tags {
                return tags.iter().all(|tag| clean.contains(tag.as_str()));
            }
            must_include.is_some_and(|items| {
                items
                    .iter()
                    .all(|item| clean.contains(&item.to_lowercase()))
            })
        }
        StructuredRule::Css {
            required_properties,
        } => contains_all(&normalize(submission), required_properties),
        StructuredRule::JavaScript { must_contain } => {
            contains_all(&normalize(submission), must_contain)
        }
        StructuredRule::Python {
            must_contain,
            enforce_indent,
        } => {
            if enforce_indent && !has_indented_line(submission) {
                return false;
            }
            contains_all(submission.trim(), must_contain)
        }
        StructuredRule::Sql { required_keywords } => {
            let clean = submission.trim().to_uppercase();
            required_keywords.is_some_and(|keywords| {
                keywords
                    .iter()
                    .all(|kw| clean.contains(&kw.to_uppercase()))
            })
        }
        StructuredRule::Networking { must_match } => {
            let clean = submission.trim();
            must_match.is_some_and(|literals| literals.iter().any(|m| clean.contains(m.as_str())))
        }
    }
}

fn has_indented_line(submission: &str) -> bool {
    submission
        .split('\n')
        .any(|line| line.starts_with("    ") || line.starts_with('\t'))
}
