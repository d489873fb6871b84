/// The check that decides whether a submission solves a level.
///
/// Borrowed from the level's [`Criteria`](crate::model::Criteria); resolve one
/// with [`Level::rule_for`](crate::model::Level::rule_for).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule<'a> {
    /// Any of these (lower-cased) appears in the normalized submission.
    AcceptedAnswers(&'a [String]),
    /// This (lower-cased) appears in the normalized submission.
    Answer(&'a str),
    /// Case-insensitive regex over the raw submission.
    Pattern(&'a str),
    /// Track-specific keyword checks.
    Structured(StructuredRule<'a>),
}

/// Per-track keyword rules, one variant per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredRule<'a> {
    Html {
        required_tags: Option<&'a [String]>,
        must_include: Option<&'a [String]>,
    },
    Css {
        required_properties: Option<&'a [String]>,
    },
    JavaScript {
        must_contain: Option<&'a [String]>,
    },
    Python {
        must_contain: Option<&'a [String]>,
        enforce_indent: bool,
    },
    Sql {
        required_keywords: Option<&'a [String]>,
    },
    Networking {
        must_match: Option<&'a [String]>,
    },
}

impl StructuredRule<'_> {
    /// Track this rule was built for.
    #[must_use]
    pub fn language(&self) -> crate::model::Language {
        use crate::model::Language;
        match self {
            StructuredRule::Html { .. } => Language::Html,
            StructuredRule::Css { .. } => Language::Css,
            StructuredRule::JavaScript { .. } => Language::JavaScript,
            StructuredRule::Python { .. } => Language::Python,
            StructuredRule::Sql { .. } => Language::Sql,
            StructuredRule::Networking { .. } => Language::Networking,
        }
    }
}
