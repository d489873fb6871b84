mod language;
mod level;
mod progress;
mod rule;
mod score;

pub use language::{Language, UnknownLanguage};
pub use level::{Criteria, DEFAULT_MAX_SCORE, Level};
pub use progress::{MalformedProgress, PROGRESS_KEY, Progress, TrackProgress};
pub use rule::{StructuredRule, ValidationRule};
pub use score::{HINT_PENALTY, SCORE_FLOOR, final_score};
