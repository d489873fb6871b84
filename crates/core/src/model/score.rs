/// Points deducted for every hint the learner opens.
pub const HINT_PENALTY: u32 = 20;

/// Lowest score a solved level can award.
pub const SCORE_FLOOR: u32 = 10;

/// Score for solving a level worth `max_score` after opening `hints_used` hints.
///
/// `max(max_score - 20 * hints_used, 10)`, without overflow for large hint
/// counts.
#[must_use]
pub fn final_score(max_score: u32, hints_used: u32) -> u32 {
    let penalty = hints_used.saturating_mul(HINT_PENALTY);
    max_score.saturating_sub(penalty).max(SCORE_FLOOR)
}
