//! Impulse scoring heuristic.
//!
//! Four yes/no answers map to a 1-10 score; higher means the purchase
//! looks more impulsive and should be resisted harder.

use super::ImpulseVerdict;

const BASE_SCORE: i32 = 5;

/// Score the answers.
///
/// Contributions to the base of 5:
/// - essential: -3, luxury: +3
/// - owns similar: +2, doesn't: -2
/// - current one broken: -2 (replacement), still works: +2
/// - can wait a week: +2, can't: -1
///
/// The sum is clamped to 1..=10.
pub fn calculate_score(
    is_essential: bool,
    owns_similar: bool,
    current_broken: bool,
    can_wait: bool,
) -> u8 {
    let mut score = BASE_SCORE;

    score += if is_essential { -3 } else { 3 };
    score += if owns_similar { 2 } else { -2 };
    score += if current_broken { -2 } else { 2 };
    score += if can_wait { 2 } else { -1 };

    score.clamp(1, 10) as u8
}

/// Verdict bands: 1-3 go ahead, 4-6 maybe wait, 7-10 strong no.
pub fn verdict_for_score(score: u8) -> ImpulseVerdict {
    if score <= 3 {
        ImpulseVerdict::GoAhead
    } else if score <= 6 {
        ImpulseVerdict::MaybeWait
    } else {
        ImpulseVerdict::StrongNo
    }
}

/// Gentle, non-judgmental line shown on the feedback step.
pub fn feedback_message(verdict: ImpulseVerdict) -> &'static str {
    match verdict {
        ImpulseVerdict::GoAhead => "This seems like something you need.",
        ImpulseVerdict::MaybeWait => "This can probably wait.",
        ImpulseVerdict::StrongNo => "This looks like an impulse spend.",
    }
}

/// Longer motivational line for summary screens.
pub fn motivational_message(verdict: ImpulseVerdict) -> &'static str {
    match verdict {
        ImpulseVerdict::GoAhead => {
            "This seems like a reasonable purchase. If you've budgeted for it, go ahead!"
        }
        ImpulseVerdict::MaybeWait => {
            "Take a moment. Sleep on it. If you still want it tomorrow, it might be worth it."
        }
        ImpulseVerdict::StrongNo => {
            "Your future self will thank you for waiting. This is peak impulse territory!"
        }
    }
}
