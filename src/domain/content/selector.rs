use super::model::{TimeOfDay, UserContext};
use super::templates::{
    BUILDING_MOMENTUM, COMEBACK_ENCOURAGEMENT, EARLY_JOURNEY, EVENING_REFLECTION, HABIT_DEEP_DIVE,
    INITIAL_ASSESSMENT, MASTERY_MINDSET, MILESTONE_CELEBRATION, MORNING_ENERGIZER, STANDARD_DAILY,
    SUPPORTIVE_RECOVERY,
};
use rand::Rng;

/// Streak lengths that get a celebration instead of a regular session
pub const MILESTONE_STREAKS: [u32; 4] = [7, 14, 21, 30];

/// Chance of swapping in a time-of-day variant
const TIME_OF_DAY_VARIANT_PROBABILITY: f64 = 0.3;

/// Pick the template for today's session.
///
/// Only the time-of-day branch samples `rng`; every other branch depends on
/// the context alone, so milestone and comeback sessions are deterministic.
pub fn select_template<R: Rng + ?Sized>(ctx: &UserContext, rng: &mut R) -> &'static str {
    if ctx.returning_after_break {
        return COMEBACK_ENCOURAGEMENT;
    }

    if ctx.total_days_active == 0 {
        return INITIAL_ASSESSMENT;
    }

    if MILESTONE_STREAKS.contains(&ctx.current_streak) {
        return MILESTONE_CELEBRATION;
    }

    if rng.gen_bool(TIME_OF_DAY_VARIANT_PROBABILITY) {
        match ctx.time_of_day {
            TimeOfDay::Morning => return MORNING_ENERGIZER,
            TimeOfDay::Evening => return EVENING_REFLECTION,
            TimeOfDay::Afternoon | TimeOfDay::Night => {}
        }
    }

    match ctx.total_days_active {
        1..=6 => EARLY_JOURNEY,
        7..=29 => BUILDING_MOMENTUM,
        30.. if ctx.current_streak % 2 == 0 => MASTERY_MINDSET,
        30.. => HABIT_DEEP_DIVE,
        _ => STANDARD_DAILY,
    }
}

/// Template used when a user asks for a different session
pub fn select_regeneration_template(negative_feedback: bool) -> &'static str {
    if negative_feedback {
        SUPPORTIVE_RECOVERY
    } else {
        STANDARD_DAILY
    }
}
