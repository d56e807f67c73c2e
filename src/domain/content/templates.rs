//! Compiled-in prompt templates for the daily coaching script.
//!
//! Placeholders use `{{name}}` syntax. Each template lists the variables it
//! needs so a missing value is caught before the LLM is called.

use super::model::Tone;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const STANDARD_DAILY: &str = "standard_daily";
pub const INITIAL_ASSESSMENT: &str = "initial_assessment";
pub const COMEBACK_ENCOURAGEMENT: &str = "comeback_encouragement";
pub const MILESTONE_CELEBRATION: &str = "milestone_celebration";
pub const MORNING_ENERGIZER: &str = "morning_energizer";
pub const EVENING_REFLECTION: &str = "evening_reflection";
pub const EARLY_JOURNEY: &str = "early_journey";
pub const BUILDING_MOMENTUM: &str = "building_momentum";
pub const MASTERY_MINDSET: &str = "mastery_mindset";
pub const HABIT_DEEP_DIVE: &str = "habit_deep_dive";
pub const SUPPORTIVE_RECOVERY: &str = "supportive_recovery";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub user_prompt: String,
    pub variables: &'static [&'static str],
    pub tone: Tone,
}

const SYSTEM_PROMPT: &str = "You are PowerPulse, a personal performance coach who records a \
five-minute audio session for one listener every day. You write for the ear: short \
sentences, natural spoken rhythm, no headings, no bullet points, no stage directions, \
no emojis. You speak directly to the listener by name. Always answer with a single JSON \
object with exactly these keys: \"title\" (string, under 60 characters), \"script\" \
(string, the full spoken script), \"keyPoints\" (array of 3 to 5 short strings) and \
\"tone\" (one of \"motivational\", \"educational\", \"celebratory\", \"supportive\").";

const PROFILE_BLOCK: &str = "Listener: {{name}}\n\
Struggles with: {{pain_points}}\n\
Working towards: {{goals}}\n\
Preferred coaching style: {{learning_style}} ({{coaching_style}})\n\
Self-reported energy: {{energy_level}}/10\n\
Current streak: {{current_streak}} days (best: {{longest_streak}})\n\
Total days with PowerPulse: {{total_days_active}}\n\
Journey stage: {{stage}}\n\
Time of day: {{time_of_day}}\n\n";

const PROFILE_VARIABLES: &[&str] = &[
    "name",
    "pain_points",
    "goals",
    "learning_style",
    "coaching_style",
    "energy_level",
    "current_streak",
    "longest_streak",
    "total_days_active",
    "stage",
    "time_of_day",
];

const LENGTH_RULE: &str = "The script must be between 700 and 850 words so it lasts about \
five minutes when read aloud.";

static TEMPLATES: LazyLock<HashMap<&'static str, PromptTemplate>> = LazyLock::new(|| {
    let templates = vec![
        PromptTemplate {
            name: STANDARD_DAILY,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}Write today's coaching session. Pick one of the listener's \
                 struggles and give one concrete technique they can use today. Connect it to \
                 their goals and end with a single clear action. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Motivational,
        },
        PromptTemplate {
            name: INITIAL_ASSESSMENT,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}This is the listener's very first session. Welcome them, \
                 reflect back what they told us about their struggles and goals, explain how \
                 the daily sessions work and give them one small first step for today. \
                 {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Educational,
        },
        PromptTemplate {
            name: COMEBACK_ENCOURAGEMENT,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener broke their streak after reaching \
                 {{{{longest_streak}}}} days. Welcome them back without guilt, remind them \
                 that progress is not lost, and give them an easy win to restart today. \
                 {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Supportive,
        },
        PromptTemplate {
            name: MILESTONE_CELEBRATION,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}Today the listener hits a {{{{current_streak}}}}-day streak. \
                 Celebrate the milestone, name the changes this consistency creates, and set \
                 up the next milestone with one stretch challenge. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Celebratory,
        },
        PromptTemplate {
            name: MORNING_ENERGIZER,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener is starting their day. Help them set one \
                 intention, prime their energy and plan the first hour around their most \
                 important goal. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Motivational,
        },
        PromptTemplate {
            name: EVENING_REFLECTION,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener is winding down. Guide a short reflection on \
                 what went well today, what they learned about their struggles, and one thing \
                 to prepare for tomorrow. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Supportive,
        },
        PromptTemplate {
            name: EARLY_JOURNEY,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener is in their first week. Focus on building the \
                 habit itself: explain why small daily reps beat motivation and give one tiny \
                 action tied to their main struggle. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Educational,
        },
        PromptTemplate {
            name: BUILDING_MOMENTUM,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener has been showing up for a few weeks. Raise the \
                 bar slightly: introduce one intermediate technique and show how it compounds \
                 with what they already do. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Motivational,
        },
        PromptTemplate {
            name: MASTERY_MINDSET,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener is a long-time member. Talk about identity and \
                 mastery: how to keep growing when the basics are automatic, and how to \
                 mentor others through the same struggles. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Motivational,
        },
        PromptTemplate {
            name: HABIT_DEEP_DIVE,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener is a long-time member. Take one of their goals \
                 and go deep on the science behind it, then turn that into a concrete \
                 experiment for this week. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Educational,
        },
        PromptTemplate {
            name: SUPPORTIVE_RECOVERY,
            system_prompt: SYSTEM_PROMPT,
            user_prompt: format!(
                "{PROFILE_BLOCK}The listener did not connect with their last session. Slow \
                 down, acknowledge that some days are harder, and offer a gentler, simpler \
                 practice that still moves them towards their goals. {LENGTH_RULE}"
            ),
            variables: PROFILE_VARIABLES,
            tone: Tone::Supportive,
        },
    ];

    templates.into_iter().map(|t| (t.name, t)).collect()
});

/// Look up a template by name
pub fn get_template(name: &str) -> Option<&'static PromptTemplate> {
    TEMPLATES.get(name)
}

/// Look up a template, falling back to the standard daily session
pub fn template_or_default(name: &str) -> &'static PromptTemplate {
    match get_template(name) {
        Some(template) => template,
        None => {
            tracing::warn!(template = name, "Unknown template, using standard daily");
            &TEMPLATES[STANDARD_DAILY]
        }
    }
}

pub fn template_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TEMPLATES.keys().copied().collect();
    names.sort_unstable();
    names
}
