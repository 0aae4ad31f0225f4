//! Prompt wording keyed by `(level, category)`.
//!
//! Entertainment contexts get lighter phrasing than work contexts. Any
//! category without its own row uses the `Other` row for that level.

use super::policy::InterventionLevel::{self, Intervention, Nudge, Suggestion};
use crate::classifier::WorkloadCategory::{self, Communication, Entertainment, Other, Work};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageVariant {
    pub message: &'static str,
    pub action_label: Option<&'static str>,
}

const fn plain(message: &'static str) -> MessageVariant {
    MessageVariant {
        message,
        action_label: None,
    }
}

const fn action(message: &'static str, label: &'static str) -> MessageVariant {
    MessageVariant {
        message,
        action_label: Some(label),
    }
}

pub struct MessageRow {
    pub level: InterventionLevel,
    pub category: WorkloadCategory,
    pub variants: &'static [MessageVariant],
}

pub const MESSAGES: &[MessageRow] = &[
    MessageRow {
        level: Nudge,
        category: Work,
        variants: &[
            plain("You've been focused for a while. Blink and relax your shoulders."),
            plain("Quick check: unclench your jaw and look away from the screen for a moment."),
        ],
    },
    MessageRow {
        level: Nudge,
        category: Entertainment,
        variants: &[
            plain("Enjoying the show? Rest your eyes on something far away for a few seconds."),
            plain("Sit back and blink a few times, the screen will wait."),
        ],
    },
    MessageRow {
        level: Nudge,
        category: Communication,
        variants: &[plain(
            "Between messages, take a slow breath and drop your shoulders.",
        )],
    },
    MessageRow {
        level: Nudge,
        category: Other,
        variants: &[plain("Strain is building up. Look 20 feet away for 20 seconds.")],
    },
    MessageRow {
        level: Suggestion,
        category: Work,
        variants: &[
            action(
                "Your focus is starting to fray. Finish this thought and take a short break.",
                "Start eye break",
            ),
            action(
                "Good stopping point? A two-minute stretch will pay back the time.",
                "Stretch now",
            ),
        ],
    },
    MessageRow {
        level: Suggestion,
        category: Entertainment,
        variants: &[action(
            "Long viewing session. Pause at the next scene and stretch your neck.",
            "Take a breather",
        )],
    },
    MessageRow {
        level: Suggestion,
        category: Communication,
        variants: &[action(
            "Lots of back-and-forth. Step away from the chat for a minute.",
            "Take a breather",
        )],
    },
    MessageRow {
        level: Suggestion,
        category: Other,
        variants: &[action(
            "Fatigue is climbing. A short break now will keep you sharp.",
            "Take a break",
        )],
    },
    MessageRow {
        level: Intervention,
        category: Work,
        variants: &[action(
            "You're running on fumes. Save your work and step away from the screen.",
            "Start break",
        )],
    },
    MessageRow {
        level: Intervention,
        category: Entertainment,
        variants: &[action(
            "Your eyes need a real rest. Pause the video and get up for a few minutes.",
            "Pause and rest",
        )],
    },
    MessageRow {
        level: Intervention,
        category: Other,
        variants: &[action(
            "Fatigue is very high. Time for a proper break away from the screen.",
            "Start break",
        )],
    },
];

/// Variants for a level/category pair, falling back to the `Other` row.
pub fn variants_for(
    level: InterventionLevel,
    category: WorkloadCategory,
) -> &'static [MessageVariant] {
    let find = |c: WorkloadCategory| {
        MESSAGES
            .iter()
            .find(|row| row.level == level && row.category == c)
            .map(|row| row.variants)
    };
    find(category).or_else(|| find(Other)).unwrap_or(&[])
}
