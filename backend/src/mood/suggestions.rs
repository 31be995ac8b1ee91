use rand::seq::SliceRandom;
use rand::Rng;

use super::MoodLabel;

pub const FALLBACK_SUGGESTION: &str = "Reflect on your day and see what insights you can gain.";

const CRISIS: [&str; 8] = [
    "You are not alone. Please call 988 (Suicide & Crisis Lifeline) right now - they're available 24/7 and want to help.",
    "These feelings are temporary, even if they don't feel that way. Please reach out to a crisis counselor at 988.",
    "You matter and your life has value. Please talk to someone you trust or call 988 for immediate support.",
    "It's okay to ask for help. Please call 988 or text HOME to 741741 for crisis support.",
    "You don't have to face this alone. Professional help is available - call or text 988 to reach the Suicide & Crisis Lifeline.",
    "Please reach out to someone you trust or call 988. You deserve support and care.",
    "These thoughts are serious and you deserve professional help. Please call 988 immediately.",
    "You are stronger than you think. Please get help - call 988 or go to the nearest emergency room.",
];

const POSITIVE: [&str; 8] = [
    "Keep up the great energy! Your positive mindset is contagious.",
    "Celebrate your wins today! You're doing amazing.",
    "Share your joy with others - happiness multiplies when shared.",
    "Take a moment to appreciate how far you've come.",
    "Your positive attitude will help you overcome any challenges.",
    "Great job maintaining such a positive outlook!",
    "Remember this feeling - you're capable of amazing things.",
    "Your happiness is well-deserved. Keep shining!",
];

const NEGATIVE: [&str; 8] = [
    "It's okay to feel this way. Tomorrow is a new day.",
    "Consider talking to a friend or family member about your feelings.",
    "Try taking a walk or doing something you usually enjoy.",
    "Remember that difficult times are temporary. You're stronger than you think.",
    "Be gentle with yourself today. You're doing the best you can.",
    "Consider writing down what's bothering you - it can help clarify your thoughts.",
    "Sometimes a good cry or a long shower can help reset your mood.",
    "You don't have to face this alone. Reach out to someone you trust.",
];

const NEUTRAL: [&str; 8] = [
    "Take a moment to reflect on what could make your day even better.",
    "Consider trying something new or reaching out to someone you haven't talked to in a while.",
    "Sometimes neutral days are perfect for planning and setting new goals.",
    "Use this calm energy to organize your thoughts and priorities.",
    "A neutral day can be a good opportunity to practice mindfulness.",
    "Consider what small changes might bring more joy to your day.",
    "Use this balanced state to make thoughtful decisions.",
    "Sometimes the best days start neutral and get better as they go.",
];

pub fn messages_for(label: MoodLabel) -> &'static [&'static str] {
    match label {
        MoodLabel::Crisis => &CRISIS,
        MoodLabel::Positive => &POSITIVE,
        MoodLabel::Negative => &NEGATIVE,
        MoodLabel::Neutral => &NEUTRAL,
    }
}

/// Picks a supportive message for a stored mood string. Free-form tags that
/// are not one of the four labels get the fallback.
pub fn suggestion_for<R: Rng + ?Sized>(mood: &str, rng: &mut R) -> &'static str {
    match mood.parse::<MoodLabel>() {
        Ok(label) => messages_for(label)
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_SUGGESTION),
        Err(()) => FALLBACK_SUGGESTION,
    }
}
