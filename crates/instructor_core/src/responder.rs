//! crates/instructor_core/src/responder.rs
//!
//! The scripted stand-in for the quiz assistant: a fixed rule table keyed on
//! the wizard step and a case-insensitive keyword match.

use crate::wizard::WizardStep;

struct Rule {
    step: WizardStep,
    keywords: &'static [&'static str],
    reply: &'static str,
}

const OUTCOMES_ADVICE: &str = "Great! Let's define some specific learning outcomes for your quiz. These will guide the types of questions we create. For example, if you're teaching programming, outcomes might include 'Understand variables and data types' or 'Apply loops to solve problems'. What learning outcomes would you like to focus on?";
const OUTCOMES_DEFAULT: &str = "To create an effective quiz, we should start by defining the specific learning outcomes you want to assess. What key concepts or skills should students demonstrate mastery of through this quiz?";
const FORMAT_ADVICE: &str = "Based on your learning outcomes, I recommend using a mix of question formats: multiple-choice questions to test conceptual understanding, true/false for factual knowledge, and short-answer questions to assess deeper comprehension. Would you like me to generate sample questions in these formats?";
const GENERATION_DEFAULT: &str = "Now that we have our learning outcomes, let's think about the quiz format. Different question types serve different assessment purposes. What types of questions would you like to include? Options include multiple-choice, true/false, short-answer, and essay questions.";
const REVIEW_DEFAULT: &str = "I understand. Let me generate some quiz content aligned with those outcomes. I'll create a balanced mix of questions that assess different levels of understanding. Would you like me to focus on any particular aspect or difficulty level?";

// Evaluated top to bottom; the first rule whose step matches and whose keyword
// appears in the message wins.
const RULES: &[Rule] = &[
    Rule {
        step: WizardStep::Outcomes,
        keywords: &["learning outcome", "objective"],
        reply: OUTCOMES_ADVICE,
    },
    Rule {
        step: WizardStep::Generation,
        keywords: &["format", "question"],
        reply: FORMAT_ADVICE,
    },
];

fn default_reply(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Outcomes => OUTCOMES_DEFAULT,
        WizardStep::Generation => GENERATION_DEFAULT,
        WizardStep::Review => REVIEW_DEFAULT,
    }
}

/// Picks the canned agent reply for `user_text` at `step`.
pub fn respond(step: WizardStep, user_text: &str) -> &'static str {
    let text = user_text.to_lowercase();
    RULES
        .iter()
        .filter(|rule| rule.step == step)
        .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .map(|rule| rule.reply)
        .unwrap_or_else(|| default_reply(step))
}

/// The opening agent message once the outcomes are accepted.
pub fn greeting(title: &str) -> String {
    format!(
        "I'll help you create a quiz for \"{}\". Let's start by discussing your learning outcomes in more detail. How would you like to approach this quiz?",
        title
    )
}
