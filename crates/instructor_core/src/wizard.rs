//! crates/instructor_core/src/wizard.rs
//!
//! The quiz-creation wizard: a three-step state machine over a `QuizDraft`.
//!
//! The wizard itself never sleeps or spawns. Anything that should happen
//! "later" (the agent greeting, the agent's reply) is handed back to the caller
//! as a `ScheduledMessage`; the caller waits and then calls `deliver`. Every
//! scheduled message carries a ticket so that a delivery arriving after a
//! reset or a restarted conversation is rejected instead of mutating a draft it
//! no longer belongs to.

use crate::confirm::{ConfirmationGate, Decision};
use crate::domain::{ChatMessage, NotificationKind, QuestionKind, Quiz, QuizQuestion, Sender};
use crate::ports::Notifier;
use crate::responder;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const RESET_PROMPT: &str = "Are you sure you want to start over? All progress will be lost.";

//=========================================================================================
// Steps
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Outcomes,
    Generation,
    Review,
}

impl WizardStep {
    /// 1-based position shown in the step indicator.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Outcomes => 1,
            WizardStep::Generation => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Outcomes => "Define Outcomes",
            WizardStep::Generation => "Generate Content",
            WizardStep::Review => "Review & Export",
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Outcomes => None,
            WizardStep::Generation => Some(WizardStep::Outcomes),
            WizardStep::Review => Some(WizardStep::Generation),
        }
    }
}

//=========================================================================================
// Errors and effects
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Please provide a quiz title and at least one learning outcome")]
    MissingInformation,
    #[error("The quiz draft can only be edited while defining outcomes")]
    NotEditable,
    #[error("Outcome {0} does not exist")]
    NoSuchOutcome(usize),
    #[error("At least one outcome entry must remain")]
    LastOutcome,
    #[error("Still waiting for the assistant to reply")]
    AwaitingReply,
    #[error("The assistant chat is only open while generating content")]
    ChatClosed,
    #[error("The quiz can only be finalized from the review step")]
    NotReviewing,
}

pub type WizardResult<T> = Result<T, WizardError>;

/// Identifies one scheduled agent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledKind {
    /// The opening message after step 1 is accepted.
    Greeting,
    /// The answer to a user message; blocks sending until delivered.
    Reply,
}

/// An agent message the caller must deliver after the delay for its `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMessage {
    pub ticket: ReplyTicket,
    pub kind: ScheduledKind,
    pub content: String,
}

/// Result of a "continue" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Step 1 was accepted; a fresh conversation starts with `greeting`.
    Generation { greeting: ScheduledMessage },
    Review,
    /// Already at the last step.
    Unchanged,
}

//=========================================================================================
// Draft and wizard
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizDraft {
    pub title: String,
    pub outcomes: Vec<String>,
    pub step: WizardStep,
    pub transcript: Vec<ChatMessage>,
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            outcomes: vec![String::new()],
            step: WizardStep::Outcomes,
            transcript: Vec::new(),
        }
    }
}

impl QuizDraft {
    /// The outcomes as they will be submitted: blanks removed, the rest as typed.
    pub fn learning_outcomes(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.trim().is_empty())
            .cloned()
            .collect()
    }

    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && self.outcomes.iter().any(|o| !o.trim().is_empty())
    }
}

#[derive(Debug, Default)]
pub struct QuizWizard {
    draft: QuizDraft,
    input: String,
    scheduled: Vec<(ReplyTicket, ScheduledKind)>,
    next_ticket: u64,
    reset_gate: ConfirmationGate<()>,
}

impl QuizWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &QuizDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a reply to a user message is outstanding.
    pub fn is_waiting(&self) -> bool {
        self.scheduled
            .iter()
            .any(|(_, kind)| *kind == ScheduledKind::Reply)
    }

    pub fn pending_confirmation(&self) -> Option<&'static str> {
        self.reset_gate.pending().map(|c| c.prompt)
    }

    // --- Step 1 editing ---

    fn ensure_editable(&self) -> WizardResult<()> {
        if self.draft.step == WizardStep::Outcomes {
            Ok(())
        } else {
            Err(WizardError::NotEditable)
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.title = title.into();
        Ok(())
    }

    pub fn add_outcome(&mut self) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.outcomes.push(String::new());
        Ok(())
    }

    pub fn set_outcome(&mut self, index: usize, value: impl Into<String>) -> WizardResult<()> {
        self.ensure_editable()?;
        let slot = self
            .draft
            .outcomes
            .get_mut(index)
            .ok_or(WizardError::NoSuchOutcome(index))?;
        *slot = value.into();
        Ok(())
    }

    pub fn remove_outcome(&mut self, index: usize) -> WizardResult<()> {
        self.ensure_editable()?;
        if index >= self.draft.outcomes.len() {
            return Err(WizardError::NoSuchOutcome(index));
        }
        if self.draft.outcomes.len() == 1 {
            return Err(WizardError::LastOutcome);
        }
        self.draft.outcomes.remove(index);
        Ok(())
    }

    // --- Navigation ---

    /// The "continue" action.
    ///
    /// Leaving step 1 requires a title and one non-blank outcome; on failure an
    /// error notification is pushed and nothing changes.
    pub fn advance(&mut self, notifier: &dyn Notifier) -> WizardResult<Advance> {
        match self.draft.step {
            WizardStep::Outcomes => {
                if !self.draft.is_complete() {
                    notifier.notify(
                        NotificationKind::Error,
                        "Missing Information",
                        Some("Please provide a quiz title and at least one learning outcome"),
                    );
                    return Err(WizardError::MissingInformation);
                }
                self.draft.step = WizardStep::Generation;
                // A new conversation: anything still in flight belongs to the old one.
                self.draft.transcript.clear();
                self.scheduled.clear();
                let greeting = self.schedule(
                    ScheduledKind::Greeting,
                    responder::greeting(&self.draft.title),
                );
                Ok(Advance::Generation { greeting })
            }
            WizardStep::Generation => {
                self.draft.step = WizardStep::Review;
                Ok(Advance::Review)
            }
            WizardStep::Review => Ok(Advance::Unchanged),
        }
    }

    /// The "back" action; does nothing at step 1. From Review this is
    /// "edit questions".
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(previous) = self.draft.step.previous() {
            self.draft.step = previous;
        }
        self.draft.step
    }

    // --- Conversation ---

    /// Edits the chat draft. Allowed even while waiting for a reply.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Sends the chat draft. Only on the Generation step; a blank draft is
    /// ignored (`Ok(None)`).
    pub fn send(&mut self) -> WizardResult<Option<ScheduledMessage>> {
        if self.draft.step != WizardStep::Generation {
            return Err(WizardError::ChatClosed);
        }
        if self.is_waiting() {
            return Err(WizardError::AwaitingReply);
        }
        if self.input.trim().is_empty() {
            return Ok(None);
        }
        let text = std::mem::take(&mut self.input);
        let reply = responder::respond(self.draft.step, &text);
        self.draft
            .transcript
            .push(ChatMessage::new(Sender::User, text));
        Ok(Some(self.schedule(ScheduledKind::Reply, reply.to_string())))
    }

    /// Appends a previously scheduled agent message. Returns false when the
    /// ticket is no longer current (the draft was reset or the conversation
    /// restarted) and leaves the transcript untouched.
    pub fn deliver(&mut self, ticket: ReplyTicket, content: impl Into<String>) -> bool {
        let Some(pos) = self.scheduled.iter().position(|(t, _)| *t == ticket) else {
            return false;
        };
        self.scheduled.remove(pos);
        self.draft
            .transcript
            .push(ChatMessage::new(Sender::Agent, content));
        true
    }

    fn schedule(&mut self, kind: ScheduledKind, content: String) -> ScheduledMessage {
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.scheduled.push((ticket, kind));
        ScheduledMessage {
            ticket,
            kind,
            content,
        }
    }

    // --- Reset ---

    /// Asks before discarding the draft. Returns the question to show.
    pub fn request_reset(&mut self) -> &'static str {
        self.reset_gate.request(RESET_PROMPT, ()).prompt
    }

    /// Answers the reset question. Returns true when the draft was cleared.
    pub fn resolve_reset(&mut self, decision: Decision) -> bool {
        if self.reset_gate.resolve(decision).is_none() {
            return false;
        }
        self.draft = QuizDraft::default();
        self.input.clear();
        self.scheduled.clear();
        true
    }

    // --- Review ---

    /// The fixed question preview shown on the review step.
    pub fn preview_questions() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                id: Uuid::new_v4(),
                kind: QuestionKind::MultipleChoice,
                text: "Which of the following is a correct example of variable declaration in JavaScript?".to_string(),
                options: None,
                correct_answer: None,
                points: 2,
            },
            QuizQuestion {
                id: Uuid::new_v4(),
                kind: QuestionKind::TrueFalse,
                text: "Arrays in JavaScript can store different types of values.".to_string(),
                options: Some(vec!["True".to_string(), "False".to_string()]),
                correct_answer: Some("true".to_string()),
                points: 1,
            },
            QuizQuestion {
                id: Uuid::new_v4(),
                kind: QuestionKind::ShortAnswer,
                text: "Explain the difference between let, const, and var in JavaScript.".to_string(),
                options: None,
                correct_answer: None,
                points: 3,
            },
        ]
    }

    /// "Finalize Quiz": builds the quiz and reports success. Stays on Review.
    pub fn finalize(&self, notifier: &dyn Notifier) -> WizardResult<Quiz> {
        if self.draft.step != WizardStep::Review {
            return Err(WizardError::NotReviewing);
        }
        let now = Utc::now();
        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: self.draft.title.clone(),
            learning_outcomes: self.draft.learning_outcomes(),
            questions: Self::preview_questions(),
            created_at: now,
            updated_at: now,
        };
        notifier.notify(
            NotificationKind::Success,
            "Quiz Created",
            Some(&format!("\"{}\" has been created successfully.", quiz.title)),
        );
        Ok(quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingNotifier;

    fn ready_wizard() -> QuizWizard {
        let mut wizard = QuizWizard::new();
        wizard.set_title("Loops and Conditionals").unwrap();
        wizard.set_outcome(0, "Apply loops to solve problems").unwrap();
        wizard
    }

    fn into_generation(wizard: &mut QuizWizard, notifier: &RecordingNotifier) -> ScheduledMessage {
        match wizard.advance(notifier).unwrap() {
            Advance::Generation { greeting } => greeting,
            other => panic!("expected Generation, got {:?}", other),
        }
    }

    #[test]
    fn blank_title_blocks_advance_with_error() {
        let notifier = RecordingNotifier::default();
        let mut wizard = QuizWizard::new();
        wizard.set_outcome(0, "Something").unwrap();
        wizard.set_title("   ").unwrap();

        assert_eq!(wizard.advance(&notifier), Err(WizardError::MissingInformation));
        assert_eq!(wizard.step(), WizardStep::Outcomes);
        assert_eq!(notifier.kinds(), vec![NotificationKind::Error]);
        assert_eq!(notifier.titles(), vec!["Missing Information".to_string()]);
    }

    #[test]
    fn all_blank_outcomes_block_advance() {
        let notifier = RecordingNotifier::default();
        let mut wizard = QuizWizard::new();
        wizard.set_title("Quiz").unwrap();
        wizard.add_outcome().unwrap();
        wizard.set_outcome(1, "  ").unwrap();

        assert!(wizard.advance(&notifier).is_err());
        assert_eq!(wizard.step(), WizardStep::Outcomes);
        assert_eq!(notifier.kinds().len(), 1);
    }

    #[test]
    fn valid_draft_moves_to_generation_and_greets_once() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        let greeting = into_generation(&mut wizard, &notifier);

        assert_eq!(wizard.step(), WizardStep::Generation);
        assert_eq!(greeting.kind, ScheduledKind::Greeting);
        assert!(greeting.content.contains("\"Loops and Conditionals\""));
        assert!(wizard.draft().transcript.is_empty());
        assert!(notifier.kinds().is_empty());

        assert!(wizard.deliver(greeting.ticket, greeting.content.clone()));
        let transcript = &wizard.draft().transcript;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, Sender::Agent);
    }

    #[test]
    fn blank_outcomes_survive_until_finalize() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        wizard.add_outcome().unwrap();
        into_generation(&mut wizard, &notifier);
        assert_eq!(wizard.draft().outcomes.len(), 2);

        wizard.advance(&notifier).unwrap();
        let quiz = wizard.finalize(&notifier).unwrap();
        assert_eq!(quiz.learning_outcomes, vec!["Apply loops to solve problems".to_string()]);
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.total_points(), 6);
    }

    #[test]
    fn generation_advances_unconditionally_and_review_stays_put() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        into_generation(&mut wizard, &notifier);

        assert_eq!(wizard.advance(&notifier), Ok(Advance::Review));
        assert_eq!(wizard.advance(&notifier), Ok(Advance::Unchanged));
        assert_eq!(wizard.step(), WizardStep::Review);
    }

    #[test]
    fn retreat_moves_back_one_step_and_stops_at_outcomes() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        into_generation(&mut wizard, &notifier);
        wizard.advance(&notifier).unwrap();

        assert_eq!(wizard.retreat(), WizardStep::Generation);
        assert_eq!(wizard.retreat(), WizardStep::Outcomes);
        assert_eq!(wizard.retreat(), WizardStep::Outcomes);
    }

    #[test]
    fn draft_is_read_only_after_step_one() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        into_generation(&mut wizard, &notifier);

        assert_eq!(wizard.set_title("Other"), Err(WizardError::NotEditable));
        assert_eq!(wizard.add_outcome(), Err(WizardError::NotEditable));
        assert_eq!(wizard.draft().title, "Loops and Conditionals");
    }

    #[test]
    fn last_outcome_cannot_be_removed() {
        let mut wizard = QuizWizard::new();
        assert_eq!(wizard.remove_outcome(0), Err(WizardError::LastOutcome));
        assert_eq!(wizard.remove_outcome(3), Err(WizardError::NoSuchOutcome(3)));
        wizard.add_outcome().unwrap();
        wizard.remove_outcome(0).unwrap();
        assert_eq!(wizard.draft().outcomes.len(), 1);
    }

    #[test]
    fn send_blocks_until_reply_is_delivered() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        into_generation(&mut wizard, &notifier);

        wizard.set_input("Which question formats work best?");
        let reply = wizard.send().unwrap().expect("non-blank input is sent");
        assert_eq!(reply.kind, ScheduledKind::Reply);
        assert!(reply.content.contains("mix of question formats"));
        assert!(wizard.is_waiting());
        assert_eq!(wizard.input(), "");

        // The draft input stays editable while waiting.
        wizard.set_input("follow-up");
        assert_eq!(wizard.send(), Err(WizardError::AwaitingReply));
        assert_eq!(wizard.input(), "follow-up");

        assert!(wizard.deliver(reply.ticket, reply.content.clone()));
        assert!(!wizard.is_waiting());
        let senders: Vec<Sender> = wizard.draft().transcript.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Agent]);
    }

    #[test]
    fn blank_input_is_ignored() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        into_generation(&mut wizard, &notifier);
        wizard.set_input("   ");
        assert_eq!(wizard.send(), Ok(None));
        assert!(wizard.draft().transcript.is_empty());
        assert!(!wizard.is_waiting());
    }

    #[test]
    fn chat_is_closed_outside_generation() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        wizard.set_input("What about objectives?");
        assert_eq!(wizard.send(), Err(WizardError::ChatClosed));
        assert_eq!(wizard.input(), "What about objectives?");

        into_generation(&mut wizard, &notifier);
        wizard.advance(&notifier).unwrap();
        assert_eq!(wizard.send(), Err(WizardError::ChatClosed));
        assert!(wizard.draft().transcript.is_empty());
    }

    #[test]
    fn confirmed_reset_restores_initial_draft() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        let greeting = into_generation(&mut wizard, &notifier);
        wizard.deliver(greeting.ticket, greeting.content);
        wizard.set_input("hi");
        let reply = wizard.send().unwrap().unwrap();

        assert_eq!(wizard.request_reset(), RESET_PROMPT);
        assert!(wizard.resolve_reset(Decision::Confirmed));

        assert_eq!(wizard.step(), WizardStep::Outcomes);
        assert_eq!(wizard.draft().outcomes, vec![String::new()]);
        assert!(wizard.draft().title.is_empty());
        assert!(wizard.draft().transcript.is_empty());
        assert!(!wizard.is_waiting());
        // A reply that was in flight belongs to the discarded draft.
        assert!(!wizard.deliver(reply.ticket, reply.content));
        assert!(wizard.draft().transcript.is_empty());
    }

    #[test]
    fn declined_reset_leaves_everything_untouched() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        into_generation(&mut wizard, &notifier);
        let before = wizard.draft().clone();

        wizard.request_reset();
        assert_eq!(wizard.pending_confirmation(), Some(RESET_PROMPT));
        assert!(!wizard.resolve_reset(Decision::Declined));
        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.pending_confirmation(), None);
    }

    #[test]
    fn reset_without_request_does_nothing() {
        let mut wizard = ready_wizard();
        assert!(!wizard.resolve_reset(Decision::Confirmed));
        assert_eq!(wizard.draft().title, "Loops and Conditionals");
    }

    #[test]
    fn restarting_the_conversation_drops_stale_greeting() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        let first = into_generation(&mut wizard, &notifier);
        wizard.retreat();
        let second = into_generation(&mut wizard, &notifier);

        assert!(!wizard.deliver(first.ticket, first.content));
        assert!(wizard.deliver(second.ticket, second.content));
        assert_eq!(wizard.draft().transcript.len(), 1);
    }

    #[test]
    fn finalize_requires_review_and_reports_success() {
        let notifier = RecordingNotifier::default();
        let mut wizard = ready_wizard();
        assert_eq!(wizard.finalize(&notifier), Err(WizardError::NotReviewing));

        into_generation(&mut wizard, &notifier);
        wizard.advance(&notifier).unwrap();
        let quiz = wizard.finalize(&notifier).unwrap();

        assert_eq!(quiz.title, "Loops and Conditionals");
        assert_eq!(wizard.step(), WizardStep::Review);
        assert_eq!(notifier.kinds(), vec![NotificationKind::Success]);
        assert_eq!(notifier.titles(), vec!["Quiz Created".to_string()]);
    }

    #[test]
    fn step_metadata_is_ordered() {
        assert!(WizardStep::Outcomes < WizardStep::Generation);
        assert_eq!(WizardStep::Review.number(), 3);
        assert_eq!(WizardStep::Generation.label(), "Generate Content");
        assert_eq!(WizardStep::Outcomes.previous(), None);
    }
}
