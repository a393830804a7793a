//! services/dashboard/src/app/protocol.rs
//!
//! Defines the line protocol between the console (one JSON object per line)
//! and the dashboard.

use instructor_core::domain::{
    ActivityItem, ChatMessage, Course, Notification, Quiz, QuizQuestion, Student,
};
use instructor_core::forms::{CourseForm, FieldErrors, StudentForm};
use instructor_core::wizard::{QuizWizard, WizardStep};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Commands Sent TO the Dashboard
//=========================================================================================

/// Represents the commands a console user can send.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Shows the dashboard summary.
    Dashboard,
    Logout,

    // --- Courses ---
    ListCourses {
        #[serde(default)]
        query: String,
    },
    /// Creates a course, or updates one when `form.id` is set.
    SaveCourse { form: CourseForm },
    /// Asks for confirmation before deleting.
    DeleteCourse { id: Uuid },

    // --- Students ---
    ListStudents {
        #[serde(default)]
        query: String,
    },
    SaveStudent { form: StudentForm },
    DeleteStudent { id: Uuid },

    // --- Confirmation answers ---
    Confirm,
    Decline,

    /// Removes a notification before it expires.
    Dismiss { id: Uuid },

    // --- Quiz wizard ---
    Wizard,
    WizardSetTitle { title: String },
    WizardAddOutcome,
    WizardSetOutcome { index: usize, value: String },
    WizardRemoveOutcome { index: usize },
    /// "Continue".
    WizardContinue,
    /// "Back" (or "Edit Questions" from the review step).
    WizardBack,
    WizardInput { text: String },
    WizardSend,
    /// Asks for confirmation before clearing the draft.
    WizardReset,
    WizardFinalize,

    Quit,
}

//=========================================================================================
// Events Sent FROM the Dashboard
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub greeting: String,
    pub course_count: usize,
    pub student_count: usize,
    pub quiz_count: usize,
    pub recent_activity: Vec<ActivityItem>,
}

/// Everything a client needs to draw the wizard.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WizardView {
    pub step: WizardStep,
    pub step_number: u8,
    pub step_label: &'static str,
    pub title: String,
    pub outcomes: Vec<String>,
    pub transcript: Vec<ChatMessage>,
    pub input: String,
    pub waiting: bool,
    pub pending_confirmation: Option<&'static str>,
    /// Only filled on the review step.
    pub preview: Option<Vec<QuizQuestion>>,
}

impl From<&QuizWizard> for WizardView {
    fn from(wizard: &QuizWizard) -> Self {
        let draft = wizard.draft();
        let preview = (draft.step == WizardStep::Review).then(QuizWizard::preview_questions);
        Self {
            step: draft.step,
            step_number: draft.step.number(),
            step_label: draft.step.label(),
            title: draft.title.clone(),
            outcomes: draft.outcomes.clone(),
            transcript: draft.transcript.clone(),
            input: wizard.input().to_string(),
            waiting: wizard.is_waiting(),
            pending_confirmation: wizard.pending_confirmation(),
            preview,
        }
    }
}

/// Represents the events the dashboard writes to the console.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    Dashboard { summary: DashboardSummary },
    Courses { courses: Vec<Course> },
    Students { students: Vec<Student> },
    Wizard { wizard: WizardView },
    /// The full live set, sent whenever it changes.
    Notifications { live: Vec<Notification> },
    ConfirmationRequested { prompt: &'static str },
    FormErrors { errors: FieldErrors },
    QuizFinalized { quiz: Quiz },
    /// Reports a rejected command; the session continues.
    Error { message: String },
    Goodbye,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_tagged_json() {
        let cmd: Command = serde_json::from_str(r#"{"type":"wizard_set_title","title":"Loops"}"#).unwrap();
        assert_eq!(cmd, Command::WizardSetTitle { title: "Loops".to_string() });

        let cmd: Command = serde_json::from_str(r#"{"type":"list_students"}"#).unwrap();
        assert_eq!(cmd, Command::ListStudents { query: String::new() });

        let cmd: Command = serde_json::from_str(
            r#"{"type":"save_course","form":{"title":"Algebra","delivery_method":"Fully Online"}}"#,
        )
        .unwrap();
        let Command::SaveCourse { form } = cmd else {
            panic!("expected save_course");
        };
        assert_eq!(form.title, "Algebra");
        assert_eq!(form.objectives, vec![String::new()]);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_str::<Command>(r#"{"type":"launch_rocket"}"#).is_err());
    }

    #[test]
    fn events_are_tagged_in_snake_case() {
        let json = serde_json::to_value(DashboardEvent::ConfirmationRequested { prompt: "Sure?" }).unwrap();
        assert_eq!(json["type"], "confirmation_requested");
        assert_eq!(json["prompt"], "Sure?");
    }

    #[test]
    fn wizard_view_reflects_initial_draft() {
        let view = WizardView::from(&QuizWizard::new());
        assert_eq!(view.step_number, 1);
        assert_eq!(view.step_label, "Define Outcomes");
        assert_eq!(view.outcomes, vec![String::new()]);
        assert!(view.preview.is_none());
        assert!(!view.waiting);
    }
}
