pub mod catalog;
pub mod confirm;
pub mod domain;
pub mod forms;
pub mod ports;
pub mod responder;
pub mod wizard;

pub use catalog::Record;
pub use confirm::{Confirmation, ConfirmationGate, Decision};
pub use domain::{
    ActivityItem, ActivityKind, ChatMessage, Course, DeliveryMethod, Notification,
    NotificationKind, QuestionKind, Quiz, QuizQuestion, Sender, Session, Student, StudentLevel,
    User,
};
pub use forms::{CourseForm, FieldErrors, FormError, StudentForm, Submission};
pub use ports::{CatalogRepository, Notifier, PortError, PortResult};
pub use wizard::{Advance, QuizDraft, QuizWizard, ScheduledKind, ScheduledMessage, WizardError, WizardStep};
