//! services/dashboard/src/app/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::adapters::{mock_data, InMemoryCatalog};
use crate::app::notifications::NotificationQueue;
use crate::config::Config;
use instructor_core::confirm::{ConfirmationGate, Decision};
use instructor_core::domain::{Session, User};
use instructor_core::ports::CatalogRepository;
use instructor_core::wizard::QuizWizard;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across the Process)
//=========================================================================================

/// The shared application state, created once at startup and passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub notifications: NotificationQueue,
}

impl AppState {
    /// Builds the state from configuration, seeding the mock catalog if asked to.
    pub fn from_config(config: Arc<Config>) -> Self {
        let catalog = if config.seed_mock_data {
            let catalog = InMemoryCatalog::seeded(
                mock_data::courses(),
                mock_data::students(),
                mock_data::activity(),
            );
            info!("Catalog seeded with mock data.");
            catalog
        } else {
            InMemoryCatalog::new()
        };
        Self {
            notifications: NotificationQueue::new(config.notification_ttl),
            catalog: Arc::new(catalog),
            config,
        }
    }
}

//=========================================================================================
// SessionState (Specific to One Console Session)
//=========================================================================================

/// A delete waiting for the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Course(Uuid),
    Student(Uuid),
}

/// The state for a single, active console session.
pub struct SessionState {
    pub session: Session,
    pub wizard: QuizWizard,
    pub deletes: ConfirmationGate<PendingDelete>,
    /// Guards the agent messages of the current conversation. Replaced whenever
    /// the conversation restarts or the draft is reset.
    pub conversation_token: CancellationToken,
}

impl SessionState {
    pub fn new(config: &Config) -> Self {
        let user = User {
            id: Uuid::new_v4(),
            name: config.instructor_name.clone(),
            email: config.instructor_email.clone(),
            role: "Teacher".to_string(),
        };
        Self {
            session: Session::signed_in(user),
            wizard: QuizWizard::new(),
            deletes: ConfirmationGate::default(),
            conversation_token: CancellationToken::new(),
        }
    }

    /// Cancels every in-flight agent message and hands out a fresh token.
    pub fn restart_conversation(&mut self) -> CancellationToken {
        self.conversation_token.cancel();
        self.conversation_token = CancellationToken::new();
        self.conversation_token.clone()
    }

    /// Only one question is open at a time; asking a new one declines the other.
    pub fn drop_pending_reset(&mut self) {
        self.wizard.resolve_reset(Decision::Declined);
    }

    pub fn drop_pending_delete(&mut self) {
        self.deletes.resolve(Decision::Declined);
    }

    /// The question currently awaiting confirm/decline, if any.
    pub fn pending_prompt(&self) -> Option<&'static str> {
        self.deletes
            .pending()
            .map(|c| c.prompt)
            .or_else(|| self.wizard.pending_confirmation())
    }
}
