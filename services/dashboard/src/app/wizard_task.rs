//! services/dashboard/src/app/wizard_task.rs
//!
//! The deferred half of the quiz wizard: waits out the simulated assistant
//! latency, then delivers the scheduled agent message. Each task is tied to the
//! conversation's `CancellationToken` and exits quietly when it is cancelled.

use crate::app::{
    protocol::{DashboardEvent, WizardView},
    state::{AppState, SessionState},
};
use instructor_core::wizard::{ScheduledKind, ScheduledMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

fn delay_for(app_state: &AppState, kind: ScheduledKind) -> Duration {
    match kind {
        ScheduledKind::Greeting => app_state.config.greeting_delay,
        ScheduledKind::Reply => app_state.config.reply_delay,
    }
}

/// Spawns the task that delivers `message` after its delay.
pub fn spawn_agent_message(
    app_state: Arc<AppState>,
    session_state_lock: Arc<Mutex<SessionState>>,
    message: ScheduledMessage,
    cancellation_token: CancellationToken,
    events: mpsc::UnboundedSender<DashboardEvent>,
) -> JoinHandle<()> {
    let delay = delay_for(&app_state, message.kind);
    tokio::spawn(async move {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                debug!("Scheduled {:?} message cancelled.", message.kind);
            }
            _ = tokio::time::sleep(delay) => {
                deliver(session_state_lock, message, events).await;
            }
        }
    })
}

async fn deliver(
    session_state_lock: Arc<Mutex<SessionState>>,
    message: ScheduledMessage,
    events: mpsc::UnboundedSender<DashboardEvent>,
) {
    let view = {
        let mut session = session_state_lock.lock().await;
        if !session.wizard.deliver(message.ticket, message.content) {
            debug!("Dropped a stale {:?} message.", message.kind);
            return;
        }
        WizardView::from(&session.wizard)
    };
    info!("Agent {:?} delivered.", message.kind);
    // The console may already be gone; nothing left to tell then.
    let _ = events.send(DashboardEvent::Wizard { wizard: view });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use instructor_core::domain::Sender;
    use instructor_core::wizard::Advance;

    fn fixtures() -> (Arc<AppState>, Arc<Mutex<SessionState>>) {
        let config = Arc::new(Config::default());
        let session = SessionState::new(&config);
        (
            Arc::new(AppState::from_config(config)),
            Arc::new(Mutex::new(session)),
        )
    }

    async fn start_conversation(
        app_state: &AppState,
        session_lock: &Arc<Mutex<SessionState>>,
    ) -> ScheduledMessage {
        let mut session = session_lock.lock().await;
        session.wizard.set_title("Recursion").unwrap();
        session.wizard.set_outcome(0, "Trace recursive calls").unwrap();
        match session.wizard.advance(&app_state.notifications).unwrap() {
            Advance::Generation { greeting } => greeting,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn greeting_arrives_after_its_delay() {
        let (app_state, session_lock) = fixtures();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let greeting = start_conversation(&app_state, &session_lock).await;
        let token = session_lock.lock().await.restart_conversation();

        let handle = spawn_agent_message(app_state.clone(), session_lock.clone(), greeting, token, tx);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(session_lock.lock().await.wizard.draft().transcript.is_empty());

        handle.await.unwrap();
        let session = session_lock.lock().await;
        let transcript = &session.wizard.draft().transcript;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, Sender::Agent);
        assert!(matches!(rx.try_recv(), Ok(DashboardEvent::Wizard { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn reply_clears_waiting_condition() {
        let (app_state, session_lock) = fixtures();
        let (tx, _rx) = mpsc::unbounded_channel();
        start_conversation(&app_state, &session_lock).await;

        let (reply, token) = {
            let mut session = session_lock.lock().await;
            session.wizard.set_input("What question formats do you suggest?");
            let reply = session.wizard.send().unwrap().unwrap();
            (reply, session.conversation_token.clone())
        };
        assert!(session_lock.lock().await.wizard.is_waiting());

        spawn_agent_message(app_state, session_lock.clone(), reply, token, tx)
            .await
            .unwrap();

        let session = session_lock.lock().await;
        assert!(!session.wizard.is_waiting());
        assert_eq!(session.wizard.draft().transcript.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_message_never_lands() {
        let (app_state, session_lock) = fixtures();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let greeting = start_conversation(&app_state, &session_lock).await;
        let token = session_lock.lock().await.restart_conversation();

        let handle = spawn_agent_message(app_state, session_lock.clone(), greeting, token, tx);
        session_lock.lock().await.restart_conversation();
        handle.await.unwrap();

        assert!(session_lock.lock().await.wizard.draft().transcript.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
