//! services/dashboard/src/app/console.rs
//!
//! This is the main entry point and control loop for a console session.
//! It reads one JSON command per line, applies it to the session state and
//! writes one JSON event per line. Deferred work (agent messages, notification
//! expiry) runs in spawned tasks that report back through the same event channel.

use crate::app::{
    catalog_ops::{self, Stored},
    dashboard,
    protocol::{Command, DashboardEvent, WizardView},
    state::{AppState, PendingDelete, SessionState},
    wizard_task::spawn_agent_message,
};
use crate::error::DashboardError;
use futures::StreamExt;
use instructor_core::catalog;
use instructor_core::confirm::Decision;
use instructor_core::domain::{ActivityItem, ActivityKind, Course, Student};
use instructor_core::forms::{FormError, FormResult, Submission};
use instructor_core::wizard::{Advance, WizardError, WizardResult};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

type Events = mpsc::UnboundedSender<DashboardEvent>;

/// Runs one console session until `quit` or end of input.
pub async fn run_console<R, W>(app_state: Arc<AppState>, input: R, output: W) -> Result<(), DashboardError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    info!("Console session started.");
    let (events, event_rx) = mpsc::unbounded_channel();
    let writer = spawn_writer(output, event_rx);

    let shutdown = CancellationToken::new();
    let forwarder = spawn_notification_forwarder(&app_state, events.clone(), shutdown.clone());

    let session_state_lock = Arc::new(Mutex::new(SessionState::new(&app_state.config)));
    let mut lines = FramedRead::new(input, LinesCodec::new());

    // --- 1. Main Command Loop ---
    let outcome = loop {
        let line = match lines.next().await {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                error!("Failed to read a command line: {:?}", e);
                break Err(DashboardError::from(e));
            }
            None => {
                info!("Console input closed.");
                break Ok(());
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match serde_json::from_str::<Command>(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("Malformed command ignored: {}", e);
                emit(&events, DashboardEvent::Error {
                    message: format!("Unrecognized command: {}", e),
                });
                continue;
            }
        };

        match handle_command(command, &app_state, &session_state_lock, &events).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break Ok(()),
            Err(e) => {
                error!("Command failed: {:?}", e);
                emit(&events, DashboardEvent::Error { message: e.to_string() });
            }
        }
    };

    // --- 2. Cleanup ---
    session_state_lock.lock().await.conversation_token.cancel();
    shutdown.cancel();
    if let Err(e) = forwarder.await {
        warn!("Notification forwarder ended abnormally: {:?}", e);
    }
    app_state.notifications.clear();
    drop(events);

    let written = writer
        .await
        .map_err(|e| DashboardError::Internal(format!("event writer panicked: {}", e)))?;
    info!("Console session closed.");
    outcome.and(written)
}

fn spawn_writer<W>(
    mut output: W,
    mut event_rx: mpsc::UnboundedReceiver<DashboardEvent>,
) -> JoinHandle<Result<(), DashboardError>>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let mut line = serde_json::to_string(&event)?;
            line.push('\n');
            output.write_all(line.as_bytes()).await?;
            output.flush().await?;
        }
        Ok::<(), DashboardError>(())
    })
}

/// Mirrors every change of the live notification set onto the console.
fn spawn_notification_forwarder(
    app_state: &AppState,
    events: Events,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let mut changes = app_state.notifications.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let live = changes.borrow_and_update().clone();
                    if events.send(DashboardEvent::Notifications { live }).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Notification forwarder stopped.");
    })
}

fn emit(events: &Events, event: DashboardEvent) {
    if events.send(event).is_err() {
        warn!("Event dropped; the console writer is gone.");
    }
}

/// Applies a single command to the session.
///
/// Rejected operations are reported as `error` events and leave the session
/// usable. Only repository failures are returned as `Err`.
pub async fn handle_command(
    command: Command,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    events: &Events,
) -> Result<Flow, DashboardError> {
    let repo = app_state.catalog.as_ref();
    let notifier = &app_state.notifications;

    match command {
        Command::Quit => {
            info!("Quit requested.");
            emit(events, DashboardEvent::Goodbye);
            return Ok(Flow::Quit);
        }
        Command::Dashboard => {
            let session = session_state_lock.lock().await;
            let summary = dashboard::summary(repo, &session.session).await?;
            emit(events, DashboardEvent::Dashboard { summary });
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    if !session_state_lock.lock().await.session.is_authenticated() {
        emit(events, DashboardEvent::Error {
            message: "You are signed out.".to_string(),
        });
        return Ok(Flow::Continue);
    }

    match command {
        Command::Quit | Command::Dashboard => {}
        Command::Logout => {
            let mut session = session_state_lock.lock().await;
            session.restart_conversation();
            session.drop_pending_reset();
            session.drop_pending_delete();
            session.session.logout();
            info!("Instructor signed out.");
            let summary = dashboard::summary(repo, &session.session).await?;
            emit(events, DashboardEvent::Dashboard { summary });
        }

        // --- Courses ---
        Command::ListCourses { query } => {
            let courses = catalog_ops::search::<Course>(repo, &query).await?;
            emit(events, DashboardEvent::Courses { courses });
        }
        Command::SaveCourse { form } => {
            if save_record(app_state, form.submit(notifier), events).await? {
                let courses = repo.list_courses().await?;
                emit(events, DashboardEvent::Courses { courses });
            }
        }
        Command::DeleteCourse { id } => {
            request_delete::<Course>(app_state, session_state_lock, id, PendingDelete::Course(id), events)
                .await?;
        }

        // --- Students ---
        Command::ListStudents { query } => {
            let students = catalog_ops::search::<Student>(repo, &query).await?;
            emit(events, DashboardEvent::Students { students });
        }
        Command::SaveStudent { form } => {
            if save_record(app_state, form.submit(notifier), events).await? {
                let students = repo.list_students().await?;
                emit(events, DashboardEvent::Students { students });
            }
        }
        Command::DeleteStudent { id } => {
            request_delete::<Student>(app_state, session_state_lock, id, PendingDelete::Student(id), events)
                .await?;
        }

        // --- Confirmation answers ---
        Command::Confirm => resolve_pending(Decision::Confirmed, app_state, session_state_lock, events).await?,
        Command::Decline => resolve_pending(Decision::Declined, app_state, session_state_lock, events).await?,

        Command::Dismiss { id } => {
            if !notifier.dismiss(id) {
                debug!("Dismiss for unknown notification {} ignored.", id);
            }
        }

        // --- Quiz wizard ---
        Command::Wizard => {
            let session = session_state_lock.lock().await;
            emit_wizard(events, &session);
        }
        Command::WizardSetTitle { title } => {
            let mut session = session_state_lock.lock().await;
            let result = session.wizard.set_title(title);
            report(events, result);
            emit_wizard(events, &session);
        }
        Command::WizardAddOutcome => {
            let mut session = session_state_lock.lock().await;
            let result = session.wizard.add_outcome();
            report(events, result);
            emit_wizard(events, &session);
        }
        Command::WizardSetOutcome { index, value } => {
            let mut session = session_state_lock.lock().await;
            let result = session.wizard.set_outcome(index, value);
            report(events, result);
            emit_wizard(events, &session);
        }
        Command::WizardRemoveOutcome { index } => {
            let mut session = session_state_lock.lock().await;
            let result = session.wizard.remove_outcome(index);
            report(events, result);
            emit_wizard(events, &session);
        }
        Command::WizardContinue => {
            let mut session = session_state_lock.lock().await;
            match session.wizard.advance(notifier) {
                Ok(Advance::Generation { greeting }) => {
                    info!("Wizard moved to content generation.");
                    let token = session.restart_conversation();
                    spawn_agent_message(
                        app_state.clone(),
                        session_state_lock.clone(),
                        greeting,
                        token,
                        events.clone(),
                    );
                }
                Ok(Advance::Review) => info!("Wizard moved to review."),
                Ok(Advance::Unchanged) => {}
                Err(e) => report::<()>(events, Err(e)),
            }
            emit_wizard(events, &session);
        }
        Command::WizardBack => {
            let mut session = session_state_lock.lock().await;
            let step = session.wizard.retreat();
            debug!("Wizard back to {:?}.", step);
            emit_wizard(events, &session);
        }
        Command::WizardInput { text } => {
            let mut session = session_state_lock.lock().await;
            session.wizard.set_input(text);
        }
        Command::WizardSend => {
            let mut session = session_state_lock.lock().await;
            match session.wizard.send() {
                Ok(Some(reply)) => {
                    spawn_agent_message(
                        app_state.clone(),
                        session_state_lock.clone(),
                        reply,
                        session.conversation_token.clone(),
                        events.clone(),
                    );
                }
                Ok(None) => debug!("Blank chat message ignored."),
                Err(e) => report::<()>(events, Err(e)),
            }
            emit_wizard(events, &session);
        }
        Command::WizardReset => {
            let mut session = session_state_lock.lock().await;
            session.drop_pending_delete();
            let prompt = session.wizard.request_reset();
            emit(events, DashboardEvent::ConfirmationRequested { prompt });
        }
        Command::WizardFinalize => {
            let quiz = {
                let session = session_state_lock.lock().await;
                match session.wizard.finalize(notifier) {
                    Ok(quiz) => quiz,
                    Err(e) => {
                        report::<()>(events, Err(e));
                        return Ok(Flow::Continue);
                    }
                }
            };
            repo.save_quiz(quiz.clone()).await?;
            repo.record_activity(ActivityItem::new(
                ActivityKind::Quiz,
                "Quiz Created",
                format!("You created \"{}\"", quiz.title),
            ))
            .await?;
            info!("Quiz {} finalized.", quiz.id);
            emit(events, DashboardEvent::QuizFinalized { quiz });
        }
    }
    Ok(Flow::Continue)
}

fn emit_wizard(events: &Events, session: &SessionState) {
    emit(events, DashboardEvent::Wizard {
        wizard: WizardView::from(&session.wizard),
    });
}

/// Turns a rejected wizard operation into an `error` event. Missing
/// information is already shown as a notification.
fn report<T>(events: &Events, result: WizardResult<T>) {
    match result {
        Ok(_) | Err(WizardError::MissingInformation) => {}
        Err(e) => emit(events, DashboardEvent::Error { message: e.to_string() }),
    }
}

/// Returns true when the record was stored.
async fn save_record<T: Stored>(
    app_state: &AppState,
    submission: FormResult<Submission<T>>,
    events: &Events,
) -> Result<bool, DashboardError> {
    match submission {
        Ok(submission) => {
            let stored =
                catalog_ops::save(app_state.catalog.as_ref(), &app_state.notifications, submission).await?;
            Ok(stored)
        }
        Err(FormError::Invalid(errors)) => {
            emit(events, DashboardEvent::FormErrors { errors });
            Ok(false)
        }
        Err(e) => {
            emit(events, DashboardEvent::Error { message: e.to_string() });
            Ok(false)
        }
    }
}

async fn request_delete<T: Stored>(
    app_state: &AppState,
    session_state_lock: &Arc<Mutex<SessionState>>,
    id: Uuid,
    pending: PendingDelete,
    events: &Events,
) -> Result<(), DashboardError> {
    let records = T::load(app_state.catalog.as_ref()).await?;
    if catalog::find(&records, id).is_none() {
        emit(events, DashboardEvent::Error {
            message: format!("{} {} not found.", T::KIND, id),
        });
        return Ok(());
    }
    let mut session = session_state_lock.lock().await;
    session.drop_pending_reset();
    let prompt = session.deletes.request(T::DELETE_PROMPT, pending).prompt;
    emit(events, DashboardEvent::ConfirmationRequested { prompt });
    Ok(())
}

async fn resolve_pending(
    decision: Decision,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    events: &Events,
) -> Result<(), DashboardError> {
    let repo = app_state.catalog.as_ref();
    let mut session = session_state_lock.lock().await;

    if session.deletes.pending().is_some() {
        let action = session.deletes.resolve(decision);
        drop(session);
        match action {
            Some(PendingDelete::Course(id)) => {
                catalog_ops::delete::<Course>(repo, id).await?;
                emit(events, DashboardEvent::Courses { courses: repo.list_courses().await? });
            }
            Some(PendingDelete::Student(id)) => {
                catalog_ops::delete::<Student>(repo, id).await?;
                emit(events, DashboardEvent::Students { students: repo.list_students().await? });
            }
            None => debug!("Delete declined."),
        }
        return Ok(());
    }

    if session.wizard.pending_confirmation().is_some() {
        if session.wizard.resolve_reset(decision) {
            session.restart_conversation();
            info!("Quiz draft reset.");
        }
        emit_wizard(events, &session);
        return Ok(());
    }

    emit(events, DashboardEvent::Error {
        message: "Nothing is waiting for confirmation.".to_string(),
    });
    Ok(())
}
