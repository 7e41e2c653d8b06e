use std::sync::Arc;

use tutor_core::action::{Action, Command};
use tutor_core::model::{QuizMode, UserId};
use tutor_core::reply::Reply;

use crate::error::SessionError;
use crate::gateway::{EventKind, InboundEvent, MessageGateway};
use crate::render;
use crate::sessions::{SessionController, TaskPrompt};

/// Routes inbound events to the session controller and renders the outcome.
///
/// Every event produces exactly one reply; failures become polite retry prompts
/// and their detail only reaches the log.
#[derive(Clone)]
pub struct Conversation {
    sessions: Arc<SessionController>,
}

impl Conversation {
    #[must_use]
    pub fn new(sessions: Arc<SessionController>) -> Self {
        Self { sessions }
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionController> {
        &self.sessions
    }

    /// Handle `event` and hand the reply to `gateway`. A failed delivery is logged
    /// and otherwise ignored; nothing is retried.
    pub async fn handle_and_deliver(&self, event: &InboundEvent, gateway: &dyn MessageGateway) {
        let reply = self.handle(event).await;
        if let Err(err) = gateway.deliver(event.chat_id, &reply).await {
            tracing::error!(
                user_id = %event.user_id,
                chat_id = %event.chat_id,
                error = %err,
                "failed to deliver reply"
            );
        }
    }

    /// Compute the reply for `event`.
    pub async fn handle(&self, event: &InboundEvent) -> Reply {
        match &event.kind {
            EventKind::Command(text) => match text.parse::<Command>() {
                Ok(command) => self.on_command(event, command).await,
                Err(err) => {
                    tracing::debug!(user_id = %event.user_id, error = %err, "unrecognised command");
                    Reply::text(render::HELP_TEXT)
                }
            },
            EventKind::ButtonPress(token) => match token.parse::<Action>() {
                Ok(action) => self.on_action(event.user_id, action).await,
                Err(err) => {
                    tracing::warn!(user_id = %event.user_id, token = %token, error = %err, "undecodable action token");
                    Reply::text(render::STALE_TEXT)
                }
            },
        }
    }

    async fn on_command(&self, event: &InboundEvent, command: Command) -> Reply {
        match command {
            Command::Start => match self.sessions.progress(event.user_id).await {
                Ok(view) => render::welcome(
                    event.first_name.as_deref(),
                    &self.sessions.catalog(),
                    view.cursor,
                ),
                Err(err) => failure(event.user_id, &err),
            },
            Command::Help => Reply::text(render::HELP_TEXT),
            Command::Progress => self
                .sessions
                .progress(event.user_id)
                .await
                .map(|view| render::progress(&view))
                .unwrap_or_else(|err| failure(event.user_id, &err)),
        }
    }

    async fn on_action(&self, user: UserId, action: Action) -> Reply {
        self.run_action(user, action)
            .await
            .unwrap_or_else(|err| failure(user, &err))
    }

    async fn run_action(&self, user: UserId, action: Action) -> Result<Reply, SessionError> {
        let sessions = &self.sessions;
        let reply = match action {
            Action::StartLearning => render::next_lesson(sessions.present_next_lesson(user).await?),
            Action::SelectTier(tier) => {
                sessions.reset_to_tier(user, tier).await?;
                render::next_lesson(sessions.present_next_lesson(user).await?)
            }
            Action::RequestTask(handle) => {
                task_reply(sessions.present_task(user, handle).await?, QuizMode::Lesson)
            }
            Action::RequestTest => task_reply(sessions.present_test(user).await?, QuizMode::Test),
            Action::RequestRandomTest => match sessions.present_random_task(user).await? {
                Some(view) => render::task(view, QuizMode::Drill),
                None => render::no_drill(),
            },
            Action::SubmitAnswer {
                handle,
                mode,
                choice,
            } => {
                let answer = sessions.answer_for_choice(handle, choice)?;
                let outcome = if mode.advances_progress() {
                    sessions.submit_answer(user, handle, &answer).await?
                } else {
                    sessions.check_drill_answer(user, handle, &answer).await?
                };
                render::answer(outcome, mode)
            }
            Action::AcknowledgeLesson { handle, mode } => {
                sessions.acknowledge_lesson(user, handle).await?;
                match mode {
                    QuizMode::Test => task_reply(sessions.present_test(user).await?, QuizMode::Test),
                    QuizMode::Lesson | QuizMode::Drill => {
                        render::next_lesson(sessions.present_next_lesson(user).await?)
                    }
                }
            }
        };
        Ok(reply)
    }
}

fn task_reply(prompt: TaskPrompt, mode: QuizMode) -> Reply {
    match prompt {
        TaskPrompt::Task(view) => render::task(view, mode),
        TaskPrompt::NoTask(handle) => render::no_task(handle, mode),
        TaskPrompt::Completed => render::completed(),
    }
}

fn failure(user: UserId, err: &SessionError) -> Reply {
    match err {
        SessionError::NotFound(_) | SessionError::UnknownTier(_) => {
            tracing::warn!(user_id = %user, error = %err, "stale action");
            Reply::text(render::STALE_TEXT)
        }
        _ => {
            tracing::error!(user_id = %user, error = %err, "action failed");
            Reply::text(render::RETRY_TEXT)
        }
    }
}
