//! Telegram transport: long polling in, `sendMessage` with inline keyboards out.

use std::sync::Arc;

use async_trait::async_trait;
use services::{Conversation, DeliveryError, InboundEvent, MessageGateway};
use teloxide::Bot;
use teloxide::RequestError;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::Requester;
use teloxide::types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update};
use tutor_core::model::{ChatId, UserId};
use tutor_core::reply::Reply;

/// Telegram refuses callback data longer than this many bytes.
const CALLBACK_DATA_LIMIT: usize = 64;

pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn keyboard(reply: &Reply) -> Result<InlineKeyboardMarkup, DeliveryError> {
    let rows = reply
        .keyboard
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    let data = button.action.to_string();
                    if data.len() > CALLBACK_DATA_LIMIT {
                        return Err(DeliveryError::Rejected(format!(
                            "callback data for {:?} is {} bytes, limit is {CALLBACK_DATA_LIMIT}",
                            button.label,
                            data.len()
                        )));
                    }
                    Ok(InlineKeyboardButton::callback(button.label.clone(), data))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(InlineKeyboardMarkup::new(rows))
}

#[async_trait]
impl MessageGateway for TelegramGateway {
    async fn deliver(&self, chat_id: ChatId, reply: &Reply) -> Result<(), DeliveryError> {
        let mut request = self
            .bot
            .send_message(teloxide::types::ChatId(chat_id.value()), reply.text.clone());
        if reply.has_buttons() {
            request = request.reply_markup(keyboard(reply)?);
        }
        request
            .await
            .map(|_| ())
            .map_err(|err| DeliveryError::Transport(err.to_string()))
    }
}

async fn on_message(
    msg: Message,
    conversation: Conversation,
    gateway: Arc<TelegramGateway>,
) -> Result<(), RequestError> {
    let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
        return Ok(());
    };
    let event = InboundEvent::command(UserId::new(user.id.0), ChatId::new(msg.chat.id.0), text)
        .with_first_name(user.first_name.clone());
    conversation
        .handle_and_deliver(&event, gateway.as_ref())
        .await;
    Ok(())
}

async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    conversation: Conversation,
    gateway: Arc<TelegramGateway>,
) -> Result<(), RequestError> {
    // Stops the client-side spinner; failure here only costs cosmetics.
    if let Err(err) = bot.answer_callback_query(query.id.clone()).await {
        tracing::warn!(error = %err, "failed to answer callback query");
    }

    let (Some(data), Some(message)) = (query.data.as_deref(), query.message.as_ref()) else {
        return Ok(());
    };
    let event = InboundEvent::button(
        UserId::new(query.from.id.0),
        ChatId::new(message.chat().id.0),
        data,
    )
    .with_first_name(query.from.first_name.clone());
    conversation
        .handle_and_deliver(&event, gateway.as_ref())
        .await;
    Ok(())
}

/// Poll Telegram until Ctrl-C.
pub async fn run(bot: Bot, conversation: Conversation) {
    let gateway = Arc::new(TelegramGateway::new(bot.clone()));
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    tracing::info!("polling for updates");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![conversation, gateway])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::action::Action;
    use tutor_core::model::{LessonHandle, QuizMode};
    use tutor_core::reply::Button;

    #[test]
    fn keyboard_keeps_row_layout() {
        let reply = Reply::text("menu")
            .with_button(Button::new("Start", Action::StartLearning))
            .with_row(vec![
                Button::new("Test", Action::RequestTest),
                Button::new("Random", Action::RequestRandomTest),
            ]);
        let markup = keyboard(&reply).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[1].len(), 2);
        assert_eq!(markup.inline_keyboard[1][1].text, "Random");
    }

    #[test]
    fn oversized_callback_data_is_rejected() {
        let reply = Reply::text("task").with_button(Button::new(
            "long",
            Action::SubmitAnswer {
                handle: LessonHandle::new(usize::MAX, usize::MAX),
                mode: QuizMode::Lesson,
                choice: usize::MAX,
            },
        ));
        assert!(matches!(keyboard(&reply), Err(DeliveryError::Rejected(_))));
    }

    #[test]
    fn long_answer_label_is_accepted() {
        let label = "Строка \"object\" из-за исторической ошибки";
        let reply = Reply::text("task").with_button(Button::new(
            label,
            Action::SubmitAnswer {
                handle: LessonHandle::new(1, 12),
                mode: QuizMode::Test,
                choice: 0,
            },
        ));
        let markup = keyboard(&reply).unwrap();
        assert_eq!(markup.inline_keyboard[0][0].text, label);
    }
}
