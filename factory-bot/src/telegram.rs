//! Telegram layer: routes messages and callback presses into the wizard
//! core and renders its results.

use anyhow::Result;
use assistants_client::AssistantsApi;
use futures::StreamExt;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{Document, InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::BotCommands;
use tracing::{error, instrument};

use crate::states::{format_assistant_list, WizardState};
use crate::wizard::FactoryBot;

const START_TEXT: &str = "This bot demonstrates creating OpenAI assistants.\n\n\
To create an assistant, send the /newassistant command";
const CANCEL_IDLE_TEXT: &str = "Nothing to cancel.\n\n\
To create an assistant, send the /newassistant command";
const CANCEL_ACTIVE_TEXT: &str = "You left the wizard.\n\n\
To fill in the form again, send the /newassistant command";
const NO_ASSISTANTS_TEXT: &str =
    "You have no assistants. To create one, send the /newassistant command";
const LIST_HEADER_TEXT: &str = "Here is the list of your assistants:";
const ENTER_DELETE_NUMBER_TEXT: &str = "Enter the number of the assistant you want to delete:";
const ENTER_ACTIVATE_NUMBER_TEXT: &str = "Enter the number of the assistant you want to talk to:";
const BAD_NUMBER_TEXT: &str = "There is no assistant with that number.";
const DELETED_TEXT: &str = "Assistant deleted!";
const DELETE_CANCELLED_TEXT: &str = "Assistant deletion cancelled!";
const ASK_NAME_TEXT: &str = "Please enter a name for the assistant";
const ASK_INSTRUCTIONS_TEXT: &str = "Thanks!\n\nNow enter the instruction text for the assistant";
const ASK_FILE_TEXT: &str = "Upload a knowledge base file";
const FILE_UPLOADED_TEXT: &str = "Great! The file is uploaded.";
const CREATING_TEXT: &str = "Creating the assistant...";
const CREATED_TEXT: &str = "Thanks! Your assistant is created!";
const CONVERSE_START_TEXT: &str = "You can start talking to the assistant.\n\n\
To finish the conversation, send the /stopassistant command";
const CONVERSE_STOP_TEXT: &str = "You ended the conversation with the assistant.\n\n\
To talk again, send the /startassistant command";
const THINKING_TEXT: &str = "One minute... writing a reply";
const APOLOGY_TEXT: &str = "Oops... something went wrong :(";
const ECHO_TEXT: &str = "Sorry, I didn't understand that";
const USE_BUTTONS_TEXT: &str = "Please answer with the Yes/No buttons.";

#[derive(BotCommands, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// What this bot does.
    Start,
    /// Leave the current wizard.
    Cancel,
    /// List your assistants.
    Assistants,
    /// Create a new assistant.
    Newassistant,
    /// Talk to one of your assistants.
    Startassistant,
    /// End the current conversation.
    Stopassistant,
    /// Delete one of your assistants.
    Delassistant,
}

impl<A> FactoryBot<A>
where
    A: AssistantsApi + Clone + 'static,
{
    #[instrument(skip(self, bot, msg))]
    pub async fn handle_message(&self, bot: Bot, msg: Message) -> Result<()> {
        let Some(user) = msg.from.as_ref() else {
            return Ok(());
        };
        let user_id = user.id.0 as i64;
        let command = msg
            .text()
            .and_then(|text| Command::parse(text, &self.bot_username).ok());

        match (self.state(user_id).await, command) {
            (None, Some(Command::Cancel)) => {
                bot.send_message(msg.chat.id, CANCEL_IDLE_TEXT).await?;
            }
            (Some(_), Some(Command::Cancel)) => {
                self.cancel(user_id).await;
                bot.send_message(msg.chat.id, CANCEL_ACTIVE_TEXT).await?;
            }
            (Some(WizardState::Conversing { .. }), Some(Command::Stopassistant)) => {
                self.cancel(user_id).await;
                bot.send_message(msg.chat.id, CONVERSE_STOP_TEXT).await?;
            }
            (None, Some(command)) => {
                self.handle_idle_command(&bot, &msg, user_id, command)
                    .await?;
            }
            (None, None) => {
                bot.send_message(msg.chat.id, ECHO_TEXT).await?;
            }
            (Some(state), _) => {
                self.handle_wizard_message(&bot, &msg, user_id, state)
                    .await?;
            }
        }
        Ok(())
    }

    async fn handle_idle_command(
        &self,
        bot: &Bot,
        msg: &Message,
        user_id: i64,
        command: Command,
    ) -> Result<()> {
        match command {
            Command::Start => {
                bot.send_message(msg.chat.id, START_TEXT).await?;
            }
            Command::Assistants => {
                let mine = self.owned(user_id).await?;
                if mine.is_empty() {
                    bot.send_message(msg.chat.id, NO_ASSISTANTS_TEXT).await?;
                } else {
                    bot.send_message(msg.chat.id, format_assistant_list(&mine))
                        .await?;
                }
            }
            Command::Newassistant => {
                self.begin_creation(user_id).await;
                bot.send_message(msg.chat.id, ASK_NAME_TEXT).await?;
            }
            Command::Startassistant => match self.begin_activation(user_id).await? {
                Some(mine) => {
                    bot.send_message(msg.chat.id, LIST_HEADER_TEXT).await?;
                    bot.send_message(msg.chat.id, format_assistant_list(&mine))
                        .await?;
                    bot.send_message(msg.chat.id, ENTER_ACTIVATE_NUMBER_TEXT)
                        .await?;
                }
                None => {
                    bot.send_message(msg.chat.id, NO_ASSISTANTS_TEXT).await?;
                }
            },
            Command::Delassistant => match self.begin_deletion(user_id).await? {
                Some(mine) => {
                    bot.send_message(msg.chat.id, LIST_HEADER_TEXT).await?;
                    bot.send_message(msg.chat.id, format_assistant_list(&mine))
                        .await?;
                    bot.send_message(msg.chat.id, ENTER_DELETE_NUMBER_TEXT)
                        .await?;
                }
                None => {
                    bot.send_message(msg.chat.id, NO_ASSISTANTS_TEXT).await?;
                }
            },
            // /stopassistant outside a conversation has no meaning.
            Command::Stopassistant => {
                bot.send_message(msg.chat.id, ECHO_TEXT).await?;
            }
            Command::Cancel => unreachable!("cancel is handled before dispatch"),
        }
        Ok(())
    }

    async fn handle_wizard_message(
        &self,
        bot: &Bot,
        msg: &Message,
        user_id: i64,
        state: WizardState,
    ) -> Result<()> {
        match state {
            WizardState::FillName => match msg.text() {
                Some(name) => {
                    self.submit_name(user_id, name).await;
                    bot.send_message(msg.chat.id, ASK_INSTRUCTIONS_TEXT).await?;
                }
                None => {
                    bot.send_message(msg.chat.id, ASK_NAME_TEXT).await?;
                }
            },
            WizardState::FillInstructions { name } => match msg.text() {
                Some(instructions) => {
                    self.submit_instructions(user_id, name, instructions).await;
                    bot.send_message(msg.chat.id, ASK_FILE_TEXT).await?;
                }
                None => {
                    bot.send_message(msg.chat.id, ASK_FILE_TEXT).await?;
                }
            },
            WizardState::UploadFile { name, instructions } => {
                let file = match msg.document() {
                    Some(doc) if doc.file.size > 0 => {
                        let downloaded = download_document(bot, doc).await?;
                        bot.send_message(msg.chat.id, FILE_UPLOADED_TEXT).await?;
                        Some(downloaded)
                    }
                    _ => None,
                };
                bot.send_message(msg.chat.id, CREATING_TEXT).await?;

                match self
                    .complete_creation(user_id, name, instructions, file)
                    .await
                {
                    Ok(_) => {
                        bot.send_message(msg.chat.id, CREATED_TEXT).await?;
                    }
                    Err(e) => {
                        error!(user_id, error = %e, "assistant creation failed");
                        self.cancel(user_id).await;
                        bot.send_message(msg.chat.id, APOLOGY_TEXT).await?;
                    }
                }
            }
            WizardState::DeleteEnterNumber { assistants } => {
                let input = msg.text().unwrap_or_default();
                match self
                    .choose_deletion_target(user_id, &assistants, input)
                    .await
                {
                    Some(target) => {
                        let keyboard = InlineKeyboardMarkup::new([[
                            InlineKeyboardButton::callback("Yes", "yes"),
                            InlineKeyboardButton::callback("No", "no"),
                        ]]);
                        bot.send_message(
                            msg.chat.id,
                            format!(
                                "Do you really want to delete assistant \"{}\"?",
                                target.name
                            ),
                        )
                        .reply_markup(keyboard)
                        .await?;
                    }
                    None => {
                        bot.send_message(msg.chat.id, BAD_NUMBER_TEXT).await?;
                    }
                }
            }
            WizardState::ConfirmDelete { .. } => {
                bot.send_message(msg.chat.id, USE_BUTTONS_TEXT).await?;
            }
            WizardState::ChooseAssistant { assistants } => {
                let input = msg.text().unwrap_or_default();
                match self
                    .choose_activation_target(user_id, &assistants, input)
                    .await?
                {
                    Some(_) => {
                        bot.send_message(msg.chat.id, CONVERSE_START_TEXT).await?;
                    }
                    None => {
                        bot.send_message(msg.chat.id, BAD_NUMBER_TEXT).await?;
                    }
                }
            }
            WizardState::Conversing {
                assistant_id,
                thread_id,
            } => {
                let Some(text) = msg.text() else {
                    return Ok(());
                };
                bot.send_message(msg.chat.id, THINKING_TEXT).await?;
                match self
                    .converse(user_id, &thread_id, &assistant_id, text)
                    .await?
                {
                    Some(reply) => {
                        bot.send_message(msg.chat.id, reply).await?;
                    }
                    None => {
                        bot.send_message(msg.chat.id, APOLOGY_TEXT).await?;
                    }
                }
            }
        }
        Ok(())
    }

    #[instrument(skip(self, bot, q))]
    pub async fn handle_callback(&self, bot: Bot, q: CallbackQuery) -> Result<()> {
        let user_id = q.from.id.0 as i64;

        if let Some(WizardState::ConfirmDelete { target }) = self.state(user_id).await {
            if let Some(data) = q.data.as_deref() {
                if data == "yes" || data == "no" {
                    let confirmed = data == "yes";
                    self.confirm_deletion(user_id, &target, confirmed).await?;

                    if let Some(message) = q.regular_message() {
                        let text = if confirmed {
                            DELETED_TEXT
                        } else {
                            DELETE_CANCELLED_TEXT
                        };
                        bot.edit_message_text(message.chat.id, message.id, text)
                            .await?;
                    }
                }
            }
        }

        bot.answer_callback_query(q.id).await?;
        Ok(())
    }
}

/// Pulls the attached document's bytes through the Telegram file API.
async fn download_document(bot: &Bot, doc: &Document) -> Result<(String, Vec<u8>)> {
    let file = bot.get_file(doc.file.id.clone()).await?;

    let mut bytes = Vec::new();
    let mut stream = Box::pin(bot.download_file_stream(&file.path));
    while let Some(chunk) = stream.next().await {
        bytes.extend_from_slice(&chunk?);
    }

    let name = doc
        .file_name
        .clone()
        .unwrap_or_else(|| "knowledge.txt".to_string());
    Ok((name, bytes))
}
