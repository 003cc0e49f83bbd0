//! Chat bot: referral commands plus free text proxied to a fixed assistant.
//!
//! Commands: `/start [referrer_id]`, `/ref`, `/refstat`, `/stat`. Any other
//! text is one conversational turn: persist the inbound message, run the
//! assistant over the user's thread, persist and send the reply.

use anyhow::Result;
use assistants_client::{AssistantsApi, RunPoller};
use storage::{DialogRecord, DialogRepository, ReferralRepository};
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, instrument};

pub mod format;
pub mod thread_registry;

pub use thread_registry::ThreadRegistry;

const WELCOME_TEXT: &str =
    "Would you like to pick a case from the suggested list, or take a random one?";
const PLACEHOLDER_TEXT: &str = "✍️ one minute, writing a reply ...";
const APOLOGY_TEXT: &str = "Oops... something went wrong :(";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Register and begin; an optional argument names the referrer.
    Start(String),
    /// Personal referral link.
    Ref,
    /// Number of users referred by the sender.
    Refstat,
    /// Total number of registered users.
    Stat,
}

#[derive(Clone)]
pub struct ChatBot<A: AssistantsApi + Clone> {
    bot_username: String,
    bot_url: String,
    assistant_id: String,
    poller: RunPoller<A>,
    threads: ThreadRegistry<A>,
    dialogs: DialogRepository,
    referrals: ReferralRepository,
}

impl<A> ChatBot<A>
where
    A: AssistantsApi + Clone + 'static,
{
    pub fn new(
        bot_username: String,
        bot_url: String,
        assistant_id: String,
        api: A,
        dialogs: DialogRepository,
        referrals: ReferralRepository,
    ) -> Self {
        Self {
            bot_username,
            bot_url,
            assistant_id,
            poller: RunPoller::new(api.clone()),
            threads: ThreadRegistry::new(api),
            dialogs,
            referrals,
        }
    }

    #[instrument(skip(self, bot, msg))]
    pub async fn handle_message(&self, bot: Bot, msg: Message) -> Result<()> {
        let Some(user) = msg.from.as_ref() else {
            return Ok(());
        };
        let user_id = user.id.0 as i64;
        let Some(text) = msg.text() else {
            return Ok(());
        };

        match Command::parse(text, &self.bot_username) {
            Ok(Command::Start(payload)) => self.cmd_start(&bot, &msg, user_id, &payload).await,
            Ok(Command::Ref) => {
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "Here is your link for inviting new users: {}?start={}",
                        self.bot_url, user_id
                    ),
                )
                .await?;
                Ok(())
            }
            Ok(Command::Refstat) => {
                let count = self.referrals.count_referrals(user_id).await?;
                bot.send_message(
                    msg.chat.id,
                    format!("Users registered through your referral link: {}", count),
                )
                .await?;
                Ok(())
            }
            Ok(Command::Stat) => {
                let count = self.referrals.count_users().await?;
                bot.send_message(msg.chat.id, format!("Total registered users: {}", count))
                    .await?;
                Ok(())
            }
            Err(_) => self.forward_to_assistant(&bot, &msg, user_id, text).await,
        }
    }

    async fn cmd_start(
        &self,
        bot: &Bot,
        msg: &Message,
        user_id: i64,
        payload: &str,
    ) -> Result<()> {
        self.referrals.ensure_user(user_id).await?;
        self.record_referral(user_id, payload).await?;

        let keyboard = KeyboardMarkup::new([
            [KeyboardButton::new("Let's go through a random case")],
            [KeyboardButton::new("Suggest a list of 10 random cases")],
        ])
        .resize_keyboard()
        .input_field_placeholder("Choose how to pick a case");

        bot.send_message(msg.chat.id, WELCOME_TEXT)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    /// Applies the `/start` referral parameter. Non-numeric ids, self
    /// reference, unregistered referrers, and an already-set referrer are all
    /// silently ignored.
    async fn record_referral(&self, user_id: i64, payload: &str) -> Result<()> {
        if let Ok(referrer_id) = payload.trim().parse::<i64>() {
            self.referrals.record_referral(user_id, referrer_id).await?;
        }
        Ok(())
    }

    async fn forward_to_assistant(
        &self,
        bot: &Bot,
        msg: &Message,
        user_id: i64,
        text: &str,
    ) -> Result<()> {
        info!(user_id, message_content = %text, "Forwarding message to assistant");

        let placeholder = bot
            .send_message(msg.chat.id, PLACEHOLDER_TEXT)
            .reply_markup(ReplyMarkup::kb_remove())
            .await?;

        let reply = self.assistant_reply(user_id, text).await?;

        bot.delete_message(msg.chat.id, placeholder.id).await?;
        match reply {
            Some(html) => {
                bot.send_message(msg.chat.id, html)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            None => {
                bot.send_message(msg.chat.id, APOLOGY_TEXT).await?;
            }
        }
        Ok(())
    }

    /// One conversational turn against the fixed assistant. Persists the
    /// inbound row, runs the poller over the user's (lazily created) thread,
    /// and on success persists and returns the HTML-formatted reply.
    /// A failed or timed-out run yields `None`; the caller sends the apology.
    pub async fn assistant_reply(&self, user_id: i64, text: &str) -> Result<Option<String>> {
        self.referrals.ensure_user(user_id).await?;
        let thread_id = self.threads.get_or_create(user_id).await?;

        self.dialogs
            .save(&DialogRecord::new(user_id, text, true))
            .await?;

        match self.poller.run_turn(&thread_id, &self.assistant_id, text).await {
            Ok(reply) => {
                let html = format::markdown_to_html(&reply);
                self.dialogs
                    .save(&DialogRecord::new(user_id, html.clone(), false))
                    .await?;
                Ok(Some(html))
            }
            Err(e) => {
                error!(user_id, error = %e, "assistant turn failed");
                Ok(None)
            }
        }
    }
}
