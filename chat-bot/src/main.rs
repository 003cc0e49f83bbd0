use assistants_client::OpenAiAssistants;
use bot_core::init_tracing;
use chat_bot::ChatBot;
use dotenvy::dotenv;
use storage::{DialogRepository, ReferralRepository};
use teloxide::prelude::*;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    init_tracing("logs/chat-bot.log")?;

    let token = std::env::var("BOT_TOKEN").expect("BOT_TOKEN not set");
    let bot = Bot::new(token);

    let api = OpenAiAssistants::new(std::env::var("OPENAI_TOKEN").expect("OPENAI_TOKEN not set"));
    let assistant_id = std::env::var("ASSISTANT_ID").expect("ASSISTANT_ID not set");
    let bot_url =
        std::env::var("BOT_URL").unwrap_or_else(|_| "https://t.me/case_study_bot".to_string());

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bot.db".to_string());
    let pool = storage::connect(&database_url).await?;
    let dialogs = DialogRepository::new(pool.clone()).await?;
    let referrals = ReferralRepository::new(pool).await?;

    let me = bot.get_me().await?;
    let bot_username = me.user.username.clone().unwrap_or_default();

    let chat_bot = ChatBot::new(bot_username, bot_url, assistant_id, api, dialogs, referrals);

    info!("Chat bot started successfully");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let chat_bot = chat_bot.clone();
        async move {
            if let Err(e) = chat_bot.handle_message(bot, msg).await {
                error!(error = %e, "Error handling message");
            }
            Ok(())
        }
    })
    .await;

    Ok(())
}
