use assistants_client::OpenAiAssistants;
use bot_core::init_tracing;
use dotenvy::dotenv;
use factory_bot::FactoryBot;
use teloxide::dptree;
use teloxide::prelude::*;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    init_tracing("logs/factory-bot.log")?;

    let token = std::env::var("FACTORY_BOT_TOKEN").expect("FACTORY_BOT_TOKEN not set");
    let bot = Bot::new(token);

    let api = OpenAiAssistants::new(std::env::var("OPENAI_TOKEN").expect("OPENAI_TOKEN not set"));

    let me = bot.get_me().await?;
    let bot_username = me.user.username.clone().unwrap_or_default();

    let factory = FactoryBot::new(api, bot_username);

    info!("Factory bot started successfully");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(
            |bot: Bot, msg: Message, factory: FactoryBot<OpenAiAssistants>| async move {
                if let Err(e) = factory.handle_message(bot, msg).await {
                    error!(error = %e, "Error handling message");
                }
                respond(())
            },
        ))
        .branch(Update::filter_callback_query().endpoint(
            |bot: Bot, q: CallbackQuery, factory: FactoryBot<OpenAiAssistants>| async move {
                if let Err(e) = factory.handle_callback(bot, q).await {
                    error!(error = %e, "Error handling callback");
                }
                respond(())
            },
        ));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![factory])
        .default_handler(|_| async {})
        .build()
        .dispatch()
        .await;

    Ok(())
}
