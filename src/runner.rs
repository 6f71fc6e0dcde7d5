use crate::bot::handlers::{handle_callback, handle_command, handle_unknown_command, Command};
use crate::bot::transport::TelegramTransport;
use crate::bot::FlowDispatcher;
use crate::config::Settings;
use crate::radarr::RadarrClient;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info};

/// Run the Telegram bot until Ctrl-C.
pub async fn run_bot(settings: Arc<Settings>) {
    let backend = init_radarr(&settings);

    let bot = Bot::new(settings.telegram_token.clone());
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let dispatcher = Arc::new(FlowDispatcher::new(&settings, backend, transport));
    let handler = setup_handler();

    info!(
        "Bot is running (page size {}, {} allowed user(s))...",
        settings.max_items,
        settings.allowed_users().len()
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        // one queue per sender keeps a user's clicks in order
        .distribution_function(|upd: &Update| upd.from().map(|u| u.id))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_radarr(settings: &Settings) -> Arc<RadarrClient> {
    match RadarrClient::new(settings) {
        Ok(client) => {
            info!("Radarr client initialized for {}", settings.radarr_url());
            Arc::new(client)
        }
        Err(e) => {
            error!("Failed to initialize Radarr client: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    dptree::filter(|msg: Message| {
                        msg.text().is_some_and(|t| t.starts_with('/'))
                    })
                    .endpoint(handle_unknown_command),
                ),
        )
}
