use anyhow::Result;
use chrono::Local;
use std::sync::Arc;

use taskboard_client::config::Settings;
use taskboard_client::domain::TaskCollection;
use taskboard_client::logging;
use taskboard_client::services::HttpTaskStore;
use taskboard_client::view::TaskListViewModel;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        api_url = %settings.api_url,
        filter = %settings.default_filter,
        "Starting taskboard"
    );

    let store = Arc::new(HttpTaskStore::from_settings(&settings)?);

    let mut tasks = TaskCollection::new();
    let mut view = TaskListViewModel::new(store, &mut tasks).with_filter(settings.default_filter);
    view.load().await?;

    let cards = view.cards(&Local::now());
    if cards.is_empty() {
        println!("{}", view.empty_message());
    }
    for card in cards {
        println!("{card}");
    }

    Ok(())
}
