use std::sync::Arc;

use anyhow::Result;

use estateforge_chat::app::App;
use estateforge_chat::config::Config;
use estateforge_chat::gemini::GeminiClient;
use estateforge_chat::tui::{self, EventHandler, Tui};
use estateforge_chat::{handler, logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best-effort; the app runs fine without a writable state dir
    let _ = logging::init();

    let config = Config::load().unwrap_or_default();
    let client = GeminiClient::new(
        &config.api_base(),
        // A missing key is not fatal here: the probe fails and the widget
        // runs in its disconnected state with the warning banner.
        &config.api_key().unwrap_or_default(),
        &config.model(),
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(Arc::new(client));

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, events: &mut EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await,
            None => break,
        }
    }
    Ok(())
}
