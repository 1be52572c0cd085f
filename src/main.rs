mod api;
mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;

use iced::window;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

fn main() -> iced::Result {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    init_tracing();

    iced::application(app::DownloadApp::boot, app::update, app::view)
        .title("YouTube to Audio")
        .window(window::Settings {
            size: iced::Size::new(520.0, 420.0),
            ..Default::default()
        })
        .run()
}
