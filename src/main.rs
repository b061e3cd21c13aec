use anyhow::Result;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use fantasmas::app::App;
use fantasmas::config::Settings;
use fantasmas::constants::LOOP_TIME;
use fantasmas::formatter::CustomFormatter;

fn setup_tracing(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.log_filter)?;
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(true)
        .event_format(CustomFormatter)
        .with_env_filter(filter)
        .finish()
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

pub fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    setup_tracing(&settings)?;

    let mut app = App::new(&settings)?;

    info!(loop_time = ?LOOP_TIME, "Starting game loop");
    while app.run() {}

    Ok(())
}
