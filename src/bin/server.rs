use live_deck::{config::Config, server::App};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG) // invalidation traces are DEBUG
        .init();

    let app = App::new(Config::load());
    app.run().await?;

    Ok(())
}
