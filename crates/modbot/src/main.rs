use std::sync::Arc;

use anyhow::Context;

use modbot_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    modbot_core::logging::init("modbot")?;

    let cfg = Arc::new(Config::load()?);

    modbot_telegram::router::run_polling(cfg)
        .await
        .context("telegram bot failed")?;

    Ok(())
}
