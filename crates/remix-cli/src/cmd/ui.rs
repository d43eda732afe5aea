use crate::cmd::{load_config, runtime};
use remix_core::credentials::{CompletionCredentials, StoreCredentials};
use remix_core::pipeline::Remixer;
use remix_server::AppState;
use std::path::Path;

pub fn run(root: &Path, port: u16, no_open: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    for w in config.validate() {
        tracing::warn!("config: {}", w.message);
    }

    let remixer = Remixer::from_config(
        &config,
        StoreCredentials::from_env()?,
        CompletionCredentials::from_env()?,
    )?;
    let state = AppState::new(remixer, config.prompt.default_topic.clone());

    runtime()?.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let url = format!("http://localhost:{}", listener.local_addr()?.port());
        println!("remix UI ({} variant) → {url}", config.prompt.variant);

        tokio::select! {
            res = remix_server::serve_on(state, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
