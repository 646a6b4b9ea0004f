use {
    super::handle_exit,
    anyhow::Result,
    std::sync::Arc,
    tokio::signal::unix::{signal, SignalKind},
    tx_history::{
        config::Config,
        fetcher::RpcSource,
        pipeline::{EntityStore, Pipeline},
        services::history_api::serve_api,
    },
};

pub async fn serve(listen_url: Option<String>, config_path: &str) -> Result<()> {
    let cfg = Config::load(config_path).await?;
    let listen_url = listen_url.unwrap_or_else(|| cfg.listen_url.clone());

    let store = if !cfg.store_snapshot.is_empty()
        && tokio::fs::try_exists(&cfg.store_snapshot)
            .await
            .unwrap_or(false)
    {
        Arc::new(EntityStore::load(&cfg.store_snapshot)?)
    } else {
        Arc::new(EntityStore::new())
    };
    let pipeline = Arc::new(Pipeline::with_store(
        RpcSource::from_config(&cfg)?,
        cfg.programs(),
        store.clone(),
    ));

    let (finished_tx, finished_rx) = tokio::sync::oneshot::channel();
    tokio::task::spawn(async move {
        let msg = serve_api(&listen_url, pipeline)
            .await
            .err()
            .map(|err| format!("{err:#}"));
        if finished_tx.send(msg).is_err() {
            log::error!("failed to notify api exit");
        }
    });

    let result = handle_exit(
        signal(SignalKind::quit())?,
        signal(SignalKind::interrupt())?,
        signal(SignalKind::terminate())?,
        finished_rx,
    )
    .await;

    if !cfg.store_snapshot.is_empty() {
        store.save(&cfg.store_snapshot)?;
        log::info!("saved {} entities to {}", store.len(), cfg.store_snapshot);
    }
    result
}
