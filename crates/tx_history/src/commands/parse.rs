use {
    anyhow::{anyhow, Context, Result},
    std::sync::Arc,
    tx_history::{
        assembler::ParsedTransactionEntity,
        config::Config,
        error::ParseFailure,
        fetcher::{PreloadedSource, RpcSource, TransactionSource},
        pipeline::Pipeline,
    },
};

/// fetches the given signatures concurrently and prints the parsed entities
pub async fn parse(signatures: Vec<String>, config_path: &str) -> Result<()> {
    let cfg = Config::load(config_path).await?;
    let pipeline = Pipeline::new(RpcSource::from_config(&cfg)?, cfg.programs());
    run(&pipeline, &signatures).await
}

/// parses transactions read from `input` without contacting an rpc node
pub async fn parse_file(input: &str, config_path: &str) -> Result<()> {
    let cfg = match Config::load(config_path).await {
        Ok(cfg) => cfg,
        Err(err) => {
            log::warn!("using default config {err:#}");
            Config::default()
        }
    };
    let data = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {input}"))?;
    let source = PreloadedSource::from_json(&data)?;
    let mut signatures = source.signatures().cloned().collect::<Vec<_>>();
    signatures.sort();
    let pipeline = Pipeline::new(source, cfg.programs());
    run(&pipeline, &signatures).await
}

async fn run<S: TransactionSource + 'static>(
    pipeline: &Pipeline<S>,
    signatures: &[String],
) -> Result<()> {
    let results = futures::future::join_all(signatures.iter().map(|sig| pipeline.get(sig))).await;
    let mut failed = 0;
    for (sig, result) in signatures.iter().zip(results) {
        match result {
            Ok(entity) => print_entity(&entity)?,
            Err(err) => {
                failed += 1;
                log::error!("failed to parse tx({sig}) {err}");
            }
        }
    }
    if failed > 0 {
        return Err(anyhow!("{failed} of {} transactions failed", signatures.len()));
    }
    Ok(())
}

fn print_entity(entity: &Arc<ParsedTransactionEntity>) -> Result<()> {
    if let Some(ParseFailure::AmbiguousBalance(msg)) = &entity.failure {
        log::warn!("tx({}) has ambiguous balances {msg}", entity.id);
    }
    if let Some(time) = entity.raw.as_ref().and_then(|raw| raw.block_time_utc()) {
        log::info!("tx({}) confirmed at {time}", entity.id);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(entity).with_context(|| "failed to serialize entity")?
    );
    Ok(())
}
