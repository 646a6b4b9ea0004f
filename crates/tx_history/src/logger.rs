use {
    anyhow::{Context, Result},
    std::str::FromStr,
    tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter, Layer},
};

pub struct LogOpts {
    pub level: String,
    /// if not empty, json formatted logs are appended to this file
    pub file: String,
}

/// initializes logging with file+line of the log source and log-level filtration, `RUST_LOG`
/// directives are applied on top of the level
pub fn init_log(opts: LogOpts) -> Result<()> {
    let level = tracing::Level::from_str(&opts.level)
        .with_context(|| format!("invalid log level {}", opts.level))?;
    let level_filter = LevelFilter::from_level(level);

    let mut layers = Vec::with_capacity(2);
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_level(true)
            .with_line_number(true)
            .with_file(true)
            .with_filter(EnvFilter::from_default_env().add_directive(level_filter.into()))
            .boxed(),
    );
    if !opts.file.is_empty() {
        let log_file = std::fs::File::options()
            .create(true)
            .append(true)
            .open(&opts.file)
            .with_context(|| format!("failed to open log file {}", opts.file))?;
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(log_file)
                .with_filter(EnvFilter::from_default_env().add_directive(level_filter.into()))
                .boxed(),
        );
    }
    if let Err(err) = tracing_subscriber::registry().with(layers).try_init() {
        log::warn!("global subscriber already registered {err:#?}");
    }
    Ok(())
}
