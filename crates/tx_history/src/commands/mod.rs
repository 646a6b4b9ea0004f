use tokio::signal::unix::Signal;

pub mod config;
pub mod parse;
pub mod serve;

pub async fn handle_exit(
    mut sig_quit: Signal,
    mut sig_int: Signal,
    mut sig_term: Signal,
    finished_rx: tokio::sync::oneshot::Receiver<Option<String>>,
) -> anyhow::Result<()> {
    tokio::select! {
        _ = sig_quit.recv() => {
            log::warn!("goodbye..");
            Ok(())
        }
        _ = sig_int.recv() => {
            log::warn!("goodbye..");
            Ok(())
        }
        _ = sig_term.recv() => {
            log::warn!("goodbye..");
            Ok(())
        }
        msg = finished_rx => {
            match msg {
                // service encountered error
                Ok(Some(msg)) => Err(anyhow::anyhow!(msg)),
                Ok(None) => Ok(()),
                Err(err) => Err(anyhow::anyhow!(err)),
            }
        }
    }
}
