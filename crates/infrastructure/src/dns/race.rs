//! Primary/backup race: both resolvers are queried at once and the first
//! successful response wins.
//!
//! Losing exchanges are never aborted. They run until their own deadlines
//! expire and then drop their result, so a finished loser never blocks.

use crate::dns::exchange::{ExchangeSettings, Exchanger};
use digtrace_domain::DigError;
use hickory_proto::op::Message;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Races `primary` against `backup` with the same query.
///
/// Returns the first success. When both fail, the error observed last is
/// returned.
pub async fn race_exchange(
    exchanger: Arc<dyn Exchanger>,
    primary: ExchangeSettings,
    backup: ExchangeSettings,
    query: &Message,
) -> Result<Message, DigError> {
    // Capacity covers one message per racer, so try_send never has to wait.
    let (rsp_tx, mut rsp_rx) = mpsc::channel::<Message>(2);
    let (err_tx, mut err_rx) = mpsc::channel::<DigError>(2);
    let cancel = CancellationToken::new();
    let _cancel_on_return = cancel.clone().drop_guard();

    debug!(
        primary = ?primary.remote_addr,
        backup = ?backup.remote_addr,
        "Racing primary and backup resolvers"
    );

    for settings in [primary, backup] {
        tokio::spawn(run_racer(
            Arc::clone(&exchanger),
            settings,
            query.clone(),
            cancel.clone(),
            rsp_tx.clone(),
            err_tx.clone(),
        ));
    }
    drop(rsp_tx);
    drop(err_tx);

    let mut last_err = None;
    for _ in 0..2 {
        tokio::select! {
            Some(response) = rsp_rx.recv() => {
                cancel.cancel();
                return Ok(response);
            }
            Some(err) = err_rx.recv() => {
                warn!(error = %err, "Racing resolver failed");
                last_err = Some(err);
            }
            else => break,
        }
    }

    Err(last_err.unwrap_or(DigError::RaceFailed))
}

async fn run_racer(
    exchanger: Arc<dyn Exchanger>,
    settings: ExchangeSettings,
    query: Message,
    cancel: CancellationToken,
    rsp_tx: mpsc::Sender<Message>,
    err_tx: mpsc::Sender<DigError>,
) {
    match exchanger.exchange_once(&settings, &query).await {
        Ok(response) => {
            if cancel.is_cancelled() {
                debug!(server = ?settings.remote_addr, "Race already decided, discarding response");
                return;
            }
            let _ = rsp_tx.try_send(response);
        }
        Err(err) => {
            let _ = err_tx.try_send(err);
        }
    }
}
