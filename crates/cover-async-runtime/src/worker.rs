use std::sync::Arc;

use cover_engine::CoverEngine;
use tokio::sync::mpsc;

use crate::{CoverCommand, CoverUpdate, handlers};

/// Async worker task that processes cover commands and sends updates
pub async fn worker_task(
    engine: Arc<CoverEngine>,
    mut command_rx: mpsc::UnboundedReceiver<CoverCommand>,
    update_tx: mpsc::UnboundedSender<CoverUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        if !process_command(cmd, &engine, &mut command_rx, &update_tx).await {
            break;
        }
    }
    log::debug!("Cover worker stopped");
}

/// Returns false once the worker should stop
async fn process_command(
    cmd: CoverCommand,
    engine: &CoverEngine,
    command_rx: &mut mpsc::UnboundedReceiver<CoverCommand>,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) -> bool {
    match cmd {
        CoverCommand::Preview {
            mut token,
            mut spec,
            mut uploads,
            mut device,
        } => {
            // Drain any queued previews, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let CoverCommand::Preview {
                    token: new_token,
                    spec: new_spec,
                    uploads: new_uploads,
                    device: new_device,
                } = next_cmd
                {
                    log::debug!("Discarding queued preview {}, using {}", token, new_token);
                    let _ = update_tx.send(CoverUpdate::Superseded { token });
                    token = new_token;
                    spec = new_spec;
                    uploads = new_uploads;
                    device = new_device;
                } else {
                    // Can't put it back, so run it before the preview
                    let keep_going =
                        Box::pin(process_command(next_cmd, engine, command_rx, update_tx)).await;
                    if !keep_going {
                        return false;
                    }
                }
            }

            handlers::handle_preview(engine, token, spec, uploads, device, update_tx).await;
        }
        CoverCommand::Export {
            token,
            spec,
            uploads,
            device,
            output_path,
        } => {
            handlers::handle_export(engine, token, spec, uploads, device, output_path, update_tx)
                .await;
        }
        CoverCommand::CheckBleed {
            token,
            spec,
            uploads,
            device,
        } => {
            handlers::handle_check_bleed(engine, token, spec, uploads, device, update_tx).await;
        }
        CoverCommand::Close => {
            engine.close();
            let _ = update_tx.send(CoverUpdate::Closed);
            return false;
        }
    }
    true
}
