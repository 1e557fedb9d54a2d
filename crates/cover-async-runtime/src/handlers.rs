use std::path::PathBuf;

use cover_engine::{
    BookSpecification, CoverEngine, CoverError, CoverUploads, DeviceClass, PreparedCover,
    RequestToken, save_pdf,
};
use tokio::sync::mpsc;

use crate::CoverUpdate;

type UpdateTx = mpsc::UnboundedSender<CoverUpdate>;

pub async fn handle_preview(
    engine: &CoverEngine,
    token: RequestToken,
    spec: BookSpecification,
    uploads: CoverUploads,
    device: DeviceClass,
    update_tx: &UpdateTx,
) {
    let Some(prepared) = prepare(engine, token, &spec, &uploads, update_tx).await else {
        return;
    };

    match engine.render_preview(&prepared, device) {
        Ok(surface) => {
            let failures = prepared
                .failures
                .iter()
                .map(|failure| failure.error.to_string())
                .collect();
            let _ = update_tx.send(CoverUpdate::PreviewRendered {
                token,
                width: surface.width(),
                height: surface.height(),
                rgba_data: surface.to_rgba8(),
                failures,
            });
        }
        Err(e) => report(token, "Failed to render preview", e, update_tx),
    }
}

pub async fn handle_export(
    engine: &CoverEngine,
    token: RequestToken,
    spec: BookSpecification,
    uploads: CoverUploads,
    device: DeviceClass,
    output_path: PathBuf,
    update_tx: &UpdateTx,
) {
    let Some(prepared) = prepare(engine, token, &spec, &uploads, update_tx).await else {
        return;
    };
    for failure in &prepared.failures {
        log::warn!("Exporting without artwork: {}", failure.error);
    }

    let exported = match engine.export_pdf(&prepared, device).await {
        Ok(exported) => exported,
        Err(e) => return report(token, "Failed to export PDF", e, update_tx),
    };

    match save_pdf(&exported, &output_path).await {
        Ok(()) => {
            log::info!(
                "Exported {:.1} x {:.1} mm cover to {}",
                exported.width_mm(),
                exported.height_mm(),
                output_path.display()
            );
            let _ = update_tx.send(CoverUpdate::Exported {
                token,
                path: output_path,
                width_mm: exported.width_mm(),
                height_mm: exported.height_mm(),
                orientation: exported.orientation,
            });
        }
        Err(e) => report(token, "Failed to save PDF", e, update_tx),
    }
}

pub async fn handle_check_bleed(
    engine: &CoverEngine,
    token: RequestToken,
    spec: BookSpecification,
    uploads: CoverUploads,
    device: DeviceClass,
    update_tx: &UpdateTx,
) {
    let Some(prepared) = prepare(engine, token, &spec, &uploads, update_tx).await else {
        return;
    };

    match engine.check_bleed(&prepared, device) {
        Ok(status) => {
            let _ = update_tx.send(CoverUpdate::BleedChecked { token, status });
        }
        Err(e) => report(token, "Failed to check bleed", e, update_tx),
    }
}

async fn prepare(
    engine: &CoverEngine,
    token: RequestToken,
    spec: &BookSpecification,
    uploads: &CoverUploads,
    update_tx: &UpdateTx,
) -> Option<PreparedCover> {
    match engine.prepare(token, spec, uploads).await {
        Ok(prepared) => Some(prepared),
        Err(e) => {
            report(token, "Failed to prepare cover", e, update_tx);
            None
        }
    }
}

fn report(token: RequestToken, context: &str, error: CoverError, update_tx: &UpdateTx) {
    let update = match error {
        CoverError::Superseded(stale) => CoverUpdate::Superseded { token: stale },
        other => {
            log::error!("Request {}: {}: {}", token, context, other);
            CoverUpdate::Error {
                token,
                message: format!("{}: {}", context, other),
            }
        }
    };
    let _ = update_tx.send(update);
}
