use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

mod handlers;
mod worker;

pub use worker::worker_task;

// Re-export types from the engine crate
pub use cover_engine::{
    BleedStatus, BookSpecification, CoverEngine, CoverUploads, DeviceClass, Orientation,
    PanelKind, RequestToken,
};

/// Commands sent from the host to the worker
#[derive(Debug)]
pub enum CoverCommand {
    Preview {
        token: RequestToken,
        spec: BookSpecification,
        uploads: CoverUploads,
        device: DeviceClass,
    },
    Export {
        token: RequestToken,
        spec: BookSpecification,
        uploads: CoverUploads,
        device: DeviceClass,
        output_path: PathBuf,
    },
    CheckBleed {
        token: RequestToken,
        spec: BookSpecification,
        uploads: CoverUploads,
        device: DeviceClass,
    },
    Close,
}

/// Updates sent from the worker to the host
#[derive(Debug, Clone)]
pub enum CoverUpdate {
    PreviewRendered {
        token: RequestToken,
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
        /// One message per panel whose upload could not be used
        failures: Vec<String>,
    },
    Exported {
        token: RequestToken,
        path: PathBuf,
        width_mm: f64,
        height_mm: f64,
        orientation: Orientation,
    },
    BleedChecked {
        token: RequestToken,
        status: BleedStatus,
    },
    /// A newer request replaced this one before it finished
    Superseded {
        token: RequestToken,
    },
    /// The request failed; `token` identifies which one
    Error {
        token: RequestToken,
        message: String,
    },
    Closed,
}

/// Sending side of a running worker.
///
/// Each request takes its token at send time, so anything still queued or
/// in flight is stale the moment a newer request is issued.
#[derive(Clone)]
pub struct CoverClient {
    engine: Arc<CoverEngine>,
    command_tx: mpsc::UnboundedSender<CoverCommand>,
}

impl CoverClient {
    pub fn new(engine: Arc<CoverEngine>, command_tx: mpsc::UnboundedSender<CoverCommand>) -> Self {
        Self { engine, command_tx }
    }

    pub fn engine(&self) -> &Arc<CoverEngine> {
        &self.engine
    }

    pub fn preview(
        &self,
        spec: BookSpecification,
        uploads: CoverUploads,
        device: DeviceClass,
    ) -> RequestToken {
        let token = self.engine.begin_request();
        self.send(CoverCommand::Preview {
            token,
            spec,
            uploads,
            device,
        });
        token
    }

    pub fn export(
        &self,
        spec: BookSpecification,
        uploads: CoverUploads,
        device: DeviceClass,
        output_path: PathBuf,
    ) -> RequestToken {
        let token = self.engine.begin_request();
        self.send(CoverCommand::Export {
            token,
            spec,
            uploads,
            device,
            output_path,
        });
        token
    }

    pub fn check_bleed(
        &self,
        spec: BookSpecification,
        uploads: CoverUploads,
        device: DeviceClass,
    ) -> RequestToken {
        let token = self.engine.begin_request();
        self.send(CoverCommand::CheckBleed {
            token,
            spec,
            uploads,
            device,
        });
        token
    }

    /// Tear down; work in flight is abandoned when it completes
    pub fn close(&self) {
        self.engine.close();
        self.send(CoverCommand::Close);
    }

    fn send(&self, cmd: CoverCommand) {
        if self.command_tx.send(cmd).is_err() {
            log::warn!("Cover worker has stopped; command dropped");
        }
    }
}

/// Start a worker on the current runtime
pub fn spawn_worker(
    engine: Arc<CoverEngine>,
) -> (CoverClient, mpsc::UnboundedReceiver<CoverUpdate>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    tokio::spawn(worker_task(engine.clone(), command_rx, update_tx));

    (CoverClient::new(engine, command_tx), update_rx)
}
