// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background transfer worker.
//!
//! The worker is a tokio task that owns the receiving end of a request
//! channel and the sending end of an event channel. It shares no state with
//! its caller. Key derivation and AES run on the blocking pool so the worker
//! task itself never stalls the runtime.

use coffer_config::model::{CofferConfig, TransferConfig};
use coffer_core::{CofferError, DECRYPTION_FAILED};
use coffer_vault::PasswordEntry;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::export::export_entries;
use crate::import::import_file;
use crate::protocol::{
    ExportFormat, ExportRequest, ImportRequest, SuccessPayload, WorkerEvent, WorkerRequest,
};

/// Settings shared by every task a worker runs.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    pub channel_capacity: usize,
    pub kdf_iterations: u32,
}

impl WorkerOptions {
    pub fn from_config(config: &CofferConfig) -> Self {
        Self::new(&config.transfer, config.vault.kdf_iterations)
    }

    pub fn new(transfer: &TransferConfig, kdf_iterations: u32) -> Self {
        Self {
            channel_capacity: transfer.channel_capacity.max(1),
            kdf_iterations,
        }
    }
}

/// The caller's side of a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    requests: mpsc::Sender<WorkerRequest>,
    events: mpsc::Receiver<WorkerEvent>,
    task: JoinHandle<()>,
}

/// A finished task: the progress messages seen and the terminal event.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub progress: Vec<String>,
    pub outcome: Result<SuccessPayload, String>,
}

/// Start a worker on the current runtime.
pub fn spawn_worker(options: WorkerOptions) -> WorkerHandle {
    let (req_tx, req_rx) = mpsc::channel(options.channel_capacity);
    let (event_tx, event_rx) = mpsc::channel(options.channel_capacity);
    let task = tokio::spawn(run_worker(req_rx, event_tx, options.kdf_iterations));
    WorkerHandle {
        requests: req_tx,
        events: event_rx,
        task,
    }
}

async fn run_worker(
    mut requests: mpsc::Receiver<WorkerRequest>,
    events: mpsc::Sender<WorkerEvent>,
    iterations: u32,
) {
    debug!("transfer worker started");
    while let Some(request) = requests.recv().await {
        let terminal = match request {
            WorkerRequest::ExportData(req) => run_export(req, iterations).await,
            WorkerRequest::ImportData(req) => run_import(req, iterations, events.clone()).await,
        };
        if events.send(terminal).await.is_err() {
            debug!("event receiver dropped, stopping worker");
            break;
        }
    }
    debug!("transfer worker stopped");
}

async fn run_export(req: ExportRequest, iterations: u32) -> WorkerEvent {
    let count = req.data.len();
    let format = req.format;
    let result = tokio::task::spawn_blocking(move || {
        export_entries(&req.data, req.format, req.key.as_deref(), iterations)
    })
    .await
    .unwrap_or_else(|e| Err(CofferError::Internal(format!("export task failed: {e}"))));

    match result {
        Ok(content) => {
            info!(%format, entries = count, "export complete");
            WorkerEvent::Success(SuccessPayload::Exported(content))
        }
        Err(e) => {
            warn!(%format, error = %e, "export failed");
            WorkerEvent::Error(event_message(&e))
        }
    }
}

async fn run_import(
    req: ImportRequest,
    iterations: u32,
    events: mpsc::Sender<WorkerEvent>,
) -> WorkerEvent {
    let file_name = req.file_name.clone();
    let result = tokio::task::spawn_blocking(move || {
        import_file(
            &req.file_content,
            &req.file_name,
            req.decryption_key.as_deref(),
            iterations,
            // Runs on a blocking thread, where blocking_send is allowed.
            |message| {
                let _ = events.blocking_send(WorkerEvent::Progress(message.to_string()));
            },
        )
    })
    .await
    .unwrap_or_else(|e| Err(CofferError::Internal(format!("import task failed: {e}"))));

    match result {
        Ok(entries) => {
            info!(file = %file_name, entries = entries.len(), "import parsed");
            WorkerEvent::Success(SuccessPayload::Imported(entries))
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "import failed");
            WorkerEvent::Error(event_message(&e))
        }
    }
}

/// Text carried by an error event.
fn event_message(err: &CofferError) -> String {
    match err {
        CofferError::Transfer(message) => message.clone(),
        other => other.to_string(),
    }
}

impl WorkerHandle {
    /// Queue a request without waiting for its events.
    pub async fn send(&self, request: WorkerRequest) -> Result<(), CofferError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| CofferError::Transfer("worker has stopped".to_string()))
    }

    /// Next event from the worker, or `None` once it has stopped.
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        self.events.recv().await
    }

    /// Send one request and collect events until the terminal one.
    pub async fn run(&mut self, request: WorkerRequest) -> Result<Completed, CofferError> {
        self.send(request).await?;
        let mut progress = Vec::new();
        while let Some(event) = self.next_event().await {
            match event {
                WorkerEvent::Progress(message) => progress.push(message),
                WorkerEvent::Success(payload) => {
                    return Ok(Completed {
                        progress,
                        outcome: Ok(payload),
                    });
                }
                WorkerEvent::Error(message) => {
                    return Ok(Completed {
                        progress,
                        outcome: Err(message),
                    });
                }
            }
        }
        Err(CofferError::Transfer(
            "worker stopped before finishing the task".to_string(),
        ))
    }

    /// Export `entries` and return the file content.
    pub async fn export(
        &mut self,
        entries: Vec<PasswordEntry>,
        format: ExportFormat,
        key: Option<String>,
    ) -> Result<String, CofferError> {
        let request = WorkerRequest::ExportData(ExportRequest {
            data: entries,
            format,
            key,
        });
        match self.run(request).await?.outcome {
            Ok(SuccessPayload::Exported(content)) => Ok(content),
            Ok(SuccessPayload::Imported(_)) => Err(unexpected_payload()),
            Err(message) => Err(error_from_event(message)),
        }
    }

    /// Import a file and return its entries.
    pub async fn import(
        &mut self,
        file_name: impl Into<String>,
        file_content: impl Into<String>,
        decryption_key: Option<String>,
    ) -> Result<Vec<PasswordEntry>, CofferError> {
        let request = WorkerRequest::ImportData(ImportRequest {
            file_content: file_content.into(),
            file_name: file_name.into(),
            decryption_key,
        });
        match self.run(request).await?.outcome {
            Ok(SuccessPayload::Imported(entries)) => Ok(entries),
            Ok(SuccessPayload::Exported(_)) => Err(unexpected_payload()),
            Err(message) => Err(error_from_event(message)),
        }
    }

    /// Stop accepting requests and wait for the worker to finish.
    pub async fn shutdown(self) {
        drop(self.requests);
        if let Err(e) = self.task.await {
            warn!(error = %e, "transfer worker panicked");
        }
    }
}

fn unexpected_payload() -> CofferError {
    CofferError::Internal("worker returned the wrong payload kind".to_string())
}

fn error_from_event(message: String) -> CofferError {
    if message == DECRYPTION_FAILED {
        CofferError::Decryption
    } else {
        CofferError::Transfer(message)
    }
}
