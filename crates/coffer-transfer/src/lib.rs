// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import and export of password archives.
//!
//! File work runs in a background worker that talks to its caller only
//! through request and event channels. The codecs in [`export`] and
//! [`import`] can also be called directly.

pub mod export;
pub mod import;
pub mod protocol;
pub mod worker;

pub use export::export_entries;
pub use import::import_file;
pub use protocol::{
    ExportFormat, ExportRequest, ImportRequest, SuccessPayload, WorkerEvent, WorkerRequest,
};
pub use worker::{Completed, WorkerHandle, WorkerOptions, spawn_worker};
