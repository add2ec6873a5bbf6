//! The driver's own error surface.
//!
//! Every pipeline stage reports through [`tacc_util::TaccError`]; this
//! wraps that plus the file-system failures only the driver can hit
//! (§1 explicitly carves file I/O out of the CORE and into this crate),
//! mirroring the teacher's `faxc-drv::CompileError` wrapping the
//! `faxc-*` stage errors at the same boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Pipeline(#[from] tacc_util::TaccError),

    #[error("failed to read '{path}': {source}")]
    ReadSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    WriteArtifact {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DriverError {
    /// `0` on success is handled by the caller; every [`DriverError`]
    /// exits non-zero (§6), matching "first error aborts" (§7).
    pub fn exit_code(&self) -> i32 {
        1
    }
}
