//! # cprobe-core: Foundational Types for the Cultural Probe Toolkit
//!
//! Everything the submission packager and the CLI share lives here. The
//! crate depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Explicitly owned configuration.** [`ProbeConfig`] is loaded once,
//!    passed by reference to collaborators, and reloaded on request. There
//!    is no process-wide cache.
//!
//! 2. **Config-relative paths.** Every `directories` entry resolves against
//!    the configuration file's own directory, never the working directory.
//!
//! 3. **One clock reading per submission.** [`SubmissionId`] and every
//!    timestamp derived for a run come from a single captured instant.
//!
//! 4. **Streaming digests.** Archive checksums are computed over fixed-size
//!    chunks, never by reading the whole file into memory.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cprobe-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod catalog;
pub mod config;
pub mod digest;
pub mod error;
pub mod housekeeping;
pub mod identity;
pub mod perf;
pub mod protection;
pub mod responses;
pub mod settings;
pub mod system;

pub use catalog::ProbeCatalog;
pub use config::{ProbeConfig, DEFAULT_CACHE_TTL};
pub use digest::{sha256_file, sha256_reader, FileDigest};
pub use error::{ConfigError, ProtectionError};
pub use housekeeping::{clean_old_submissions, sanitize_filename};
pub use identity::SubmissionId;
pub use perf::{PerformanceMetrics, PerformanceMonitor};
pub use protection::{ProtectionManager, UnprotectGuard};
pub use responses::{collect_responses, store_response, ResponseDocument};
pub use settings::SubmissionSettings;
pub use system::SystemInfo;
