//! Stacks - Library Service Client
//!
//! Network edge of the playback core:
//! - [`ClientError`]: one error taxonomy for every network-bound path,
//!   with retryability classification built in
//! - [`RetryPolicy`] / [`RetryConfig`]: exponential backoff with
//!   connectivity-aware short-circuiting
//! - [`ConnectivityMonitor`]: platform reachability seam
//! - [`LibraryClient`]: item metadata, audio track assembly, and subtitle
//!   discovery over the public metadata API
//!
//! Consumers never classify errors or re-implement retry; they wrap whole
//! operations in [`RetryPolicy::run`] and surface whatever comes back.

mod connectivity;
mod error;
mod library;
mod retry;

pub use connectivity::{AlwaysConnected, ConnectivityMonitor, SharedFlagMonitor};
pub use error::{ClientError, Result};
pub use library::LibraryClient;
pub use retry::{RetryConfig, RetryPolicy, ShouldRetry};
