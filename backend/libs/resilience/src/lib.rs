//! Resilience helpers for data-access code.
//!
//! - **Retry**: bounded retries with exponential backoff and jitter, optionally
//!   gated by a predicate so only transient failures are retried
//! - **Timeout**: time limits for one-off operations such as startup migrations
//!
//! # Example: retry transient failures once
//!
//! ```rust,no_run
//! use resilience::{with_retry_if, RetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RetryConfig::once();
//!     let result = with_retry_if(config, |e: &String| e.contains("timeout"), || async {
//!         Ok::<_, String>(())
//!     })
//!     .await;
//!     assert!(result.is_ok());
//! }
//! ```

pub mod retry;
pub mod timeout;

pub use retry::{with_retry, with_retry_if, RetryConfig, RetryError};
pub use timeout::{with_timeout_result, TimeoutError};
