//! Wealthdesk Client - HTTP access to the portfolio backend.
//!
//! [`BackendClient`] implements the engine's `PortfolioDataProvider` over the
//! backend's JSON API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wealthdesk_client::BackendClient;
//! use wealthdesk_core::portfolio::performance::{PerformanceService, PerformanceViewOptions};
//!
//! let client = Arc::new(BackendClient::new("http://localhost:8000/api")?);
//! let service = PerformanceService::new(client, PerformanceViewOptions::default());
//! let view = service.load_view(42).await?;
//! ```

mod client;
mod error;
mod types;

pub use client::{BackendClient, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, Result};
pub use types::*;
