//! QuickPact turns free-text handshake deals ("I'll design a logo by Friday,
//! you'll pay ₹2000") into structured agreements that both parties can sign.
//!
//! The crate is transport independent. [`service::AgreementService`] exposes
//! the five tool operations; the `quickpact-mcp` binary serves them over MCP.
//!
//! ```rust
//! use quickpact::config::Config;
//! use quickpact::service::AgreementService;
//! use quickpact::storage::AgreementStore;
//!
//! let service = AgreementService::new(Config::builder().build(), AgreementStore::new());
//! let summary = service
//!     .create_agreement("John", "Jane", "Pay $50 for the report", "tomorrow")
//!     .unwrap();
//! assert_eq!(summary.extracted.amount, Some(50.0));
//! ```

pub mod agreement;
pub mod config;
pub mod error;
pub mod extract;
pub mod observability;
pub mod service;
pub mod storage;
pub mod time_utils;

pub use error::QuickPactError;
