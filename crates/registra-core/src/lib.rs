//! Registra workflow engine.
//!
//! Sits between the transport layer and the store: every operation takes a
//! [`Principal`], checks its capability first, then runs its guards and
//! state transition as one transaction against the shared store.
//!
//! # Example
//!
//! ```ignore
//! use registra_core::DomainServices;
//!
//! let services = DomainServices::new(store);
//! let offering = services.offerings().float(&principal, request)?;
//! ```

pub mod capability;
mod error;
pub mod services;

pub use error::{DomainError, Result};
pub use services::DomainServices;
pub use services::directory::{CreatedUser, NewFaculty, NewStudent};
pub use services::fees::DEFAULT_FEE_AMOUNT;
pub use services::offerings::{DecisionOutcome, FloatRequest};

// Re-export the identity and decision types transports need.
pub use registra_types::{Decision, Principal, Role};
