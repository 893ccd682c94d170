//! SQLite persistence for Registra.
//!
//! The [`RegistryStore`] owns the connection and the schema; entity
//! operations are free functions over `&Connection` in the per-entity
//! modules so the domain layer can compose them inside one transaction:
//!
//! ```ignore
//! store.with_transaction(|conn| {
//!     let offering = offerings::get(conn, &id)?.ok_or(...)?;
//!     enrollments::insert(conn, &enrollment)?;
//!     Ok(enrollment)
//! })
//! ```

pub mod catalog;
pub mod enrollments;
pub mod error;
pub mod fees;
pub mod offerings;
pub mod semesters;
mod rows;
pub mod store;
pub mod users;

#[cfg(test)]
pub(crate) mod testutil;

pub use rusqlite::Connection;

pub use enrollments::{EnrollmentDetail, EnrollmentRequest};
pub use error::{Result, StoreError, is_unique_violation};
pub use offerings::{ActiveOffering, OfferingSummary, PendingOffering};
pub use store::RegistryStore;
pub use users::{FacultyRecord, StudentRecord};
