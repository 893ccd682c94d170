//! Domain services.
//!
//! Each service wraps the shared store and enforces the capability and
//! state rules for one slice of the system.

pub mod advisor;
pub mod catalog;
pub mod directory;
pub mod enrollment;
pub mod fees;
pub mod offerings;
pub mod semesters;

#[cfg(test)]
pub(crate) mod testfx;

use std::sync::Arc;

use tracing::info;

use registra_store::RegistryStore;

/// Domain services facade.
///
/// The single entry point for transport layers. Construction wires every
/// service to the same store so their operations share one database.
#[derive(Clone)]
pub struct DomainServices {
    catalog: catalog::Catalog,
    semesters: semesters::Semesters,
    directory: directory::Directory,
    offerings: offerings::OfferingManager,
    enrollment: enrollment::EnrollmentWorkflow,
    fees: fees::FeeLedger,
    advisors: advisor::AdvisorAssignment,
}

impl DomainServices {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        info!("Initializing domain services");
        Self {
            catalog: catalog::Catalog::new(store.clone()),
            semesters: semesters::Semesters::new(store.clone()),
            directory: directory::Directory::new(store.clone()),
            offerings: offerings::OfferingManager::new(store.clone()),
            enrollment: enrollment::EnrollmentWorkflow::new(store.clone()),
            fees: fees::FeeLedger::new(store.clone()),
            advisors: advisor::AdvisorAssignment::new(store),
        }
    }

    pub fn catalog(&self) -> &catalog::Catalog {
        &self.catalog
    }

    pub fn semesters(&self) -> &semesters::Semesters {
        &self.semesters
    }

    pub fn directory(&self) -> &directory::Directory {
        &self.directory
    }

    pub fn offerings(&self) -> &offerings::OfferingManager {
        &self.offerings
    }

    pub fn enrollment(&self) -> &enrollment::EnrollmentWorkflow {
        &self.enrollment
    }

    pub fn fees(&self) -> &fees::FeeLedger {
        &self.fees
    }

    pub fn advisors(&self) -> &advisor::AdvisorAssignment {
        &self.advisors
    }
}
