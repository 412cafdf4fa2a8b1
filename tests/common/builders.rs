//! Test data builders for applications created through the store.

use jobtrack_core::constants::ApplicationStatus;
use jobtrack_core::context::OperationContext;
use jobtrack_core::models::{Application, NewApplication};
use jobtrack_core::store::{ApplicationRepository, ApplicationStore};

pub struct ApplicationBuilder {
    new_application: NewApplication,
}

impl ApplicationBuilder {
    pub fn new(company: &str, role: &str) -> Self {
        Self {
            new_application: NewApplication::new(company, role),
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.new_application.location = location.to_string();
        self
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.new_application.status = Some(status);
        self
    }

    pub fn with_salary(mut self, min: i64, max: i64) -> Self {
        self.new_application.salary_min = Some(min);
        self.new_application.salary_max = Some(max);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.new_application.notes = notes.to_string();
        self
    }

    pub fn into_new(self) -> NewApplication {
        self.new_application
    }

    pub async fn create(self, store: &ApplicationStore) -> Application {
        store
            .create(&OperationContext::background(), self.new_application)
            .await
            .expect("Failed to create test application")
    }
}

/// Create `count` plain applications named `Company 0`, `Company 1`, ...
pub async fn seed_applications(store: &ApplicationStore, count: usize) -> Vec<Application> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        created.push(
            ApplicationBuilder::new(&format!("Company {i}"), "Engineer")
                .create(store)
                .await,
        );
    }
    created
}
