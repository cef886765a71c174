//! Clinic state: the record collections behind the three dashboards.

pub mod collection;
pub mod prescriptions;
pub mod schedule;
pub mod seeders;
pub mod summary;

pub use collection::{Collection, Record};
pub use prescriptions::PrescriptionBook;
pub use schedule::{build_agenda, Agenda, AgendaEntry};
pub use summary::AdminSummary;

use tracing::info;

use crate::models::{Appointment, Doctor, Invoice, MedicalRecord, Patient};
use crate::storage::{LocalStore, StoreError, APPOINTMENTS_KEY};

impl Record for Appointment {
    type Id = String;
    const KIND: &'static str = "appointment";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Record for Doctor {
    type Id = i64;
    const KIND: &'static str = "doctor";

    fn id(&self) -> &i64 {
        &self.id
    }
}

impl Record for Patient {
    type Id = i64;
    const KIND: &'static str = "patient";

    fn id(&self) -> &i64 {
        &self.id
    }
}

impl Record for Invoice {
    type Id = i64;
    const KIND: &'static str = "invoice";

    fn id(&self) -> &i64 {
        &self.id
    }
}

#[derive(Debug)]
pub struct ClinicState {
    /// Shared by the admin, doctor and patient dashboards
    pub appointments: Collection<Appointment>,
    pub doctors: Collection<Doctor>,
    pub patients: Collection<Patient>,
    pub invoices: Collection<Invoice>,
    pub prescriptions: PrescriptionBook,
    pub records: Vec<MedicalRecord>,
}

impl ClinicState {
    /// Load persisted collections and seed the in-memory ones.
    pub async fn load(store: LocalStore, seed: bool) -> Result<Self, StoreError> {
        let seed_appointments = if seed { seeders::demo_appointments() } else { Vec::new() };
        let appointments = Collection::persisted(store.clone(), APPOINTMENTS_KEY, seed_appointments).await?;
        let prescriptions = PrescriptionBook::load(store).await?;

        let state = Self {
            appointments,
            doctors: Collection::in_memory(if seed { seeders::demo_doctors() } else { Vec::new() }),
            patients: Collection::in_memory(if seed { seeders::demo_patients() } else { Vec::new() }),
            invoices: Collection::in_memory(if seed { seeders::demo_invoices() } else { Vec::new() }),
            prescriptions,
            records: if seed { seeders::demo_medical_records() } else { Vec::new() },
        };

        let (doctors, patients, invoices) = (
            state.doctors.len().await,
            state.patients.len().await,
            state.invoices.len().await,
        );
        info!(seeded = seed, doctors, patients, invoices, "Clinic state ready");
        Ok(state)
    }

    pub async fn summary(&self, currency: &str) -> AdminSummary {
        let appointments = self.appointments.list().await;
        let invoices = self.invoices.list().await;

        AdminSummary {
            patients: self.patients.len().await,
            doctors: self.doctors.len().await,
            appointments: appointments.len(),
            prescriptions: self.prescriptions.count().await,
            status: summary::status_counts(&appointments),
            appointments_per_day: summary::appointments_per_day(&appointments),
            billing: summary::billing_summary(&invoices),
            currency: currency.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_state() {
        let store = LocalStore::in_memory().await.unwrap();
        let clinic = ClinicState::load(store.clone(), true).await.unwrap();

        assert!(!clinic.doctors.is_empty().await);
        assert!(!clinic.patients.is_empty().await);
        assert_eq!(clinic.invoices.len().await, 2);
        assert!(store.get_item(APPOINTMENTS_KEY).await.unwrap().is_some());

        let summary = clinic.summary("PKR").await;
        assert_eq!(summary.billing.invoices, 2);
        assert_eq!(summary.billing.collected, 1600);
        assert_eq!(summary.billing.outstanding, 2900);
        assert_eq!(summary.currency, "PKR");
    }

    #[tokio::test]
    async fn test_unseeded_state_is_empty() {
        let store = LocalStore::in_memory().await.unwrap();
        let clinic = ClinicState::load(store, false).await.unwrap();

        assert!(clinic.appointments.is_empty().await);
        assert!(clinic.doctors.is_empty().await);
        assert!(clinic.records.is_empty());
        assert_eq!(clinic.summary("PKR").await.appointments, 0);
    }

    #[tokio::test]
    async fn test_appointments_survive_reload() {
        let store = LocalStore::in_memory().await.unwrap();
        let clinic = ClinicState::load(store.clone(), true).await.unwrap();
        clinic.appointments.remove(&"a1".to_string()).await.unwrap();
        let remaining = clinic.appointments.len().await;

        let reloaded = ClinicState::load(store, true).await.unwrap();
        assert_eq!(reloaded.appointments.len().await, remaining);
        assert!(reloaded.appointments.get(&"a1".to_string()).await.is_none());
    }
}
