//! Prescriptions grouped per patient, persisted under `prescriptions`.

use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{CreatePrescriptionRequest, Prescription, UpdatePrescriptionRequest};
use crate::storage::{LocalStore, StoreError, PRESCRIPTIONS_KEY};

type Book = BTreeMap<String, Vec<Prescription>>;

#[derive(Debug)]
pub struct PrescriptionBook {
    entries: RwLock<Book>,
    store: LocalStore,
}

impl PrescriptionBook {
    /// Load the book; a missing or malformed value starts empty.
    pub async fn load(store: LocalStore) -> Result<Self, StoreError> {
        let entries: Book = store.read_json(PRESCRIPTIONS_KEY).await?.unwrap_or_default();
        info!(patients = entries.len(), "Loaded prescriptions from local store");
        Ok(Self {
            entries: RwLock::new(entries),
            store,
        })
    }

    /// Prescriptions for one patient, newest first.
    pub async fn list(&self, patient_id: &str) -> Vec<Prescription> {
        self.entries
            .read()
            .await
            .get(patient_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.values().map(Vec::len).sum()
    }

    pub async fn create(&self, patient_id: &str, req: CreatePrescriptionRequest) -> Result<Prescription, StoreError> {
        let prescription = req.into_prescription(Prescription::new_id(), Utc::now());

        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.entry(patient_id.to_string())
            .or_default()
            .insert(0, prescription.clone());
        self.commit(&mut entries, next).await?;

        debug!(patient_id = patient_id, id = %prescription.id, "Prescription created");
        Ok(prescription)
    }

    pub async fn update(
        &self,
        patient_id: &str,
        rx_id: &str,
        req: &UpdatePrescriptionRequest,
    ) -> Result<Prescription, StoreError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        let prescription = next
            .get_mut(patient_id)
            .and_then(|list| list.iter_mut().find(|rx| rx.id == rx_id))
            .ok_or_else(|| StoreError::not_found("prescription", rx_id))?;

        req.apply_to(prescription);
        let updated = prescription.clone();
        self.commit(&mut entries, next).await?;

        debug!(patient_id = patient_id, id = rx_id, "Prescription updated");
        Ok(updated)
    }

    pub async fn delete(&self, patient_id: &str, rx_id: &str) -> Result<Prescription, StoreError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        let list = next
            .get_mut(patient_id)
            .ok_or_else(|| StoreError::not_found("prescription", rx_id))?;
        let index = list
            .iter()
            .position(|rx| rx.id == rx_id)
            .ok_or_else(|| StoreError::not_found("prescription", rx_id))?;

        let removed = list.remove(index);
        self.commit(&mut entries, next).await?;

        debug!(patient_id = patient_id, id = rx_id, "Prescription deleted");
        Ok(removed)
    }

    /// Persist `next`, then make it the in-memory book.
    async fn commit(&self, entries: &mut Book, next: Book) -> Result<(), StoreError> {
        self.store.write_json(PRESCRIPTIONS_KEY, &next).await?;
        *entries = next;
        Ok(())
    }
}
