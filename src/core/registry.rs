use crate::core::catalog;
use crate::domain::model::{Catalog, Doctor, DoctorUpdate};
use crate::domain::ports::CatalogStore;
use crate::utils::error::Result;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Drives every request as load → operate → (save).
///
/// Mutations hold `write_guard` from load to save, so two writers in the same
/// process cannot overwrite each other's changes. Reads never take it.
pub struct Registry {
    store: Arc<dyn CatalogStore>,
    write_guard: Mutex<()>,
}

impl Registry {
    pub fn new<S: CatalogStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
            write_guard: Mutex::new(()),
        }
    }

    pub async fn catalog(&self) -> Result<Catalog> {
        let catalog = self.store.load().await?;
        tracing::debug!("Loaded {} doctors", catalog.len());
        Ok(catalog)
    }

    pub async fn add_doctor(&self, doctor: Doctor) -> Result<()> {
        // 先驗證，失敗時不讀寫檔案
        catalog::check_patient_cap(&doctor)?;

        let _guard = self.write_guard.lock().await;
        let mut doctors = self.catalog().await?;
        let (surname, name) = (doctor.surname.clone(), doctor.name.clone());
        catalog::add_doctor(&mut doctors, doctor)?;
        self.store.save(&doctors).await?;

        tracing::info!("Added doctor {} {} ({} total)", surname, name, doctors.len());
        Ok(())
    }

    /// Always persists, even when nothing matched.
    pub async fn delete_doctor(&self, surname: &str, name: &str) -> Result<usize> {
        let _guard = self.write_guard.lock().await;
        let mut doctors = self.catalog().await?;
        let removed = catalog::delete_doctor(&mut doctors, surname, name);
        self.store.save(&doctors).await?;

        if removed == 0 {
            tracing::info!("No doctor {} {} to remove", surname, name);
        } else {
            tracing::info!("Removed {} record(s) for {} {}", removed, surname, name);
        }
        Ok(removed)
    }

    pub async fn edit_doctor(&self, surname: &str, name: &str, update: &DoctorUpdate) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let mut doctors = self.catalog().await?;
        catalog::edit_doctor(&mut doctors, surname, name, update)?;
        self.store.save(&doctors).await?;

        tracing::info!("Edited doctor {} {}", surname, name);
        Ok(())
    }

    /// Overwrites the whole catalog. Every doctor must respect the patient cap.
    pub async fn replace_catalog(&self, doctors: Catalog) -> Result<()> {
        for doctor in &doctors {
            catalog::check_patient_cap(doctor)?;
        }

        let _guard = self.write_guard.lock().await;
        self.store.save(&doctors).await?;

        tracing::info!("Replaced catalog with {} doctors", doctors.len());
        Ok(())
    }

    /// Writes the demo catalog when the store is empty. Returns how many
    /// doctors were written.
    pub async fn seed(&self, count: usize) -> Result<usize> {
        let _guard = self.write_guard.lock().await;
        let existing = self.catalog().await?;
        if !existing.is_empty() {
            tracing::info!("Catalog already has {} doctors, skipping seed", existing.len());
            return Ok(0);
        }

        let doctors = catalog::sample_catalog(count);
        self.store.save(&doctors).await?;
        tracing::info!("Seeded catalog with {} doctors", doctors.len());
        Ok(doctors.len())
    }

    pub async fn list_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>> {
        Ok(catalog::list_by_specialty(&self.catalog().await?, specialty))
    }

    pub async fn list_by_patient(&self, patient_surname: &str) -> Result<Vec<Doctor>> {
        Ok(catalog::list_by_patient(&self.catalog().await?, patient_surname))
    }

    pub async fn list_by_room(&self, room: i64) -> Result<Vec<Doctor>> {
        Ok(catalog::list_by_room(&self.catalog().await?, room))
    }

    pub async fn list_rooms_by_specialty(&self, specialty: &str) -> Result<BTreeSet<i64>> {
        Ok(catalog::list_rooms_by_specialty(&self.catalog().await?, specialty))
    }

    pub async fn list_by_patient_count(&self, threshold: usize) -> Result<Vec<Doctor>> {
        Ok(catalog::list_by_patient_count(&self.catalog().await?, threshold))
    }

    pub async fn top_specialties_by_patients(&self, top_n: usize) -> Result<Vec<(String, usize)>> {
        Ok(catalog::top_specialties_by_patients(&self.catalog().await?, top_n))
    }

    pub async fn least_busy_per_specialty(&self) -> Result<Vec<Doctor>> {
        Ok(catalog::least_busy_per_specialty(&self.catalog().await?))
    }
}
