//! Pure operations over a loaded catalog. Nothing in here touches storage;
//! see [`crate::core::registry::Registry`] for the load/save driver.

use crate::domain::model::{Catalog, Doctor, DoctorUpdate, Patient, MAX_PATIENTS};
use crate::utils::error::{ClinicError, Result};
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_PATIENT_THRESHOLD: usize = 5;
pub const DEFAULT_TOP_SPECIALTIES: usize = 3;

pub fn check_patient_cap(doctor: &Doctor) -> Result<()> {
    if doctor.patient_count() > MAX_PATIENTS {
        return Err(ClinicError::validation(format!(
            "too many patients: {} {} has {}, the limit is {}",
            doctor.surname,
            doctor.name,
            doctor.patient_count(),
            MAX_PATIENTS
        )));
    }
    Ok(())
}

/// Appends `doctor` unless it breaks the patient cap. Duplicate keys are allowed.
pub fn add_doctor(catalog: &mut Catalog, doctor: Doctor) -> Result<()> {
    check_patient_cap(&doctor)?;
    catalog.push(doctor);
    Ok(())
}

/// Removes every doctor with this key and returns how many went away.
/// Zero is not an error.
pub fn delete_doctor(catalog: &mut Catalog, surname: &str, name: &str) -> usize {
    let before = catalog.len();
    catalog.retain(|doctor| !doctor.matches(surname, name));
    before - catalog.len()
}

/// Applies `update` to the first doctor with this key.
pub fn edit_doctor(
    catalog: &mut Catalog,
    surname: &str,
    name: &str,
    update: &DoctorUpdate,
) -> Result<()> {
    let doctor = catalog
        .iter_mut()
        .find(|doctor| doctor.matches(surname, name))
        .ok_or_else(|| ClinicError::not_found(surname, name))?;

    update.apply_to(doctor);
    Ok(())
}

pub fn list_by_specialty(catalog: &[Doctor], specialty: &str) -> Vec<Doctor> {
    catalog
        .iter()
        .filter(|doctor| doctor.specialty == specialty)
        .cloned()
        .collect()
}

pub fn list_by_patient(catalog: &[Doctor], patient_surname: &str) -> Vec<Doctor> {
    catalog
        .iter()
        .filter(|doctor| {
            doctor
                .patients
                .iter()
                .any(|patient| patient.surname == patient_surname)
        })
        .cloned()
        .collect()
}

/// Doctors in `room`, ordered by surname. Equal surnames keep catalog order.
pub fn list_by_room(catalog: &[Doctor], room: i64) -> Vec<Doctor> {
    let mut doctors: Vec<Doctor> = catalog
        .iter()
        .filter(|doctor| doctor.room == room)
        .cloned()
        .collect();
    doctors.sort_by(|a, b| a.surname.cmp(&b.surname));
    doctors
}

pub fn list_rooms_by_specialty(catalog: &[Doctor], specialty: &str) -> BTreeSet<i64> {
    catalog
        .iter()
        .filter(|doctor| doctor.specialty == specialty)
        .map(|doctor| doctor.room)
        .collect()
}

/// Doctors with strictly more than `threshold` patients, busiest first.
pub fn list_by_patient_count(catalog: &[Doctor], threshold: usize) -> Vec<Doctor> {
    let mut doctors: Vec<Doctor> = catalog
        .iter()
        .filter(|doctor| doctor.patient_count() > threshold)
        .cloned()
        .collect();
    doctors.sort_by(|a, b| b.patient_count().cmp(&a.patient_count()));
    doctors
}

/// Patient totals per specialty, largest first. Equal totals keep the order in
/// which the specialty first appears in the catalog. Specialties whose doctors
/// have no patients still count, with a total of zero.
pub fn top_specialties_by_patients(catalog: &[Doctor], top_n: usize) -> Vec<(String, usize)> {
    let mut totals: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for doctor in catalog {
        match positions.get(doctor.specialty.as_str()) {
            Some(&idx) => totals[idx].1 += doctor.patient_count(),
            None => {
                positions.insert(doctor.specialty.as_str(), totals.len());
                totals.push((doctor.specialty.clone(), doctor.patient_count()));
            }
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(top_n);
    totals
}

/// Groups by specialty (first-seen order), sorts each group by patient count,
/// then sorts the concatenation by patient count again.
pub fn least_busy_per_specialty(catalog: &[Doctor]) -> Vec<Doctor> {
    let mut groups: Vec<(&str, Vec<Doctor>)> = Vec::new();

    for doctor in catalog {
        match groups
            .iter_mut()
            .find(|(specialty, _)| *specialty == doctor.specialty)
        {
            Some((_, group)) => group.push(doctor.clone()),
            None => groups.push((doctor.specialty.as_str(), vec![doctor.clone()])),
        }
    }

    let mut result: Vec<Doctor> = Vec::with_capacity(catalog.len());
    for (_, mut group) in groups {
        group.sort_by_key(Doctor::patient_count);
        result.extend(group);
    }

    result.sort_by_key(Doctor::patient_count);
    result
}

/// Deterministic demo catalog: doctor `i` sits in room `i % 10 + 1`, works in
/// `Specialty{i % 5 + 1}` and has `i % 10` patients.
pub fn sample_catalog(count: usize) -> Catalog {
    (1..=count)
        .map(|i| Doctor {
            surname: format!("Surname{}", i),
            name: format!("Name{}", i),
            room: (i % 10 + 1) as i64,
            specialty: format!("Specialty{}", i % 5 + 1),
            patients: (0..i % 10)
                .map(|j| Patient {
                    surname: format!("Patient{}", j),
                    diagnosis: Some(format!("Diagnosis{}", j)),
                })
                .collect(),
        })
        .collect()
}
