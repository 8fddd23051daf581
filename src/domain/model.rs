use serde::{Deserialize, Serialize};

/// 每位醫師可登記的病人上限（僅在新增時檢查）
pub const MAX_PATIENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(alias = "lastName", alias = "last_name")]
    pub surname: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
}

impl Patient {
    pub fn new(surname: impl Into<String>, diagnosis: Option<&str>) -> Self {
        Self {
            surname: surname.into(),
            diagnosis: diagnosis.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(alias = "lastName", alias = "last_name")]
    pub surname: String,
    #[serde(alias = "firstName", alias = "first_name")]
    pub name: String,
    #[serde(alias = "office")]
    pub room: i64,
    pub specialty: String,
    #[serde(default)]
    pub patients: Vec<Patient>,
}

impl Doctor {
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    pub fn matches(&self, surname: &str, name: &str) -> bool {
        self.surname == surname && self.name == name
    }
}

/// The whole registry, in persisted order.
pub type Catalog = Vec<Doctor>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorKey {
    #[serde(alias = "lastName", alias = "last_name")]
    pub surname: String,
    #[serde(alias = "firstName", alias = "first_name")]
    pub name: String,
}

/// Partial update for `edit_doctor`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoctorUpdate {
    #[serde(default, alias = "lastName", alias = "last_name")]
    pub surname: Option<String>,
    #[serde(default, alias = "firstName", alias = "first_name")]
    pub name: Option<String>,
    #[serde(default, alias = "office")]
    pub room: Option<i64>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub patients: Option<Vec<Patient>>,
}

impl DoctorUpdate {
    pub fn is_empty(&self) -> bool {
        self.surname.is_none()
            && self.name.is_none()
            && self.room.is_none()
            && self.specialty.is_none()
            && self.patients.is_none()
    }

    /// Overwrites every field present in the update. The patient cap is not
    /// re-checked here.
    pub fn apply_to(&self, doctor: &mut Doctor) {
        if let Some(surname) = &self.surname {
            doctor.surname = surname.clone();
        }
        if let Some(name) = &self.name {
            doctor.name = name.clone();
        }
        if let Some(room) = self.room {
            doctor.room = room;
        }
        if let Some(specialty) = &self.specialty {
            doctor.specialty = specialty.clone();
        }
        if let Some(patients) = &self.patients {
            doctor.patients = patients.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_accepts_frontend_aliases() {
        let doctor: Doctor = serde_json::from_value(serde_json::json!({
            "lastName": "Ivanov",
            "firstName": "Petr",
            "office": 3,
            "specialty": "Cardio",
            "patients": [{"lastName": "X", "diagnosis": "flu"}]
        }))
        .unwrap();

        assert_eq!(doctor.surname, "Ivanov");
        assert_eq!(doctor.name, "Petr");
        assert_eq!(doctor.room, 3);
        assert_eq!(doctor.patients, vec![Patient::new("X", Some("flu"))]);

        let value = serde_json::to_value(&doctor).unwrap();
        assert_eq!(value["surname"], "Ivanov");
        assert_eq!(value["room"], 3);
        assert_eq!(value["patients"][0]["surname"], "X");
    }

    #[test]
    fn test_patient_without_diagnosis() {
        let patient: Patient = serde_json::from_str(r#"{"surname": "Orlov"}"#).unwrap();
        assert_eq!(patient.diagnosis, None);
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let result: std::result::Result<DoctorUpdate, _> =
            serde_json::from_str(r#"{"salary": 100}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut doctor = Doctor {
            surname: "Ivanov".to_string(),
            name: "Petr".to_string(),
            room: 3,
            specialty: "Cardio".to_string(),
            patients: vec![],
        };
        let update = DoctorUpdate {
            room: Some(7),
            ..Default::default()
        };

        update.apply_to(&mut doctor);

        assert_eq!(doctor.room, 7);
        assert_eq!(doctor.surname, "Ivanov");
        assert_eq!(doctor.specialty, "Cardio");
    }
}
