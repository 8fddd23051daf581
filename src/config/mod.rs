pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{DoctorUpdate, Patient};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::RegistryConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "clinic-registry")]
#[command(about = "Clinic doctor registry backed by a single JSON file")]
pub struct CliConfig {
    /// Path to the catalog file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Add a doctor
    Add {
        surname: String,
        name: String,
        room: i64,
        specialty: String,
        /// Patient as SURNAME or SURNAME:DIAGNOSIS, repeatable
        #[arg(long = "patient", value_parser = parse_patient)]
        patients: Vec<Patient>,
    },
    /// Remove every doctor with this surname and name
    Remove { surname: String, name: String },
    /// Edit the first doctor with this surname and name
    Edit {
        surname: String,
        name: String,
        #[arg(long)]
        new_surname: Option<String>,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        room: Option<i64>,
        #[arg(long)]
        specialty: Option<String>,
        /// Replaces the whole patient list, repeatable
        #[arg(long = "patient", value_parser = parse_patient)]
        patients: Vec<Patient>,
        /// Replace the patient list with an empty one
        #[arg(long, conflicts_with = "patients")]
        clear_patients: bool,
    },
    /// Doctors of a specialty
    Specialty { specialty: String },
    /// Doctors treating a patient
    Patient { surname: String },
    /// Doctors working in a room, by surname
    Room { room: i64 },
    /// Rooms used by a specialty
    Rooms { specialty: String },
    /// Doctors with more than THRESHOLD patients
    Busy {
        #[arg(long, default_value = "5")]
        threshold: usize,
    },
    /// Specialties with the most patients
    TopSpecialties {
        #[arg(long, default_value = "3")]
        top_n: usize,
    },
    /// Doctors ordered by workload within and across specialties
    LeastBusy,
    /// Fill an empty catalog with demo doctors
    Seed {
        #[arg(long, default_value = "30")]
        count: usize,
    },
    /// Write the catalog as JSON to a file or stdout
    Export { path: Option<String> },
    /// Replace the catalog with a JSON array read from a file
    Import { path: String },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔 (若有)，再套用命令列覆蓋
    pub fn resolve(&self) -> Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::from_file(path)?,
            None => RegistryConfig::default(),
        };

        if let Some(db) = &self.db {
            config.storage.path = db.clone();
        }

        if let Command::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Command {
    /// Builds the partial update for `edit`. `None` when the command is not `edit`.
    pub fn doctor_update(&self) -> Option<DoctorUpdate> {
        match self {
            Command::Edit {
                new_surname,
                new_name,
                room,
                specialty,
                patients,
                clear_patients,
                ..
            } => Some(DoctorUpdate {
                surname: new_surname.clone(),
                name: new_name.clone(),
                room: *room,
                specialty: specialty.clone(),
                patients: if *clear_patients {
                    Some(Vec::new())
                } else if patients.is_empty() {
                    None
                } else {
                    Some(patients.clone())
                },
            }),
            _ => None,
        }
    }
}

#[cfg(feature = "cli")]
fn parse_patient(value: &str) -> std::result::Result<Patient, String> {
    let (surname, diagnosis) = match value.split_once(':') {
        Some((surname, diagnosis)) => (surname.trim(), Some(diagnosis.trim())),
        None => (value.trim(), None),
    };

    if surname.is_empty() {
        return Err("patient surname cannot be empty".to_string());
    }

    Ok(Patient::new(surname, diagnosis.filter(|d| !d.is_empty())))
}
