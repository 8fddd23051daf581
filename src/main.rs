use clap::Parser;
use clinic_registry::core::{Catalog, ConfigProvider, Doctor};
use clinic_registry::utils::{logger, validation::Validate};
use clinic_registry::{server, ClinicError, CliConfig, Command, JsonFileStore, Registry};
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    logger::init_logger(cli.verbose, config.logging.level.as_deref(), config.log_format());

    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let registry = Arc::new(Registry::new(JsonFileStore::new(config.storage_path())));

    if let Command::Serve { .. } = cli.command {
        return server::start_server(registry, &config).await;
    }

    if let Err(e) = run(&registry, &cli.command).await {
        tracing::error!("❌ Command failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(registry: &Registry, command: &Command) -> clinic_registry::Result<()> {
    match command {
        Command::Serve { .. } => {}
        Command::Add {
            surname,
            name,
            room,
            specialty,
            patients,
        } => {
            registry
                .add_doctor(Doctor {
                    surname: surname.clone(),
                    name: name.clone(),
                    room: *room,
                    specialty: specialty.clone(),
                    patients: patients.clone(),
                })
                .await?;
            println!("✅ Added {} {}", surname, name);
        }
        Command::Remove { surname, name } => {
            let removed = registry.delete_doctor(surname, name).await?;
            println!("✅ Removed {} record(s)", removed);
        }
        Command::Edit { surname, name, .. } => {
            let update = command.doctor_update().unwrap_or_default();
            if update.is_empty() {
                tracing::warn!("No fields to change for {} {}", surname, name);
            }
            registry.edit_doctor(surname, name, &update).await?;
            println!("✅ Updated {} {}", surname, name);
        }
        Command::Specialty { specialty } => print_json(&registry.list_by_specialty(specialty).await?)?,
        Command::Patient { surname } => print_json(&registry.list_by_patient(surname).await?)?,
        Command::Room { room } => print_json(&registry.list_by_room(*room).await?)?,
        Command::Rooms { specialty } => {
            print_json(&registry.list_rooms_by_specialty(specialty).await?)?
        }
        Command::Busy { threshold } => {
            print_json(&registry.list_by_patient_count(*threshold).await?)?
        }
        Command::TopSpecialties { top_n } => {
            print_json(&registry.top_specialties_by_patients(*top_n).await?)?
        }
        Command::LeastBusy => print_json(&registry.least_busy_per_specialty().await?)?,
        Command::Seed { count } => {
            let written = registry.seed(*count).await?;
            if written == 0 {
                println!("Catalog is not empty, nothing seeded");
            } else {
                println!("✅ Seeded {} doctors", written);
            }
        }
        Command::Export { path } => {
            let json = serde_json::to_string_pretty(&registry.catalog().await?)?;
            match path {
                Some(path) => {
                    std::fs::write(path, json)?;
                    println!("📁 Catalog exported to: {}", path);
                }
                None => println!("{}", json),
            }
        }
        Command::Import { path } => {
            let data = std::fs::read(path)?;
            let doctors: Catalog = serde_json::from_slice(&data).map_err(|e| {
                ClinicError::validation(format!("{} is not a list of doctors: {}", path, e))
            })?;
            let count = doctors.len();
            registry.replace_catalog(doctors).await?;
            println!("✅ Imported {} doctors", count);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> clinic_registry::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
