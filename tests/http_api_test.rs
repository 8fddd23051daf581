use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use clinic_registry::core::catalog::sample_catalog;
use clinic_registry::server::{cors_layer, create_router};
use clinic_registry::{JsonFileStore, MemoryStore, Registry};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app_with(registry: Registry) -> Router {
    let cors = cors_layer(&["*".to_string()]).unwrap();
    create_router(Arc::new(registry), cors)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value)?)
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::new()));

    let (status, body) = send(&app, "GET", "/health", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_add_query_remove_flow() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = app_with(Registry::new(JsonFileStore::new(
        temp_dir.path().join("clinic_db.json"),
    )));

    let doctor = json!({
        "surname": "Ivanov",
        "name": "Petr",
        "room": 3,
        "specialty": "Cardio",
        "patients": [{"surname": "X", "diagnosis": "flu"}]
    });
    let (status, _) = send(&app, "POST", "/add", Some(doctor.clone())).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/specialty/Cardio", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([doctor]));

    let (_, body) = send(&app, "GET", "/patient/X", None).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = send(&app, "GET", "/offices/Cardio", None).await?;
    assert_eq!(body, json!([3]));

    let key = json!({"last_name": "Ivanov", "first_name": "Petr"});
    let (status, body) = send(&app, "DELETE", "/remove", Some(key.clone())).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (status, body) = send(&app, "DELETE", "/remove", Some(key)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);

    let (_, body) = send(&app, "GET", "/db", None).await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_add_accepts_frontend_field_names() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::new()));

    let doctor = json!({
        "lastName": "Sokolov",
        "firstName": "Ivan",
        "office": 12,
        "specialty": "Surgeon",
        "patients": []
    });
    let (status, _) = send(&app, "POST", "/add", Some(doctor)).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/office/12", None).await?;
    assert_eq!(body[0]["surname"], "Sokolov");
    assert_eq!(body[0]["room"], 12);
    Ok(())
}

#[tokio::test]
async fn test_add_too_many_patients_is_bad_request() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::new()));
    let patients: Vec<Value> = (0..11).map(|i| json!({"surname": format!("P{}", i)})).collect();

    let (status, body) = send(
        &app,
        "POST",
        "/add",
        Some(json!({
            "surname": "Busy",
            "name": "Doc",
            "room": 1,
            "specialty": "General",
            "patients": patients
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("too many patients"));

    let (_, body) = send(&app, "GET", "/db", None).await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_edit_found_and_not_found() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::with_catalog(sample_catalog(3))));

    let (status, _) = send(
        &app,
        "PUT",
        "/edit",
        Some(json!({
            "last_name": "Surname1",
            "first_name": "Name1",
            "updates": {"room": 40}
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/office/40", None).await?;
    assert_eq!(body[0]["name"], "Name1");

    let (status, body) = send(
        &app,
        "PUT",
        "/edit",
        Some(json!({
            "last_name": "Nobody",
            "first_name": "Here",
            "updates": {"room": 1}
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "doctor not found");
    Ok(())
}

#[tokio::test]
async fn test_edit_rejects_unknown_update_field() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::with_catalog(sample_catalog(1))));

    let (status, _) = send(
        &app,
        "PUT",
        "/edit",
        Some(json!({
            "last_name": "Surname1",
            "first_name": "Name1",
            "updates": {"salary": 1000}
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_statistics_endpoints() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::with_catalog(sample_catalog(30))));

    let (status, body) = send(&app, "GET", "/top-specialties", None).await?;
    assert_eq!(status, StatusCode::OK);
    let top = body.as_array().unwrap();
    assert_eq!(top.len(), 3);
    assert!(top[0][0].is_string());
    assert!(top[0][1].as_u64().unwrap() >= top[1][1].as_u64().unwrap());

    let (_, body) = send(&app, "GET", "/top-doctors", None).await?;
    let counts: Vec<usize> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["patients"].as_array().unwrap().len())
        .collect();
    assert!(counts.iter().all(|&c| c > 5));
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));

    let (_, body) = send(&app, "GET", "/top-doctors?threshold=8", None).await?;
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["patients"].as_array().unwrap().len() == 9));

    let (_, body) = send(&app, "GET", "/least-busy", None).await?;
    let doctors = body.as_array().unwrap();
    assert_eq!(doctors.len(), 30);
    assert_eq!(doctors[0]["patients"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_set_db_requires_a_list() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::new()));

    let (status, body) = send(&app, "POST", "/db", Some(json!({"surname": "x"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid data format. Expected a list.");

    let catalog = serde_json::to_value(sample_catalog(2))?;
    let (status, _) = send(&app, "POST", "/db", Some(catalog.clone())).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/db", None).await?;
    assert_eq!(body, catalog);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_store_is_internal_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("clinic_db.json");
    std::fs::write(&path, "not json")?;
    let app = app_with(Registry::new(JsonFileStore::new(&path)));

    let (status, body) = send(&app, "GET", "/least-busy", None).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_bad_path_and_query_values_return_json_errors() -> Result<()> {
    let app = app_with(Registry::new(MemoryStore::with_catalog(sample_catalog(3))));

    let (status, body) = send(&app, "GET", "/office/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/top-doctors?threshold=-1", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/top-specialties?top_n=many", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    Ok(())
}
