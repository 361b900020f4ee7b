//! Integration tests for the HTTP interface
//!
//! Each test drives the router directly with `oneshot` against a registry
//! backed by a JSON file in a temporary directory.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use patient_registry::adapters::store::JsonFileStore;
use patient_registry::api::app;
use patient_registry::core::registry::PatientRegistry;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestService {
    router: Router,
    data_file: PathBuf,
    _dir: TempDir,
}

impl TestService {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("patients.json");
        Self::with_file(dir, data_file)
    }

    fn with_contents(contents: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("patients.json");
        std::fs::write(&data_file, contents).unwrap();
        Self::with_file(dir, data_file)
    }

    fn with_file(dir: TempDir, data_file: PathBuf) -> Self {
        let store = Arc::new(JsonFileStore::new(&data_file));
        let registry = Arc::new(PatientRegistry::new(store));
        Self {
            router: app(registry),
            data_file,
            _dir: dir,
        }
    }

    async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(&self, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let (status, text) = self.send_raw(method, uri, body).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body.to_string())).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body.to_string())).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    fn stored(&self) -> Value {
        serde_json::from_str(&std::fs::read_to_string(&self.data_file).unwrap()).unwrap()
    }
}

fn alice() -> Value {
    json!({
        "id": "P001",
        "name": "Alice",
        "city": "NY",
        "age": 30,
        "gender": "female",
        "height": 1.6,
        "weight": 60
    })
}

fn patient(id: &str, height: f64, weight: f64) -> Value {
    json!({
        "id": id,
        "name": format!("patient {id}"),
        "city": "Pune",
        "age": 45,
        "gender": "male",
        "height": height,
        "weight": weight
    })
}

#[tokio::test]
async fn test_info_routes() {
    let service = TestService::new();

    let (status, body) = service.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient Management System");

    let (status, body) = service.get("/about").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("patient"));
}

#[tokio::test]
async fn test_create_view_update_delete_lifecycle() {
    let service = TestService::new();

    let (status, body) = service.post("/create", alice()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Patient created successfully"}));

    let (status, body) = service.get("/patient/P001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["bmi"], 23.44);
    assert_eq!(body["verdict"], "Normal");

    let stored = service.stored();
    assert!(stored["P001"].get("bmi").is_none());
    assert!(stored["P001"].get("id").is_none());

    let (status, body) = service.put("/edit/P001", json!({"weight": 80})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient updated successfully");
    assert_eq!(body["patient"]["bmi"], 31.25);
    assert_eq!(body["patient"]["verdict"], "Obese");
    assert_eq!(body["patient"]["city"], "NY");

    let (_, body) = service.get("/patient/P001").await;
    assert_eq!(body["weight"], 80.0);
    assert_eq!(body["verdict"], "Obese");
    assert_eq!(service.stored()["P001"]["weight"], 80.0);

    let (status, body) = service.delete("/delete/P001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient deleted successfully");

    let (status, body) = service.get("/patient/P001").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Patient not found"}));
    assert_eq!(service.stored(), json!({}));
}

#[tokio::test]
async fn test_view_lists_patients_in_store_order() {
    let service = TestService::with_contents(
        r#"{
  "P3": {"name": "c", "city": "x", "age": 20, "gender": "other", "height": 1.8, "weight": 81},
  "P1": {"name": "a", "city": "x", "age": 21, "gender": "male", "height": 1.7, "weight": 50}
}"#,
    );

    let (status, raw) = service.send_raw("GET", "/view", None).await;
    assert_eq!(status, StatusCode::OK);
    let p3 = raw.find("\"P3\"").unwrap();
    let p1 = raw.find("\"P1\"").unwrap();
    assert!(p3 < p1, "listing reordered: {raw}");

    let body: Value = serde_json::from_str(&raw).unwrap();
    let listing = body.as_object().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing["P3"]["bmi"], 25.0);
    assert_eq!(listing["P3"]["verdict"], "Overweight");
    assert_eq!(listing["P1"]["verdict"], "Underweight");
}

#[tokio::test]
async fn test_view_empty_when_file_missing() {
    let service = TestService::new();
    let (status, body) = service.get("/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_duplicate_create_is_rejected_and_store_unchanged() {
    let service = TestService::new();
    service.post("/create", alice()).await;
    let before = service.stored();

    let mut duplicate = alice();
    duplicate["name"] = json!("Someone Else");
    let (status, body) = service.post("/create", duplicate).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Patient with this ID already exists");
    assert_eq!(service.stored(), before);
}

#[tokio::test]
async fn test_create_with_invalid_fields_is_unprocessable() {
    let service = TestService::new();

    let mut invalid = alice();
    invalid["age"] = json!(0);
    invalid["height"] = json!(-1.6);
    let (status, body) = service.post("/create", invalid).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let detail = body["detail"].as_array().unwrap();
    let locations: Vec<&Value> = detail.iter().map(|d| &d["loc"]).collect();
    assert!(locations.contains(&&json!(["body", "age"])));
    assert!(locations.contains(&&json!(["body", "height"])));
    assert!(!service.data_file.exists());
}

#[tokio::test]
async fn test_create_with_bad_gender_or_missing_field_is_unprocessable() {
    let service = TestService::new();

    let mut bad_gender = alice();
    bad_gender["gender"] = json!("unknown");
    let (status, body) = service.post("/create", bad_gender).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "gender"]));
    assert_eq!(body["detail"][0]["type"], "enum");

    let mut missing = alice();
    missing.as_object_mut().unwrap().remove("city");
    let (status, _) = service.post("/create", missing).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = service
        .send("POST", "/create", Some("{ not json".to_string()))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "json_invalid");
}

fn locations(body: &Value) -> Vec<Value> {
    body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["loc"].clone())
        .collect()
}

#[tokio::test]
async fn test_bad_gender_is_reported_alongside_other_fields() {
    let service = TestService::new();
    service.post("/create", alice()).await;
    let before = service.stored();

    let mut invalid = patient("P002", -1.0, 60.0);
    invalid["age"] = json!(0);
    invalid["gender"] = json!("robot");
    let (status, body) = service.post("/create", invalid).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let locs = locations(&body);
    assert!(locs.contains(&json!(["body", "age"])));
    assert!(locs.contains(&json!(["body", "gender"])));
    assert!(locs.contains(&json!(["body", "height"])));

    let (status, body) = service
        .put("/edit/P001", json!({"gender": "robot", "age": 500}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let locs = locations(&body);
    assert!(locs.contains(&json!(["body", "gender"])));
    assert!(locs.contains(&json!(["body", "age"])));

    assert_eq!(service.stored(), before);
}

#[tokio::test]
async fn test_measurements_without_finite_bmi_are_unprocessable() {
    let service = TestService::new();

    let (status, body) = service.post("/create", patient("P002", 1e-200, 60.0)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(locations(&body), vec![json!(["body", "height"])]);
    assert!(!service.data_file.exists());

    service.post("/create", alice()).await;
    let before = service.stored();
    let (status, body) = service.put("/edit/P001", json!({"height": 1e-200})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(locations(&body), vec![json!(["body", "height"])]);
    assert_eq!(service.stored(), before);

    let (status, body) = service.get("/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["P001"]["bmi"], 23.44);
}

#[tokio::test]
async fn test_whole_number_ages_written_as_floats_are_accepted() {
    let service = TestService::new();

    let mut with_float_age = alice();
    with_float_age["age"] = json!(30.0);
    let (status, _) = service.post("/create", with_float_age).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(service.stored()["P001"]["age"], 30);

    let (status, body) = service.put("/edit/P001", json!({"age": 41.0})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["age"], 41);

    let (status, _) = service.put("/edit/P001", json!({"age": 41.5})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_errors() {
    let service = TestService::new();
    service.post("/create", alice()).await;
    let before = service.stored();

    let (status, body) = service.put("/edit/P404", json!({"city": "Oslo"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Patient not found");

    let (status, _) = service.put("/edit/P001", json!({"age": 150})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = service.put("/edit/P001", json!({"weight": null})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Validation is reported before the missing id
    let (status, _) = service.put("/edit/P404", json!({"height": 0})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(service.stored(), before);
}

#[tokio::test]
async fn test_empty_update_changes_nothing() {
    let service = TestService::new();
    service.post("/create", alice()).await;
    let before = service.stored();

    let (status, body) = service.put("/edit/P001", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["bmi"], 23.44);
    assert_eq!(service.stored(), before);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let service = TestService::new();
    let (status, body) = service.delete("/delete/P404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Patient not found");
}

#[tokio::test]
async fn test_sort_orders_and_errors() {
    let service = TestService::new();
    service.post("/create", patient("A", 1.6, 90.0)).await;
    service.post("/create", patient("B", 1.8, 55.0)).await;
    service.post("/create", patient("C", 1.7, 70.0)).await;

    let names = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, body) = service.get("/sort?sort_by=bmi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["patient B", "patient C", "patient A"]);

    let (status, body) = service.get("/sort?sort_by=bmi&order=desc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["patient A", "patient C", "patient B"]);

    let (_, body) = service.get("/sort?sort_by=height&order=asc").await;
    assert_eq!(names(&body), vec!["patient A", "patient C", "patient B"]);

    let (status, body) = service.get("/sort?sort_by=age").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Invalid field select from ['height', 'weight', 'bmi']"
    );

    let (status, body) = service.get("/sort?sort_by=bmi&order=up").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid order select between asc and desc");

    let (status, _) = service.get("/sort").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The last of a repeated parameter wins
    let (status, body) = service
        .get("/sort?sort_by=age&sort_by=bmi&order=asc&order=desc")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["patient A", "patient C", "patient B"]);
}

#[tokio::test]
async fn test_corrupt_store_is_server_error() {
    let service = TestService::with_contents("[1, 2, 3]");

    let (status, body) = service.get("/view").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("corrupt"));

    let (status, _) = service.post("/create", alice()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        std::fs::read_to_string(&service.data_file).unwrap(),
        "[1, 2, 3]"
    );
}

#[tokio::test]
async fn test_concurrent_creates_all_persist() {
    let service = Arc::new(TestService::new());

    let mut handles = Vec::new();
    for n in 0..12 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .post("/create", patient(&format!("P{n:02}"), 1.75, 70.0))
                .await
                .0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    assert_eq!(service.stored().as_object().unwrap().len(), 12);
}
