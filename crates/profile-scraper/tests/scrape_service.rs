//! End-to-end tests against a local stand-in for the profile site

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
  body::{to_bytes, Body},
  extract::{Form, Path},
  http::{header, Request, StatusCode},
  response::Html,
  routing::{get, post},
  Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

use profile_scraper::server::{routing::create_router, AppState};
use profile_scraper::{DoctorId, ScrapeError, ScrapePipeline, ScraperConfig};

const SECRET: &str = "test-secret";

const PROFILE_PAGE: &str = r#"
  <html><body>
    <h1 class="doctor-name">Dr. X</h1>
    <span class="speciality">Dermatology</span>
    <div class="faq">
      <p class="faq-question">Is parking available?</p>
      <div class="faq-answer">Yes</div>
    </div>
    <button class="faq-load" data-username="dr-x">More</button>
    <div class="articele-wrapper">
      <a href="/blog/skin-care"><span class="blog-title">Skin care</span></a>
      <span class="blog-date">2024-03-01</span>
    </div>
  </body></html>
"#;

const FAQ_FRAGMENT: &str = r#"
  <div class="faq">
    <p class="faq-question">Is parking available?</p>
    <div class="faq-answer"><p>Duplicate</p></div>
  </div>
  <div class="faq">
    <p class="faq-question">Do you see children?</p>
    <div class="faq-answer"><p>Yes, above five.</p></div>
  </div>
"#;

async fn profile(Path(doctor): Path<String>) -> Result<Html<&'static str>, StatusCode> {
  if doctor == "dr-x" {
    Ok(Html(PROFILE_PAGE))
  } else {
    Err(StatusCode::NOT_FOUND)
  }
}

async fn faqs(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
  assert_eq!(form.get("username").map(String::as_str), Some("dr-x"));
  Json(json!({ "html": FAQ_FRAGMENT }))
}

async fn spawn_profile_site() -> SocketAddr {
  let app = Router::new()
    .route("/doctor-profile/{doctor}", get(profile))
    .route("/get_category_faq", post(faqs));

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  addr
}

fn pipeline(addr: SocketAddr, data_dir: &TempDir) -> ScrapePipeline {
  let config = ScraperConfig {
    base_url: format!("http://{addr}/"),
    fetch_timeout_secs: 5,
    data_dir: data_dir.path().to_path_buf(),
    ..ScraperConfig::default()
  };
  ScrapePipeline::new(&config).unwrap()
}

fn scrape_request(body: Value, password: Option<&str>) -> Request<Body> {
  let mut builder = Request::builder()
    .method("POST")
    .uri("/scrape-doctor")
    .header(header::CONTENT_TYPE, "application/json");
  if let Some(password) = password {
    builder = builder.header(header::AUTHORIZATION, format!("Basic {}", STANDARD.encode(format!(":{password}"))));
  }
  builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_pipeline_stores_document_with_loaded_faqs() {
  let addr = spawn_profile_site().await;
  let data_dir = TempDir::new().unwrap();
  let pipeline = pipeline(addr, &data_dir);

  let outcome = pipeline.scrape(&DoctorId::parse("dr-x").unwrap()).await.unwrap();

  assert_eq!(outcome.filename(), "dr-x.txt");
  let stored = std::fs::read_to_string(data_dir.path().join("dr-x.txt")).unwrap();
  assert_eq!(stored, outcome.document);
  assert!(stored.contains("Doctor Name:\nDr. X\n"));
  assert!(stored.contains("FAQ #1\n--------------------\nFaq Question: Is parking available?\nFaq Answer: Yes\n"));
  assert!(stored.contains("FAQ #2\n--------------------\nFaq Question: Do you see children?\nFaq Answer: Yes, above five.\n"));
  assert!(!stored.contains("FAQ #3"));
  assert!(stored.contains(&format!("Blog Url: http://{addr}/blog/skin-care")));
}

#[tokio::test]
async fn test_pipeline_fetch_failure_writes_nothing() {
  let addr = spawn_profile_site().await;
  let data_dir = TempDir::new().unwrap();
  let pipeline = pipeline(addr, &data_dir);

  let result = pipeline.scrape(&DoctorId::parse("dr-unknown").unwrap()).await;

  assert!(matches!(result, Err(ScrapeError::Fetch { .. })));
  assert!(!data_dir.path().join("dr-unknown.txt").exists());
}

#[tokio::test]
async fn test_scrape_endpoint_requires_shared_secret() {
  let addr = spawn_profile_site().await;
  let data_dir = TempDir::new().unwrap();
  let app = create_router(AppState::new(pipeline(addr, &data_dir), SECRET));

  let response = app.clone().oneshot(scrape_request(json!({ "doctor_username": "dr-x" }), None)).await.unwrap();
  assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  assert!(body_json(response).await["error"].is_string());

  let response = app.oneshot(scrape_request(json!({ "doctor_username": "dr-x" }), Some("wrong"))).await.unwrap();
  assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  assert!(!data_dir.path().join("dr-x.txt").exists());
}

#[tokio::test]
async fn test_scrape_endpoint_validates_body() {
  let addr = spawn_profile_site().await;
  let data_dir = TempDir::new().unwrap();
  let app = create_router(AppState::new(pipeline(addr, &data_dir), SECRET));

  let response = app.clone().oneshot(scrape_request(json!({}), Some(SECRET))).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  assert_eq!(body_json(response).await["error"], "doctor_username is required");

  let response = app.oneshot(scrape_request(json!({ "doctor_username": "../etc/passwd" }), Some(SECRET))).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scrape_endpoint_maps_fetch_failure_to_not_found() {
  let addr = spawn_profile_site().await;
  let data_dir = TempDir::new().unwrap();
  let app = create_router(AppState::new(pipeline(addr, &data_dir), SECRET));

  let response = app.oneshot(scrape_request(json!({ "doctor_username": "dr-unknown" }), Some(SECRET))).await.unwrap();

  assert_eq!(response.status(), StatusCode::NOT_FOUND);
  assert_eq!(body_json(response).await["error"], "Failed to fetch the page");
}

#[tokio::test]
async fn test_scrape_endpoint_saves_document() {
  let addr = spawn_profile_site().await;
  let data_dir = TempDir::new().unwrap();
  let app = create_router(AppState::new(pipeline(addr, &data_dir), SECRET));

  let response = app.oneshot(scrape_request(json!({ "doctor_username": "dr-x" }), Some(SECRET))).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["filename"], "dr-x.txt");
  assert_eq!(body["message"], "Data scraped and saved to dr-x.txt");
  assert!(data_dir.path().join("dr-x.txt").exists());
}

#[tokio::test]
async fn test_status_is_public() {
  let data_dir = TempDir::new().unwrap();
  let config = ScraperConfig { data_dir: data_dir.path().to_path_buf(), ..ScraperConfig::default() };
  let app = create_router(AppState::new(ScrapePipeline::new(&config).unwrap(), SECRET));

  let response = app.oneshot(Request::get("/status").body(Body::empty()).unwrap()).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(body_json(response).await["status"], "healthy");
}
