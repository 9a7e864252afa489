use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fitbite_ml::server::{router, AppContext};
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use std::io::Cursor;
use tower::util::ServiceExt;

const BOUNDARY: &str = "fitbite-test-boundary";

fn test_image_bytes() -> Vec<u8> {
    let img = RgbImage::from_fn(320, 240, |x, y| Rgb([x as u8, y as u8, 120]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}

fn multipart_body(field_name: &str, file_bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"photo.png\"\r\n",
            field_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn analyze_request(field_name: &str, file_bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field_name, file_bytes)))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

/// Context with labels {apple, banana} and a nutrition table carrying the
/// apple row, no weights file.
fn loaded_context(dir: &Path) -> Arc<AppContext> {
    let labels = dir.join("labels.json");
    let nutrition = dir.join("nutrition_data.csv");
    fs::write(&labels, r#"{"0": "apple", "1": "banana"}"#).unwrap();
    fs::write(
        &nutrition,
        "name,calories,protein,carbs,fats\napple,52,0.3,14,0.2\n",
    )
    .unwrap();

    Arc::new(AppContext::load(
        &labels,
        &nutrition,
        &dir.join("food_model.safetensors"),
    ))
}

fn empty_context() -> Arc<AppContext> {
    Arc::new(AppContext::load(
        Path::new("/nonexistent/labels.json"),
        Path::new("/nonexistent/nutrition_data.csv"),
        Path::new("/nonexistent/food_model.safetensors"),
    ))
}

#[tokio::test]
async fn test_health_reports_loaded_state() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = loaded_context(dir.path());

    let response = router(ctx)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["message"], "FitBite ML Server is running");
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["num_classes"], 2);
    assert_eq!(json["nutrition_db_loaded"], true);
}

#[tokio::test]
async fn test_health_with_nothing_on_disk() {
    let response = router(empty_context())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["num_classes"], 0);
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["nutrition_db_loaded"], false);
}

#[tokio::test]
async fn test_analyze_returns_exact_response_keys() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = loaded_context(dir.path());

    let response = router(ctx)
        .oneshot(analyze_request("image", &test_image_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    let object = json.as_object().unwrap();
    for key in ["isFood", "name", "confidence", "calories", "protein", "carbs", "fats"] {
        assert!(object.contains_key(key), "missing key {}", key);
    }
    assert_eq!(object.len(), 7);

    assert_eq!(json["isFood"], true);
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&confidence));
}

#[tokio::test]
async fn test_analyze_nutrition_example() {
    // Untrained weights may predict either class; when the label resolves
    // to "apple" the response must carry the apple row, otherwise the
    // table misses and every nutrition field is zero.
    let dir = tempfile::tempdir().unwrap();
    let ctx = loaded_context(dir.path());

    let response = router(ctx)
        .oneshot(analyze_request("image", &test_image_bytes()))
        .await
        .unwrap();
    let json = response_json(response).await;

    let name = json["name"].as_str().unwrap();
    assert!(name == "apple" || name == "banana");
    if name == "apple" {
        assert_eq!(json["calories"], 52.0);
        assert_eq!(json["protein"], 0.3);
        assert_eq!(json["carbs"], 14.0);
        assert_eq!(json["fats"], 0.2);
    } else {
        assert_eq!(json["calories"], 0.0);
    }
}

#[tokio::test]
async fn test_analyze_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = loaded_context(dir.path());
    let image = test_image_bytes();

    let first = router(ctx.clone())
        .oneshot(analyze_request("image", &image))
        .await
        .unwrap();
    let second = router(ctx)
        .oneshot(analyze_request("image", &image))
        .await
        .unwrap();

    let first_bytes = first.into_body().collect().await.unwrap().to_bytes();
    let second_bytes = second.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn test_analyze_with_undecodable_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = loaded_context(dir.path());

    let response = router(ctx)
        .oneshot(analyze_request("image", b"this is not an image"))
        .await
        .unwrap();

    let json = response_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(!error.is_empty());
}

#[tokio::test]
async fn test_analyze_without_image_field() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = loaded_context(dir.path());

    let response = router(ctx)
        .oneshot(analyze_request("attachment", &test_image_bytes()))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["error"], "No image uploaded");
}

#[tokio::test]
async fn test_analyze_with_nothing_on_disk() {
    // Absent labels resolve to "Unknown", absent nutrition zeroes every
    // macro field, and the request never becomes an unhandled failure.
    let response = router(empty_context())
        .oneshot(analyze_request("image", &test_image_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["isFood"], true);
    assert_eq!(json["name"], "Unknown");
    assert_eq!(json["calories"], 0.0);
    assert_eq!(json["protein"], 0.0);
    assert_eq!(json["carbs"], 0.0);
    assert_eq!(json["fats"], 0.0);
}

#[tokio::test]
async fn test_analyze_without_model() {
    let ctx = Arc::new(AppContext::new(None, None));

    let response = router(ctx)
        .oneshot(analyze_request("image", &test_image_bytes()))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["error"], "Model not initialized");
}
