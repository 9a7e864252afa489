//! HTTP surface of the analysis service.
//!
//! All shared state lives in an [`AppContext`] built once at startup and
//! passed by `Arc` into the handlers. Nothing is mutated after load, so
//! requests run without locking.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::Serialize;

use crate::classifier::{Classifier, ClassifierError};
use crate::nutrition::{NutritionRecord, NutritionTable};

/// Banner reported by the health endpoint.
pub const SERVICE_BANNER: &str = "FitBite ML Server is running";

/// Upload cap sized for phone camera photos.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Read-only application state: the classifier and the nutrition table.
///
/// Either resource may be absent after a degraded startup; the handlers
/// substitute an error payload or zeroed nutrition values accordingly.
#[derive(Debug)]
pub struct AppContext {
    classifier: Option<Classifier>,
    nutrition: Option<NutritionTable>,
}

impl AppContext {
    pub fn new(classifier: Option<Classifier>, nutrition: Option<NutritionTable>) -> Self {
        Self {
            classifier,
            nutrition,
        }
    }

    /// Populates the context from the three resource files exactly once,
    /// before any request is served.
    ///
    /// Each missing or malformed resource degrades gracefully: the service
    /// still starts and still answers requests with empty/default state,
    /// and the degradation is logged rather than failing the process.
    pub fn load(labels_path: &Path, nutrition_path: &Path, weights_path: &Path) -> Self {
        let classifier = match Classifier::builder()
            .with_labels_file(labels_path)
            .with_weights_file(weights_path)
            .build()
        {
            Ok(classifier) => Some(classifier),
            Err(e) => {
                error!("Failed to initialize classifier: {}", e);
                None
            }
        };

        let nutrition = if nutrition_path.exists() {
            match NutritionTable::from_file(nutrition_path) {
                Ok(table) => {
                    info!(
                        "Nutrition database loaded from {} ({} entries)",
                        nutrition_path.display(),
                        table.len()
                    );
                    Some(table)
                }
                Err(e) => {
                    warn!(
                        "Error loading nutrition CSV from {}: {}",
                        nutrition_path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            warn!("Nutrition CSV not found at {}", nutrition_path.display());
            None
        };

        Self::new(classifier, nutrition)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub model_loaded: bool,
    pub num_classes: usize,
    pub nutrition_db_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(rename = "isFood")]
    pub is_food: bool,
    pub name: String,
    /// Confidence as a percentage, rounded to two decimals.
    pub confidence: f64,
    #[serde(flatten)]
    pub nutrition: NutritionRecord,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Builds the service router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(ctx)
}

/// `GET /` — health and introspection only.
async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    let info = ctx.classifier.as_ref().map(|c| c.info());
    Json(HealthResponse {
        message: SERVICE_BANNER,
        model_loaded: info.as_ref().map(|i| i.weights_loaded).unwrap_or(false),
        num_classes: info.as_ref().map(|i| i.num_labels).unwrap_or(0),
        nutrition_db_loaded: ctx.nutrition.is_some(),
    })
}

/// `POST /analyze` — the single entry point of the inference pipeline.
///
/// Every failure in decode, preprocessing, or inference is caught here and
/// surfaced as a structured `{error}` payload; nothing propagates far
/// enough to take the process down.
async fn analyze(State(ctx): State<Arc<AppContext>>, mut multipart: Multipart) -> Response {
    let Some(classifier) = ctx.classifier.as_ref() else {
        return error_response(ClassifierError::NotInitialized.to_string());
    };

    let image_bytes = match read_image_field(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return error_response("No image uploaded".to_string()),
        Err(message) => return error_response(message),
    };

    match analyze_bytes(classifier, ctx.nutrition.as_ref(), &image_bytes) {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!("Analyze request failed: {}", e);
            error_response(e.to_string())
        }
    }
}

/// Runs decode → preprocess → infer → lookup and assembles the flat
/// response record.
fn analyze_bytes(
    classifier: &Classifier,
    nutrition: Option<&NutritionTable>,
    image_bytes: &[u8],
) -> Result<AnalyzeResponse, ClassifierError> {
    let prediction = classifier.predict(image_bytes)?;

    let record = nutrition
        .and_then(|table| table.lookup(&prediction.label))
        .unwrap_or_default();

    Ok(AnalyzeResponse {
        is_food: true,
        confidence: round_two(f64::from(prediction.confidence) * 100.0),
        name: prediction.label,
        nutrition: record,
    })
}

/// Pulls the bytes of the uploaded `image` field out of the multipart
/// form. `Ok(None)` means the request carried no such field.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<Vec<u8>>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.name() == Some("image") {
            let bytes = field.bytes().await.map_err(|e| e.to_string())?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}

fn error_response(message: String) -> Response {
    Json(ErrorResponse { error: message }).into_response()
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
