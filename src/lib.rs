//! A food photo analysis service: classify a meal image with a small
//! convolutional model and estimate its nutritional profile from a CSV
//! lookup table.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use fitbite_ml::classifier::Classifier;
//! use fitbite_ml::nutrition::NutritionTable;
//!
//! // Every resource file is optional on disk; missing files degrade to
//! // defaults instead of failing startup.
//! let classifier = Classifier::builder()
//!     .with_labels_file("model/labels.json")
//!     .with_weights_file("model/food_model.safetensors")
//!     .build()?;
//!
//! let info = classifier.info();
//! println!("{} classes, weights loaded: {}", info.output_classes, info.weights_loaded);
//! # Ok(())
//! # }
//! ```
//!
//! # Serving
//!
//! The [`server`] module exposes the axum router with the two service
//! endpoints: `GET /` for health introspection and `POST /analyze` for the
//! image → prediction → nutrition pipeline:
//!
//! ```no_run
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use fitbite_ml::server::{router, AppContext};
//!
//! let ctx = Arc::new(AppContext::load(
//!     Path::new("model/labels.json"),
//!     Path::new("data/nutrition_data.csv"),
//!     Path::new("model/food_model.safetensors"),
//! ));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router(ctx)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! All loaded state (model weights, label map, nutrition table) is
//! read-only after startup, so the context is shared across request
//! handlers behind a plain `Arc` with no locking.

pub mod classifier;
pub mod nutrition;
pub mod server;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, Prediction};
pub use nutrition::{NutritionError, NutritionRecord, NutritionTable};
pub use server::{router, AppContext};

pub fn init_logger() {
    env_logger::init();
}
