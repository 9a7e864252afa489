use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use log::{info, warn};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::labels::LabelMap;
use super::model::{FoodClassifier, DEFAULT_NUM_CLASSES};

/// A builder for constructing a [`Classifier`] with a fluent interface.
///
/// Every input file is optional on disk: a missing or malformed labels
/// file yields an empty label map, and a missing or incompatible weights
/// file leaves the model with its random initialization. Each degradation
/// is logged as a warning and never fails the build, so the service can
/// start and answer requests with whatever resources are available.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use fitbite_ml::classifier::Classifier;
///
/// let classifier = Classifier::builder()
///     .with_labels_file("model/labels.json")
///     .with_weights_file("model/food_model.safetensors")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    labels_path: Option<PathBuf>,
    weights_path: Option<PathBuf>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path of the JSON label file
    pub fn with_labels_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.labels_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the path of the safetensors weights file
    pub fn with_weights_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.weights_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the final [`Classifier`] instance.
    ///
    /// The model output width equals the number of labels when the label
    /// map is non-empty, and falls back to a fixed default of 2 otherwise.
    ///
    /// # Errors
    /// Returns `ClassifierError::Model` only when the network itself
    /// cannot be constructed; missing or malformed input files are
    /// substituted with defaults instead of failing.
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let labels = self.load_labels();

        let num_classes = if labels.is_empty() {
            warn!(
                "No labels available, constructing model with {} output classes",
                DEFAULT_NUM_CLASSES
            );
            DEFAULT_NUM_CLASSES
        } else {
            labels.len()
        };

        let device = Device::Cpu;
        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = FoodClassifier::new(num_classes, vb)
            .map_err(|e| ClassifierError::Model(format!("Failed to construct model: {}", e)))?;

        let weights_loaded = self.load_weights(&mut varmap);

        info!(
            "Classifier ready: {} classes, weights {}",
            num_classes,
            if weights_loaded { "loaded" } else { "randomly initialized" }
        );

        Ok(Classifier {
            model,
            labels,
            device,
            num_classes,
            weights_loaded,
        })
    }

    fn load_labels(&self) -> LabelMap {
        let Some(path) = &self.labels_path else {
            return LabelMap::empty();
        };
        if !path.exists() {
            warn!("Labels file not found at {}", path.display());
            return LabelMap::empty();
        }
        match LabelMap::from_file(path) {
            Ok(labels) => {
                info!("Loaded {} labels from {}", labels.len(), path.display());
                labels
            }
            Err(e) => {
                warn!("Error loading labels from {}: {}", path.display(), e);
                LabelMap::empty()
            }
        }
    }

    /// Loads saved weights into the live variables, returning whether the
    /// model now carries trained parameters.
    fn load_weights(&self, varmap: &mut VarMap) -> bool {
        let Some(path) = &self.weights_path else {
            return false;
        };
        if !path.exists() {
            warn!(
                "Weights file not found at {}, running with uninitialized weights",
                path.display()
            );
            return false;
        }
        match varmap.load(path) {
            Ok(()) => {
                info!("Model weights loaded from {}", path.display());
                true
            }
            Err(e) => {
                warn!(
                    "Error loading model weights from {}: {}, running with uninitialized weights",
                    path.display(),
                    e
                );
                false
            }
        }
    }
}
