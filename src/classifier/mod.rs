mod classifier;
mod error;
mod model;
mod preprocess;
pub mod builder;
pub mod labels;

pub use builder::ClassifierBuilder;
pub use classifier::{Classifier, Prediction};
pub use error::ClassifierError;
pub use labels::{LabelMap, LabelMapError, UNKNOWN_LABEL};
pub use model::{FoodClassifier, DEFAULT_NUM_CLASSES};
pub use preprocess::{preprocess, CROP_SIZE, RESIZE_TARGET};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of entries in the label map
    pub num_labels: usize,
    /// Output width the model was constructed with
    pub output_classes: usize,
    /// Whether trained weights were loaded from disk
    pub weights_loaded: bool,
}
