use candle_core::Error as CandleError;
use image::ImageError;
use std::fmt;

/// Represents the different types of errors that can occur in the food classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while decoding the uploaded image bytes
    Decode(String),
    /// Inference was requested before a model was constructed
    NotInitialized,
    /// Error occurred while building the model or loading its weights
    Model(String),
    /// Error occurred while running the prediction pipeline
    Prediction(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "Image decode error: {}", msg),
            Self::NotInitialized => write!(f, "Model not initialized"),
            Self::Model(msg) => write!(f, "Model error: {}", msg),
            Self::Prediction(msg) => write!(f, "Prediction error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<CandleError> for ClassifierError {
    fn from(err: CandleError) -> Self {
        ClassifierError::Prediction(err.to_string())
    }
}

impl From<ImageError> for ClassifierError {
    fn from(err: ImageError) -> Self {
        ClassifierError::Decode(err.to_string())
    }
}
