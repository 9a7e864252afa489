use candle_core::{Device, D};
use candle_nn::ops::softmax;
use candle_nn::Module;

use super::error::ClassifierError;
use super::labels::LabelMap;
use super::model::FoodClassifier;
use super::preprocess::preprocess;

/// The outcome of classifying a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index of the winning class, in `[0, N-1]`.
    pub index: usize,
    /// Display name resolved from the label map, or `"Unknown"`.
    pub label: String,
    /// Probability of the winning class, in `[0, 1]`.
    pub confidence: f32,
}

/// A thread-safe food image classifier.
///
/// Composes the full inference pipeline: image decode, preprocessing,
/// forward pass, softmax, arg-max selection, and label resolution. All
/// state is read-only after construction, so a `Classifier` can be shared
/// across threads behind an `Arc` without locking.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use fitbite_ml::classifier::Classifier;
///
/// // With no files on disk the classifier still builds, running with
/// // randomly initialized weights and an empty label map.
/// let classifier = Classifier::builder().build()?;
/// assert_eq!(classifier.info().output_classes, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub(crate) model: FoodClassifier,
    pub(crate) labels: LabelMap,
    pub(crate) device: Device,
    pub(crate) num_classes: usize,
    pub(crate) weights_loaded: bool,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_labels: self.labels.len(),
            output_classes: self.num_classes,
            weights_loaded: self.weights_loaded,
        }
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Classifies a single uploaded image.
    ///
    /// Runs the forward pass in inference mode, applies a softmax across
    /// the output logits, and selects the most probable class. When
    /// multiple classes tie for the maximum probability the lowest index
    /// wins.
    ///
    /// # Errors
    /// - `Decode` if the bytes are not a decodable image
    /// - `Prediction` if the forward pass or probability extraction fails
    pub fn predict(&self, image_bytes: &[u8]) -> Result<Prediction, ClassifierError> {
        let input = preprocess(image_bytes, &self.device)?;
        let logits = self.model.forward(&input)?;
        let probabilities = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;

        let (index, confidence) = Self::arg_max(&probabilities).ok_or_else(|| {
            ClassifierError::Prediction("Model produced an empty probability vector".into())
        })?;

        Ok(Prediction {
            index,
            label: self.labels.resolve(index).to_string(),
            confidence,
        })
    }

    fn arg_max(probabilities: &[f32]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &probability) in probabilities.iter().enumerate() {
            match best {
                Some((_, current)) if probability <= current => {}
                _ => best = Some((index, probability)),
            }
        }
        best
    }
}
