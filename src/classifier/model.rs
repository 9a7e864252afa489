use candle_core::{Result, Tensor, D};
use candle_nn::{Conv2d, Conv2dConfig, Linear, Module, VarBuilder};

/// Output width used when no label map is available.
pub const DEFAULT_NUM_CLASSES: usize = 2;

/// Fixed-architecture image classifier: a small convolutional backbone
/// followed by a linear head.
///
/// The network maps a normalized `Bx3x224x224` tensor to `BxN` logits,
/// where `N` is the number of classes it was constructed for. Parameters
/// live in the [`candle_nn::VarMap`] the [`VarBuilder`] was created from,
/// so they can be overwritten in place by loading a safetensors file after
/// construction.
#[derive(Debug)]
pub struct FoodClassifier {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    head: Linear,
}

impl FoodClassifier {
    pub fn new(num_classes: usize, vb: VarBuilder) -> Result<Self> {
        let cfg = Conv2dConfig {
            padding: 1,
            stride: 2,
            ..Default::default()
        };
        let conv1 = candle_nn::conv2d(3, 16, 3, cfg, vb.pp("conv1"))?;
        let conv2 = candle_nn::conv2d(16, 32, 3, cfg, vb.pp("conv2"))?;
        let conv3 = candle_nn::conv2d(32, 64, 3, cfg, vb.pp("conv3"))?;
        let head = candle_nn::linear(64, num_classes, vb.pp("head"))?;
        Ok(Self {
            conv1,
            conv2,
            conv3,
            head,
        })
    }
}

impl Module for FoodClassifier {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.conv1.forward(xs)?.relu()?;
        let xs = self.conv2.forward(&xs)?.relu()?;
        let xs = self.conv3.forward(&xs)?.relu()?;
        // Global average pool over the spatial dimensions.
        let xs = xs.mean(D::Minus1)?.mean(D::Minus1)?;
        self.head.forward(&xs)
    }
}
