use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::GenericImageView;

use super::error::ClassifierError;

/// Side length of the square crop fed to the model.
pub const CROP_SIZE: u32 = 224;
/// Target length for the short edge before cropping.
pub const RESIZE_TARGET: u32 = 256;

const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Converts raw uploaded image bytes into the `1x3x224x224` tensor the
/// model expects.
///
/// The transform order is a hard contract for reproducing model behavior:
/// decode to RGB, resize the short edge to 256 (bilinear), center-crop to
/// 224x224, scale to `[0, 1]`, then normalize each channel with the fixed
/// mean and standard deviation the backbone was trained with.
///
/// # Errors
/// - `Decode` if the bytes are not a decodable still image
/// - `Prediction` if tensor construction fails
pub fn preprocess(image_bytes: &[u8], device: &Device) -> Result<Tensor, ClassifierError> {
    let img = image::load_from_memory(image_bytes)?;

    let (width, height) = img.dimensions();
    let (new_width, new_height) = if width < height {
        let scaled = (height as f32 * RESIZE_TARGET as f32 / width as f32).round() as u32;
        (RESIZE_TARGET, scaled)
    } else {
        let scaled = (width as f32 * RESIZE_TARGET as f32 / height as f32).round() as u32;
        (scaled, RESIZE_TARGET)
    };
    let resized = img.resize_exact(new_width, new_height, FilterType::Triangle);

    let left = (new_width - CROP_SIZE) / 2;
    let top = (new_height - CROP_SIZE) / 2;
    let cropped = resized.crop_imm(left, top, CROP_SIZE, CROP_SIZE).to_rgb8();

    let plane = (CROP_SIZE * CROP_SIZE) as usize;
    let mut data = vec![0f32; 3 * plane];
    for (x, y, pixel) in cropped.enumerate_pixels() {
        let offset = (y * CROP_SIZE + x) as usize;
        for channel in 0..3 {
            let value = pixel[channel] as f32 / 255.0;
            data[channel * plane + offset] =
                (value - CHANNEL_MEAN[channel]) / CHANNEL_STD[channel];
        }
    }

    let tensor = Tensor::from_vec(data, (3, CROP_SIZE as usize, CROP_SIZE as usize), device)?
        .unsqueeze(0)?;
    Ok(tensor)
}
