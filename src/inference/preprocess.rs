use crate::error::{AppError, AppResult};
use image::{DynamicImage, imageops::FilterType};
use ndarray::{Array3, ArrayD, Axis};

/// 模型输入分辨率（宽高相同）
pub const INPUT_SIZE: u32 = 224;

/// 输入通道数
pub const INPUT_CHANNELS: usize = 3;

/// 解码图片字节
pub fn decode_image(image_data: &[u8]) -> AppResult<DynamicImage> {
    let image_reader = image::ImageReader::new(std::io::Cursor::new(image_data))
        .with_guessed_format()
        .map_err(|e| AppError::decode(format!("无法识别图片格式: {}", e)))?;

    image_reader
        .decode()
        .map_err(|e| AppError::decode(format!("图片解码失败: {}", e)))
}

/// 双线性缩放到 224x224 并归一化到 [0, 1]，输出 HWC 张量
pub fn to_tensor(image: &DynamicImage) -> AppResult<ArrayD<f32>> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let side = INPUT_SIZE as usize;
    let pixels = Array3::from_shape_vec((side, side, INPUT_CHANNELS), resized.into_raw())
        .map_err(|e| AppError::prediction_failed(format!("像素数据形状错误: {}", e)))?;

    Ok(pixels.mapv(|v| v as f32 / 255.0).into_dyn())
}

/// 三维张量补上 batch 维，已有四维则原样返回
pub fn ensure_batch_dim(tensor: ArrayD<f32>) -> ArrayD<f32> {
    if tensor.ndim() == 3 {
        tensor.insert_axis(Axis(0))
    } else {
        tensor
    }
}

/// 从原始字节得到模型输入 `[1, 224, 224, 3]`
pub fn prepare_input(image_data: &[u8]) -> AppResult<ArrayD<f32>> {
    let image = decode_image(image_data)?;
    let tensor = ensure_batch_dim(to_tensor(&image)?);

    tracing::debug!("预处理后的张量形状: {:?}", tensor.shape());

    Ok(tensor)
}
