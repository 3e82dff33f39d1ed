//! # 载体图像模块
//!
//! 负责把无损图像文件解码为扁平的 8 位像素缓冲区，并在隐写完成后重新编码保存。
//! 隐写核心只接触 [`Carrier::pixels`]，对图像格式一无所知。

use anyhow::{Context, Result};
use colored::Colorize;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 解码后的图像：尺寸、通道布局和原始像素字节。
#[derive(Debug, Clone)]
pub struct Carrier {
    width: u32,
    height: u32,
    color: ExtendedColorType,
    pixels: Vec<u8>,
}

impl Carrier {
    /// 读取并解码图像文件。
    ///
    /// 8 位的 Luma、LumaA、Rgb、Rgba 图像保留原有通道布局，其余类型统一转换为 Rgba8。
    ///
    /// # Errors
    ///
    /// 文件无法读取或不是受支持的图像格式时返回错误。
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;

        let carrier = Self::from_image(image);
        debug!(
            width = carrier.width,
            height = carrier.height,
            channels = carrier.channels(),
            "carrier decoded"
        );
        Ok(carrier)
    }

    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (color, pixels) = match image {
            DynamicImage::ImageLuma8(buf) => (ExtendedColorType::L8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (ExtendedColorType::La8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (ExtendedColorType::Rgb8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (ExtendedColorType::Rgba8, buf.into_raw()),
            other => (ExtendedColorType::Rgba8, other.into_rgba8().into_raw()),
        };

        Self {
            width,
            height,
            color,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.color.channel_count()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// 隐写结果的最大明文字节数。
    pub fn capacity(&self) -> usize {
        crate::codec::capacity(self.pixels.len())
    }

    /// 编码为图像文件，格式由扩展名决定。
    ///
    /// 先在内存中完成编码，成功后才写入 `path`，失败时不会留下残缺的文件。
    ///
    /// # Errors
    ///
    /// 扩展名不可写、属于有损格式、编码器不支持当前通道布局，或写入失败时返回错误。
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = output_format(path)?;

        let mut encoded = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut encoded,
            &self.pixels,
            self.width,
            self.height,
            self.color,
            format,
        )
        .with_context(|| {
            format!(
                "Unable to encode the image as {:?} for: {}",
                format,
                path.to_string_lossy().red().bold()
            )
        })?;

        fs::write(path, encoded.into_inner()).with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;

        debug!(?format, bytes = self.pixels.len(), "carrier saved");
        Ok(())
    }
}

/// 根据扩展名确定输出格式，并确认它是可写的无损格式。
///
/// # Errors
///
/// 扩展名无法识别、该格式未启用写入支持，或属于有损格式时返回错误。
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Unable to determine the image format of: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        !matches!(format, ImageFormat::Jpeg | ImageFormat::Avif),
        "Lossy output format {:?} would destroy the hidden data: {}",
        format,
        path.to_string_lossy().red().bold()
    );
    anyhow::ensure!(
        format.writing_enabled(),
        "Writing {:?} images is not supported: {}",
        format,
        path.to_string_lossy().red().bold()
    );

    Ok(format)
}
