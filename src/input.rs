// 该文件是 Cellstate 项目的一部分。
// src/input.rs - 图像与标注输入
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::io::Cursor;

use image::{ImageReader, RgbImage};
use thiserror::Error;

mod read_image_file;
pub use self::read_image_file::ImageFileInput;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("I/O error: {path}: {source}")]
  IoError {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
  #[error("Image format detection error: {0}")]
  FormatError(std::io::Error),
}

/// 一次分析所需的全部输入：解码后的 RGB 图像和原始标注文本
#[derive(Debug, Clone)]
pub struct AnalysisInput {
  pub image: RgbImage,
  pub annotations: String,
}

pub trait ReadInput {
  fn read_input(self) -> Result<AnalysisInput, InputError>;
}

/// 从内存中的图像字节解码为 RGB 图像，格式由内容推断
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, InputError> {
  let image = ImageReader::new(Cursor::new(bytes))
    .with_guessed_format()
    .map_err(InputError::FormatError)?
    .decode()?;
  Ok(image.to_rgb8())
}

/// 内存输入，供宿主服务直接调用
pub struct MemoryInput<'a> {
  image_bytes: &'a [u8],
  annotations: &'a str,
}

impl<'a> MemoryInput<'a> {
  pub fn new(image_bytes: &'a [u8], annotations: &'a str) -> Self {
    Self {
      image_bytes,
      annotations,
    }
  }
}

impl ReadInput for MemoryInput<'_> {
  fn read_input(self) -> Result<AnalysisInput, InputError> {
    Ok(AnalysisInput {
      image: decode_image(self.image_bytes)?,
      annotations: self.annotations.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{ImageFormat, Rgb};

  #[test]
  fn test_decode_png_bytes() {
    let source = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
    let mut bytes = Vec::new();
    source
      .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
      .unwrap();

    let input = MemoryInput::new(&bytes, "0.5 0.5 0.2 0.2").read_input().unwrap();
    assert_eq!(input.image, source);
    assert_eq!(input.annotations, "0.5 0.5 0.2 0.2");
  }

  #[test]
  fn test_decode_garbage_fails() {
    let err = MemoryInput::new(b"definitely not an image", "")
      .read_input()
      .err()
      .unwrap();
    assert!(matches!(err, InputError::ImageLoadError(_)));
  }
}
