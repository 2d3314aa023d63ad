// 该文件是 Cellstate 项目的一部分。
// src/frame.rs - 区域裁剪与 NCHW 归一化帧
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

use image::{RgbImage, imageops::FilterType};
use thiserror::Error;

use crate::annotation::PixelRect;

const RGB_CHANNELS: usize = 3;

/// 单个裁剪区域允许的最大像素数（约 6700 万像素，RGB 约 200 MB）
pub const MAX_REGION_PIXELS: u64 = 1 << 26;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
  #[error("区域尺寸无效: {width}x{height}")]
  Empty { width: i64, height: i64 },
  #[error("区域尺寸过大: {width}x{height}")]
  TooLarge { width: i64, height: i64 },
}

/// 从图像中裁剪矩形区域，图像外的像素填充为黑色
pub fn crop_region(image: &RgbImage, rect: &PixelRect) -> Result<RgbImage, RegionError> {
  let (width, height) = (rect.width(), rect.height());
  if rect.is_degenerate() {
    return Err(RegionError::Empty { width, height });
  }
  if (width as u64).saturating_mul(height as u64) > MAX_REGION_PIXELS {
    return Err(RegionError::TooLarge { width, height });
  }

  let mut region = RgbImage::new(width as u32, height as u32);

  // 与原图相交的部分
  let x_begin = rect.left.max(0);
  let y_begin = rect.top.max(0);
  let x_end = rect.right.min(image.width() as i64);
  let y_end = rect.bottom.min(image.height() as i64);

  for y in y_begin..y_end {
    for x in x_begin..x_end {
      let pixel = *image.get_pixel(x as u32, y as u32);
      region.put_pixel((x - rect.left) as u32, (y - rect.top) as u32, pixel);
    }
  }

  Ok(region)
}

/// 分类器输入预处理：缩放、归一化到 [0,1]、按通道标准化
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocess {
  pub input_size: u32,
  pub mean: [f32; 3],
  pub std: [f32; 3],
}

impl Preprocess {
  pub fn new(input_size: u32) -> Self {
    Self {
      input_size,
      mean: [0.5, 0.5, 0.5],
      std: [0.5, 0.5, 0.5],
    }
  }

  pub fn apply(&self, region: &RgbImage) -> Result<RgbNchwFrame, RegionError> {
    let (width, height) = region.dimensions();
    if width == 0 || height == 0 || self.input_size == 0 {
      return Err(RegionError::Empty {
        width: width as i64,
        height: height as i64,
      });
    }

    let size = self.input_size;
    let resized = image::imageops::resize(region, size, size, FilterType::Triangle);

    let mut frame = RgbNchwFrame::with_size(size as usize);
    let plane = frame.plane_len();
    let slice = frame.as_mut();

    for (x, y, pixel) in resized.enumerate_pixels() {
      let idx = (y as usize) * (size as usize) + (x as usize);
      for c in 0..RGB_CHANNELS {
        let value = pixel[c] as f32 / 255.0;
        slice[c * plane + idx] = (value - self.mean[c]) / self.std[c];
      }
    }

    Ok(frame)
  }
}

/// 单张 NCHW 排布的 f32 帧，N = 1
#[derive(Debug, Clone)]
pub struct RgbNchwFrame {
  size: usize,
  data: Box<[f32]>,
}

impl RgbNchwFrame {
  pub fn with_size(size: usize) -> Self {
    Self {
      size,
      data: vec![0.0f32; RGB_CHANNELS * size * size].into_boxed_slice(),
    }
  }

  pub fn shape(&self) -> [usize; 4] {
    [1, RGB_CHANNELS, self.size, self.size]
  }

  fn plane_len(&self) -> usize {
    self.size * self.size
  }

  pub fn as_nchw(&self) -> &[f32] {
    &self.data
  }
}

impl AsMut<[f32]> for RgbNchwFrame {
  fn as_mut(&mut self) -> &mut [f32] {
    &mut self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  fn rect(left: i64, top: i64, right: i64, bottom: i64) -> PixelRect {
    PixelRect {
      left,
      top,
      right,
      bottom,
    }
  }

  #[test]
  fn test_crop_inside_image() {
    let image = RgbImage::from_fn(10, 10, |x, y| Rgb([x as u8, y as u8, 7]));
    let region = crop_region(&image, &rect(2, 3, 6, 8)).unwrap();
    assert_eq!(region.dimensions(), (4, 5));
    assert_eq!(region.get_pixel(0, 0), &Rgb([2, 3, 7]));
    assert_eq!(region.get_pixel(3, 4), &Rgb([5, 7, 7]));
  }

  #[test]
  fn test_crop_out_of_bounds_pads_black() {
    let image = RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]));
    let region = crop_region(&image, &rect(-2, -2, 2, 2)).unwrap();
    assert_eq!(region.dimensions(), (4, 4));
    assert_eq!(region.get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_eq!(region.get_pixel(1, 3), &Rgb([0, 0, 0]));
    assert_eq!(region.get_pixel(2, 2), &Rgb([200, 100, 50]));
    assert_eq!(region.get_pixel(3, 3), &Rgb([200, 100, 50]));

    // 完全在图像外
    let region = crop_region(&image, &rect(10, 10, 13, 12)).unwrap();
    assert!(region.pixels().all(|p| *p == Rgb([0, 0, 0])));
  }

  #[test]
  fn test_crop_rejects_degenerate() {
    let image = RgbImage::new(4, 4);
    assert_eq!(
      crop_region(&image, &rect(2, 2, 2, 3)),
      Err(RegionError::Empty {
        width: 0,
        height: 1
      })
    );
    assert!(crop_region(&image, &rect(3, 0, 1, 2)).is_err());
  }

  #[test]
  fn test_crop_rejects_oversized_region() {
    let image = RgbImage::new(100, 100);
    assert_eq!(
      crop_region(&image, &rect(-5_000_000, -5_000_000, 5_000_000, 5_000_000)),
      Err(RegionError::TooLarge {
        width: 10_000_000,
        height: 10_000_000
      })
    );
    assert!(crop_region(&image, &rect(0, 0, i64::MAX, 1)).is_err());

    // 细长但总像素数在限制内的区域仍然可以裁剪
    let region = crop_region(&image, &rect(0, 0, 100_000, 1)).unwrap();
    assert_eq!(region.dimensions(), (100_000, 1));
  }

  #[test]
  fn test_preprocess_normalizes_channels() {
    let region = RgbImage::from_pixel(5, 3, Rgb([255, 0, 51]));
    let frame = Preprocess::new(4).apply(&region).unwrap();
    assert_eq!(frame.shape(), [1, 3, 4, 4]);

    let data = frame.as_nchw();
    assert_eq!(data.len(), 48);
    assert!(data[..16].iter().all(|v| (*v - 1.0).abs() < 1e-6));
    assert!(data[16..32].iter().all(|v| (*v + 1.0).abs() < 1e-6));
    assert!(data[32..].iter().all(|v| (*v + 0.6).abs() < 1e-6));
  }

  #[test]
  fn test_preprocess_rejects_empty_region() {
    let region = RgbImage::new(0, 3);
    assert!(Preprocess::new(64).apply(&region).is_err());
  }
}
