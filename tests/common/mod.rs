// 该文件是 Cellstate 项目的一部分。
// tests/common/mod.rs - 测试用的桩模型与图像
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

#![allow(dead_code)]

use std::{io::Cursor, sync::Mutex};

use cellstate::{
  ActivationState, Analyzer, Model, frame::RegionError, model::ClassifierError,
  output::draw::Draw,
};
use image::{ImageFormat, Rgb, RgbImage};

pub const BACKGROUND: Rgb<u8> = Rgb([128, 128, 128]);

/// 对任何非空区域都返回固定状态
pub struct FixedModel(pub ActivationState);

impl Model for FixedModel {
  type Input = RgbImage;
  type Output = ActivationState;
  type Error = ClassifierError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    if input.width() == 0 || input.height() == 0 {
      return Err(RegionError::Empty {
        width: input.width() as i64,
        height: input.height() as i64,
      }
      .into());
    }
    Ok(self.0)
  }
}

/// 记录收到的每个裁剪区域，按区域平均亮度决定状态
#[derive(Default)]
pub struct RecordingModel {
  pub regions: Mutex<Vec<RgbImage>>,
}

impl Model for RecordingModel {
  type Input = RgbImage;
  type Output = ActivationState;
  type Error = ClassifierError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    self.regions.lock().unwrap().push(input.clone());
    let area = (input.width() as u64 * input.height() as u64).max(1);
    let mean = input.pixels().map(|p| p[0] as u64).sum::<u64>() / area;
    Ok(if mean > 200 {
      ActivationState::Activated
    } else {
      ActivationState::Resting
    })
  }
}

/// 总是失败的模型
pub struct FailingModel;

impl Model for FailingModel {
  type Input = RgbImage;
  type Output = ActivationState;
  type Error = ClassifierError;

  fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
    Err(ClassifierError::InferenceError("桩模型失败".to_string()))
  }
}

pub fn analyzer<M>(model: M) -> Analyzer<M>
where
  M: Model<Input = RgbImage, Output = ActivationState>,
  M::Error: std::fmt::Display,
{
  Analyzer::new(model, Draw::new().unwrap())
}

pub fn gray_image(width: u32, height: u32) -> RgbImage {
  RgbImage::from_pixel(width, height, BACKGROUND)
}

pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
  let mut bytes = Vec::new();
  image
    .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
    .unwrap();
  bytes
}
