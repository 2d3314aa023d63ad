// 该文件是 Cellstate 项目的一部分。
// src/output/draw.rs - 分类结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::collections::HashMap;

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use thiserror::Error;

use crate::{
  annotation::PixelRect,
  model::{ActivationState, WithLabel},
};

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_OFFSET: (i32, i32) = (2, -10);
const STROKE_WIDTH: i64 = 2;
const DEFAULT_COLOR: [u8; 3] = [255, 255, 255]; // 白色

const FONT_DATA: &[u8] = include_bytes!("../../assets/font.ttf");

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("无法加载嵌入的字体文件: {0}")]
  FontError(#[from] ab_glyph::InvalidFont),
}

/// 各状态的默认颜色
pub fn default_palette() -> HashMap<ActivationState, Rgb<u8>> {
  HashMap::from([
    (ActivationState::Resting, Rgb([0, 0, 255])),
    (ActivationState::Surveilling, Rgb([0, 128, 0])),
    (ActivationState::Activated, Rgb([255, 0, 0])),
    (ActivationState::Resolution, Rgb([255, 255, 0])),
  ])
}

pub struct Draw {
  font: FontRef<'static>,
  font_size: f32,
  label_offset: (i32, i32),
  stroke_width: i64,
  palette: HashMap<ActivationState, Rgb<u8>>,
  default_color: Rgb<u8>,
}

impl Draw {
  pub fn new() -> Result<Self, DrawError> {
    let font = FontRef::try_from_slice(FONT_DATA)?;

    Ok(Self {
      font,
      font_size: LABEL_FONT_SIZE,
      label_offset: LABEL_OFFSET,
      stroke_width: STROKE_WIDTH,
      palette: default_palette(),
      default_color: Rgb(DEFAULT_COLOR),
    })
  }

  pub fn with_color(mut self, state: ActivationState, color: Rgb<u8>) -> Self {
    self.palette.insert(state, color);
    self
  }

  /// 移除某个状态的颜色，此后该状态使用默认颜色
  pub fn without_color(mut self, state: ActivationState) -> Self {
    self.palette.remove(&state);
    self
  }

  pub fn with_default_color(mut self, color: Rgb<u8>) -> Self {
    self.default_color = color;
    self
  }

  pub fn with_font_size(mut self, font_size: f32) -> Self {
    self.font_size = font_size;
    self
  }

  pub fn color_for(&self, state: ActivationState) -> Rgb<u8> {
    self
      .palette
      .get(&state)
      .copied()
      .unwrap_or(self.default_color)
  }

  /// 绘制矩形边框（向内加粗）和左上角的状态标签，超出图像的部分被裁掉
  pub fn draw_box(&self, image: &mut RgbImage, rect: &PixelRect, state: ActivationState) {
    let color = self.color_for(state);
    self.draw_outline(image, rect, color);

    let label = state.to_label_str();
    let x = rect.left.checked_add(self.label_offset.0 as i64);
    let y = rect.top.checked_add(self.label_offset.1 as i64);
    if let (Some(Ok(x)), Some(Ok(y))) = (x.map(i32::try_from), y.map(i32::try_from)) {
      draw_text_mut(
        image,
        color,
        x,
        y,
        PxScale::from(self.font_size),
        &self.font,
        &label,
      );
    }
  }

  fn draw_outline(&self, image: &mut RgbImage, rect: &PixelRect, color: Rgb<u8>) {
    let (w, h) = (image.width() as i64, image.height() as i64);

    for thickness in 0..self.stroke_width {
      let x_min = rect.left.saturating_add(thickness);
      let y_min = rect.top.saturating_add(thickness);
      let x_max = rect.right.saturating_sub(thickness);
      let y_max = rect.bottom.saturating_sub(thickness);
      if x_max < x_min || y_max < y_min {
        break;
      }

      // 上下边
      for x in x_min.max(0)..=x_max.min(w - 1) {
        for y in [y_min, y_max] {
          if (0..h).contains(&y) {
            image.put_pixel(x as u32, y as u32, color);
          }
        }
      }

      // 左右边
      for y in y_min.max(0)..=y_max.min(h - 1) {
        for x in [x_min, x_max] {
          if (0..w).contains(&x) {
            image.put_pixel(x as u32, y as u32, color);
          }
        }
      }
    }
  }
}
