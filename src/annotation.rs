// 该文件是 Cellstate 项目的一部分。
// src/annotation.rs - YOLO 标注行解析与像素坐标映射
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

use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
  #[error("标注字段数量错误: 期望 4 或 5 个, 实际 {0} 个")]
  TokenCount(usize),
  #[error("标注字段不是有效数字: {0:?}")]
  NotNumeric(String),
}

/// 归一化中心坐标框，所有字段为相对图像宽高的比例
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
  pub class_id: Option<f64>,
  pub x_center: f64,
  pub y_center: f64,
  pub width: f64,
  pub height: f64,
}

/// 像素坐标矩形 (left, top, right, bottom)，不做裁剪，可能越界或反转
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
  pub left: i64,
  pub top: i64,
  pub right: i64,
  pub bottom: i64,
}

impl PixelRect {
  pub fn width(&self) -> i64 {
    self.right.saturating_sub(self.left)
  }

  pub fn height(&self) -> i64 {
    self.bottom.saturating_sub(self.top)
  }

  pub fn is_degenerate(&self) -> bool {
    self.width() <= 0 || self.height() <= 0
  }
}

fn parse_token(token: &str) -> Result<f64, AnnotationError> {
  match f64::from_str(token) {
    Ok(value) if value.is_finite() => Ok(value),
    _ => Err(AnnotationError::NotNumeric(token.to_string())),
  }
}

impl NormalizedBox {
  /// 解析一行标注：`[class_id] x_center y_center width height`
  pub fn decode(line: &str) -> Result<Self, AnnotationError> {
    let values = line
      .split_whitespace()
      .map(parse_token)
      .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
      &[x_center, y_center, width, height] => Ok(Self {
        class_id: None,
        x_center,
        y_center,
        width,
        height,
      }),
      &[class_id, x_center, y_center, width, height] => Ok(Self {
        class_id: Some(class_id),
        x_center,
        y_center,
        width,
        height,
      }),
      other => Err(AnnotationError::TokenCount(other.len())),
    }
  }

  /// 映射到像素矩形，数值向零截断，超出 i64 范围的值饱和到边界
  pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> PixelRect {
    let (w, h) = (image_width as f64, image_height as f64);

    let left = ((self.x_center - self.width / 2.0) * w) as i64;
    let top = ((self.y_center - self.height / 2.0) * h) as i64;
    let rect_width = (self.width * w) as i64;
    let rect_height = (self.height * h) as i64;

    PixelRect {
      left,
      top,
      right: left.saturating_add(rect_width),
      bottom: top.saturating_add(rect_height),
    }
  }
}

/// 按 `\n`、`\r` 或 `\r\n` 拆分标注文本，末尾的换行不产生空行
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
  let mut rest = text;
  std::iter::from_fn(move || {
    if rest.is_empty() {
      return None;
    }
    let (line, tail) = match rest.find(['\n', '\r']) {
      Some(pos) => {
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        (&rest[..pos], &rest[pos + skip..])
      }
      None => (rest, ""),
    };
    rest = tail;
    Some(line)
  })
}

impl FromStr for NormalizedBox {
  type Err = AnnotationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::decode(s)
  }
}
