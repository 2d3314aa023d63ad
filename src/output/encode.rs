// 该文件是 Cellstate 项目的一部分。
// src/output/encode.rs - PNG + base64 结果打包
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

use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbImage};
use serde::Serialize;

use crate::{
  analysis::{Analysis, Summary},
  output::{OutputError, Render},
};

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, OutputError> {
  let mut buffer = Vec::new();
  image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
  Ok(buffer)
}

/// 内存调用方式的结果
#[derive(Debug, Clone, Serialize)]
pub struct EncodedReport {
  pub annotated_image_base64: String,
  pub converted_original_base64: String,
  pub summary: Summary,
}

/// 把标注图和原图编码为 PNG 再转 base64
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodedOutput;

impl Render<RgbImage, Analysis> for EncodedOutput {
  type Output = EncodedReport;
  type Error = OutputError;

  fn render_result(&self, original: &RgbImage, analysis: &Analysis) -> Result<Self::Output, Self::Error> {
    let annotated = encode_png(&analysis.annotated)?;
    let converted = encode_png(original)?;

    Ok(EncodedReport {
      annotated_image_base64: general_purpose::STANDARD.encode(annotated),
      converted_original_base64: general_purpose::STANDARD.encode(converted),
      summary: analysis.summary.clone(),
    })
  }
}
