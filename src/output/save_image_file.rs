// 该文件是 Cellstate 项目的一部分。
// src/output/save_image_file.rs - 保存标注图与 PNG 原图
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

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
  analysis::{Analysis, Summary},
  output::Render,
};

pub const DEFAULT_ANNOTATED_PATH: &str = "/tmp/annotated_result.png";
const CONVERTED_SUFFIX: &str = "_converted.png";

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
}

/// 文件调用方式的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
  pub annotated_image_path: PathBuf,
  pub converted_original_path: PathBuf,
  pub summary: Summary,
}

pub struct SaveImageFileOutput {
  annotated_path: PathBuf,
  converted_path: PathBuf,
}

/// `<去掉扩展名的原路径>_converted.png`
pub fn converted_path_for(image_path: &Path) -> PathBuf {
  let stem = image_path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  image_path.with_file_name(format!("{stem}{CONVERTED_SUFFIX}"))
}

impl SaveImageFileOutput {
  pub fn for_image(image_path: impl AsRef<Path>) -> Self {
    Self {
      annotated_path: PathBuf::from(DEFAULT_ANNOTATED_PATH),
      converted_path: converted_path_for(image_path.as_ref()),
    }
  }

  pub fn with_annotated_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.annotated_path = path.into();
    self
  }

  pub fn annotated_path(&self) -> &Path {
    &self.annotated_path
  }

  pub fn converted_path(&self) -> &Path {
    &self.converted_path
  }

  fn save_image(&self, image: &RgbImage, path: &Path) -> Result<(), SaveImageFileError> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    image.save_with_format(path, ImageFormat::Png)?;

    info!("保存图像到文件: {}", path.display());

    Ok(())
  }
}

impl Render<RgbImage, Analysis> for SaveImageFileOutput {
  type Output = FileReport;
  type Error = SaveImageFileError;

  fn render_result(&self, original: &RgbImage, analysis: &Analysis) -> Result<Self::Output, Self::Error> {
    self.save_image(original, &self.converted_path)?;
    self.save_image(&analysis.annotated, &self.annotated_path)?;

    Ok(FileReport {
      annotated_image_path: self.annotated_path.clone(),
      converted_original_path: self.converted_path.clone(),
      summary: analysis.summary.clone(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_converted_path_replaces_extension() {
    assert_eq!(
      converted_path_for(Path::new("/data/uploads/slide.v2.tif")),
      PathBuf::from("/data/uploads/slide.v2_converted.png")
    );
    assert_eq!(
      converted_path_for(Path::new("cells.jpg")),
      PathBuf::from("cells_converted.png")
    );
    assert_eq!(
      converted_path_for(Path::new("/data/raw")),
      PathBuf::from("/data/raw_converted.png")
    );
  }

  #[test]
  fn test_render_writes_both_images() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("cells.jpg");
    let output = SaveImageFileOutput::for_image(&image_path)
      .with_annotated_path(dir.path().join("out/annotated.png"));

    let original = RgbImage::new(8, 8);
    let analysis = Analysis {
      annotated: original.clone(),
      summary: Summary::default(),
      classified: Vec::new(),
      skipped: 0,
    };
    let report = output.render_result(&original, &analysis).unwrap();

    assert_eq!(report.converted_original_path, dir.path().join("cells_converted.png"));
    assert!(report.converted_original_path.exists());
    assert!(report.annotated_image_path.exists());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("annotatedImagePath").is_some());
    assert!(json.get("convertedOriginalPath").is_some());
  }
}
