// 该文件是 Cellstate 项目的一部分。
// src/input/read_image_file.rs - 图像文件与标注文件输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::{
  annotation::split_lines,
  input::{AnalysisInput, InputError, ReadInput, decode_image},
};

pub struct ImageFileInput {
  image_path: PathBuf,
  annotation_path: PathBuf,
}

fn read_file(path: &Path) -> Result<Vec<u8>, InputError> {
  std::fs::read(path).map_err(|source| {
    error!("无法读取文件 {}: {}", path.display(), source);
    InputError::IoError {
      path: path.display().to_string(),
      source,
    }
  })
}

impl ImageFileInput {
  pub fn new(image_path: impl Into<PathBuf>, annotation_path: impl Into<PathBuf>) -> Self {
    Self {
      image_path: image_path.into(),
      annotation_path: annotation_path.into(),
    }
  }
}

impl ReadInput for ImageFileInput {
  fn read_input(self) -> Result<AnalysisInput, InputError> {
    let image_bytes = read_file(&self.image_path)?;
    let image = decode_image(&image_bytes)?;
    debug!(
      "读取图像 {}: {}x{}",
      self.image_path.display(),
      image.width(),
      image.height()
    );

    let annotation_bytes = read_file(&self.annotation_path)?;
    let annotations = String::from_utf8_lossy(&annotation_bytes).into_owned();
    debug!(
      "读取标注 {}: {} 行",
      self.annotation_path.display(),
      split_lines(&annotations).count()
    );

    Ok(AnalysisInput { image, annotations })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_image_is_io_error() {
    let err = ImageFileInput::new("/nonexistent/cell.png", "/nonexistent/cell.txt")
      .read_input()
      .err()
      .unwrap();
    assert!(matches!(err, InputError::IoError { .. }));
  }
}
