// 该文件是 Cellstate 项目的一部分。
// src/output.rs - 输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;

pub trait Render<Frame, R>: Sized {
  type Output;
  type Error;
  fn render_result(&self, frame: &Frame, result: &R) -> Result<Self::Output, Self::Error>;
}

pub mod draw;

mod encode;
pub use self::encode::{EncodedOutput, EncodedReport, encode_png};

#[cfg(feature = "save_image_file")]
mod save_image_file;
#[cfg(feature = "save_image_file")]
pub use self::save_image_file::{
  DEFAULT_ANNOTATED_PATH, FileReport, SaveImageFileError, SaveImageFileOutput,
};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("图像编码错误: {0}")]
  EncodeError(#[from] image::ImageError),
  #[cfg(feature = "save_image_file")]
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
}
