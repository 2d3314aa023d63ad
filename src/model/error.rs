// 该文件是 Cellstate 项目的一部分。
// src/model/error.rs - 分类器错误定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;

use crate::frame::RegionError;

#[derive(Error, Debug)]
pub enum ClassifierError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(String),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("区域无效: {0}")]
  InvalidRegion(#[from] RegionError),
  #[error("推理错误: {0}")]
  InferenceError(String),
  #[cfg(feature = "model_onnx")]
  #[error("ONNX Runtime 错误: {0}")]
  OrtError(#[from] ort::Error),
}

impl ClassifierError {
  pub fn invalid(msg: impl Into<String>) -> Self {
    ClassifierError::ModelInvalid(msg.into())
  }

  /// 启动阶段的错误是致命的，单个区域的错误只影响当前框
  pub fn is_fatal(&self) -> bool {
    matches!(
      self,
      ClassifierError::ModelLoadError(_) | ClassifierError::ModelInvalid(_)
    )
  }
}
