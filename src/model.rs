// 该文件是 Cellstate 项目的一部分。
// src/model.rs - 模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::fmt;

use serde::Serialize;

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

pub trait WithLabel: Sized + fmt::Debug {
  fn to_label_str(&self) -> String;
  fn to_label_id(&self) -> u32;
  fn from_label_id(id: u32) -> Option<Self>;
}

/// 小胶质细胞激活状态，顺序与分类器输出层一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ActivationState {
  Resting,
  Surveilling,
  Activated,
  Resolution,
}

impl ActivationState {
  pub const ALL: [ActivationState; 4] = [
    ActivationState::Resting,
    ActivationState::Surveilling,
    ActivationState::Activated,
    ActivationState::Resolution,
  ];

  pub const COUNT: usize = Self::ALL.len();

  pub fn name(&self) -> &'static str {
    match self {
      ActivationState::Resting => "Resting",
      ActivationState::Surveilling => "Surveilling",
      ActivationState::Activated => "Activated",
      ActivationState::Resolution => "Resolution",
    }
  }

  pub fn index(&self) -> usize {
    *self as usize
  }
}

impl fmt::Display for ActivationState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl WithLabel for ActivationState {
  fn to_label_str(&self) -> String {
    self.name().to_string()
  }

  fn to_label_id(&self) -> u32 {
    self.index() as u32
  }

  fn from_label_id(id: u32) -> Option<Self> {
    Self::ALL.get(id as usize).copied()
  }
}

/// 最大值下标，相等时取最小下标；NaN 永远不会被选中
pub fn argmax(scores: &[f32]) -> Option<usize> {
  let mut best: Option<(usize, f32)> = None;
  for (idx, &score) in scores.iter().enumerate() {
    match best {
      Some((_, max)) if score <= max || score.is_nan() => {}
      None if score.is_nan() => {}
      _ => best = Some((idx, score)),
    }
  }
  best.map(|(idx, _)| idx)
}

#[cfg(feature = "model_onnx")]
mod classifier;
#[cfg(feature = "model_onnx")]
pub use self::classifier::{ActivationClassifier, ActivationClassifierBuilder};

mod error;
pub use self::error::ClassifierError;
