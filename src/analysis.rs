// 该文件是 Cellstate 项目的一部分。
// src/analysis.rs - 逐框裁剪、分类、统计与标注
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

use std::fmt::Display;

use image::RgbImage;
use serde::{Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
  annotation::{AnnotationError, NormalizedBox, PixelRect, split_lines},
  frame::{RegionError, crop_region},
  model::{ActivationState, Model},
  output::draw::Draw,
};

/// 各状态的计数，序列化时按类别顺序输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
  counts: [usize; ActivationState::COUNT],
}

impl Summary {
  pub fn increment(&mut self, state: ActivationState) {
    self.counts[state.index()] += 1;
  }

  pub fn get(&self, state: ActivationState) -> usize {
    self.counts[state.index()]
  }

  pub fn total(&self) -> usize {
    self.counts.iter().sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = (ActivationState, usize)> + '_ {
    ActivationState::ALL
      .iter()
      .map(|state| (*state, self.counts[state.index()]))
  }
}

impl Serialize for Summary {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(ActivationState::COUNT))?;
    for (state, count) in self.iter() {
      map.serialize_entry(state.name(), &count)?;
    }
    map.end()
  }
}

/// 单个标注行被跳过的原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
  #[error("标注格式错误: {0}")]
  MalformedAnnotation(#[from] AnnotationError),
  #[error("区域无效: {0}")]
  InvalidRegion(#[from] RegionError),
  #[error("分类失败: {0}")]
  Classifier(String),
}

/// 成功分类的一个框
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
  pub line: usize,
  pub rect: PixelRect,
  pub state: ActivationState,
}

pub struct Analysis {
  pub annotated: RgbImage,
  pub summary: Summary,
  pub classified: Vec<Classified>,
  pub skipped: usize,
}

/// 分析器：持有只读的分类模型和绘制配置，可重复调用
pub struct Analyzer<M> {
  model: M,
  draw: Draw,
}

impl<M> Analyzer<M>
where
  M: Model<Input = RgbImage, Output = ActivationState>,
  M::Error: Display,
{
  pub fn new(model: M, draw: Draw) -> Self {
    Self { model, draw }
  }

  pub fn model(&self) -> &M {
    &self.model
  }

  pub fn draw(&self) -> &Draw {
    &self.draw
  }

  /// 按顺序处理每一行标注
  ///
  /// 裁剪取自正在绘制的标注图，因此前面已绘制的边框会出现在后面重叠框的裁剪中。
  /// 单行失败只跳过该行，不影响其余行。
  pub fn analyze(&self, image: &RgbImage, annotations: &str) -> Analysis {
    let mut annotated = image.clone();
    let mut summary = Summary::default();
    let mut classified = Vec::new();
    let mut skipped = 0usize;

    for (line, text) in split_lines(annotations).enumerate() {
      match self.classify_line(&annotated, text) {
        Ok((rect, state)) => {
          debug!(
            "第 {} 行: {} at ({}, {}, {}, {})",
            line, state, rect.left, rect.top, rect.right, rect.bottom
          );
          summary.increment(state);
          self.draw.draw_box(&mut annotated, &rect, state);
          classified.push(Classified { line, rect, state });
        }
        Err(reason) => {
          if text.trim().is_empty() {
            debug!("第 {} 行为空, 跳过", line);
          } else {
            warn!("跳过第 {} 行标注: {}", line, reason);
          }
          skipped += 1;
        }
      }
    }

    info!(
      "分析完成: 分类 {} 个, 跳过 {} 行",
      summary.total(),
      skipped
    );

    Analysis {
      annotated,
      summary,
      classified,
      skipped,
    }
  }

  fn classify_line(
    &self,
    annotated: &RgbImage,
    text: &str,
  ) -> Result<(PixelRect, ActivationState), SkipReason> {
    let normalized = NormalizedBox::decode(text)?;
    let rect = normalized.to_pixel_rect(annotated.width(), annotated.height());
    let region = crop_region(annotated, &rect)?;
    let state = self
      .model
      .infer(&region)
      .map_err(|e| SkipReason::Classifier(e.to_string()))?;
    Ok((rect, state))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_summary_counts_and_order() {
    let mut summary = Summary::default();
    summary.increment(ActivationState::Activated);
    summary.increment(ActivationState::Activated);
    summary.increment(ActivationState::Resting);

    assert_eq!(summary.get(ActivationState::Activated), 2);
    assert_eq!(summary.get(ActivationState::Resolution), 0);
    assert_eq!(summary.total(), 3);

    let json = serde_json::to_string(&summary).unwrap();
    assert_eq!(
      json,
      r#"{"Resting":1,"Surveilling":0,"Activated":2,"Resolution":0}"#
    );
  }

  #[test]
  fn test_skip_reason_from_errors() {
    let reason: SkipReason = AnnotationError::TokenCount(6).into();
    assert!(matches!(reason, SkipReason::MalformedAnnotation(_)));

    let reason: SkipReason = RegionError::Empty {
      width: 0,
      height: 3,
    }
    .into();
    assert!(matches!(reason, SkipReason::InvalidRegion(_)));
  }
}
