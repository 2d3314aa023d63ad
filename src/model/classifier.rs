// 该文件是 Cellstate 项目的一部分。
// src/model/classifier.rs - 激活状态分类模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::{path::PathBuf, sync::Mutex};

use image::RgbImage;
use ndarray::ArrayView4;
use ort::{
  session::{Session, builder::GraphOptimizationLevel},
  value::TensorRef,
};
use tracing::{debug, error, info};

use crate::{
  frame::{Preprocess, RgbNchwFrame},
  model::{ActivationState, ClassifierError, Model, WithLabel, argmax},
};

const CLASSIFIER_NUM_INPUTS: usize = 1;
const SIMPLE_CNN_INPUT_SIZE: u32 = 64;
const RESNET18_INPUT_SIZE: u32 = 256;
const DEFAULT_NUM_THREADS: usize = 1;

/// 激活状态分类器，权重加载后只读
///
/// ONNX Runtime 会话运行需要独占访问，这里用互斥锁保护；
/// 每次推理都单独分配输入张量，因此可以被多个请求并发调用。
pub struct ActivationClassifier {
  session: Mutex<Session>,
  input_name: String,
  output_name: String,
  preprocess: Preprocess,
}

pub struct ActivationClassifierBuilder {
  model_path: PathBuf,
  preprocess: Preprocess,
  num_threads: usize,
}

impl ActivationClassifierBuilder {
  pub fn new(model_path: impl Into<PathBuf>) -> Self {
    Self {
      model_path: model_path.into(),
      preprocess: Preprocess::new(SIMPLE_CNN_INPUT_SIZE),
      num_threads: DEFAULT_NUM_THREADS,
    }
  }

  /// 64x64 输入的小型卷积网络
  pub fn simple_cnn(model_path: impl Into<PathBuf>) -> Self {
    Self::new(model_path).input_size(SIMPLE_CNN_INPUT_SIZE)
  }

  /// 256x256 输入的 ResNet18
  pub fn resnet18(model_path: impl Into<PathBuf>) -> Self {
    Self::new(model_path).input_size(RESNET18_INPUT_SIZE)
  }

  pub fn input_size(mut self, input_size: u32) -> Self {
    self.preprocess.input_size = input_size;
    self
  }

  pub fn preprocess(mut self, preprocess: Preprocess) -> Self {
    self.preprocess = preprocess;
    self
  }

  pub fn num_threads(mut self, num_threads: usize) -> Self {
    self.num_threads = num_threads;
    self
  }

  pub fn build(self) -> Result<ActivationClassifier, ClassifierError> {
    if !self.model_path.exists() {
      error!("模型文件不存在: {}", self.model_path.display());
      return Err(ClassifierError::ModelLoadError(format!(
        "模型文件不存在: {}",
        self.model_path.display()
      )));
    }
    if self.preprocess.input_size == 0 {
      return Err(ClassifierError::invalid("输入尺寸不能为 0"));
    }

    info!("加载模型文件: {}", self.model_path.display());
    if let Ok(meta) = std::fs::metadata(&self.model_path) {
      debug!(
        "模型文件大小: {:.2} MB",
        meta.len() as f64 / (1024.0 * 1024.0)
      );
    }

    let session = Session::builder()
      .map_err(|e| ClassifierError::ModelLoadError(format!("无法创建会话: {e}")))?
      .with_optimization_level(GraphOptimizationLevel::Level3)
      .map_err(|e| ClassifierError::ModelLoadError(format!("无法设置优化级别: {e}")))?
      .with_intra_threads(self.num_threads)
      .map_err(|e| ClassifierError::ModelLoadError(format!("无法设置线程数: {e}")))?
      .commit_from_file(&self.model_path)
      .map_err(|e| ClassifierError::ModelLoadError(format!("无法加载模型: {e}")))?;

    let num_inputs = session.inputs.len();
    if num_inputs != CLASSIFIER_NUM_INPUTS {
      error!(
        "预期模型输入数量为 {}, 实际为 {}",
        CLASSIFIER_NUM_INPUTS, num_inputs
      );
      return Err(ClassifierError::invalid(format!(
        "预期模型输入数量为 {}, 实际为 {}",
        CLASSIFIER_NUM_INPUTS, num_inputs
      )));
    }

    let input_name = session.inputs[0].name.clone();
    let output_name = session
      .outputs
      .first()
      .map(|o| o.name.clone())
      .ok_or_else(|| ClassifierError::invalid("模型没有输出"))?;
    debug!("模型输入: {}, 输出: {}", input_name, output_name);

    let classifier = ActivationClassifier {
      session: Mutex::new(session),
      input_name,
      output_name,
      preprocess: self.preprocess,
    };

    // 空输入预热，同时校验输出层维度
    let size = classifier.preprocess.input_size as usize;
    let scores = classifier
      .run(&RgbNchwFrame::with_size(size))
      .map_err(|e| ClassifierError::invalid(format!("预热推理失败: {e}")))?;
    if scores.len() != ActivationState::COUNT {
      error!(
        "预期分类数为 {}, 模型输出 {} 个分数",
        ActivationState::COUNT,
        scores.len()
      );
      return Err(ClassifierError::invalid(format!(
        "预期分类数为 {}, 模型输出 {} 个分数",
        ActivationState::COUNT,
        scores.len()
      )));
    }

    info!("模型加载完成, 输入尺寸 {}x{}", size, size);
    Ok(classifier)
  }
}

impl ActivationClassifier {
  fn run(&self, frame: &RgbNchwFrame) -> Result<Vec<f32>, ClassifierError> {
    let [n, c, h, w] = frame.shape();
    let input = ArrayView4::from_shape((n, c, h, w), frame.as_nchw())
      .map_err(|e| ClassifierError::InferenceError(format!("输入形状错误: {e}")))?;
    let input_contiguous = input.as_standard_layout();
    let input_tensor = TensorRef::from_array_view(&input_contiguous)?;

    let mut session = self
      .session
      .lock()
      .map_err(|_| ClassifierError::InferenceError("推理会话锁已失效".to_string()))?;

    let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;
    let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
      ClassifierError::InferenceError(format!("找不到输出 '{}'", self.output_name))
    })?;

    let (_, data) = output.try_extract_tensor::<f32>()?;
    Ok(data.to_vec())
  }

  pub fn postprocess(scores: &[f32]) -> Result<ActivationState, ClassifierError> {
    if scores.len() != ActivationState::COUNT {
      return Err(ClassifierError::InferenceError(format!(
        "预期 {} 个分数, 实际 {} 个",
        ActivationState::COUNT,
        scores.len()
      )));
    }

    argmax(scores)
      .and_then(|idx| ActivationState::from_label_id(idx as u32))
      .ok_or_else(|| ClassifierError::InferenceError(format!("无法从分数中选出类别: {scores:?}")))
  }
}

impl Model for ActivationClassifier {
  type Input = RgbImage;
  type Output = ActivationState;
  type Error = ClassifierError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    debug!("预处理区域 {}x{}", input.width(), input.height());
    let frame = self.preprocess.apply(input)?;

    debug!("执行模型推理");
    let scores = self.run(&frame)?;
    debug!("模型输出分数: {:?}", scores);

    Self::postprocess(&scores)
  }
}
