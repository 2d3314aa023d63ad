// 该文件是 Cellstate 项目的一部分。
// src/task.rs - 分析任务：读取输入、分析、输出
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
use thiserror::Error;
use tracing::info;

use crate::{
  analysis::{Analysis, Analyzer},
  input::{ImageFileInput, InputError, MemoryInput, ReadInput},
  model::{ActivationState, Model},
  output::{EncodedOutput, EncodedReport, OutputError, Render},
};

#[derive(Error, Debug)]
pub enum TaskError {
  #[error("输入错误: {0}")]
  InputError(#[from] InputError),
  #[error("输出错误: {0}")]
  OutputError(#[from] OutputError),
}

pub trait Task<I, M, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error>;
}

/// 单次分析：所有输入读取并解码成功后才开始分析和写出
pub struct OneShotTask;

impl<'m, I, M, O> Task<I, &'m Analyzer<M>, O> for OneShotTask
where
  I: ReadInput,
  M: Model<Input = RgbImage, Output = ActivationState>,
  M::Error: Display,
  O: Render<RgbImage, Analysis>,
  O::Error: Into<OutputError>,
{
  type Output = O::Output;
  type Error = TaskError;

  fn run_task(self, input: I, analyzer: &'m Analyzer<M>, output: O) -> Result<Self::Output, Self::Error> {
    info!("开始任务...");
    let input = input.read_input()?;
    info!(
      "输入读取成功: {}x{}, 开始分析...",
      input.image.width(),
      input.image.height()
    );

    let now = std::time::Instant::now();
    let analysis = analyzer.analyze(&input.image, &input.annotations);
    info!("分析完成，耗时: {:.2?}", now.elapsed());

    let result = output
      .render_result(&input.image, &analysis)
      .map_err(Into::<OutputError>::into)?;
    info!("输出完成");

    Ok(result)
  }
}

/// 内存调用方式：图像字节 + 标注文本，返回 base64 结果
pub fn analyze_bytes<M>(
  analyzer: &Analyzer<M>,
  image_bytes: &[u8],
  annotations: &str,
) -> Result<EncodedReport, TaskError>
where
  M: Model<Input = RgbImage, Output = ActivationState>,
  M::Error: Display,
{
  OneShotTask.run_task(
    MemoryInput::new(image_bytes, annotations),
    analyzer,
    EncodedOutput,
  )
}

/// 读取图像与标注文件，以内存方式返回 base64 结果，不写任何文件
pub fn analyze_files_encoded<M>(
  analyzer: &Analyzer<M>,
  image_path: impl AsRef<std::path::Path>,
  annotation_path: impl AsRef<std::path::Path>,
) -> Result<EncodedReport, TaskError>
where
  M: Model<Input = RgbImage, Output = ActivationState>,
  M::Error: Display,
{
  OneShotTask.run_task(
    ImageFileInput::new(image_path.as_ref(), annotation_path.as_ref()),
    analyzer,
    EncodedOutput,
  )
}

/// 文件调用方式：读取图像与标注文件，写出标注图和 PNG 原图
#[cfg(feature = "save_image_file")]
pub fn analyze_files<M>(
  analyzer: &Analyzer<M>,
  image_path: impl AsRef<std::path::Path>,
  annotation_path: impl AsRef<std::path::Path>,
  annotated_path: impl Into<std::path::PathBuf>,
) -> Result<crate::output::FileReport, TaskError>
where
  M: Model<Input = RgbImage, Output = ActivationState>,
  M::Error: Display,
{
  use crate::output::SaveImageFileOutput;

  let image_path = image_path.as_ref();
  let output = SaveImageFileOutput::for_image(image_path).with_annotated_path(annotated_path);
  OneShotTask.run_task(
    ImageFileInput::new(image_path, annotation_path.as_ref()),
    analyzer,
    output,
  )
}
