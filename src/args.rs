// 该文件是 Cellstate 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;

use cellstate::output::DEFAULT_ANNOTATED_PATH;

/// Cellstate 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像文件路径
  #[arg(value_name = "IMAGE")]
  pub image: PathBuf,

  /// YOLO 格式标注文件路径，每行 `[class_id] x_center y_center width height`
  #[arg(value_name = "ANNOTATIONS")]
  pub annotations: PathBuf,

  /// ONNX 分类模型文件路径
  #[arg(
    long,
    env = "CELLSTATE_MODEL",
    default_value = "best_model.onnx",
    value_name = "FILE"
  )]
  pub model: PathBuf,

  /// 模型输入尺寸（64 为小型卷积网络，256 为 ResNet18）
  #[arg(long, default_value = "64", value_name = "PIXELS")]
  pub input_size: u32,

  /// 推理线程数
  #[arg(long, default_value = "1", value_name = "COUNT")]
  pub threads: usize,

  /// 标注结果图像保存路径
  #[arg(long, default_value = DEFAULT_ANNOTATED_PATH, value_name = "OUTPUT")]
  pub annotated_output: PathBuf,

  /// 输出 base64 编码的图像而不是写文件
  #[arg(long)]
  pub embed: bool,
}
