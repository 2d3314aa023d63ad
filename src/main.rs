// 该文件是 Cellstate 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cellstate::{
  Analyzer, analyze_files, analyze_files_encoded, model::ActivationClassifierBuilder,
  output::draw::Draw,
};

fn main() -> Result<()> {
  // stdout 只输出 JSON，日志写到 stderr
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = args::Args::parse();

  info!("模型文件路径: {}", args.model.display());
  info!("输入图像: {}", args.image.display());
  info!("标注文件: {}", args.annotations.display());

  let classifier = ActivationClassifierBuilder::new(&args.model)
    .input_size(args.input_size)
    .num_threads(args.threads)
    .build()
    .context("模型加载失败")?;
  let analyzer = Analyzer::new(classifier, Draw::new()?);

  let json = if args.embed {
    let report = analyze_files_encoded(&analyzer, &args.image, &args.annotations)?;
    serde_json::to_string(&report)?
  } else {
    let report = analyze_files(
      &analyzer,
      &args.image,
      &args.annotations,
      &args.annotated_output,
    )?;
    serde_json::to_string(&report)?
  };

  println!("{json}");

  Ok(())
}
