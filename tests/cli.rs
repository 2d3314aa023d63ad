// 该文件是 Cellstate 项目的一部分。
// tests/cli.rs - 命令行致命错误路径测试
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

#![cfg(all(feature = "model_onnx", feature = "save_image_file"))]

use std::process::Command;

fn cellstate() -> Command {
  let mut command = Command::new(env!("CARGO_BIN_EXE_cellstate"));
  command.env_remove("CELLSTATE_MODEL");
  command
}

// 模型文件不存在时在读取输入之前就失败，不写任何文件
#[test]
fn missing_model_exits_non_zero_without_outputs() {
  let dir = tempfile::tempdir().unwrap();
  let annotation_path = dir.path().join("cells.txt");
  std::fs::write(&annotation_path, "0.5 0.5 0.2 0.2\n").unwrap();
  let annotated_path = dir.path().join("annotated_result.png");

  let output = cellstate()
    .arg(dir.path().join("cells.png"))
    .arg(&annotation_path)
    .arg("--model")
    .arg(dir.path().join("best_model.onnx"))
    .arg("--annotated-output")
    .arg(&annotated_path)
    .output()
    .unwrap();

  assert!(!output.status.success());
  assert!(output.stdout.is_empty());
  assert!(!annotated_path.exists());
  assert!(!dir.path().join("cells_converted.png").exists());
}

#[test]
fn wrong_argument_count_exits_non_zero() {
  let output = cellstate().arg("only-one.png").output().unwrap();
  assert!(!output.status.success());
  assert!(!output.stderr.is_empty());
}
