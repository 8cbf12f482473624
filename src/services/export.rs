//! 导出服务 - 业务能力层
//!
//! 只负责"导出合并文本"能力，不关心队列和流程：
//! 写成带时间戳的 .txt 文件（下载），或回显到标准输出（复制）

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

/// 导出服务
pub struct ExportService {
    output_folder: PathBuf,
}

impl ExportService {
    /// 创建新的导出服务
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// 把合并文本保存为带时间戳的 .txt 文件
    ///
    /// # 返回
    /// 写入的文件路径
    pub async fn save_document(&self, document: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_folder)
            .await
            .with_context(|| format!("创建输出目录失败: {}", self.output_folder.display()))?;

        let file_name = format!(
            "extracted_text_{}.txt",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.output_folder.join(file_name);

        debug!("写入导出文件: {} ({} 字符)", path.display(), document.chars().count());

        fs::write(&path, document)
            .await
            .with_context(|| format!("写入导出文件失败: {}", path.display()))?;

        Ok(path)
    }

    /// 把合并文本回显到标准输出（剪贴板复制的命令行对应物）
    pub fn print_document(&self, document: &str) {
        println!("{}", document);
    }
}
