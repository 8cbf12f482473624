//! 使用统计存储 - 业务能力层
//!
//! 把四个使用计数器持久化为一个小 JSON 文件，按领域事件递增。
//! 文件缺失或损坏时按全零处理，不阻塞主流程

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 统计项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKey {
    ImagesUploaded,
    TextsExtracted,
    TextsCopied,
    TextsDownloaded,
}

/// 使用计数器
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageStats {
    pub images_uploaded: u64,
    pub texts_extracted: u64,
    pub texts_copied: u64,
    pub texts_downloaded: u64,
    pub last_updated: DateTime<Local>,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            images_uploaded: 0,
            texts_extracted: 0,
            texts_copied: 0,
            texts_downloaded: 0,
            last_updated: Local::now(),
        }
    }
}

/// 统计存储
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// 创建新的统计存储
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读取统计
    ///
    /// 文件缺失按全零处理；文件损坏时警告并按全零处理
    pub fn load(&self) -> UsageStats {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(stats) => stats,
                Err(e) => {
                    warn!("⚠️ 统计文件损坏，按全零处理: {}", e);
                    UsageStats::default()
                }
            },
            Err(_) => UsageStats::default(),
        }
    }

    /// 递增单个计数器
    pub fn increment(&self, key: StatKey) -> Result<UsageStats> {
        self.increment_by(key, 1)
    }

    /// 按给定增量递增计数器并刷新更新时间
    pub fn increment_by(&self, key: StatKey, delta: u64) -> Result<UsageStats> {
        let mut stats = self.load();
        match key {
            StatKey::ImagesUploaded => stats.images_uploaded += delta,
            StatKey::TextsExtracted => stats.texts_extracted += delta,
            StatKey::TextsCopied => stats.texts_copied += delta,
            StatKey::TextsDownloaded => stats.texts_downloaded += delta,
        }
        stats.last_updated = Local::now();
        self.save(&stats)?;
        Ok(stats)
    }

    /// 重置所有计数器为零并刷新更新时间
    pub fn reset(&self) -> Result<UsageStats> {
        let stats = UsageStats::default();
        self.save(&stats)?;
        Ok(stats)
    }

    fn save(&self, stats: &UsageStats) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("创建统计目录失败: {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(&self.path, json)
            .with_context(|| format!("写入统计文件失败: {}", self.path.display()))
    }
}
