//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::services::stats::UsageStats;

/// 初始化日志（默认级别 info）
///
/// 重复调用安全（只第一次生效）
pub fn init() {
    init_with(false)
}

/// 初始化日志，`verbose` 为 true 时默认级别为 debug
///
/// RUST_LOG 始终优先于默认级别
pub fn init_with(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        )
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// 打印使用统计
///
/// # 参数
/// - `stats`: 当前的使用计数器
pub fn print_usage_stats(stats: &UsageStats) {
    info!("{}", "=".repeat(60));
    info!("📊 使用统计");
    info!("🖼️ 上传图片: {}", stats.images_uploaded);
    info!("📝 提取文本: {}", stats.texts_extracted);
    info!("📋 复制文本: {}", stats.texts_copied);
    info!("💾 下载文本: {}", stats.texts_downloaded);
    info!(
        "最后更新: {}",
        stats.last_updated.format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_verbose_flag() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        // 按字符截断，不按字节
        assert_eq!(truncate_text("一二三四五", 2), "一二...");
    }
}
