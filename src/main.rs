use anyhow::Result;
use tracing::info;

use batch_ocr_scanner::services::{AdminGate, StatsStore};
use batch_ocr_scanner::utils::logging;
use batch_ocr_scanner::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志（VERBOSE_LOGGING 提升默认级别到 debug）
    logging::init_with(config.verbose_logging);

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        // 管理入口：batch_ocr_scanner stats <email> <password>
        Some("stats") => show_stats(&config, &args),
        // 管理入口：batch_ocr_scanner reset-stats <email> <password>
        Some("reset-stats") => reset_stats(&config, &args),
        // 默认：批量识别主流程
        _ => App::initialize(config).await?.run().await,
    }
}

fn authenticate(config: &Config, args: &[String]) -> Result<()> {
    let gate = AdminGate::new(config);
    let email = args.get(2).map(String::as_str).unwrap_or_default();
    let password = args.get(3).map(String::as_str).unwrap_or_default();

    if gate.verify(email, password) {
        Ok(())
    } else {
        anyhow::bail!("凭据无效（请通过 OCR_ADMIN_EMAIL / OCR_ADMIN_PASSWORD 配置）")
    }
}

fn show_stats(config: &Config, args: &[String]) -> Result<()> {
    authenticate(config, args)?;
    let stats = StatsStore::new(&config.stats_file).load();
    logging::print_usage_stats(&stats);
    Ok(())
}

fn reset_stats(config: &Config, args: &[String]) -> Result<()> {
    authenticate(config, args)?;
    StatsStore::new(&config.stats_file).reset()?;
    info!("✓ 使用统计已重置");
    Ok(())
}
