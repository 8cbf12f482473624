//! 批处理驱动 - 编排层
//!
//! ## 职责
//!
//! 1. **顺序驱动**：`process_all` 严格按队列顺序逐条目识别，
//!    上一个条目落定（Done/Failed）之前不会发出下一个调用
//! 2. **逐条目协议**：Processing → 主调用 →（文件来源失败时）
//!    一次 data URI 回退 → Done/Failed
//! 3. **进度通知**：每个条目落定后通知一次（n / total），成功失败都通知
//! 4. **应用生命周期**：`App` 负责扫描来源、等待就绪、批处理、导出和统计
//!
//! ## 设计特点
//!
//! - **失败本地化**：所有失败在条目边界捕获并转化为条目状态，
//!   批次永不整体失败，也不向 `process_all` 之外抛出
//! - **无回滚**：被中断的批次保留已到达的逐条目状态
//! - **快照迭代**：迭代开始时对 id 做快照，每一步前重新确认条目
//!   仍在队列中，中途被移除的条目不再处理

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::clients::ocr_client::OcrClient;
use crate::clients::recognizer::{encode_data_uri, RecognizeInput, Recognizer};
use crate::config::Config;
use crate::error::BatchRefusal;
use crate::models::entry::{EntryId, EntryStatus, ImageSource};
use crate::models::loaders;
use crate::orchestrator::queue::{ImageQueue, NewSource};
use crate::services::export::ExportService;
use crate::services::stats::{StatKey, StatsStore, UsageStats};
use crate::utils::logging::truncate_text;

/// 识别结果为空时写入的固定占位文本
pub const NO_TEXT_FOUND: &str = "No text found in image";

/// 单个条目落定后的进度通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 已落定的条目数（含失败和跳过）
    pub completed: usize,
    /// 本批条目总数
    pub total: usize,
}

/// 一次批处理的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub done: usize,
    pub failed: usize,
    /// 中途被移除或按配置跳过的条目
    pub skipped: usize,
    pub total: usize,
}

/// 批量处理队列中的全部条目
///
/// # 前置条件
/// - `ready` 必须为 true（调用方应先 await 一次 [`OcrClient::wait_ready`]），
///   否则立即拒绝且不改变任何条目
/// - 队列非空，否则立即拒绝且无副作用
///
/// # 行为
/// 按队列顺序逐条目识别，一次只有一个在途调用。已完成的条目默认
/// 也会重新识别（`skip_done` 为 true 时跳过）。每个条目落定后调用
/// 一次 `on_progress`。批次完成后每个仍在队列中的被访问条目都处于
/// Done 或 Failed。
///
/// 处理前会重查条目是否仍在队列中。当前签名独占 `&mut` 队列，
/// 批内移除在本 crate 内无法发生；该检查只在队列改为共享可变
/// 访问（如 `Arc<Mutex<_>>`）后才会真正触发
pub async fn process_all(
    queue: &mut ImageQueue,
    recognizer: &dyn Recognizer,
    ready: bool,
    skip_done: bool,
    mut on_progress: impl FnMut(BatchProgress),
) -> Result<BatchStats, BatchRefusal> {
    if !ready {
        warn!("⚠️ OCR 服务尚未就绪，拒绝开始批处理");
        return Err(BatchRefusal::ServiceNotReady);
    }
    if queue.is_empty() {
        warn!("⚠️ 队列为空，没有可处理的图片");
        return Err(BatchRefusal::NothingToProcess);
    }

    let ids = queue.ids();
    let total = ids.len();
    let mut stats = BatchStats {
        total,
        ..Default::default()
    };

    info!("📦 开始批量识别，共 {} 个条目", total);

    for (index, id) in ids.into_iter().enumerate() {
        let progress = BatchProgress {
            completed: index + 1,
            total,
        };

        // 快照之后条目可能已被移除
        let Some(entry) = queue.get(id) else {
            info!("条目 {} 已被移除，跳过", id);
            stats.skipped += 1;
            on_progress(progress);
            continue;
        };

        if skip_done && entry.status == EntryStatus::Done {
            info!("条目 {} ({}) 已完成，按配置跳过", id, entry.display_name);
            stats.skipped += 1;
            on_progress(progress);
            continue;
        }

        process_entry(queue, id, recognizer).await;

        match queue.get(id).map(|e| e.status) {
            Some(EntryStatus::Done) => stats.done += 1,
            _ => stats.failed += 1,
        }
        on_progress(progress);
    }

    log_batch_complete(&stats);
    Ok(stats)
}

/// 处理单个条目
///
/// 文件来源：先直接发送字节；失败后把字节重编码为 data URI 再试
/// 一次。URL 来源：直接发送 URL 字符串，没有回退路径
async fn process_entry(queue: &mut ImageQueue, id: EntryId, recognizer: &dyn Recognizer) {
    let Some(entry) = queue.get_mut(id) else {
        return;
    };
    entry.mark_processing();
    let display_name = entry.display_name.clone();

    let (primary, fallback) = match &entry.source {
        ImageSource::File { bytes, media_type } => (
            RecognizeInput::Bytes {
                data: bytes.clone(),
                media_type: media_type.clone(),
            },
            Some(RecognizeInput::Uri(encode_data_uri(bytes, media_type))),
        ),
        ImageSource::Url(url) => (RecognizeInput::Uri(url.clone()), None),
    };

    info!("🔍 正在识别: {}", display_name);

    let outcome = match recognizer.recognize(primary).await {
        Ok(text) => Ok(text),
        Err(primary_err) => match fallback {
            Some(input) => {
                warn!(
                    "⚠️ 直接识别失败 ({}), 使用 data URI 回退重试: {}",
                    display_name, primary_err
                );
                recognizer.recognize(input).await
            }
            None => Err(primary_err),
        },
    };

    let Some(entry) = queue.get_mut(id) else {
        return;
    };
    match outcome {
        Ok(text) => {
            let text = if text.is_empty() {
                NO_TEXT_FOUND.to_string()
            } else {
                text
            };
            info!(
                "✓ 识别完成: {} → {}",
                display_name,
                truncate_text(&text, 60)
            );
            entry.mark_done(text);
        }
        Err(e) => {
            error!("❌ 识别失败: {}: {}", display_name, e);
            entry.mark_failed(e.to_string());
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<OcrClient>,
    queue: ImageQueue,
    stats: StatsStore,
    ready: bool,
}

impl App {
    /// 初始化应用：创建 OCR 客户端、统计存储和空队列
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = Arc::new(OcrClient::new(&config)?);
        let stats = StatsStore::new(&config.stats_file);
        let queue = ImageQueue::new(&config.preview_folder);

        Ok(Self {
            config,
            client,
            queue,
            stats,
            ready: false,
        })
    }

    /// 运行主流程：入队 → 等待就绪 → 批处理 → 导出
    pub async fn run(mut self) -> Result<()> {
        let added = self.load_sources().await?;
        if added == 0 {
            warn!("⚠️ 没有找到待识别的图片，程序结束");
            return Ok(());
        }
        self.stats
            .increment_by(StatKey::ImagesUploaded, added as u64)?;

        // 就绪只 await 一次，之后批处理不再探测
        info!("⏳ 等待 OCR 服务就绪...");
        self.client.wait_ready().await?;
        self.ready = true;

        let client = Arc::clone(&self.client);
        let batch = process_all(
            &mut self.queue,
            client.as_ref(),
            self.ready,
            self.config.skip_done,
            |p| info!("📊 进度: {}/{}", p.completed, p.total),
        )
        .await?;

        if batch.done > 0 {
            self.stats
                .increment_by(StatKey::TextsExtracted, batch.done as u64)?;
        }

        self.export_results().await?;

        let usage = self.stats.load();
        print_final_stats(&batch, &usage);

        Ok(())
    }

    /// 扫描图片目录和 URL 清单并入队
    async fn load_sources(&mut self) -> Result<usize> {
        let mut sources = Vec::new();

        info!("📁 正在扫描待识别的图片: {}", self.config.input_folder);
        for path in loaders::scan_image_folder(&self.config.input_folder).await? {
            let Some(media_type) = loaders::image_media_type(&path) else {
                continue;
            };
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("读取图片失败: {}", path.display()))?;
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "image".to_string());
            sources.push(NewSource::File {
                display_name,
                bytes,
                media_type: media_type.to_string(),
            });
        }

        if Path::new(&self.config.url_manifest_file).exists() {
            for url in loaders::load_url_manifest(&self.config.url_manifest_file).await? {
                sources.push(NewSource::Url(url));
            }
        }

        Ok(self.queue.enqueue(sources))
    }

    /// 导出合并结果：写 .txt 文件，并按配置回显到标准输出
    async fn export_results(&self) -> Result<()> {
        let document = self.queue.collect_results();
        if document.is_empty() {
            warn!("⚠️ 没有任何识别结果可导出");
            return Ok(());
        }

        let export = ExportService::new(&self.config.output_folder);
        let path = export.save_document(&document).await?;
        self.stats.increment(StatKey::TextsDownloaded)?;
        info!("💾 结果已保存至: {}", path.display());

        if self.config.echo_results {
            export.print_document(&document);
            self.stats.increment(StatKey::TextsCopied)?;
        }

        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量图片文字识别模式");
    info!("📡 OCR 服务: {}", config.ocr_api_base_url);
    info!("📁 图片目录: {}", config.input_folder);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(stats: &BatchStats) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批处理完成: 成功 {}/{} (失败 {}, 跳过 {})",
        stats.done, stats.total, stats.failed, stats.skipped
    );
    info!("{}", "─".repeat(60));
}

fn print_final_stats(batch: &BatchStats, usage: &UsageStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", batch.done, batch.total);
    info!("❌ 失败: {}", batch.failed);
    info!(
        "📈 累计: 上传 {} | 提取 {} | 复制 {} | 下载 {}",
        usage.images_uploaded, usage.texts_extracted, usage.texts_copied, usage.texts_downloaded
    );
    info!("{}", "=".repeat(60));
}
