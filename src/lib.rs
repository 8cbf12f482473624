//! # Batch OCR Scanner
//!
//! 批量图片文字识别工具：把一组图片（本地文件或远程 URL）排入队列，
//! 逐张调用外部 OCR 服务提取文字，并把合并结果导出为文本文件
//!
//! ## 架构设计
//!
//! 本系统采用三层架构：
//!
//! ### ① 能力边界层（Clients）
//! - `clients/` - 外部 OCR 服务的唯一出口
//! - `Recognizer` - 单一操作 recognize(input) -> text
//! - `OcrClient` - reqwest HTTP 实现 + 一次性就绪等待
//!
//! ### ② 业务能力层（Services）
//! - `services/export` - 导出合并文本（写 .txt / 回显）
//! - `services/stats` - 使用计数器（JSON 持久化）
//! - `services/admin` - 统计查看入口的凭据门禁
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/queue` - 有序图片队列（入队 / 移除 / 清空 / 合并结果）
//! - `orchestrator/batch_processor` - 顺序批处理驱动，一次只有一个在途调用
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App / process_all)
//!     ↓
//! queue (ImageQueue，逐条目状态转移)
//!     ↓
//! clients (Recognizer / OcrClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **失败条目本地化**：识别失败只写入该条目状态，不中断批次
//! 2. **顺序处理**：严格按入队顺序，一次只发出一个识别调用
//! 3. **能力黑盒**：OCR 服务只有 recognize 一个操作，错误在边界归一化

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::ocr_client::OcrClient;
pub use clients::recognizer::{encode_data_uri, RecognizeInput, Recognizer};
pub use config::Config;
pub use error::{BatchRefusal, RecognizeError};
pub use models::entry::{EntryId, EntryStatus, ImageEntry, ImageSource, PreviewRef};
pub use orchestrator::batch_processor::{process_all, App, BatchProgress, BatchStats};
pub use orchestrator::queue::{ImageQueue, NewSource};
