//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 批量图片识别的"指挥中心"：队列维护和顺序驱动。
//!
//! ## 模块划分
//!
//! ### `queue` - 图片队列
//! - 维护有序的 `ImageEntry` 序列（入队 / 移除 / 清空）
//! - id 唯一且稳定，插入顺序同时决定渲染和处理顺序
//! - 合并已完成条目的识别结果（collect_results）
//! - 移除 / 清空 / 析构时释放预览资源
//!
//! ### `batch_processor` - 批处理驱动
//! - `process_all`：严格按队列顺序逐条目识别，一次只有一个在途调用
//! - 逐条目协议：Processing → 主调用 → 一次 data URI 回退 → Done/Failed
//! - `App`：应用生命周期（扫描来源、等待就绪、批处理、导出、统计）
//!
//! ## 设计原则
//!
//! 1. **失败本地化**：识别失败只转化为条目状态，批次永不整体失败
//! 2. **无回滚**：被中断的批次保留已到达的逐条目状态
//! 3. **资源所有权**：队列拥有预览资源，条目销毁时释放

pub mod batch_processor;
pub mod queue;

pub use batch_processor::{process_all, App, BatchProgress, BatchStats};
pub use queue::{ImageQueue, NewSource, RESULT_DELIMITER};
