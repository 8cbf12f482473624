//! 错误类型定义
//!
//! 识别调用的各种底层失败（网络、超时、错误响应、响应解析）在能力
//! 边界统一归一化为 `RecognizeError`，下游的条目状态只保存它的
//! 可读消息，不再区分底层错误形态

use thiserror::Error;

/// 识别能力调用失败
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// 请求未能到达 OCR 服务（连接失败、超时等）
    #[error("OCR 请求失败: {message}")]
    Request { message: String },

    /// OCR 服务返回了非成功状态码
    #[error("OCR 服务返回错误响应 (状态码 {status}): {message}")]
    BadResponse { status: u16, message: String },

    /// OCR 响应体无法解析
    #[error("OCR 响应解析失败: {message}")]
    InvalidPayload { message: String },

    /// 就绪探测用尽了尝试次数
    #[error("OCR 服务未就绪 (已探测 {attempts} 次)")]
    NotReady { attempts: usize },
}

/// `process_all` 的快速失败条件
///
/// 两种情况都不会改变任何条目的状态
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BatchRefusal {
    /// OCR 服务尚未就绪
    #[error("OCR 服务尚未就绪，本次批处理未开始")]
    ServiceNotReady,

    /// 队列为空
    #[error("队列为空，没有可处理的图片")]
    NothingToProcess,
}
