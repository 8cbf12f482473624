//! 识别能力抽象
//!
//! 外部 OCR 服务被视为黑盒：单一操作 recognize(input) -> text，
//! 异步返回提取的文字或失败。除此签名外没有任何配置面

use async_trait::async_trait;
use base64::Engine as _;

use crate::error::RecognizeError;

/// 识别输入：二进制图片 或 URI 字符串（远程 URL / data URI）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizeInput {
    Bytes { data: Vec<u8>, media_type: String },
    Uri(String),
}

/// 识别能力接口
///
/// 编排层只依赖这个接口，测试时可以换成脚本化的替身
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// 对单张图片执行文字识别
    ///
    /// # 返回
    /// 提取的文本（可能为空字符串），或在能力边界归一化后的错误
    async fn recognize(&self, input: RecognizeInput) -> Result<String, RecognizeError>;
}

/// 把二进制图片重编码为自包含的 data URI
///
/// 直接发送字节失败后，用这个表示再重试一次（回退编码）
pub fn encode_data_uri(data: &[u8], media_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_data_uri() {
        let uri = encode_data_uri(b"hello", "image/png");
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_encode_data_uri_empty_payload() {
        let uri = encode_data_uri(b"", "image/jpeg");
        assert_eq!(uri, "data:image/jpeg;base64,");
    }
}
