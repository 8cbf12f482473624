//! OCR HTTP 客户端
//!
//! 封装所有与外部 OCR 服务相关的调用逻辑：
//! - `recognize`：二进制图片走 octet 上传，URL / data URI 走 JSON 请求体
//! - `wait_ready`：一次性就绪等待，取代全局就绪标志的忙轮询
//!
//! 所有失败在这里归一化为 [`RecognizeError`]，调用方不需要再区分
//! 网络错误、超时、错误状态码和解析失败

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::clients::recognizer::{RecognizeInput, Recognizer};
use crate::config::Config;
use crate::error::RecognizeError;

/// OCR 服务响应体
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    /// 提取的文本；服务可能省略该字段或返回空串，两者都按空文本处理
    #[serde(default)]
    text: Option<String>,
}

/// OCR 服务客户端
pub struct OcrClient {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
    ready_poll_interval: Duration,
    ready_max_attempts: usize,
}

impl OcrClient {
    /// 创建新的 OCR 客户端
    ///
    /// 请求超时从配置读取，超时的调用作为普通识别失败处理，
    /// 只影响对应条目
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base_url: config.ocr_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.ocr_api_key.clone(),
            ready_poll_interval: Duration::from_millis(config.ready_poll_interval_ms),
            ready_max_attempts: config.ready_max_attempts,
        })
    }

    /// 等待 OCR 服务就绪
    ///
    /// 以固定间隔探测健康检查接口，直到服务可达或用尽尝试次数。
    /// 调用方只需 await 一次，之后即可开始批处理
    pub async fn wait_ready(&self) -> Result<(), RecognizeError> {
        let url = format!("{}/health", self.api_base_url);

        for attempt in 1..=self.ready_max_attempts {
            match self.http.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("OCR 服务就绪 (第 {} 次探测)", attempt);
                    return Ok(());
                }
                Ok(resp) => {
                    debug!(
                        "健康检查返回 {} (尝试 {}/{})",
                        resp.status(),
                        attempt,
                        self.ready_max_attempts
                    );
                }
                Err(e) => {
                    debug!(
                        "OCR 服务不可达 (尝试 {}/{}): {}",
                        attempt, self.ready_max_attempts, e
                    );
                }
            }

            if attempt < self.ready_max_attempts {
                sleep(self.ready_poll_interval).await;
            }
        }

        Err(RecognizeError::NotReady {
            attempts: self.ready_max_attempts,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/img2txt", self.api_base_url)
    }

    /// 按需附加鉴权头（未配置 API Key 时不发送）
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }
}

#[async_trait]
impl Recognizer for OcrClient {
    async fn recognize(&self, input: RecognizeInput) -> Result<String, RecognizeError> {
        let request = match input {
            RecognizeInput::Bytes { data, media_type } => {
                debug!("发送二进制识别请求 ({} 字节, {})", data.len(), media_type);
                self.authorize(self.http.post(self.endpoint()))
                    .header(reqwest::header::CONTENT_TYPE, media_type)
                    .body(data)
            }
            RecognizeInput::Uri(uri) => {
                debug!("发送 URI 识别请求 (长度 {} 字符)", uri.len());
                self.authorize(self.http.post(self.endpoint()))
                    .json(&json!({ "source": uri }))
            }
        };

        let response = request.send().await.map_err(|e| {
            warn!("OCR 请求失败: {}", e);
            RecognizeError::Request {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("OCR 服务返回错误响应: {} {}", status, message);
            return Err(RecognizeError::BadResponse {
                status: status.as_u16(),
                message,
            });
        }

        let payload: RecognizeResponse =
            response
                .json()
                .await
                .map_err(|e| RecognizeError::InvalidPayload {
                    message: e.to_string(),
                })?;

        Ok(payload.text.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config {
            ocr_api_base_url: "http://localhost:9000/api/".to_string(),
            ..Config::default()
        };
        let client = OcrClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/api/img2txt");
    }

    /// 端口 9（discard）上没有服务监听，连接会立即被拒绝
    #[tokio::test]
    async fn test_wait_ready_gives_up_after_max_attempts() {
        let config = Config {
            ocr_api_base_url: "http://127.0.0.1:9".to_string(),
            ready_poll_interval_ms: 10,
            ready_max_attempts: 2,
            ..Config::default()
        };
        let client = OcrClient::new(&config).unwrap();

        let err = client.wait_ready().await.unwrap_err();
        assert!(matches!(err, RecognizeError::NotReady { attempts: 2 }));
    }

    #[test]
    fn test_response_payload_shapes() {
        let full: RecognizeResponse = serde_json::from_str(r#"{"text":"HELLO"}"#).unwrap();
        assert_eq!(full.text.as_deref(), Some("HELLO"));

        // 服务可能完全省略 text 字段
        let empty: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text.is_none());
    }
}
