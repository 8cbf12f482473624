/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 待识别图片所在目录
    pub input_folder: String,
    /// 远程图片 URL 清单文件（TOML，不存在则忽略）
    pub url_manifest_file: String,
    /// 导出文本的输出目录
    pub output_folder: String,
    /// 预览缩略图临时目录
    pub preview_folder: String,
    /// 使用统计 JSON 文件
    pub stats_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- OCR 服务配置 ---
    pub ocr_api_base_url: String,
    pub ocr_api_key: String,
    /// 单次识别请求超时（秒）
    pub request_timeout_secs: u64,
    /// 就绪探测间隔（毫秒）
    pub ready_poll_interval_ms: u64,
    /// 就绪探测最大次数
    pub ready_max_attempts: usize,
    // --- 批处理行为 ---
    /// 是否跳过已完成的条目（默认 false：每次 process_all 都重新识别）
    pub skip_done: bool,
    /// 是否把合并结果回显到标准输出（剪贴板复制的命令行对应物）
    pub echo_results: bool,
    // --- 管理入口凭据（来自环境变量，不在代码中硬编码） ---
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "input_images".to_string(),
            url_manifest_file: "urls.toml".to_string(),
            output_folder: "output".to_string(),
            preview_folder: ".previews".to_string(),
            stats_file: "ocr_stats.json".to_string(),
            verbose_logging: false,
            ocr_api_base_url: "https://api.puter.com/v1".to_string(),
            ocr_api_key: String::new(),
            request_timeout_secs: 60,
            ready_poll_interval_ms: 500,
            ready_max_attempts: 10,
            skip_done: false,
            echo_results: true,
            admin_email: String::new(),
            admin_password: String::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("OCR_INPUT_FOLDER").unwrap_or(default.input_folder),
            url_manifest_file: std::env::var("OCR_URL_MANIFEST").unwrap_or(default.url_manifest_file),
            output_folder: std::env::var("OCR_OUTPUT_FOLDER").unwrap_or(default.output_folder),
            preview_folder: std::env::var("OCR_PREVIEW_FOLDER").unwrap_or(default.preview_folder),
            stats_file: std::env::var("OCR_STATS_FILE").unwrap_or(default.stats_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            ocr_api_base_url: std::env::var("OCR_API_BASE_URL").unwrap_or(default.ocr_api_base_url),
            ocr_api_key: std::env::var("OCR_API_KEY").unwrap_or(default.ocr_api_key),
            request_timeout_secs: std::env::var("OCR_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            ready_poll_interval_ms: std::env::var("OCR_READY_POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.ready_poll_interval_ms),
            ready_max_attempts: std::env::var("OCR_READY_MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.ready_max_attempts),
            skip_done: std::env::var("OCR_SKIP_DONE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.skip_done),
            echo_results: std::env::var("OCR_ECHO_RESULTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.echo_results),
            admin_email: std::env::var("OCR_ADMIN_EMAIL").unwrap_or(default.admin_email),
            admin_password: std::env::var("OCR_ADMIN_PASSWORD").unwrap_or(default.admin_password),
        }
    }
}
