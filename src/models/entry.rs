//! 图片条目模型
//!
//! 队列中的一个工作单元：来源（本地字节或远程 URL，二者必居其一）、
//! 显示名、预览引用和处理状态。状态只由编排层按 id 原地转移

use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// URL 来源条目的固定显示名
pub const URL_ENTRY_NAME: &str = "image-url";

/// 条目唯一标识，入队时分配，生命周期内不变
pub type EntryId = u64;

/// 图片来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// 本地图片的二进制内容及其媒体类型
    File { bytes: Vec<u8>, media_type: String },
    /// 远程图片 URL
    Url(String),
}

impl ImageSource {
    pub fn is_file(&self) -> bool {
        matches!(self, ImageSource::File { .. })
    }
}

/// 条目处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

/// 缩略图引用
///
/// 文件来源的条目拥有一个预览临时文件，释放时删除；
/// URL 来源的条目直接复用 URL，释放是空操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRef {
    LocalFile(PathBuf),
    Remote(String),
}

impl PreviewRef {
    /// 释放预览资源（删除拥有的临时文件）
    ///
    /// 文件已不存在时静默返回，因此可以安全地重复调用
    pub fn release(&self) {
        if let PreviewRef::LocalFile(path) = self {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("⚠️ 删除预览文件失败 ({}): {}", path.display(), e);
                }
            }
        }
    }
}

/// 队列中的一个图片条目
#[derive(Debug)]
pub struct ImageEntry {
    pub id: EntryId,
    pub source: ImageSource,
    pub display_name: String,
    pub preview: PreviewRef,
    pub status: EntryStatus,
    /// 仅当 status == Done 时为 Some
    pub result_text: Option<String>,
    /// 仅当 status == Failed 时为 Some
    pub error_detail: Option<String>,
}

impl ImageEntry {
    pub(crate) fn new(
        id: EntryId,
        source: ImageSource,
        display_name: String,
        preview: PreviewRef,
    ) -> Self {
        Self {
            id,
            source,
            display_name,
            preview,
            status: EntryStatus::Pending,
            result_text: None,
            error_detail: None,
        }
    }

    /// 进入处理中状态
    pub fn mark_processing(&mut self) {
        self.status = EntryStatus::Processing;
    }

    /// 标记识别成功，写入结果文本并清除历史错误
    pub fn mark_done(&mut self, text: String) {
        self.status = EntryStatus::Done;
        self.result_text = Some(text);
        self.error_detail = None;
    }

    /// 标记识别失败，写入错误信息并清除历史结果
    pub fn mark_failed(&mut self, detail: String) {
        self.status = EntryStatus::Failed;
        self.error_detail = Some(detail);
        self.result_text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry() -> ImageEntry {
        ImageEntry::new(
            1,
            ImageSource::Url("https://example.com/a.png".to_string()),
            URL_ENTRY_NAME.to_string(),
            PreviewRef::Remote("https://example.com/a.png".to_string()),
        )
    }

    #[test]
    fn test_new_entry_is_pending() {
        let entry = make_entry();
        assert_eq!(entry.status, EntryStatus::Pending);
        assert!(entry.result_text.is_none());
        assert!(entry.error_detail.is_none());
    }

    #[test]
    fn test_mark_done_clears_error() {
        let mut entry = make_entry();
        entry.mark_failed("网络错误".to_string());
        entry.mark_done("HELLO".to_string());
        assert_eq!(entry.status, EntryStatus::Done);
        assert_eq!(entry.result_text.as_deref(), Some("HELLO"));
        assert!(entry.error_detail.is_none());
    }

    #[test]
    fn test_mark_failed_clears_result() {
        let mut entry = make_entry();
        entry.mark_done("HELLO".to_string());
        entry.mark_failed("网络错误".to_string());
        assert_eq!(entry.status, EntryStatus::Failed);
        assert!(entry.result_text.is_none());
        assert_eq!(entry.error_detail.as_deref(), Some("网络错误"));
    }

    #[test]
    fn test_remote_preview_release_is_noop() {
        let preview = PreviewRef::Remote("https://example.com/a.png".to_string());
        preview.release();
        preview.release();
    }
}
