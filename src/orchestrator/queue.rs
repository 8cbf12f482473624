//! 图片队列
//!
//! 有序的 `ImageEntry` 集合。插入顺序同时用于渲染和批处理；
//! id 在入队时分配，唯一且稳定。
//!
//! 入队是"全有或全无"的：一批来源中只要有一个本地文件不是图片
//! 媒体类型，整批拒绝、不入队任何条目

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::models::entry::{
    EntryId, EntryStatus, ImageEntry, ImageSource, PreviewRef, URL_ENTRY_NAME,
};

/// 合并结果时各条目之间的固定分隔符
pub const RESULT_DELIMITER: &str = "\n\n----------------------------------------\n\n";

/// 待入队的图片来源
#[derive(Debug, Clone)]
pub enum NewSource {
    /// 本地图片：显示名 + 字节 + 媒体类型
    File {
        display_name: String,
        bytes: Vec<u8>,
        media_type: String,
    },
    /// 远程图片 URL（显示名使用固定占位）
    Url(String),
}

/// 图片队列
pub struct ImageQueue {
    entries: Vec<ImageEntry>,
    next_id: EntryId,
    preview_folder: PathBuf,
}

impl ImageQueue {
    /// 创建空队列
    ///
    /// `preview_folder` 用于存放文件来源条目的预览临时文件
    pub fn new(preview_folder: impl Into<PathBuf>) -> Self {
        let preview_folder = preview_folder.into();
        if let Err(e) = fs::create_dir_all(&preview_folder) {
            warn!(
                "⚠️ 创建预览目录失败 ({}): {}",
                preview_folder.display(),
                e
            );
        }

        Self {
            entries: Vec::new(),
            next_id: 1,
            preview_folder,
        }
    }

    /// 入队一批图片来源（全有或全无）
    ///
    /// 任何一个本地来源不是 `image/*` 媒体类型时，整批拒绝、
    /// 已有条目不受影响。
    ///
    /// # 返回
    /// 实际新增的条目数量（被拒绝的批次返回 0）
    pub fn enqueue(&mut self, sources: Vec<NewSource>) -> usize {
        if sources.is_empty() {
            return 0;
        }

        for source in &sources {
            if let NewSource::File {
                display_name,
                media_type,
                ..
            } = source
            {
                if !media_type.starts_with("image/") {
                    warn!(
                        "⚠️ {} 不是图片文件 ({})，整批拒绝入队",
                        display_name, media_type
                    );
                    return 0;
                }
            }
        }

        let mut added = 0;
        for source in sources {
            let entry = self.make_entry(source);
            debug!("入队条目 {} ({})", entry.id, entry.display_name);
            self.entries.push(entry);
            added += 1;
        }

        info!("✓ 入队 {} 个条目，当前队列长度 {}", added, self.entries.len());
        added
    }

    fn make_entry(&mut self, source: NewSource) -> ImageEntry {
        let id = self.next_id;
        self.next_id += 1;

        match source {
            NewSource::File {
                display_name,
                bytes,
                media_type,
            } => {
                let preview_path = self
                    .preview_folder
                    .join(format!("preview_{:04}_{}", id, display_name));
                if let Err(e) = fs::write(&preview_path, &bytes) {
                    warn!(
                        "⚠️ 写入预览文件失败 ({}): {}",
                        preview_path.display(),
                        e
                    );
                }
                ImageEntry::new(
                    id,
                    ImageSource::File { bytes, media_type },
                    display_name,
                    PreviewRef::LocalFile(preview_path),
                )
            }
            NewSource::Url(url) => ImageEntry::new(
                id,
                ImageSource::Url(url.clone()),
                URL_ENTRY_NAME.to_string(),
                PreviewRef::Remote(url),
            ),
        }
    }

    /// 移除指定条目并释放其预览资源
    ///
    /// id 不存在时视为无操作，不是错误
    pub fn remove(&mut self, id: EntryId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                let entry = self.entries.remove(pos);
                entry.preview.release();
                info!("已移除条目 {} ({})", id, entry.display_name);
                true
            }
            None => false,
        }
    }

    /// 清空队列并释放所有预览资源（幂等）
    pub fn clear(&mut self) {
        for entry in &self.entries {
            entry.preview.release();
        }
        let count = self.entries.len();
        self.entries.clear();
        if count > 0 {
            info!("已清空队列 ({} 个条目)", count);
        }
    }

    /// 合并所有已完成条目的识别结果（纯读取）
    ///
    /// 每段以显示名为前缀，按队列顺序用固定分隔符连接；
    /// 没有任何完成条目时返回空字符串。重复调用结果相同
    pub fn collect_results(&self) -> String {
        let sections: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Done)
            .filter_map(|e| {
                e.result_text
                    .as_ref()
                    .map(|text| format!("【{}】\n{}", e.display_name, text))
            })
            .collect();

        sections.join(RESULT_DELIMITER)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 当前队列中所有条目的 id，按队列顺序
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut ImageEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

impl Drop for ImageQueue {
    fn drop(&mut self) {
        for entry in &self.entries {
            entry.preview.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_queue() -> ImageQueue {
        ImageQueue::new(tempfile::tempdir().unwrap().keep())
    }

    fn file_source(name: &str, media_type: &str) -> NewSource {
        NewSource::File {
            display_name: name.to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            media_type: media_type.to_string(),
        }
    }

    #[test]
    fn test_enqueue_appends_in_order() {
        let mut queue = test_queue();

        assert_eq!(queue.enqueue(vec![file_source("a.png", "image/png")]), 1);
        assert_eq!(
            queue.enqueue(vec![
                NewSource::Url("https://example.com/b.png".to_string()),
                file_source("c.jpg", "image/jpeg"),
            ]),
            2
        );

        assert_eq!(queue.len(), 3);
        let names: Vec<_> = queue
            .entries()
            .iter()
            .map(|e| e.display_name.clone())
            .collect();
        assert_eq!(names, vec!["a.png", URL_ENTRY_NAME, "c.jpg"]);
        assert!(queue
            .entries()
            .iter()
            .all(|e| e.status == EntryStatus::Pending));
    }

    #[test]
    fn test_enqueue_rejects_whole_batch_on_non_image() {
        let mut queue = test_queue();
        queue.enqueue(vec![file_source("a.png", "image/png")]);

        let added = queue.enqueue(vec![
            file_source("b.png", "image/png"),
            file_source("notes.pdf", "application/pdf"),
        ]);

        assert_eq!(added, 0);
        // 先前的条目不受影响
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.entries()[0].display_name, "a.png");
    }

    #[test]
    fn test_enqueue_empty_batch() {
        let mut queue = test_queue();
        assert_eq!(queue.enqueue(Vec::new()), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut queue = test_queue();
        queue.enqueue(vec![
            file_source("a.png", "image/png"),
            file_source("b.png", "image/png"),
        ]);
        let first_ids = queue.ids();
        assert_eq!(first_ids.len(), 2);
        assert_ne!(first_ids[0], first_ids[1]);

        queue.remove(first_ids[0]);
        queue.enqueue(vec![file_source("c.png", "image/png")]);

        // 新条目不会复用已移除条目的 id
        let ids = queue.ids();
        assert!(!ids.contains(&first_ids[0]));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut queue = test_queue();
        queue.enqueue(vec![file_source("a.png", "image/png")]);

        assert!(!queue.remove(999));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        let mut queue = test_queue();
        queue.enqueue(vec![
            file_source("a.png", "image/png"),
            file_source("b.png", "image/png"),
            file_source("c.png", "image/png"),
        ]);
        let ids = queue.ids();

        assert!(queue.remove(ids[1]));

        assert_eq!(queue.len(), 2);
        let names: Vec<_> = queue
            .entries()
            .iter()
            .map(|e| e.display_name.clone())
            .collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_remove_releases_preview_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut queue = ImageQueue::new(dir.path());
        queue.enqueue(vec![file_source("a.png", "image/png")]);

        let PreviewRef::LocalFile(path) = queue.entries()[0].preview.clone() else {
            panic!("文件来源条目应持有本地预览");
        };
        assert!(path.exists());

        queue.remove(queue.ids()[0]);
        assert!(!path.exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut queue = test_queue();
        queue.enqueue(vec![
            file_source("a.png", "image/png"),
            file_source("b.png", "image/png"),
        ]);

        queue.clear();
        assert!(queue.is_empty());
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_collect_results_done_entries_only() {
        let mut queue = test_queue();
        queue.enqueue(vec![
            file_source("a.png", "image/png"),
            file_source("b.png", "image/png"),
            file_source("c.png", "image/png"),
        ]);
        let ids = queue.ids();

        queue.get_mut(ids[0]).unwrap().mark_done("第一段".to_string());
        queue.get_mut(ids[1]).unwrap().mark_failed("网络错误".to_string());
        queue.get_mut(ids[2]).unwrap().mark_done("第三段".to_string());

        let document = queue.collect_results();
        assert_eq!(
            document,
            format!("【a.png】\n第一段{}【c.png】\n第三段", RESULT_DELIMITER)
        );
        // 幂等：无中间变更时重复调用结果一致
        assert_eq!(queue.collect_results(), document);
    }

    #[test]
    fn test_collect_results_empty_when_nothing_done() {
        let mut queue = test_queue();
        assert_eq!(queue.collect_results(), "");

        queue.enqueue(vec![file_source("a.png", "image/png")]);
        assert_eq!(queue.collect_results(), "");
    }
}
