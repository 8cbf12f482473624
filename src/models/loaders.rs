//! 图片来源加载器
//!
//! 扫描输入目录中的图片文件，以及从 TOML 清单加载远程图片 URL

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

/// URL 清单文件结构
///
/// 清单格式：
/// ```toml
/// urls = [
///     "https://example.com/receipt.png",
///     "https://example.com/card.jpg",
/// ]
/// ```
#[derive(Debug, Deserialize)]
struct UrlManifest {
    #[serde(default)]
    urls: Vec<String>,
}

/// 根据文件扩展名推断图片媒体类型，非图片返回 None
pub fn image_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// 扫描目录下的所有图片文件
///
/// 按文件名排序，保证入队顺序稳定。目录不存在时报错
pub async fn scan_image_folder(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("图片目录不存在: {}", folder_path);
    }

    let mut images = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取图片目录: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && image_media_type(&path).is_some() {
            images.push(path);
        }
    }

    images.sort();
    info!("📁 目录 {} 中找到 {} 张图片", folder_path, images.len());

    Ok(images)
}

/// 从 TOML 清单加载远程图片 URL
///
/// 只接受 http(s) URL；URL 看起来不指向图片时仅警告不拒绝
/// （远程图片的真实类型由 OCR 服务自行判断）
pub async fn load_url_manifest(manifest_path: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(manifest_path)
        .await
        .with_context(|| format!("无法读取 URL 清单: {}", manifest_path))?;

    let manifest: UrlManifest = toml::from_str(&content)
        .with_context(|| format!("无法解析 URL 清单: {}", manifest_path))?;

    let image_url_re = Regex::new(r"(?i)^https?://\S+\.(png|jpe?g|webp|gif|bmp)(\?\S*)?$").ok();

    let mut urls = Vec::new();
    for url in manifest.urls {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            warn!("⚠️ 跳过非 http(s) 的 URL: {}", url);
            continue;
        }
        if let Some(re) = &image_url_re {
            if !re.is_match(&url) {
                warn!("⚠️ URL 看起来不是图片，仍尝试识别: {}", url);
            }
        }
        urls.push(url);
    }

    info!("📋 清单 {} 中加载了 {} 个 URL", manifest_path, urls.len());

    Ok(urls)
}
