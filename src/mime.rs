//! MIME типы и иконки файлов по расширению

use serde::Serialize;

/// MIME тип по умолчанию
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Определить MIME тип по имени файла
pub fn mime_for_name(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME.to_string())
}

/// Категория файла для отображения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Archive,
    Document,
    Code,
    Text,
    Other,
}

/// Таблица расширений по категориям
const KIND_TABLE: &[(FileKind, &[&str])] = &[
    (FileKind::Image, &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff", "heic"]),
    (FileKind::Video, &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v"]),
    (FileKind::Audio, &["mp3", "wav", "flac", "aac", "ogg", "m4a", "wma", "opus"]),
    (FileKind::Archive, &["zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz", "lz4", "zst"]),
    (FileKind::Document, &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "rtf", "epub"]),
    (FileKind::Code, &["rs", "js", "ts", "py", "java", "c", "cpp", "h", "go", "html", "css", "json", "xml", "sh", "toml", "yaml", "yml"]),
    (FileKind::Text, &["txt", "md", "log", "csv", "ini", "cfg"]),
];

impl FileKind {
    /// Определить категорию по расширению имени файла
    pub fn from_name(name: &str) -> Self {
        let Some(ext) = extension_of(name) else {
            return Self::Other;
        };

        KIND_TABLE
            .iter()
            .find(|(_, exts)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::Other)
    }

    /// Иконка для категории
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Video => "🎬",
            Self::Audio => "🎵",
            Self::Archive => "📦",
            Self::Document => "📕",
            Self::Code => "💻",
            Self::Text => "📝",
            Self::Other => "📄",
        }
    }
}

/// Иконка файла по имени
pub fn icon_for_name(name: &str) -> &'static str {
    FileKind::from_name(name).icon()
}

fn extension_of(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
