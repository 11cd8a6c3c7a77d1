//! Типы для модуля распаковки

use serde::Serialize;

/// Тип архива
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    TarLz4,
    Lz4,
    TarZst,
    Zst,
    Tar,
    TarGz,
    Gz,
    Zip,
    Rar,
    SevenZip,
    Unknown,
}

impl ArchiveType {
    /// Определить тип архива по имени файла
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();

        if lower.ends_with(".tar.lz4") || lower.ends_with(".tlz4") {
            Self::TarLz4
        } else if lower.ends_with(".lz4") {
            Self::Lz4
        } else if lower.ends_with(".tar.zst") || lower.ends_with(".tzst") {
            Self::TarZst
        } else if lower.ends_with(".zst") {
            Self::Zst
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Self::TarGz
        } else if lower.ends_with(".gz") {
            Self::Gz
        } else if lower.ends_with(".tar") {
            Self::Tar
        } else if lower.ends_with(".zip") {
            Self::Zip
        } else if lower.ends_with(".rar") {
            Self::Rar
        } else if lower.ends_with(".7z") {
            Self::SevenZip
        } else {
            Self::Unknown
        }
    }

    /// Имя формата
    pub fn name(&self) -> &'static str {
        match self {
            Self::TarLz4 => "tar.lz4",
            Self::Lz4 => "lz4",
            Self::TarZst => "tar.zst",
            Self::Zst => "zst",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::Gz => "gz",
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::SevenZip => "7z",
            Self::Unknown => "unknown",
        }
    }
}

/// Файл, извлечённый из архива
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedEntry {
    /// Имя файла (последний компонент пути)
    pub name: String,
    /// Полный путь внутри архива
    pub path: String,
    /// Размер содержимого в байтах
    pub size: u64,
    /// MIME тип по расширению
    pub mime: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl ExtractedEntry {
    /// Собрать запись из пути внутри архива и содержимого
    pub fn new(path: impl Into<String>, content: Vec<u8>) -> Self {
        let path = path.into();
        let name = file_name_of(&path).to_string();
        let mime = crate::mime::mime_for_name(&name);

        Self {
            name,
            size: content.len() as u64,
            path,
            mime,
            content,
        }
    }
}

/// Последний компонент пути внутри архива ('/' и '\' как разделители)
pub(crate) fn file_name_of(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
}

/// Результат распаковки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractResult {
    pub files_count: usize,
    pub total_size: u64,
}

impl ExtractResult {
    /// Подсчитать итог по списку записей
    pub fn from_entries(entries: &[ExtractedEntry]) -> Self {
        Self {
            files_count: entries.len(),
            total_size: entries.iter().map(|e| e.size).sum(),
        }
    }
}
