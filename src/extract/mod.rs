//! Модуль распаковки архивов
//!
//! Поддерживаемые форматы:
//! - zip
//! - tar, tar.gz, gz
//! - tar.lz4, lz4 (feature `lz4`)
//! - tar.zst, zst (feature `zst`)
//!
//! Всё содержимое распаковывается в память; запись на диск - в [`crate::output`].

mod gz;
#[cfg(feature = "lz4")]
mod lz4;
mod tar;
mod types;
mod zip;
#[cfg(feature = "zst")]
mod zst;

pub use gz::{extract_gz_bytes, extract_tar_gz_bytes, gunzip};
#[cfg(feature = "lz4")]
pub use lz4::{extract_lz4_bytes, extract_tar_lz4_bytes};
pub use tar::{extract_tar_bytes, parse_tar, TarEntry, BLOCK_SIZE};
pub use types::{ArchiveType, ExtractResult, ExtractedEntry};
pub use zip::extract_zip_bytes;
#[cfg(feature = "zst")]
pub use zst::{extract_tar_zst_bytes, extract_zst_bytes};

use crate::error::{ArchiveError, Result};
use crate::limits::check_file_size;
use std::path::Path;

/// Проверить, является ли файл архивом любого поддерживаемого типа
pub fn is_archive(filename: &str) -> bool {
    !matches!(ArchiveType::from_filename(filename), ArchiveType::Unknown)
}

/// Распаковать архив из памяти (тип по имени файла)
pub fn extract_bytes(filename: &str, data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let archive_type = ArchiveType::from_filename(filename);
    log::debug!("распаковка {} как {} ({} байт)", filename, archive_type.name(), data.len());

    match archive_type {
        ArchiveType::Zip => extract_zip_bytes(data),
        ArchiveType::Tar => extract_tar_bytes(data),
        ArchiveType::TarGz => extract_tar_gz_bytes(data),
        ArchiveType::Gz => extract_gz_bytes(filename, data),
        #[cfg(feature = "lz4")]
        ArchiveType::TarLz4 => extract_tar_lz4_bytes(data),
        #[cfg(feature = "lz4")]
        ArchiveType::Lz4 => extract_lz4_bytes(filename, data),
        #[cfg(feature = "zst")]
        ArchiveType::TarZst => extract_tar_zst_bytes(data),
        #[cfg(feature = "zst")]
        ArchiveType::Zst => extract_zst_bytes(filename, data),
        ArchiveType::Unknown => Err(ArchiveError::UnknownFormat(filename.to_string())),
        other => Err(ArchiveError::Unsupported(other.name().to_string())),
    }
}

/// Распаковать архив в указанную папку (автоопределение типа)
pub fn extract_archive(archive_path: &Path, output_dir: &Path, max_size: u64) -> Result<ExtractResult> {
    let filename = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let size = std::fs::metadata(archive_path)?.len();
    check_file_size(&filename, size, max_size)?;

    let data = std::fs::read(archive_path)?;
    let entries = extract_bytes(&filename, &data)?;
    crate::output::save_all(&entries, output_dir, true)
}
