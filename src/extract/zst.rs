//! Распаковка ZST и tar.zst архивов

use super::gz::strip_suffix_ci;
use super::tar::extract_tar_bytes;
use super::types::ExtractedEntry;
use crate::error::Result;

/// Распаковать zstd поток в память
pub fn unzstd(data: &[u8]) -> Result<Vec<u8>> {
    Ok(zstd::stream::decode_all(data)?)
}

/// Распаковать обычный .zst файл
pub fn extract_zst_bytes(archive_name: &str, data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let content = unzstd(data)?;
    let name = strip_suffix_ci(archive_name, ".zst");
    Ok(vec![ExtractedEntry::new(name, content)])
}

/// Распаковать tar.zst архив
pub fn extract_tar_zst_bytes(data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let tar = unzstd(data)?;
    extract_tar_bytes(&tar)
}
