//! Распаковка LZ4 и tar.lz4 архивов

use super::gz::strip_suffix_ci;
use super::tar::extract_tar_bytes;
use super::types::ExtractedEntry;
use crate::error::Result;
use lz4_flex::frame::FrameDecoder;
use std::io::{self, Read, Write};

/// Размер чанка копирования (1 МБ)
const COPY_CHUNK_SIZE: usize = 1024 * 1024;

/// Распаковать LZ4 фрейм в память
pub fn unlz4(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = FrameDecoder::new(data);
    let mut out = Vec::new();
    buffered_copy(&mut decoder, &mut out)?;
    Ok(out)
}

/// Распаковать обычный .lz4 файл (не архив)
pub fn extract_lz4_bytes(archive_name: &str, data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let content = unlz4(data)?;
    let name = strip_suffix_ci(archive_name, ".lz4");
    Ok(vec![ExtractedEntry::new(name, content)])
}

/// Распаковать tar.lz4 архив
pub fn extract_tar_lz4_bytes(data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let tar = unlz4(data)?;
    extract_tar_bytes(&tar)
}

/// Копирование чанками
fn buffered_copy<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}
