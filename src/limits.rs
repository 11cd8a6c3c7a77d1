//! Проверка размеров входных файлов

use crate::error::{ArchiveError, Result};

/// Максимальный размер файла по умолчанию (500 МБ)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Проверить размер файла перед обработкой в памяти
pub fn check_file_size(name: &str, size: u64, max_size: u64) -> Result<()> {
    if size == 0 {
        return Err(ArchiveError::EmptyFile(name.to_string()));
    }
    if size > max_size {
        return Err(ArchiveError::TooLarge {
            name: name.to_string(),
            size,
            limit: max_size,
        });
    }
    Ok(())
}
