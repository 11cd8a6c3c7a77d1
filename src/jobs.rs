//! Фоновые задачи распаковки и упаковки с событиями прогресса
//!
//! Тяжёлая работа выполняется в `spawn_blocking`, а обход файлов отдаёт
//! управление планировщику между записями, чтобы получатель событий успевал
//! обновлять прогресс.

use crate::compress::{bundle_zip, collect_sources};
use crate::error::{ArchiveError, Result};
use crate::extract::{extract_bytes, ExtractedEntry};
use crate::limits::check_file_size;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// События задач для CLI
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveEvent {
    // === Распаковка ===

    /// Начата распаковка (имя архива, размер)
    ExtractionStarted(String, u64),
    /// Файл извлечён (индекс, всего, путь, размер)
    EntryExtracted(usize, usize, String, u64),
    /// Распаковка завершена (имя архива, кол-во файлов, общий размер)
    ExtractionCompleted(String, usize, u64),
    /// Ошибка распаковки (имя архива, ошибка)
    ExtractionError(String, String),

    // === Упаковка ===

    /// Файл добавлен в очередь упаковки (индекс, всего, имя, размер)
    FileAdded(usize, usize, String, u64),
    /// Упаковка завершена (кол-во файлов, размер до, размер после)
    CompressionCompleted(usize, u64, u64),
    /// Ошибка упаковки
    CompressionError(String),

    /// Задача отменена
    Cancelled,
}

/// Проверить флаг остановки
fn check_stop(stop_flag: &AtomicBool, event_tx: &mpsc::UnboundedSender<ArchiveEvent>) -> Result<()> {
    if stop_flag.load(Ordering::Relaxed) {
        let _ = event_tx.send(ArchiveEvent::Cancelled);
        return Err(ArchiveError::Cancelled);
    }
    Ok(())
}

/// Распаковать архив с диска в память, отправляя события по каждому файлу.
///
/// Архив распаковывается целиком до первого `EntryExtracted`: события по файлам
/// идут уже после распаковки. Длительность работы отсчитывается от
/// `ExtractionStarted`, которое отправляется до чтения архива.
pub async fn run_extract_job(
    archive_path: PathBuf,
    max_size: u64,
    event_tx: mpsc::UnboundedSender<ArchiveEvent>,
    stop_flag: Arc<AtomicBool>,
) -> Result<Vec<ExtractedEntry>> {
    let filename = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let result = extract_job_inner(&archive_path, &filename, max_size, &event_tx, &stop_flag).await;

    match &result {
        Ok(entries) => {
            let total_size = entries.iter().map(|e| e.size).sum();
            let _ = event_tx.send(ArchiveEvent::ExtractionCompleted(filename, entries.len(), total_size));
        }
        Err(ArchiveError::Cancelled) => {}
        Err(e) => {
            log::debug!("распаковка {} не удалась: {}", filename, e);
            let _ = event_tx.send(ArchiveEvent::ExtractionError(filename, e.to_string()));
        }
    }

    result
}

async fn extract_job_inner(
    archive_path: &Path,
    filename: &str,
    max_size: u64,
    event_tx: &mpsc::UnboundedSender<ArchiveEvent>,
    stop_flag: &AtomicBool,
) -> Result<Vec<ExtractedEntry>> {
    let size = tokio::fs::metadata(archive_path).await?.len();
    check_file_size(filename, size, max_size)?;
    let _ = event_tx.send(ArchiveEvent::ExtractionStarted(filename.to_string(), size));

    let data = tokio::fs::read(archive_path).await?;
    check_stop(stop_flag, event_tx)?;

    let name = filename.to_string();
    let entries = tokio::task::spawn_blocking(move || extract_bytes(&name, &data)).await??;

    let total = entries.len();
    for (idx, entry) in entries.iter().enumerate() {
        check_stop(stop_flag, event_tx)?;
        let _ = event_tx.send(ArchiveEvent::EntryExtracted(idx, total, entry.path.clone(), entry.size));
        tokio::task::yield_now().await;
    }

    Ok(entries)
}

/// Упаковать файлы и папки в ZIP, отправляя события по каждому файлу
pub async fn run_compress_job(
    paths: Vec<PathBuf>,
    level: Option<i64>,
    event_tx: mpsc::UnboundedSender<ArchiveEvent>,
    stop_flag: Arc<AtomicBool>,
) -> Result<Vec<u8>> {
    let result = compress_job_inner(paths, level, &event_tx, &stop_flag).await;

    if let Err(e) = &result {
        if !matches!(e, ArchiveError::Cancelled) {
            let _ = event_tx.send(ArchiveEvent::CompressionError(e.to_string()));
        }
    }

    result
}

async fn compress_job_inner(
    paths: Vec<PathBuf>,
    level: Option<i64>,
    event_tx: &mpsc::UnboundedSender<ArchiveEvent>,
    stop_flag: &AtomicBool,
) -> Result<Vec<u8>> {
    let sources = tokio::task::spawn_blocking(move || collect_sources(&paths)).await??;
    if sources.is_empty() {
        return Err(ArchiveError::NothingToCompress);
    }

    let total = sources.len();
    let mut uncompressed = 0u64;
    for (idx, source) in sources.iter().enumerate() {
        check_stop(stop_flag, event_tx)?;
        uncompressed += source.size();
        let _ = event_tx.send(ArchiveEvent::FileAdded(idx, total, source.name.clone(), source.size()));
        tokio::task::yield_now().await;
    }

    let zip = tokio::task::spawn_blocking(move || bundle_zip(&sources, level)).await??;
    check_stop(stop_flag, event_tx)?;

    let _ = event_tx.send(ArchiveEvent::CompressionCompleted(total, uncompressed, zip.len() as u64));
    Ok(zip)
}
