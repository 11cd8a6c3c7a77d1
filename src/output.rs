//! Сохранение извлечённых файлов: по одному, все сразу или одним ZIP

use crate::compress::{bundle_zip, SourceFile};
use crate::error::Result;
use crate::extract::{ExtractResult, ExtractedEntry};
use crate::utils::unique_name;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Безопасный относительный путь внутри папки назначения.
///
/// Отбрасывает корень, префиксы дисков, `.` и `..`; None если ничего не осталось.
pub fn safe_relative_path(path: &str) -> Option<PathBuf> {
    let normalized = path.replace('\\', "/");
    let mut result = PathBuf::new();

    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::ParentDir => {
                log::warn!("отброшен '..' в пути {}", path);
            }
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
        }
    }

    if result.as_os_str().is_empty() {
        None
    } else {
        Some(result)
    }
}

/// Относительный путь записи внутри папки назначения
fn relative_target(entry: &ExtractedEntry, preserve_paths: bool) -> String {
    let source = if preserve_paths { &entry.path } else { &entry.name };
    safe_relative_path(source)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}

fn write_entry(entry: &ExtractedEntry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &entry.content)?;
    log::debug!("сохранён {} ({} байт)", path.display(), entry.size);
    Ok(())
}

/// Сохранить один файл; возвращает путь записанного файла
pub fn save_entry(entry: &ExtractedEntry, output_dir: &Path, preserve_paths: bool) -> Result<PathBuf> {
    let path = output_dir.join(relative_target(entry, preserve_paths));
    write_entry(entry, &path)?;
    Ok(path)
}

/// Пути записи для всех файлов; совпадающие получают суффикс " (n)"
fn resolve_targets(entries: &[ExtractedEntry], output_dir: &Path, preserve_paths: bool) -> Vec<PathBuf> {
    let mut taken = HashSet::with_capacity(entries.len());

    entries
        .iter()
        .map(|entry| {
            let relative = relative_target(entry, preserve_paths);
            let unique = unique_name(&relative, &mut taken);
            if unique != relative {
                log::debug!("путь {} занят, используется {}", relative, unique);
            }
            output_dir.join(unique)
        })
        .collect()
}

/// Сохранить все файлы (параллельно)
pub fn save_all(entries: &[ExtractedEntry], output_dir: &Path, preserve_paths: bool) -> Result<ExtractResult> {
    fs::create_dir_all(output_dir)?;
    let targets = resolve_targets(entries, output_dir, preserve_paths);

    entries
        .par_iter()
        .zip(targets.par_iter())
        .map(|(entry, path)| write_entry(entry, path))
        .collect::<Result<Vec<()>>>()?;

    Ok(ExtractResult::from_entries(entries))
}

/// Упаковать извлечённые файлы в один ZIP для массовой загрузки
pub fn bundle_entries(entries: &[ExtractedEntry], level: Option<i64>) -> Result<Vec<u8>> {
    let sources: Vec<SourceFile> = entries
        .iter()
        .map(|e| SourceFile::new(e.path.clone(), e.content.clone()))
        .collect();
    bundle_zip(&sources, level)
}
