//! Упаковка файлов в ZIP архив

use crate::error::{ArchiveError, Result};
use crate::utils::unique_name;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Файл для упаковки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Путь внутри архива
    pub name: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self { name: name.into(), content }
    }

    /// Прочитать файл с диска; в архиве - только имя файла
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self { name, content })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Собрать файлы для упаковки: файлы как есть, папки рекурсивно с относительными путями
pub fn collect_sources(paths: &[impl AsRef<Path>]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let folder_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "folder".to_string());
            collect_recursive(path, &folder_name, &mut files)?;
        } else {
            files.push(SourceFile::from_path(path)?);
        }
    }

    Ok(files)
}

fn collect_recursive(current: &Path, relative_base: &str, files: &mut Vec<SourceFile>) -> Result<()> {
    let mut dir_entries = std::fs::read_dir(current)?.collect::<std::io::Result<Vec<_>>>()?;
    dir_entries.sort_by_key(|e| e.file_name());

    for entry in dir_entries {
        let path = entry.path();
        let relative_path = format!("{}/{}", relative_base, entry.file_name().to_string_lossy());

        // Ссылки на папки не обходим: возможен цикл
        if entry.file_type()?.is_symlink() && path.is_dir() {
            log::warn!("пропущена ссылка на папку {}", path.display());
            continue;
        }

        if path.is_dir() {
            collect_recursive(&path, &relative_path, files)?;
        } else if path.is_file() {
            files.push(SourceFile::new(relative_path, std::fs::read(&path)?));
        }
    }
    Ok(())
}

/// Упаковать файлы в ZIP (Deflate). level: 0-9, None - по умолчанию
pub fn bundle_zip(files: &[SourceFile], level: Option<i64>) -> Result<Vec<u8>> {
    if files.is_empty() {
        return Err(ArchiveError::NothingToCompress);
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(level.map(|l| l.clamp(0, 9)));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut taken = HashSet::with_capacity(files.len());

    for file in files {
        let name = unique_name(&file.name, &mut taken);
        if name != file.name {
            log::debug!("zip: имя {} занято, используется {}", file.name, name);
        }
        writer.start_file(name, options)?;
        writer.write_all(&file.content)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_zip_bytes;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_and_read_back() {
        let files = vec![
            SourceFile::new("a.txt", b"alpha".to_vec()),
            SourceFile::new("dir/b.txt", b"beta".to_vec()),
        ];
        let zip = bundle_zip(&files, Some(9)).unwrap();
        let entries = extract_zip_bytes(&zip).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[0].content, b"alpha");
        assert_eq!(entries[1].path, "dir/b.txt");
    }

    #[test]
    fn test_bundle_empty_is_error() {
        assert!(matches!(bundle_zip(&[], None), Err(ArchiveError::NothingToCompress)));
    }

    #[test]
    fn test_duplicate_names() {
        let files = vec![
            SourceFile::new("photo.jpg", vec![1]),
            SourceFile::new("photo.jpg", vec![2]),
            SourceFile::new("photo.jpg", vec![3]),
        ];
        let zip = bundle_zip(&files, None).unwrap();
        let names: Vec<String> = extract_zip_bytes(&zip).unwrap().into_iter().map(|e| e.path).collect();

        assert_eq!(names, ["photo.jpg", "photo (1).jpg", "photo (2).jpg"]);
    }

    #[test]
    fn test_compresses_repetitive_data() {
        let files = vec![SourceFile::new("zeros.bin", vec![0u8; 100_000])];
        let zip = bundle_zip(&files, None).unwrap();
        assert!(zip.len() < 10_000);
    }

    #[test]
    fn test_collect_sources() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("pics");
        std::fs::create_dir_all(folder.join("sub")).unwrap();
        std::fs::write(folder.join("a.png"), "a").unwrap();
        std::fs::write(folder.join("sub/b.png"), "b").unwrap();
        let single = dir.path().join("single.txt");
        std::fs::write(&single, "s").unwrap();

        let files = collect_sources(&[folder, single]).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, ["pics/a.png", "pics/sub/b.png", "single.txt"]);
        assert_eq!(files[2].size(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_sources_skips_dir_symlink_loop() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("loop");
        std::fs::create_dir_all(folder.join("inner")).unwrap();
        std::fs::write(folder.join("inner/file.txt"), "f").unwrap();
        std::os::unix::fs::symlink(&folder, folder.join("inner/back")).unwrap();
        std::fs::write(dir.path().join("target.txt"), "t").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.txt"), folder.join("link.txt")).unwrap();

        let files = collect_sources(&[folder]).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, ["loop/inner/file.txt", "loop/link.txt"]);
        assert_eq!(files[1].content, b"t");
    }

    #[test]
    fn test_from_path_missing() {
        assert!(matches!(
            SourceFile::from_path(Path::new("/definitely/missing/file")),
            Err(ArchiveError::Io(_))
        ));
    }
}
