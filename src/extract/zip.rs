//! Распаковка ZIP архивов

use super::types::ExtractedEntry;
use crate::encoding::decode_name;
use crate::error::{ArchiveError, Result};
use std::io::{Cursor, Read};

/// Распаковать ZIP архив из памяти.
///
/// Имена берутся из сырых байтов заголовка и проходят через
/// [`decode_name`]: флаг UTF-8 в ZIP часто не выставлен.
pub fn extract_zip_bytes(data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;

        let path = decode_name(file.name_raw());
        if file.is_dir() || path.ends_with('/') || path.ends_with('\\') {
            log::trace!("zip: пропуск каталога {}", path);
            continue;
        }

        let mut content = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut content)?;
        entries.push(ExtractedEntry::new(path, content));
    }

    if entries.is_empty() {
        return Err(ArchiveError::NoValidFiles);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_files() {
        let data = zip_with(&[("a.txt", b"alpha"), ("sub/b.json", b"{}")]);
        let entries = extract_zip_bytes(&data).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[0].content, b"alpha");
        assert_eq!(entries[1].name, "b.json");
        assert_eq!(entries[1].path, "sub/b.json");
        assert_eq!(entries[1].mime, "application/json");
    }

    #[test]
    fn test_directories_skipped() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("folder/", SimpleFileOptions::default()).unwrap();
        writer.start_file("folder/file.txt", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"x").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let entries = extract_zip_bytes(&data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "folder/file.txt");
    }

    #[test]
    fn test_only_directories_is_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("empty/", SimpleFileOptions::default()).unwrap();
        let data = writer.finish().unwrap().into_inner();

        assert!(matches!(extract_zip_bytes(&data), Err(ArchiveError::NoValidFiles)));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(extract_zip_bytes(b"definitely not a zip"), Err(ArchiveError::Zip(_))));
    }

    #[test]
    fn test_unicode_names_roundtrip() {
        let data = zip_with(&[("文档/报告.txt", b"data")]);
        let entries = extract_zip_bytes(&data).unwrap();
        assert_eq!(entries[0].path, "文档/报告.txt");
        assert_eq!(entries[0].name, "报告.txt");
    }
}
