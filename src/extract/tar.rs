//! Разбор tar архивов (POSIX ustar) без сторонних библиотек
//!
//! Работает только с несжатым потоком: gz/lz4/zst распаковываются заранее.

use super::types::ExtractedEntry;
use crate::encoding::decode_name;
use crate::error::{ArchiveError, Result};
use std::ops::Range;

/// Размер блока tar
pub const BLOCK_SIZE: usize = 512;

/// Поле имени файла
const NAME_FIELD: Range<usize> = 0..100;
/// Поле размера (восьмеричное ASCII)
const SIZE_FIELD: Range<usize> = 124..136;
/// Смещение флага типа
const TYPEFLAG_OFFSET: usize = 156;

/// Файл внутри tar потока; содержимое заимствуется из исходного буфера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry<'a> {
    pub name: String,
    pub content: &'a [u8],
}

/// Заголовок tar записи
#[derive(Debug, Clone, PartialEq, Eq)]
struct TarHeader {
    name: String,
    size: u64,
    typeflag: u8,
}

impl TarHeader {
    /// Разобрать 512-байтовый блок; None если имя пустое
    fn parse(block: &[u8]) -> Option<Self> {
        let name = decode_name(until_nul(&block[NAME_FIELD]));
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            size: parse_octal_size(&block[SIZE_FIELD]),
            typeflag: block[TYPEFLAG_OFFSET],
        })
    }

    /// Обычный файл: флаг 0 или '0', имя не оканчивается на '/'
    fn is_regular_file(&self) -> bool {
        matches!(self.typeflag, 0 | b'0') && !self.name.ends_with('/')
    }
}

/// Байты до первого NUL
fn until_nul(field: &[u8]) -> &[u8] {
    match field.iter().position(|&b| b == 0) {
        Some(end) => &field[..end],
        None => field,
    }
}

/// Размер из восьмеричного поля; мусор и пустое поле дают 0
fn parse_octal_size(field: &[u8]) -> u64 {
    let end = field
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(field.len());

    std::str::from_utf8(&field[..end])
        .ok()
        .and_then(|s| u64::from_str_radix(s, 8).ok())
        .unwrap_or(0)
}

/// Сколько байт занимает содержимое с выравниванием до блока
fn padded_len(size: u64) -> usize {
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    size.div_ceil(BLOCK_SIZE).saturating_mul(BLOCK_SIZE)
}

/// Разобрать несжатый tar поток в список файлов.
///
/// Сканирование останавливается на полностью нулевом блоке, на заголовке с
/// пустым именем или когда до конца буфера меньше одного блока. Каталоги и
/// прочие не-файлы пропускаются. Если не найдено ни одного файла, возвращается
/// [`ArchiveError::NoValidFiles`].
pub fn parse_tar(buffer: &[u8]) -> Result<Vec<TarEntry<'_>>> {
    let mut entries = Vec::new();
    let mut cursor = 0usize;

    while buffer.len().saturating_sub(cursor) >= BLOCK_SIZE {
        let block = &buffer[cursor..cursor + BLOCK_SIZE];

        // Конец архива (второй нулевой блок не проверяется)
        if block.iter().all(|&b| b == 0) {
            log::trace!("tar: нулевой блок на смещении {}", cursor);
            break;
        }

        let Some(header) = TarHeader::parse(block) else {
            log::debug!("tar: пустое имя в заголовке на смещении {}, остановка", cursor);
            break;
        };

        cursor += BLOCK_SIZE;

        if header.is_regular_file() && header.size > 0 {
            let start = cursor.min(buffer.len());
            let len = usize::try_from(header.size).unwrap_or(usize::MAX);
            let end = start.saturating_add(len).min(buffer.len());
            if end - start < len {
                log::warn!("tar: содержимое {} обрезано ({} из {} байт)", header.name, end - start, len);
            }
            entries.push(TarEntry {
                name: header.name,
                content: &buffer[start..end],
            });
        } else {
            log::trace!("tar: пропуск {} (тип {:#04x})", header.name, header.typeflag);
        }

        cursor = cursor.saturating_add(padded_len(header.size));
    }

    if entries.is_empty() {
        return Err(ArchiveError::NoValidFiles);
    }

    Ok(entries)
}

/// Распаковать несжатый tar поток в записи
pub fn extract_tar_bytes(buffer: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let entries = parse_tar(buffer)?;
    Ok(entries
        .into_iter()
        .map(|entry| ExtractedEntry::new(entry.name, entry.content.to_vec()))
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Собрать заголовок tar вручную
    pub(crate) fn header(name: &str, size_field: &[u8], typeflag: u8) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..name.len()].copy_from_slice(name.as_bytes());
        block[124..124 + size_field.len()].copy_from_slice(size_field);
        block[TYPEFLAG_OFFSET] = typeflag;
        block
    }

    /// Содержимое, дополненное до границы блока
    pub(crate) fn padded(content: &[u8]) -> Vec<u8> {
        let mut data = content.to_vec();
        data.resize(padded_len(content.len() as u64), 0);
        data
    }

    pub(crate) fn tar_with(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        for (name, content) in files {
            let size = format!("{:011o}", content.len());
            buf.extend_from_slice(&header(name, size.as_bytes(), b'0'));
            buf.extend_from_slice(&padded(content));
        }
        buf.extend_from_slice(&[0u8; BLOCK_SIZE * 2]);
        buf
    }

    #[test]
    fn test_single_file() {
        let buf = tar_with(&[("a.txt", b"hello")]);
        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].content, b"hello");
    }

    #[test]
    fn test_multiple_files_block_alignment() {
        let big = vec![b'x'; 1000];
        let buf = tar_with(&[("one.bin", &big), ("two.txt", b"second")]);
        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content.len(), 1000);
        assert_eq!(entries[1].name, "two.txt");
        assert_eq!(entries[1].content, b"second");
    }

    #[test]
    fn test_exact_block_size_content() {
        let exact = vec![7u8; BLOCK_SIZE];
        let buf = tar_with(&[("exact.bin", &exact), ("next", b"n")]);
        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, exact.as_slice());
        assert_eq!(entries[1].content, b"n");
    }

    #[test]
    fn test_empty_archive_is_error() {
        let buf = vec![0u8; BLOCK_SIZE * 2];
        assert!(matches!(parse_tar(&buf), Err(ArchiveError::NoValidFiles)));
    }

    #[test]
    fn test_short_buffer_is_error() {
        assert!(matches!(parse_tar(&[]), Err(ArchiveError::NoValidFiles)));
        assert!(matches!(parse_tar(&[1u8; 100]), Err(ArchiveError::NoValidFiles)));
    }

    #[test]
    fn test_garbage_size_treated_as_zero() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&header("bad.txt", b"zz9garbage", b'0'));
        // Следующий заголовок идёт сразу: размер 0, смещение не меняется
        buf.extend_from_slice(&header("good.txt", b"00000000003", b'0'));
        buf.extend_from_slice(&padded(b"abc"));
        buf.extend_from_slice(&[0u8; BLOCK_SIZE]);

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "good.txt");
        assert_eq!(entries[0].content, b"abc");
    }

    #[test]
    fn test_size_field_terminators() {
        assert_eq!(parse_octal_size(b"00000000012\0"), 10);
        assert_eq!(parse_octal_size(b"12 \0\0\0\0\0\0\0\0\0"), 10);
        assert_eq!(parse_octal_size(b"\0\0\0\0\0\0\0\0\0\0\0\0"), 0);
        assert_eq!(parse_octal_size(b" 0000000012\0"), 0);
        assert_eq!(parse_octal_size(b"0000000009\0\0"), 0);
    }

    #[test]
    fn test_directories_and_links_skipped() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&header("dir/", b"00000000000", b'5'));
        buf.extend_from_slice(&header("dir2/", b"00000000000", b'0'));
        buf.extend_from_slice(&header("link", b"00000000000", b'2'));
        buf.extend_from_slice(&header("dir/file.txt", b"00000000002", 0));
        buf.extend_from_slice(&padded(b"ok"));
        buf.extend_from_slice(&[0u8; BLOCK_SIZE]);

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "dir/file.txt");
    }

    #[test]
    fn test_skipped_entry_payload_is_stepped_over() {
        // Симлинк с ненулевым размером: содержимое пропускается целыми блоками
        let mut buf = Vec::new();
        buf.extend_from_slice(&header("meta", b"00000000005", b'x'));
        buf.extend_from_slice(&padded(b"12345"));
        buf.extend_from_slice(&header("real.txt", b"00000000001", b'0'));
        buf.extend_from_slice(&padded(b"r"));

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "real.txt");
    }

    #[test]
    fn test_zero_size_file_not_emitted() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&header("empty.txt", b"00000000000", b'0'));
        buf.extend_from_slice(&header("full.txt", b"00000000001", b'0'));
        buf.extend_from_slice(&padded(b"f"));

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "full.txt");
    }

    #[test]
    fn test_empty_name_stops_scan() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&header("a.txt", b"00000000001", b'0'));
        buf.extend_from_slice(&padded(b"a"));
        let mut nameless = header("x", b"00000000001", b'0');
        nameless[0] = 0;
        buf.extend_from_slice(&nameless);
        buf.extend_from_slice(&header("b.txt", b"00000000001", b'0'));
        buf.extend_from_slice(&padded(b"b"));

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
    }

    #[test]
    fn test_single_zero_block_ends_archive() {
        let mut buf = tar_with(&[("first", b"1")]);
        // Мусор после единственного нулевого блока не читается
        buf.truncate(BLOCK_SIZE * 3);
        buf.extend_from_slice(&header("after", b"00000000001", b'0'));
        buf.extend_from_slice(&padded(b"2"));

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "first");
    }

    #[test]
    fn test_truncated_payload_is_clamped() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&header("cut.bin", b"00000001000", b'0'));
        buf.extend_from_slice(&[9u8; 100]);

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content.len(), 100);
    }

    #[test]
    fn test_trailing_partial_header_ignored() {
        let mut buf = tar_with(&[("a.txt", b"hello")]);
        buf.truncate(BLOCK_SIZE * 2);
        buf.extend_from_slice(&[b'z'; 300]);

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_gbk_name_decoded() {
        let mut block = [0u8; BLOCK_SIZE];
        block[..6].copy_from_slice(b"\xC4\xE3.txt");
        block[124..135].copy_from_slice(b"00000000002");
        block[TYPEFLAG_OFFSET] = b'0';

        let mut buf = block.to_vec();
        buf.extend_from_slice(&padded(b"hi"));

        let entries = parse_tar(&buf).unwrap();
        assert_eq!(entries[0].name, "你.txt");
    }

    #[test]
    fn test_extract_tar_bytes_builds_entries() {
        let buf = tar_with(&[("docs/readme.txt", b"# hi")]);
        let entries = extract_tar_bytes(&buf).unwrap();
        assert_eq!(entries[0].name, "readme.txt");
        assert_eq!(entries[0].path, "docs/readme.txt");
        assert_eq!(entries[0].size, 4);
        assert_eq!(entries[0].mime, "text/plain");
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 512);
        assert_eq!(padded_len(512), 512);
        assert_eq!(padded_len(513), 1024);
    }
}
