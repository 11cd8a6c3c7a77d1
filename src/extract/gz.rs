//! Распаковка gz и tar.gz архивов

use super::tar::extract_tar_bytes;
use super::types::ExtractedEntry;
use crate::encoding::decode_name;
use crate::error::Result;
use flate2::read::MultiGzDecoder;
use std::io::Read;

/// Распаковать gzip поток целиком в память (все склеенные члены подряд)
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Распаковать одиночный .gz файл.
///
/// Имя берётся из заголовка первого члена gzip (поле FNAME), иначе из имени
/// архива без `.gz`. Содержимое всех членов склеивается.
pub fn extract_gz_bytes(archive_name: &str, data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let mut decoder = MultiGzDecoder::new(data);
    let mut content = Vec::new();
    decoder.read_to_end(&mut content)?;

    let stored_name = decoder
        .header()
        .and_then(|h| h.filename())
        .map(decode_name)
        .filter(|name| !name.is_empty());

    let name = stored_name.unwrap_or_else(|| strip_suffix_ci(archive_name, ".gz").to_string());
    log::debug!("gz: {} -> {} ({} байт)", archive_name, name, content.len());

    Ok(vec![ExtractedEntry::new(name, content)])
}

/// Распаковать tar.gz / tgz
pub fn extract_tar_gz_bytes(data: &[u8]) -> Result<Vec<ExtractedEntry>> {
    let tar = gunzip(data)?;
    extract_tar_bytes(&tar)
}

/// Отрезать расширение без учёта регистра; если его нет - "<имя>.out"
pub(crate) fn strip_suffix_ci<'a>(name: &'a str, suffix: &str) -> std::borrow::Cow<'a, str> {
    let base = super::types::file_name_of(name);
    let cut = base.len().checked_sub(suffix.len()).filter(|&at| {
        at > 0 && base.is_char_boundary(at) && base[at..].eq_ignore_ascii_case(suffix)
    });
    match cut {
        Some(at) => std::borrow::Cow::Borrowed(&base[..at]),
        None => std::borrow::Cow::Owned(format!("{}.out", base)),
    }
}
