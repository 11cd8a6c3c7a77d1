//! Определение кодировки имён файлов в архивах
//!
//! Архиваторы на разных ОС пишут имена в локальной кодовой странице без
//! указания кодировки. Порядок попыток:
//! 1. ASCII
//! 2. строгий UTF-8
//! 3. GBK, GB2312, Big5, Shift-JIS (доля символов замены < 10%)
//! 4. Latin-1 (всегда успешно)

use encoding_rs::Encoding;

/// Порог доли символов замены для устаревших кодировок
const MAX_REPLACEMENT_RATIO: f64 = 0.1;

/// Символ замены при нестрогом декодировании
const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Кодировка, выбранная при декодировании имени
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    Ascii,
    Utf8,
    Gbk,
    Gb2312,
    Big5,
    ShiftJis,
    Latin1,
}

impl DetectedEncoding {
    /// Имя кодировки
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Utf8 => "UTF-8",
            Self::Gbk => "GBK",
            Self::Gb2312 => "GB2312",
            Self::Big5 => "Big5",
            Self::ShiftJis => "Shift-JIS",
            Self::Latin1 => "Latin-1",
        }
    }
}

/// Устаревшие многобайтовые кодировки в порядке перебора.
/// В WHATWG метка "gb2312" указывает на декодер GBK.
fn legacy_encodings() -> [(DetectedEncoding, &'static Encoding); 4] {
    [
        (DetectedEncoding::Gbk, encoding_rs::GBK),
        (DetectedEncoding::Gb2312, Encoding::for_label(b"gb2312").unwrap_or(encoding_rs::GBK)),
        (DetectedEncoding::Big5, encoding_rs::BIG5),
        (DetectedEncoding::ShiftJis, encoding_rs::SHIFT_JIS),
    ]
}

/// Декодировать имя файла из байтов заголовка архива.
///
/// Никогда не падает: в худшем случае возвращает Latin-1.
pub fn decode_name(bytes: &[u8]) -> String {
    detect_and_decode(bytes).1
}

/// Определить, какая кодировка будет выбрана для байтов
pub fn detect_encoding(bytes: &[u8]) -> DetectedEncoding {
    detect_and_decode(bytes).0
}

/// Декодировать и вернуть выбранную кодировку вместе со строкой
pub fn detect_and_decode(bytes: &[u8]) -> (DetectedEncoding, String) {
    let attempts: [(DetectedEncoding, fn(&[u8]) -> Option<String>); 2] = [
        (DetectedEncoding::Ascii, try_ascii),
        (DetectedEncoding::Utf8, try_utf8),
    ];

    for (encoding, attempt) in attempts {
        if let Some(decoded) = attempt(bytes) {
            return (encoding, decoded);
        }
    }

    for (encoding, codec) in legacy_encodings() {
        if let Some(decoded) = try_legacy(bytes, codec) {
            log::trace!("имя файла декодировано как {}", encoding.name());
            return (encoding, decoded);
        }
    }

    log::trace!("имя файла декодировано как Latin-1");
    (DetectedEncoding::Latin1, latin1(bytes))
}

fn try_ascii(bytes: &[u8]) -> Option<String> {
    if bytes.is_ascii() {
        // ASCII всегда валидный UTF-8
        String::from_utf8(bytes.to_vec()).ok()
    } else {
        None
    }
}

fn try_utf8(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_owned)
}

fn try_legacy(bytes: &[u8], codec: &'static Encoding) -> Option<String> {
    let (decoded, _had_errors) = codec.decode_without_bom_handling(bytes);
    let ratio = replacement_ratio(&decoded)?;
    (ratio < MAX_REPLACEMENT_RATIO).then(|| decoded.into_owned())
}

/// Доля символов замены; None для пустой строки
fn replacement_ratio(decoded: &str) -> Option<f64> {
    let total = decoded.chars().count();
    if total == 0 {
        return None;
    }
    let replaced = decoded.chars().filter(|&c| c == REPLACEMENT_CHAR).count();
    Some(replaced as f64 / total as f64)
}

/// ISO-8859-1: каждый байт - символ с тем же кодом
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
