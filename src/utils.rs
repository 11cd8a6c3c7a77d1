//! Вспомогательные утилиты

use std::collections::HashSet;

/// Безопасно обрезает строку до max_chars символов (не байт!) с начала
/// Если строка длиннее - показывает "..." и конец строки
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let skip = char_count.saturating_sub(max_chars.saturating_sub(3));
        format!("...{}", s.chars().skip(skip).collect::<String>())
    }
}

/// Форматирование размера файла в человекочитаемый вид
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} ГБ", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} МБ", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} КБ", size as f64 / KB as f64)
    } else {
        format!("{} Б", size)
    }
}

/// Разобрать hex строку в байты ("c4e3", "C4 E3", "c4:e3")
pub fn parse_hex(input: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':' && *b != b',')
        .collect();

    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }

    digits
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(s, 16).ok()
        })
        .collect()
}

/// Уникальное имя: "name.ext" -> "name (1).ext", "name (2).ext", ...
///
/// `taken` хранит уже выданные имена; разделитель каталогов - `/` или `\\`.
pub fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let (dir, base) = match name.rfind(['/', '\\']) {
        Some(i) => (&name[..=i], &name[i + 1..]),
        None => ("", name),
    };
    let (stem, ext) = match base.rfind('.') {
        Some(i) if i > 0 => (&base[..i], &base[i..]),
        _ => (base, ""),
    };

    (1..)
        .map(|n| format!("{}{} ({}){}", dir, stem, n, ext))
        .find(|candidate| taken.insert(candidate.clone()))
        .unwrap_or_else(|| name.to_string())
}
