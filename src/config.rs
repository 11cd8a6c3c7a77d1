//! Настройки - сохранение и загрузка

use crate::limits::DEFAULT_MAX_FILE_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Уровень сжатия ZIP по умолчанию
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

/// Пользовательские настройки
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Максимальный размер входного файла в байтах
    pub max_file_size: u64,
    /// Папка для распаковки (None - папка загрузок)
    pub output_dir: Option<PathBuf>,
    /// Уровень сжатия ZIP (0-9)
    pub compression_level: i64,
    /// Сохранять структуру папок при распаковке
    pub preserve_paths: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            output_dir: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            preserve_paths: true,
        }
    }
}

impl Settings {
    /// Загрузить настройки из стандартного места
    pub fn load() -> Self {
        match settings_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Загрузить настройки из файла; при ошибке - значения по умолчанию
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("не удалось прочитать настройки {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Сохранить настройки в стандартное место
    pub fn save(&self) -> std::io::Result<()> {
        let path = settings_file_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "папка конфигурации не найдена")
        })?;
        self.save_to(&path)
    }

    /// Сохранить настройки в файл
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Папка для распаковки с учётом значения по умолчанию
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Путь к файлу настроек
pub fn settings_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("toolza_archiver").join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(settings.compression_level, DEFAULT_COMPRESSION_LEVEL);
        assert!(settings.preserve_paths);
        assert!(settings.output_dir.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            max_file_size: 1024,
            output_dir: Some(PathBuf::from("/tmp/out")),
            compression_level: 9,
            preserve_paths: false,
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("none.json")), Settings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"compression_level": 1}"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.compression_level, 1);
        assert_eq!(settings.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_resolved_output_dir_explicit() {
        let settings = Settings {
            output_dir: Some(PathBuf::from("/data/out")),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_output_dir(), PathBuf::from("/data/out"));
    }
}
