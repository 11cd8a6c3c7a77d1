//! Toolza Archiver - распаковка и упаковка архивов
//!
//! Общая библиотека для CLI.
//!
//! # Модули
//! - `encoding` - определение кодировки имён файлов (GBK, Big5, Shift-JIS...)
//! - `extract` - распаковка zip, tar, gz, tar.gz, tar.lz4, tar.zst
//! - `compress` - упаковка файлов в ZIP
//! - `output` - сохранение извлечённых файлов
//! - `jobs` - фоновые задачи с событиями прогресса
//! - `mime` - MIME типы и иконки
//! - `limits` - проверка размеров
//! - `stats` - статистика обработки (скорость, ETA)
//! - `config` - настройки
//! - `utils` - вспомогательные функции

pub mod compress;
pub mod config;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod limits;
pub mod mime;
pub mod output;
pub mod stats;
pub mod utils;

pub use encoding::decode_name;
pub use error::{ArchiveError, Result};
pub use extract::parse_tar;
