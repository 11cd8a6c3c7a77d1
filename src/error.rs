//! Ошибки архиватора

use crate::utils::format_size;

/// Result с ошибкой архиватора
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Ошибки распаковки и упаковки
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Ошибка ввода-вывода
    #[error("ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка ZIP библиотеки
    #[error("ошибка ZIP: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// В архиве не найдено ни одного файла (архив повреждён или пуст)
    #[error("не найдено ни одного корректного файла, архив повреждён или пуст")]
    NoValidFiles,

    /// Формат архива не распознан
    #[error("неизвестный формат архива: {0}")]
    UnknownFormat(String),

    /// Формат распознан, но не поддерживается этой сборкой
    #[error("формат {0} не поддерживается")]
    Unsupported(String),

    /// Файл превышает допустимый размер
    #[error("файл {name} слишком большой: {} (максимум {})", format_size(*.size), format_size(*.limit))]
    TooLarge { name: String, size: u64, limit: u64 },

    /// Пустой файл
    #[error("файл {0} пуст")]
    EmptyFile(String),

    /// Нечего упаковывать
    #[error("нет файлов для упаковки")]
    NothingToCompress,

    /// Операция отменена пользователем
    #[error("операция отменена")]
    Cancelled,

    /// Фоновая задача завершилась аварийно
    #[error("фоновая задача завершилась с ошибкой: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ArchiveError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
