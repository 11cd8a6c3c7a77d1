//! Статистика обработки - прогресс, скорость, ETA, сжатие

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Размер окна для расчёта скорости (последние N измерений)
const SPEED_WINDOW_SIZE: usize = 10;

/// Статистика распаковки или упаковки
#[derive(Clone, Debug)]
pub struct ProgressStats {
    /// Время начала
    pub start_time: Instant,
    /// Общий объём для обработки
    pub total_bytes: u64,
    /// Обработано байт
    pub processed_bytes: u64,
    /// Байт до сжатия
    pub bytes_uncompressed: u64,
    /// Байт после сжатия
    pub bytes_compressed: u64,
    /// История скорости для сглаживания
    speed_samples: VecDeque<(Instant, u64)>,
    /// Обработано файлов
    pub files_completed: usize,
    /// Всего файлов
    pub files_total: usize,
}

impl ProgressStats {
    pub fn new(total_bytes: u64, files_total: usize) -> Self {
        Self {
            start_time: Instant::now(),
            total_bytes,
            processed_bytes: 0,
            bytes_uncompressed: 0,
            bytes_compressed: 0,
            speed_samples: VecDeque::with_capacity(SPEED_WINDOW_SIZE + 1),
            files_completed: 0,
            files_total,
        }
    }

    /// Отметить обработанный файл
    pub fn file_processed(&mut self, size: u64) {
        self.files_completed += 1;
        self.processed_bytes = self.processed_bytes.saturating_add(size);

        let now = Instant::now();
        self.speed_samples.push_back((now, self.processed_bytes));
        while self.speed_samples.len() > SPEED_WINDOW_SIZE {
            self.speed_samples.pop_front();
        }
    }

    /// Учесть размеры до и после сжатия
    pub fn record_compression(&mut self, uncompressed: u64, compressed: u64) {
        self.bytes_uncompressed += uncompressed;
        self.bytes_compressed += compressed;
    }

    /// Текущая скорость (байт/сек)
    pub fn speed_bytes_per_sec(&self) -> f64 {
        let (Some(first), Some(last)) = (self.speed_samples.front(), self.speed_samples.back()) else {
            return 0.0;
        };
        if self.speed_samples.len() < 2 {
            return 0.0;
        }

        let duration = last.0.duration_since(first.0).as_secs_f64();
        if duration < 0.001 {
            return 0.0;
        }

        last.1.saturating_sub(first.1) as f64 / duration
    }

    pub fn speed_formatted(&self) -> String {
        format_speed(self.speed_bytes_per_sec())
    }

    /// Оставшееся время
    pub fn eta(&self) -> Option<Duration> {
        let speed = self.speed_bytes_per_sec();
        if speed < 1.0 {
            return None;
        }

        let remaining = self.total_bytes.saturating_sub(self.processed_bytes);
        Some(Duration::from_secs_f64(remaining as f64 / speed))
    }

    pub fn eta_formatted(&self) -> String {
        match self.eta() {
            Some(duration) => format_duration(duration),
            None => "∞".to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn elapsed_formatted(&self) -> String {
        format_duration(self.elapsed())
    }

    /// Процент завершения по файлам; по байтам, если размер известен
    pub fn progress_percent(&self) -> f32 {
        if self.total_bytes > 0 {
            return (self.processed_bytes.min(self.total_bytes) as f64 / self.total_bytes as f64 * 100.0) as f32;
        }
        if self.files_total == 0 {
            return 100.0;
        }
        (self.files_completed.min(self.files_total) as f64 / self.files_total as f64 * 100.0) as f32
    }

    /// Коэффициент сжатия (1.0 = без сжатия, 0.5 = сжато в 2 раза)
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_uncompressed == 0 {
            return 1.0;
        }
        self.bytes_compressed as f64 / self.bytes_uncompressed as f64
    }

    pub fn compression_formatted(&self) -> String {
        let ratio = self.compression_ratio();
        if ratio >= 0.99 {
            "без сжатия".to_string()
        } else {
            format!("{:.1}% экономия", (1.0 - ratio) * 100.0)
        }
    }
}

impl Default for ProgressStats {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Форматировать скорость
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec < 1024.0 {
        format!("{:.0} B/s", bytes_per_sec)
    } else if bytes_per_sec < 1024.0 * 1024.0 {
        format!("{:.1} KB/s", bytes_per_sec / 1024.0)
    } else if bytes_per_sec < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB/s", bytes_per_sec / 1024.0 / 1024.0)
    } else {
        format!("{:.2} GB/s", bytes_per_sec / 1024.0 / 1024.0 / 1024.0)
    }
}

/// Форматировать длительность
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}с", secs)
    } else if secs < 3600 {
        format!("{}м {}с", secs / 60, secs % 60)
    } else {
        format!("{}ч {}м", secs / 3600, (secs % 3600) / 60)
    }
}
