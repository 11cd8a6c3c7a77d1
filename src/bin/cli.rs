//! Toolza CLI - консольная версия архиватора

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use toolza_archiver::config::Settings;
use toolza_archiver::encoding::detect_and_decode;
use toolza_archiver::extract::{extract_bytes, ArchiveType};
use toolza_archiver::jobs::{self, ArchiveEvent};
use toolza_archiver::limits::check_file_size;
use toolza_archiver::mime::icon_for_name;
use toolza_archiver::output;
use toolza_archiver::stats::ProgressStats;
use toolza_archiver::utils::{format_size, parse_hex, truncate_string};

#[derive(Parser)]
#[command(name = "toolza_cli")]
#[command(author = "toolza")]
#[command(version = "1.0")]
#[command(about = "Распаковка и упаковка архивов", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Распаковать архив (zip, tar, gz, tar.gz, tar.lz4, tar.zst)
    Extract {
        /// Путь к архиву
        archive: PathBuf,

        /// Папка для распаковки (по умолчанию - из настроек или папка загрузок)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Не сохранять структуру папок (все файлы в одну папку)
        #[arg(long)]
        flat: bool,

        /// Максимальный размер архива в МБ
        #[arg(short = 'm', long)]
        max_size: Option<u64>,

        /// Сохранить переданные параметры в настройки
        #[arg(long)]
        save_config: bool,
    },

    /// Показать содержимое архива
    List {
        /// Путь к архиву
        archive: PathBuf,

        /// Вывести список в JSON
        #[arg(long)]
        json: bool,
    },

    /// Упаковать файлы и папки в ZIP
    Compress {
        /// Файлы и папки для упаковки
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Путь к итоговому ZIP
        #[arg(short, long, default_value = "archive.zip")]
        output: PathBuf,

        /// Уровень сжатия 0-9 (по умолчанию - из настроек)
        #[arg(short, long)]
        level: Option<i64>,

        /// Сохранить переданные параметры в настройки
        #[arg(long)]
        save_config: bool,
    },

    /// Определить кодировку имени файла по hex байтам (например: c4e3)
    DecodeName {
        /// Байты имени в hex
        hex: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { archive, output, flat, max_size, save_config } => {
            extract_archive(archive, output, flat, max_size, save_config).await;
        }
        Commands::List { archive, json } => {
            list_archive(archive, json).await;
        }
        Commands::Compress { files, output, level, save_config } => {
            compress_files(files, output, level, save_config).await;
        }
        Commands::DecodeName { hex } => {
            decode_name(&hex);
        }
    }
}

/// Флаг остановки, выставляемый по Ctrl+C
fn stop_on_ctrl_c() -> Arc<AtomicBool> {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let flag = stop_flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::Relaxed);
        }
    });
    stop_flag
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

fn save_settings(settings: &Settings) {
    match settings.save() {
        Ok(()) => println!("💾 Настройки сохранены"),
        Err(e) => eprintln!("⚠️  Не удалось сохранить настройки: {}", e),
    }
}

async fn extract_archive(
    archive: PathBuf,
    output_dir: Option<PathBuf>,
    flat: bool,
    max_size_mb: Option<u64>,
    save_config: bool,
) {
    let mut settings = Settings::load();
    if let Some(dir) = output_dir {
        settings.output_dir = Some(dir);
    }
    if let Some(mb) = max_size_mb {
        settings.max_file_size = mb.saturating_mul(1024 * 1024);
    }
    if flat {
        settings.preserve_paths = false;
    }
    if save_config {
        save_settings(&settings);
    }

    let output_dir = settings.resolved_output_dir();
    let archive_name = archive.display().to_string();
    let archive_type = ArchiveType::from_filename(&archive_name);

    println!();
    println!("📦 Распаковка: {}", truncate_string(&archive_name, 60));
    println!("   Формат: {}", archive_type.name());
    println!("   Папка: {}", output_dir.display());
    if !settings.preserve_paths {
        println!("   📂 Структура папок: плоская");
    }
    println!();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stop_flag = stop_on_ctrl_c();
    let handle = tokio::spawn(jobs::run_extract_job(archive, settings.max_file_size, tx, stop_flag));

    let mut pb: Option<ProgressBar> = None;
    let mut stats = ProgressStats::default();

    while let Some(event) = rx.recv().await {
        match event {
            ArchiveEvent::ExtractionStarted(name, size) => {
                // Время считается с чтения архива, а не с первого файла
                stats = ProgressStats::new(0, 0);
                println!("📥 Чтение {} ({})", name, format_size(size));
            }
            ArchiveEvent::EntryExtracted(_, total, path, size) => {
                let bar = pb.get_or_insert_with(|| {
                    stats.files_total = total;
                    progress_bar(total as u64)
                });
                stats.file_processed(size);
                bar.set_message(truncate_string(&path, 40));
                bar.inc(1);
            }
            ArchiveEvent::ExtractionCompleted(_, files_count, total_size) => {
                if let Some(bar) = pb.take() {
                    bar.finish_and_clear();
                }
                println!("✅ Извлечено {} файл(ов), {} за {}", files_count, format_size(total_size), stats.elapsed_formatted());
            }
            ArchiveEvent::ExtractionError(name, err) => {
                if let Some(bar) = pb.take() {
                    bar.abandon();
                }
                eprintln!("❌ Ошибка распаковки {}: {}", name, err);
            }
            ArchiveEvent::Cancelled => {
                eprintln!("⛔ Распаковка отменена");
            }
            _ => {}
        }
    }

    let entries = match handle.await {
        Ok(Ok(entries)) => entries,
        Ok(Err(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Ошибка: {}", e);
            std::process::exit(1);
        }
    };

    match output::save_all(&entries, &output_dir, settings.preserve_paths) {
        Ok(result) => {
            println!("💾 Сохранено {} файл(ов) ({}) в {}", result.files_count, format_size(result.total_size), output_dir.display());
        }
        Err(e) => {
            eprintln!("❌ Ошибка сохранения: {}", e);
            std::process::exit(1);
        }
    }
}

async fn list_archive(archive: PathBuf, json: bool) {
    let settings = Settings::load();
    let filename = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let data = match tokio::fs::read(&archive).await {
        Ok(data) => data,
        Err(e) => {
            eprintln!("❌ Ошибка чтения {}: {}", archive.display(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = check_file_size(&filename, data.len() as u64, settings.max_file_size) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let entries = match tokio::task::spawn_blocking(move || extract_bytes(&filename, &data)).await {
        Ok(Ok(entries)) => entries,
        Ok(Err(e)) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Ошибка: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Ошибка сериализации: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let total_size: u64 = entries.iter().map(|e| e.size).sum();
    for entry in &entries {
        println!("{} {:>12}  {:<28} {}", icon_for_name(&entry.name), format_size(entry.size), entry.mime, entry.path);
    }
    println!();
    println!("Файлов: {}, всего: {}", entries.len(), format_size(total_size));
}

async fn compress_files(files: Vec<PathBuf>, output_path: PathBuf, level: Option<i64>, save_config: bool) {
    let mut settings = Settings::load();
    if let Some(level) = level {
        settings.compression_level = level.clamp(0, 9);
    }
    if save_config {
        save_settings(&settings);
    }

    println!();
    println!("🗜  Упаковка {} путь(ей) в {}", files.len(), output_path.display());
    println!("   Уровень сжатия: {}", settings.compression_level);
    println!();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stop_flag = stop_on_ctrl_c();
    let handle = tokio::spawn(jobs::run_compress_job(files, Some(settings.compression_level), tx, stop_flag));

    let mut pb: Option<ProgressBar> = None;
    let mut stats = ProgressStats::default();

    while let Some(event) = rx.recv().await {
        match event {
            ArchiveEvent::FileAdded(_, total, name, size) => {
                let bar = pb.get_or_insert_with(|| progress_bar(total as u64));
                stats.file_processed(size);
                bar.set_message(truncate_string(&name, 40));
                bar.inc(1);
            }
            ArchiveEvent::CompressionCompleted(files_count, before, after) => {
                if let Some(bar) = pb.take() {
                    bar.finish_and_clear();
                }
                stats.record_compression(before, after);
                println!("✅ Упаковано {} файл(ов): {} → {} ({})",
                    files_count, format_size(before), format_size(after), stats.compression_formatted());
            }
            ArchiveEvent::CompressionError(err) => {
                if let Some(bar) = pb.take() {
                    bar.abandon();
                }
                eprintln!("❌ Ошибка упаковки: {}", err);
            }
            ArchiveEvent::Cancelled => {
                eprintln!("⛔ Упаковка отменена");
            }
            _ => {}
        }
    }

    let zip = match handle.await {
        Ok(Ok(zip)) => zip,
        Ok(Err(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Ошибка: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::fs::write(&output_path, &zip).await {
        eprintln!("❌ Ошибка записи {}: {}", output_path.display(), e);
        std::process::exit(1);
    }
    println!("💾 Сохранено: {}", output_path.display());
}

fn decode_name(hex: &str) {
    let Some(bytes) = parse_hex(hex) else {
        eprintln!("Ошибка: ожидаются hex байты, например c4e3");
        std::process::exit(1);
    };

    let (encoding, name) = detect_and_decode(&bytes);
    println!("Кодировка: {}", encoding.name());
    println!("Имя: {}", name);
}
