//! Chirpy - 文本朗读命令行

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chirpy::config::{load_config, load_config_from_path, print_config, AppConfig};
use chirpy::domain::{QualityTier, SpeechVoice};
use chirpy::infrastructure::build_tts_service;

#[derive(Debug, Parser)]
#[command(name = "chirpy")]
#[command(about = "Read text aloud with tiered TTS quality and a local audio cache")]
struct Cli {
    /// Config file path (defaults to chirpy.toml / chirpy.local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Speak text and wait for playback to finish
    Say {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Override the configured quality tier (basic, standard, hd)
        #[arg(long)]
        quality: Option<QualityTier>,

        /// Override the configured voice
        #[arg(long)]
        voice: Option<String>,
    },
    /// List registered quality tiers
    Qualities,
    /// List the built-in voices
    Voices,
    /// Manage the audio cache
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Show cache statistics
    Stats,
    /// Delete every cached file
    Clear,
    /// Delete expired files
    Cleanup,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match &cli.config {
        Some(path) => load_config_from_path(Some(path.as_path())),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config);
    print_config(&config);

    match cli.command {
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Voices => {
            for voice in SpeechVoice::ALL {
                let marker = if voice.as_str() == config.tts.voice { "*" } else { " " };
                println!("{} {:<8} {}", marker, voice, voice.description());
            }
        }
        Commands::Qualities => {
            let service = build_tts_service(&config).await;
            for tier in service.available_qualities() {
                let marker = if tier == service.active_tier() { "*" } else { " " };
                let paid = if tier.is_paid() { "paid" } else { "free" };
                println!("{} {} ({})", marker, tier, paid);
            }
        }
        Commands::Say {
            text,
            quality,
            voice,
        } => {
            let mut service = build_tts_service(&config).await;
            if let Some(tier) = quality {
                if !service.set_quality(tier) {
                    tracing::warn!(tier = %tier, active = %service.active_tier(), "Keeping current quality");
                }
            }

            if !service.speak(&text.join(" "), voice.as_deref()).await {
                tracing::error!("Speech failed");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Cache(command) => {
            let service = build_tts_service(&config).await;
            match command {
                CacheCommand::Stats => match service.cache_stats().await {
                    Some(stats) => {
                        println!("Directory:  {}", stats.cache_dir.display());
                        println!("Files:      {}", stats.file_count);
                        println!(
                            "Size:       {:.2} MB / {} MB",
                            stats.total_size_mb, stats.max_size_mb
                        );
                        println!(
                            "Oldest:     {:.1} days (max {} days)",
                            stats.oldest_file_age_days, stats.max_age_days
                        );
                    }
                    None => println!("No audio cache (remote TTS unavailable)"),
                },
                CacheCommand::Clear => {
                    let removed = service.clear_cache().await;
                    println!("Removed {} cached files", removed);
                }
                CacheCommand::Cleanup => match service.cleanup_cache().await {
                    Some(summary) => println!(
                        "Removed {} expired files ({:.2} MB)",
                        summary.removed_count,
                        summary.removed_mb()
                    ),
                    None => println!("No audio cache (remote TTS unavailable)"),
                },
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// 初始化日志，`RUST_LOG` 优先于配置；日志写 stderr，命令输出写 stdout
fn init_logging(config: &AppConfig) {
    let log_filter = format!("{},chirpy={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
