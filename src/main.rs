use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use soil_scan::cli::{Cli, Commands, ConfigArgs, ScanMode};
use soil_scan::config::{BackendConfig, Config};
use soil_scan::{ScanResult, SoilScanService};
use std::io::{Read, Write};
use std::path::Path;

fn main() {
    if let Err(error) = run() {
        eprintln!("soil-scan error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = Config::load().context("設定の読み込みに失敗しました")?;
    let service = || SoilScanService::from_config(&config);

    match cli.command {
        Commands::Scan { mode } => scan(&service()?, mode)?,

        Commands::Crops { query, lang } => {
            print_json(&service()?.list_crops(query.as_deref(), lang)?)?;
        }

        Commands::Crop { id } => print_json(&service()?.get_crop(&id)?)?,

        Commands::Favorites { add, remove } => {
            let service = service()?;
            let favs = match (add, remove) {
                (Some(id), _) => service.add_favorite(&id)?,
                (None, Some(id)) => service.remove_favorite(&id)?,
                (None, None) => service.list_favorites()?,
            };
            print_json(&favs)?;
        }

        Commands::Soils => {
            let soils: Vec<ScanResult> = service()?
                .soil_types()
                .iter()
                .map(|soil| ScanResult::for_soil(*soil, None))
                .collect();
            print_json(&soils)?;
        }

        Commands::Config(args) => configure(args)?,
    }

    Ok(())
}

fn scan(service: &SoilScanService, mode: ScanMode) -> anyhow::Result<()> {
    match mode {
        ScanMode::Manual { soil } => print_json(&service.manual_soil_scan(&soil)),
        ScanMode::Upload { file, name } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("画像を読み込めません: {}", file.display()))?;
            let file_name = match name {
                Some(name) => name,
                None => file_name_of(&file)?,
            };
            print_json(&service.upload_soil_scan(&bytes, &file_name)?)
        }
        ScanMode::Live { input } => {
            let data_uri = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("入力を読み込めません: {}", path.display()))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("標準入力を読み込めません")?;
                    buffer
                }
            };
            print_json(&service.live_soil_scan(&data_uri)?)
        }
    }
}

fn configure(args: ConfigArgs) -> anyhow::Result<()> {
    let mut config = Config::load_saved().context("設定の読み込みに失敗しました")?;
    let mut changed = false;

    if let Some(dir) = args.set_data_dir {
        config.data_dir = dir;
        changed = true;
    }
    if let Some(dir) = args.set_uploads_dir {
        config.uploads_dir = dir;
        changed = true;
    }
    if let Some(line) = args.set_backend {
        config.backend = BackendConfig::from_args(&line);
        changed = true;
    }
    if args.clear_backend {
        config.backend = None;
        changed = true;
    }

    if changed {
        config.validate()?;
        config.save().context("設定の保存に失敗しました")?;
        eprintln!("✔ 設定を保存しました");
    }

    if args.show || !changed {
        print_json(&config)?;
    }
    Ok(())
}

fn file_name_of(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("ファイル名がありません: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    write_json(&mut std::io::stdout().lock(), value)
}

/// 書き込み失敗（パイプ切断など）はエラーとして返す
fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    writeln!(writer, "{}", serde_json::to_string_pretty(value)?)?;
    writer.flush()?;
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SOIL_SCAN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("ログの初期化に失敗しました: {error}"))?;

    Ok(())
}
