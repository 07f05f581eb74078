use clap::{Args, Parser, Subcommand};
use soil_scan_common::Lang;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soil-scan")]
#[command(about = "土壌判定・作物カタログ・お気に入り管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 土壌を判定して推奨作物を表示
    Scan {
        #[command(subcommand)]
        mode: ScanMode,
    },

    /// 作物カタログを検索
    Crops {
        /// 検索語（省略時は全件）
        #[arg(short, long)]
        query: Option<String>,

        /// 表示言語 (en/kn)
        #[arg(short, long)]
        lang: Option<Lang>,
    },

    /// 作物の詳細を表示
    Crop {
        /// 作物ID
        #[arg(required = true)]
        id: String,
    },

    /// お気に入りを表示/編集
    Favorites {
        /// お気に入りに追加する作物ID
        #[arg(long, conflicts_with = "remove")]
        add: Option<String>,

        /// お気に入りから削除する作物ID
        #[arg(long)]
        remove: Option<String>,
    },

    /// 土壌ラベルと推奨作物の一覧
    Soils,

    /// 設定を表示/編集
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// 設定を表示
    #[arg(long)]
    pub show: bool,

    /// データディレクトリ（crops.json / favorites.json）を設定
    #[arg(long)]
    pub set_data_dir: Option<PathBuf>,

    /// アップロード先ディレクトリを設定
    #[arg(long)]
    pub set_uploads_dir: Option<PathBuf>,

    /// 分類バックエンドのコマンドを設定（以降の引数はコマンドに渡す）
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "CMD")]
    pub set_backend: Option<Vec<String>>,

    /// 分類バックエンドを解除
    #[arg(long, conflicts_with = "set_backend")]
    pub clear_backend: bool,
}

#[derive(Subcommand)]
pub enum ScanMode {
    /// 土壌ラベルを指定
    Manual {
        /// 土壌ラベル (Laterite/Alluvial/Black/Red/Desert/Mountain)
        #[arg(required = true)]
        soil: String,
    },

    /// 画像ファイルから判定
    Upload {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 保存時のファイル名（省略時は元のファイル名）
        #[arg(short, long)]
        name: Option<String>,
    },

    /// カメラ撮影画像（Data URI）から判定
    Live {
        /// Data URIを含むファイル（省略時は標準入力）
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_crops_with_lang() {
        let cli = Cli::parse_from(["soil-scan", "crops", "--query", "rice", "--lang", "kn"]);
        match cli.command {
            Commands::Crops { query, lang } => {
                assert_eq!(query.as_deref(), Some("rice"));
                assert_eq!(lang, Some(Lang::Kn));
            }
            _ => panic!("crops expected"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_lang() {
        assert!(Cli::try_parse_from(["soil-scan", "crops", "--lang", "fr"]).is_err());
    }

    #[test]
    fn test_parse_set_backend_with_flags() {
        let cli = Cli::parse_from(["soil-scan", "config", "--set-backend", "python3", "predict.py", "--gpu"]);
        match cli.command {
            Commands::Config(args) => {
                assert_eq!(
                    args.set_backend,
                    Some(vec!["python3".to_string(), "predict.py".to_string(), "--gpu".to_string()])
                );
            }
            _ => panic!("config expected"),
        }
    }

    #[test]
    fn test_set_backend_keeps_argument_with_space() {
        let cli = Cli::parse_from(["soil-scan", "config", "--set-backend", "python3", "my model.py"]);
        let Commands::Config(args) = cli.command else {
            panic!("config expected");
        };
        let line = args.set_backend.expect("backend expected");
        let backend = crate::config::BackendConfig::from_args(&line).unwrap();
        assert_eq!(backend.command, "python3");
        assert_eq!(backend.args, vec!["my model.py"]);
    }

    #[test]
    fn test_add_and_remove_conflict() {
        assert!(Cli::try_parse_from(["soil-scan", "favorites", "--add", "a", "--remove", "b"]).is_err());
    }

    #[test]
    fn test_parse_scan_manual() {
        let cli = Cli::parse_from(["soil-scan", "-v", "scan", "manual", "Red"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Scan { mode: ScanMode::Manual { ref soil } } if soil == "Red"));
    }
}
