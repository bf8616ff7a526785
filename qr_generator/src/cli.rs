use std::ffi::OsString;

use clap::Parser;

use crate::error::Result;

/// デフォルトの誤り訂正率（%）
pub const DEFAULT_ERROR_CORRECTION: i32 = 25;
/// デフォルトの余白（モジュール数）
pub const DEFAULT_BORDER_SIZE: i32 = 5;
/// デフォルトの1モジュールあたりのピクセル数
pub const DEFAULT_BOX_SIZE: i32 = 10;

/// コマンドライン引数の解析のためのデータ構造
///
/// 値の範囲チェックはここでは行わず、[`crate::request::QrRequest::from_cli`] で行う。
#[derive(Parser, Debug)]
#[command(
    name = "generate_qrcode",
    about = "コマンドラインからQRコードを生成します",
    long_about = None,
    allow_negative_numbers = true
)]
pub struct Cli {
    /// QRコードにするデータ（複数指定時は空白で連結）
    #[arg(required = true, num_args = 1.., help = "QRコードにするデータ/文字列")]
    pub data: Vec<String>,

    /// 目標とする誤り訂正率（%）
    #[arg(
        short = 'e',
        long = "error-correction",
        default_value_t = DEFAULT_ERROR_CORRECTION,
        help = "目標とする誤り訂正率（%）を指定します（デフォルト: 25）"
    )]
    pub error_correction: i32,

    /// 余白の幅（モジュール数）
    #[arg(
        short = 'b',
        long = "border-size",
        default_value_t = DEFAULT_BORDER_SIZE,
        help = "余白の幅をモジュール数で指定します（デフォルト: 5, 最小: 4）"
    )]
    pub border_size: i32,

    /// 1モジュールあたりのピクセル数
    #[arg(
        short = 'p',
        long = "box-size",
        default_value_t = DEFAULT_BOX_SIZE,
        help = "1モジュールあたりのピクセル数を指定します（デフォルト: 10）"
    )]
    pub box_size: i32,

    /// 前景色（-fc）
    #[arg(
        long = "fill-color",
        default_value = "black",
        help = "前景色をHTMLの色名または16進数で指定します [-fc]（デフォルト: black）"
    )]
    pub fill_color: String,

    /// 背景色（-bc）
    #[arg(
        long = "back-color",
        default_value = "white",
        help = "背景色をHTMLの色名または16進数で指定します [-bc]（デフォルト: white）"
    )]
    pub back_color: String,

    /// 画像ファクトリの種類（出力形式も決まる）
    #[arg(
        short = 'f',
        long = "factory",
        default_value = "png",
        help = "画像ファクトリの種類（出力形式）: png, jpeg, bmp, svg, svgfill, svgpath（デフォルト: png）"
    )]
    pub factory: String,

    /// QRコードのバージョン（省略時は自動）
    #[arg(
        short = 'v',
        long = "version",
        help = "QRコードのバージョンを1から40で指定します（省略時はデータに合わせて自動選択）"
    )]
    pub version: Option<i32>,

    /// デバッグ出力
    #[arg(short = 'd', long = "debug", default_value_t = false, help = "詳細なデバッグログを出力します")]
    pub debug: bool,

    /// 出力ファイル名
    #[arg(short = 'o', long = "output-file", help = "出力ファイル名")]
    pub output_file: String,
}

impl Cli {
    /// 位置引数を1つのデータ文字列にまとめる
    pub fn joined_data(&self) -> String {
        self.data.join(" ")
    }
}

/// 2文字の短縮オプション（-fc, -bc）を長い形式に書き換える
///
/// clapの短縮オプションは1文字のみのため、解析前に変換する。
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    const ALIASES: [(&str, &str); 2] = [("-fc", "--fill-color"), ("-bc", "--back-color")];

    let mut normalized = Vec::new();
    let mut passthrough = false;
    for arg in args {
        let arg: OsString = arg.into();
        if passthrough {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let mut rewritten = None;
        for (short, long) in ALIASES {
            if text == short {
                rewritten = Some(long.to_string());
            } else if let Some(value) = text.strip_prefix(short) {
                let value = value.strip_prefix('=').unwrap_or(value);
                rewritten = Some(format!("{}={}", long, value));
            }
            if rewritten.is_some() {
                break;
            }
        }
        normalized.push(rewritten.map(OsString::from).unwrap_or(arg));
    }
    normalized
}

/// コマンドライン引数をパースする
pub fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Ok(Cli::try_parse_from(normalize_args(args))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrError;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli> {
        parse_args(std::iter::once("generate_qrcode").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_are_applied() {
        let cli = parse(&["hello world", "-o", "out.png"]).unwrap();
        assert_eq!(cli.data, vec!["hello world"]);
        assert_eq!(cli.error_correction, 25);
        assert_eq!(cli.border_size, 5);
        assert_eq!(cli.box_size, 10);
        assert_eq!(cli.fill_color, "black");
        assert_eq!(cli.back_color, "white");
        assert_eq!(cli.factory, "png");
        assert_eq!(cli.version, None);
        assert!(!cli.debug);
        assert_eq!(cli.output_file, "out.png");
    }

    #[test]
    fn two_letter_color_flags() {
        let cli = parse(&["hello", "-b", "4", "-p", "20", "-fc", "red", "-bc", "#000000", "-o", "out.png"])
            .unwrap();
        assert_eq!(cli.border_size, 4);
        assert_eq!(cli.box_size, 20);
        assert_eq!(cli.fill_color, "red");
        assert_eq!(cli.back_color, "#000000");
    }

    #[test]
    fn attached_two_letter_values() {
        let cli = parse(&["x", "-fc=blue", "-bcyellow", "-o", "a.png"]).unwrap();
        assert_eq!(cli.fill_color, "blue");
        assert_eq!(cli.back_color, "yellow");
    }

    #[test]
    fn single_letter_flags_are_not_rewritten() {
        let args = normalize_args(["prog", "-f", "svg", "-b", "6"]);
        assert_eq!(args, vec!["prog", "-f", "svg", "-b", "6"]);
    }

    #[test]
    fn arguments_after_double_dash_are_untouched() {
        let args = normalize_args(["prog", "--", "-fc"]);
        assert_eq!(args, vec!["prog", "--", "-fc"]);
    }

    #[test]
    fn multiple_data_words_are_joined() {
        let cli = parse(&["hello", "big", "world", "-o", "out.png"]).unwrap();
        assert_eq!(cli.joined_data(), "hello big world");
    }

    #[test]
    fn version_flag_is_qr_version() {
        let cli = parse(&["x", "-v", "1", "-e", "25", "-o", "out.png"]).unwrap();
        assert_eq!(cli.version, Some(1));
    }

    #[test]
    fn negative_values_reach_validation() {
        let cli = parse(&["x", "-b", "-1", "-o", "out.png"]).unwrap();
        assert_eq!(cli.border_size, -1);
    }

    #[test]
    fn missing_data_is_usage_error() {
        let err = parse(&["-o", "out.png"]).unwrap_err();
        match err {
            QrError::Usage(e) => assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_output_is_usage_error() {
        let err = parse(&["hello"]).unwrap_err();
        assert!(matches!(err, QrError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn non_integer_border_is_usage_error() {
        let err = parse(&["hello", "-b", "wide", "-o", "out.png"]).unwrap_err();
        match err {
            QrError::Usage(e) => assert_eq!(e.kind(), ErrorKind::ValueValidation),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn help_exits_successfully() {
        let err = parse(&["-h"]).unwrap_err();
        assert_eq!(err.exit_code(), 0);
    }
}
