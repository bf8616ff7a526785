use std::fmt;
use std::path::PathBuf;

use log::{debug, warn};
use qrcode::EcLevel;

use crate::cli::Cli;
use crate::error::{QrError, Result};

/// 余白の最小モジュール数
pub const MIN_BORDER_SIZE: u32 = 4;
/// QRコードのバージョン範囲
pub const MIN_VERSION: i16 = 1;
pub const MAX_VERSION: i16 = 40;
/// レベルHで復元できる誤り訂正率の上限（%）
pub const MAX_SUPPORTED_ERROR_CORRECTION: u8 = 30;

/// 誤り訂正レベル
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCorrection {
    /// 約7%
    Low,
    /// 約15%
    Medium,
    /// 約25%
    Quartile,
    /// 約30%
    High,
}

impl ErrorCorrection {
    /// 誤り訂正率（%）から最も近いレベルを選ぶ
    ///
    /// - (0, 7] → L
    /// - (7, 15] → M
    /// - (15, 25] → Q
    /// - (25, 100] → H（30%を超える値は上限のHとして扱う）
    pub fn from_percentage(percent: i32) -> Result<Self> {
        if !(0..=100).contains(&percent) {
            return Err(QrError::validation(format!(
                "誤り訂正率は0から100の範囲で指定してください: {}",
                percent
            )));
        }

        let level = match percent {
            0..=7 => ErrorCorrection::Low,
            8..=15 => ErrorCorrection::Medium,
            16..=25 => ErrorCorrection::Quartile,
            _ => {
                if percent > i32::from(MAX_SUPPORTED_ERROR_CORRECTION) {
                    warn!(
                        "指定された誤り訂正率 {}% はサポートされる上限 {}% を超えています。上限値を使用します。",
                        percent, MAX_SUPPORTED_ERROR_CORRECTION
                    );
                }
                ErrorCorrection::High
            }
        };
        Ok(level)
    }

    /// エンコーダーに渡すレベル
    pub fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCorrection::Low => write!(f, "L (7%)"),
            ErrorCorrection::Medium => write!(f, "M (15%)"),
            ErrorCorrection::Quartile => write!(f, "Q (25%)"),
            ErrorCorrection::High => write!(f, "H (30%)"),
        }
    }
}

/// 検証済みのQRコード生成パラメータ
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrRequest {
    pub data: String,
    pub error_correction: ErrorCorrection,
    pub border_size: u32,
    pub box_size: u32,
    pub fill_color: String,
    pub back_color: String,
    pub factory_type: String,
    /// `None` の場合はデータが収まる最小のバージョンを自動選択
    pub version: Option<i16>,
    pub output_file: PathBuf,
}

impl QrRequest {
    /// パース済みの引数を検証してリクエストを作る
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data = cli.joined_data();
        if data.is_empty() {
            return Err(QrError::validation("データが空です"));
        }

        if cli.border_size < MIN_BORDER_SIZE as i32 {
            return Err(QrError::validation(format!(
                "余白は最小 {} モジュールです: {}",
                MIN_BORDER_SIZE, cli.border_size
            )));
        }

        if cli.box_size <= 0 {
            return Err(QrError::validation(format!(
                "ボックスサイズは1以上である必要があります: {}",
                cli.box_size
            )));
        }

        let version = match cli.version {
            Some(v) if (i32::from(MIN_VERSION)..=i32::from(MAX_VERSION)).contains(&v) => {
                Some(v as i16)
            }
            Some(v) => {
                return Err(QrError::validation(format!(
                    "バージョンは{}から{}の範囲で指定してください: {}",
                    MIN_VERSION, MAX_VERSION, v
                )));
            }
            None => None,
        };

        let error_correction = ErrorCorrection::from_percentage(cli.error_correction)?;

        let request = Self {
            data,
            error_correction,
            border_size: cli.border_size as u32,
            box_size: cli.box_size as u32,
            fill_color: cli.fill_color.clone(),
            back_color: cli.back_color.clone(),
            factory_type: cli.factory.clone(),
            version,
            output_file: PathBuf::from(&cli.output_file),
        };
        debug!("検証済みリクエスト: {:?}", request);
        Ok(request)
    }
}
