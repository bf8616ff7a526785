use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// QRコード生成の各段階で発生するエラー
#[derive(Debug, Error)]
pub enum QrError {
    /// 引数の不足・型変換の失敗（clapが検出したもの）
    ///
    /// `-h/--help` によるヘルプ表示もclapからこの形で返る。その場合 `exit_code()` は0。
    #[error("{0}")]
    Usage(#[from] clap::Error),

    /// 値の範囲外
    #[error("不正な値です: {0}")]
    Validation(String),

    /// エンコードまたは描画の失敗
    #[error("QRコードを生成できませんでした: {0}")]
    Encoding(String),

    /// 出力ファイルの書き込み失敗
    #[error("ファイルを書き込めませんでした {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl QrError {
    pub fn validation(message: impl Into<String>) -> Self {
        QrError::Validation(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        QrError::Encoding(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        QrError::Io {
            path: path.into(),
            source,
        }
    }

    /// プロセスの終了コード（clapの慣例に合わせて使用法エラーは2）
    pub fn exit_code(&self) -> i32 {
        match self {
            QrError::Usage(e) => e.exit_code(),
            _ => 1,
        }
    }
}

impl From<qrcode::types::QrError> for QrError {
    fn from(e: qrcode::types::QrError) -> Self {
        QrError::Encoding(e.to_string())
    }
}

impl From<image::ImageError> for QrError {
    fn from(e: image::ImageError) -> Self {
        QrError::Encoding(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QrError>;
