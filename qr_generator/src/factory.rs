use std::fmt;
use std::str::FromStr;

use crate::error::QrError;

/// 画像ファクトリの種類（描画方法と出力形式を決める）
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Factory {
    /// PNGラスター画像
    Png,
    /// JPEGラスター画像
    Jpeg,
    /// BMPラスター画像
    Bmp,
    /// モジュールごとの矩形のみ（背景なし）
    Svg,
    /// 背景付きの矩形
    SvgFill,
    /// 背景付きの単一パス
    SvgPath,
}

impl Factory {
    pub fn is_vector(self) -> bool {
        matches!(self, Factory::Svg | Factory::SvgFill | Factory::SvgPath)
    }

    /// 出力形式の拡張子
    pub fn extension(self) -> &'static str {
        match self {
            Factory::Png => "png",
            Factory::Jpeg => "jpg",
            Factory::Bmp => "bmp",
            Factory::Svg | Factory::SvgFill | Factory::SvgPath => "svg",
        }
    }
}

impl FromStr for Factory {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "pymaging" | "pil" => Ok(Factory::Png),
            "jpeg" | "jpg" => Ok(Factory::Jpeg),
            "bmp" => Ok(Factory::Bmp),
            "svg" => Ok(Factory::Svg),
            "svgfill" => Ok(Factory::SvgFill),
            "svgpath" => Ok(Factory::SvgPath),
            _ => Err(QrError::encoding(format!(
                "未対応の画像ファクトリです: \"{}\"（png, jpeg, bmp, svg, svgfill, svgpath のいずれかを指定してください）",
                s
            ))),
        }
    }
}

impl fmt::Display for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Png => write!(f, "png"),
            Factory::Jpeg => write!(f, "jpeg"),
            Factory::Bmp => write!(f, "bmp"),
            Factory::Svg => write!(f, "svg"),
            Factory::SvgFill => write!(f, "svgfill"),
            Factory::SvgPath => write!(f, "svgpath"),
        }
    }
}
