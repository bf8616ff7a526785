use std::fmt::Write;

use image::Rgba;
use qrcode::render::svg;
use qrcode::{Color, QrCode};

use crate::color::{opacity, to_hex};

/// SVGの描画スタイル
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SvgStyle {
    /// モジュールごとの `<rect>`、背景なし
    Rects,
    /// 背景付きの `<rect>`
    FilledRects,
    /// 背景付きの単一 `<path>`（エンコーダーのSVGレンダラーで描画）
    Path,
}

/// SVG描画の設定
///
/// `(modules + 2 * border) * box_size` が `u32` に収まることは呼び出し側で検証しておくこと
/// （[`crate::generator::generate`] は上限付きで検証する）。
#[derive(Clone, Debug)]
pub struct SvgOptions {
    pub style: SvgStyle,
    pub border: u32,
    pub box_size: u32,
    pub fill: Rgba<u8>,
    pub back: Rgba<u8>,
}

/// QRコードをSVG文字列に変換する
///
/// 座標はピクセル単位（1モジュール = `box_size`）。改行は常に `\n`。
/// 半透明の色は `fill-opacity` で表す。
pub fn to_svg_string(code: &QrCode, options: &SvgOptions) -> String {
    let width = code.width() as u32;
    let dimension = (width + 2 * options.border) * options.box_size;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    let _ = writeln!(
        result,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">",
        dimension
    );

    if options.style != SvgStyle::Rects {
        let _ = writeln!(
            result,
            "\t<rect width=\"100%\" height=\"100%\"{}/>",
            fill_attributes(options.back)
        );
    }

    match options.style {
        SvgStyle::Rects | SvgStyle::FilledRects => write_rects(&mut result, code, options),
        SvgStyle::Path => write_path(&mut result, code, options),
    }

    result += "</svg>\n";
    result
}

fn fill_attributes(color: Rgba<u8>) -> String {
    match opacity(color) {
        Some(alpha) => format!(" fill=\"{}\" fill-opacity=\"{}\"", to_hex(color), alpha),
        None => format!(" fill=\"{}\"", to_hex(color)),
    }
}

fn write_rects(result: &mut String, code: &QrCode, options: &SvgOptions) {
    let width = code.width() as u32;
    let fill = fill_attributes(options.fill);
    for (i, _) in code
        .to_colors()
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == Color::Dark)
    {
        let x = (i as u32 % width + options.border) * options.box_size;
        let y = (i as u32 / width + options.border) * options.box_size;
        let _ = writeln!(
            result,
            "\t<rect x=\"{}\" y=\"{}\" width=\"{2}\" height=\"{2}\"{3}/>",
            x, y, options.box_size, fill
        );
    }
}

/// シンボル部分をエンコーダーのSVGレンダラーで描き、余白の位置に入れ子の `<svg>` として配置する
fn write_path(result: &mut String, code: &QrCode, options: &SvgOptions) {
    let fill = to_hex(options.fill);
    let symbol = code
        .render::<svg::Color<'_>>()
        .quiet_zone(false)
        .module_dimensions(options.box_size, options.box_size)
        .dark_color(svg::Color(&fill))
        .light_color(svg::Color("none"))
        .build();

    // XML宣言を外して入れ子にする
    let body = match symbol.find("?>") {
        Some(end) => &symbol[end + 2..],
        None => symbol.as_str(),
    };
    let offset = options.border * options.box_size;
    let body = body.replacen("<svg ", &format!("<svg x=\"{0}\" y=\"{0}\" ", offset), 1);

    match opacity(options.fill) {
        Some(alpha) => {
            let _ = writeln!(result, "\t<g fill-opacity=\"{}\">{}</g>", alpha, body);
        }
        None => {
            let _ = writeln!(result, "\t{}", body);
        }
    }
}
