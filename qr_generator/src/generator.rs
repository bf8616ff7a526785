use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use log::{debug, info, warn};
use qrcode::types::QrError as EncodeError;
use qrcode::{QrCode, Version};

use crate::color::{flatten_on_white, parse_color};
use crate::error::{QrError, Result};
use crate::factory::Factory;
use crate::request::QrRequest;
use crate::svg::{to_svg_string, SvgOptions, SvgStyle};
use crate::util::formatter::str_formatter::format_bytes;

/// 生成画像の一辺の上限（ピクセル）
pub const MAX_IMAGE_DIMENSION: u32 = 32_768;
/// JPEG出力の品質
pub const JPEG_QUALITY: u8 = 95;

/// 描画済みのQRコード画像
#[derive(Debug)]
pub struct QrImage {
    pub factory: Factory,
    pub version: Version,
    /// 余白を含まない1辺のモジュール数
    pub modules: usize,
    /// 出力ファイルにそのまま書き込むバイト列
    pub bytes: Vec<u8>,
}

/// リクエストからQRコードを生成し、ファクトリの形式で描画する
pub fn generate(request: &QrRequest) -> Result<QrImage> {
    let factory: Factory = request.factory_type.parse()?;
    let fill = parse_color(&request.fill_color)?;
    let back = parse_color(&request.back_color)?;
    debug!(
        "ファクトリ: {}, 前景色: {} {:?}, 背景色: {} {:?}",
        factory, request.fill_color, fill.0, request.back_color, back.0
    );

    if let Some(ext) = request
        .output_file
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
    {
        let matches = ext == factory.extension() || (factory == Factory::Jpeg && ext == "jpeg");
        if !matches {
            warn!(
                "出力ファイルの拡張子 .{} は形式 {} と一致しません",
                ext, factory
            );
        }
    }

    let code = encode(request)?;
    // ラスター・SVGともに画像サイズを先に検証する
    let dimension = image_dimension(code.width(), request.border_size, request.box_size)?;
    debug!("出力画像: {}x{}px", dimension, dimension);

    let bytes = if factory.is_vector() {
        render_svg(&code, request, factory, fill, back).into_bytes()
    } else {
        let image = render_raster(&code, request, fill, back)?;
        encode_raster(image, factory)?
    };
    info!(
        "QRコードを描画しました: {} ({}モジュール, {})",
        factory,
        code.width(),
        format_bytes(bytes.len() as u64)
    );

    Ok(QrImage {
        factory,
        version: code.version(),
        modules: code.width(),
        bytes,
    })
}

/// データをQRコードにエンコードする（バージョン未指定時はデータに合わせて自動選択）
pub fn encode(request: &QrRequest) -> Result<QrCode> {
    let level = request.error_correction.ec_level();
    debug!(
        "エンコード開始: {}バイト, 誤り訂正レベル: {}, バージョン: {}",
        request.data.len(),
        request.error_correction,
        request
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "自動".to_string())
    );

    let result = match request.version {
        Some(v) => QrCode::with_version(request.data.as_bytes(), Version::Normal(v), level),
        None => QrCode::with_error_correction_level(request.data.as_bytes(), level),
    };
    let code = result.map_err(|e| match (e, request.version) {
        (EncodeError::DataTooLong, Some(v)) => QrError::encoding(format!(
            "データがバージョン {} (誤り訂正 {}) の容量を超えています",
            v, request.error_correction
        )),
        (EncodeError::DataTooLong, None) => QrError::encoding(format!(
            "データが大きすぎます (誤り訂正 {} では最大バージョン40にも収まりません)",
            request.error_correction
        )),
        (other, _) => QrError::from(other),
    })?;

    debug!(
        "エンコード完了: バージョン {:?}, {}x{} モジュール",
        code.version(),
        code.width(),
        code.width()
    );
    Ok(code)
}

/// 余白を含む画像の1辺のピクセル数
fn image_dimension(modules: usize, border: u32, box_size: u32) -> Result<u32> {
    u32::try_from(modules)
        .ok()
        .and_then(|m| border.checked_mul(2).and_then(|b| m.checked_add(b)))
        .and_then(|total| total.checked_mul(box_size))
        .filter(|d| *d <= MAX_IMAGE_DIMENSION)
        .ok_or_else(|| {
            QrError::encoding(format!(
                "画像サイズが大きすぎます（上限 {}px）: {}モジュール, 余白 {}, ボックス {}px",
                MAX_IMAGE_DIMENSION, modules, border, box_size
            ))
        })
}

/// ラスター画像を描画する
///
/// シンボル部分はエンコーダーのレンダラーで描き、余白は背景色のキャンバスで確保する。
pub fn render_raster(
    code: &QrCode,
    request: &QrRequest,
    fill: Rgba<u8>,
    back: Rgba<u8>,
) -> Result<RgbaImage> {
    let dimension = image_dimension(code.width(), request.border_size, request.box_size)?;

    let symbol = code
        .render::<Rgba<u8>>()
        .quiet_zone(false)
        .module_dimensions(request.box_size, request.box_size)
        .dark_color(fill)
        .light_color(back)
        .build();

    let mut canvas = RgbaImage::from_pixel(dimension, dimension, back);
    let offset = i64::from(request.border_size * request.box_size);
    imageops::replace(&mut canvas, &symbol, offset, offset);
    debug!("ラスター画像: {}x{}px", canvas.width(), canvas.height());
    Ok(canvas)
}

fn render_svg(
    code: &QrCode,
    request: &QrRequest,
    factory: Factory,
    fill: Rgba<u8>,
    back: Rgba<u8>,
) -> String {
    let style = match factory {
        Factory::SvgFill => SvgStyle::FilledRects,
        Factory::SvgPath => SvgStyle::Path,
        _ => SvgStyle::Rects,
    };
    to_svg_string(
        code,
        &SvgOptions {
            style,
            border: request.border_size,
            box_size: request.box_size,
            fill,
            back,
        },
    )
}

/// ラスター画像をファクトリの形式でエンコードする
fn encode_raster(image: RgbaImage, factory: Factory) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match factory {
        Factory::Jpeg => {
            // JPEGはアルファを持たないため白の上に合成する
            let rgb = flatten_on_white(&image);
            bytes = encode_jpeg(&rgb)?;
        }
        Factory::Bmp => {
            DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)?;
        }
        _ => {
            DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        }
    }
    Ok(bytes)
}

/// imageクレートのJpegEncoderを使用したJPEGエンコード
#[cfg_attr(feature = "mozjpeg-encoder", allow(dead_code))]
fn encode_jpeg_image(rgb: &image::RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder.encode_image(rgb)?;
    Ok(bytes)
}

/// mozjpegを使用したJPEGエンコード
#[cfg(feature = "mozjpeg-encoder")]
fn encode_jpeg(rgb: &image::RgbImage) -> Result<Vec<u8>> {
    use mozjpeg::{ColorSpace, Compress};

    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    comp.set_size(rgb.width() as usize, rgb.height() as usize);
    comp.set_quality(JPEG_QUALITY as f32);
    comp.set_optimize_coding(true);

    let to_encoding_error = |e: std::io::Error| QrError::encoding(format!("mozjpegの圧縮に失敗しました: {}", e));
    let mut started = comp.start_compress(Vec::new()).map_err(to_encoding_error)?;
    started.write_scanlines(rgb.as_raw()).map_err(to_encoding_error)?;
    started.finish().map_err(to_encoding_error)
}

/// mozjpegが利用できない場合はimageクレートのエンコーダーを使用
#[cfg(not(feature = "mozjpeg-encoder"))]
fn encode_jpeg(rgb: &image::RgbImage) -> Result<Vec<u8>> {
    encode_jpeg_image(rgb)
}
