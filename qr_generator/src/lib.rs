/// QRコード生成ユーティリティのライブラリクレート
///
/// コマンドライン引数を検証し、`qrcode` クレートでエンコードした結果を
/// `image` クレート（またはSVG）で描画してファイルに書き出します。
pub mod cli;
pub mod color;
pub mod error;
pub mod factory;
pub mod generator;
pub mod logger;
pub mod request;
pub mod svg;
pub mod util;
pub mod writer;

pub use cli::{parse_args, Cli};
pub use error::QrError;
pub use generator::{generate, QrImage};
pub use request::{ErrorCorrection, QrRequest};
pub use writer::write_image;

/// 検証済みリクエストから画像を生成して書き込む
pub fn run_request(request: &QrRequest) -> error::Result<QrImage> {
    let image = generate(request)?;
    write_image(&image.bytes, &request.output_file)?;
    Ok(image)
}
