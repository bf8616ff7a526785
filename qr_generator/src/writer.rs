use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{QrError, Result};
use crate::util::formatter::str_formatter::format_bytes;

/// 出力先と同じディレクトリに置く一時ファイルのパス
fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "qrcode".to_string());
    let temp_name = format!(".{}.{}.tmp", name, std::process::id());
    match output.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    }
}

/// 画像のバイト列をファイルに書き込む
///
/// 一時ファイルに書き込んでからリネームするため、失敗時に不完全なファイルは残らず、
/// 既存のファイルも変更されない。
pub fn write_image(bytes: &[u8], output: &Path) -> Result<()> {
    let temp_path = temp_path_for(output);
    debug!("一時ファイルに書き込みます: {}", temp_path.display());

    if let Err(e) = write_and_sync(bytes, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(QrError::io(output, e));
    }

    if let Err(e) = fs::rename(&temp_path, output) {
        let _ = fs::remove_file(&temp_path);
        return Err(QrError::io(output, e));
    }

    info!(
        "QRコードをファイルに書き込みました: {} ({})",
        output.display(),
        format_bytes(bytes.len() as u64)
    );
    Ok(())
}

fn write_and_sync(bytes: &[u8], path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
