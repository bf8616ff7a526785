use anyhow::{Context, Result};
use log::{debug, info};

use qr_generator::{logger, parse_args, run_request, QrError, QrRequest};

fn main() {
    // コマンドライン引数の解析（ヘルプ表示・使用法エラーはclapに任せる）
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(QrError::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(e.exit_code());
        }
    };
    let debug = cli.debug;

    if let Err(e) = logger::init_logger(debug) {
        eprintln!("警告: ロガーを初期化できませんでした: {}", e);
    }
    debug!("解析済み引数: {:?}", cli);

    if let Err(e) = run(&cli) {
        if debug {
            eprintln!("エラー: {:?}", e);
        } else {
            eprintln!("エラー: {:#}", e);
        }
        let code = e
            .downcast_ref::<QrError>()
            .map(QrError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: &qr_generator::Cli) -> Result<()> {
    let request = QrRequest::from_cli(cli)?;

    let image = run_request(&request).with_context(|| {
        format!(
            "{} の作成に失敗しました",
            request.output_file.display()
        )
    })?;

    info!(
        "完了: バージョン {:?}, 形式 {}, 出力 {}",
        image.version,
        image.factory,
        request.output_file.display()
    );
    Ok(())
}
