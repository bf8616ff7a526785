use anyhow::Result;
use chrono::Local;
use colored::*;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use regex::Regex;

/// デバッグ指定の有無からログレベルを決める
pub fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// ロガーを初期化する（出力先は標準エラー）
pub fn init_logger(debug: bool) -> Result<()> {
    // カラー設定
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    // ファイルパス（拡張子付き）と数値（単位付きを含む）
    let highlight_pattern = Regex::new(
        r"(?P<path>(?:[A-Za-z]:)?[\w./\\-]*[\w-]\.(?:png|jpe?g|bmp|svg|tmp))\b|(?P<num>\b\d+(?:\.\d+)?(?:\s?(?:bytes|KB|MB|px|%))?)",
    )?;

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = Local::now()
                .format("[%Y-%m-%d %H:%M:%S]")
                .to_string()
                .blue()
                .bold();

            // モジュール名を黄色で表示
            let module = record.target();
            let target_parts: Vec<&str> = module.split("::").collect();
            let target = if target_parts.len() > 1 {
                format!(
                    "[{}::{}]",
                    target_parts[0].yellow(),
                    target_parts[1..].join("::").yellow().bold()
                )
            } else {
                format!("[{}]", module.yellow())
            };

            let level = colors.color(record.level());

            // パスを緑色、数値を紫色に
            let plain = message.to_string();
            let colored_message = highlight_pattern.replace_all(
                &plain,
                |caps: &regex::Captures| {
                    if caps.name("path").is_some() {
                        caps[0].green().to_string()
                    } else {
                        caps[0].purple().bold().to_string()
                    }
                },
            );

            out.finish(format_args!(
                "{} {} [{}] {}",
                timestamp, target, level, colored_message
            ))
        })
        .level(level_for(debug))
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
