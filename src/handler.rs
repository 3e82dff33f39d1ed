//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、载体图像的编解码、调用核心隐写算法以及向用户报告结果。

use crate::carrier::{self, Carrier};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::codec::{self, ScanMode};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::error::StegoError;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 隐写结果图像的默认路径：输入图像旁的 `doctored_<文件名>`。
pub fn default_hide_dest(image: &Path) -> PathBuf {
    let name = image.file_name().unwrap_or_default().to_string_lossy();
    image.with_file_name(format!("{DOCTORED_PREFIX}{name}"))
}

/// 恢复文本的默认路径：图像旁的 `recovered_<文件名主干>.txt`。
pub fn default_recover_dest(image: &Path) -> PathBuf {
    let stem = image.file_stem().unwrap_or_default().to_string_lossy();
    image.with_file_name(format!("{RECOVERED_PREFIX}{stem}.txt"))
}

fn ensure_can_write(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、检查隐写空间是否足够、调用隐写核心函数写入消息和结束标记，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 目标扩展名不是可写的无损图像格式。
/// * 无法读取输入的图像或文本文件。
/// * 要隐藏的文本为空，或图像没有足够的空间。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_hide_dest(&args.image));
    ensure_can_write(&dest, args.force)?;
    carrier::output_format(&dest)?;

    let mut carrier = Carrier::open(&args.image)?;

    let message = match (args.message, &args.text) {
        (Some(message), _) => message.into_bytes(),
        (None, Some(text)) => fs::read(text).with_context(|| {
            format!(
                "Unable to read text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either a text file or a message must be given."),
    };

    info!(
        image = %args.image.display(),
        message_len = message.len(),
        "hiding message"
    );

    let consumed = match codec::encode(carrier.pixels_mut(), &message) {
        Ok(consumed) => consumed,
        Err(StegoError::EmptyMessage) => {
            anyhow::bail!("The text to hide is empty. \nNothing was written.")
        }
        Err(StegoError::CapacityExceeded {
            required,
            available,
        }) => anyhow::bail!(
            "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        Err(err @ StegoError::UnexpectedEndOfData { .. }) => return Err(err.into()),
    };

    carrier.save(&dest)?;

    println!(
        "The text has been successfully hidden ({} of {} pixel bytes used) and saved: {}",
        consumed.to_string().green(),
        carrier.pixels().len().to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数提取消息，
/// 最后将恢复的文本内容写入目标文本文件或打印到标准输出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中找不到结束标记。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = (!args.stdout).then(|| {
        args.text
            .clone()
            .unwrap_or_else(|| default_recover_dest(&args.image))
    });
    if let Some(dest) = &dest {
        ensure_can_write(dest, args.force)?;
    }

    let carrier = Carrier::open(&args.image)?;

    let mode = if args.first_match {
        ScanMode::FirstMatch
    } else {
        ScanMode::LastMatch
    };
    info!(image = %args.image.display(), ?mode, "recovering message");

    let text = codec::decode_with(carrier.pixels(), mode).with_context(|| {
        format!(
            "Failed to recover the hidden message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let Some(dest) = dest else {
        println!("{}", String::from_utf8_lossy(&text));
        return Ok(());
    };

    fs::write(&dest, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：报告图像尺寸以及最多可隐藏的字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = Carrier::open(&args.image)?;
    let bits = carrier.pixels().len();

    println!(
        "{}: {}x{}, {} channel(s), {} bits available, up to {} bytes of text",
        args.image.to_string_lossy().bold(),
        carrier.width(),
        carrier.height(),
        carrier.channels(),
        bits.to_string().green(),
        carrier.capacity().to_string().green().bold()
    );
    Ok(())
}
