//! 文本分割器
//!
//! 按空白边界将长文本切分为不超过最大长度的片段，供逐段语音合成。
//! 长度按字符（char）计算，不会切断多字节字符。

use thiserror::Error;

/// 默认单段最大字符数（语音合成接口的输入上限）
pub const DEFAULT_MAX_CHARS: usize = 1024;

/// 分割错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("最大长度必须大于 0")]
    InvalidMaxLength,

    #[error("待分割文本为空")]
    EmptyText,
}

/// 文本片段（序号从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub index: usize,
    pub content: String,
}

impl TextSegment {
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// 在窗口内寻找切分点
///
/// `window` 恰好包含 `max_chars + 1` 个字符，返回 `[1, max_chars]` 内最大的 c，
/// 使得第 c 或第 c-1 个字符为空白；找不到时硬切在 `max_chars`。
fn split_point(window: &[(usize, char)], max_chars: usize) -> usize {
    (1..=max_chars)
        .rev()
        .find(|&c| window[c].1.is_whitespace() || window[c - 1].1.is_whitespace())
        .unwrap_or(max_chars)
}

/// 对文本进行分段
///
/// 保证：
/// 1. 片段非空、有序，按顺序拼接后与原文完全一致
/// 2. 任何片段都不超过 `max_chars` 个字符；单个"词"超长时在 `max_chars` 处硬切
/// 3. 切分点处的空白跟随前一片段，除非第 `max_chars` 个字符本身是空白
pub fn segment_text(text: &str, max_chars: usize) -> Result<Vec<TextSegment>, SegmentationError> {
    if max_chars == 0 {
        return Err(SegmentationError::InvalidMaxLength);
    }

    let mut segments: Vec<TextSegment> = Vec::new();
    let mut rest = text;

    loop {
        let window: Vec<(usize, char)> = rest.char_indices().take(max_chars + 1).collect();
        if window.len() <= max_chars {
            break;
        }

        let cut = window[split_point(&window, max_chars)].0;
        segments.push(TextSegment {
            index: segments.len() + 1,
            content: rest[..cut].to_string(),
        });
        rest = &rest[cut..];
    }

    if !rest.is_empty() {
        segments.push(TextSegment {
            index: segments.len() + 1,
            content: rest.to_string(),
        });
    }

    Ok(segments)
}
