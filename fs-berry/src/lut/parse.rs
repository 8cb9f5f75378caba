//! 逐行解析.

use itertools::Itertools;
use thiserror::Error;

use super::LookupEntry;
use crate::consts::lut::{COLUMN_COUNT, COMMENT_PREFIX, DELIMITER};

/// 单行格式错误. 构建查找表时这类行会被直接丢弃.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    /// 列数不是 6. 参数为实际列数.
    #[error("数据行应有 6 列, 实际为 {0} 列")]
    ColumnCount(usize),
}

/// 规范化一行文本: 去掉行首行尾的全部空白 (含 `\t`, `\r`),
/// 并将行内连续的空格合并为一个.
///
/// 行内的制表符保持原样, 它不是分隔符.
pub fn normalize_line(line: &str) -> String {
    line.trim()
        .split(DELIMITER)
        .filter(|token| !token.is_empty())
        .join(" ")
}

/// 宽松的整数转换. 首尾空白会被忽略, 无法解析为 `i32` 的文本一律得到 0.
///
/// 该函数不做范围限制; 颜色通道由 [`LookupEntry::new`] 限制到 `[0, 255]`.
///
/// ```
/// use fs_berry::lut::lenient_int;
///
/// assert_eq!(lenient_int("220"), 220);
/// assert_eq!(lenient_int("-3"), -3);
/// assert_eq!(lenient_int("20\t"), 20);
/// assert_eq!(lenient_int("Left"), 0);
/// assert_eq!(lenient_int(""), 0);
/// ```
#[inline]
pub fn lenient_int(token: &str) -> i32 {
    token.trim().parse().unwrap_or(0)
}

/// 解析查找表的一行.
///
/// 1. 空行和注释行返回 `Ok(None)`;
/// 2. 列数不为 6 的行返回 `Err(RowError::ColumnCount(_))`;
/// 3. 其余行返回 `Ok(Some(entry))`. 第 6 列 (保留列) 不参与解析.
///
/// 数值列按 [`lenient_int`] 转换, 颜色通道随后被限制到 `[0, 255]` 再除以 255,
/// 因此 `300` 得到 1.0, `-5` 得到 0.0.
pub fn parse_line(line: &str) -> Result<Option<LookupEntry>, RowError> {
    let line = normalize_line(line);
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split(DELIMITER).collect();
    let &[label, name, r, g, b, _reserved] = tokens.as_slice() else {
        return Err(RowError::ColumnCount(tokens.len()));
    };
    debug_assert_eq!(tokens.len(), COLUMN_COUNT);

    Ok(Some(LookupEntry::new(
        lenient_int(label),
        name,
        [lenient_int(r), lenient_int(g), lenient_int(b)],
    )))
}
