//! FreeSurfer 颜色查找表.
//!
//! 查找表是一个纯文本文件, 每个数据行形如
//!
//! ```text
//! <标签> <不含空格的名称> <R 0-255> <G 0-255> <B 0-255> <保留列>
//! ```
//!
//! 以 `#` 开头的行是注释, 空行被忽略, 列数不为 6 的行被静默丢弃.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::consts::lut::CHANNEL_MAX;
use crate::resource;
use crate::Rgb;

mod parse;

pub use parse::{lenient_int, normalize_line, parse_line, RowError};

/// 打开查找表错误.
#[derive(Error, Debug)]
pub enum LutError {
    /// 文件不存在或读取失败.
    #[error("无法读取颜色查找表 {path:?}: {source}")]
    Io {
        /// 查找表路径.
        path: PathBuf,

        /// 底层 I/O 错误.
        #[source]
        source: io::Error,
    },
}

/// 查找表的一行: 标签值, 显示名称和归一化颜色.
///
/// 该结构是只读的, 只能通过解析或 [`LookupEntry::new`] 创建.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupEntry {
    label: i32,
    name: String,
    color: Rgb,
}

impl LookupEntry {
    /// 由整数颜色通道构建条目. 通道值先被限制到 `[0, 255]`, 再除以 255.
    pub fn new(label: i32, name: impl Into<String>, channels: [i32; 3]) -> Self {
        let color = channels.map(|c| c.clamp(0, CHANNEL_MAX) as f64 / CHANNEL_MAX as f64);
        Self {
            label,
            name: name.into(),
            color,
        }
    }

    /// 标签值.
    #[inline]
    pub fn label(&self) -> i32 {
        self.label
    }

    /// 显示名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 归一化 RGB 颜色.
    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// 标签值到 [`LookupEntry`] 的映射.
///
/// 同一次解析中标签重复时, 后出现的行覆盖先出现的行. 条目的迭代顺序没有意义.
/// 构建完成后该结构只读, 可以在线程间共享.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupTable {
    entries: HashMap<i32, LookupEntry>,
}

impl LookupTable {
    /// 从逐行文本构建查找表. 空行, 注释行和格式错误的行都会被跳过.
    pub fn from_lines<S: AsRef<str>, I: IntoIterator<Item = S>>(lines: I) -> Self {
        let mut entries = HashMap::new();
        for (no, line) in lines.into_iter().enumerate() {
            match parse_line(line.as_ref()) {
                Ok(Some(entry)) => {
                    entries.insert(entry.label(), entry);
                }
                Ok(None) => {}
                Err(e) => log::trace!("跳过第 {} 行: {e}", no + 1),
            }
        }
        Self { entries }
    }

    /// 从一整段文本构建查找表.
    #[inline]
    pub fn parse_str(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// 从 `reader` 读取全部内容并构建查找表. 读取中途出错则返回 `Err`.
    ///
    /// 非 UTF-8 字节按 [`String::from_utf8_lossy`] 替换, 不会使整个文件失效.
    pub fn try_from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let lines = reader
            .split(b'\n')
            .map_ok(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .collect::<io::Result<Vec<String>>>()?;
        Ok(Self::from_lines(lines))
    }

    /// 打开 `path` 处的查找表文件. 文件不可读时返回 `Err`.
    pub fn try_open<P: AsRef<Path>>(path: P) -> Result<Self, LutError> {
        let path = path.as_ref();
        let wrap = |source| LutError::Io {
            path: path.to_owned(),
            source,
        };
        let file = File::open(path).map_err(wrap)?;
        Self::try_from_reader(BufReader::new(file)).map_err(wrap)
    }

    /// 打开 `path` 处的查找表文件.
    ///
    /// 文件不可读时不会报错, 而是返回空表 (此后所有区域都会使用默认标注).
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_open(path) {
            Ok(table) => {
                log::debug!("颜色查找表共 {} 项", table.len());
                table
            }
            Err(e) => {
                log::warn!("{e}, 使用空查找表");
                Self::default()
            }
        }
    }

    /// 进程内共享的标准查找表.
    ///
    /// 首次调用时按 [`resource::lut_path_from_env_or_home`] 定位并解析文件,
    /// 之后直接返回缓存. 找不到或读不了文件时为空表.
    pub fn standard() -> &'static LookupTable {
        static STANDARD: OnceCell<LookupTable> = OnceCell::new();
        STANDARD.get_or_init(|| match resource::lut_path_from_env_or_home() {
            Some(path) => Self::open(path),
            None => {
                log::warn!("无法定位标准颜色查找表, 使用空查找表");
                Self::default()
            }
        })
    }

    /// 获取标签 `label` 对应的条目.
    #[inline]
    pub fn get(&self, label: i32) -> Option<&LookupEntry> {
        self.entries.get(&label)
    }

    /// 查找表是否包含标签 `label`?
    #[inline]
    pub fn contains(&self, label: i32) -> bool {
        self.entries.contains_key(&label)
    }

    /// 条目个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 查找表是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 以任意顺序迭代所有条目.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &LookupEntry> {
        self.entries.values()
    }

    /// 升序排列的全部标签值.
    pub fn labels(&self) -> Vec<i32> {
        self.entries.keys().copied().sorted_unstable().collect()
    }

    /// 按名称查找条目. 多个条目同名时返回标签值最小的那个.
    pub fn find_by_name(&self, name: &str) -> Option<&LookupEntry> {
        self.entries
            .values()
            .filter(|e| e.name == name)
            .min_by_key(|e| e.label)
    }
}

impl FromIterator<LookupEntry> for LookupTable {
    /// 标签重复时, 后出现的条目覆盖先出现的.
    fn from_iter<T: IntoIterator<Item = LookupEntry>>(iter: T) -> Self {
        let entries = iter.into_iter().map(|e| (e.label, e)).collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::{LookupEntry, LookupTable};
    use std::io::Cursor;

    const SAMPLE: &str = "\
#$Id: FreeSurferColorLUT.txt $

#No. Label Name:                            R   G   B   A

0   Unknown                                 0   0   0   0
2   Left-Cerebral-White-Matter              245 245 245 0
17  Left-Hippocampus                        220 216 20  0
18  Left-Amygdala                           103 255 255 0
";

    #[test]
    fn test_from_str_sample() {
        let t = LookupTable::parse_str(SAMPLE);
        assert_eq!(t.len(), 4);
        assert_eq!(t.labels(), vec![0, 2, 17, 18]);
        assert_eq!(t.get(17).unwrap().name(), "Left-Hippocampus");
        assert_eq!(t.get(0).unwrap().color(), [0.0; 3]);
        assert!(!t.contains(3));
    }

    #[test]
    fn test_comments_and_blanks_only() {
        let t = LookupTable::from_lines(["# a", "", "   ", "#No. Label Name: R G B A"]);
        assert!(t.is_empty());
    }

    #[test]
    fn test_malformed_rows_do_not_stop_parsing() {
        let t = LookupTable::from_lines([
            "1 Five-Columns 1 2 3",
            "2 Seven-Columns 1 2 3 0 0",
            "3 Valid 10 20 30 0",
        ]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(3).unwrap().name(), "Valid");
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let t = LookupTable::from_lines(["7 First 1 1 1 0", "7 Second 2 2 2 0"]);
        assert_eq!(t.len(), 1);
        let e = t.get(7).unwrap();
        assert_eq!(e.name(), "Second");
        assert_eq!(e.color(), [2.0 / 255.0; 3]);
    }

    #[test]
    fn test_channels_clamped() {
        let e = LookupEntry::new(1, "Bright", [300, -5, 255]);
        assert_eq!(e.color(), [1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_file_gives_empty_table() {
        let path = std::env::temp_dir().join("fs-berry-no-such-dir/FreeSurferColorLUT.txt");
        assert!(LookupTable::try_open(&path).is_err());
        assert!(LookupTable::open(&path).is_empty());
    }

    #[test]
    fn test_try_from_reader_crlf() {
        let t = LookupTable::try_from_reader(Cursor::new("4 Left-Lateral-Ventricle 120 18 134 0\r\n"))
            .unwrap();
        assert_eq!(t.get(4).unwrap().name(), "Left-Lateral-Ventricle");
    }

    /// Latin-1 编码的注释行不影响其后的数据行.
    #[test]
    fn test_try_from_reader_non_utf8() {
        let bytes = b"# Autor: Ren\xe9\n17 Left-Hippocampus 220 216 20 0\n53 Right-Hippocampus 220 216 20 0\n";
        let t = LookupTable::try_from_reader(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(53).unwrap().name(), "Right-Hippocampus");
    }

    #[test]
    fn test_open_non_utf8_file() {
        let path = std::env::temp_dir().join(format!("fs-berry-latin1-{}.txt", std::process::id()));
        std::fs::write(&path, b"# Ren\xe9\n17 Left-Hippocampus 220 216 20 0\n").unwrap();
        let t = LookupTable::open(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(t.len(), 1);
        assert!(t.contains(17));
    }

    /// 行首制表符的行不能覆盖标签 0.
    #[test]
    fn test_leading_tab_keeps_label() {
        let t = LookupTable::from_lines(["0 Unknown 0 0 0 0", "\t17 Left-Hippocampus 220 216 20 0"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(0).unwrap().name(), "Unknown");
        assert_eq!(t.get(17).unwrap().name(), "Left-Hippocampus");
    }

    #[test]
    fn test_find_by_name() {
        let t = LookupTable::from_lines(["9 Same 0 0 0 0", "5 Same 0 0 0 0", "6 Other 0 0 0 0"]);
        assert_eq!(t.find_by_name("Same").unwrap().label(), 5);
        assert!(t.find_by_name("Missing").is_none());
    }

    #[test]
    fn test_from_iter_last_wins() {
        let t: LookupTable = [
            LookupEntry::new(1, "A", [0, 0, 0]),
            LookupEntry::new(1, "B", [0, 0, 0]),
        ]
        .into_iter()
        .collect();
        assert_eq!(t.get(1).unwrap().name(), "B");
    }
}
