//! 通用常量.

use crate::Rgb;

/// 颜色查找表文本格式.
pub mod lut {
    /// FreeSurfer 发行版自带的标准查找表文件名.
    pub const STANDARD_LUT_FILENAME: &str = "FreeSurferColorLUT.txt";

    /// 注释行的首字符.
    pub const COMMENT_PREFIX: char = '#';

    /// 列分隔符. 只有空格算分隔符, 制表符不算.
    pub const DELIMITER: char = ' ';

    /// 数据行的列数: 标签, 名称, R, G, B, 保留列.
    pub const COLUMN_COUNT: usize = 6;

    /// 整数颜色通道的最大值.
    pub const CHANNEL_MAX: i32 = 255;
}

/// 背景标签值. 背景不会成为分割区域.
pub const BACKGROUND_LABEL: i32 = 0;

/// 查找表中不存在的标签所使用的默认名称.
pub const UNKNOWN_NAME: &str = "Unknown";

/// 查找表中不存在的标签所使用的默认颜色 (中灰色).
pub const UNKNOWN_COLOR: Rgb = [0.5, 0.5, 0.5];
