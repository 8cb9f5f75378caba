#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 解析 FreeSurfer 颜色查找表 (`FreeSurferColorLUT.txt`),
//! 并据此为分割结果中的每个解剖区域标注名称和颜色.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 查找表解析是 "尽力而为" 的: 文件不可读时得到空表, 格式不符的行被直接丢弃,
//!   两者都不会向调用方报错.
//! 2. 标注同样不会失败. 查找表中没有的标签统一使用默认名称 `"Unknown"`
//!   和中灰色 `(0.5, 0.5, 0.5)`.
//! 3. 体数据本身的二进制格式交由 `nifti` crate 处理, 本 crate 不做解析.
//!
//! # 开发计划
//!
//! ### 颜色查找表解析 ✅
//!
//! 每个数据行形如 `17 Left-Hippocampus 220 216 20 0`, 共 6 列.
//! 行首行尾空格会被去除, 行内连续空格会被合并为一个.
//! 非数字字段按 0 处理 (见 [`lut::lenient_int`]).
//!
//! 实现位于 `fs-berry/src/lut`.
//!
//! ### 区域标注 ✅
//!
//! 任何实现了 [`LabeledRegion`] 的类型都可以被标注. 标注是幂等的.
//!
//! 实现位于 `fs-berry/src/annotate.rs`.
//!
//! ### 从 nii 标签体数据构造分割结果 ✅
//!
//! 每个非零标签值对应一个 [`Segment`], 并按标签值升序排列.
//!
//! 实现位于 `fs-berry/src/segmentation.rs`.
//!
//! ### 显式的格式注册与导入入口 ✅
//!
//! 宿主程序在启动时显式地把 [`StorageFormat`] 注册到 [`FormatRegistry`],
//! 而不是依赖全局的隐式注册.
//!
//! 实现位于 `fs-berry/src/import.rs`.
//!
//! ### 表面模型 / 标量叠加层导入 ❌
//!
//! 不在本 crate 的范围内.

/// 归一化 RGB 颜色, 各通道取值范围为 `[0.0, 1.0]`.
pub type Rgb = [f64; 3];

pub mod consts;

pub mod lut;

pub use lut::{LookupEntry, LookupTable, LutError, RowError};

mod annotate;

pub use annotate::{annotate, Annotator, Fallback, LabeledRegion};

pub mod segmentation;

pub use segmentation::{Segment, Segmentation};

pub mod import;

pub use import::{
    FormatRegistry, ImportError, NiftiSegmentationFormat, SegmentationImporter, StorageFormat,
};

pub mod resource;
pub mod prelude;
