//! 分割结果.
//!
//! 一个分割结果由若干 [`Segment`] 组成, 每个 segment 对应标签体数据中的一个非零标签值.

use std::path::Path;

use itertools::Itertools;
use ndarray::{ArrayBase, Data, Dimension};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

use crate::consts::{BACKGROUND_LABEL, UNKNOWN_COLOR};
use crate::{annotate, Annotator, LabeledRegion, LookupTable, Rgb};

/// 分割结果中的一个解剖区域.
///
/// 标注前, 名称为标签值本身的十进制文本, 颜色为默认中灰色.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    label_value: i32,
    name: String,
    color: Rgb,
    voxel_count: usize,
}

impl Segment {
    /// 创建标签值为 `label_value`, 包含 `voxel_count` 个体素的区域.
    pub fn new(label_value: i32, voxel_count: usize) -> Self {
        Self {
            label_value,
            name: label_value.to_string(),
            color: UNKNOWN_COLOR,
            voxel_count,
        }
    }

    /// 标签值.
    #[inline]
    pub fn label_value(&self) -> i32 {
        self.label_value
    }

    /// 显示名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 归一化颜色.
    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// 该区域的体素个数.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }
}

impl LabeledRegion for Segment {
    #[inline]
    fn label_value(&self) -> i32 {
        self.label_value
    }

    fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    #[inline]
    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }
}

/// 分割结果. 区域按标签值升序排列.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segmentation {
    name: String,
    segments: Vec<Segment>,
}

impl Segmentation {
    /// 从标签体数据构建分割结果. 每个非零标签值成为一个区域, 背景 (0) 被忽略.
    pub fn from_labels<S, D>(name: impl Into<String>, labels: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = i32>,
        D: Dimension,
    {
        let segments = labels
            .iter()
            .copied()
            .filter(|&v| v != BACKGROUND_LABEL)
            .counts()
            .into_iter()
            .sorted_unstable_by_key(|&(label, _)| label)
            .map(|(label, count)| Segment::new(label, count))
            .collect();
        Self {
            name: name.into(),
            segments,
        }
    }

    /// 直接由区域列表创建分割结果. 区域会被按标签值排序.
    pub fn from_segments(name: impl Into<String>, mut segments: Vec<Segment>) -> Self {
        segments.sort_by_key(|s| s.label_value);
        Self {
            name: name.into(),
            segments,
        }
    }

    /// 打开 nii 文件格式 (`.nii` 或 `.nii.gz`) 的标签体数据.
    /// 分割结果以去掉扩展名后的文件名命名.
    ///
    /// 如果打开成功, 则返回 `Ok(Self)`, 否则返回 `Err`. 体素值会被转换为 `i32`.
    pub fn open<P: AsRef<Path>>(path: P) -> nifti::Result<Self> {
        let path = path.as_ref();
        let obj = ReaderOptions::new().read_file(path)?;
        let labels = obj.into_volume().into_ndarray::<i32>()?;
        let seg = Self::from_labels(volume_name(path), &labels);
        log::debug!("{path:?} 中共有 {} 个区域", seg.len());
        Ok(seg)
    }

    /// 分割结果名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 区域个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// 是否不含任何区域?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 所有区域, 按标签值升序排列.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 所有区域的可变切片. 标签值只读, 因此排序不会被破坏.
    #[inline]
    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// 获取标签值为 `label` 的区域.
    pub fn segment_by_label(&self, label: i32) -> Option<&Segment> {
        self.segments
            .binary_search_by_key(&label, |s| s.label_value)
            .ok()
            .map(|i| &self.segments[i])
    }

    /// 使用 `table` 和默认标注为每个区域设置名称和颜色.
    #[inline]
    pub fn annotate(&mut self, table: &LookupTable) {
        annotate(self.segments.iter_mut(), table);
    }

    /// 使用给定的标注器为每个区域设置名称和颜色.
    #[inline]
    pub fn annotate_with(&mut self, annotator: &Annotator) {
        annotator.annotate(self.segments.iter_mut());
    }
}

/// `aseg.nii.gz` -> `aseg`, `wmparc.nii` -> `wmparc`.
fn volume_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = file_name.strip_suffix(".gz").unwrap_or(&file_name);
    Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
