//! 区域标注.

use crate::consts::{UNKNOWN_COLOR, UNKNOWN_NAME};
use crate::{LookupTable, Rgb};

/// 可被标注的解剖区域.
///
/// 标签值由区域的所有者设置, 标注过程只会写入名称和颜色.
pub trait LabeledRegion {
    /// 区域的标签值.
    fn label_value(&self) -> i32;

    /// 设置显示名称.
    fn set_name(&mut self, name: &str);

    /// 设置归一化颜色.
    fn set_color(&mut self, color: Rgb);
}

impl<R: LabeledRegion + ?Sized> LabeledRegion for &mut R {
    #[inline]
    fn label_value(&self) -> i32 {
        (**self).label_value()
    }

    #[inline]
    fn set_name(&mut self, name: &str) {
        (**self).set_name(name)
    }

    #[inline]
    fn set_color(&mut self, color: Rgb) {
        (**self).set_color(color)
    }
}

/// 查找表中不存在的标签所使用的默认标注.
///
/// 默认为名称 `"Unknown"`, 颜色中灰色 `(0.5, 0.5, 0.5)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Fallback {
    /// 默认名称.
    pub name: String,

    /// 默认颜色.
    pub color: Rgb,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_owned(),
            color: UNKNOWN_COLOR,
        }
    }
}

/// 区域标注器. 持有只读查找表和默认标注.
#[derive(Clone, Debug)]
pub struct Annotator<'t> {
    table: &'t LookupTable,
    fallback: Fallback,
}

impl<'t> Annotator<'t> {
    /// 使用 `table` 和默认的 [`Fallback`] 构建标注器.
    #[inline]
    pub fn new(table: &'t LookupTable) -> Self {
        Self {
            table,
            fallback: Fallback::default(),
        }
    }

    /// 替换默认标注.
    #[inline]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// 所使用的查找表.
    #[inline]
    pub fn table(&self) -> &'t LookupTable {
        self.table
    }

    /// 所使用的默认标注.
    #[inline]
    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// 标注单个区域. 若标签在查找表中则返回 `true`.
    pub fn annotate_one<R: LabeledRegion + ?Sized>(&self, region: &mut R) -> bool {
        match self.table.get(region.label_value()) {
            Some(entry) => {
                region.set_name(entry.name());
                region.set_color(entry.color());
                true
            }
            None => {
                region.set_name(&self.fallback.name);
                region.set_color(self.fallback.color);
                false
            }
        }
    }

    /// 依次标注 `regions` 中的每个区域. 该操作不会失败, 且是幂等的.
    pub fn annotate<R, I>(&self, regions: I)
    where
        R: LabeledRegion,
        I: IntoIterator<Item = R>,
    {
        let mut total = 0usize;
        let mut matched = 0usize;
        for mut region in regions {
            total += 1;
            matched += self.annotate_one(&mut region) as usize;
        }
        log::debug!("标注 {total} 个区域, 其中 {} 个未匹配", total - matched);
    }
}

/// 使用 `table` 和默认标注依次标注 `regions` 中的每个区域.
///
/// 对任意区域, 若其标签值在 `table` 中, 则名称和颜色取自对应条目;
/// 否则统一设为 `"Unknown"` 和中灰色.
#[inline]
pub fn annotate<R, I>(regions: I, table: &LookupTable)
where
    R: LabeledRegion,
    I: IntoIterator<Item = R>,
{
    Annotator::new(table).annotate(regions)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
    }
}

/// 并发操作部分
#[cfg(feature = "rayon")]
impl Annotator<'_> {
    /// 借助 `rayon`, 并行地标注 `regions` 中的每个区域.
    ///
    /// 返回查找表中命中的区域个数.
    pub fn par_annotate<R>(&self, regions: &mut [R]) -> usize
    where
        R: LabeledRegion + Send,
    {
        let matched = regions
            .par_iter_mut()
            .map(|r| self.annotate_one(r) as usize)
            .sum::<usize>();
        log::debug!(
            "并行标注 {} 个区域, 其中 {} 个未匹配",
            regions.len(),
            regions.len() - matched
        );
        matched
    }
}
