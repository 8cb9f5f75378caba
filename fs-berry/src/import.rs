//! 分割结果导入.
//!
//! 宿主程序在启动时显式地构建 [`FormatRegistry`] 并注册所需的 [`StorageFormat`],
//! 再交给 [`SegmentationImporter`] 使用. 本 crate 不做任何全局的隐式注册.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{LookupTable, Segmentation};

/// 导入分割结果错误.
#[derive(Error, Debug)]
pub enum ImportError {
    /// 没有已注册的格式能读取该文件.
    #[error("不支持的分割文件格式: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// 读取 nii 文件错误.
    #[error("读取 nii 文件失败: {0}")]
    Nifti(#[from] nifti::error::NiftiError),
}

/// 分割结果存储格式.
pub trait StorageFormat: Send + Sync {
    /// 格式的唯一标识.
    fn id(&self) -> &'static str;

    /// 人类可读的格式描述.
    fn description(&self) -> &'static str;

    /// 该格式可读取的文件名后缀, 如 `.nii.gz`.
    fn extensions(&self) -> &[&'static str];

    /// 该格式能否读取 `path`? 默认按文件名后缀 (不区分大小写) 判断.
    fn supports(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_ascii_lowercase();
        self.extensions().iter().any(|ext| name.ends_with(*ext))
    }

    /// 读取 `path` 处的分割结果. 返回的区域尚未标注.
    fn load_segmentation(&self, path: &Path) -> Result<Segmentation, ImportError>;
}

/// 以 nii 标签体数据存储的分割结果, 如 `aseg.nii.gz`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NiftiSegmentationFormat;

impl StorageFormat for NiftiSegmentationFormat {
    fn id(&self) -> &'static str {
        "nifti-segmentation"
    }

    fn description(&self) -> &'static str {
        "FreeSurfer segmentation (NIfTI label volume)"
    }

    fn extensions(&self) -> &[&'static str] {
        &[".nii", ".nii.gz"]
    }

    fn load_segmentation(&self, path: &Path) -> Result<Segmentation, ImportError> {
        Ok(Segmentation::open(path)?)
    }
}

/// 已注册的存储格式. 按注册顺序匹配.
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Box<dyn StorageFormat>>,
}

impl FormatRegistry {
    /// 创建空注册表.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建注册了全部内置格式的注册表.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NiftiSegmentationFormat));
        registry
    }

    /// 注册格式. 若已有相同 `id` 的格式, 则原位替换.
    pub fn register(&mut self, format: Box<dyn StorageFormat>) {
        match self.formats.iter_mut().find(|f| f.id() == format.id()) {
            Some(slot) => *slot = format,
            None => self.formats.push(format),
        }
    }

    /// 通过 `id` 获取格式.
    pub fn get(&self, id: &str) -> Option<&dyn StorageFormat> {
        self.formats
            .iter()
            .find(|f| f.id() == id)
            .map(|f| f.as_ref())
    }

    /// 获取第一个能读取 `path` 的格式.
    pub fn by_path(&self, path: &Path) -> Option<&dyn StorageFormat> {
        self.formats
            .iter()
            .find(|f| f.supports(path))
            .map(|f| f.as_ref())
    }

    /// 按注册顺序排列的全部格式 `id`.
    pub fn ids(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.id()).collect()
    }

    /// 已注册的格式个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// 是否没有注册任何格式?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// 分割结果导入器: 读取分割结果, 并在返回前使用查找表完成标注.
pub struct SegmentationImporter {
    registry: FormatRegistry,
    table: LookupTable,
}

impl SegmentationImporter {
    /// 使用给定的注册表和查找表创建导入器.
    #[inline]
    pub fn new(registry: FormatRegistry, table: LookupTable) -> Self {
        Self { registry, table }
    }

    /// 使用内置格式和标准查找表 (见 [`LookupTable::standard`]) 创建导入器.
    pub fn with_standard_table() -> Self {
        Self::new(FormatRegistry::with_builtin(), LookupTable::standard().clone())
    }

    /// 所使用的查找表.
    #[inline]
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// 格式注册表.
    #[inline]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// 格式注册表, 可用于注册额外的格式.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut FormatRegistry {
        &mut self.registry
    }

    /// 读取 `dir` 目录下名为 `name` 的分割结果文件并完成标注.
    #[inline]
    pub fn load_segmentation<P: AsRef<Path>>(
        &self,
        dir: P,
        name: &str,
    ) -> Result<Segmentation, ImportError> {
        self.load_segmentation_file(dir.as_ref().join(name))
    }

    /// 读取 `path` 处的分割结果文件并完成标注.
    pub fn load_segmentation_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Segmentation, ImportError> {
        let path = path.as_ref();
        let format = self
            .registry
            .by_path(path)
            .ok_or_else(|| ImportError::UnsupportedFormat(path.to_owned()))?;
        log::info!("以 {} 格式读取 {path:?}", format.id());

        let mut seg = format.load_segmentation(path)?;
        seg.annotate(&self.table);
        Ok(seg)
    }
}
