//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Rgb;

pub use crate::lut::{lenient_int, LookupEntry, LookupTable};

pub use crate::annotate::{annotate, Annotator, Fallback, LabeledRegion};

pub use crate::segmentation::{Segment, Segmentation};

pub use crate::import::{FormatRegistry, SegmentationImporter, StorageFormat};

pub use crate::consts::{BACKGROUND_LABEL, UNKNOWN_COLOR, UNKNOWN_NAME};

pub use crate::resource::lut_path_from_env_or_home;
