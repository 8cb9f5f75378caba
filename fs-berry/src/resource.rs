//! 定位标准颜色查找表文件.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::consts::lut::STANDARD_LUT_FILENAME;

/// 直接指定查找表文件路径的环境变量.
pub const LUT_PATH_ENV: &str = "FS_BERRY_LUT";

/// FreeSurfer 安装目录的环境变量.
pub const FREESURFER_HOME_ENV: &str = "FREESURFER_HOME";

/// 获取 `{用户主目录}/freesurfer` 目录.
pub fn home_freesurfer_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("freesurfer");
    Some(ans)
}

/// 获取标准查找表路径.
///
/// 1. 若环境变量 `$FS_BERRY_LUT` 非空, 则返回其值;
/// 2. 否则, 若 `$FREESURFER_HOME` 非空, 返回 `$FREESURFER_HOME/FreeSurferColorLUT.txt`;
/// 3. 否则, 返回 `$HOME/freesurfer/FreeSurferColorLUT.txt`.
///
/// 只有在连用户主目录都无法确定时才返回 `None`. 该函数不检查文件是否存在.
pub fn lut_path_from_env_or_home() -> Option<PathBuf> {
    resolve_lut_path(
        env::var_os(LUT_PATH_ENV),
        env::var_os(FREESURFER_HOME_ENV),
        home_freesurfer_dir(),
    )
}

fn resolve_lut_path(
    explicit: Option<OsString>,
    fs_home: Option<OsString>,
    home_fs_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty());

    if let Some(p) = non_empty(explicit) {
        return Some(PathBuf::from(p));
    }
    let mut dir = non_empty(fs_home).map(PathBuf::from).or(home_fs_dir)?;
    dir.push(STANDARD_LUT_FILENAME);
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::resolve_lut_path;
    use std::path::PathBuf;

    #[test]
    fn test_explicit_path_first() {
        let p = resolve_lut_path(
            Some("/data/my_lut.txt".into()),
            Some("/usr/local/freesurfer".into()),
            Some(PathBuf::from("/home/u/freesurfer")),
        );
        assert_eq!(p, Some(PathBuf::from("/data/my_lut.txt")));
    }

    #[test]
    fn test_freesurfer_home() {
        let p = resolve_lut_path(
            Some("".into()),
            Some("/usr/local/freesurfer".into()),
            Some(PathBuf::from("/home/u/freesurfer")),
        );
        assert_eq!(
            p,
            Some(PathBuf::from("/usr/local/freesurfer/FreeSurferColorLUT.txt"))
        );
    }

    #[test]
    fn test_home_fallback() {
        let p = resolve_lut_path(None, None, Some(PathBuf::from("/home/u/freesurfer")));
        assert_eq!(
            p,
            Some(PathBuf::from("/home/u/freesurfer/FreeSurferColorLUT.txt"))
        );
        assert_eq!(resolve_lut_path(None, None, None), None);
    }
}
