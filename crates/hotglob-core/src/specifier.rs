//! Specifier building: matched file path → import specifier.

use crate::error::TransformError;
use crate::paths::relative;

/// Build the import specifier for one matched file.
///
/// With a real importer directory, the specifier is dot-relative to it
/// when the original globs were relative-style, and root-absolute
/// otherwise. Without one (virtual module), only root style is legal —
/// relative style was already rejected at glob resolution, and the guard
/// here keeps the invariant locally checkable.
pub fn build_specifier(
    file: &str,
    importer_dir: Option<&str>,
    root: &str,
    is_relative_style: bool,
    pos: usize,
) -> Result<String, TransformError> {
    let Some(dir) = importer_dir else {
        if is_relative_style {
            return Err(TransformError::VirtualModuleRelativeGlob { pos });
        }
        return Ok(format!("/{}", relative(root, file)));
    };

    let mut import_path = relative(dir, file);
    if !import_path.starts_with('.') {
        import_path = format!("./{}", import_path);
    }

    if is_relative_style {
        return Ok(import_path);
    }

    let mut file_path = relative(root, file);
    if !file_path.starts_with('.') {
        // a file outside the project root keeps its climbing path
        file_path = format!("/{}", file_path);
    }
    Ok(file_path)
}
