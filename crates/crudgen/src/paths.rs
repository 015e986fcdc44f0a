use crudgen_core::{ErrorCode, GeneratorError, Result};
use std::path::{Component, Path, PathBuf};

/// Joins a rendered relative path onto the output root, rejecting anything
/// that could land outside it. Only plain path components are allowed; no
/// `..`, no absolute paths, no prefixes.
pub(crate) fn resolve(root: &Path, relative: &str) -> Result<PathBuf> {
    let path = Path::new(relative);

    let plain = !relative.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if !plain {
        return Err(GeneratorError::with_message(
            ErrorCode::PathOutsideRoot,
            format!("target path `{relative}` escapes the output root"),
        ));
    }

    Ok(root.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_relative_paths_resolve_under_the_root() {
        let resolved = resolve(Path::new("/out"), "controllers/role_controller.rs").unwrap();
        assert_eq!(resolved, PathBuf::from("/out/controllers/role_controller.rs"));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        for bad in ["../evil.rs", "a/../../evil.rs", "/etc/passwd", "./x.rs", ""] {
            let err = resolve(Path::new("/out"), bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::PathOutsideRoot, "{bad:?}");
        }
    }
}
