//! Loader for object-definition (`.moo`) files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use moo_ast::ObjectDefinition;

use crate::error::{MooError, Result};

/// Loads named objdef files from a root directory.
///
/// Object names resolve to `<root>/<name>.moo`. Parsed definitions are
/// cached for the lifetime of the loader.
pub struct ObjDefLoader {
    root: PathBuf,
    cache: HashMap<String, ObjectDefinition>,
}

impl ObjDefLoader {
    /// Create a loader rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .map_err(|e| MooError::LoadError {
                message: format!("Invalid objdef root: {e}"),
            })?;
        Ok(Self {
            root,
            cache: HashMap::new(),
        })
    }

    /// Load and parse the object definition named `name`.
    ///
    /// The definition's declared name must match the requested name.
    pub fn load(&mut self, name: &str) -> Result<ObjectDefinition> {
        validate_object_name(name)?;

        if let Some(def) = self.cache.get(name) {
            return Ok(def.clone());
        }

        let def = self.load_and_parse(name)?;
        self.cache.insert(name.to_string(), def.clone());
        Ok(def)
    }

    fn load_and_parse(&self, name: &str) -> Result<ObjectDefinition> {
        let path = self.resolve_path(name);
        if !path.is_file() {
            return Err(MooError::LoadError {
                message: format!("Objdef file not found: {} ({})", name, path.display()),
            });
        }
        self.ensure_within_root(&path)?;

        let source = fs::read_to_string(&path)?;
        let def = crate::parse_objdef(&source).map_err(|e| MooError::LoadError {
            message: format!("Failed to parse object '{name}': {e}"),
        })?;

        if def.name != name {
            return Err(MooError::LoadError {
                message: format!(
                    "Object file '{}' defines '{}', expected '{}'",
                    path.display(),
                    def.name,
                    name
                ),
            });
        }

        Ok(def)
    }

    fn resolve_path(&self, name: &str) -> PathBuf {
        let mut path = self.root.join(name);
        path.set_extension("moo");
        path
    }

    fn ensure_within_root(&self, path: &Path) -> Result<()> {
        let canonical = path.canonicalize().map_err(|e| MooError::LoadError {
            message: format!("Failed to resolve objdef path: {e}"),
        })?;
        if canonical.starts_with(&self.root) {
            return Ok(());
        }
        Err(MooError::LoadError {
            message: format!("Path traversal detected: {}", path.display()),
        })
    }
}

/// Object names are identifier-shaped: `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_object_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MooError::LoadError {
            message: format!("Invalid object name: '{name}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_objdef(dir: &Path, name: &str, body: &str) {
        let mut file = fs::File::create(dir.join(format!("{name}.moo"))).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_objdef(
            dir.path(),
            "rock",
            "object rock\n  name: \"a rock\"\nendobject",
        );

        let mut loader = ObjDefLoader::new(dir.path()).unwrap();
        let first = loader.load("rock").unwrap();
        assert_eq!(first.name, "rock");
        assert_eq!(first.members.len(), 1);

        // second load hits the cache even if the file disappears
        fs::remove_file(dir.path().join("rock.moo")).unwrap();
        let second = loader.load("rock").unwrap();
        assert_eq!(second.name, "rock");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ObjDefLoader::new(dir.path()).unwrap();
        let result = loader.load("ghost");
        assert!(matches!(result, Err(MooError::LoadError { .. })));
    }

    #[test]
    fn test_name_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_objdef(dir.path(), "rock", "object pebble\nendobject");

        let mut loader = ObjDefLoader::new(dir.path()).unwrap();
        let result = loader.load("rock");
        assert!(matches!(result, Err(MooError::LoadError { .. })));
    }

    #[test]
    fn test_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ObjDefLoader::new(dir.path()).unwrap();
        for bad in ["", "1rock", "../rock", "a/b", "rock.moo"] {
            assert!(
                matches!(loader.load(bad), Err(MooError::LoadError { .. })),
                "name {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_failure_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        write_objdef(dir.path(), "broken", "object broken\n  property = ;\n");

        let mut loader = ObjDefLoader::new(dir.path()).unwrap();
        let result = loader.load("broken");
        assert!(matches!(result, Err(MooError::LoadError { .. })));
    }

    #[test]
    fn test_invalid_root() {
        let result = ObjDefLoader::new("/definitely/not/a/real/dir");
        assert!(matches!(result, Err(MooError::LoadError { .. })));
    }
}
