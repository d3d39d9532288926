//! @ai:module:intent Enumerate and read the Coq files a registry is built from
//! @ai:module:layer infrastructure
//! @ai:module:public_api SourceFile, enumerate_sources, read_sources
//! @ai:module:depends_on config, error
//! @ai:module:stateless true

use crate::config::ExtractConfig;
use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent One source file held in memory for the build pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    /// @ai:intent Build an in-memory source without touching the filesystem
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// @ai:intent List every source file named by the config, in a stable order
/// @ai:post directories are walked recursively and sorted by file name
/// @ai:post files under an excluded prefix are left out
/// @ai:effects fs:read
pub fn enumerate_sources(config: &ExtractConfig) -> Result<Vec<PathBuf>> {
    let excluded: Vec<String> = config
        .exclude
        .iter()
        .map(|p| absolute(p).map(|a| a.to_string_lossy().into_owned()))
        .collect::<Result<_>>()?;

    let mut files = Vec::new();

    for source in &config.sources {
        if source.is_dir() {
            for entry in WalkDir::new(source).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::from)?;
                if entry.file_type().is_file() && has_extension(entry.path(), &config.extensions) {
                    push_unless_excluded(&mut files, entry.path(), &excluded)?;
                }
            }
        } else {
            push_unless_excluded(&mut files, source, &excluded)?;
        }
    }

    Ok(files)
}

/// @ai:intent Read every enumerated file; the first failure aborts the whole read
/// @ai:effects fs:read
pub fn read_sources(config: &ExtractConfig) -> Result<Vec<SourceFile>> {
    enumerate_sources(config)?
        .into_iter()
        .map(|path| read_source(&path))
        .collect()
}

/// @ai:intent Read one file into memory
/// @ai:effects fs:read
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("Read {} ({} bytes)", path.display(), text.len());
    Ok(SourceFile {
        path: path.to_path_buf(),
        text,
    })
}

fn push_unless_excluded(files: &mut Vec<PathBuf>, path: &Path, excluded: &[String]) -> Result<()> {
    let path = absolute(path)?;
    let as_str = path.to_string_lossy();
    if excluded.iter().any(|prefix| as_str.starts_with(prefix.as_str())) {
        tracing::debug!("Excluding {}", path.display());
        return Ok(());
    }
    files.push(path);
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e == ext))
        .unwrap_or(false)
}

/// Lexical absolute form: `.` components dropped, `..` collapsed, no symlink resolution.
fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "(* *)").unwrap();
    }

    #[test]
    fn test_directory_walk_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.v"));
        touch(&dir.path().join("a.v"));
        touch(&dir.path().join("sub/c.v"));
        touch(&dir.path().join("notes.txt"));

        let config = ExtractConfig {
            sources: vec![dir.path().to_path_buf()],
            ..Default::default()
        };
        let names: Vec<_> = enumerate_sources(&config)
            .unwrap()
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.v"),
                PathBuf::from("b.v"),
                PathBuf::from("sub/c.v")
            ]
        );
    }

    #[test]
    fn test_exclusion_is_prefix_match() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("keep/a.v"));
        touch(&dir.path().join("old/b.v"));
        touch(&dir.path().join("older/c.v"));

        let config = ExtractConfig {
            sources: vec![dir.path().to_path_buf()],
            exclude: vec![dir.path().join("old")],
            ..Default::default()
        };
        let files = enumerate_sources(&config).unwrap();

        assert_eq!(files, vec![dir.path().join("keep/a.v")]);
    }

    #[test]
    fn test_exclusion_with_dot_components() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("keep/a.v"));
        touch(&dir.path().join("old/b.v"));
        touch(&dir.path().join("legacy/c.v"));

        let config = ExtractConfig {
            sources: vec![dir.path().join("./keep/..")],
            exclude: vec![dir.path().join("./old"), dir.path().join("keep/../legacy")],
            ..Default::default()
        };
        let files = enumerate_sources(&config).unwrap();

        assert_eq!(files, vec![dir.path().join("keep/a.v")]);
    }

    #[test]
    fn test_relative_path_is_normalized() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute(Path::new("./theories/old")).unwrap(), cwd.join("theories/old"));
        assert_eq!(
            absolute(Path::new("theories/sub/../old")).unwrap(),
            cwd.join("theories/old")
        );
    }

    #[test]
    fn test_named_file_bypasses_extension_filter() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("spec.txt");
        touch(&file);

        let config = ExtractConfig {
            sources: vec![file.clone()],
            ..Default::default()
        };
        assert_eq!(enumerate_sources(&config).unwrap(), vec![file]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let config = ExtractConfig {
            sources: vec![dir.path().join("missing.v")],
            ..Default::default()
        };
        assert!(matches!(read_sources(&config), Err(Error::FileRead { .. })));
    }
}
