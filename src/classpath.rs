use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use crate::classfile::{ClassFile, internal_name};
use crate::{Error, Result};

/// Anything that can hand out parsed classes by binary name.
pub trait ClassSource {
    /// Returns `Ok(None)` when the class simply is not there.
    fn find_class(&self, binary_name: &str) -> Result<Option<ClassFile>>;

    fn load_class(&self, binary_name: &str) -> Result<ClassFile> {
        self.find_class(binary_name)?
            .ok_or_else(|| Error::ClassNotFound(binary_name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassPathEntry {
    Directory(PathBuf),
    Jar(PathBuf),
}

impl ClassPathEntry {
    /// `.jar` and `.zip` files are archives; anything else is a directory root.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_archive = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"));

        if is_archive {
            ClassPathEntry::Jar(path)
        } else {
            ClassPathEntry::Directory(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClassPathEntry::Directory(path) | ClassPathEntry::Jar(path) => path,
        }
    }

    fn read(&self, entry_name: &str) -> Result<Option<Vec<u8>>> {
        match self {
            ClassPathEntry::Directory(root) => {
                let path = root.join(entry_name);
                match fs::read(&path) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
            ClassPathEntry::Jar(jar) => {
                if !jar.exists() {
                    return Ok(None);
                }
                let mut archive = zip::ZipArchive::new(File::open(jar)?)?;
                let mut entry = match archive.by_name(entry_name) {
                    Ok(entry) => entry,
                    Err(zip::result::ZipError::FileNotFound) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };
                let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
                entry.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
        }
    }

    fn class_names(&self, names: &mut Vec<String>) -> Result<()> {
        match self {
            ClassPathEntry::Directory(root) => {
                if root.is_dir() {
                    collect_dir(root, root, names)?;
                }
            }
            ClassPathEntry::Jar(jar) => {
                if !jar.exists() {
                    return Ok(());
                }
                let archive = zip::ZipArchive::new(File::open(jar)?)?;
                for name in archive.file_names() {
                    if let Some(class_name) = entry_to_class_name(name) {
                        names.push(class_name);
                    }
                }
            }
        }
        Ok(())
    }
}

fn collect_dir(base: &Path, dir: &Path, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_dir(base, &path, names)?;
            continue;
        }
        let relative = path.strip_prefix(base).unwrap_or(&path);
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if let Some(class_name) = entry_to_class_name(&relative) {
            names.push(class_name);
        }
    }
    Ok(())
}

/// `com/example/Greeter.class` to `com.example.Greeter`. Module and package
/// descriptors and multi-release overlays are not classes.
fn entry_to_class_name(entry: &str) -> Option<String> {
    let stem = entry.strip_suffix(".class")?;
    if stem.starts_with("META-INF/") || stem.ends_with("module-info") || stem.ends_with("package-info")
    {
        return None;
    }
    Some(stem.replace('/', "."))
}

/// Ordered list of directories and jars, searched front to back.
#[derive(Debug, Clone, Default)]
pub struct ClassPath {
    entries: Vec<ClassPathEntry>,
}

impl ClassPath {
    pub fn new(entries: Vec<ClassPathEntry>) -> Self {
        ClassPath { entries }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ClassPath::new(paths.into_iter().map(ClassPathEntry::from_path).collect())
    }

    pub fn entries(&self) -> &[ClassPathEntry] {
        &self.entries
    }

    /// Binary names of every class visible on the class path, sorted and deduplicated.
    pub fn list_classes(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in &self.entries {
            entry.class_names(&mut names)?;
        }
        names.sort();
        names.dedup();
        Ok(names)
    }
}

impl ClassSource for ClassPath {
    fn find_class(&self, binary_name: &str) -> Result<Option<ClassFile>> {
        let entry_name = format!("{}.class", internal_name(binary_name));

        for entry in &self.entries {
            trace!(entry = %entry.path().display(), class = binary_name, "probing");
            if let Some(bytes) = entry.read(&entry_name)? {
                debug!(
                    class = binary_name,
                    from = %entry.path().display(),
                    bytes = bytes.len(),
                    "loaded class"
                );
                return ClassFile::parse(&bytes).map(Some);
            }
        }

        Ok(None)
    }
}

/// Reads a single `.class` file from disk.
pub fn read_class_file(path: &Path) -> Result<ClassFile> {
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read class file");
    ClassFile::parse(&bytes)
}

/// Largest buffer reserved up front for a jar entry; bigger entries grow while reading.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// The declared size comes from the archive header and is not trusted.
fn capacity_hint(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOCATION) as usize
}
