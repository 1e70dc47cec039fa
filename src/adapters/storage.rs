use crate::domain::ports::RecordStore;
use crate::utils::error::{PlacerError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name).extension().and_then(|ext| ext.to_str()) == Some(extension)
}

/// 本機目錄
#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn open<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        if !base_path.is_dir() {
            return Err(PlacerError::invalid_argument(format!(
                "{} is not a directory",
                base_path.display()
            )));
        }
        Ok(Self { base_path })
    }
}

impl RecordStore for LocalStore {
    fn location(&self) -> &Path {
        &self.base_path
    }

    fn list(&self, extension: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            // 目錄和符號連結一律略過
            if file_type.is_dir() || file_type.is_symlink() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };

            if has_extension(&name, extension) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    fn read_lines(&self, name: &str) -> Result<Vec<String>> {
        let content = fs::read_to_string(self.base_path.join(name))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn create(&self, name: &str, contents: &str) -> Result<()> {
        let full_path = self.base_path.join(name);

        // 先寫入同目錄的暫存檔，再以不覆蓋的方式改名
        let mut temp = tempfile::NamedTempFile::new_in(&self.base_path)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist_noclobber(&full_path).map_err(|e| e.error)?;

        tracing::debug!("Created {}", full_path.display());
        Ok(())
    }
}

/// In-memory store, used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    location: PathBuf,
    files: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            location: PathBuf::from("<memory>"),
            files: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn with_file(self, name: &str, contents: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(name.to_string(), contents.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.files.borrow().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn location(&self) -> &Path {
        &self.location
    }

    fn list(&self, extension: &str) -> Result<Vec<String>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|name| has_extension(name, extension))
            .cloned()
            .collect())
    }

    fn read_lines(&self, name: &str) -> Result<Vec<String>> {
        let files = self.files.borrow();
        let content = files.get(name).ok_or_else(|| {
            PlacerError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", name),
            ))
        })?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn create(&self, name: &str, contents: &str) -> Result<()> {
        let mut files = self.files.borrow_mut();
        if files.contains_key(name) {
            return Err(PlacerError::IoError(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("File already exists: {}", name),
            )));
        }
        files.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_rejects_non_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("places");
        fs::write(&file, "header\n").unwrap();

        let err = LocalStore::open(&file).unwrap_err();
        assert!(matches!(err, PlacerError::InvalidArgument { .. }));
    }

    #[test]
    fn test_list_filters_by_extension_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("000002.placement"), "where\n1\n").unwrap();
        fs::write(dir.path().join("000001.placement"), "where\n2\n").unwrap();
        fs::write(dir.path().join("bonus.extra"), "1 5\n").unwrap();
        fs::write(dir.path().join("places"), "header\n").unwrap();
        fs::create_dir(dir.path().join("nested.placement")).unwrap();

        let store = LocalStore::open(dir.path()).unwrap();

        assert_eq!(
            store.list("placement").unwrap(),
            vec!["000001.placement", "000002.placement"]
        );
        assert_eq!(store.list("extra").unwrap(), vec!["bonus.extra"]);
    }

    #[test]
    fn test_create_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        store.create("000001.placement", "where\n1      \n").unwrap();
        let err = store.create("000001.placement", "where\n2      \n").unwrap_err();

        assert!(matches!(err, PlacerError::IoError(_)));
        assert_eq!(
            store.read_lines("000001.placement").unwrap(),
            vec!["where", "1      "]
        );
        // 失敗時不留下暫存檔
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_memory_store_behaves_like_local_store() {
        let store = MemoryStore::new()
            .with_file("places", "header\n1 10 Park\n")
            .with_file("a.extra", "1 3\n");

        assert_eq!(store.list("extra").unwrap(), vec!["a.extra"]);
        assert_eq!(store.read_lines("places").unwrap().len(), 2);
        assert!(store.read_lines("missing").is_err());

        store.create("000001.placement", "where\n1\n").unwrap();
        assert!(store.create("000001.placement", "x").is_err());
        assert_eq!(store.len(), 3);
    }
}
