use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::DiscoveryError;
use crate::file_entry::FileEntry;

pub struct FileScanner {
    extensions: Vec<String>,
}

impl FileScanner {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        FileScanner {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Lists direct children of `dirpath` whose extension is in the
    /// allow-list. Order is whatever the directory listing yields.
    pub fn scan(&self, dirpath: &Path) -> Result<Vec<FileEntry>, DiscoveryError> {
        let entries = fs::read_dir(dirpath).map_err(|err| match err.kind() {
            ErrorKind::NotFound => DiscoveryError::NotFound(dirpath.to_path_buf()),
            ErrorKind::PermissionDenied => DiscoveryError::PermissionDenied(dirpath.to_path_buf()),
            ErrorKind::NotADirectory => DiscoveryError::NotADirectory(dirpath.to_path_buf()),
            _ => DiscoveryError::Io(dirpath.to_path_buf(), err.to_string()),
        })?;

        let mut found = vec![];
        for entry in entries.filter_map(|e| e.ok()) {
            if let Ok(ft) = entry.file_type() {
                if ft.is_file() {
                    let p = entry.path();
                    if self.matches_extension(&p) {
                        if let Some(fe) = FileEntry::new(p) {
                            found.push(fe);
                        }
                    }
                }
            }
        }

        Ok(found)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            None => false,
            Some(ext) => {
                // Allow-list entries were lowercased in new().
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            }
        }
    }
}
