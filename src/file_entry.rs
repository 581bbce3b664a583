use std::fmt::Display;
use std::path::PathBuf;

/// Subdirectory, sibling to each source file, that receives the output.
pub const COMPRESSED_DIR: &str = "compressed";

#[derive(Clone, Debug, PartialEq)]
pub struct FileEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub name: String,
}

impl FileEntry {
    /// Derives the destination as `<dir>/compressed/<file name>`. Returns
    /// None for paths without a file name component.
    pub fn new(source: PathBuf) -> Option<Self> {
        let file_name = source.file_name()?;
        let name = file_name.to_string_lossy().into_owned();
        let destination = source.parent()?.join(COMPRESSED_DIR).join(file_name);
        Some(FileEntry {
            source,
            destination,
            name,
        })
    }
}

impl Display for FileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntryStatus {
    Pending,
    Running,
    Skipped,
    Done,
    Failed,
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str = match self {
            EntryStatus::Pending => "☐",
            EntryStatus::Running => "🚧",
            EntryStatus::Skipped => "⏭",
            EntryStatus::Done => "✅",
            EntryStatus::Failed => "🚫",
        };
        write!(f, "{}", status_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_derivation() {
        let entry = FileEntry::new(PathBuf::from("/home/user/videos/clip.mp4")).unwrap();
        assert_eq!(entry.source, PathBuf::from("/home/user/videos/clip.mp4"));
        assert_eq!(
            entry.destination,
            PathBuf::from("/home/user/videos/compressed/clip.mp4")
        );
        assert_eq!(entry.name, "clip.mp4");
    }

    #[test]
    fn test_relative_source() {
        let entry = FileEntry::new(PathBuf::from("clip.mp4")).unwrap();
        assert_eq!(entry.destination, PathBuf::from("compressed/clip.mp4"));
    }

    #[test]
    fn test_no_file_name() {
        assert_eq!(FileEntry::new(PathBuf::from("/")), None);
    }
}
