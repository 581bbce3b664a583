//! Best-effort preservation of a file's creation time across the encode.
//! The value is treated as an opaque string; platforms without a usable
//! command report nothing and the caller proceeds without it.

use std::path::Path;

#[derive(Clone, Debug)]
pub struct CreationTime(String);

impl CreationTime {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(windows)]
pub fn read(path: &Path) -> Option<CreationTime> {
    use std::process::Command;

    let output = Command::new("powershell")
        .args([
            "-command",
            &format!("(Get-Item \"{}\").CreationTime", path.display()),
        ])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(CreationTime(String::from(text)))
    }
}

#[cfg(windows)]
pub fn restore(path: &Path, created: &CreationTime) -> bool {
    use std::process::Command;

    match Command::new("powershell")
        .args([
            "-command",
            &format!(
                "(Get-Item \"{}\").CreationTime='{}'",
                path.display(),
                created.0
            ),
        ])
        .status()
    {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}

#[cfg(not(windows))]
pub fn read(_path: &Path) -> Option<CreationTime> {
    // No portable command for reading a creation time off Windows.
    None
}

#[cfg(not(windows))]
pub fn restore(_path: &Path, _created: &CreationTime) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    #[cfg(not(windows))]
    fn test_read_is_noop_off_windows() {
        assert!(read(&PathBuf::from("/tmp")).is_none());
    }

    #[test]
    fn test_read_missing_file_never_panics() {
        let _ = read(&PathBuf::from("/no/such/file.mp4"));
    }
}
