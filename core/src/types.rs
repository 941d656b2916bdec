use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Orders directories before files, keeping enumeration order inside each group.
pub fn sort_dirs_first(entries: &mut [DirEntry]) {
    entries.sort_by_key(|entry| !entry.is_dir());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn dirs_first_is_stable() {
        let mut entries = vec![
            entry("zeta.txt", EntryKind::File),
            entry("src", EntryKind::Directory),
            entry("alpha.txt", EntryKind::File),
            entry("build", EntryKind::Directory),
        ];
        sort_dirs_first(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["src", "build", "zeta.txt", "alpha.txt"]);
    }
}
