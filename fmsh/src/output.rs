//! Where command output goes: the terminal, or a buffer for embedding and tests.

use fmsh_core::{DirEntry, Pipeline};
use std::io::Write;
use tokio::fs::File;

pub enum Output {
    Stdout,
    Buffer(Vec<u8>),
}

impl Output {
    pub fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = std::io::stdout();
                stdout.write_all(data)?;
                stdout.flush()
            }
            Output::Buffer(buf) => {
                buf.extend_from_slice(data);
                Ok(())
            }
        }
    }

    pub fn writeln(&mut self, s: &str) -> std::io::Result<()> {
        self.write(s.as_bytes())?;
        self.write(b"\n")
    }

    /// Drains an open file into the output.
    pub async fn write_stream(&mut self, source: File) -> std::io::Result<u64> {
        let written = match self {
            Output::Stdout => Pipeline::new(source, tokio::io::stdout()).run().await?.0,
            Output::Buffer(buf) => Pipeline::new(source, buf).run().await?.0,
        };
        Ok(written)
    }

    pub fn write_table(&mut self, entries: &[DirEntry]) -> std::io::Result<()> {
        self.write(render_table(entries).as_bytes())
    }

    /// Takes everything buffered so far. Always empty for `Stdout`.
    pub fn take_buffer(&mut self) -> String {
        match self {
            Output::Stdout => String::new(),
            Output::Buffer(buf) => String::from_utf8_lossy(&std::mem::take(buf)).into_owned(),
        }
    }
}

/// Boxed three-column table: row index, quoted name, quoted kind.
pub fn render_table(entries: &[DirEntry]) -> String {
    let header = ["(index)".to_string(), "name".to_string(), "type".to_string()];
    let rows: Vec<[String; 3]> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            [
                i.to_string(),
                format!("'{}'", entry.name),
                format!("'{}'", entry.kind),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|cell| cell.chars().count() + 2);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count() + 2);
        }
    }

    let rule = |left: char, mid: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        format!("{left}{}{right}\n", segments.join(&mid.to_string()))
    };
    let line = |cells: &[String; 3]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| center(cell, *width))
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let mut table = rule('┌', '┬', '┐');
    table.push_str(&line(&header));
    table.push_str(&rule('├', '┼', '┤'));
    for row in &rows {
        table.push_str(&line(row));
    }
    table.push_str(&rule('└', '┴', '┘'));
    table
}

fn center(cell: &str, width: usize) -> String {
    let pad = width.saturating_sub(cell.chars().count());
    let left = pad / 2;
    format!("{}{cell}{}", " ".repeat(left), " ".repeat(pad - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmsh_core::EntryKind;

    #[test]
    fn buffer_collects_lines() {
        let mut out = Output::Buffer(Vec::new());
        out.writeln("one").unwrap();
        out.writeln("two").unwrap();
        assert_eq!(out.take_buffer(), "one\ntwo\n");
        assert_eq!(out.take_buffer(), "");
    }

    #[test]
    fn table_layout() {
        let entries = vec![
            DirEntry {
                name: "src".into(),
                kind: EntryKind::Directory,
            },
            DirEntry {
                name: "a.txt".into(),
                kind: EntryKind::File,
            },
        ];

        let expected = "\
┌─────────┬─────────┬─────────────┐
│ (index) │  name   │    type     │
├─────────┼─────────┼─────────────┤
│    0    │  'src'  │ 'directory' │
│    1    │ 'a.txt' │   'file'    │
└─────────┴─────────┴─────────────┘
";
        assert_eq!(render_table(&entries), expected);
    }

    #[test]
    fn empty_table_still_has_header() {
        let table = render_table(&[]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("(index)"));
    }
}
