//! End-to-end sessions through the dispatcher.
//!
//! Each test starts a shell in a fresh temporary directory, feeds it command
//! lines and checks both the printed output and the filesystem afterwards.

use fmsh::{Output, Shell, ShellError};
use fmsh_core::FileEngine;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Session {
    temp: TempDir,
    shell: Shell,
}

impl Session {
    async fn start() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let engine = FileEngine::new(temp.path())
            .await
            .expect("failed to start engine");
        let shell = Shell::new(engine, "tester").with_output(Output::Buffer(Vec::new()));
        Self { temp, shell }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Runs one line and returns what it printed.
    async fn run(&mut self, line: &str) -> String {
        self.shell
            .execute(line)
            .await
            .expect("command should not end the session");
        self.shell.stdout.take_buffer()
    }

    fn location(&self) -> String {
        format!("You are currently in {}\n", self.shell.cwd())
    }
}

#[tokio::test]
async fn every_command_ends_with_location() {
    let mut s = Session::start().await;

    for line in ["ls", "up", "cd .", "add x.txt", "rm x.txt", "bogus", "rn one", "os --cpus"] {
        let out = s.run(line).await;
        assert!(
            out.ends_with(&s.location()),
            "{line:?} did not end with the location: {out:?}"
        );
    }
}

#[tokio::test]
async fn add_twice_fails_the_second_time() {
    let mut s = Session::start().await;

    let first = s.run("add note.txt").await;
    assert_eq!(first, s.location());
    assert!(s.root().join("note.txt").is_file());

    let second = s.run("add note.txt").await;
    assert_eq!(second, format!("Operation failed\n{}", s.location()));
}

#[tokio::test]
async fn rename_with_quoted_names() {
    let mut s = Session::start().await;
    fs::write(s.root().join("a b.txt"), b"spaced").unwrap();

    let out = s.run("rn \"a b.txt\" \"c.txt\"").await;
    assert_eq!(out, s.location());
    assert!(!s.root().join("a b.txt").exists());
    assert_eq!(fs::read(s.root().join("c.txt")).unwrap(), b"spaced");
}

#[tokio::test]
async fn rename_with_one_argument_is_invalid_input() {
    let mut s = Session::start().await;
    fs::write(s.root().join("onlyonearg"), b"x").unwrap();

    let out = s.run("rn onlyonearg").await;
    assert_eq!(out, format!("Invalid input\n{}", s.location()));
    assert!(s.root().join("onlyonearg").exists());
}

#[tokio::test]
async fn unknown_and_empty_lines_are_invalid_input() {
    let mut s = Session::start().await;

    assert_eq!(s.run("dance").await, format!("Invalid input\n{}", s.location()));
    assert_eq!(s.run("").await, format!("Invalid input\n{}", s.location()));
}

#[tokio::test]
async fn copy_of_missing_file_fails_without_touching_destination() {
    let mut s = Session::start().await;
    fs::create_dir(s.root().join("dest")).unwrap();

    let out = s.run("cp missing.txt dest").await;
    assert_eq!(out, format!("Operation failed\n{}", s.location()));
    assert_eq!(fs::read_dir(s.root().join("dest")).unwrap().count(), 0);
}

#[tokio::test]
async fn copy_then_move_between_directories() {
    let mut s = Session::start().await;
    let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 97) as u8).collect();
    fs::write(s.root().join("blob.bin"), &payload).unwrap();
    fs::create_dir(s.root().join("a")).unwrap();
    fs::create_dir(s.root().join("b")).unwrap();

    assert_eq!(s.run("cp blob.bin a").await, s.location());
    assert_eq!(fs::read(s.root().join("a/blob.bin")).unwrap(), payload);
    assert_eq!(fs::read(s.root().join("blob.bin")).unwrap(), payload);

    assert_eq!(s.run("mv blob.bin b").await, s.location());
    assert!(!s.root().join("blob.bin").exists());
    assert_eq!(fs::read(s.root().join("b/blob.bin")).unwrap(), payload);
}

#[tokio::test]
async fn hash_prints_digest() {
    let mut s = Session::start().await;
    fs::write(s.root().join("abc.txt"), b"abc").unwrap();

    let out = s.run("hash abc.txt").await;
    assert_eq!(
        out,
        format!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\n{}",
            s.location()
        )
    );
}

#[tokio::test]
async fn compress_and_decompress_round_trip() {
    let mut s = Session::start().await;
    let text = "lorem ipsum dolor sit amet\n".repeat(1000);
    fs::write(s.root().join("doc.txt"), &text).unwrap();

    assert_eq!(s.run("compress doc.txt doc").await, s.location());
    assert!(s.root().join("doc.br").is_file());

    assert_eq!(s.run("decompress doc.br doc2.txt").await, s.location());
    assert_eq!(fs::read_to_string(s.root().join("doc2.txt")).unwrap(), text);

    let again = s.run("compress doc.txt doc").await;
    assert_eq!(again, format!("Operation failed\n{}", s.location()));
}

#[tokio::test]
async fn cat_streams_file_contents() {
    let mut s = Session::start().await;
    fs::write(s.root().join("poem.txt"), "roses are red").unwrap();

    let out = s.run("cat poem.txt").await;
    assert_eq!(out, format!("roses are red\n{}", s.location()));

    let missing = s.run("cat nothing.txt").await;
    assert_eq!(missing, format!("Operation failed\n{}", s.location()));
}

#[tokio::test]
async fn navigation_updates_location() {
    let mut s = Session::start().await;
    fs::create_dir(s.root().join("inner")).unwrap();
    let start = s.shell.cwd();

    s.run("cd inner").await;
    assert!(s.shell.cwd().ends_with("inner"));

    s.run("up").await;
    assert_eq!(s.shell.cwd(), start);

    let out = s.run("cd does-not-exist").await;
    assert_eq!(out, format!("Operation failed\n{}", s.location()));
    assert_eq!(s.shell.cwd(), start);
}

#[tokio::test]
async fn up_is_idempotent_at_the_top() {
    let mut s = Session::start().await;

    for _ in 0..64 {
        s.run("up").await;
    }
    let top = s.shell.cwd();
    let out = s.run("up").await;

    assert_eq!(s.shell.cwd(), top);
    assert_eq!(out, s.location());
}

#[tokio::test]
async fn ls_lists_directories_first() {
    let mut s = Session::start().await;
    fs::write(s.root().join("file.txt"), b"").unwrap();
    fs::create_dir(s.root().join("folder")).unwrap();

    let out = s.run("ls").await;
    let folder = out.find("'folder'").expect("folder listed");
    let file = out.find("'file.txt'").expect("file listed");
    assert!(folder < file);
    assert!(out.contains("'directory'"));
    assert!(out.ends_with(&s.location()));
}

#[tokio::test]
async fn os_cpus_starts_with_count() {
    let mut s = Session::start().await;

    let out = s.run("os --cpus").await;
    assert!(out.starts_with("overall amount of CPUS: "));

    let count: usize = out
        .lines()
        .next()
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|n| n.parse().ok())
        .expect("cpu count");
    assert_eq!(out.lines().filter(|l| l.starts_with("model: ")).count(), count);
    assert_eq!(out.lines().filter(|l| l.starts_with("clock rate: ")).count(), count);
}

#[tokio::test]
async fn exit_ends_the_session() {
    let mut s = Session::start().await;

    let result = s.shell.execute("exit").await;
    assert!(matches!(result, Err(ShellError::Exit(0))));
    assert_eq!(
        s.shell.stdout.take_buffer(),
        "Thank you for using File Manager, tester, goodbye!\n"
    );
}
