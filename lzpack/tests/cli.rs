use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn create_list_extract_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.bin");
    fs::write(&a, "AAA")?;
    fs::write(&b, [1u8, 2, 3])?;
    let archive = dir.path().join("pack.lzma");

    Command::cargo_bin("lzpack")?
        .arg("create")
        .arg(&archive)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived 2 files"));

    assert!(archive.exists());
    assert!(dir.path().join("pack.lzma.meta").exists());

    Command::cargo_bin("lzpack")?
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt").and(predicate::str::contains("b.bin")));

    let out = dir.path().join("out");
    Command::cargo_bin("lzpack")?
        .arg("extract")
        .arg(&archive)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 files"));

    assert_eq!(fs::read_to_string(out.join("a.txt"))?, "AAA");
    assert_eq!(fs::read(out.join("b.bin"))?, vec![1u8, 2, 3]);
    Ok(())
}

#[test]
fn compress_decompress_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("hello.txt");
    fs::write(&src, "hello world\n".repeat(5))?;

    Command::cargo_bin("lzpack")?
        .arg("compress")
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.txt.lzma"));

    fs::remove_file(&src)?;

    Command::cargo_bin("lzpack")?
        .arg("decompress")
        .arg(dir.path().join("hello.txt.lzma"))
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&src)?, "hello world\n".repeat(5));
    Ok(())
}

#[test]
fn broken_archive_reports_category() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let bad = dir.path().join("broken.lzma");
    fs::write(&bad, "NOT A VALID ARCHIVE")?;

    Command::cargo_bin("lzpack")?
        .arg("decompress")
        .arg(&bad)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("damaged"));
    Ok(())
}

#[test]
fn missing_input_reports_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    Command::cargo_bin("lzpack")?
        .arg("compress")
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Input file not found."));
    Ok(())
}

#[test]
fn missing_index_reports_index_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let a = dir.path().join("a.txt");
    fs::write(&a, "AAA")?;
    let archive = dir.path().join("pack.lzma");

    Command::cargo_bin("lzpack")?
        .arg("create")
        .arg(&archive)
        .arg(&a)
        .assert()
        .success();
    fs::remove_file(dir.path().join("pack.lzma.meta"))?;

    Command::cargo_bin("lzpack")?
        .arg("list")
        .arg(&archive)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains(".meta"));
    Ok(())
}

#[test]
fn create_without_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    Command::cargo_bin("lzpack")?
        .arg("create")
        .arg(dir.path().join("pack.lzma"))
        .assert()
        .failure()
        .code(64);
    Ok(())
}
