use anyhow::Result;
use ionread::parse::{parse_all, parse_file, write_file};
use ionread::value::{Atom, Value};
use ionread::ErrorKind;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn file_with(contents: &str) -> Result<NamedTempFile> {
    let mut f = NamedTempFile::new()?;
    f.write_all(contents.as_bytes())?;
    f.flush()?;
    Ok(f)
}

#[test]
fn parses_a_file() -> Result<()> {
    let f = file_with("// header\nconfig::{port: 8080, name: \"x\"} trailing")?;
    let v = parse_file(f.path())?.expect("a value");
    assert_eq!(v.field("port"), Some(&Value::from(Atom::Int(8080))));
    assert_eq!(v.annotations.len(), 1);
    Ok(())
}

#[test]
fn empty_file() -> Result<()> {
    let f = file_with("")?;
    assert!(parse_file(f.path())?.is_none());
    Ok(())
}

#[test]
fn missing_file() {
    let path = Path::new("/nonexistent/dir/x.ion");
    let e = parse_file(path).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Io);
    assert!(e.to_string().starts_with("\"/nonexistent/dir/x.ion\": "));
}

#[test]
fn errors_name_the_file() -> Result<()> {
    let f = file_with("\n[1, 2")?;
    let e = parse_file(f.path()).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::UnexpectedEndOfInput);
    let msg = e.to_string();
    assert!(msg.starts_with("premature EOF while expecting closing character ']' for '[' in \""),
            "{}", msg);
    assert!(msg.ends_with("\"@2.0"), "{}", msg);
    Ok(())
}

#[test]
fn invalid_utf8_is_an_io_error() -> Result<()> {
    let mut f = NamedTempFile::new()?;
    f.write_all(b"[1, \xff]")?;
    f.flush()?;
    let e = parse_file(f.path()).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Io);
    Ok(())
}

#[test]
fn writes_and_reads_back() -> Result<()> {
    let vals = parse_all("a::1 [b, \"c\"] {d: (e 2.5)}".as_bytes())?;
    let f = NamedTempFile::new()?;
    write_file(f.path(), &vals)?;
    let back = parse_all(std::fs::File::open(f.path())?)?;
    assert_eq!(back, vals);
    Ok(())
}
