//! File and stream helpers: buffered copy, streaming digest, deterministic
//! directory walking.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

const COPY_BUF: usize = 64 * 1024;

/// Copy everything from `reader` to `writer` through a fixed buffer.
///
/// Returns the number of bytes copied.
pub fn copy_stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buf = vec![0u8; COPY_BUF];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Ok(total);
        }
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
}

/// SHA-256 of a file's contents as lowercase hex, streamed in fixed chunks.
pub fn sha256_hex(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; COPY_BUF];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    Ok(hex)
}

/// Recursively collect all regular files under `dir`.
///
/// Entries are visited in sorted order per directory so the result is
/// deterministic across platforms. Symlinks are followed by `fs::metadata`
/// semantics; directories come back depth-first.
pub fn walk_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk_into(dir, &mut out)?;
    Ok(out)
}

fn walk_into(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_into(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// File name component as UTF-8, if both exist.
#[must_use]
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn copy_stream_moves_all_bytes() {
        let data = vec![7u8; 200_000]; // spans multiple buffer fills
        let mut src = Cursor::new(data.clone());
        let mut dst = Vec::new();
        let n = copy_stream(&mut src, &mut dst).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(dst, data);
    }

    #[test]
    fn copy_stream_empty() {
        let mut src = Cursor::new(Vec::<u8>::new());
        let mut dst = Vec::new();
        assert_eq!(copy_stream(&mut src, &mut dst).unwrap(), 0);
        assert!(dst.is_empty());
    }

    #[test]
    fn sha256_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();
        assert_eq!(
            sha256_hex(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn walk_files_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/inner.txt"), "x").unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(dir.path().join("c.txt"), "x").unwrap();

        let files = walk_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.txt", "b/inner.txt", "c.txt"]);
    }

    #[test]
    fn base_name_extracts_file_name() {
        assert_eq!(base_name(Path::new("/etc/app/config.xml")), Some("config.xml"));
        assert_eq!(base_name(Path::new("/")), None);
    }
}
