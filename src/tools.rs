use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// reads the whole file at `path` into memory
pub fn read_binary<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut f = File::open(path)?;
    f.read_to_end(&mut buffer)?;
    Ok(buffer)
}
