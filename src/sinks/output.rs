//! Publishing finished documents.
//!
//! A document is written to a temporary file next to its destination and only
//! renamed onto the requested path once it has been completely written. If
//! anything fails along the way the temporary file is dropped, which deletes
//! it, so a failed render never leaves a file at the destination.

use super::Assembler;
use crate::error::AssemblyError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_atomically<F>(path: &Path, assembler: Assembler, write: F) -> Result<(), AssemblyError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), AssemblyError>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_error = |e: std::io::Error| {
        AssemblyError::failed(assembler, None, format!("{}: {e}", path.display()))
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".comic-compiler-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(io_error)?;
    log::debug!(
        "writing {assembler} to temporary file {}",
        temp.path().display()
    );

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(io_error)?;
    }
    temp.as_file().sync_all().map_err(io_error)?;

    temp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
