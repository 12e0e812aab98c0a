//! Reading `.vm` sources from disk.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    error::{LoadError, LoadResult},
    program::SourceUnit,
};

const SOURCE_EXT: &str = "vm";
const OUTPUT_EXT: &str = "asm";

fn is_vm_file(path: &Path) -> bool {
    path.is_file() && path.extension() == Some(OsStr::new(SOURCE_EXT))
}

fn unit_name(path: &Path) -> LoadResult<String> {
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .ok_or_else(|| LoadError::UnitName(path.to_path_buf()))
}

fn read_unit(path: &Path) -> LoadResult<SourceUnit> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceUnit::new(unit_name(path)?, &source))
}

/// Load a single `.vm` file, or every `.vm` file directly inside a directory
/// in file-name order. Unreadable files inside a directory are skipped.
pub fn load(path: &Path) -> LoadResult<Vec<SourceUnit>> {
    if is_vm_file(path) {
        return Ok(vec![read_unit(path)?]);
    }
    if !path.is_dir() {
        return Err(LoadError::NotVmSource(path.to_path_buf()));
    }

    let entries = fs::read_dir(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_vm_file(p))
        .collect();
    files.sort();

    let mut units = vec![];
    for file in files {
        match read_unit(&file) {
            Ok(unit) => {
                debug!("loaded {} ({} lines)", file.display(), unit.lines.len());
                units.push(unit);
            }
            Err(e) => warn!("skipping: {}", e),
        }
    }
    Ok(units)
}

/// `<dir>/<dir name>.asm` for a directory, `<stem>.asm` beside a file.
pub fn output_path(input: &Path) -> LoadResult<PathBuf> {
    if !input.is_dir() {
        return Ok(input.with_extension(OUTPUT_EXT));
    }
    let dir = input.canonicalize().map_err(|source| LoadError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let name = unit_name(&dir)?;
    Ok(input.join(format!("{}.{}", name, OUTPUT_EXT)))
}
