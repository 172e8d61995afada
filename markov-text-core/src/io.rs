use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{MarkovError, Result};

/// Reads a whole UTF-8 text file into memory.
///
/// Line breaks are kept; the tokenizer treats them as whitespace.
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|e| MarkovError::io(e, Some(path.to_path_buf())))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/alice.txt"` → `"alice"`
/// - `"alice.txt"` → `"alice"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> Result<String> {
	let path = input_path.as_ref();
	let stem = path.file_stem().ok_or_else(|| {
		MarkovError::InvalidArgument(format!("path has no filename: {}", path.display()))
	})?;

	Ok(stem.to_string_lossy().to_string())
}

/// Resolves `<folder>/<name>.<extension>`.
///
/// `name` must be a single plain path component: no separators, no `..`,
/// no root or prefix. This keeps lookups inside `folder`.
///
/// # Errors
/// Returns `InvalidArgument` for any other name.
pub fn corpus_path<P: AsRef<Path>>(folder: P, name: &str, extension: &str) -> Result<PathBuf> {
	let mut components = Path::new(name).components();
	match (components.next(), components.next()) {
		(Some(Component::Normal(_)), None) if !name.contains(std::path::is_separator) => {}
		_ => {
			return Err(MarkovError::InvalidArgument(format!("invalid corpus name '{name}'")));
		}
	}

	Ok(folder.as_ref().join(format!("{name}.{extension}")))
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
	let dir = dir.as_ref();
	let to_err = |e| MarkovError::io(e, Some(dir.to_path_buf()));
	let mut files = Vec::new();

	for entry in fs::read_dir(dir).map_err(to_err)? {
		let path = entry.map_err(to_err)?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
