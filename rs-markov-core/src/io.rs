use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{BrainError, Result};

/// Streams the lines of a text corpus.
///
/// - Splits on `\n` / `\r\n`
/// - Yields an error for the first unreadable line (invalid UTF-8, I/O)
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<io::Lines<BufReader<File>>> {
	Ok(BufReader::new(File::open(filename)?).lines())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/brain.txt` + `"bin"` → `data/brain.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| BrainError::InvalidPath(format!("{} has no filename", input_path.display())))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Encodes a list of lines with `postcard` and writes it to `path`.
///
/// Missing parent directories are created.
pub fn write_snapshot<P: AsRef<Path>, S: AsRef<str>>(path: P, lines: &[S]) -> Result<()> {
	let path = path.as_ref();
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}

	let lines: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
	let bytes = postcard::to_stdvec(&lines)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Reads back a list of lines written by `write_snapshot`.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}
