//! This module provides the `DescriptionLoader` struct, responsible for loading programs from
//! `.sd` files and strings.
//!
//! A program file holds a standard description, optionally preceded by header lines:
//!
//! ```text
//! # Turing's first example
//! name: alternating
//! tape: ________
//! DADDCRDAA;DAADDRDAAA;
//! DAAADDCCRDAAAA;DAAAADDRDA;
//! ```
//!
//! Lines starting with `#` are comments. All whitespace inside the description is ignored, so
//! long descriptions can be wrapped.

use crate::decoder::decode;
use crate::machine::Tape;
use crate::types::{Program, TuringError};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of program files.
pub const PROGRAM_EXTENSION: &str = "sd";

/// `DescriptionLoader` is a utility struct for loading programs from files, strings and
/// directories.
pub struct DescriptionLoader;

impl DescriptionLoader {
    /// Loads a single program from the specified file path.
    ///
    /// The program is named after the file stem unless the file has a `name:` header.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read and its description decodes.
    /// * `Err(TuringError::FileError)` if the file cannot be read.
    /// * `Err(TuringError::Decode)` if the description is malformed.
    pub fn load_program(path: &Path) -> Result<Program, TuringError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::load_program_from_string(&name, &content)
    }

    /// Loads a single program from string content.
    ///
    /// # Arguments
    ///
    /// * `name` - The name used when the content has no `name:` header.
    /// * `content` - The program text.
    pub fn load_program_from_string(name: &str, content: &str) -> Result<Program, TuringError> {
        let mut program_name = name.to_string();
        let mut tape = None;
        let mut description = String::new();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(value) = line.strip_prefix("name:") {
                program_name = value.trim().to_string();
            } else if let Some(value) = line.strip_prefix("tape:") {
                let value = value.trim();
                // Validate early so a bad tape is reported against its file.
                value.parse::<Tape>()?;
                tape = Some(value.to_string());
            } else {
                description.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }

        let table = decode(&description)?;

        Ok(Program {
            name: program_name,
            description,
            tape,
            table,
        })
    }

    /// Loads every `.sd` file in a directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result is
    /// either the loaded program with its path, or the error that stopped it from loading.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringError>> {
        if !directory.exists() {
            return vec![Err(TuringError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != PROGRAM_EXTENSION) {
                    return None;
                }

                Some(Self::load_program(&path).map(|program| (path, program)))
            })
            .collect();

        // Directory order is platform dependent.
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecodeError;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "alternating.sd",
            "# first example\ntape: ____\nDADDCRDAA;DAADDRDAAA;\n  DAAADDCCRDAAAA;DAAAADDRDA;\n",
        );

        let program = DescriptionLoader::load_program(&path).unwrap();

        assert_eq!(program.name, "alternating");
        assert_eq!(program.tape.as_deref(), Some("____"));
        assert_eq!(
            program.description,
            "DADDCRDAA;DAADDRDAAA;DAAADDCCRDAAAA;DAAAADDRDA;"
        );
        assert_eq!(program.table.len(), 4);
    }

    #[test]
    fn test_name_header_overrides_file_stem() {
        let program =
            DescriptionLoader::load_program_from_string("stem", "name: Ones\nDADDCCRDA;").unwrap();

        assert_eq!(program.name, "Ones");
        assert_eq!(program.tape, None);
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "invalid.sd", "CDA;");

        let result = DescriptionLoader::load_program(&path);
        assert_eq!(
            result,
            Err(TuringError::Decode(DecodeError::OrphanSymbolToken {
                position: 0
            }))
        );
    }

    #[test]
    fn test_load_invalid_tape() {
        let result = DescriptionLoader::load_program_from_string("bad", "tape: 012\nDADDCRDA;");
        assert!(matches!(
            result,
            Err(TuringError::InvalidTapeSymbol { symbol: '2', .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = DescriptionLoader::load_program(&dir.path().join("missing.sd"));
        assert!(matches!(result, Err(TuringError::FileError(_))));
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "b.sd", "DADDCCRDA;");
        write_file(dir.path(), "a.sd", "DADDCRDA;");
        write_file(dir.path(), "broken.sd", "DAC;");
        write_file(dir.path(), "ignored.txt", "not a program");

        let results = DescriptionLoader::load_programs(dir.path());

        assert_eq!(results.len(), 3);
        let names: Vec<_> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|(_, program)| program.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(results[2].is_err());
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let dir = tempdir().unwrap();
        let results = DescriptionLoader::load_programs(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringError::FileError(_))));
    }
}
