//! Embedded example programs, decoded once on first use.

use crate::loader::DescriptionLoader;
use crate::types::{Program, TuringError};
use serde::Serialize;
use tracing::warn;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("alternating", include_str!("../machines/alternating.sd")),
    ("ones", include_str!("../machines/ones.sd")),
    ("ones-to-zeros", include_str!("../machines/ones-to-zeros.sd")),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = load_embedded();
}

fn load_embedded() -> Vec<Program> {
    PROGRAM_TEXTS
        .iter()
        .filter_map(|(name, text)| {
            DescriptionLoader::load_program_from_string(name, text)
                .map_err(|e| warn!(program = *name, error = %e, "failed to load embedded program"))
                .ok()
        })
        .collect()
}

/// Summary of an embedded program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub tape: Option<String>,
    pub state_count: usize,
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TuringError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| TuringError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name,
            description: program.description,
            tape: program.tape,
            state_count: program.table.len(),
        })
    }
}
