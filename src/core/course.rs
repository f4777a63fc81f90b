use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CourseCode(String);

impl CourseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CourseCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Prerequisite,
    Corequisite,
}

impl RequirementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequirementKind::Prerequisite => "prerequisite",
            RequirementKind::Corequisite => "corequisite",
        }
    }
}

/// One row of the course table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub code: CourseCode,
    pub title: String,
    pub semester: u32,
    /// Trimmed, non-empty references in table order. They may name courses
    /// that do not exist.
    pub prerequisites: Vec<String>,
    pub corequisites: Vec<String>,
}

impl CourseRecord {
    pub fn requirements(&self) -> impl Iterator<Item = (&str, RequirementKind)> {
        self.prerequisites
            .iter()
            .map(|code| (code.as_str(), RequirementKind::Prerequisite))
            .chain(
                self.corequisites
                    .iter()
                    .map(|code| (code.as_str(), RequirementKind::Corequisite)),
            )
    }
}

/// Splits a comma-separated requirement cell. Blank entries are dropped.
pub fn split_requirements(cell: Option<&str>) -> Vec<String> {
    cell.map(|text| {
        text.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
