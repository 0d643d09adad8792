use std::fmt;
use serde::{Deserialize, Serialize};

/// Where a change lives: a 1-based line for code, a section name for specifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    Line(u32),
    Section(String),
}

impl Locator {
    pub fn is_valid(&self) -> bool {
        match self {
            Locator::Line(line) => *line >= 1,
            Locator::Section(name) => !name.trim().is_empty(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Line(line) => write!(f, "line {}", line),
            Locator::Section(name) => write!(f, "section '{}'", name),
        }
    }
}
