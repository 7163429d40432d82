//! Error and result types for expectation verification.

use std::path::PathBuf;

use super::expectation::ParseError;
use crate::resolve::ProjectError;

/// A single expectation failure.
#[derive(Debug)]
pub enum ExpectationFailure {
    /// The expectation comment itself did not parse.
    Parse(ParseError),
    /// An expectation no reported diagnostic satisfied.
    Unfulfilled { line: u32, raw: String },
    /// A reported diagnostic no expectation asked for.
    Unexpected {
        line: u32,
        kind: &'static str,
        message: String,
    },
}

impl std::fmt::Display for ExpectationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectationFailure::Parse(error) => write!(f, "{}", error),
            ExpectationFailure::Unfulfilled { line, raw } => {
                write!(f, "line {}: expected `{}`, got nothing", line + 1, raw)
            }
            ExpectationFailure::Unexpected {
                line,
                kind,
                message,
            } => {
                write!(f, "line {}: unexpected {}: {}", line + 1, kind, message)
            }
        }
    }
}

/// Result of verifying one module of a fixture project.
#[derive(Debug)]
pub struct ModuleTestResult {
    /// Module name (the file stem).
    pub name: String,
    /// List of failures (empty if passed).
    pub failures: Vec<ExpectationFailure>,
}

impl ModuleTestResult {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of verifying all modules of a fixture project.
#[derive(Debug)]
pub struct ProjectTestResult {
    /// Path to the fixture directory.
    pub path: PathBuf,
    pub modules: Vec<ModuleTestResult>,
}

impl ProjectTestResult {
    pub fn passed(&self) -> bool {
        self.modules.iter().all(ModuleTestResult::passed)
    }

    pub fn pass_count(&self) -> usize {
        self.modules.iter().filter(|m| m.passed()).count()
    }

    pub fn fail_count(&self) -> usize {
        self.modules.iter().filter(|m| !m.passed()).count()
    }
}

/// Error during verification.
#[derive(Debug)]
pub enum VerificationError {
    /// Fixture files could not be read.
    Io(String),
    /// The fixture project did not index.
    Project(ProjectError),
    /// The fixture directory holds no `.rs` files.
    NoFixtures(PathBuf),
    /// Expectations did not match the reported diagnostics.
    TestFailures(ProjectTestResult),
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::Io(message) => write!(f, "failed to read fixtures: {}", message),
            VerificationError::Project(error) => write!(f, "failed to index fixtures: {}", error),
            VerificationError::NoFixtures(path) => {
                write!(f, "no fixture files in {}", path.display())
            }
            VerificationError::TestFailures(result) => {
                writeln!(f, "{}", result.path.display())?;
                for module in &result.modules {
                    if module.passed() {
                        writeln!(f, "  \u{2713} {}", module.name)?;
                    } else {
                        writeln!(f, "  \u{2717} {}", module.name)?;
                        for failure in &module.failures {
                            writeln!(f, "      {}", failure)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for VerificationError {}
