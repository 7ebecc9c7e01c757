/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("range error on line {line}: {reason}")]
    RangeError { line: usize, reason: String },

    #[error("operand count error on line {line}: {reason}")]
    OperandCountError { line: usize, reason: String },

    #[error("unknown mnemonic '{name}' on line {line}")]
    UnknownMnemonic { line: usize, name: String },

    #[error("structural error on line {line}: {reason}")]
    StructuralError { line: usize, reason: String },

    #[error("semantic error on line {line}: {reason}")]
    SemanticError { line: usize, reason: String },
}

impl AssemblyError {
    pub fn line(&self) -> usize {
        match self {
            AssemblyError::RangeError { line, .. }
            | AssemblyError::OperandCountError { line, .. }
            | AssemblyError::UnknownMnemonic { line, .. }
            | AssemblyError::StructuralError { line, .. }
            | AssemblyError::SemanticError { line, .. } => *line,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.into_diagnostic_at(0)
    }

    /// Same as [`into_diagnostic`](Self::into_diagnostic), but keeps the
    /// caller's column instead of defaulting to 0 — `AssemblyError` itself
    /// carries no column, since the encoder and pseudo-expander only ever
    /// see a line number.
    pub fn into_diagnostic_at(self, column: usize) -> Diagnostic {
        let line = self.line();
        Diagnostic {
            severity: Severity::Error,
            message: self.to_string(),
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic emitted during assembly. The assembler never aborts
/// mid-pass — diagnostics accumulate in the `Assembler`'s error/warning lists
/// and are reported once assembly finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            line,
            column,
        }
    }

    pub fn warning(message: impl Into<String>, line: usize, column: usize) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "{kind} at line {}: {}", self.line, self.message)
    }
}
