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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod lexer;
pub mod output;

pub use assembler::Assembler;
pub use errors::{AssemblyError, Diagnostic, Severity};

use anyhow::{Context, Result};
use file_reader::FileReader;
use std::path::Path;

/// Reads `source_path` through `reader` and assembles it. Returns the
/// finished `Assembler` (holding both sections and diagnostics) regardless of
/// whether assembly succeeded — callers inspect `errors`/`warnings` and
/// render whichever output format they need from the sections.
pub fn assemble<F: FileReader>(source_path: &Path, reader: &F) -> Result<(Assembler, bool)> {
    let source = reader
        .read_to_string(source_path)
        .with_context(|| format!("failed to read input file: {}", source_path.display()))?;

    let mut assembler = Assembler::new();
    let filename = source_path.display().to_string();
    let ok = assembler.assemble(&source, &filename);
    Ok((assembler, ok))
}
