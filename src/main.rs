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

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use zx16asm::errors::Severity;
use zx16asm::file_reader::AsmFileReader;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Bin,
    Hex,
    Verilog,
    Mem,
}

#[derive(ClapParser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// Assembly source file to assemble.
    input: PathBuf,

    #[clap(short, long)]
    output: PathBuf,

    #[clap(short = 'f', long = "format", value_enum, default_value = "bin")]
    format: Format,

    #[clap(short = 'l', long = "listing")]
    listing: Option<PathBuf>,

    #[clap(short, long)]
    verbose: bool,

    #[clap(long = "verilog-module", default_value = "program_memory")]
    verilog_module: String,

    #[clap(long = "mem-sparse")]
    mem_sparse: bool,
}

fn main() -> Result<ExitCode> {
    let opts = Opts::parse();

    let reader = AsmFileReader;
    let input_path: &Path = opts.input.as_path();
    let (assembler, ok) = zx16asm::assemble(input_path, &reader)?;
    let source = fs::read_to_string(input_path)
        .with_context(|| format!("failed to read input file: {}", opts.input.display()))?;

    for warning in &assembler.warnings {
        eprintln!("{warning}");
    }
    for error in &assembler.errors {
        eprintln!("{error}");
    }

    if opts.verbose {
        eprintln!(
            "code size: {} bytes, data size: {} bytes",
            assembler.sections.text.bytes.len(),
            assembler.sections.data.bytes.len()
        );
    }

    if !ok {
        eprintln!("assembly of {} failed with {} error(s)", opts.input.display(), error_count(&assembler));
        return Ok(ExitCode::FAILURE);
    }

    let output_bytes = match opts.format {
        Format::Bin => assembler.get_binary_output(),
        Format::Hex => assembler.get_intel_hex_output().into_bytes(),
        Format::Verilog => assembler.get_hdl_output(&opts.verilog_module).into_bytes(),
        Format::Mem => assembler.get_memory_file_output(opts.mem_sparse).into_bytes(),
    };
    fs::write(&opts.output, output_bytes)
        .with_context(|| format!("failed to write output file: {}", opts.output.display()))?;

    if let Some(listing_path) = &opts.listing {
        let source_lines: Vec<&str> = source.lines().collect();
        let listing = assembler.get_listing(&source_lines);
        fs::write(listing_path, listing)
            .with_context(|| format!("failed to write listing file: {}", listing_path.display()))?;
    }

    println!("Successfully assembled {} to {}", opts.input.display(), opts.output.display());
    Ok(ExitCode::SUCCESS)
}

fn error_count(assembler: &zx16asm::Assembler) -> usize {
    assembler.errors.iter().filter(|d| d.severity == Severity::Error).count()
}
