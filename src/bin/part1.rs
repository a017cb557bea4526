use anyhow::{Context, Result};
use chronospatial::{computer, format_output, CLIArgs};
use clap::Parser;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    chronospatial::init_logger(args.input.debug);
    let (registers, program) = chronospatial::read_debug_info(&args.input.input_path)
        .with_context(|| {
            format!(
                "Failed to read debug information from given file({}).",
                args.input.input_path.display()
            )
        })?;

    let output = computer::run_program(registers, &program)?;
    println!("part 1: {}", format_output(&output));

    Ok(())
}
