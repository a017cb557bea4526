use anyhow::{anyhow, Context, Result};
use chronospatial::{search, SearchCLIArgs};
use clap::Parser;

fn main() -> Result<()> {
    let args = SearchCLIArgs::parse();
    chronospatial::init_logger(args.input.debug);
    let (registers, program) = chronospatial::read_debug_info(&args.input.input_path)
        .with_context(|| {
            format!(
                "Failed to read debug information from given file({}).",
                args.input.input_path.display()
            )
        })?;

    let register_a = search::find_quine(
        registers,
        &program,
        args.search.strategy,
        args.search.max_candidates,
    )?
    .ok_or_else(|| anyhow!("Can't find any value of register A that makes the program output itself."))?;
    println!("part 2: {}", register_a);

    Ok(())
}
