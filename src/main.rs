//! tease's main application entry point and orchestration logic.
//! Handles command-line argument parsing, loading of the steps file,
//! and output of the script or its documentation.

use log::debug;
use tease::{
    cli::{get_args, parse_options, Args, Filters},
    context::{load_variables, Context},
    docs::to_docs,
    error::{default_error_handler, Result},
    loader::{filter_steps, Loader},
    script::{to_script, write_output},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.debug { log::LevelFilter::Debug } else { log::LevelFilter::Warn })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Builds the global context from the variables file and `--context` tokens
/// 2. Loads the steps file and resolves every step
/// 3. Applies `--filter` selections
/// 4. Prints the script or the documentation, and writes it when asked
fn run(args: Args) -> Result<()> {
    debug!("{args:?}");

    let mut context = match &args.variables_file {
        Some(path) => load_variables(path, args.environment.as_deref())?,
        None => Context::new(),
    };
    for token in &args.context {
        context.add_token(token);
    }

    let filters = Filters::from_tokens(&args.filters)?;
    let options = parse_options(&args.options);

    let mut loader = Loader::new(&args.path, args.profile)
        .with_context(context)
        .with_locations(args.template_paths.clone())
        .with_options(options);
    loader.load()?;

    let mut steps = loader.get_steps()?;
    if !filters.is_empty() {
        steps = filter_steps(steps, filters.environments.as_deref(), filters.tags.as_deref());
    }

    let output = match args.docs {
        Some(format) => to_docs(&steps, format),
        None => to_script(&steps),
    };
    println!("{output}");

    if let Some(path) = &args.write {
        write_output(path, &output)?;
    }
    Ok(())
}
