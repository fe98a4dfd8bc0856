use std::{error::Error, fs, process};

use clap::Parser as _;
use mathtree::{Parser, ParserConfig};

/// mathtree evaluates mathematical expressions, including sums and integrals
/// such as `summ{i=1..n}{i^2}` or `∫(x=0..1){x^2}`.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells mathtree to read the expression from a file.
    #[arg(short, long)]
    file: bool,

    /// Assigns a variable before evaluation, as `name=value`.
    #[arg(short = 'v', long = "var", value_parser = parse_binding)]
    vars: Vec<(String, f64)>,

    /// Evaluates through the compiled stack program instead of the tree.
    #[arg(long)]
    compile: bool,

    /// Prints the expression as it was understood instead of its value.
    #[arg(long)]
    tree: bool,

    /// The decimal separator.
    #[arg(long, default_value_t = '.')]
    decimal_separator: char,

    /// The separator between function arguments.
    #[arg(long, default_value_t = ',')]
    argument_separator: char,

    /// Logs parse and compilation details.
    #[arg(long)]
    verbose: bool,

    contents: String,
}

fn parse_binding(binding: &str) -> Result<(String, f64), String> {
    let (name, value) = binding.split_once('=')
                               .ok_or_else(|| format!("expected name=value, found '{binding}'"))?;
    let value = value.trim()
                     .parse::<f64>()
                     .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let source = if args.file {
        fs::read_to_string(&args.contents).map_err(|e| {
                                               format!("Failed to read the input file '{}': {e}",
                                                       args.contents)
                                           })?
    } else {
        args.contents
    };

    let config = ParserConfig { decimal_separator: args.decimal_separator,
                                argument_separator: args.argument_separator,
                                ..ParserConfig::default() };
    let expression = Parser::with_config(config)?.parse(&source)?;

    for (name, value) in &args.vars {
        expression.set(name, *value)?;
    }

    if args.tree {
        println!("{expression}");
        return Ok(());
    }

    let value = if args.compile {
        let parameters = expression.variables();
        let arguments: Vec<f64> = parameters.iter()
                                            .filter_map(|name| expression.variable(name))
                                            .map(mathtree::symbols::variable::Variable::value)
                                            .collect();
        expression.compile(&parameters)?.call(&arguments)?
    } else {
        expression.evaluate()
    };
    println!("{value}");
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args) {
        eprintln!("{e}");
        process::exit(1);
    }
}
