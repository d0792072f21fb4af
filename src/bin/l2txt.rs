//! texwalk CLI - LaTeX to plain text

use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use texwalk::{
    default_latex_context, default_text_context,
    diagnostics::{check_latex, format_diagnostics, format_parse_error, Diagnostic},
    dump_tree, features::quotes::add_quotes, latex_to_text_output, ConversionWarning, ParseError,
    ParsingDb, TextDb, TextOptions, Walker,
};

#[derive(Parser)]
#[command(name = "l2txt")]
#[command(version)]
#[command(about = "texwalk - Convert LaTeX to plain text", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Keep comments in the output
    #[arg(long)]
    keep_comments: bool,

    /// Do not register the quotes vocabulary
    #[arg(long)]
    no_quotes: bool,

    /// Print the node tree instead of converting
    #[arg(long)]
    dump_tree: bool,

    /// Check mode - report parse errors and unknown names without converting
    #[arg(long)]
    check: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let use_color = !cli.no_color;

    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let (latex, text) = match build_contexts(!cli.no_quotes) {
        Ok(dbs) => dbs,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    };

    if cli.check {
        let result = check_latex(&input, &latex);
        println!("{}", format_diagnostics(&result, use_color));
        if result.has_errors() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if cli.dump_tree {
        match Walker::new(&input, &latex).parse() {
            Ok((nodes, _)) => print!("{}", dump_tree(&nodes)),
            Err(err) => fail(&input, &err, use_color),
        }
        return Ok(());
    }

    let options = TextOptions {
        keep_comments: cli.keep_comments,
        ..TextOptions::default()
    };
    let output = match latex_to_text_output(&input, &latex, &text, &options) {
        Ok(output) => output,
        Err(err) => fail(&input, &err, use_color),
    };

    if !cli.quiet && output.has_warnings() {
        print_warnings_to_stderr(&input, &output.warnings, use_color);
    }

    if cli.strict && output.has_warnings() {
        eprintln!(
            "Error: {} conversion warning(s) in strict mode",
            output.warnings.len()
        );
        std::process::exit(1);
    }

    match cli.output {
        Some(path) => {
            let mut file = fs::File::create(&path)?;
            writeln!(file, "{}", output.content)?;
            if output.has_warnings() {
                eprintln!(
                    "⚠ Output written to: {} ({} warning(s))",
                    path,
                    output.warnings.len()
                );
            } else {
                eprintln!("✓ Output written to: {}", path);
            }
        }
        None => {
            println!("{}", output.content);
        }
    }

    Ok(())
}

fn build_contexts(with_quotes: bool) -> Result<(ParsingDb, TextDb), texwalk::ConfigError> {
    let mut latex = default_latex_context();
    let mut text = default_text_context();
    if with_quotes {
        add_quotes(&mut latex, &mut text)?;
    }
    Ok((latex, text))
}

/// Print a parse error with its location and exit
fn fail(input: &str, err: &ParseError, use_color: bool) -> ! {
    let message = format_parse_error(input, err);
    if use_color {
        eprintln!("\x1b[31m{}\x1b[0m", message);
    } else {
        eprintln!("{}", message);
    }
    std::process::exit(1);
}

fn print_warnings_to_stderr(input: &str, warnings: &[ConversionWarning], use_color: bool) {
    eprintln!();
    eprintln!(
        "{}Conversion Warnings ({}):{}",
        if use_color { "\x1b[33m" } else { "" },
        warnings.len(),
        if use_color { "\x1b[0m" } else { "" }
    );
    eprintln!();

    for warning in warnings {
        let diag = Diagnostic::from_warning(input, warning);
        match (diag.line, diag.column) {
            (Some(line), Some(col)) => eprintln!("  line {}:{}: {}", line, col, diag.message),
            _ => eprintln!("  {}", diag.message),
        }
    }
    eprintln!();
}
