use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

mod stages;

/// BinPAC++ front-end driver (spec §6 "External interfaces"). With no stage
/// flag, runs the whole pipeline and reports pass/fail; a stage flag stops
/// early and inspects that stage's output instead.
#[derive(Parser)]
struct Cli {
    file_path: PathBuf,

    /// Tokenize only.
    #[arg(long, group = "stage")]
    lex: bool,

    /// Parse only — no semantic analysis.
    #[arg(long, group = "stage")]
    parse: bool,

    /// Parse and run semantic analysis to a fixed point, then print scopes.
    #[arg(long, group = "stage")]
    scopes: bool,

    /// Run the full front end and print every unit's grammar tables.
    #[arg(long, group = "stage")]
    grammar: bool,

    /// Print the full AST instead of a one-line-per-declaration summary.
    #[arg(long)]
    dump_ast: bool,

    /// Include FIRST/FOLLOW/lookahead sets in `--grammar`'s table dump.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let file_name = cli
        .file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file_path.to_string_lossy().into_owned());

    let result = if cli.lex {
        stages::lex_stage(&cli.file_path)
    } else if cli.parse {
        stages::parse_stage(&cli.file_path, &file_name, cli.dump_ast)
    } else if cli.scopes {
        stages::scopes_stage(&cli.file_path, &file_name, cli.dump_ast)
    } else if cli.grammar {
        stages::grammar_stage(&cli.file_path, &file_name, cli.verbose)
    } else {
        stages::full_pipeline(&cli.file_path, &file_name)
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}
