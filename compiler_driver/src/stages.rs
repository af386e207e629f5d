use colored::Colorize;
use grammar::Grammar;
use parser::ast::{DeclKind, Module};
use shared_context::interner::Interner;
use shared_context::source_map::SourceMap;
use shared_context::{Diagnostics, Severity};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Tokenizes the file and prints every token with its lexeme (spec §6
/// `--lex`). Stops at the first unrecognized character, matching the
/// lexer's own "no recovery within a token" contract.
pub fn lex_stage(file_path: &PathBuf) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(file_path)?;
    let mut lexer = lexer::Lexer::new(&source);

    while let Some(result) = lexer.next() {
        match result {
            Ok(tok) => println!("{:>4?}  {:?}", tok.get_token(), tok.get_lexeme()),
            Err(e) => {
                eprintln!("{} {e}", "lex error:".red().bold());
                return Ok(());
            }
        }
    }
    Ok(())
}

/// Parses the file and prints a one-line-per-declaration summary (spec §6
/// `--parse`). `dump_ast` prints the full arena dump instead of the summary.
pub fn parse_stage(file_path: &PathBuf, file_name: &str, dump_ast: bool) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(file_path)?;
    let arena = shared_context::Bump::new();
    let mut interner = Interner::new(&arena);
    let source_map = SourceMap::new(file_name, &source);
    let lexer = lexer::Lexer::new(&source);

    let module = parser::parse(lexer, &mut interner, &source_map, file_path.clone())?;

    if dump_ast {
        print_ast(&module, &interner);
    } else {
        print_declarations(&module, &interner);
    }
    Ok(())
}

/// Parses and runs every semantic pass to a fixed point, then prints each
/// top-level scope's bindings (spec §6 `--scopes`).
pub fn scopes_stage(file_path: &PathBuf, file_name: &str, dump_ast: bool) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(file_path)?;
    let arena = shared_context::Bump::new();
    let mut interner = Interner::new(&arena);
    let source_map = SourceMap::new(file_name, &source);
    let lexer = lexer::Lexer::new(&source);

    let mut module = parser::parse(lexer, &mut interner, &source_map, file_path.clone())?;
    let mut diagnostics = Diagnostics::new();
    let outcome = semantic_analysis::finalize(&mut module, &mut interner, &mut diagnostics, file_name);

    print_diagnostics(&diagnostics, &source_map);
    if let Err(e) = outcome {
        eprintln!("{} {e:?}", "semantic analysis failed:".red().bold());
    }

    if dump_ast {
        print_ast(&module, &interner);
    } else {
        print_declarations(&module, &interner);
    }
    std::process::exit(diagnostics.exit_code());
}

/// Runs the full front end through grammar derivation and prints every
/// unit's production/FIRST/FOLLOW tables (spec §6 `--grammar`).
pub fn grammar_stage(file_path: &PathBuf, file_name: &str, verbose: bool) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(file_path)?;
    let arena = shared_context::Bump::new();
    let mut interner = Interner::new(&arena);
    let source_map = SourceMap::new(file_name, &source);
    let lexer = lexer::Lexer::new(&source);

    let mut module = parser::parse(lexer, &mut interner, &source_map, file_path.clone())?;
    let mut diagnostics = Diagnostics::new();
    semantic_analysis::finalize(&mut module, &mut interner, &mut diagnostics, file_name)
        .map_err(|e| format!("semantic analysis failed: {e:?}"))?;
    print_diagnostics(&diagnostics, &source_map);

    let (grammar, grammar_errors) = Grammar::build(&module, &interner);
    let mut out = String::new();
    grammar.print_tables(&grammar_errors, &mut out, verbose)?;
    print!("{out}");

    if !grammar_errors.is_empty() {
        eprintln!("{} {} unit(s) failed grammar derivation", "warning:".yellow().bold(), grammar_errors.len());
    }
    std::process::exit(diagnostics.exit_code());
}

/// No stage flag given: run lexer through grammar derivation and report
/// only pass/fail plus diagnostics — the default "does this compile" mode.
pub fn full_pipeline(file_path: &PathBuf, file_name: &str) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(file_path)?;
    let arena = shared_context::Bump::new();
    let mut interner = Interner::new(&arena);
    let source_map = SourceMap::new(file_name, &source);
    let lexer = lexer::Lexer::new(&source);

    let mut module = parser::parse(lexer, &mut interner, &source_map, file_path.clone())?;
    let mut diagnostics = Diagnostics::new();
    semantic_analysis::finalize(&mut module, &mut interner, &mut diagnostics, file_name)
        .map_err(|e| format!("semantic analysis failed: {e:?}"))?;

    let (_, grammar_errors) = Grammar::build(&module, &interner);
    for (unit_id, err) in &grammar_errors {
        diagnostics.error(file_name, shared_context::Span::new(0, 0, 0), format!("unit#{}: {err}", unit_id.0));
    }

    print_diagnostics(&diagnostics, &source_map);
    if !diagnostics.has_errors() {
        println!("{}", "ok".green().bold());
    }
    std::process::exit(diagnostics.exit_code());
}

fn print_diagnostics(diagnostics: &Diagnostics, source_map: &SourceMap) {
    for d in diagnostics.iter() {
        let line = d.with_excerpt(source_map);
        match d.severity {
            Severity::Error | Severity::Internal => eprintln!("{}", line.red()),
            Severity::Warning => eprintln!("{}", line.yellow()),
        }
    }
}

fn print_declarations(module: &Module, interner: &Interner) {
    for decl_id in module.decl_ids() {
        let decl = module.decl(decl_id);
        let name = interner.lookup(decl.id.get_symbol());
        let kind = match &decl.kind {
            DeclKind::Variable { .. } => "variable",
            DeclKind::Constant { .. } => "constant",
            DeclKind::Type { .. } => "type",
            DeclKind::Function { .. } => "function",
            DeclKind::Hook { .. } => "hook",
        };
        println!("{kind:<9} {name}");
    }
}

fn print_ast(module: &Module, interner: &Interner) {
    for decl_id in module.decl_ids() {
        let decl = module.decl(decl_id);
        println!("Declaration({}) {}", decl_id.0, interner.lookup(decl.id.get_symbol()));
        print_decl_kind(module, interner, &decl.kind, 1);
    }
}

fn print_decl_kind(module: &Module, interner: &Interner, kind: &DeclKind, depth: usize) {
    let pad = "  ".repeat(depth);
    match kind {
        DeclKind::Type { ty } => println!("{pad}TypeExpr({})", ty.0),
        DeclKind::Constant { value, .. } => println!("{pad}Expr({})", value.0),
        DeclKind::Variable { init, .. } => {
            if let Some(init) = init {
                println!("{pad}Expr({})", init.0);
            }
        }
        DeclKind::Function { function } => {
            let func = module.function(*function);
            println!("{pad}params={} result=TypeExpr({})", func.params.len(), func.result.0);
        }
        DeclKind::Hook { hook } => println!("{pad}Hook({})", hook.0),
    }
    let _ = interner;
}
