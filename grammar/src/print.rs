use crate::error::GrammarError;
use crate::production::{Production, ProdId, Terminal};
use crate::Grammar;
use parser::ast::UnitId;
use std::fmt::Write;

pub(crate) fn print_tables(
    grammar: &Grammar,
    errors: &[(UnitId, GrammarError)],
    out: &mut impl Write,
    verbose: bool,
) -> std::fmt::Result {
    for unit_id in grammar.units() {
        let start = grammar.start_of(unit_id).expect("unit is in `starts`");
        writeln!(out, "unit {}:", grammar.production(start).label())?;

        let order = crate::sets::reachable(start, &grammar.productions);
        for id in order {
            print_production(grammar, id, out, verbose)?;
        }

        for (err_unit, err) in errors {
            if *err_unit == unit_id {
                for message in err.messages() {
                    writeln!(out, "  error: {message}")?;
                }
            }
        }
    }
    Ok(())
}

fn print_production(grammar: &Grammar, id: ProdId, out: &mut impl Write, verbose: bool) -> std::fmt::Result {
    let p = grammar.production(id);
    let children: Vec<String> = p.children().iter().map(|c| c.0.to_string()).collect();
    writeln!(out, "  [{}] {} {} -> {}", id.0, p.kind_name(), p.label(), children.join(" "))?;

    if verbose {
        writeln!(out, "      first:  {}", format_terminals(&grammar.first(id)))?;
        writeln!(out, "      follow: {}", format_terminals(&grammar.follow(id)))?;
        if let Production::LookAhead { a, b, .. } = p {
            writeln!(out, "      la(a={}): {}", a.0, format_terminals(&grammar.first(*a)))?;
            writeln!(out, "      la(b={}): {}", b.0, format_terminals(&grammar.first(*b)))?;
        }
    }
    Ok(())
}

fn format_terminals(set: &std::collections::BTreeSet<Terminal>) -> String {
    let parts: Vec<String> = set
        .iter()
        .map(|t| match t {
            Terminal::EndOfInput => "$".to_string(),
            Terminal::Node(id) => id.0.to_string(),
        })
        .collect();
    format!("{{{}}}", parts.join(", "))
}
