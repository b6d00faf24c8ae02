use std::fs;
use std::path::PathBuf;
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use serde::Deserialize;

use annotype_common::SyntaxError;
use annotype_compiler::convert::{convert_type_list, UNTYPED};
use annotype_compiler::lexer::Tokenizer;
use annotype_compiler::parser;

/// Annotation signature compiler.
///
/// Reads documented type annotations and emits declarations in the
/// signature syntax consumed by a gradual type checker.
#[derive(Parser)]
#[command(
    name = "annotypec",
    version,
    about,
    long_about = "Annotation signature compiler.\n\nReads {name, types} annotation entries (JSON) and emits one `name: Type`\ndeclaration per entry in the signature syntax of the gradual type checker.\nAn entry whose annotations fail to parse falls back to Untyped.\n\nExamples:\n  annotypec params.json               Emit declarations to stdout\n  annotypec params.json -o params.sig Write declarations to a file\n  annotypec -e 'Array<String>' -e nil Convert an ad-hoc annotation list\n  annotypec params.json --check       Validate annotations only"
)]
struct Cli {
    /// Input JSON file: [{"name": ..., "types": [...]}, ...].
    input: Option<PathBuf>,

    /// Convert an ad-hoc annotation list instead of reading a file
    /// (repeatable; all occurrences form one list).
    #[arg(short, long)]
    expr: Vec<String>,

    /// Output file path (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validate annotations without emitting declarations.
    #[arg(long)]
    check: bool,

    /// Emit the token stream of each annotation to stdout (debug).
    #[arg(long = "emit-tokens")]
    emit_tokens: bool,

    /// Emit the parsed type trees of each annotation to stdout (debug).
    #[arg(long = "emit-tree")]
    emit_tree: bool,
}

/// One documented parameter, return value, or attribute, with the raw
/// annotation strings collected for it.
#[derive(Debug, Deserialize)]
struct Entry {
    name: String,
    types: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let entries: Vec<Entry> = if !cli.expr.is_empty() {
        vec![Entry {
            name: "expr".to_string(),
            types: cli.expr.clone(),
        }]
    } else if let Some(ref input) = cli.input {
        let raw = match fs::read_to_string(input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: could not read '{}': {}", input.display(), e);
                process::exit(1);
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "error: '{}' is not a valid annotation file: {}",
                    input.display(),
                    e
                );
                process::exit(1);
            }
        }
    } else {
        eprintln!("error: provide an annotation file or at least one --expr");
        process::exit(1);
    };

    if cli.emit_tokens {
        for entry in &entries {
            for annotation in &entry.types {
                println!("{} {:?}", entry.name, annotation);
                match Tokenizer::new(annotation).tokenize() {
                    Ok(tokens) => {
                        for token in &tokens {
                            println!(
                                "{:>4}:{:<3} {:?} {:?}",
                                token.span.start.line,
                                token.span.start.column,
                                token.kind,
                                token.lexeme,
                            );
                        }
                    }
                    Err(err) => print_syntax_error(&entry.name, annotation, &err),
                }
            }
        }
        return;
    }

    if cli.emit_tree {
        for entry in &entries {
            for annotation in &entry.types {
                println!("{} {:?}", entry.name, annotation);
                match parser::parse(annotation) {
                    Ok(nodes) => println!("{:#?}", nodes),
                    Err(err) => print_syntax_error(&entry.name, annotation, &err),
                }
            }
        }
        return;
    }

    // === Conversion ===
    // A failure in one entry is not fatal: report it, fall back to the
    // unconstrained type, and keep going.
    let mut failed = 0usize;
    let mut lines = Vec::new();
    for entry in &entries {
        match convert_type_list(&entry.types) {
            Ok(signature) if !signature.is_empty() => {
                lines.push(format!("{}: {}", entry.name, signature));
            }
            Ok(_) => {
                // No annotations at all; nothing to constrain.
                lines.push(format!("{}: {}", entry.name, UNTYPED));
            }
            Err(err) => {
                failed += 1;
                // The converter stops at the first bad string; find it for
                // the report.
                let offender = entry
                    .types
                    .iter()
                    .find(|t| parser::parse(t).is_err())
                    .map(String::as_str)
                    .unwrap_or("");
                print_syntax_error(&entry.name, offender, &err);
                lines.push(format!("{}: {}", entry.name, UNTYPED));
            }
        }
    }

    if cli.check {
        if failed > 0 {
            eprintln!(
                "{} of {} entries failed to parse.",
                failed,
                entries.len()
            );
            process::exit(1);
        }
        println!("No errors found.");
        return;
    }

    let listing = lines.join("\n") + "\n";
    match cli.output {
        Some(path) => match fs::write(&path, &listing) {
            Ok(()) => {
                println!(
                    "Wrote {} declarations to {}",
                    lines.len(),
                    path.display()
                );
            }
            Err(e) => {
                eprintln!("error: could not write '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => print!("{}", listing),
    }
}

fn print_syntax_error(origin: &str, annotation: &str, err: &SyntaxError) {
    let span = err.span();
    let start = span.start.offset as usize;
    let end = (span.end.offset as usize).max(start + 1);

    Report::build(ReportKind::Error, origin, start)
        .with_message(err.to_string())
        .with_label(
            Label::new((origin, start..end))
                .with_message(err.to_string())
                .with_color(Color::Red),
        )
        .with_help(format!("this entry falls back to {}", UNTYPED))
        .finish()
        .eprint((origin, Source::from(annotation)))
        .unwrap();
}
