/// Sigil Tracer - Shows the flow through Document → Blocks → Tokens → AST
///
/// Usage: cargo run --bin trace_parser <file>
use sigil_dsl::extract::extract_blocks;
use sigil_dsl::lexer::Lexer;
use sigil_dsl::parser::parse;
use std::fs;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin trace_parser <file>");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --bin trace_parser notes/model.md");
        std::process::exit(1);
    }

    let path = &args[1];
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════");
    println!("║ SIGIL PARSER TRACER");
    println!("╚═══════════════════════════════════════════════════════════════\n");

    let mut blocks = extract_blocks(&content);
    if blocks.is_empty() {
        // No prose boundaries found; treat the whole file as one block.
        blocks.push(sigil_dsl::Block {
            text: content.clone(),
            line: 1,
        });
    }

    for (i, block) in blocks.iter().enumerate() {
        println!("── Block {} (line {}) ──────────────────────────────────", i + 1, block.line);
        println!("{}\n", block.text);

        println!("TOKENS:");
        match Lexer::new(&block.text).tokenize() {
            Ok(tokens) => {
                for token in &tokens {
                    println!(
                        "  {:>3}:{:<3} {:?} {:?}",
                        token.span.line, token.span.column, token.kind, token.text
                    );
                }
            }
            Err(e) => {
                println!("  Lexical error: {}", e);
                println!();
                continue;
            }
        }
        println!();

        println!("AST:");
        match parse(&block.text) {
            Ok(outcome) => {
                match serde_json::to_string_pretty(&outcome.declarations) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("  (serialization failed: {})", e),
                }
                if outcome.errors.is_empty() {
                    println!("\nParse succeeded: {} declaration(s)", outcome.declarations.len());
                } else {
                    println!("\nParse finished with {} error(s):", outcome.errors.len());
                    for err in &outcome.errors {
                        println!("  - {}", err);
                    }
                }
            }
            Err(e) => {
                println!("  Fatal parse error: {}", e);
            }
        }
        println!();
    }
}
