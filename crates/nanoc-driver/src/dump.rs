//! Optional token/AST/TAC dumps (`spec.md` §6 "Dumpers").
//!
//! These are side outputs only; nothing downstream reads them back in.

use anyhow::Context;
use nanoc_lex::Token;
use nanoc_par::ast::Program;
use nanoc_tac::TacProgram;
use std::fs;
use std::path::{Path, PathBuf};

fn basename(input: &Path) -> String {
    input.file_stem().and_then(|s| s.to_str()).unwrap_or("out").to_string()
}

/// `./out/<basename>.<suffix>`, unless the caller gave an explicit path.
fn default_path(input: &Path, suffix: &str, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("out").join(format!("{}.{suffix}", basename(input))))
}

fn write_dump(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create dump directory {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("cannot write dump file {}", path.display()))
}

pub fn dump_tokens(tokens: &[Token<'_>], input: &Path, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = default_path(input, "tokens", explicit);
    let mut out = String::new();
    for tok in tokens {
        out.push_str(&format!(
            "{:?} {:?} @ {}:{}\n",
            tok.kind, tok.lexeme, tok.span.line, tok.span.column
        ));
    }
    write_dump(&path, &out)
}

pub fn dump_ast(program: &Program, format: &str, input: &Path, explicit: Option<&Path>) -> anyhow::Result<()> {
    match format {
        "json" => {
            let path = default_path(input, "ast.json", explicit);
            let text = serde_json::to_string_pretty(program)?;
            write_dump(&path, &text)
        }
        "dot" => {
            let path = default_path(input, "ast.dot", explicit);
            let escaped = format!("{program:#?}").replace('"', "\\\"").replace('\n', "\\l");
            let text = format!("digraph AST {{\n  n0 [shape=box label=\"{escaped}\"];\n}}\n");
            write_dump(&path, &text)
        }
        _ => {
            let path = default_path(input, "ast.txt", explicit);
            write_dump(&path, &format!("{program:#?}\n"))
        }
    }
}

pub fn dump_tacky(tac: &TacProgram, format: &str, input: &Path, explicit: Option<&Path>) -> anyhow::Result<()> {
    match format {
        "json" => {
            let path = default_path(input, "tacky.json", explicit);
            let text = serde_json::to_string_pretty(tac)?;
            write_dump(&path, &text)
        }
        _ => {
            let path = default_path(input, "tacky.txt", explicit);
            write_dump(&path, &format!("{tac:#?}\n"))
        }
    }
}
