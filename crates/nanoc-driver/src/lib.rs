//! Driver: wires the lexer, parser, resolver, TAC generator and backend
//! into one pipeline, plus the `cc` hand-off (`spec.md` §6, §7).

pub mod cli;
mod dump;
mod toolchain;

use anyhow::Context;
use cli::{Cli, Stage};
use nanoc_lex::{Lexer, Token, TokenKind};
use std::path::PathBuf;

fn lex_all(source: &str) -> Result<Vec<Token<'_>>, nanoc_lex::LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            break;
        }
    }
    Ok(tokens)
}

/// Run the full pipeline for one invocation and return the process exit
/// code (`spec.md` §6 "Exit codes"): `0` on success, `1` on any compiler
/// error, or the child's exit code when `--run` observes a non-zero exit.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot open source file {}", cli.input.display()))?;

    let tokens = match lex_all(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            return Ok(1);
        }
    };
    if let Some(path) = &cli.dump_tokens {
        let explicit = (!path.is_empty()).then(|| PathBuf::from(path));
        dump::dump_tokens(&tokens, &cli.input, explicit.as_deref())?;
    }
    if cli.stage() == Stage::Lex {
        tracing::info!("stopped after lexing");
        return Ok(0);
    }

    let program = match nanoc_par::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            return Ok(1);
        }
    };
    if let Some(format) = &cli.dump_ast {
        dump::dump_ast(&program, format, &cli.input, cli.dump_ast_path.as_deref())?;
    }
    if cli.stage() == Stage::Parse {
        tracing::info!("stopped after parsing");
        return Ok(0);
    }

    let (resolved, handler) = nanoc_sem::resolve(program);
    if handler.has_errors() {
        for diag in handler.diagnostics().iter() {
            eprintln!("Semantic Error: {} at {}:{}", diag.message, diag.span.line, diag.span.column);
        }
        return Ok(1);
    }
    if cli.stage() == Stage::Validate {
        tracing::info!("stopped after semantic analysis");
        return Ok(0);
    }

    let tac = nanoc_tac::lower_program(resolved);
    if let Some(format) = &cli.dump_tacky {
        dump::dump_tacky(&tac, format, &cli.input, cli.dump_tacky_path.as_deref())?;
    }
    if cli.stage() == Stage::Tacky {
        tracing::info!("stopped after TAC generation");
        return Ok(0);
    }

    let target = nanoc_asm::Target::host();
    let asm_text = nanoc_asm::generate(tac, target);
    if cli.stage() == Stage::Codegen {
        tracing::info!("stopped after code generation");
        return Ok(0);
    }

    if cli.emit_asm {
        let out_path = cli.input.with_extension("s");
        std::fs::write(&out_path, &asm_text)
            .with_context(|| format!("cannot write assembly output {}", out_path.display()))?;
        tracing::info!(path = %out_path.display(), "wrote assembly");
        return Ok(0);
    }

    let binary_path = cli.input.with_extension("out");
    toolchain::assemble_and_link(&asm_text, &binary_path, target)?;
    tracing::info!(path = %binary_path.display(), "wrote binary");

    if cli.run {
        let code = toolchain::run_binary(&binary_path)?;
        println!("Program exited with code {code}");
        return Ok(code);
    }

    Ok(0)
}
