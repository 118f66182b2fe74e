//! Command-line surface (`spec.md` §6 "External interfaces").

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "nanoc",
    version,
    about = "A batch compiler for a small C subset, targeting x86-64 AT&T assembly."
)]
pub struct Cli {
    /// Source file to compile.
    pub input: PathBuf,

    /// Stop after lexing.
    #[arg(long, group = "stage")]
    pub lex: bool,
    /// Stop after parsing.
    #[arg(long, group = "stage")]
    pub parse: bool,
    /// Stop after resolution (semantic analysis).
    #[arg(long, group = "stage")]
    pub validate: bool,
    /// Stop after three-address-code generation.
    #[arg(long, group = "stage")]
    pub tacky: bool,
    /// Stop after assembly-IR generation, before text emission.
    #[arg(long, group = "stage")]
    pub codegen: bool,

    /// Emit `<basename>.s` next to the source instead of invoking `cc`.
    #[arg(short = 'S')]
    pub emit_asm: bool,

    /// Suppress informational logging.
    #[arg(long)]
    pub quiet: bool,

    /// Run the produced binary after a successful full compile.
    #[arg(long)]
    pub run: bool,

    /// Dump the token stream. With no path, writes under `./out/`.
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "", require_equals = true)]
    pub dump_tokens: Option<String>,

    /// Dump the AST as `txt`, `dot`, or `json`.
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "txt", require_equals = true)]
    pub dump_ast: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub dump_ast_path: Option<PathBuf>,

    /// Dump the generated TAC as `txt` or `json`.
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "txt", require_equals = true)]
    pub dump_tacky: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub dump_tacky_path: Option<PathBuf>,
}

/// The pipeline stage this invocation stops after, derived from the
/// mutually-exclusive `--lex`/`--parse`/`--validate`/`--tacky`/`--codegen`
/// flags (`spec.md` §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Validate,
    Tacky,
    Codegen,
    Full,
}

impl Cli {
    pub fn stage(&self) -> Stage {
        if self.lex {
            Stage::Lex
        } else if self.parse {
            Stage::Parse
        } else if self.validate {
            Stage::Validate
        } else if self.tacky {
            Stage::Tacky
        } else if self.codegen {
            Stage::Codegen
        } else {
            Stage::Full
        }
    }
}
