//! Child-process glue: driving the host `cc` and, for `--run`, the
//! produced binary (`spec.md` §6 "Command line").

use anyhow::{bail, Context};
use nanoc_asm::Target;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Pipe `asm_text` into `cc -x assembler - -o <output>`, with the
/// platform-specific flags `spec.md` §6 requires.
pub fn assemble_and_link(asm_text: &str, output: &Path, target: Target) -> anyhow::Result<()> {
    let mut cmd = Command::new("cc");
    cmd.arg("-x").arg("assembler").arg("-").arg("-o").arg(output);
    match target {
        Target::MachO => {
            cmd.arg("-arch").arg("x86_64");
        }
        Target::Elf => {
            cmd.arg("-m64").arg("-no-pie");
        }
    }
    cmd.stdin(Stdio::piped());

    tracing::debug!(?cmd, "invoking cc");
    let mut child = cmd.spawn().context("failed to spawn `cc`; is it on PATH?")?;
    child
        .stdin
        .take()
        .expect("stdin was piped")
        .write_all(asm_text.as_bytes())
        .context("failed to write assembly to cc's stdin")?;
    let status = child.wait().context("failed waiting for cc to exit")?;
    if !status.success() {
        bail!("cc exited with status {status}");
    }
    Ok(())
}

/// Run the produced binary and return its exit code, per `--run`'s
/// `Program exited with code <n>` contract.
pub fn run_binary(path: &Path) -> anyhow::Result<i32> {
    let absolute = if path.is_absolute() { path.to_path_buf() } else { Path::new(".").join(path) };
    let status = Command::new(&absolute)
        .status()
        .with_context(|| format!("failed to execute {}", absolute.display()))?;
    Ok(status.code().unwrap_or(1))
}
