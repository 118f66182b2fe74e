//! Backend: TAC → Assembly IR → AT&T text (`spec.md` §4.5).

mod asm;
mod emit;
mod fixup;
mod frame;
mod lower;

pub use asm::{AsmFunction, AsmProgram, Condition, Instruction, Operand, RegisterId};
pub use emit::{emit_program, Target};
pub use fixup::fixup_function;
pub use frame::StackFrame;
pub use lower::lower_program;
use nanoc_tac::TacProgram;

/// Run the whole backend: lower, fix up invalid operand combinations, then
/// emit AT&T-syntax text for `target`.
pub fn generate(tac: TacProgram, target: Target) -> String {
    let mut program = lower_program(tac);
    fixup_function(&mut program.function);
    emit_program(&program, target)
}
