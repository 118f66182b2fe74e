//! Mandatory x86-64 operand fix-ups (`spec.md` §4.5 "Operand fix-ups").

use crate::asm::{AsmFunction, Instruction, Operand, RegisterId};

pub fn fixup_function(function: &mut AsmFunction) {
    let mut fixed = Vec::with_capacity(function.instructions.len());
    for instr in function.instructions.drain(..) {
        fixup_instr(instr, &mut fixed);
    }
    function.instructions = fixed;
}

fn fixup_instr(instr: Instruction, out: &mut Vec<Instruction>) {
    match instr {
        Instruction::Mov(src, dst) if src.is_memory() && dst.is_memory() => {
            let scratch = Operand::Register(RegisterId::R11d);
            out.push(Instruction::Mov(src, scratch));
            out.push(Instruction::Mov(scratch, dst));
        }
        Instruction::Cmp(src, dst) if dst.is_immediate() => {
            let scratch = Operand::Register(RegisterId::R11d);
            out.push(Instruction::Mov(dst, scratch));
            out.push(Instruction::Cmp(src, scratch));
        }
        Instruction::Cmp(src, dst) if src.is_memory() && dst.is_memory() => {
            let scratch = Operand::Register(RegisterId::R10d);
            out.push(Instruction::Mov(dst, scratch));
            out.push(Instruction::Cmp(src, scratch));
        }
        other => out.push(other),
    }
}
