//! AT&T-syntax text emission (`spec.md` §4.5 "Text emission").

use crate::asm::{AsmFunction, AsmProgram, Condition, Instruction, Operand, RegisterId};
use std::fmt::Write;

/// The host object-file convention, which governs symbol and label
/// spelling and the `cc` flags the driver passes downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Elf,
    MachO,
}

impl Target {
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Target::MachO
        } else {
            Target::Elf
        }
    }

    fn global_prefix(self) -> &'static str {
        match self {
            Target::Elf => "",
            Target::MachO => "_",
        }
    }

    fn local_prefix(self) -> &'static str {
        match self {
            Target::Elf => ".L",
            Target::MachO => "L",
        }
    }
}

pub fn emit_program(program: &AsmProgram, target: Target) -> String {
    let mut out = String::new();
    emit_function(&program.function, target, &mut out);
    out
}

fn emit_function(function: &AsmFunction, target: Target, out: &mut String) {
    let name = function.name;
    let prefix = target.global_prefix();
    let _ = writeln!(out, ".globl {prefix}{name}");
    let _ = writeln!(out, "{prefix}{name}:");
    let _ = writeln!(out, "\tpushq\t%rbp");
    let _ = writeln!(out, "\tmovq\t%rsp, %rbp");
    if function.stack_size != 0 {
        let _ = writeln!(out, "\tsubq\t${}, %rsp", function.stack_size);
    }
    for instr in &function.instructions {
        emit_instruction(instr, target, out);
    }
}

fn emit_instruction(instr: &Instruction, target: Target, out: &mut String) {
    match instr {
        Instruction::Mov(src, dst) => {
            let _ = writeln!(out, "\tmovl\t{}, {}", operand32(src), operand32(dst));
        }
        Instruction::Neg(op) => {
            let _ = writeln!(out, "\tnegl\t{}", operand32(op));
        }
        Instruction::Not(op) => {
            let _ = writeln!(out, "\tnotl\t{}", operand32(op));
        }
        Instruction::AddEcxEax => {
            let _ = writeln!(out, "\taddl\t%ecx, %eax");
        }
        Instruction::SubEaxEcx => {
            let _ = writeln!(out, "\tsubl\t%eax, %ecx");
        }
        Instruction::ImulEcxEax => {
            let _ = writeln!(out, "\timull\t%ecx, %eax");
        }
        Instruction::XchgEaxEcx => {
            let _ = writeln!(out, "\txchgl\t%eax, %ecx");
        }
        Instruction::Cltd => {
            let _ = writeln!(out, "\tcltd");
        }
        Instruction::IdivEcx => {
            let _ = writeln!(out, "\tidivl\t%ecx");
        }
        Instruction::MovEdxEax => {
            let _ = writeln!(out, "\tmovl\t%edx, %eax");
        }
        Instruction::Cmp(a, b) => {
            let _ = writeln!(out, "\tcmpl\t{}, {}", operand32(a), operand32(b));
        }
        Instruction::SetCC(cond, dst) => {
            let _ = writeln!(out, "\tset{}\t{}", cc_suffix(*cond), operand8(dst));
        }
        Instruction::Jmp(label) => {
            let _ = writeln!(out, "\tjmp\t{}{}", target.local_prefix(), label);
        }
        Instruction::JCC(cond, label) => {
            let _ = writeln!(out, "\tj{}\t{}{}", cc_suffix(*cond), target.local_prefix(), label);
        }
        Instruction::Label(name) => {
            let _ = writeln!(out, "{}{}:", target.local_prefix(), name);
        }
        Instruction::Ret => {
            let _ = writeln!(out, "\tleave");
            let _ = writeln!(out, "\tret");
        }
    }
}

fn cc_suffix(cond: Condition) -> &'static str {
    match cond {
        Condition::E => "e",
        Condition::Ne => "ne",
        Condition::L => "l",
        Condition::Le => "le",
        Condition::G => "g",
        Condition::Ge => "ge",
    }
}

fn operand32(op: &Operand) -> String {
    match op {
        Operand::Immediate(v) => format!("${v}"),
        Operand::Register(id) => reg32(*id).to_string(),
        Operand::MemRbp(offset) => format!("{offset}(%rbp)"),
    }
}

/// The 8-bit form `SetCC` writes to: a register's low byte, or the same
/// memory operand (AT&T infers the write width from the `set<cc>` mnemonic).
fn operand8(op: &Operand) -> String {
    match op {
        Operand::Register(id) => reg8(*id).to_string(),
        Operand::MemRbp(offset) => format!("{offset}(%rbp)"),
        Operand::Immediate(_) => unreachable!("SetCC never targets an immediate"),
    }
}

fn reg32(id: RegisterId) -> &'static str {
    match id {
        RegisterId::Eax => "%eax",
        RegisterId::Ecx => "%ecx",
        RegisterId::Edx => "%edx",
        RegisterId::R10d => "%r10d",
        RegisterId::R11d => "%r11d",
    }
}

fn reg8(id: RegisterId) -> &'static str {
    match id {
        RegisterId::Eax => "%al",
        RegisterId::Ecx => "%cl",
        RegisterId::Edx => "%dl",
        RegisterId::R10d => "%r10b",
        RegisterId::R11d => "%r11b",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_util::Symbol;

    fn minimal(stack_size: i64, instructions: Vec<Instruction>) -> AsmProgram {
        AsmProgram { function: AsmFunction { name: Symbol::intern("main"), instructions, stack_size } }
    }

    #[test]
    fn elf_uses_bare_global_symbol_and_dot_l_labels() {
        let program = minimal(0, vec![Instruction::Label(Symbol::intern("foo")), Instruction::Ret]);
        let text = emit_program(&program, Target::Elf);
        assert!(text.starts_with(".globl main\nmain:\n"));
        assert!(text.contains(".Lfoo:\n"));
    }

    #[test]
    fn macho_prefixes_global_symbol_with_underscore() {
        let program = minimal(0, vec![Instruction::Ret]);
        let text = emit_program(&program, Target::MachO);
        assert!(text.starts_with(".globl _main\n_main:\n"));
    }

    #[test]
    fn zero_stack_size_omits_sub_instruction() {
        let program = minimal(0, vec![Instruction::Ret]);
        let text = emit_program(&program, Target::Elf);
        assert!(!text.contains("subq"));
    }

    #[test]
    fn nonzero_stack_size_emits_sub_instruction() {
        let program = minimal(16, vec![Instruction::Ret]);
        let text = emit_program(&program, Target::Elf);
        assert!(text.contains("subq\t$16, %rsp"));
    }

    #[test]
    fn ret_expands_to_leave_then_ret() {
        let program = minimal(0, vec![Instruction::Ret]);
        let text = emit_program(&program, Target::Elf);
        assert!(text.contains("leave\n\tret\n"));
    }

    #[test]
    fn setcc_on_memory_destination_has_no_register_suffix() {
        let program =
            minimal(4, vec![Instruction::SetCC(Condition::E, Operand::MemRbp(-4)), Instruction::Ret]);
        let text = emit_program(&program, Target::Elf);
        assert!(text.contains("sete\t-4(%rbp)"));
    }
}
