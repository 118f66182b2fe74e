//! Stack slot allocation (`spec.md` §4.5 "Stack layout").

use indexmap::IndexSet;
use nanoc_tac::{TacFunction, TacInstr, TacVal};
use nanoc_util::Symbol;
use std::collections::HashMap;

pub struct StackFrame {
    offsets: HashMap<Symbol, i64>,
    pub stack_size: i64,
}

impl StackFrame {
    /// Walk `function` once, collecting the ordered set of distinct names
    /// used as a `dst` or referenced as a `Var` operand, then assign slot
    /// `i` to offset `-4 * (i + 1)` from `%rbp`.
    pub fn build(function: &TacFunction) -> Self {
        let mut names: IndexSet<Symbol> = IndexSet::new();

        let mut note_val = |names: &mut IndexSet<Symbol>, v: &TacVal| {
            if let TacVal::Var(name) = v {
                names.insert(*name);
            }
        };

        for instr in &function.body {
            match instr {
                TacInstr::Unary { src, dst, .. } => {
                    note_val(&mut names, src);
                    names.insert(*dst);
                }
                TacInstr::Binary { src1, src2, dst, .. } => {
                    note_val(&mut names, src1);
                    note_val(&mut names, src2);
                    names.insert(*dst);
                }
                TacInstr::Copy { src, dst } => {
                    note_val(&mut names, src);
                    names.insert(*dst);
                }
                TacInstr::JumpIfZero { cond, .. } | TacInstr::JumpIfNotZero { cond, .. } => {
                    note_val(&mut names, cond);
                }
                TacInstr::Return(v) => note_val(&mut names, v),
                TacInstr::Jump(_) | TacInstr::Label(_) => {}
            }
        }

        let offsets =
            names.iter().enumerate().map(|(i, name)| (*name, -4 * (i as i64 + 1))).collect();
        let raw_bytes = names.len() as i64 * 4;
        let stack_size = round_up_to_16(raw_bytes);

        Self { offsets, stack_size }
    }

    pub fn offset_of(&self, name: Symbol) -> i64 {
        *self.offsets.get(&name).expect("every Var name must have been seen during frame.build")
    }
}

fn round_up_to_16(bytes: i64) -> i64 {
    (bytes + 15) / 16 * 16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_function_has_zero_stack_size() {
        let f = TacFunction { name: Symbol::intern("f"), body: vec![TacInstr::Return(TacVal::Const(0))] };
        assert_eq!(StackFrame::build(&f).stack_size, 0);
    }

    #[test]
    fn stack_size_is_rounded_up_to_16() {
        let x = Symbol::intern("frame_test_x");
        let f = TacFunction {
            name: Symbol::intern("f"),
            body: vec![
                TacInstr::Copy { src: TacVal::Const(1), dst: x },
                TacInstr::Return(TacVal::Var(x)),
            ],
        };
        let frame = StackFrame::build(&f);
        assert_eq!(frame.stack_size % 16, 0);
        assert!(frame.stack_size >= 4);
    }

    #[test]
    fn distinct_names_get_distinct_descending_offsets() {
        let a = Symbol::intern("frame_test_a");
        let c = Symbol::intern("frame_test_c");
        let f = TacFunction {
            name: Symbol::intern("f"),
            body: vec![
                TacInstr::Copy { src: TacVal::Const(1), dst: a },
                TacInstr::Copy { src: TacVal::Const(2), dst: c },
                TacInstr::Return(TacVal::Const(0)),
            ],
        };
        let frame = StackFrame::build(&f);
        assert_eq!(frame.offset_of(a), -4);
        assert_eq!(frame.offset_of(c), -8);
    }
}
