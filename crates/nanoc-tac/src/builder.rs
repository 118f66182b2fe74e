//! Accumulates [`TacInstr`]s while lowering one function, minting fresh
//! temporaries and labels and tracking the nearest enclosing loop's
//! continue/break targets (`spec.md` §4.4).

use crate::tac::TacInstr;
use nanoc_util::Symbol;

pub struct Builder {
    instrs: Vec<TacInstr>,
    temp_counter: u32,
    label_counter: u32,
    /// (continue-target, break-target) per enclosing loop, innermost last.
    loop_targets: Vec<(Symbol, Symbol)>,
}

impl Builder {
    pub fn new() -> Self {
        Self { instrs: Vec::new(), temp_counter: 0, label_counter: 0, loop_targets: Vec::new() }
    }

    pub fn new_temp(&mut self) -> Symbol {
        let sym = Symbol::intern(&format!("t{}", self.temp_counter));
        self.temp_counter += 1;
        sym
    }

    /// Mint a label `{prefix}{n}` with a generator-wide unique `n`, per the
    /// `and_falseN` / `and_endN` / `or_trueN` / `or_endN` naming convention.
    pub fn new_label(&mut self, prefix: &str) -> Symbol {
        let sym = Symbol::intern(&format!("{prefix}{}", self.label_counter));
        self.label_counter += 1;
        sym
    }

    pub fn emit(&mut self, instr: TacInstr) {
        self.instrs.push(instr);
    }

    pub fn push_loop_targets(&mut self, continue_target: Symbol, break_target: Symbol) {
        self.loop_targets.push((continue_target, break_target));
    }

    pub fn pop_loop_targets(&mut self) {
        self.loop_targets.pop();
    }

    /// The innermost loop's continue target. The resolver guarantees every
    /// `continue` is nested in a loop, so an empty stack here is a bug in
    /// an earlier stage, not a user error.
    pub fn continue_target(&self) -> Symbol {
        self.loop_targets.last().expect("continue outside loop should have been rejected by the resolver").0
    }

    pub fn break_target(&self) -> Symbol {
        self.loop_targets.last().expect("break outside loop should have been rejected by the resolver").1
    }

    pub fn finish(self) -> Vec<TacInstr> {
        self.instrs
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
