//! Three-address code data model (`spec.md` §3 "TAC").

use nanoc_par::ast::{BinaryOp, UnaryOp};
use nanoc_util::Symbol;

#[derive(Debug, serde::Serialize)]
pub struct TacProgram {
    pub function: TacFunction,
}

#[derive(Debug, serde::Serialize)]
pub struct TacFunction {
    pub name: Symbol,
    pub body: Vec<TacInstr>,
}

/// Either an immediate constant or a named slot (a user variable or a
/// generator-minted temporary — both live in the same flat namespace by
/// this stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TacVal {
    Const(i64),
    Var(Symbol),
}

#[derive(Debug, Clone, serde::Serialize)]
pub enum TacInstr {
    Unary { op: UnaryOp, src: TacVal, dst: Symbol },
    Binary { op: BinaryOp, src1: TacVal, src2: TacVal, dst: Symbol },
    Copy { src: TacVal, dst: Symbol },
    Jump(Symbol),
    JumpIfZero { cond: TacVal, target: Symbol },
    JumpIfNotZero { cond: TacVal, target: Symbol },
    Label(Symbol),
    Return(TacVal),
}
