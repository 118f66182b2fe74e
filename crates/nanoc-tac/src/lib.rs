//! Three-address code generation for the nanoc C subset (`spec.md` §4.4).

mod builder;
mod lower;
mod tac;

pub use lower::lower_program;
pub use tac::{TacFunction, TacInstr, TacProgram, TacVal};
