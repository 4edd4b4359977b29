//! Verilog emission for Babel CPU cores.
//!
//! A [`babel_core::ParameterSet`] is turned into a structured [`tree::Design`]
//! by the per-region templates (register file, decoder, execution units,
//! memory interface, top level), rendered to Verilog-2001, and checked for
//! well-formedness before it is returned:
//!
//! parameter set -> templates -> design tree -> composition check -> render -> balance check

pub mod assembler;
pub mod check;
pub mod emitter;
pub mod error;
pub mod isa;
pub mod render;
pub mod templates;
pub mod tree;

pub use assembler::{assembler_stub, stub_name};
pub use check::{check_balanced, check_design, StructureSummary};
pub use emitter::{artifact_name, build_design, emit, Artifact};
pub use error::{EmissionError, Result};
pub use isa::{AluOp, ControlWord, Instruction, INSTRUCTIONS};
pub use render::{render, render_module_text};
pub use templates::TOP_MODULE;
pub use tree::{Design, Module};
