//! Hardware-region templates.
//!
//! Each submodule turns a [`babel_core::ParameterSet`] into one [`crate::tree::Module`].
//! Names of the chosen variants are stable so the top level can bind them.

pub mod decoder;
pub mod exec;
pub mod memory;
pub mod regfile;
pub mod top;

use babel_core::AddressingMode;

/// Name of the composing top-level module.
pub const TOP_MODULE: &str = "micro_x86_core";

/// Localparam naming an addressing mode.
pub(crate) fn mode_param(mode: AddressingMode) -> &'static str {
    match mode {
        AddressingMode::RegOnly => "MODE_REG",
        AddressingMode::RegPlusImmediate => "MODE_REG_IMM",
        AddressingMode::RegPlusReg => "MODE_REG_REG",
    }
}

/// Literal of an addressing mode's 2-bit encoding.
pub(crate) fn mode_literal(mode: AddressingMode) -> String {
    format!("2'd{}", mode.encoding())
}

/// `1'b1` / `1'b0`.
pub(crate) fn bit(value: bool) -> &'static str {
    if value {
        "1'b1"
    } else {
        "1'b0"
    }
}
