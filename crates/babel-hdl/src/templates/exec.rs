//! Execution units.
//!
//! `single-alu` emits one ALU that also computes effective addresses.
//! `separate-agu-alu` emits an ALU plus an address generation unit whose
//! case arms cover exactly the supported addressing modes.

use babel_core::{AddressingMode, ExecUnits, ParameterSet};

use crate::isa::{AluOp, DATA_WIDTH, IMM_WIDTH};
use crate::templates::{mode_literal, mode_param};
use crate::tree::{CaseArm, Item, Module, Port, Stmt};

pub const ALU_MODULE: &str = "alu";
pub const AGU_MODULE: &str = "agu";

/// Execution-unit modules for the parameter set, ALU first.
pub fn exec_units(params: &ParameterSet) -> Vec<Module> {
    match params.exec_units() {
        ExecUnits::SingleAlu => vec![alu("Shared by address and data computation")],
        ExecUnits::SeparateAguAlu => vec![
            alu("Data path only; effective addresses come from the AGU"),
            agu(params),
        ],
    }
}

fn alu(role: &str) -> Module {
    let mut m = Module::new(ALU_MODULE)
        .with_parameter("WIDTH", DATA_WIDTH.to_string())
        .with_port(Port::input_bus("op", "3:0"))
        .with_port(Port::input_bus("a", "WIDTH-1:0"))
        .with_port(Port::input_bus("b", "WIDTH-1:0"))
        .with_port(Port::output_reg_bus("result", "WIDTH-1:0"))
        .with_port(Port::output_reg("zero_flag"));
    m.push(Item::comment(role));
    for op in AluOp::ALL {
        m.push(Item::localparam(op.param_name(), format!("4'h{:x}", op.code())));
    }
    m.push(Item::comb(vec![
        Stmt::Case {
            selector: "op".into(),
            arms: AluOp::ALL
                .iter()
                .filter(|op| **op != AluOp::Pass)
                .map(|op| CaseArm::new(op.param_name(), vec![Stmt::blocking("result", op.expr())]))
                .collect(),
            default: vec![Stmt::blocking("result", AluOp::Pass.expr())],
        },
        Stmt::blocking("zero_flag", "(result == {WIDTH{1'b0}})"),
    ]));
    m
}

fn agu(params: &ParameterSet) -> Module {
    let modes = params.addressing_modes();
    let mut m = Module::new(AGU_MODULE)
        .with_parameter("WIDTH", DATA_WIDTH.to_string())
        .with_port(Port::input_bus("mode", "1:0"))
        .with_port(Port::input_bus("base", "WIDTH-1:0"))
        .with_port(Port::input_bus("index", "WIDTH-1:0"))
        .with_port(Port::input_bus("imm", format!("{}:0", IMM_WIDTH - 1)))
        .with_port(Port::output_reg_bus("addr", "WIDTH-1:0"));
    m.push(Item::comment(format!("Addressing modes: {modes}")));
    for mode in modes.iter() {
        m.push(Item::localparam(mode_param(mode), mode_literal(mode)));
    }
    let arms = modes
        .iter()
        .map(|mode| {
            let expr = match mode {
                AddressingMode::RegOnly => "base".to_string(),
                AddressingMode::RegPlusImmediate => format!(
                    "base + {{{{(WIDTH-{IMM_WIDTH}){{imm[{}]}}}}, imm}}",
                    IMM_WIDTH - 1
                ),
                AddressingMode::RegPlusReg => "base + index".to_string(),
            };
            CaseArm::new(mode_param(mode), vec![Stmt::blocking("addr", expr)])
        })
        .collect();
    m.push(Item::comb(vec![Stmt::Case {
        selector: "mode".into(),
        arms,
        default: vec![Stmt::blocking("addr", "base")],
    }]));
    m
}
