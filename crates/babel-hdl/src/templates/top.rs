//! Top-level composition.
//!
//! Instantiates every chosen sub-block exactly once and wires them through
//! a shared set of internal nets. Ports a variant lacks (`hit` on the simple
//! memory, `clk` on the hardwired decoder) are simply not bound.

use babel_core::{AddressingMode, ExecUnits, ParameterSet};

use crate::isa::{DATA_WIDTH, IMM_WIDTH, INSTR_WIDTH};
use crate::templates::exec::{AGU_MODULE, ALU_MODULE};
use crate::templates::{mode_literal, mode_param, TOP_MODULE};
use crate::tree::{Instance, Item, Module, Net, Port, Stmt};

const REGFILE_BINDINGS: &[(&str, &str)] = &[
    ("clk", "clk"),
    ("reset", "reset"),
    ("we", "dec_reg_we"),
    ("waddr", "dec_dest"),
    ("raddr1", "dec_src1"),
    ("raddr2", "dec_src2"),
    ("wdata", "wb_data"),
    ("rdata1", "rdata1"),
    ("rdata2", "rdata2"),
];

const DECODER_BINDINGS: &[(&str, &str)] = &[
    ("clk", "clk"),
    ("reset", "reset"),
    ("instr", "stage_instr[PIPELINE_DEPTH-1]"),
    ("opcode", "dec_opcode"),
    ("dest_reg", "dec_dest"),
    ("src1_reg", "dec_src1"),
    ("src2_reg", "dec_src2"),
    ("mode", "dec_mode"),
    ("imm", "dec_imm"),
    ("alu_op", "dec_alu_op"),
    ("reg_we", "dec_reg_we"),
    ("mem_we", "dec_mem_we"),
    ("mem_re", "dec_mem_re"),
    ("branch", "dec_branch"),
    ("ready", "dec_ready"),
];

const ALU_BINDINGS: &[(&str, &str)] = &[
    ("op", "dec_alu_op"),
    ("a", "rdata1"),
    ("b", "operand_b"),
    ("result", "alu_result"),
    ("zero_flag", "alu_zero"),
];

const AGU_BINDINGS: &[(&str, &str)] = &[
    ("mode", "dec_mode"),
    ("base", "rdata1"),
    ("index", "rdata2"),
    ("imm", "dec_imm"),
    ("addr", "mem_addr"),
];

const MEMORY_BINDINGS: &[(&str, &str)] = &[
    ("clk", "clk"),
    ("reset", "reset"),
    ("we", "dec_mem_we"),
    ("addr", "mem_addr"),
    ("wdata", "rdata2"),
    ("rdata", "mem_rdata"),
    ("hit", "mem_hit"),
];

/// Top-level module composing the given sub-blocks.
pub fn top_level(
    params: &ParameterSet,
    regfile: &Module,
    decoder: &Module,
    exec: &[Module],
    memory: &Module,
) -> Module {
    let num_regs = params.num_regs();
    let modes = params.addressing_modes();
    let data = format!("{}:0", DATA_WIDTH - 1);

    let mut m = Module::new(TOP_MODULE)
        .with_parameter("NUM_REGS", num_regs.count().to_string())
        .with_parameter("PIPELINE_DEPTH", params.pipeline_depth().stages().to_string())
        .with_port(Port::input("clk"))
        .with_port(Port::input("reset"))
        .with_port(Port::input_bus("instr", format!("{}:0", INSTR_WIDTH - 1)))
        .with_port(Port::output_bus("pc_out", data.clone()));

    m.push(Item::comment(format!("Registers: {}", num_regs.names().join(", "))));
    m.push(Item::comment(format!("Addressing modes: {modes}")));
    m.push(Item::comment(format!(
        "Decoder: {}, execution: {}, memory: {}",
        params.decoder_type().as_str(),
        params.exec_units().as_str(),
        params.memory_interface().as_str(),
    )));
    for mode in modes.iter() {
        m.push(Item::localparam(mode_param(mode), mode_literal(mode)));
    }

    m.push(Item::comment("Decoded fields and control"));
    m.push(Item::Net(Net::wire("dec_opcode").with_range("3:0")));
    for name in ["dec_dest", "dec_src1", "dec_src2"] {
        m.push(Item::Net(Net::wire(name).with_range("2:0")));
    }
    m.push(Item::Net(Net::wire("dec_mode").with_range("1:0")));
    m.push(Item::Net(Net::wire("dec_imm").with_range(format!("{}:0", IMM_WIDTH - 1))));
    m.push(Item::Net(Net::wire("dec_alu_op").with_range("3:0")));
    for name in ["dec_reg_we", "dec_mem_we", "dec_mem_re", "dec_branch", "dec_ready"] {
        m.push(Item::Net(Net::wire(name)));
    }

    m.push(Item::comment("Data path"));
    for name in [
        "rdata1",
        "rdata2",
        "operand_b",
        "imm_ext",
        "alu_result",
        "mem_addr",
        "mem_rdata",
        "wb_data",
    ] {
        m.push(Item::Net(Net::wire(name).with_range(data.clone())));
    }
    m.push(Item::Net(Net::wire("alu_zero")));
    if memory.port("hit").is_some() {
        m.push(Item::Net(Net::wire("mem_hit")));
    }

    m.push(Item::comment("Pipeline stage registers"));
    m.push(Item::Net(
        Net::reg("stage_instr")
            .with_range(format!("{}:0", INSTR_WIDTH - 1))
            .with_depth("0:PIPELINE_DEPTH-1"),
    ));
    m.push(Item::Net(Net::reg("pc").with_range(data)));
    m.push(Item::Net(Net::integer("s")));

    m.push(Item::assign("pc_out", "pc"));
    m.push(Item::assign(
        "imm_ext",
        format!(
            "{{{{{}{{dec_imm[{}]}}}}, dec_imm}}",
            DATA_WIDTH - IMM_WIDTH,
            IMM_WIDTH - 1
        ),
    ));
    m.push(Item::assign("wb_data", "dec_mem_re ? mem_rdata : alu_result"));
    match params.exec_units() {
        ExecUnits::SingleAlu => {
            // the ALU doubles as address generator
            let operand = if modes.contains(AddressingMode::RegPlusImmediate) {
                format!("(dec_mode == {}) ? imm_ext : rdata2", mode_param(AddressingMode::RegPlusImmediate))
            } else {
                "rdata2".to_string()
            };
            m.push(Item::assign("operand_b", operand));
            m.push(Item::assign("mem_addr", "alu_result"));
        }
        ExecUnits::SeparateAguAlu => m.push(Item::assign("operand_b", "rdata2")),
    }

    m.push(Item::posedge(
        "clk",
        vec![Stmt::if_else(
            "reset",
            vec![
                Stmt::count_loop(
                    "s",
                    "PIPELINE_DEPTH",
                    vec![Stmt::non_blocking("stage_instr[s]", format!("{INSTR_WIDTH}'h0"))],
                ),
                Stmt::non_blocking("pc", format!("{DATA_WIDTH}'h0")),
            ],
            vec![Stmt::if_then(
                "dec_ready",
                vec![
                    Stmt::non_blocking("stage_instr[0]", "instr"),
                    Stmt::For {
                        init: "s = 1".into(),
                        cond: "s < PIPELINE_DEPTH".into(),
                        step: "s = s + 1".into(),
                        body: vec![Stmt::non_blocking("stage_instr[s]", "stage_instr[s-1]")],
                    },
                    Stmt::if_else(
                        "dec_branch",
                        vec![Stmt::non_blocking("pc", "alu_result")],
                        vec![Stmt::non_blocking("pc", format!("pc + {DATA_WIDTH}'d4"))],
                    ),
                ],
            )],
        )],
    ));

    m.push(Item::Instance(
        Instance::wired(regfile, "rf", REGFILE_BINDINGS).with_parameter("NUM_REGS", "NUM_REGS"),
    ));
    m.push(Item::Instance(Instance::wired(decoder, "dec", DECODER_BINDINGS)));
    for unit in exec {
        let bindings = match unit.name.as_str() {
            ALU_MODULE => ALU_BINDINGS,
            AGU_MODULE => AGU_BINDINGS,
            _ => &[],
        };
        m.push(Item::Instance(Instance::wired(
            unit,
            format!("{}_inst", unit.name),
            bindings,
        )));
    }
    m.push(Item::Instance(Instance::wired(memory, "mem_inst", MEMORY_BINDINGS)));
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_module_text;
    use crate::templates::{decoder, exec, memory, regfile};
    use babel_core::{AddressingModes, DecoderType, MemoryInterface, NumRegs, PipelineDepth};

    fn build(params: &ParameterSet) -> Module {
        top_level(
            params,
            &regfile::register_file(params),
            &decoder::decoder(params),
            &exec::exec_units(params),
            &memory::memory(params),
        )
    }

    fn params(num_regs: NumRegs, exec: ExecUnits, memory: MemoryInterface) -> ParameterSet {
        ParameterSet::new(
            num_regs,
            DecoderType::Microcoded,
            PipelineDepth::Four,
            AddressingModes::for_registers(num_regs),
            exec,
            memory,
        )
    }

    #[test]
    fn exposes_fixed_interface() {
        let top = build(&params(NumRegs::Four, ExecUnits::SingleAlu, MemoryInterface::Simple));
        let names: Vec<&str> = top.ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["clk", "reset", "instr", "pc_out"]);
        assert_eq!(top.port("instr").and_then(|p| p.range.as_deref()), Some("31:0"));
        assert_eq!(top.port("pc_out").and_then(|p| p.range.as_deref()), Some("63:0"));
    }

    #[test]
    fn instantiates_each_block_once() {
        let top = build(&params(NumRegs::Eight, ExecUnits::SeparateAguAlu, MemoryInterface::Cached));
        let modules: Vec<&str> = top.instances().map(|i| i.module.as_str()).collect();
        assert_eq!(
            modules,
            vec!["reg_file", "decoder_microcoded", "alu", "agu", "memory_cached"]
        );
    }

    #[test]
    fn single_alu_muxes_immediate_when_supported() {
        let text = render_module_text(&build(&params(
            NumRegs::Six,
            ExecUnits::SingleAlu,
            MemoryInterface::Simple,
        )));
        assert!(text.contains("assign operand_b = (dec_mode == MODE_REG_IMM) ? imm_ext : rdata2;"));
        assert!(text.contains("assign mem_addr = alu_result;"));
        assert!(text.contains("// Registers: RAX, RBX, RCX, RDX, R8, R9"));
        assert!(!text.contains("mem_hit"));

        let text = render_module_text(&build(&params(
            NumRegs::Four,
            ExecUnits::SingleAlu,
            MemoryInterface::Simple,
        )));
        assert!(text.contains("assign operand_b = rdata2;"));
    }

    #[test]
    fn program_counter_steps_by_four() {
        let text = render_module_text(&build(&params(
            NumRegs::Four,
            ExecUnits::SeparateAguAlu,
            MemoryInterface::Cached,
        )));
        assert!(text.contains("pc <= pc + 64'd4;"));
        assert!(text.contains("pc <= 64'h0;"));
        assert!(text.contains("assign imm_ext = {{47{dec_imm[16]}}, dec_imm};"));
        assert!(text.contains(".hit(mem_hit)"));
    }
}
