//! Instruction decoder variants.
//!
//! Both variants expose the same decoded fields and control outputs so the
//! top level binds them identically. `ready` marks the cycle in which the
//! control outputs belong to the last step of the current instruction; the
//! hardwired decoder holds it high.

use babel_core::{DecoderType, ParameterSet};

use crate::isa::{Instruction, INSTRUCTIONS, INSTR_WIDTH};
use crate::templates::bit;
use crate::tree::{CaseArm, Item, Module, Net, Port, Stmt};

/// Depth of the micro-program ROM (power of two above the table size).
const UROM_DEPTH: usize = 32;
const UPC_WIDTH: u32 = 5;

/// Module name of a decoder variant.
pub fn module_name(decoder: DecoderType) -> &'static str {
    match decoder {
        DecoderType::Hardwired => "decoder_hardwired",
        DecoderType::Microcoded => "decoder_microcoded",
    }
}

/// Decoder chosen by the parameter set.
pub fn decoder(params: &ParameterSet) -> Module {
    match params.decoder_type() {
        DecoderType::Hardwired => hardwired(),
        DecoderType::Microcoded => microcoded(),
    }
}

fn with_outputs(module: Module) -> Module {
    module
        .with_port(Port::input_bus("instr", format!("{}:0", INSTR_WIDTH - 1)))
        .with_port(Port::output_reg_bus("opcode", "3:0"))
        .with_port(Port::output_reg_bus("dest_reg", "2:0"))
        .with_port(Port::output_reg_bus("src1_reg", "2:0"))
        .with_port(Port::output_reg_bus("src2_reg", "2:0"))
        .with_port(Port::output_reg_bus("mode", "1:0"))
        .with_port(Port::output_reg_bus("imm", "16:0"))
        .with_port(Port::output_reg_bus("alu_op", "3:0"))
        .with_port(Port::output_reg("reg_we"))
        .with_port(Port::output_reg("mem_we"))
        .with_port(Port::output_reg("mem_re"))
        .with_port(Port::output_reg("branch"))
        .with_port(Port::output_reg("ready"))
}

fn opcode_params(m: &mut Module) {
    for instr in &INSTRUCTIONS {
        m.push(Item::localparam(
            instr.param_name(),
            format!("4'h{:x}", instr.opcode),
        ));
    }
}

fn field_extraction() -> Vec<Stmt> {
    vec![
        Stmt::blocking("opcode", "instr[31:28]"),
        Stmt::blocking("dest_reg", "instr[27:25]"),
        Stmt::blocking("src1_reg", "instr[24:22]"),
        Stmt::blocking("src2_reg", "instr[21:19]"),
        Stmt::blocking("mode", "instr[18:17]"),
        Stmt::blocking("imm", "instr[16:0]"),
    ]
}

fn control_stmts(instr: &Instruction) -> Vec<Stmt> {
    let c = instr.control;
    let mut body = vec![Stmt::blocking("alu_op", format!("4'h{:x}", c.alu_op.code()))];
    for (signal, set) in [
        ("reg_we", c.reg_we),
        ("mem_we", c.mem_we),
        ("mem_re", c.mem_re),
        ("branch", c.branch),
    ] {
        if set {
            body.push(Stmt::blocking(signal, bit(true)));
        }
    }
    body
}

fn hardwired() -> Module {
    let mut m = with_outputs(Module::new(module_name(DecoderType::Hardwired)));
    m.push(Item::comment("Single-cycle combinational decode"));
    opcode_params(&mut m);

    let mut body = field_extraction();
    body.extend([
        Stmt::blocking("alu_op", "4'h0"),
        Stmt::blocking("reg_we", bit(false)),
        Stmt::blocking("mem_we", bit(false)),
        Stmt::blocking("mem_re", bit(false)),
        Stmt::blocking("branch", bit(false)),
        Stmt::blocking("ready", bit(true)),
    ]);
    body.push(Stmt::Case {
        selector: "opcode".into(),
        arms: INSTRUCTIONS
            .iter()
            .map(|instr| CaseArm::new(instr.param_name(), control_stmts(instr)))
            .collect(),
        default: Vec::new(),
    });
    m.push(Item::comb(body));
    m
}

fn microcoded() -> Module {
    let mut m = with_outputs(
        Module::new(module_name(DecoderType::Microcoded))
            .with_parameter("UROM_DEPTH", UROM_DEPTH.to_string()),
    );
    // Clock and reset lead the port list.
    m.ports.insert(0, Port::input("reset"));
    m.ports.insert(0, Port::input("clk"));

    m.push(Item::comment(
        "Multi-cycle decode: each opcode walks its micro-program, one entry per cycle",
    ));
    opcode_params(&mut m);
    m.push(Item::comment(
        "Micro-instruction layout: {alu_op[3:0], reg_we, mem_we, mem_re, branch}",
    ));
    let upc_range = format!("{}:0", UPC_WIDTH - 1);
    m.push(Item::Net(Net::reg("micro_rom").with_range("7:0").with_depth("0:UROM_DEPTH-1")));
    m.push(Item::Net(Net::reg("entry_point").with_range(upc_range.clone()).with_depth("0:15")));
    m.push(Item::Net(Net::reg("uop_count").with_range("1:0").with_depth("0:15")));
    m.push(Item::Net(Net::reg("step").with_range("1:0")));
    m.push(Item::Net(Net::reg("upc").with_range(upc_range)));
    m.push(Item::Net(Net::integer("k")));

    let mut init = vec![
        Stmt::count_loop(
            "k",
            "UROM_DEPTH",
            vec![Stmt::blocking("micro_rom[k]", "8'h00")],
        ),
        Stmt::count_loop(
            "k",
            "16",
            vec![
                Stmt::blocking("entry_point[k]", format!("{UPC_WIDTH}'d0")),
                Stmt::blocking("uop_count[k]", "2'd1"),
            ],
        ),
    ];
    let mut next = 1usize;
    for instr in &INSTRUCTIONS {
        init.push(Stmt::Comment(format!(
            "{}: {} micro-op(s)",
            instr.mnemonic,
            instr.micro_ops.len()
        )));
        for (offset, uop) in instr.micro_ops.iter().enumerate() {
            init.push(Stmt::blocking(
                format!("micro_rom[{}]", next + offset),
                uop.literal(),
            ));
        }
        init.push(Stmt::blocking(
            format!("entry_point[{}]", instr.param_name()),
            format!("{UPC_WIDTH}'d{next}"),
        ));
        init.push(Stmt::blocking(
            format!("uop_count[{}]", instr.param_name()),
            format!("2'd{}", instr.micro_ops.len()),
        ));
        next += instr.micro_ops.len();
    }
    m.push(Item::Initial(init));

    let mut body = field_extraction();
    body.extend([
        Stmt::blocking("upc", "entry_point[opcode] + {3'b000, step}"),
        Stmt::blocking("{alu_op, reg_we, mem_we, mem_re, branch}", "micro_rom[upc]"),
        Stmt::blocking("ready", "(step == uop_count[opcode] - 2'd1)"),
    ]);
    m.push(Item::comb(body));

    m.push(Item::posedge(
        "clk",
        vec![Stmt::if_else(
            "reset",
            vec![Stmt::non_blocking("step", "2'd0")],
            vec![Stmt::if_else(
                "ready",
                vec![Stmt::non_blocking("step", "2'd0")],
                vec![Stmt::non_blocking("step", "step + 2'd1")],
            )],
        )],
    ));
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::micro_program_len;
    use crate::render::render_module_text;

    #[test]
    fn hardwired_is_purely_combinational() {
        let m = hardwired();
        assert!(m.port("clk").is_none());
        let text = render_module_text(&m);
        assert!(text.contains("always @(*) begin"));
        assert!(!text.contains("posedge"));
        assert!(text.contains("OP_PUSH: begin"));
        assert!(text.contains("localparam OP_POP = 4'he;"));
    }

    #[test]
    fn microcoded_has_rom_and_step_counter() {
        let m = microcoded();
        assert_eq!(m.ports[0].name, "clk");
        assert_eq!(m.ports[1].name, "reset");
        let text = render_module_text(&m);
        assert!(text.contains("reg [7:0] micro_rom [0:UROM_DEPTH-1];"));
        assert!(text.contains("always @(posedge clk) begin"));
        assert!(text.contains("uop_count[OP_MOV] = 2'd2;"));
        // the last micro-program entry is written
        assert!(text.contains(&format!("micro_rom[{}]", micro_program_len() - 1)));
        assert!(micro_program_len() <= UROM_DEPTH);
    }

    #[test]
    fn variants_share_output_ports() {
        let hw = hardwired();
        let mc = microcoded();
        for port in &hw.ports {
            assert!(mc.port(&port.name).is_some(), "missing {}", port.name);
        }
    }
}
