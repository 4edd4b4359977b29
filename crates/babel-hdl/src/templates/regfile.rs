//! Register file: one write port, two read ports.

use babel_core::ParameterSet;

use crate::isa::{DATA_WIDTH, REG_ADDR_WIDTH};
use crate::tree::{Item, Module, Net, Port, Stmt};

pub const MODULE_NAME: &str = "reg_file";

/// Register file sized to the parameter set's register count.
pub fn register_file(params: &ParameterSet) -> Module {
    let num_regs = params.num_regs();
    let mut m = Module::new(MODULE_NAME)
        .with_parameter("NUM_REGS", num_regs.count().to_string())
        .with_parameter("REG_WIDTH", DATA_WIDTH.to_string())
        .with_parameter("ADDR_WIDTH", REG_ADDR_WIDTH.to_string())
        .with_port(Port::input("clk"))
        .with_port(Port::input("reset"))
        .with_port(Port::input("we"))
        .with_port(Port::input_bus("waddr", "ADDR_WIDTH-1:0"))
        .with_port(Port::input_bus("raddr1", "ADDR_WIDTH-1:0"))
        .with_port(Port::input_bus("raddr2", "ADDR_WIDTH-1:0"))
        .with_port(Port::input_bus("wdata", "REG_WIDTH-1:0"))
        .with_port(Port::output_bus("rdata1", "REG_WIDTH-1:0"))
        .with_port(Port::output_bus("rdata2", "REG_WIDTH-1:0"));

    m.push(Item::comment(format!(
        "{} registers: {}",
        num_regs.count(),
        num_regs.names().join(", ")
    )));
    m.push(Item::Net(
        Net::reg("regs")
            .with_range("REG_WIDTH-1:0")
            .with_depth("0:NUM_REGS-1"),
    ));
    m.push(Item::Net(Net::integer("i")));
    m.push(Item::posedge(
        "clk",
        vec![Stmt::if_else(
            "reset",
            vec![Stmt::count_loop(
                "i",
                "NUM_REGS",
                vec![Stmt::non_blocking("regs[i]", "{REG_WIDTH{1'b0}}")],
            )],
            vec![Stmt::if_then(
                "we && waddr < NUM_REGS",
                vec![Stmt::non_blocking("regs[waddr]", "wdata")],
            )],
        )],
    ));
    m.push(Item::assign("rdata1", "regs[raddr1]"));
    m.push(Item::assign("rdata2", "regs[raddr2]"));
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_module_text;
    use babel_core::{AddressingModes, DecoderType, ExecUnits, MemoryInterface, NumRegs, PipelineDepth};

    fn params(num_regs: NumRegs) -> ParameterSet {
        ParameterSet::new(
            num_regs,
            DecoderType::Hardwired,
            PipelineDepth::Two,
            AddressingModes::for_registers(num_regs),
            ExecUnits::SingleAlu,
            MemoryInterface::Simple,
        )
    }

    #[test]
    fn sized_to_register_count() {
        let text = render_module_text(&register_file(&params(NumRegs::Six)));
        assert!(text.contains("parameter NUM_REGS = 6,"));
        assert!(text.contains("// 6 registers: RAX, RBX, RCX, RDX, R8, R9"));
    }

    #[test]
    fn one_write_two_read_ports() {
        let m = register_file(&params(NumRegs::Four));
        assert!(m.port("wdata").is_some());
        assert!(m.port("rdata1").is_some());
        assert!(m.port("rdata2").is_some());
        assert!(m.port("rdata3").is_none());
        let writes = m.ports.iter().filter(|p| p.name.starts_with("wdata")).count();
        assert_eq!(writes, 1);
    }
}
