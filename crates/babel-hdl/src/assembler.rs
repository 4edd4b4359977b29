//! Companion assembler stub written next to an emitted core.
//!
//! The stub is a small Python script that knows the core's register names,
//! addressing modes and opcode table and packs one instruction per line into
//! the 32-bit word layout documented in [`crate::isa`].

use std::fmt;

use babel_core::{Fingerprint, ParameterSet};

use crate::isa::INSTRUCTIONS;

/// Assembler stub file name for a fingerprint.
pub fn stub_name(fingerprint: &Fingerprint) -> String {
    format!("assembler_{fingerprint}.py")
}

/// Render the assembler stub for a parameter set.
pub fn assembler_stub(params: &ParameterSet, fingerprint: &Fingerprint) -> String {
    AssemblerStub {
        params,
        fingerprint,
    }
    .to_string()
}

struct AssemblerStub<'a> {
    params: &'a ParameterSet,
    fingerprint: &'a Fingerprint,
}

impl fmt::Display for AssemblerStub<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#!/usr/bin/env python3")?;
        writeln!(f, "\"\"\"Assembler for micro_x86_core_{}.", self.fingerprint)?;
        writeln!(f)?;
        writeln!(f, "{}", self.params)?;
        writeln!(f, "\"\"\"")?;
        writeln!(f)?;
        writeln!(f, "import sys")?;
        writeln!(f)?;

        let regs: Vec<String> = self
            .params
            .num_regs()
            .names()
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect();
        writeln!(f, "REGISTERS = [{}]", regs.join(", "))?;

        writeln!(f, "MODES = {{")?;
        for mode in self.params.addressing_modes().iter() {
            writeln!(f, "    \"{}\": {},", mode.syntax(), mode.encoding())?;
        }
        writeln!(f, "}}")?;

        writeln!(f, "OPCODES = {{")?;
        for instr in &INSTRUCTIONS {
            writeln!(f, "    \"{}\": 0x{:x},", instr.mnemonic, instr.opcode)?;
        }
        writeln!(f, "}}")?;
        f.write_str(ENCODER)
    }
}

const ENCODER: &str = r#"

def reg(name):
    return REGISTERS.index(name.upper())


def encode(line):
    parts = line.replace(",", " ").split()
    op = OPCODES[parts[0].upper()]
    operands = [reg(p) for p in parts[1:4] if p.upper() in REGISTERS]
    dest, src1, src2 = (operands + [0, 0, 0])[:3]
    mode, imm = 0, 0
    for token in parts[1:]:
        if token.lstrip("-").isdigit():
            mode, imm = MODES.get("[reg+imm]", 0), int(token) & 0x1FFFF
    return (op << 28) | (dest << 25) | (src1 << 22) | (src2 << 19) | (mode << 17) | imm


def main():
    for line in sys.stdin:
        line = line.split(";")[0].strip()
        if line:
            print(f"{encode(line):08x}")


if __name__ == "__main__":
    main()
"#;
