//! Fixed micro-x86-64 instruction set shared by every generated core.
//!
//! Instruction word layout (32 bits):
//!
//! | bits    | field    |
//! |---------|----------|
//! | 31..28  | opcode   |
//! | 27..25  | dest     |
//! | 24..22  | src1     |
//! | 21..19  | src2     |
//! | 18..17  | mode     |
//! | 16..0   | imm      |

/// Width of the instruction word.
pub const INSTR_WIDTH: u32 = 32;
/// Width of registers and the data path.
pub const DATA_WIDTH: u32 = 64;
/// Width of the immediate field.
pub const IMM_WIDTH: u32 = 17;
/// Width of a register index.
pub const REG_ADDR_WIDTH: u32 = 3;

/// Operation selected on the ALU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Pass,
    Add,
    Sub,
    And,
    Or,
    Xor,
    Inc,
    Dec,
}

impl AluOp {
    pub const ALL: [AluOp; 8] = [
        AluOp::Pass,
        AluOp::Add,
        AluOp::Sub,
        AluOp::And,
        AluOp::Or,
        AluOp::Xor,
        AluOp::Inc,
        AluOp::Dec,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Localparam name used in the ALU.
    pub fn param_name(self) -> &'static str {
        match self {
            AluOp::Pass => "ALU_PASS",
            AluOp::Add => "ALU_ADD",
            AluOp::Sub => "ALU_SUB",
            AluOp::And => "ALU_AND",
            AluOp::Or => "ALU_OR",
            AluOp::Xor => "ALU_XOR",
            AluOp::Inc => "ALU_INC",
            AluOp::Dec => "ALU_DEC",
        }
    }

    /// Result expression over operands `a` and `b`.
    pub fn expr(self) -> &'static str {
        match self {
            AluOp::Pass => "a",
            AluOp::Add => "a + b",
            AluOp::Sub => "a - b",
            AluOp::And => "a & b",
            AluOp::Or => "a | b",
            AluOp::Xor => "a ^ b",
            AluOp::Inc => "a + 1'b1",
            AluOp::Dec => "a - 1'b1",
        }
    }
}

/// Control signals produced by decode for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWord {
    pub alu_op: AluOp,
    pub reg_we: bool,
    pub mem_we: bool,
    pub mem_re: bool,
    pub branch: bool,
}

const fn ctl(alu_op: AluOp, reg_we: bool, mem_we: bool, mem_re: bool, branch: bool) -> ControlWord {
    ControlWord {
        alu_op,
        reg_we,
        mem_we,
        mem_re,
        branch,
    }
}

impl ControlWord {
    /// Packed form `{alu_op[3:0], reg_we, mem_we, mem_re, branch}`.
    pub fn bits(self) -> u8 {
        (self.alu_op.code() << 4)
            | (u8::from(self.reg_we) << 3)
            | (u8::from(self.mem_we) << 2)
            | (u8::from(self.mem_re) << 1)
            | u8::from(self.branch)
    }

    /// Packed form as an 8-bit Verilog literal.
    pub fn literal(self) -> String {
        format!("8'h{:02x}", self.bits())
    }
}

/// One instruction of the fixed ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    /// 4-bit opcode; zero is reserved for the no-op.
    pub opcode: u8,
    /// Single-cycle control word used by the hardwired decoder.
    pub control: ControlWord,
    /// Micro-program walked by the microcoded decoder, one entry per cycle.
    pub micro_ops: &'static [ControlWord],
}

impl Instruction {
    /// Localparam name of the opcode.
    pub fn param_name(&self) -> String {
        format!("OP_{}", self.mnemonic)
    }
}

const ALU_ADD: ControlWord = ctl(AluOp::Add, true, false, false, false);
const ALU_SUB: ControlWord = ctl(AluOp::Sub, true, false, false, false);
const ALU_AND: ControlWord = ctl(AluOp::And, true, false, false, false);
const ALU_OR: ControlWord = ctl(AluOp::Or, true, false, false, false);
const ALU_XOR: ControlWord = ctl(AluOp::Xor, true, false, false, false);
const ALU_INC: ControlWord = ctl(AluOp::Inc, true, false, false, false);
const ALU_DEC: ControlWord = ctl(AluOp::Dec, true, false, false, false);
const COMPARE: ControlWord = ctl(AluOp::Sub, false, false, false, false);
const BRANCH: ControlWord = ctl(AluOp::Pass, false, false, false, true);

/// The instruction table, in opcode order.
pub static INSTRUCTIONS: [Instruction; 14] = [
    Instruction { mnemonic: "ADD", opcode: 1, control: ALU_ADD, micro_ops: &[ALU_ADD] },
    Instruction { mnemonic: "SUB", opcode: 2, control: ALU_SUB, micro_ops: &[ALU_SUB] },
    Instruction { mnemonic: "AND", opcode: 3, control: ALU_AND, micro_ops: &[ALU_AND] },
    Instruction { mnemonic: "OR", opcode: 4, control: ALU_OR, micro_ops: &[ALU_OR] },
    Instruction { mnemonic: "XOR", opcode: 5, control: ALU_XOR, micro_ops: &[ALU_XOR] },
    Instruction { mnemonic: "INC", opcode: 6, control: ALU_INC, micro_ops: &[ALU_INC] },
    Instruction { mnemonic: "DEC", opcode: 7, control: ALU_DEC, micro_ops: &[ALU_DEC] },
    Instruction {
        mnemonic: "MOV",
        opcode: 8,
        control: ctl(AluOp::Add, true, false, true, false),
        // address, then load and write back
        micro_ops: &[
            ctl(AluOp::Add, false, false, true, false),
            ctl(AluOp::Pass, true, false, false, false),
        ],
    },
    Instruction { mnemonic: "JMP", opcode: 9, control: BRANCH, micro_ops: &[BRANCH] },
    Instruction { mnemonic: "CMP", opcode: 10, control: COMPARE, micro_ops: &[COMPARE] },
    Instruction { mnemonic: "JE", opcode: 11, control: BRANCH, micro_ops: &[BRANCH] },
    Instruction { mnemonic: "JNE", opcode: 12, control: BRANCH, micro_ops: &[BRANCH] },
    Instruction {
        mnemonic: "PUSH",
        opcode: 13,
        control: ctl(AluOp::Dec, true, true, false, false),
        // decrement stack pointer, then store
        micro_ops: &[
            ctl(AluOp::Dec, true, false, false, false),
            ctl(AluOp::Pass, false, true, false, false),
        ],
    },
    Instruction {
        mnemonic: "POP",
        opcode: 14,
        control: ctl(AluOp::Inc, true, false, true, false),
        // load, then increment stack pointer
        micro_ops: &[
            ctl(AluOp::Pass, false, false, true, false),
            ctl(AluOp::Inc, true, false, false, false),
        ],
    },
];

/// Total micro-program entries, including the no-op at address zero.
pub fn micro_program_len() -> usize {
    1 + INSTRUCTIONS.iter().map(|i| i.micro_ops.len()).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_are_unique_and_fit() {
        let mut seen = std::collections::HashSet::new();
        for instr in &INSTRUCTIONS {
            assert!(instr.opcode > 0 && instr.opcode < 16, "{}", instr.mnemonic);
            assert!(seen.insert(instr.opcode));
        }
    }

    #[test]
    fn micro_programs_fit_step_counter() {
        for instr in &INSTRUCTIONS {
            assert!(!instr.micro_ops.is_empty());
            assert!(instr.micro_ops.len() <= 3, "{}", instr.mnemonic);
        }
        assert_eq!(micro_program_len(), 18);
    }

    #[test]
    fn control_word_packing() {
        let word = ctl(AluOp::Add, true, false, true, false);
        assert_eq!(word.bits(), 0x1a);
        assert_eq!(word.literal(), "8'h1a");
        assert_eq!(BRANCH.literal(), "8'h01");
    }
}
