//! ISA and microarchitecture parameters of a generated core.
//!
//! Each field of [`ParameterSet`] is a closed enum, so a value outside its
//! domain cannot be constructed. Serialized forms use kebab-case names for
//! the symbolic domains and plain integers for the counted ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::hash::Fingerprint;

/// Architectural register names, in register-file index order.
pub const REGISTER_NAMES: [&str; 8] = ["RAX", "RBX", "RCX", "RDX", "R8", "R9", "R10", "R11"];

/// Number of general-purpose registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NumRegs {
    Four,
    Six,
    Eight,
}

impl NumRegs {
    /// Domain in draw order.
    pub const ALL: [NumRegs; 3] = [NumRegs::Four, NumRegs::Six, NumRegs::Eight];

    /// Register count as an integer.
    pub fn count(self) -> u8 {
        match self {
            NumRegs::Four => 4,
            NumRegs::Six => 6,
            NumRegs::Eight => 8,
        }
    }

    /// Names of the registers present in a file of this size.
    pub fn names(self) -> &'static [&'static str] {
        &REGISTER_NAMES[..usize::from(self.count())]
    }
}

impl From<NumRegs> for u8 {
    fn from(value: NumRegs) -> Self {
        value.count()
    }
}

impl TryFrom<u8> for NumRegs {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(NumRegs::Four),
            6 => Ok(NumRegs::Six),
            8 => Ok(NumRegs::Eight),
            other => Err(CoreError::OutOfDomain {
                field: ParamField::NumRegs.name(),
                value: other.to_string(),
            }),
        }
    }
}

/// Instruction decoder style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecoderType {
    /// Single-cycle combinational opcode lookup.
    Hardwired,
    /// Multi-cycle walk through a fixed micro-program table.
    Microcoded,
}

impl DecoderType {
    /// Domain in draw order.
    pub const ALL: [DecoderType; 2] = [DecoderType::Hardwired, DecoderType::Microcoded];

    pub fn as_str(self) -> &'static str {
        match self {
            DecoderType::Hardwired => "hardwired",
            DecoderType::Microcoded => "microcoded",
        }
    }
}

/// Number of pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PipelineDepth {
    Two,
    Three,
    Four,
}

impl PipelineDepth {
    /// Domain in draw order.
    pub const ALL: [PipelineDepth; 3] = [PipelineDepth::Two, PipelineDepth::Three, PipelineDepth::Four];

    /// Stage count as an integer.
    pub fn stages(self) -> u8 {
        match self {
            PipelineDepth::Two => 2,
            PipelineDepth::Three => 3,
            PipelineDepth::Four => 4,
        }
    }
}

impl From<PipelineDepth> for u8 {
    fn from(value: PipelineDepth) -> Self {
        value.stages()
    }
}

impl TryFrom<u8> for PipelineDepth {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(PipelineDepth::Two),
            3 => Ok(PipelineDepth::Three),
            4 => Ok(PipelineDepth::Four),
            other => Err(CoreError::OutOfDomain {
                field: ParamField::PipelineDepth.name(),
                value: other.to_string(),
            }),
        }
    }
}

/// A memory-operand addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressingMode {
    /// `[reg]`
    RegOnly,
    /// `[reg+imm]`
    RegPlusImmediate,
    /// `[reg+reg]`
    RegPlusReg,
}

impl AddressingMode {
    pub const ALL: [AddressingMode; 3] = [
        AddressingMode::RegOnly,
        AddressingMode::RegPlusImmediate,
        AddressingMode::RegPlusReg,
    ];

    /// Value of the 2-bit mode field in the instruction word.
    pub fn encoding(self) -> u8 {
        match self {
            AddressingMode::RegOnly => 0,
            AddressingMode::RegPlusImmediate => 1,
            AddressingMode::RegPlusReg => 2,
        }
    }

    /// Assembly syntax of the mode.
    pub fn syntax(self) -> &'static str {
        match self {
            AddressingMode::RegOnly => "[reg]",
            AddressingMode::RegPlusImmediate => "[reg+imm]",
            AddressingMode::RegPlusReg => "[reg+reg]",
        }
    }

    fn bit(self) -> u8 {
        1 << self.encoding()
    }
}

/// Non-empty set of supported addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<AddressingMode>", into = "Vec<AddressingMode>")]
pub struct AddressingModes(u8);

impl AddressingModes {
    /// Build a set from the given modes. Duplicates collapse.
    pub fn new<I: IntoIterator<Item = AddressingMode>>(modes: I) -> Result<Self> {
        let mask = modes.into_iter().fold(0u8, |acc, m| acc | m.bit());
        if mask == 0 {
            return Err(CoreError::EmptyAddressingModes);
        }
        Ok(Self(mask))
    }

    /// Every addressing mode.
    pub fn all() -> Self {
        Self(AddressingMode::ALL.iter().fold(0, |acc, m| acc | m.bit()))
    }

    /// Tiered policy tying addressing complexity to register count:
    /// 4 registers get `[reg]`, 6 add `[reg+imm]`, 8 get all three.
    pub fn for_registers(num_regs: NumRegs) -> Self {
        let tier = match num_regs {
            NumRegs::Four => 1,
            NumRegs::Six => 2,
            NumRegs::Eight => 3,
        };
        Self(
            AddressingMode::ALL[..tier]
                .iter()
                .fold(0, |acc, m| acc | m.bit()),
        )
    }

    /// All seven non-empty subsets, smallest mask first.
    pub fn subsets() -> impl Iterator<Item = AddressingModes> {
        (1u8..8).map(AddressingModes)
    }

    pub fn contains(self, mode: AddressingMode) -> bool {
        self.0 & mode.bit() != 0
    }

    /// Members in encoding order.
    pub fn iter(self) -> impl Iterator<Item = AddressingMode> {
        AddressingMode::ALL
            .into_iter()
            .filter(move |m| self.contains(*m))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Always false; present for API symmetry with collections.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<Vec<AddressingMode>> for AddressingModes {
    type Error = CoreError;

    fn try_from(value: Vec<AddressingMode>) -> Result<Self> {
        AddressingModes::new(value)
    }
}

impl From<AddressingModes> for Vec<AddressingMode> {
    fn from(value: AddressingModes) -> Self {
        value.iter().collect()
    }
}

impl fmt::Display for AddressingModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(AddressingMode::syntax).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Execution unit arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecUnits {
    /// One ALU shared by address and data computation.
    SingleAlu,
    /// Independent AGU and ALU usable in the same cycle.
    SeparateAguAlu,
}

impl ExecUnits {
    pub const ALL: [ExecUnits; 2] = [ExecUnits::SingleAlu, ExecUnits::SeparateAguAlu];

    pub fn as_str(self) -> &'static str {
        match self {
            ExecUnits::SingleAlu => "single-alu",
            ExecUnits::SeparateAguAlu => "separate-agu-alu",
        }
    }
}

/// Memory subsystem style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryInterface {
    /// Flat fixed-latency store.
    Simple,
    /// Direct-mapped cache in front of the store.
    Cached,
}

impl MemoryInterface {
    pub const ALL: [MemoryInterface; 2] = [MemoryInterface::Simple, MemoryInterface::Cached];

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryInterface::Simple => "simple",
            MemoryInterface::Cached => "cached",
        }
    }
}

/// Names of the six parameter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamField {
    NumRegs,
    DecoderType,
    PipelineDepth,
    AddressingModes,
    ExecUnits,
    MemoryInterface,
}

impl ParamField {
    pub const ALL: [ParamField; 6] = [
        ParamField::NumRegs,
        ParamField::DecoderType,
        ParamField::PipelineDepth,
        ParamField::AddressingModes,
        ParamField::ExecUnits,
        ParamField::MemoryInterface,
    ];

    /// Field name as used in configuration files and serialized output.
    pub fn name(self) -> &'static str {
        match self {
            ParamField::NumRegs => "num_regs",
            ParamField::DecoderType => "decoder_type",
            ParamField::PipelineDepth => "pipeline_depth",
            ParamField::AddressingModes => "addressing_modes",
            ParamField::ExecUnits => "exec_units",
            ParamField::MemoryInterface => "memory_interface",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full ISA/microarchitecture choice for one generated core.
///
/// Built once per derivation and never mutated. Field order is the
/// canonical serialization order used for fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSet {
    num_regs: NumRegs,
    decoder_type: DecoderType,
    pipeline_depth: PipelineDepth,
    addressing_modes: AddressingModes,
    exec_units: ExecUnits,
    memory_interface: MemoryInterface,
}

impl ParameterSet {
    pub fn new(
        num_regs: NumRegs,
        decoder_type: DecoderType,
        pipeline_depth: PipelineDepth,
        addressing_modes: AddressingModes,
        exec_units: ExecUnits,
        memory_interface: MemoryInterface,
    ) -> Self {
        Self {
            num_regs,
            decoder_type,
            pipeline_depth,
            addressing_modes,
            exec_units,
            memory_interface,
        }
    }

    pub fn num_regs(&self) -> NumRegs {
        self.num_regs
    }

    pub fn decoder_type(&self) -> DecoderType {
        self.decoder_type
    }

    pub fn pipeline_depth(&self) -> PipelineDepth {
        self.pipeline_depth
    }

    pub fn addressing_modes(&self) -> AddressingModes {
        self.addressing_modes
    }

    pub fn exec_units(&self) -> ExecUnits {
        self.exec_units
    }

    pub fn memory_interface(&self) -> MemoryInterface {
        self.memory_interface
    }

    /// Content-addressable fingerprint of the canonical serialization.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Fingerprint::of(self)
    }

    /// Rendered value of one field, as printed in reports.
    pub fn field_value(&self, field: ParamField) -> String {
        match field {
            ParamField::NumRegs => self.num_regs.count().to_string(),
            ParamField::DecoderType => self.decoder_type.as_str().to_string(),
            ParamField::PipelineDepth => self.pipeline_depth.stages().to_string(),
            ParamField::AddressingModes => self.addressing_modes.to_string(),
            ParamField::ExecUnits => self.exec_units.as_str().to_string(),
            ParamField::MemoryInterface => self.memory_interface.as_str().to_string(),
        }
    }

    /// Every combination of field domains, including addressing subsets
    /// that derivation never produces.
    pub fn enumerate() -> impl Iterator<Item = ParameterSet> {
        NumRegs::ALL.into_iter().flat_map(|num_regs| {
            DecoderType::ALL.into_iter().flat_map(move |decoder_type| {
                PipelineDepth::ALL.into_iter().flat_map(move |pipeline_depth| {
                    AddressingModes::subsets().flat_map(move |addressing_modes| {
                        ExecUnits::ALL.into_iter().flat_map(move |exec_units| {
                            MemoryInterface::ALL.into_iter().map(move |memory_interface| {
                                ParameterSet::new(
                                    num_regs,
                                    decoder_type,
                                    pipeline_depth,
                                    addressing_modes,
                                    exec_units,
                                    memory_interface,
                                )
                            })
                        })
                    })
                })
            })
        })
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = ParamField::ALL
            .iter()
            .map(|field| format!("{field}={}", self.field_value(*field)))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterSet {
        ParameterSet::new(
            NumRegs::Six,
            DecoderType::Microcoded,
            PipelineDepth::Three,
            AddressingModes::for_registers(NumRegs::Six),
            ExecUnits::SeparateAguAlu,
            MemoryInterface::Cached,
        )
    }

    #[test]
    fn tier_policy() {
        let four: Vec<_> = AddressingModes::for_registers(NumRegs::Four).iter().collect();
        assert_eq!(four, vec![AddressingMode::RegOnly]);

        let six = AddressingModes::for_registers(NumRegs::Six);
        assert_eq!(six.len(), 2);
        assert!(six.contains(AddressingMode::RegPlusImmediate));
        assert!(!six.contains(AddressingMode::RegPlusReg));

        assert_eq!(AddressingModes::for_registers(NumRegs::Eight), AddressingModes::all());
    }

    #[test]
    fn empty_addressing_set_rejected() {
        assert!(matches!(
            AddressingModes::new(Vec::<AddressingMode>::new()),
            Err(CoreError::EmptyAddressingModes)
        ));
    }

    #[test]
    fn duplicate_modes_collapse() {
        let modes = AddressingModes::new([AddressingMode::RegOnly, AddressingMode::RegOnly]).unwrap();
        assert_eq!(modes.len(), 1);
    }

    #[test]
    fn register_names_follow_count() {
        assert_eq!(NumRegs::Four.names(), &["RAX", "RBX", "RCX", "RDX"]);
        assert_eq!(NumRegs::Eight.names().len(), 8);
    }

    #[test]
    fn out_of_domain_integers_rejected() {
        assert!(NumRegs::try_from(5).is_err());
        assert!(PipelineDepth::try_from(1).is_err());
        assert_eq!(PipelineDepth::try_from(4).unwrap(), PipelineDepth::Four);
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"num_regs":6,"decoder_type":"microcoded","pipeline_depth":3,"addressing_modes":["reg-only","reg-plus-immediate"],"exec_units":"separate-agu-alu","memory_interface":"cached"}"#
        );
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn json_rejects_bad_domains() {
        let bad = r#"{"num_regs":5,"decoder_type":"hardwired","pipeline_depth":2,"addressing_modes":["reg-only"],"exec_units":"single-alu","memory_interface":"simple"}"#;
        assert!(serde_json::from_str::<ParameterSet>(bad).is_err());
        let empty = r#"{"num_regs":4,"decoder_type":"hardwired","pipeline_depth":2,"addressing_modes":[],"exec_units":"single-alu","memory_interface":"simple"}"#;
        assert!(serde_json::from_str::<ParameterSet>(empty).is_err());
    }

    #[test]
    fn display_lists_every_field() {
        let text = sample().to_string();
        assert_eq!(
            text,
            "num_regs=6 decoder_type=microcoded pipeline_depth=3 \
             addressing_modes={[reg], [reg+imm]} exec_units=separate-agu-alu memory_interface=cached"
        );
    }

    #[test]
    fn enumerate_covers_all_combinations() {
        let all: Vec<_> = ParameterSet::enumerate().collect();
        assert_eq!(all.len(), 3 * 2 * 3 * 7 * 2 * 2);
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn fingerprint_stable() {
        assert_eq!(sample().fingerprint().unwrap(), sample().fingerprint().unwrap());
    }
}
