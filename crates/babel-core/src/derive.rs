//! Seed → parameter-set derivation.
//!
//! The draw order below is part of the reproducibility contract: the
//! generator is stateful, so reordering the steps changes which word each
//! field consumes and therefore the design a seed names.

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::params::{
    AddressingModes, DecoderType, ExecUnits, MemoryInterface, NumRegs, ParameterSet,
    PipelineDepth,
};
use crate::rng::CounterRng;

/// Largest seed, in bytes, accepted at process boundaries.
pub const MAX_SEED_BYTES: usize = 1 << 20;

/// One step of the derivation, in contract order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    NumRegs,
    DecoderType,
    PipelineDepth,
    AddressingModes,
    ExecUnits,
    MemoryInterface,
}

impl DrawStep {
    pub const ORDER: [DrawStep; 6] = [
        DrawStep::NumRegs,
        DrawStep::DecoderType,
        DrawStep::PipelineDepth,
        DrawStep::AddressingModes,
        DrawStep::ExecUnits,
        DrawStep::MemoryInterface,
    ];
}

/// Audit record of a single derivation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub step: DrawStep,
    /// Generator position consumed, or `None` when the value follows from
    /// earlier draws (the addressing tier).
    pub counter: Option<u64>,
    /// Index chosen within the domain.
    pub index: usize,
    pub domain_len: usize,
}

/// Reject seeds beyond [`MAX_SEED_BYTES`].
///
/// Derivation itself accepts any string; this bound is applied where
/// untrusted input enters the process.
pub fn validate_seed(seed: &str) -> Result<()> {
    if seed.len() > MAX_SEED_BYTES {
        return Err(CoreError::SeedTooLong {
            len: seed.len(),
            max: MAX_SEED_BYTES,
        });
    }
    Ok(())
}

/// Derive the parameter set named by `seed`.
pub fn derive(seed: &str) -> ParameterSet {
    derive_traced(seed).0
}

/// Derive the parameter set named by `seed`, returning the draw trace.
pub fn derive_traced(seed: &str) -> (ParameterSet, Vec<DrawRecord>) {
    let mut rng = CounterRng::from_seed(seed.as_bytes());
    let mut trace = Vec::with_capacity(DrawStep::ORDER.len());

    let num_regs = draw(&mut rng, &mut trace, DrawStep::NumRegs, &NumRegs::ALL);
    let decoder_type = draw(&mut rng, &mut trace, DrawStep::DecoderType, &DecoderType::ALL);
    let pipeline_depth = draw(&mut rng, &mut trace, DrawStep::PipelineDepth, &PipelineDepth::ALL);

    let addressing_modes = AddressingModes::for_registers(num_regs);
    trace.push(DrawRecord {
        step: DrawStep::AddressingModes,
        counter: None,
        index: addressing_modes.len() - 1,
        domain_len: NumRegs::ALL.len(),
    });

    let exec_units = draw(&mut rng, &mut trace, DrawStep::ExecUnits, &ExecUnits::ALL);
    let memory_interface = draw(&mut rng, &mut trace, DrawStep::MemoryInterface, &MemoryInterface::ALL);

    let params = ParameterSet::new(
        num_regs,
        decoder_type,
        pipeline_depth,
        addressing_modes,
        exec_units,
        memory_interface,
    );
    debug!(seed_bytes = seed.len(), draws = rng.counter(), %params, "derived parameter set");
    (params, trace)
}

fn draw<T: Copy>(
    rng: &mut CounterRng,
    trace: &mut Vec<DrawRecord>,
    step: DrawStep,
    domain: &[T],
) -> T {
    let counter = rng.counter();
    let index = rng.below(domain.len() as u64) as usize;
    trace.push(DrawRecord {
        step,
        counter: Some(counter),
        index,
        domain_len: domain.len(),
    });
    domain[index]
}
