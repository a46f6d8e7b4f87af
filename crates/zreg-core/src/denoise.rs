//! Optional denoising of channel sub-stacks before registration.

use ndarray::Array3;

use crate::error::{Result, ZregError};

/// An external denoiser driven in-process.
///
/// Receives a batch of (row, column, frame) stacks and must return the same
/// number of stacks, each with the shape of its input.
pub trait Denoiser: Send + Sync {
    fn name(&self) -> &str;

    fn denoise(&self, stacks: Vec<Array3<f32>>) -> Result<Vec<Array3<f32>>>;
}

/// Returns its input unchanged.
pub struct IdentityDenoiser;

impl Denoiser for IdentityDenoiser {
    fn name(&self) -> &str {
        "identity"
    }

    fn denoise(&self, stacks: Vec<Array3<f32>>) -> Result<Vec<Array3<f32>>> {
        Ok(stacks)
    }
}

/// Run `denoiser` on `stacks` and check that the batch came back intact.
pub fn denoise_batch(
    denoiser: &dyn Denoiser,
    stacks: Vec<Array3<f32>>,
) -> Result<Vec<Array3<f32>>> {
    let shapes: Vec<(usize, usize, usize)> = stacks.iter().map(Array3::dim).collect();
    let output = denoiser.denoise(stacks)?;

    if output.len() != shapes.len() {
        return Err(ZregError::DenoiseBatchMismatch(format!(
            "{} returned {} stacks for a batch of {}",
            denoiser.name(),
            output.len(),
            shapes.len()
        )));
    }
    for (i, (stack, expected)) in output.iter().zip(&shapes).enumerate() {
        if stack.dim() != *expected {
            return Err(ZregError::DenoiseBatchMismatch(format!(
                "{} changed stack {} from {:?} to {:?}",
                denoiser.name(),
                i,
                expected,
                stack.dim()
            )));
        }
    }
    Ok(output)
}
