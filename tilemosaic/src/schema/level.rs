//! Nearest-resolution level selection.
//!
//! Given a schema's resolution ladder and the resolution a view actually
//! needs, picks the level whose resolution is numerically closest. The
//! tie-break direction at exact midpoints is a policy choice, not a fact
//! of the ladder, so it is explicit in the signature.

use super::SchemaError;

/// Which candidate wins when the target sits exactly between two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// Prefer the coarser (larger ground-units-per-pixel) candidate.
    /// Coarser tiles cover more ground, so this errs toward fewer fetches.
    #[default]
    Coarser,
    /// Prefer the finer (smaller ground-units-per-pixel) candidate.
    Finer,
}

/// Select the level whose resolution is nearest to `target`.
///
/// # Arguments
///
/// * `resolutions` - The schema's resolution ladder (strictly monotonic)
/// * `target` - Requested ground resolution in units per pixel
/// * `tie` - Tie-break direction at exact midpoints
///
/// # Returns
///
/// The index of the nearest level. For every other index the absolute
/// difference from `target` is greater than or equal to the winner's.
///
/// # Errors
///
/// [`SchemaError::EmptyResolutions`] when the ladder is empty; a schema
/// with no levels is misconfigured and the render call must abort.
pub fn select_level(
    resolutions: &[f64],
    target: f64,
    tie: TiePolicy,
) -> Result<usize, SchemaError> {
    if resolutions.is_empty() {
        return Err(SchemaError::EmptyResolutions);
    }

    let mut best = 0usize;
    for (i, &candidate) in resolutions.iter().enumerate().skip(1) {
        let best_diff = (resolutions[best] - target).abs();
        let diff = (candidate - target).abs();

        if diff < best_diff {
            best = i;
        } else if diff == best_diff {
            let replace = match tie {
                TiePolicy::Coarser => candidate > resolutions[best],
                TiePolicy::Finer => candidate < resolutions[best],
            };
            if replace {
                best = i;
            }
        }
    }

    Ok(best)
}
