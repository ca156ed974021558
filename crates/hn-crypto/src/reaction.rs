//! Homomorphic combination of anonymous reaction ciphertexts.
//!
//! A reaction vote and a message's running tally are both four parallel
//! arrays of compressed Ristretto points, one entry per emoji slot
//! ([`REACTION_SLOT_COUNT`]): `c1x`/`c1y` is one masked point pair, `c2x`/`c2y`
//! is the other. `combine` folds a vote into a tally (or removes one, for
//! the update-vote path) by adding or subtracting the corresponding points
//! slot by slot — the node never decompresses a vote to see which slots it
//! touched, only adds or removes its encrypted contribution.

use crate::errors::CryptoError;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use hn_types::payload::{CurveCoordinate, REACTION_SLOT_COUNT};

type Quad<'a> = (
    &'a [CurveCoordinate],
    &'a [CurveCoordinate],
    &'a [CurveCoordinate],
    &'a [CurveCoordinate],
);

type QuadOwned = (
    Vec<CurveCoordinate>,
    Vec<CurveCoordinate>,
    Vec<CurveCoordinate>,
    Vec<CurveCoordinate>,
);

fn decode(slot: &CurveCoordinate, index: usize) -> Result<RistrettoPoint, CryptoError> {
    CompressedRistretto(*slot)
        .decompress()
        .ok_or(CryptoError::InvalidCurvePoint(index))
}

fn check_len(array: &[CurveCoordinate]) -> Result<(), CryptoError> {
    if array.len() != REACTION_SLOT_COUNT {
        return Err(CryptoError::InvalidSlotCount {
            expected: REACTION_SLOT_COUNT,
            actual: array.len(),
        });
    }
    Ok(())
}

fn combine_array(
    a: &[CurveCoordinate],
    b: &[CurveCoordinate],
    negate_b: bool,
) -> Result<Vec<CurveCoordinate>, CryptoError> {
    check_len(a)?;
    check_len(b)?;
    a.iter()
        .zip(b.iter())
        .enumerate()
        .map(|(i, (x, y))| {
            let left = decode(x, i)?;
            let right = decode(y, i)?;
            let sum = if negate_b { left - right } else { left + right };
            Ok(sum.compress().to_bytes())
        })
        .collect()
}

fn combine_quads(tally: Quad<'_>, vote: Quad<'_>, negate: bool) -> Result<QuadOwned, CryptoError> {
    Ok((
        combine_array(tally.0, vote.0, negate)?,
        combine_array(tally.1, vote.1, negate)?,
        combine_array(tally.2, vote.2, negate)?,
        combine_array(tally.3, vote.3, negate)?,
    ))
}

/// Fold a vote's four ciphertext arrays additively into a running tally.
///
/// Fails if either side does not carry exactly [`REACTION_SLOT_COUNT`]
/// entries per array, or any coordinate fails to decompress to a valid
/// Ristretto point.
pub fn combine(tally: Quad<'_>, vote: Quad<'_>) -> Result<QuadOwned, CryptoError> {
    combine_quads(tally, vote, false)
}

/// Replace a previously-combined vote with a new one in a single pass:
/// subtract the old vote's contribution, then add the new vote's.
pub fn replace(tally: Quad<'_>, old_vote: Quad<'_>, new_vote: Quad<'_>) -> Result<QuadOwned, CryptoError> {
    let without_old = combine_quads(tally, old_vote, true)?;
    let without_old_refs = (
        without_old.0.as_slice(),
        without_old.1.as_slice(),
        without_old.2.as_slice(),
        without_old.3.as_slice(),
    );
    combine_quads(without_old_refs, new_vote, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
    use curve25519_dalek::scalar::Scalar;

    fn point_array(scalar_seed: u64) -> Vec<CurveCoordinate> {
        (0..REACTION_SLOT_COUNT as u64)
            .map(|i| {
                let scalar = Scalar::from(scalar_seed + i + 1);
                (RISTRETTO_BASEPOINT_POINT * scalar).compress().to_bytes()
            })
            .collect()
    }

    fn zero_array() -> Vec<CurveCoordinate> {
        (0..REACTION_SLOT_COUNT)
            .map(|_| RistrettoPoint::default().compress().to_bytes())
            .collect()
    }

    #[test]
    fn combine_then_subtract_returns_identity() {
        let zero = zero_array();
        let vote = point_array(1);
        let tally = (
            zero.as_slice(),
            zero.as_slice(),
            zero.as_slice(),
            zero.as_slice(),
        );
        let vote_quad = (vote.as_slice(), vote.as_slice(), vote.as_slice(), vote.as_slice());

        let combined = combine(tally, vote_quad).unwrap();
        let combined_refs = (
            combined.0.as_slice(),
            combined.1.as_slice(),
            combined.2.as_slice(),
            combined.3.as_slice(),
        );
        let back = combine_quads(combined_refs, vote_quad, true).unwrap();

        assert_eq!(back.0, zero);
    }

    #[test]
    fn rejects_wrong_slot_count() {
        let short = vec![[0u8; 32]; REACTION_SLOT_COUNT - 1];
        let full = zero_array();
        let tally = (full.as_slice(), full.as_slice(), full.as_slice(), full.as_slice());
        let bad_vote = (short.as_slice(), full.as_slice(), full.as_slice(), full.as_slice());

        let err = combine(tally, bad_vote).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidSlotCount { .. }));
    }

    #[test]
    fn replace_is_equivalent_to_subtract_then_add() {
        let zero = zero_array();
        let old_vote = point_array(1);
        let new_vote = point_array(100);
        let tally = (
            zero.as_slice(),
            zero.as_slice(),
            zero.as_slice(),
            zero.as_slice(),
        );
        let old_quad = (
            old_vote.as_slice(),
            old_vote.as_slice(),
            old_vote.as_slice(),
            old_vote.as_slice(),
        );
        let new_quad = (
            new_vote.as_slice(),
            new_vote.as_slice(),
            new_vote.as_slice(),
            new_vote.as_slice(),
        );

        let with_old = combine(tally, old_quad).unwrap();
        let with_old_refs = (
            with_old.0.as_slice(),
            with_old.1.as_slice(),
            with_old.2.as_slice(),
            with_old.3.as_slice(),
        );
        let expected = combine(tally, new_quad).unwrap();
        let via_replace = replace(with_old_refs, old_quad, new_quad).unwrap();

        assert_eq!(via_replace, expected);
    }
}
