//! Concurrent fixed-width range proof
//!
//! Proves `0 <= b < 2^32` for `A = g^r h^b`. The value is split into bits and
//! every bit commitment
//!
//! ```text
//! As[i] = g^{r_i} h^{b_i 2^i}
//! ```
//!
//! gets a two-member ring proof: either `As[i]` or `As[i] / h^{2^i}` is a
//! power of `g`. The rings are closed Borromean style through one aggregate
//! challenge:
//!
//! ```text
//! R1_i = g^{z1_i} (As[i] / h^{2^i})^C
//! c_i  = H(i, As[i], R1_i)
//! R0_i = g^{z0_i} As[i]^{c_i}
//! C    = H(g, h, {As[i], R0_i}) mod Q
//! ```
//!
//! The prover runs as two phases of 32 parallel tasks. Phase 1 produces the
//! bit commitments and the `R0_i` that `C` depends on, so `C` can only be
//! drawn once every phase 1 task has reported. Phase 2 closes each ring
//! under `C`. Both phases join on a bounded signal channel; any task error
//! aborts construction.
//!
//! Each bit carries both ring responses, so the encoding is
//! [`RANGE_PROOF_SIZE`] = 3200 bytes. The 2176-byte layout with a single
//! response per bit is not accepted by [`RangeProof::from_bytes`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use curve25519_dalek::scalar::Scalar;
use num_bigint::BigUint;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::mpsc, sync::Mutex};
use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, instrument};
use zkrp_core::{
    field::{biguint_to_be_fixed, reduce_mod_q, scalar_from_be_bytes, scalar_to_be_bytes, Q, SCALAR_BYTES},
    ChallengeTranscript, GroupElement, Sha256Transcript, ZkError, ZkResult, POINT_BYTES,
};

/// Number of bits covered by a proof
pub const RANGE_BITS: usize = 32;

/// Serialized size: `A, G, H, C` followed by `As[i], z0_i, z1_i` per bit
pub const RANGE_PROOF_SIZE: usize = RANGE_BITS * (POINT_BYTES + 2 * SCALAR_BYTES) + 4 * 32;

/// Domain label of the aggregate challenge
pub const CTRANGE_DOMAIN: &[u8] = b"zkrp_ctrange";

/// Domain label of the per-bit ring challenges
pub const CTRANGE_BIT_DOMAIN: &[u8] = b"zkrp_ctrange_bit";

/// Ring responses for one bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitResponse {
    /// Response for the `As[i] = g^r` member
    pub z0: Scalar,
    /// Response for the `As[i] / h^{2^i} = g^r` member
    pub z1: Scalar,
}

/// A 32-bit range proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    /// Aggregate challenge `C < Q`, big-endian
    pub c: [u8; 32],
    /// Per-bit commitments
    pub a_s: Vec<GroupElement>,
    /// Per-bit responses
    pub z_s: Vec<BitResponse>,
    /// Commitment to the value, `Σ As[i]`
    pub a: GroupElement,
    pub g: GroupElement,
    pub h: GroupElement,
}

/// Phase 1 output of one task
#[derive(Debug, Clone, Copy)]
struct BitState {
    bit: u8,
    r: Scalar,
    k: Scalar,
    a_s: GroupElement,
    r0: GroupElement,
    // Simulated response of the `As[i]` member when the bit is 1
    z0: Scalar,
}

fn check_generators(g: &GroupElement, h: &GroupElement) -> ZkResult<()> {
    if g.is_identity() || h.is_identity() {
        return Err(ZkError::InvalidRangeParams(
            "generators must not be the identity".to_string(),
        ));
    }
    Ok(())
}

/// `h, 2h, 4h, ..., 2^31 h`
fn doubling_points(h: &GroupElement) -> Vec<GroupElement> {
    let mut points = Vec::with_capacity(RANGE_BITS);
    let mut current = *h;
    for _ in 0..RANGE_BITS {
        points.push(current);
        current = current + current;
    }
    points
}

fn bit_challenge(i: usize, a_s: &GroupElement, r1: &GroupElement) -> Scalar {
    let mut transcript = Sha256Transcript::new(CTRANGE_BIT_DOMAIN);
    transcript.append_u64(b"i", i as u64);
    transcript.append_point(b"As", a_s);
    transcript.append_point(b"R1", r1);
    transcript.challenge_scalar(b"c_i")
}

fn aggregate_transcript(g: &GroupElement, h: &GroupElement) -> Sha256Transcript {
    let mut transcript = Sha256Transcript::new(CTRANGE_DOMAIN);
    transcript.append_point(b"g", g);
    transcript.append_point(b"h", h);
    transcript
}

/// Finish the aggregate transcript: `C = digest mod Q`
fn aggregate_challenge(mut transcript: Sha256Transcript) -> ZkResult<[u8; 32]> {
    let c = reduce_mod_q(&transcript.challenge_bytes());
    biguint_to_be_fixed(&c)
        .ok_or_else(|| ZkError::InvalidParams("aggregate challenge exceeds 32 bytes".to_string()))
}

/// `C` as a group exponent
fn challenge_scalar(c: &[u8; 32]) -> Scalar {
    let mut le = *c;
    le.reverse();
    Scalar::from_bytes_mod_order(le)
}

/// Run `task(0..RANGE_BITS)` in parallel and wait for all of them.
///
/// Each task reports on a bounded channel with one slot per task; the first
/// error reported fails the whole phase.
fn fork_join<F>(task: F) -> ZkResult<()>
where
    F: Fn(usize) -> ZkResult<()> + Sync,
{
    let (signal_tx, signal_rx) = mpsc::sync_channel::<Result<usize, (usize, ZkError)>>(RANGE_BITS);

    rayon::scope(|s| {
        for i in 0..RANGE_BITS {
            let signal_tx = signal_tx.clone();
            let task = &task;
            s.spawn(move |_| {
                // signal_rx outlives the scope and the channel holds one
                // slot per task, so this send neither blocks nor fails.
                signal_tx
                    .send(task(i).map(|()| i).map_err(|e| (i, e)))
                    .ok();
            });
        }
    });
    drop(signal_tx);

    let mut done = 0;
    for signal in signal_rx.iter() {
        match signal {
            Ok(_) => done += 1,
            Err((i, e)) => {
                return Err(ZkError::ConstructionFailed(format!("bit {}: {}", i, e)));
            }
        }
    }
    if done != RANGE_BITS {
        return Err(ZkError::ConstructionFailed(format!(
            "{} of {} bit tasks reported",
            done, RANGE_BITS
        )));
    }
    Ok(())
}

fn poisoned<T>(_: T) -> ZkError {
    ZkError::ConstructionFailed("lock poisoned".to_string())
}

fn collect_slots<T>(slots: Vec<Mutex<Option<T>>>) -> ZkResult<Vec<T>> {
    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.into_inner().map_err(poisoned)?.ok_or_else(|| {
                ZkError::ConstructionFailed(format!("bit {} produced no output", i))
            })
        })
        .collect()
}

impl RangeProof {
    /// Prove that `b` lies in `[0, 2^32)`.
    ///
    /// Returns the blinding witness `r` with `A = g^r h^b` together with the
    /// proof.
    #[instrument(skip_all)]
    pub fn prove(b: i64, g: &GroupElement, h: &GroupElement) -> ZkResult<(Scalar, Self)> {
        check_generators(g, h)?;
        if !(0..1i64 << RANGE_BITS).contains(&b) {
            return Err(ZkError::ValueOutOfRange { bits: RANGE_BITS });
        }
        let value = b as u64;
        let h_pows = doubling_points(h);
        let accumulator = Mutex::new(Scalar::ZERO);

        let phase1: Vec<Mutex<Option<BitState>>> =
            (0..RANGE_BITS).map(|_| Mutex::new(None)).collect();
        fork_join(|i| {
            let mut rng = thread_rng();
            let bit = ((value >> i) & 1) as u8;
            let r = Scalar::random(&mut rng);
            let k = Scalar::random(&mut rng);
            let a_s = GroupElement::multiscalar_mul([r, Scalar::from(bit)], [g.0, h_pows[i].0]);

            let (r0, z0) = if bit == 0 {
                (*g * k, Scalar::ZERO)
            } else {
                let c_i = bit_challenge(i, &a_s, &(*g * k));
                let z0 = Scalar::random(&mut rng);
                (GroupElement::multiscalar_mul([z0, c_i], [g.0, a_s.0]), z0)
            };

            *accumulator.lock().map_err(poisoned)? += r;
            *phase1[i].lock().map_err(poisoned)? = Some(BitState {
                bit,
                r,
                k,
                a_s,
                r0,
                z0,
            });
            Ok(())
        })?;
        let states = collect_slots(phase1)?;
        debug!("phase 1 complete");

        let mut transcript = aggregate_transcript(g, h);
        for state in &states {
            transcript.append_point(b"As", &state.a_s);
            transcript.append_point(b"R0", &state.r0);
        }
        let c = aggregate_challenge(transcript).map_err(|e| ZkError::ConstructionFailed(e.to_string()))?;
        let c_scalar = challenge_scalar(&c);

        let phase2: Vec<Mutex<Option<BitResponse>>> =
            (0..RANGE_BITS).map(|_| Mutex::new(None)).collect();
        fork_join(|i| {
            let state = &states[i];
            let response = if state.bit == 0 {
                let z1 = Scalar::random(&mut thread_rng());
                let p1 = state.a_s - h_pows[i];
                let r1 = GroupElement::multiscalar_mul([z1, c_scalar], [g.0, p1.0]);
                let c_i = bit_challenge(i, &state.a_s, &r1);
                BitResponse {
                    z0: state.k - c_i * state.r,
                    z1,
                }
            } else {
                BitResponse {
                    z0: state.z0,
                    z1: state.k - c_scalar * state.r,
                }
            };
            *phase2[i].lock().map_err(poisoned)? = Some(response);
            Ok(())
        })?;
        let z_s = collect_slots(phase2)?;
        debug!("phase 2 complete");

        let r = accumulator.into_inner().map_err(poisoned)?;
        let a_s: Vec<GroupElement> = states.iter().map(|state| state.a_s).collect();
        let a: GroupElement = a_s.iter().copied().sum();

        Ok((
            r,
            Self {
                c,
                a_s,
                z_s,
                a,
                g: *g,
                h: *h,
            },
        ))
    }

    /// Assemble a proof from its components
    pub fn from_parts(
        c: [u8; 32],
        a_s: Vec<GroupElement>,
        z_s: Vec<BitResponse>,
        a: GroupElement,
        g: GroupElement,
        h: GroupElement,
    ) -> ZkResult<Self> {
        let proof = Self {
            c,
            a_s,
            z_s,
            a,
            g,
            h,
        };
        proof.check_lengths()?;
        Ok(proof)
    }

    fn check_lengths(&self) -> ZkResult<()> {
        for len in [self.a_s.len(), self.z_s.len()] {
            if len != RANGE_BITS {
                return Err(ZkError::VectorLengthMismatch {
                    expected: RANGE_BITS,
                    actual: len,
                });
            }
        }
        Ok(())
    }

    /// Aggregate challenge as an integer
    pub fn challenge(&self) -> BigUint {
        BigUint::from_bytes_be(&self.c)
    }

    /// Verify the proof against the commitment and generators it carries
    #[instrument(skip_all)]
    pub fn verify(&self) -> ZkResult<bool> {
        self.check_lengths()?;
        check_generators(&self.g, &self.h)?;
        let c_scalar = challenge_scalar(&self.c);
        let h_pows = doubling_points(&self.h);

        let mut transcript = aggregate_transcript(&self.g, &self.h);
        for (i, (a_s, z)) in self.a_s.iter().zip(self.z_s.iter()).enumerate() {
            let p1 = *a_s - h_pows[i];
            let r1 = GroupElement::multiscalar_mul([z.z1, c_scalar], [self.g.0, p1.0]);
            let c_i = bit_challenge(i, a_s, &r1);
            let r0 = GroupElement::multiscalar_mul([z.z0, c_i], [self.g.0, a_s.0]);
            transcript.append_point(b"As", a_s);
            transcript.append_point(b"R0", &r0);
        }
        let c_hat = aggregate_challenge(transcript)?;
        let sum: GroupElement = self.a_s.iter().copied().sum();

        let ok: Choice = c_hat[..].ct_eq(&self.c[..]) & sum.ct_eq(&self.a);
        let ok = bool::from(ok);
        debug!(ok, "ctrange proof verified");
        Ok(ok)
    }

    /// Verify and additionally require the proof to be about `a` under `g, h`
    pub fn verify_commitment(
        &self,
        a: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<bool> {
        let bound = self.a.ct_eq(a) & self.g.ct_eq(g) & self.h.ct_eq(h);
        let ok = self.verify()?;
        Ok(ok & bool::from(bound))
    }

    /// Fixed-size encoding: `A ‖ G ‖ H ‖ C ‖ (As[i] ‖ z0_i ‖ z1_i)*32`, with
    /// `C` and all responses big-endian
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(RANGE_PROOF_SIZE);
        result.extend_from_slice(&self.a.to_bytes());
        result.extend_from_slice(&self.g.to_bytes());
        result.extend_from_slice(&self.h.to_bytes());
        result.extend_from_slice(&self.c);
        for (a_s, z) in self.a_s.iter().zip(self.z_s.iter()) {
            result.extend_from_slice(&a_s.to_bytes());
            result.extend_from_slice(&scalar_to_be_bytes(&z.z0));
            result.extend_from_slice(&scalar_to_be_bytes(&z.z1));
        }
        result
    }

    /// Decode the fixed-size encoding
    pub fn from_bytes(bytes: &[u8]) -> ZkResult<Self> {
        if bytes.len() != RANGE_PROOF_SIZE {
            return Err(ZkError::InvalidEncoding(format!(
                "range proof must be {} bytes, got {}",
                RANGE_PROOF_SIZE,
                bytes.len()
            )));
        }
        let (header, body) = bytes.split_at(4 * 32);

        let a = GroupElement::from_bytes(&header[..32])?;
        let g = GroupElement::from_bytes(&header[32..64])?;
        let h = GroupElement::from_bytes(&header[64..96])?;
        let mut c = [0u8; 32];
        c.copy_from_slice(&header[96..128]);
        if BigUint::from_bytes_be(&c) >= *Q {
            return Err(ZkError::InvalidEncoding(
                "aggregate challenge is not reduced".to_string(),
            ));
        }

        let mut a_s = Vec::with_capacity(RANGE_BITS);
        let mut z_s = Vec::with_capacity(RANGE_BITS);
        for chunk in body.chunks_exact(POINT_BYTES + 2 * SCALAR_BYTES) {
            a_s.push(GroupElement::from_bytes(&chunk[..POINT_BYTES])?);
            z_s.push(BitResponse {
                z0: scalar_from_be_bytes(&chunk[POINT_BYTES..POINT_BYTES + SCALAR_BYTES])?,
                z1: scalar_from_be_bytes(&chunk[POINT_BYTES + SCALAR_BYTES..])?,
            });
        }

        Self::from_parts(c, a_s, z_s, a, g, h)
    }
}

impl fmt::Display for RangeProof {
    /// Base64 of [`RangeProof::to_bytes`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&STANDARD.encode(self.to_bytes()))
    }
}

impl FromStr for RangeProof {
    type Err = ZkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| ZkError::InvalidEncoding(format!("base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}
