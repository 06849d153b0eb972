//! Sequential range proof
//!
//! Proves `0 <= b < 2^n` for `T = g^b h^r` by committing to every bit
//! separately and linking the bits back to `T`:
//!
//! ```text
//! A_i = g^{b_i} h^{r_i}                       one binary proof per A_i
//! T'  = Π A_i^{2^i} = g^b h^{r'},  r' = Σ 2^i r_i
//! same-value proof for (T, T')
//! ```
//!
//! All `n + 1` sub-proofs answer a single challenge drawn from a merlin
//! transcript over `g, h, T, {A_i, Ca_i, Cb_i}, A_T, A_T'`, so no bit can be
//! forged independently of the others.

use curve25519_dalek::scalar::Scalar;
use num_bigint::BigInt;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sigma::{BinaryCommitment, BinaryProof, SameValueCommitment, SameValueProof, SameValueWitness};
use subtle::Choice;
use tracing::{debug, instrument};
use zkrp_core::{
    field::{self, scalar_from_le_bytes, SCALAR_BYTES},
    pedersen, proof_transcript, ChallengeTranscript, GroupElement, Transcript, ZkError, ZkResult,
    POINT_BYTES,
};

/// Widest supported range; `2^MAX_BITS` stays below the group order
pub const MAX_BITS: usize = 251;

/// Domain label of the sequential range proof transcript
pub const COMMIT_RANGE_DOMAIN: &[u8] = b"zkrp_commit_range";

/// Bytes per bit: `A_i, Ca_i, Cb_i, f_i, za_i, zb_i`
const PER_BIT_BYTES: usize = 3 * POINT_BYTES + 3 * SCALAR_BYTES;

/// Fixed part: `n`, `T, T', g, h, A_T, A_T'` and three same-value responses
const FIXED_BYTES: usize = 4 + 6 * POINT_BYTES + 3 * SCALAR_BYTES;

/// A range proof built from one binary proof per bit and a same-value proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    /// Commitment to the value, `g^b h^r`
    pub t: GroupElement,
    /// Recomposed bit commitment, `Π A_i^{2^i}`
    pub t_prime: GroupElement,
    pub g: GroupElement,
    pub h: GroupElement,
    /// Per-bit commitments `A_i`
    pub a: Vec<GroupElement>,
    pub ca: Vec<GroupElement>,
    pub cb: Vec<GroupElement>,
    pub f: Vec<Scalar>,
    pub za: Vec<Scalar>,
    pub zb: Vec<Scalar>,
    /// Same-value responses
    pub zb_same: Scalar,
    pub zr: Scalar,
    pub zr_prime: Scalar,
    pub a_t: GroupElement,
    pub a_t_prime: GroupElement,
}

fn check_setup(n: usize, g: &GroupElement, h: &GroupElement) -> ZkResult<()> {
    if n == 0 || n > MAX_BITS {
        return Err(ZkError::InvalidRangeParams(format!(
            "bit width must be in 1..={}, got {}",
            MAX_BITS, n
        )));
    }
    if g.is_identity() || h.is_identity() {
        return Err(ZkError::InvalidRangeParams(
            "generators must not be the identity".to_string(),
        ));
    }
    Ok(())
}

impl RangeProof {
    /// Prove that `value`, committed as `T = g^value h^blind`, lies in
    /// `[0, 2^n)`
    pub fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        value: &BigInt,
        blind: &Scalar,
        g: &GroupElement,
        h: &GroupElement,
        n: usize,
    ) -> ZkResult<Self> {
        Self::prove_with_commitment(rng, value, blind, g, h, n).map(|(proof, _)| proof)
    }

    /// [`RangeProof::prove`], also returning the commitment `T`
    #[instrument(skip_all, fields(n = n))]
    pub fn prove_with_commitment<R: RngCore + CryptoRng>(
        rng: &mut R,
        value: &BigInt,
        blind: &Scalar,
        g: &GroupElement,
        h: &GroupElement,
        n: usize,
    ) -> ZkResult<(Self, GroupElement)> {
        check_setup(n, g, h)?;
        if !field::in_range(value, n) {
            return Err(ZkError::ValueOutOfRange { bits: n });
        }

        let b = field::scalar_from_bigint(value);
        let t = pedersen::commit(&b, blind, g, h)?;
        let bits = field::bits_le(value.magnitude(), n);

        let mut a = Vec::with_capacity(n);
        let mut blinds = Vec::with_capacity(n);
        let mut commitments = Vec::with_capacity(n);
        let mut t_prime = GroupElement::identity();
        let mut r_prime = Scalar::ZERO;
        let mut pow2 = Scalar::ONE;
        for &bit in &bits {
            let r_i = Scalar::random(rng);
            let a_i = pedersen::commit(&Scalar::from(bit), &r_i, g, h)?;
            commitments.push(BinaryCommitment::commit(rng, bit, g, h)?);

            t_prime += a_i * pow2;
            r_prime += r_i * pow2;
            pow2 += pow2;

            a.push(a_i);
            blinds.push(r_i);
        }

        let same_commitment = SameValueCommitment::commit(rng, g, h)?;

        let mut transcript = proof_transcript(COMMIT_RANGE_DOMAIN);
        append_statement(&mut transcript, g, h, &t);
        for (a_i, commitment) in a.iter().zip(commitments.iter()) {
            transcript.append_point(b"A_i", a_i);
            commitment.append_to(&mut transcript);
        }
        same_commitment.append_to(&mut transcript);
        let c = transcript.challenge_scalar(b"c");

        let mut ca = Vec::with_capacity(n);
        let mut cb = Vec::with_capacity(n);
        let mut f = Vec::with_capacity(n);
        let mut za = Vec::with_capacity(n);
        let mut zb = Vec::with_capacity(n);
        for ((commitment, &bit), r_i) in commitments.into_iter().zip(bits.iter()).zip(blinds.iter()) {
            let bit_proof = commitment.respond(&c, bit, r_i)?;
            ca.push(bit_proof.ca);
            cb.push(bit_proof.cb);
            f.push(bit_proof.f);
            za.push(bit_proof.za);
            zb.push(bit_proof.zb);
        }

        let witness = SameValueWitness {
            b,
            r: *blind,
            r_prime,
        };
        let same = same_commitment.respond(&c, &witness);
        debug!("sequential range proof created");

        let proof = Self {
            t,
            t_prime,
            g: *g,
            h: *h,
            a,
            ca,
            cb,
            f,
            za,
            zb,
            zb_same: same.zb,
            zr: same.zr,
            zr_prime: same.zr_prime,
            a_t: same.a_t,
            a_t_prime: same.a_t_prime,
        };
        Ok((proof, t))
    }

    /// Number of bits the proof covers
    pub fn bit_width(&self) -> usize {
        self.a.len()
    }

    fn validate_structure(&self) -> ZkResult<()> {
        let n = self.a.len();
        check_setup(n, &self.g, &self.h)?;
        let lens = [
            self.ca.len(),
            self.cb.len(),
            self.f.len(),
            self.za.len(),
            self.zb.len(),
        ];
        if lens.iter().any(|&len| len != n) {
            return Err(ZkError::InvalidRangeParams(format!(
                "per-bit vectors must all have length {}, got {:?}",
                n, lens
            )));
        }
        Ok(())
    }

    /// Verify the proof against the commitment and generators it carries.
    ///
    /// Every check runs; the result is the conjunction of the recomposition
    /// check, all binary proofs and the same-value proof.
    #[instrument(skip_all, fields(n = self.a.len()))]
    pub fn verify(&self) -> ZkResult<bool> {
        self.validate_structure()?;
        let (g, h) = (&self.g, &self.h);

        let mut recomposed = GroupElement::identity();
        let mut pow2 = Scalar::ONE;
        for a_i in &self.a {
            recomposed += *a_i * pow2;
            pow2 += pow2;
        }
        let mut ok: Choice = recomposed.ct_eq(&self.t_prime);

        let mut transcript = proof_transcript(COMMIT_RANGE_DOMAIN);
        append_statement(&mut transcript, g, h, &self.t);
        for i in 0..self.a.len() {
            transcript.append_point(b"A_i", &self.a[i]);
            transcript.append_point(b"Ca", &self.ca[i]);
            transcript.append_point(b"Cb", &self.cb[i]);
        }
        transcript.append_point(b"A_T", &self.a_t);
        transcript.append_point(b"A_T'", &self.a_t_prime);
        let c = transcript.challenge_scalar(b"c");

        for (i, a_i) in self.a.iter().enumerate() {
            ok &= self.bit_proof(i).verify_with_challenge(a_i, &c, g, h);
        }
        ok &= self
            .same_value_proof()
            .verify_with_challenge(&self.t, &self.t_prime, &c, g, h);

        let ok = bool::from(ok);
        debug!(ok, "sequential range proof verified");
        Ok(ok)
    }

    /// Verify and additionally require the proof to be about `t` under `g, h`
    pub fn verify_commitment(
        &self,
        t: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<bool> {
        let bound = self.t.ct_eq(t) & self.g.ct_eq(g) & self.h.ct_eq(h);
        let ok = self.verify()?;
        Ok(ok & bool::from(bound))
    }

    fn bit_proof(&self, i: usize) -> BinaryProof {
        BinaryProof {
            ca: self.ca[i],
            cb: self.cb[i],
            f: self.f[i],
            za: self.za[i],
            zb: self.zb[i],
        }
    }

    fn same_value_proof(&self) -> SameValueProof {
        SameValueProof {
            a_t: self.a_t,
            a_t_prime: self.a_t_prime,
            zb: self.zb_same,
            zr: self.zr,
            zr_prime: self.zr_prime,
        }
    }

    /// Get proof size in bytes
    pub fn size_bytes(&self) -> usize {
        FIXED_BYTES + self.a.len() * PER_BIT_BYTES
    }

    /// Serialize proof to bytes.
    ///
    /// Layout: `n` (u32 LE) ‖ `T, T', g, h` ‖ per bit `A_i, Ca_i, Cb_i, f_i,
    /// za_i, zb_i` ‖ `A_T, A_T'` ‖ `zb, zr, zr'`. Scalars are little-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.size_bytes());
        result.extend_from_slice(&(self.a.len() as u32).to_le_bytes());
        for point in [&self.t, &self.t_prime, &self.g, &self.h] {
            result.extend_from_slice(&point.to_bytes());
        }
        for i in 0..self.a.len() {
            for point in [&self.a[i], &self.ca[i], &self.cb[i]] {
                result.extend_from_slice(&point.to_bytes());
            }
            for scalar in [&self.f[i], &self.za[i], &self.zb[i]] {
                result.extend_from_slice(scalar.as_bytes());
            }
        }
        result.extend_from_slice(&self.a_t.to_bytes());
        result.extend_from_slice(&self.a_t_prime.to_bytes());
        for scalar in [&self.zb_same, &self.zr, &self.zr_prime] {
            result.extend_from_slice(scalar.as_bytes());
        }
        result
    }

    /// Deserialize proof from bytes
    pub fn from_bytes(bytes: &[u8]) -> ZkResult<Self> {
        let n_bytes: [u8; 4] = bytes
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ZkError::InvalidEncoding("insufficient bytes for proof".to_string()))?;
        let n = u32::from_le_bytes(n_bytes) as usize;
        if n == 0 || n > MAX_BITS {
            return Err(ZkError::InvalidRangeParams(format!(
                "bit width must be in 1..={}, got {}",
                MAX_BITS, n
            )));
        }
        let expected = FIXED_BYTES + n * PER_BIT_BYTES;
        if bytes.len() != expected {
            return Err(ZkError::InvalidEncoding(format!(
                "invalid proof size: expected {}, got {}",
                expected,
                bytes.len()
            )));
        }

        let mut reader = Reader::new(&bytes[4..]);
        let t = reader.point()?;
        let t_prime = reader.point()?;
        let g = reader.point()?;
        let h = reader.point()?;

        let mut a = Vec::with_capacity(n);
        let mut ca = Vec::with_capacity(n);
        let mut cb = Vec::with_capacity(n);
        let mut f = Vec::with_capacity(n);
        let mut za = Vec::with_capacity(n);
        let mut zb = Vec::with_capacity(n);
        for _ in 0..n {
            a.push(reader.point()?);
            ca.push(reader.point()?);
            cb.push(reader.point()?);
            f.push(reader.scalar()?);
            za.push(reader.scalar()?);
            zb.push(reader.scalar()?);
        }

        Ok(Self {
            t,
            t_prime,
            g,
            h,
            a,
            ca,
            cb,
            f,
            za,
            zb,
            a_t: reader.point()?,
            a_t_prime: reader.point()?,
            zb_same: reader.scalar()?,
            zr: reader.scalar()?,
            zr_prime: reader.scalar()?,
        })
    }
}

fn append_statement(transcript: &mut Transcript, g: &GroupElement, h: &GroupElement, t: &GroupElement) {
    transcript.append_point(b"g", g);
    transcript.append_point(b"h", h);
    transcript.append_point(b"T", t);
}

/// Cursor over a buffer whose total length was already checked
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, len: usize) -> ZkResult<&'a [u8]> {
        if self.bytes.len() < len {
            return Err(ZkError::InvalidEncoding("truncated proof".to_string()));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn point(&mut self) -> ZkResult<GroupElement> {
        GroupElement::from_bytes(self.take(POINT_BYTES)?)
    }

    fn scalar(&mut self) -> ZkResult<Scalar> {
        scalar_from_le_bytes(self.take(SCALAR_BYTES)?)
    }
}
