//! Batch accumulation and verification.

use once_cell::sync::Lazy;
use rug::Integer;
use serde::Serialize;

use crate::hash_to_prime::hash_to_prime;
use crate::key::{PrivateKey, PublicKey};
use crate::parallel::parallel_map;
use crate::prime::Prime;

/// Public base of the accumulator group, shared by every key pair.
pub static BASE: Lazy<Integer> = Lazy::new(|| Integer::from(65537));

/// Commitment to one batch of items.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RsaAccumulatorDigest {
    value: Integer,
}

impl RsaAccumulatorDigest {
    pub fn value(&self) -> &Integer {
        &self.value
    }
}

impl From<Integer> for RsaAccumulatorDigest {
    fn from(value: Integer) -> Self {
        RsaAccumulatorDigest { value }
    }
}

/// Per-item membership proof, position-aligned with the accumulated batch.
pub type MembershipWitness = Integer;

impl PrivateKey {
    /// Accumulate `items` into one digest plus one witness per item.
    ///
    /// `witnesses[i]` proves membership of `items[i]`. The digest does not
    /// depend on the batch order; the witness vector follows the order
    /// actually given. Duplicate items are allowed and each copy gets a
    /// witness that verifies on its own.
    ///
    /// The per-item stages (hashing to primes, computing witnesses) run
    /// across the worker pool; the call blocks until the whole batch is
    /// done.
    ///
    /// # Panics
    ///
    /// If the hash stream fails to yield a prime, or an item's prime shares
    /// a factor with the totient. Neither can happen with an honestly
    /// generated key; a panic here means a broken precondition, not a
    /// runtime condition to handle.
    pub fn accumulate<T>(&self, items: &[T]) -> (RsaAccumulatorDigest, Vec<MembershipWitness>)
    where
        T: AsRef<[u8]> + Sync,
    {
        debug_assert!(!items.is_empty(), "batch must be non-empty");

        let primes: Vec<Prime> = parallel_map(items, |item| {
            hash_to_prime(item.as_ref()).expect("hash stream yields a prime")
        });

        // Serial: each step needs the running product.
        let mut exp = Integer::from(1u32);
        for prime in &primes {
            exp *= prime.inner();
            exp %= self.totient();
        }

        let value = BASE
            .clone()
            .pow_mod(&exp, self.modulus())
            .expect("exponent is non-negative");

        let witnesses = parallel_map(&primes, |prime| {
            // BASE^(exp / prime): divide the prime out of the exponent by
            // inverting it mod the totient, rather than re-multiplying the
            // other n-1 primes.
            let inv = prime
                .inner()
                .clone()
                .invert(self.totient())
                .expect("item primes are invertible mod the totient");
            let e = (inv * &exp) % self.totient();
            BASE.clone()
                .pow_mod(&e, self.modulus())
                .expect("exponent is non-negative")
        });

        (RsaAccumulatorDigest::from(value), witnesses)
    }
}

impl PublicKey {
    /// Check that `witness` proves `item` is in the batch committed to by
    /// `digest`.
    ///
    /// Total: a witness for a different item, or from a different batch,
    /// returns `false` rather than an error.
    #[must_use]
    pub fn verify(
        &self,
        digest: &RsaAccumulatorDigest,
        witness: &MembershipWitness,
        item: &[u8],
    ) -> bool {
        let c = hash_to_prime(item).expect("hash stream yields a prime");
        let v = witness
            .clone()
            .pow_mod(c.inner(), self.modulus())
            .expect("exponent is non-negative");
        v == digest.value
    }
}
