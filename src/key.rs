use rand::{CryptoRng, RngCore};
use rug::{integer::Order, Integer};
use serde::Serialize;
use thiserror::Error;

use crate::prime::Prime;
use crate::rsa_accumulator::BASE;

/// Bit length of each secret prime; the modulus gets twice this.
const PRIME_BITS: u32 = 1024;

#[derive(Error, Debug)]
pub enum KeyGenError {
    /// The caller's randomness source failed.
    #[error("randomness source failed")]
    Rng(#[from] rand::Error),
}

/// Trapdoor key for accumulation: the factorization of the modulus and the
/// group order derived from it.
#[derive(Clone, Debug, Serialize)]
pub struct PrivateKey {
    p: Integer,
    q: Integer,
    n: Integer,
    totient: Integer,
}

/// Verification key: the modulus alone.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PublicKey {
    n: Integer,
}

impl PrivateKey {
    pub fn modulus(&self) -> &Integer {
        &self.n
    }

    /// The group order `(p-1)(q-1)`, the exponent modulus for accumulation.
    pub fn totient(&self) -> &Integer {
        &self.totient
    }

    /// An independent copy of the public half.
    pub fn public_key(&self) -> PublicKey {
        PublicKey { n: self.n.clone() }
    }
}

impl PublicKey {
    pub fn modulus(&self) -> &Integer {
        &self.n
    }
}

/// Generate a fresh 2048-bit key pair from `rng`.
///
/// Redraws both primes until the totient is coprime to [`BASE`]; in practice
/// the first draw succeeds. Fails only if `rng` does.
pub fn generate_key<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<(PublicKey, PrivateKey), KeyGenError> {
    loop {
        let p = random_prime(rng)?;
        let q = random_prime(rng)?;
        debug_assert_ne!(p, q);

        let pminus1 = Integer::from(p.inner() - 1u32);
        let qminus1 = Integer::from(q.inner() - 1u32);
        let totient = pminus1 * qminus1;

        // BASE must be invertible mod the totient for witnesses to exist.
        if Integer::from(BASE.gcd_ref(&totient)) != 1u32 {
            continue;
        }

        let p = p.into_inner();
        let q = q.into_inner();
        let n = Integer::from(&p * &q);
        let private_key = PrivateKey { p, q, n, totient };
        let public_key = private_key.public_key();
        return Ok((public_key, private_key));
    }
}

/// Draw a `PRIME_BITS`-bit probable prime from `rng`.
fn random_prime<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Prime, KeyGenError> {
    const BITS_PER_BYTE: u32 = 8;
    let mut buf = vec![0u8; (PRIME_BITS / BITS_PER_BYTE) as usize];
    loop {
        rng.try_fill_bytes(&mut buf)?;
        let mut candidate = Integer::from_digits(&buf, Order::Lsf);
        // Top two bits forced, so p*q always reaches the full modulus width;
        // low bit forced, so the candidate is odd.
        candidate.set_bit(PRIME_BITS - 1, true);
        candidate.set_bit(PRIME_BITS - 2, true);
        candidate.set_bit(0, true);
        if let Ok(prime) = Prime::try_from(candidate) {
            return Ok(prime);
        }
    }
}

/// A key pair shared across tests; generation is too slow to repeat per case.
#[cfg(test)]
pub(crate) fn test_key_pair() -> &'static (PublicKey, PrivateKey) {
    use once_cell::sync::Lazy;
    static KEY_PAIR: Lazy<(PublicKey, PrivateKey)> =
        Lazy::new(|| generate_key(&mut rand::thread_rng()).expect("thread_rng should not fail"));
    &KEY_PAIR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_is_valid() {
        let (public_key, private_key) = test_key_pair();
        assert_eq!(public_key.modulus(), private_key.modulus());
        assert_eq!(private_key.modulus().significant_bits(), 2 * PRIME_BITS);
        let g = Integer::from(BASE.gcd_ref(private_key.totient()));
        assert_eq!(g, 1u32);
    }

    #[test]
    fn test_public_key_is_independent_copy() {
        let (public_key, private_key) = test_key_pair();
        let copy = private_key.public_key();
        assert_eq!(&copy, public_key);
        assert!(!std::ptr::eq(copy.modulus(), private_key.modulus()));
    }
}
