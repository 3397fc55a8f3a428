use digest::{ExtendableOutput, Update, XofReader};
use rug::{integer::Order, Integer};
use sha3::{Shake256, Shake256Reader};
use thiserror::Error;

use crate::prime::Prime;

/// Bit width of the primes items are mapped to.
pub const PRIME_BITS: u32 = 256;

// TODO: calculate how many candidates we should actually allow.
// The expected number before a hit is around 90.
const MAX_CANDIDATES: usize = 10_000;

#[derive(Error, Debug)]
#[error("no prime among the first {MAX_CANDIDATES} candidates of the hash stream")]
pub struct PrimeStreamError;

/// Reads fixed-width integers out of a SHAKE-256 stream.
///
/// Shake256 is an "extendable output function" (XOF): a hash function that
/// gives you as many bytes of output as you want. The prime search may
/// reject many candidates in a row, so the XOF gives us as much hash data
/// as we need, all of it determined by the input bytes.
struct IntegerHasher {
    reader: Shake256Reader,
    buf: Vec<u8>,
}

impl IntegerHasher {
    fn new(data: &[u8], digits: usize) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(data);
        let reader = hasher.finalize_xof();
        let buf = vec![0; digits];
        Self { reader, buf }
    }

    fn hash(&mut self) -> Integer {
        self.reader.read(&mut self.buf);
        Integer::from_digits(&self.buf, Order::Lsf)
    }
}

/// Hash the value of `data` to a 256-bit probable prime.
///
/// Deterministic: the same input always maps to the same prime. Unclear if
/// this is a good hash function.
pub fn hash_to_prime(data: &[u8]) -> Result<Prime, PrimeStreamError> {
    const BITS_PER_BYTE: u32 = 8;
    let mut hasher = IntegerHasher::new(data, (PRIME_BITS / BITS_PER_BYTE) as usize);

    for _ in 0..MAX_CANDIDATES {
        let mut candidate = hasher.hash();
        // Top two bits forced, so the product of any two such primes keeps
        // full width; low bit forced, so the candidate is odd.
        candidate.set_bit(PRIME_BITS - 1, true);
        candidate.set_bit(PRIME_BITS - 2, true);
        candidate.set_bit(0, true);
        if let Ok(prime) = Prime::try_from(candidate) {
            return Ok(prime);
        }
    }
    Err(PrimeStreamError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::MILLER_RABIN_ITERS;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_deterministic(data: Vec<u8>) {
            let first = hash_to_prime(&data)?;
            let second = hash_to_prime(&data)?;
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_width_and_primality(data: Vec<u8>) {
            let prime = hash_to_prime(&data)?;
            prop_assert_eq!(prime.inner().significant_bits(), PRIME_BITS);
            prop_assert!(
                prime.inner().is_probably_prime(MILLER_RABIN_ITERS) != rug::integer::IsPrime::No
            );
        }

        #[test]
        fn test_distinct_inputs(left: Vec<u8>, right: Vec<u8>) {
            prop_assume!(left != right);
            prop_assert_ne!(hash_to_prime(&left)?, hash_to_prime(&right)?);
        }
    }
}
