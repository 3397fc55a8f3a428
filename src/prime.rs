use rug::Integer;
use serde::Serialize;
use thiserror::Error;

// How sure do we want to be that our primes are actually prime?
// We want to be 30 sure.
pub(crate) const MILLER_RABIN_ITERS: u32 = 30;

#[derive(Error, Debug)]
#[error("{value} is composite")]
pub struct CompositeError {
    value: Integer,
}

/// A probable prime. Constructing one via `TryFrom<Integer>` runs the
/// Miller-Rabin test; composites are rejected.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Prime(Integer);

impl Prime {
    pub fn inner(&self) -> &Integer {
        &self.0
    }

    pub fn into_inner(self) -> Integer {
        self.0
    }
}

impl TryFrom<Integer> for Prime {
    type Error = CompositeError;

    fn try_from(value: Integer) -> Result<Self, Self::Error> {
        if value.is_probably_prime(MILLER_RABIN_ITERS) == rug::integer::IsPrime::No {
            return Err(CompositeError { value });
        }
        Ok(Prime(value))
    }
}

impl From<Prime> for Integer {
    fn from(prime: Prime) -> Self {
        prime.0
    }
}

impl AsRef<Integer> for Prime {
    fn as_ref(&self) -> &Integer {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_primes() {
        for p in [2u32, 3, 5, 7, 65537] {
            assert!(Prime::try_from(Integer::from(p)).is_ok());
        }
    }

    #[test]
    fn test_rejects_composites() {
        for c in [1u32, 4, 9, 561, 65536] {
            assert!(Prime::try_from(Integer::from(c)).is_err());
        }
    }
}
