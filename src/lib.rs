//! RSA accumulator with constant-size membership witnesses.
//!
//! An accumulator commits to a batch of items in a single group element; each
//! item gets a witness proving membership against the public modulus alone.
//! Like a Merkle tree, except the proofs don't grow with the set.

pub mod hash_to_prime;
pub mod key;
pub mod parallel;
pub mod prime;
pub mod rsa_accumulator;

pub use key::{generate_key, KeyGenError, PrivateKey, PublicKey};
pub use rsa_accumulator::{MembershipWitness, RsaAccumulatorDigest, BASE};
