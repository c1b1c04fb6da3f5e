use rand_core::{CryptoRng, OsRng, RngCore};

use crate::constants::RANDOMNESS_LEN;

#[inline]
pub fn get_rng() -> impl RngCore + CryptoRng {
    OsRng
}

#[inline]
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut array = [0u8; N];
    get_rng().fill_bytes(&mut array);

    array
}

/// Fresh randomness for one credential presentation. Never reuse it.
#[inline]
pub fn presentation_randomness() -> [u8; RANDOMNESS_LEN] {
    random_bytes::<RANDOMNESS_LEN>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Doesn't check whether the RNG is safe/truly random,
    /// but quickly checks if we didn't do something bad by
    /// giving back zero bytes
    fn sanity_rng_check() {
        let zero_bytes = [0u8; RANDOMNESS_LEN];
        let bytes = presentation_randomness();
        let other_bytes = presentation_randomness();

        assert_ne!(
            bytes, zero_bytes,
            "presentation_randomness() should never give back zero bytes"
        );
        assert_ne!(
            bytes, other_bytes,
            "presentation_randomness() should generate a unique output"
        );
    }
}
