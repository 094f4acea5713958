use qf_core::derive_substream_seed;

const NETWORK_STREAM_SALT: u64 = 0xA5A5_A5A5_A5A5_A5A5;

/// Seed for the initial-condition jitter of one field component.
pub fn component_seed(master_seed: u64, component: usize) -> u64 {
    derive_substream_seed(master_seed, component as u64)
}

/// Seed for the stochastic forcing of an actor network.
pub fn network_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed ^ NETWORK_STREAM_SALT, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substreams_are_distinct() {
        assert_ne!(component_seed(7, 0), component_seed(7, 1));
        assert_ne!(component_seed(7, 0), network_seed(7));
        assert_eq!(component_seed(7, 1), component_seed(7, 1));
    }
}
