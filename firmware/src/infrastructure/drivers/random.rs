use esp_hal::rng::Rng;

/// Seed for the network stack, two hardware RNG words.
pub(crate) fn network_seed() -> u64 {
    let rng = Rng::new();
    let high = u64::from(rng.random());
    let low = u64::from(rng.random());
    (high << 32) | low
}
