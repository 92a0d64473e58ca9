/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Three-digit retro LED readout: zero-padded and clamped for display only,
/// the counters behind it are never clamped.
pub(crate) fn format_for_counter(value: i32) -> String {
    let clamped = value.clamp(-99, 999);
    if clamped < 0 {
        format!("-{:02}", -clamped)
    } else {
        format!("{:03}", clamped)
    }
}
