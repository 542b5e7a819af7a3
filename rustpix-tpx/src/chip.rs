//! Chip-layout mapper: remaps a sub-chip's local pixel coordinates into the
//! shared 517x517 quad frame.

/// Remaps `(x_local, y_local)` from sub-chip `chip_id`'s local frame into
/// the quad's global frame.
///
/// `chip_id` is expected to be in `0..=3`; any other value is mapped as
/// chip 3 (identity), matching the fallback of a four-armed switch with no
/// other case.
#[inline]
#[must_use]
pub fn map_chip(chip_id: u8, x_local: u16, y_local: u16) -> (u16, u16) {
    match chip_id {
        0 => (x_local + 260, y_local),
        1 => (255 - x_local + 260, 255 - y_local + 260),
        2 => (255 - x_local, 255 - y_local + 260),
        _ => (x_local, y_local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip0_shifts_x() {
        assert_eq!(map_chip(0, 0, 0), (260, 0));
    }

    #[test]
    fn chip1_mirrors_both_axes() {
        assert_eq!(map_chip(1, 0, 0), (515, 515));
    }

    #[test]
    fn chip2_mirrors_x_only() {
        assert_eq!(map_chip(2, 0, 0), (255, 515));
    }

    #[test]
    fn chip3_is_identity() {
        assert_eq!(map_chip(3, 12, 34), (12, 34));
    }

    #[test]
    fn s1_scenario_chip0() {
        // From the worked hit-decoder scenario: chip_id = 0, x_local = 128, y_local = 56.
        assert_eq!(map_chip(0, 128, 56), (388, 56));
    }
}
