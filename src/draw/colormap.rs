use crate::sim::heat_transfer::Field;

/// Maps a normalized value (0-1) to the "hot" color ramp.
///
/// Black → red → yellow → white. Values outside 0-1 are clamped.
pub fn hot(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let r = (t / 0.375).min(1.0);
    let g = ((t - 0.375) / 0.375).clamp(0.0, 1.0);
    let b = ((t - 0.75) / 0.25).clamp(0.0, 1.0);
    [to_u8(r), to_u8(g), to_u8(b)]
}

/// Row-major RGB bytes of `field`, `t_min..t_max` mapped onto [`hot`].
///
/// The image is `ny` pixels wide and `nx` pixels tall, so field cell
/// `[row, col]` becomes pixel `(x = col, y = row)`.
pub fn field_to_rgb(field: &Field, t_min: f64, t_max: f64) -> Vec<u8> {
    let span = t_max - t_min;
    let span = if span > 0.0 { span } else { 1.0 };
    let mut bytes = Vec::with_capacity(field.len() * 3);
    for &t in field.iter() {
        bytes.extend_from_slice(&hot((t - t_min) / span));
    }
    bytes
}

fn to_u8(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(hot(0.0), [0, 0, 0]);
        assert_eq!(hot(0.375), [255, 0, 0]);
        assert_eq!(hot(0.75), [255, 255, 0]);
        assert_eq!(hot(1.0), [255, 255, 255]);
    }

    #[test]
    fn test_hot_clamps() {
        assert_eq!(hot(-3.0), hot(0.0));
        assert_eq!(hot(7.0), hot(1.0));
        assert_eq!(hot(f64::NAN), [0, 0, 0]);
    }

    #[test]
    fn test_hot_is_monotonic() {
        let mut prev = hot(0.0);
        for k in 1..=100 {
            let c = hot(k as f64 / 100.0);
            for ch in 0..3 {
                assert!(c[ch] >= prev[ch], "channel {ch} decreased at {k}");
            }
            prev = c;
        }
    }

    #[test]
    fn test_field_to_rgb_layout() {
        let mut field = Field::zeros((2, 3));
        field[[0, 2]] = 100.0;
        field[[1, 0]] = 50.0;
        let bytes = field_to_rgb(&field, 0.0, 100.0);
        assert_eq!(bytes.len(), 2 * 3 * 3);
        // pixel (x=2, y=0)
        assert_eq!(&bytes[6..9], &[255, 255, 255]);
        // pixel (x=0, y=1)
        assert_eq!(&bytes[9..12], &hot(0.5));
        assert_eq!(&bytes[0..3], &[0, 0, 0]);
    }

    #[test]
    fn test_field_to_rgb_degenerate_range() {
        let field = Field::from_elem((2, 2), 5.0);
        let bytes = field_to_rgb(&field, 5.0, 5.0);
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
