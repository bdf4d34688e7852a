mod tests {
    use argb_strip_composer::color::{ColorChannel, Rgb, hsv_to_rgb};

    fn assert_close(actual: Rgb, expected: Rgb) {
        let close = |a: u8, b: u8| a.abs_diff(b) <= 1;
        assert!(
            close(actual.r, expected.r) && close(actual.g, expected.g) && close(actual.b, expected.b),
            "{actual:?} not within 1 of {expected:?}"
        );
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb { r: 255, g: 0, b: 0 });
        assert_close(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb { r: 0, g: 255, b: 0 });
        assert_close(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn test_secondary_hues() {
        assert_close(
            hsv_to_rgb(1.0 / 6.0, 1.0, 1.0),
            Rgb {
                r: 255,
                g: 255,
                b: 0,
            },
        );
        assert_close(
            hsv_to_rgb(0.5, 1.0, 1.0),
            Rgb {
                r: 0,
                g: 255,
                b: 255,
            },
        );
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(1.25, 1.0, 1.0), hsv_to_rgb(0.25, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(-0.25, 1.0, 1.0), hsv_to_rgb(0.75, 1.0, 1.0));
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        assert_eq!(
            hsv_to_rgb(0.7, 0.0, 0.5),
            Rgb {
                r: 128,
                g: 128,
                b: 128,
            }
        );
        assert_eq!(
            hsv_to_rgb(0.2, -1.0, 1.0),
            Rgb {
                r: 255,
                g: 255,
                b: 255,
            }
        );
    }

    #[test]
    fn test_zero_value_is_black() {
        assert_eq!(hsv_to_rgb(0.4, 1.0, 0.0), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn test_value_scales_output() {
        assert_close(
            hsv_to_rgb(0.0, 1.0, 0.5),
            Rgb { r: 128, g: 0, b: 0 },
        );
    }

    #[test]
    fn test_channel_from_raw() {
        assert_eq!(ColorChannel::from_raw(0), Some(ColorChannel::Red));
        assert_eq!(ColorChannel::from_raw(1), Some(ColorChannel::Green));
        assert_eq!(ColorChannel::from_raw(2), Some(ColorChannel::Blue));
        assert_eq!(ColorChannel::from_raw(3), None);
    }
}
