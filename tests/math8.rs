mod tests {
    use argb_strip_composer::math8::{blend8, exact_scale8, progress8, scale8};
    use embassy_time::Duration;

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_exact_scale8_identity_at_full_cap() {
        for value in [0u8, 1, 17, 128, 200, 254, 255] {
            assert_eq!(exact_scale8(value, 255), value);
        }
    }

    #[test]
    fn test_exact_scale8_floors() {
        // 200 * 128 / 255 = 100.39
        assert_eq!(exact_scale8(200, 128), 100);
        assert_eq!(exact_scale8(255, 128), 128);
        assert_eq!(exact_scale8(1, 128), 0);
        assert_eq!(exact_scale8(200, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_progress8() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(100)),
            0
        );
        assert_eq!(
            progress8(Duration::from_millis(50), Duration::from_millis(100)),
            127
        );
        assert_eq!(
            progress8(Duration::from_millis(100), Duration::from_millis(100)),
            255
        );
    }
}
