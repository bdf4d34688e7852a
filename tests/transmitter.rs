mod common;

mod tests {
    use argb_strip_composer::color::Rgb;
    use argb_strip_composer::transmitter::{FrameOutcome, TransmitError, Transmitter};
    use argb_strip_composer::wire::RESET_PULSE;

    use crate::common::{RecordingDriver, ScriptedDriver};

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    #[test]
    fn test_first_frame_is_sent_with_latch() {
        let mut transmitter: Transmitter<_, 2> = Transmitter::new(RecordingDriver::new());
        let frame = [BLACK; 2];

        assert_eq!(transmitter.transmit_frame(&frame), Ok(FrameOutcome::Sent));

        let driver = transmitter.driver();
        assert_eq!(driver.transmissions.len(), 2);
        // 2 LEDs * 24 bits * 2 pulses
        assert_eq!(driver.transmissions[0].len(), 96);
        assert_eq!(driver.transmissions[1], [RESET_PULSE]);
        assert_eq!(transmitter.last_sent(), Some(&frame));
    }

    #[test]
    fn test_identical_frame_is_a_no_op() {
        let mut transmitter: Transmitter<_, 3> = Transmitter::new(RecordingDriver::new());
        let frame = [Rgb { r: 200, g: 0, b: 0 }; 3];

        assert_eq!(transmitter.transmit_frame(&frame), Ok(FrameOutcome::Sent));
        assert_eq!(
            transmitter.transmit_frame(&frame),
            Ok(FrameOutcome::Unchanged)
        );
        // Exactly one wire transmission (data + latch).
        assert_eq!(transmitter.driver().transmissions.len(), 2);

        let mut changed = frame;
        changed[1].g = 7;
        assert_eq!(transmitter.transmit_frame(&changed), Ok(FrameOutcome::Sent));
        assert_eq!(transmitter.driver().transmissions.len(), 4);
    }

    #[test]
    fn test_data_failure_drops_frame() {
        let driver = ScriptedDriver::new(vec![Err(TransmitError::Timeout)]);
        let mut transmitter: Transmitter<_, 2> = Transmitter::new(driver);
        let frame = [Rgb { r: 9, g: 9, b: 9 }; 2];

        assert_eq!(
            transmitter.transmit_frame(&frame),
            Err(TransmitError::Timeout)
        );
        assert_eq!(transmitter.last_sent(), None);

        // Retrying with the same content goes out in full.
        assert_eq!(transmitter.transmit_frame(&frame), Ok(FrameOutcome::Sent));
        assert_eq!(transmitter.last_sent(), Some(&frame));
    }

    #[test]
    fn test_latch_failure_drops_frame() {
        // Data succeeds, latch fails.
        let driver = ScriptedDriver::new(vec![Ok(()), Err(TransmitError::Bus)]);
        let mut transmitter: Transmitter<_, 2> = Transmitter::new(driver);
        let frame = [Rgb { r: 1, g: 2, b: 3 }; 2];

        assert_eq!(transmitter.transmit_frame(&frame), Err(TransmitError::Bus));
        assert_eq!(transmitter.last_sent(), None);

        assert_eq!(transmitter.transmit_frame(&frame), Ok(FrameOutcome::Sent));
        assert_eq!(transmitter.driver().calls, 4);
    }
}
