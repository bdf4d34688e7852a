mod common;

mod tests {
    use argb_strip_composer::color::{ColorChannel, Rgb};
    use argb_strip_composer::command::{CommandQueue, StripCommand};
    use argb_strip_composer::compositor::{Compositor, CompositorConfig};
    use argb_strip_composer::group::GroupName;
    use argb_strip_composer::mode::ArmSelectMode;
    use argb_strip_composer::scheduler::{DEFAULT_TICK_DURATION, TickScheduler};
    use argb_strip_composer::transmitter::{TransmitError, Transmitter};
    use embassy_time::Instant;

    use crate::common::{RecordingDriver, ScriptedDriver};

    fn name(s: &str) -> GroupName {
        GroupName::try_from(s).unwrap()
    }

    fn scheduler<'a, D: argb_strip_composer::PulseDriver>(
        driver: D,
        queue: &'a CommandQueue<8>,
    ) -> TickScheduler<'a, D, 6, 8, 8> {
        let mut compositor = Compositor::new(&CompositorConfig::default());
        compositor.add_group("away", &[0, 1], 255);
        TickScheduler::new(compositor, Transmitter::new(driver), queue.receiver())
    }

    #[test]
    fn test_commands_apply_in_order_before_render() {
        let queue: CommandQueue<8> = CommandQueue::new();
        let sender = queue.sender();
        let mut scheduler = scheduler(RecordingDriver::new(), &queue);

        sender
            .try_send(StripCommand::SetGroupChannel {
                group: name("away"),
                channel: ColorChannel::Red,
                value: 10,
            })
            .unwrap();
        sender
            .try_send(StripCommand::SetGroupChannel {
                group: name("away"),
                channel: ColorChannel::Red,
                value: 200,
            })
            .unwrap();

        let result = scheduler.tick(Instant::from_millis(0));
        assert!(result.transmitted);
        // The later write won.
        assert_eq!(scheduler.compositor().base()[0].r, 200);
        // Data train plus latch went out once.
        assert_eq!(scheduler.transmitter().driver().transmissions.len(), 2);
    }

    #[test]
    fn test_idle_ticks_do_not_retransmit() {
        let queue: CommandQueue<8> = CommandQueue::new();
        let mut scheduler = scheduler(RecordingDriver::new(), &queue);

        scheduler.clear(Instant::from_millis(0));
        assert_eq!(scheduler.transmitter().driver().transmissions.len(), 2);

        let result = scheduler.tick(Instant::from_millis(40));
        assert!(!result.transmitted);
        let result = scheduler.tick(Instant::from_millis(80));
        assert!(!result.transmitted);
        assert_eq!(scheduler.transmitter().driver().transmissions.len(), 2);
    }

    #[test]
    fn test_tick_pacing() {
        let queue: CommandQueue<8> = CommandQueue::new();
        let mut scheduler = scheduler(RecordingDriver::new(), &queue);

        let result = scheduler.tick(Instant::from_millis(0));
        assert!(result.sleep_duration <= DEFAULT_TICK_DURATION);
        assert_eq!(result.next_deadline.as_millis() % 40, 0);
    }

    #[test]
    fn test_mode_commands_drive_the_workflow() {
        let queue: CommandQueue<8> = CommandQueue::new();
        let sender = queue.sender();
        let mut scheduler = scheduler(RecordingDriver::new(), &queue);

        sender
            .try_send(StripCommand::SetArmSelectMode(ArmSelectMode::Away))
            .unwrap();
        scheduler.tick(Instant::from_millis(0));
        assert_eq!(
            scheduler.compositor().arm_select_mode(),
            ArmSelectMode::Away
        );

        sender
            .try_send(StripCommand::SetArmSelectModeByName(name("none")))
            .unwrap();
        scheduler.tick(Instant::from_millis(40));
        assert!(scheduler.compositor().is_disable_pending());
    }

    #[test]
    fn test_commit_bypasses_dirty_check() {
        let queue: CommandQueue<8> = CommandQueue::new();
        let mut scheduler = scheduler(RecordingDriver::new(), &queue);

        scheduler.clear(Instant::from_millis(0));
        // Idle, but commit forces a render; the transmitter still dedupes
        // the identical frame.
        assert!(!scheduler.commit(Instant::from_millis(10)));

        scheduler
            .compositor_mut()
            .update_group_channel("away", ColorChannel::Green, 42);
        assert!(scheduler.commit(Instant::from_millis(20)));
        assert_eq!(
            scheduler.transmitter().last_sent().unwrap()[0],
            Rgb { r: 0, g: 42, b: 0 }
        );
    }

    #[test]
    fn test_transmit_failure_drops_frame_and_recovers() {
        let queue: CommandQueue<8> = CommandQueue::new();
        let driver = ScriptedDriver::new(vec![Err(TransmitError::Timeout)]);
        let mut scheduler = scheduler(driver, &queue);

        scheduler
            .compositor_mut()
            .update_group_channel("away", ColorChannel::Red, 7);
        let result = scheduler.tick(Instant::from_millis(0));
        assert!(!result.transmitted);
        assert!(scheduler.transmitter().last_sent().is_none());

        // The next dirty tick retries with current content.
        assert!(scheduler.commit(Instant::from_millis(40)));
        assert_eq!(scheduler.transmitter().last_sent().unwrap()[0].r, 7);
    }

    #[test]
    fn test_queue_overflow_returns_command() {
        let queue: CommandQueue<1> = CommandQueue::new();
        let sender = queue.sender();
        assert!(sender.try_send(StripCommand::Commit).is_ok());
        assert!(sender.try_send(StripCommand::Commit).is_err());
    }
}
