//! Bounded command queue for collaborators outside the tick context.
//!
//! Protocol decoders and state listeners often run in interrupt or task
//! contexts that must not touch the compositor directly. They enqueue
//! commands here; the scheduler drains the queue at the start of every
//! tick, so commands apply in send order on the rendering thread.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::color::ColorChannel;
use crate::group::GroupName;
use crate::mode::ArmSelectMode;

/// A control-surface call, queued for the next tick.
#[derive(Debug, Clone)]
pub enum StripCommand {
    /// Set one channel for every LED of a group.
    SetGroupChannel {
        group: GroupName,
        channel: ColorChannel,
        value: u8,
    },
    /// Change a group's brightness cap.
    SetGroupCap { group: GroupName, cap: u8 },
    /// Begin the ambient rainbow fade-in.
    EnableRfidMode,
    /// Begin the ambient rainbow fade-out.
    DisableRfidMode,
    /// Drive the arm-select overlay workflow.
    SetArmSelectMode(ArmSelectMode),
    /// Name-based arm-select variant; unrecognized names map to `None`.
    SetArmSelectModeByName(GroupName),
    /// Force an immediate render and transmit.
    Commit,
}

/// A bounded, thread-safe command queue.
///
/// Synchronized with critical sections, so senders may run in interrupt
/// context. Backed by a fixed-size `heapless::Deque`.
pub struct CommandQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<StripCommand, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    ///
    /// Multiple senders can coexist; they share the same queue.
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { queue: self }
    }

    /// Get a receiver handle for this queue.
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { queue: self }
    }

    /// Try to enqueue a command.
    ///
    /// Returns the command back if the queue is full.
    pub fn try_send(&self, command: StripCommand) -> Result<(), StripCommand> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command)
        })
    }

    /// Try to dequeue the oldest command.
    pub fn try_receive(&self) -> Option<StripCommand> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front()
        })
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`CommandQueue`].
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Try to enqueue a command.
    ///
    /// Returns the command back if the queue is full.
    pub fn try_send(&self, command: StripCommand) -> Result<(), StripCommand> {
        self.queue.try_send(command)
    }
}

/// A receiver handle for a [`CommandQueue`].
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    /// Try to dequeue the oldest command.
    pub fn try_receive(&self) -> Option<StripCommand> {
        self.queue.try_receive()
    }
}
