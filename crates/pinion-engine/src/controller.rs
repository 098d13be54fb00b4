//! The firmware controller: owned state and the control-loop surface.

use pinion_arena::DeviceMemory;
use pinion_config::{count_devices, decode, ConfigError};
use pinion_core::{
    ArgSource, BoardIo, BoardLimits, CommandId, NameBuffer, ReportSink, StatusEvent, StatusSink,
};
use pinion_devices::{DeviceSet, PollContext};

#[cfg(feature = "custom-device")]
use crossbeam_channel::Sender;

#[cfg(feature = "custom-device")]
use crate::handoff::CoreMessage;
use crate::power::PowerState;
use crate::router;

/// Everything the firmware core owns, behind one value.
///
/// The board support layer constructs one controller at boot and
/// drives it from the main loop: [`load_config`] when storage is read
/// or rewritten, [`on_command`] per decoded host frame, and [`poll`]
/// every pass. No state lives outside this struct, so tests construct
/// as many controllers as they like.
///
/// [`load_config`]: Controller::load_config
/// [`on_command`]: Controller::on_command
/// [`poll`]: Controller::poll
#[derive(Debug)]
pub struct Controller {
    limits: BoardLimits,
    memory: DeviceMemory,
    names: NameBuffer,
    devices: DeviceSet,
    power: PowerState,
    #[cfg(feature = "custom-device")]
    handoff: Option<Sender<CoreMessage>>,
}

impl Controller {
    /// A controller for the given board limits, with no devices.
    pub fn new(limits: BoardLimits) -> Self {
        Self {
            memory: DeviceMemory::new(limits.device_memory_bytes),
            names: NameBuffer::new(limits.name_buffer_bytes),
            devices: DeviceSet::new(),
            power: PowerState::new(limits.power_save_timeout_ms),
            #[cfg(feature = "custom-device")]
            handoff: None,
            limits,
        }
    }

    /// Route custom-device traffic through a cross-core channel.
    ///
    /// Once attached, `SetCustomDevice` commands and power-saving
    /// transitions are queued for the worker on the other core instead
    /// of applied to the local registry.
    #[cfg(feature = "custom-device")]
    pub fn attach_handoff(&mut self, sender: Sender<CoreMessage>) {
        self.handoff = Some(sender);
    }

    /// The registered devices.
    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    /// The shared name buffer.
    pub fn names(&self) -> &NameBuffer {
        &self.names
    }

    /// Whether the controller is currently in power-saving mode.
    pub fn is_power_saving(&self) -> bool {
        self.power.is_saving()
    }

    /// Rebuild every registry from a persisted configuration stream.
    ///
    /// Existing devices are detached first, then the arena and name
    /// buffer are rewound, the sizing pass reserves per-kind capacity,
    /// and the populate pass registers entries in stream order. A
    /// decode failure keeps the entries registered so far and reports
    /// [`StatusEvent::ConfigReadFailure`]; the board keeps running on
    /// the partial configuration.
    pub fn load_config(
        &mut self,
        stream: &[u8],
        io: &mut dyn BoardIo,
        status: &mut dyn StatusSink,
    ) -> Result<(), ConfigError> {
        #[cfg(feature = "custom-device")]
        if let Some(sender) = &self.handoff {
            let _ = sender.send(CoreMessage::Stop);
        }

        self.devices.clear_all(io, status);
        self.memory.reset();
        self.names.reset();

        let counts = count_devices(stream);
        self.devices
            .reserve(&mut self.memory, &counts, &self.limits, status);

        let devices = &mut self.devices;
        let result = decode(stream, &mut self.names, |entry| {
            devices.add_entry(entry, io, status);
        });
        if result.is_err() {
            status.status(StatusEvent::ConfigReadFailure);
        }

        #[cfg(feature = "custom-device")]
        if let Some(sender) = &self.handoff {
            let _ = sender.send(CoreMessage::Resume);
        }
        result
    }

    /// Handle one decoded host command.
    ///
    /// Every received command counts as activity for the idle clock,
    /// including unknown ones. Unknown ids report
    /// [`StatusEvent::UnknownCommand`] and are otherwise dropped.
    pub fn on_command(
        &mut self,
        raw_command: u8,
        args: &mut dyn ArgSource,
        io: &mut dyn BoardIo,
        now_ms: u32,
        reports: &mut dyn ReportSink,
        status: &mut dyn StatusSink,
    ) {
        self.power.touch(now_ms);
        let Some(command) = CommandId::from_raw(raw_command) else {
            status.status(StatusEvent::UnknownCommand);
            return;
        };
        match command {
            CommandId::Trigger => {
                let mut ctx = PollContext {
                    io,
                    names: &self.names,
                    now_ms,
                    sink: reports,
                };
                self.devices.retrigger_all(&mut ctx);
            }
            CommandId::SetPowerSavingMode => {
                let Some(enabled) = args.next_bool() else { return };
                // Applied by the next poll, so the broadcast happens
                // exactly once and in loop context.
                self.power.force(enabled, now_ms);
            }
            _ => {
                #[cfg(feature = "custom-device")]
                router::dispatch(command, args, &mut self.devices, io, self.handoff.as_ref());
                #[cfg(not(feature = "custom-device"))]
                router::dispatch(command, args, &mut self.devices, io);
            }
        }
    }

    /// One control-loop pass: update every device, then settle the
    /// power-saving state.
    pub fn poll(&mut self, io: &mut dyn BoardIo, now_ms: u32, reports: &mut dyn ReportSink) {
        {
            let mut ctx = PollContext {
                io: &mut *io,
                names: &self.names,
                now_ms,
                sink: reports,
            };
            self.devices.update_all(&mut ctx);
        }
        if let Some(enabled) = self.power.tick(now_ms) {
            self.devices.power_save_all(io, enabled);
            #[cfg(feature = "custom-device")]
            if let Some(sender) = &self.handoff {
                let _ = sender.send(CoreMessage::PowerSave(enabled));
            }
        }
    }
}
