//! The per-kind registry aggregate.

use pinion_arena::DeviceMemory;
use pinion_config::{DeviceEntry, KindCounts};
use pinion_core::{BoardIo, BoardLimits, KindId, StatusEvent, StatusSink};

use crate::device::PollContext;
use crate::kinds::{Button, Encoder, Output};
use crate::registry::{AddOutcome, Registry};

#[cfg(feature = "analog")]
use crate::kinds::AnalogInput;
#[cfg(feature = "custom-device")]
use crate::kinds::CustomDevice;
#[cfg(feature = "digin-mux")]
use crate::kinds::DigInMux;
#[cfg(feature = "input-shifter")]
use crate::kinds::InputShifter;
#[cfg(feature = "lcd")]
use crate::kinds::LcdDisplay;
#[cfg(feature = "segment")]
use crate::kinds::LedSegment;
#[cfg(feature = "output-shifter")]
use crate::kinds::OutputShifter;
#[cfg(feature = "servo")]
use crate::kinds::Servo;
#[cfg(feature = "stepper")]
use crate::kinds::Stepper;

/// One registry per compiled-in device kind.
///
/// The set is rebuilt on every configuration load: registries are
/// cleared, the arena is reset, and fresh reservations are made from
/// the sizing-pass counts. Registry fields are public so the dispatch
/// router can reach typed device methods directly.
#[derive(Debug, Default)]
pub struct DeviceSet {
    /// Push buttons.
    pub buttons: Registry<Button>,
    /// Output pins.
    pub outputs: Registry<Output>,
    /// Quadrature encoders.
    pub encoders: Registry<Encoder>,
    /// Averaged analog inputs.
    #[cfg(feature = "analog")]
    pub analogs: Registry<AnalogInput>,
    /// Steppers.
    #[cfg(feature = "stepper")]
    pub steppers: Registry<Stepper>,
    /// RC servos.
    #[cfg(feature = "servo")]
    pub servos: Registry<Servo>,
    /// Input shift-register banks.
    #[cfg(feature = "input-shifter")]
    pub input_shifters: Registry<InputShifter>,
    /// Output shift-register banks.
    #[cfg(feature = "output-shifter")]
    pub output_shifters: Registry<OutputShifter>,
    /// Seven-segment module chains.
    #[cfg(feature = "segment")]
    pub segments: Registry<LedSegment>,
    /// Character LCDs.
    #[cfg(feature = "lcd")]
    pub lcds: Registry<LcdDisplay>,
    /// Multiplexed input banks.
    #[cfg(feature = "digin-mux")]
    pub muxes: Registry<DigInMux>,
    /// User-defined devices.
    #[cfg(feature = "custom-device")]
    pub customs: Registry<CustomDevice>,
}

fn reserve_kind<D>(
    memory: &mut DeviceMemory,
    kind: KindId,
    counts: &KindCounts,
    limits: &BoardLimits,
    status: &mut dyn StatusSink,
) -> Registry<D> {
    let want = counts.get(kind).min(limits.max_for(kind));
    if want == 0 {
        return Registry::empty();
    }
    match memory.reserve::<D>(want) {
        Ok(reservation) => Registry::with_reservation(reservation),
        Err(_) => {
            status.status(StatusEvent::AllocationFailed(kind));
            Registry::empty()
        }
    }
}

impl DeviceSet {
    /// An empty set with zero capacity everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve arena capacity for every kind the sizing pass counted.
    ///
    /// Counts above the board's per-kind cap are clamped; a kind the
    /// arena cannot fit reports [`StatusEvent::AllocationFailed`] and
    /// stays inactive while the rest proceed. Call on a freshly reset
    /// arena with cleared registries.
    pub fn reserve(
        &mut self,
        memory: &mut DeviceMemory,
        counts: &KindCounts,
        limits: &BoardLimits,
        status: &mut dyn StatusSink,
    ) {
        self.buttons = reserve_kind(memory, KindId::Button, counts, limits, status);
        self.outputs = reserve_kind(memory, KindId::Output, counts, limits, status);
        self.encoders = reserve_kind(memory, KindId::Encoder, counts, limits, status);
        #[cfg(feature = "analog")]
        {
            self.analogs = reserve_kind(memory, KindId::AnalogInput, counts, limits, status);
        }
        #[cfg(feature = "stepper")]
        {
            self.steppers = reserve_kind(memory, KindId::Stepper, counts, limits, status);
        }
        #[cfg(feature = "servo")]
        {
            self.servos = reserve_kind(memory, KindId::Servo, counts, limits, status);
        }
        #[cfg(feature = "input-shifter")]
        {
            self.input_shifters =
                reserve_kind(memory, KindId::InputShifter, counts, limits, status);
        }
        #[cfg(feature = "output-shifter")]
        {
            self.output_shifters =
                reserve_kind(memory, KindId::OutputShifter, counts, limits, status);
        }
        #[cfg(feature = "segment")]
        {
            self.segments = reserve_kind(memory, KindId::LedSegment, counts, limits, status);
        }
        #[cfg(feature = "lcd")]
        {
            self.lcds = reserve_kind(memory, KindId::LcdDisplay, counts, limits, status);
        }
        #[cfg(feature = "digin-mux")]
        {
            self.muxes = reserve_kind(memory, KindId::DigInMux, counts, limits, status);
        }
        #[cfg(feature = "custom-device")]
        {
            self.customs = reserve_kind(memory, KindId::CustomDevice, counts, limits, status);
        }
    }

    /// Construct and register the device a decoded entry describes.
    ///
    /// Entries for kinds compiled out of this build, and entries
    /// beyond a registry's capacity, are dropped silently.
    pub fn add_entry(
        &mut self,
        entry: DeviceEntry,
        io: &mut dyn BoardIo,
        status: &mut dyn StatusSink,
    ) {
        let kind = entry.kind();
        let outcome = match entry {
            DeviceEntry::Button { pin, name } => self.buttons.add(Button::new(io, pin, name)),
            DeviceEntry::Output { pin } => self.outputs.add(Output::new(io, pin)),
            DeviceEntry::Encoder {
                pin_a,
                pin_b,
                encoder_type,
                name,
            } => self
                .encoders
                .add(Encoder::new(io, pin_a, pin_b, encoder_type, name)),
            #[cfg(feature = "analog")]
            DeviceEntry::AnalogInput {
                pin,
                sensitivity,
                name,
            } => self
                .analogs
                .add(AnalogInput::new(io, pin, sensitivity, name)),
            #[cfg(feature = "stepper")]
            DeviceEntry::Stepper {
                pins,
                button_pin,
                mode,
                backlash,
                deactivate_output,
            } => self.steppers.add(Stepper::new(
                io,
                pins,
                button_pin,
                mode,
                backlash,
                deactivate_output,
            )),
            #[cfg(feature = "servo")]
            DeviceEntry::Servo { pin } => self.servos.add(Servo::new(io, pin)),
            #[cfg(feature = "input-shifter")]
            DeviceEntry::InputShifter {
                latch_pin,
                clock_pin,
                data_pin,
                module_count,
                name,
            } => self.input_shifters.add(InputShifter::new(
                io,
                latch_pin,
                clock_pin,
                data_pin,
                module_count,
                name,
            )),
            #[cfg(feature = "output-shifter")]
            DeviceEntry::OutputShifter {
                latch_pin,
                clock_pin,
                data_pin,
                module_count,
            } => self.output_shifters.add(OutputShifter::new(
                io,
                latch_pin,
                clock_pin,
                data_pin,
                module_count,
            )),
            #[cfg(feature = "segment")]
            DeviceEntry::LedSegment {
                data_pin,
                cs_pin,
                clock_pin,
                module_count,
                brightness,
            } => self.segments.add(LedSegment::new(
                io,
                data_pin,
                cs_pin,
                clock_pin,
                module_count,
                brightness,
            )),
            #[cfg(feature = "lcd")]
            DeviceEntry::LcdDisplay {
                address,
                cols,
                rows,
            } => self.lcds.add(LcdDisplay::new(address, cols, rows)),
            #[cfg(feature = "digin-mux")]
            DeviceEntry::DigInMux {
                data_pin,
                select_pins,
                register_count,
                name,
            } => self.muxes.add(DigInMux::new(
                io,
                data_pin,
                select_pins,
                register_count,
                name,
            )),
            #[cfg(feature = "custom-device")]
            DeviceEntry::CustomDevice {
                pin_ref,
                type_ref,
                config_ref,
            } => self
                .customs
                .add(CustomDevice::new(pin_ref, type_ref, config_ref)),
            #[allow(unreachable_patterns)]
            _ => AddOutcome::Ignored,
        };
        if outcome == AddOutcome::Added {
            status.status(StatusEvent::DeviceAdded(kind));
        }
    }

    /// Detach and drop every registered device.
    ///
    /// One [`StatusEvent::KindCleared`] is reported per compiled-in
    /// kind whether or not instances were registered, mirroring the
    /// fixed clear sequence the host expects.
    pub fn clear_all(&mut self, io: &mut dyn BoardIo, status: &mut dyn StatusSink) {
        self.buttons.clear(io);
        status.status(StatusEvent::KindCleared(KindId::Button));
        self.outputs.clear(io);
        status.status(StatusEvent::KindCleared(KindId::Output));
        self.encoders.clear(io);
        status.status(StatusEvent::KindCleared(KindId::Encoder));
        #[cfg(feature = "analog")]
        {
            self.analogs.clear(io);
            status.status(StatusEvent::KindCleared(KindId::AnalogInput));
        }
        #[cfg(feature = "stepper")]
        {
            self.steppers.clear(io);
            status.status(StatusEvent::KindCleared(KindId::Stepper));
        }
        #[cfg(feature = "servo")]
        {
            self.servos.clear(io);
            status.status(StatusEvent::KindCleared(KindId::Servo));
        }
        #[cfg(feature = "input-shifter")]
        {
            self.input_shifters.clear(io);
            status.status(StatusEvent::KindCleared(KindId::InputShifter));
        }
        #[cfg(feature = "output-shifter")]
        {
            self.output_shifters.clear(io);
            status.status(StatusEvent::KindCleared(KindId::OutputShifter));
        }
        #[cfg(feature = "segment")]
        {
            self.segments.clear(io);
            status.status(StatusEvent::KindCleared(KindId::LedSegment));
        }
        #[cfg(feature = "lcd")]
        {
            self.lcds.clear(io);
            status.status(StatusEvent::KindCleared(KindId::LcdDisplay));
        }
        #[cfg(feature = "digin-mux")]
        {
            self.muxes.clear(io);
            status.status(StatusEvent::KindCleared(KindId::DigInMux));
        }
        #[cfg(feature = "custom-device")]
        {
            self.customs.clear(io);
            status.status(StatusEvent::KindCleared(KindId::CustomDevice));
        }
    }

    /// Run one polling pass over every registered device.
    pub fn update_all(&mut self, ctx: &mut PollContext<'_>) {
        self.buttons.update(ctx);
        self.encoders.update(ctx);
        #[cfg(feature = "analog")]
        self.analogs.update(ctx);
        #[cfg(feature = "input-shifter")]
        self.input_shifters.update(ctx);
        #[cfg(feature = "digin-mux")]
        self.muxes.update(ctx);
        #[cfg(feature = "stepper")]
        self.steppers.update(ctx);
        #[cfg(feature = "servo")]
        self.servos.update(ctx);
        self.outputs.update(ctx);
        #[cfg(feature = "output-shifter")]
        self.output_shifters.update(ctx);
        #[cfg(feature = "segment")]
        self.segments.update(ctx);
        #[cfg(feature = "lcd")]
        self.lcds.update(ctx);
        #[cfg(feature = "custom-device")]
        self.customs.update(ctx);
    }

    /// Broadcast a power-saving transition to every registered device.
    pub fn power_save_all(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        self.buttons.power_save(io, enabled);
        self.outputs.power_save(io, enabled);
        self.encoders.power_save(io, enabled);
        #[cfg(feature = "analog")]
        self.analogs.power_save(io, enabled);
        #[cfg(feature = "stepper")]
        self.steppers.power_save(io, enabled);
        #[cfg(feature = "servo")]
        self.servos.power_save(io, enabled);
        #[cfg(feature = "input-shifter")]
        self.input_shifters.power_save(io, enabled);
        #[cfg(feature = "output-shifter")]
        self.output_shifters.power_save(io, enabled);
        #[cfg(feature = "segment")]
        self.segments.power_save(io, enabled);
        #[cfg(feature = "lcd")]
        self.lcds.power_save(io, enabled);
        #[cfg(feature = "digin-mux")]
        self.muxes.power_save(io, enabled);
        #[cfg(feature = "custom-device")]
        self.customs.power_save(io, enabled);
    }

    /// Ask every input kind to re-report its current state.
    pub fn retrigger_all(&mut self, ctx: &mut PollContext<'_>) {
        self.buttons.retrigger(ctx);
        #[cfg(feature = "analog")]
        self.analogs.retrigger(ctx);
        #[cfg(feature = "input-shifter")]
        self.input_shifters.retrigger(ctx);
        #[cfg(feature = "digin-mux")]
        self.muxes.retrigger(ctx);
    }

    /// Total registered instances across all kinds.
    pub fn total(&self) -> usize {
        let mut total = self.buttons.len() + self.outputs.len() + self.encoders.len();
        #[cfg(feature = "analog")]
        {
            total += self.analogs.len();
        }
        #[cfg(feature = "stepper")]
        {
            total += self.steppers.len();
        }
        #[cfg(feature = "servo")]
        {
            total += self.servos.len();
        }
        #[cfg(feature = "input-shifter")]
        {
            total += self.input_shifters.len();
        }
        #[cfg(feature = "output-shifter")]
        {
            total += self.output_shifters.len();
        }
        #[cfg(feature = "segment")]
        {
            total += self.segments.len();
        }
        #[cfg(feature = "lcd")]
        {
            total += self.lcds.len();
        }
        #[cfg(feature = "digin-mux")]
        {
            total += self.muxes.len();
        }
        #[cfg(feature = "custom-device")]
        {
            total += self.customs.len();
        }
        total
    }
}
