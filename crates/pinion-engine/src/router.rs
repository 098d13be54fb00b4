//! Host command routing onto the device registries.

use pinion_core::{ArgSource, BoardIo, CommandId};
use pinion_devices::DeviceSet;

#[cfg(feature = "custom-device")]
use crossbeam_channel::Sender;
#[cfg(feature = "custom-device")]
use pinion_core::MessageId;

#[cfg(feature = "custom-device")]
use crate::handoff::CoreMessage;

/// Apply one device-directed command.
///
/// Arguments are consumed in wire order; a missing or mistyped
/// argument abandons the command without side effects, and an
/// out-of-range device index falls through the registry as a no-op.
/// Commands for kinds compiled out of this build consume nothing and
/// do nothing. `Trigger` and `SetPowerSavingMode` are loop-level and
/// handled by the controller, not here.
pub(crate) fn dispatch(
    command: CommandId,
    args: &mut dyn ArgSource,
    devices: &mut DeviceSet,
    io: &mut dyn BoardIo,
    #[cfg(feature = "custom-device")] handoff: Option<&Sender<CoreMessage>>,
) {
    match command {
        CommandId::SetPin => {
            let Some(index) = args.next_i16() else { return };
            let Some(value) = args.next_i16() else { return };
            if let Some(output) = devices.outputs.get_mut(index as usize) {
                output.set_value(io, value.clamp(0, 255) as u8);
            }
        }
        #[cfg(feature = "segment")]
        CommandId::SetModule => {
            let Some(index) = args.next_i16() else { return };
            let Some(module) = args.next_i16() else { return };
            let Some(text) = args.next_str().map(str::to_owned) else {
                return;
            };
            let Some(points) = args.next_i16() else { return };
            let Some(mask) = args.next_i16() else { return };
            if let Some(segment) = devices.segments.get_mut(index as usize) {
                segment.set_text(io, module as u8, &text, points as u8, mask as u8);
            }
        }
        #[cfg(feature = "segment")]
        CommandId::SetModuleBrightness => {
            let Some(index) = args.next_i16() else { return };
            let Some(brightness) = args.next_i16() else { return };
            if let Some(segment) = devices.segments.get_mut(index as usize) {
                segment.set_brightness(io, brightness.clamp(0, 15) as u8);
            }
        }
        #[cfg(feature = "stepper")]
        CommandId::SetStepper => {
            let Some(index) = args.next_i16() else { return };
            let Some(position) = args.next_i32() else { return };
            if let Some(stepper) = devices.steppers.get_mut(index as usize) {
                stepper.move_to(position);
            }
        }
        #[cfg(feature = "stepper")]
        CommandId::ResetStepper => {
            let Some(index) = args.next_i16() else { return };
            if let Some(stepper) = devices.steppers.get_mut(index as usize) {
                stepper.reset();
            }
        }
        #[cfg(feature = "stepper")]
        CommandId::SetZeroStepper => {
            let Some(index) = args.next_i16() else { return };
            if let Some(stepper) = devices.steppers.get_mut(index as usize) {
                stepper.set_zero();
            }
        }
        #[cfg(feature = "stepper")]
        CommandId::SetStepperSpeedAccel => {
            let Some(index) = args.next_i16() else { return };
            let Some(speed) = args.next_i16() else { return };
            let Some(accel) = args.next_i16() else { return };
            if let Some(stepper) = devices.steppers.get_mut(index as usize) {
                stepper.set_speed_accel(speed as u16, accel as u16);
            }
        }
        #[cfg(feature = "servo")]
        CommandId::SetServo => {
            let Some(index) = args.next_i16() else { return };
            let Some(value) = args.next_i16() else { return };
            if let Some(servo) = devices.servos.get_mut(index as usize) {
                servo.set_value(value.clamp(0, 255) as u8);
            }
        }
        #[cfg(feature = "lcd")]
        CommandId::SetLcdText => {
            let Some(index) = args.next_i16() else { return };
            let Some(text) = args.next_str() else { return };
            if let Some(lcd) = devices.lcds.get_mut(index as usize) {
                lcd.set_text(text);
            }
        }
        #[cfg(feature = "output-shifter")]
        CommandId::SetShiftRegisterPins => {
            let Some(index) = args.next_i16() else { return };
            let Some(pins) = args.next_str().map(str::to_owned) else {
                return;
            };
            let Some(high) = args.next_bool() else { return };
            if let Some(shifter) = devices.output_shifters.get_mut(index as usize) {
                shifter.set_pins(io, &pins, high);
            }
        }
        #[cfg(feature = "custom-device")]
        CommandId::SetCustomDevice => {
            let Some(index) = args.next_i16() else { return };
            let Some(message_id) = args.next_i16() else { return };
            let Some(payload) = args.next_str() else { return };
            let message_id = MessageId(message_id);
            if let Some(sender) = handoff {
                let message = CoreMessage::from_dispatch(index as u8, message_id, payload);
                if sender.send(message).is_ok() {
                    return;
                }
            }
            devices
                .customs
                .set(io, index as usize, message_id, payload);
        }
        // Loop-level commands and compiled-out kinds.
        #[allow(unreachable_patterns)]
        _ => {}
    }
}
