//! The two-pass stream decoder.
//!
//! Grammar (ASCII medium):
//!
//! ```text
//! stream  := entry* terminator
//! entry   := tag ('.' field)* ['.' name] ':'
//! field   := digit+
//! tag     := digit+            -- 0 terminates the stream
//! name    := any byte except ':' or NUL
//! ```
//!
//! The sizing pass ([`count_devices`]) is lenient: it tallies entries
//! by tag until it hits the terminator, the end of input, or anything
//! it cannot read, and never errors — a count may only ever be an
//! overestimate of what the strict pass registers. The populate pass
//! ([`decode`]) consumes exactly the bytes each entry owns or fails
//! closed at the offending byte.

use pinion_core::{KindId, NameBuffer, NameRef};

use crate::entry::{DeviceEntry, KindCounts};
use crate::error::ConfigError;

/// Type tags of the persisted stream.
///
/// Tag values are wire format and must never be reused. Deprecated
/// tags stay decodable forever: they map to the same kind as their
/// successor with the newer trailing fields defaulted.
pub mod tags {
    /// Stream terminator.
    pub const END: u16 = 0;
    /// Button on one input pin.
    pub const BUTTON: u16 = 1;
    /// Single output pin.
    pub const OUTPUT: u16 = 2;
    /// Encoder without a detent profile (deprecated, profile = 0).
    pub const ENCODER_LEGACY: u16 = 3;
    /// Encoder with a detent profile.
    pub const ENCODER: u16 = 4;
    /// Stepper without mode/backlash fields (deprecated).
    pub const STEPPER_LEGACY_V1: u16 = 5;
    /// Stepper with a mode but no backlash fields (deprecated).
    pub const STEPPER_LEGACY_V2: u16 = 6;
    /// Stepper, current layout.
    pub const STEPPER: u16 = 7;
    /// RC servo.
    pub const SERVO: u16 = 8;
    /// Averaged analog input.
    pub const ANALOG_INPUT: u16 = 9;
    /// Parallel-in shift-register bank.
    pub const INPUT_SHIFTER: u16 = 10;
    /// Serial-in shift-register bank.
    pub const OUTPUT_SHIFTER: u16 = 11;
    /// Seven-segment module chain.
    pub const LED_SEGMENT: u16 = 12;
    /// Character LCD.
    pub const LCD_DISPLAY: u16 = 13;
    /// Multiplexed digital input bank.
    pub const DIGIN_MUX: u16 = 14;
    /// User-defined device.
    pub const CUSTOM_DEVICE: u16 = 15;
}

/// The kind a tag registers, `None` for unrecognized tags.
fn kind_for_tag(tag: u16) -> Option<KindId> {
    match tag {
        tags::BUTTON => Some(KindId::Button),
        tags::OUTPUT => Some(KindId::Output),
        tags::ENCODER_LEGACY | tags::ENCODER => Some(KindId::Encoder),
        tags::STEPPER_LEGACY_V1 | tags::STEPPER_LEGACY_V2 | tags::STEPPER => {
            Some(KindId::Stepper)
        }
        tags::SERVO => Some(KindId::Servo),
        tags::ANALOG_INPUT => Some(KindId::AnalogInput),
        tags::INPUT_SHIFTER => Some(KindId::InputShifter),
        tags::OUTPUT_SHIFTER => Some(KindId::OutputShifter),
        tags::LED_SEGMENT => Some(KindId::LedSegment),
        tags::LCD_DISPLAY => Some(KindId::LcdDisplay),
        tags::DIGIN_MUX => Some(KindId::DigInMux),
        tags::CUSTOM_DEVICE => Some(KindId::CustomDevice),
        _ => None,
    }
}

/// What terminated a numeric field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldEnd {
    /// `.` — more fields (or a name) follow in this entry.
    Dot,
    /// `:` — the entry ends here.
    Colon,
    /// NUL or end of input.
    End,
}

/// Forward-only reader over the stream bytes.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// True at end of input or on a NUL byte (unwritten storage).
    fn at_end(&self) -> bool {
        matches!(self.bytes.get(self.pos), None | Some(0))
    }

    /// Read one numeric field and the delimiter that ended it.
    fn read_field(&mut self) -> Result<(u16, FieldEnd), ConfigError> {
        let mut value: u32 = 0;
        let mut digits = 0usize;
        loop {
            match self.bytes.get(self.pos).copied() {
                Some(b) if b.is_ascii_digit() => {
                    value = value * 10 + u32::from(b - b'0');
                    if value > u32::from(u16::MAX) {
                        return Err(ConfigError::Malformed { offset: self.pos });
                    }
                    digits += 1;
                    self.pos += 1;
                }
                Some(b'.') if digits > 0 => {
                    self.pos += 1;
                    return Ok((value as u16, FieldEnd::Dot));
                }
                Some(b':') if digits > 0 => {
                    self.pos += 1;
                    return Ok((value as u16, FieldEnd::Colon));
                }
                Some(0) | None if digits > 0 => {
                    return Ok((value as u16, FieldEnd::End));
                }
                _ => return Err(ConfigError::Malformed { offset: self.pos }),
            }
        }
    }

    /// Read name bytes up to and including the entry terminator.
    fn read_name(&mut self) -> Result<&'a [u8], ConfigError> {
        let start = self.pos;
        loop {
            match self.bytes.get(self.pos).copied() {
                Some(b':') => {
                    let name = &self.bytes[start..self.pos];
                    self.pos += 1;
                    return Ok(name);
                }
                Some(0) | None => {
                    return Err(ConfigError::Malformed { offset: self.pos })
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Lenient skip to just past the entry terminator.
    ///
    /// Returns `false` if the stream ended first.
    fn skip_entry(&mut self) -> bool {
        loop {
            match self.bytes.get(self.pos).copied() {
                Some(b':') => {
                    self.pos += 1;
                    return true;
                }
                Some(0) | None => return false,
                Some(_) => self.pos += 1,
            }
        }
    }
}

/// Read `N` numeric fields; returns them plus whether a trailing name
/// field follows (the last delimiter was `.` rather than `:`).
fn fixed_params<const N: usize>(cur: &mut Cursor<'_>) -> Result<([u16; N], bool), ConfigError> {
    let mut out = [0u16; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let (value, end) = cur.read_field()?;
        *slot = value;
        match end {
            FieldEnd::Dot => {}
            FieldEnd::Colon if i + 1 == N => return Ok((out, false)),
            _ => return Err(ConfigError::Malformed { offset: cur.pos }),
        }
    }
    Ok((out, true))
}

/// Copy the trailing name (if present) into the name buffer.
///
/// Returns the ref plus whether the buffer overflowed and the name was
/// truncated.
fn stored_name(
    cur: &mut Cursor<'_>,
    names: &mut NameBuffer,
    has_name: bool,
) -> Result<(NameRef, bool), ConfigError> {
    if !has_name {
        return Ok((NameRef::EMPTY, false));
    }
    let raw = cur.read_name()?;
    let (name, truncated) = names.push_lossy(raw);
    Ok((name, truncated))
}

/// Consume the trailing name (if present) without storing it.
fn skipped_name(cur: &mut Cursor<'_>, has_name: bool) -> Result<(), ConfigError> {
    if has_name {
        cur.read_name()?;
    }
    Ok(())
}

/// Sizing pass: instances per kind, for arena reservation.
///
/// Lenient by design — it counts until the terminator, the end of
/// input, or the first byte it cannot read, so on a malformed stream
/// the counts cover at least every entry the strict pass will emit.
pub fn count_devices(stream: &[u8]) -> KindCounts {
    let mut counts = KindCounts::new();
    let mut cur = Cursor::new(stream);
    loop {
        if cur.at_end() {
            break;
        }
        let (tag, end) = match cur.read_field() {
            Ok(field) => field,
            Err(_) => break,
        };
        if tag == tags::END {
            break;
        }
        let Some(kind) = kind_for_tag(tag) else {
            break;
        };
        counts.bump(kind);
        match end {
            FieldEnd::Colon => {}
            FieldEnd::End => break,
            FieldEnd::Dot => {
                if !cur.skip_entry() {
                    break;
                }
            }
        }
    }
    counts
}

/// Populate pass: decode the stream entry by entry.
///
/// Each decoded entry is handed to `emit` (with legacy tags already
/// resolved and defaulted) before the next entry is looked at, so on
/// failure everything before the offending entry stays registered.
/// Names of input kinds are copied into `names`; a name-buffer
/// overflow registers the in-progress entry with a truncated name and
/// then aborts with [`ConfigError::NameBufferFull`].
///
/// # Examples
///
/// ```
/// use pinion_config::{decode, DeviceEntry};
/// use pinion_core::NameBuffer;
///
/// let mut names = NameBuffer::new(64);
/// let mut entries = Vec::new();
/// decode(b"1.3:2.7:0", &mut names, |e| entries.push(e)).unwrap();
///
/// assert_eq!(entries.len(), 2);
/// assert!(matches!(entries[0], DeviceEntry::Button { pin: 3, .. }));
/// assert!(matches!(entries[1], DeviceEntry::Output { pin: 7 }));
/// ```
pub fn decode(
    stream: &[u8],
    names: &mut NameBuffer,
    mut emit: impl FnMut(DeviceEntry),
) -> Result<(), ConfigError> {
    let mut cur = Cursor::new(stream);
    loop {
        if cur.at_end() {
            return Ok(());
        }
        let entry_start = cur.pos;
        let (tag, end) = cur.read_field()?;
        if tag == tags::END {
            return Ok(());
        }
        if end != FieldEnd::Dot {
            // Every known entry carries at least one parameter.
            return Err(ConfigError::Malformed { offset: cur.pos });
        }

        let mut truncated = false;
        let entry = match tag {
            tags::BUTTON => {
                let ([pin], has_name) = fixed_params::<1>(&mut cur)?;
                let (name, t) = stored_name(&mut cur, names, has_name)?;
                truncated = t;
                DeviceEntry::Button {
                    pin: pin as u8,
                    name,
                }
            }
            tags::OUTPUT => {
                let ([pin], has_name) = fixed_params::<1>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::Output { pin: pin as u8 }
            }
            tags::ENCODER_LEGACY => {
                let ([pin_a, pin_b], has_name) = fixed_params::<2>(&mut cur)?;
                let (name, t) = stored_name(&mut cur, names, has_name)?;
                truncated = t;
                DeviceEntry::Encoder {
                    pin_a: pin_a as u8,
                    pin_b: pin_b as u8,
                    encoder_type: 0,
                    name,
                }
            }
            tags::ENCODER => {
                let ([pin_a, pin_b, encoder_type], has_name) = fixed_params::<3>(&mut cur)?;
                let (name, t) = stored_name(&mut cur, names, has_name)?;
                truncated = t;
                DeviceEntry::Encoder {
                    pin_a: pin_a as u8,
                    pin_b: pin_b as u8,
                    encoder_type: encoder_type as u8,
                    name,
                }
            }
            tags::STEPPER_LEGACY_V1 => {
                let ([p1, p2, p3, p4, button_pin], has_name) = fixed_params::<5>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::Stepper {
                    pins: [p1 as u8, p2 as u8, p3 as u8, p4 as u8],
                    button_pin: button_pin as u8,
                    mode: 0,
                    backlash: 0,
                    deactivate_output: false,
                }
            }
            tags::STEPPER_LEGACY_V2 => {
                let ([p1, p2, p3, p4, button_pin, mode], has_name) =
                    fixed_params::<6>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::Stepper {
                    pins: [p1 as u8, p2 as u8, p3 as u8, p4 as u8],
                    button_pin: button_pin as u8,
                    mode: mode as u8,
                    backlash: 0,
                    deactivate_output: false,
                }
            }
            tags::STEPPER => {
                let ([p1, p2, p3, p4, button_pin, mode, backlash, deactivate], has_name) =
                    fixed_params::<8>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::Stepper {
                    pins: [p1 as u8, p2 as u8, p3 as u8, p4 as u8],
                    button_pin: button_pin as u8,
                    mode: mode as u8,
                    backlash,
                    deactivate_output: deactivate != 0,
                }
            }
            tags::SERVO => {
                let ([pin], has_name) = fixed_params::<1>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::Servo { pin: pin as u8 }
            }
            tags::ANALOG_INPUT => {
                let ([pin, sensitivity], has_name) = fixed_params::<2>(&mut cur)?;
                let (name, t) = stored_name(&mut cur, names, has_name)?;
                truncated = t;
                DeviceEntry::AnalogInput {
                    pin: pin as u8,
                    sensitivity: sensitivity as u8,
                    name,
                }
            }
            tags::INPUT_SHIFTER => {
                let ([latch, clock, data, modules], has_name) = fixed_params::<4>(&mut cur)?;
                let (name, t) = stored_name(&mut cur, names, has_name)?;
                truncated = t;
                DeviceEntry::InputShifter {
                    latch_pin: latch as u8,
                    clock_pin: clock as u8,
                    data_pin: data as u8,
                    module_count: modules as u8,
                    name,
                }
            }
            tags::OUTPUT_SHIFTER => {
                let ([latch, clock, data, modules], has_name) = fixed_params::<4>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::OutputShifter {
                    latch_pin: latch as u8,
                    clock_pin: clock as u8,
                    data_pin: data as u8,
                    module_count: modules as u8,
                }
            }
            tags::LED_SEGMENT => {
                let ([data, cs, clock, modules, brightness], has_name) =
                    fixed_params::<5>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::LedSegment {
                    data_pin: data as u8,
                    cs_pin: cs as u8,
                    clock_pin: clock as u8,
                    module_count: modules as u8,
                    brightness: brightness as u8,
                }
            }
            tags::LCD_DISPLAY => {
                let ([address, cols, rows], has_name) = fixed_params::<3>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::LcdDisplay {
                    address: address as u8,
                    cols: cols as u8,
                    rows: rows as u8,
                }
            }
            tags::DIGIN_MUX => {
                let ([data, s0, s1, s2, s3, registers], has_name) =
                    fixed_params::<6>(&mut cur)?;
                let (name, t) = stored_name(&mut cur, names, has_name)?;
                truncated = t;
                DeviceEntry::DigInMux {
                    data_pin: data as u8,
                    select_pins: [s0 as u8, s1 as u8, s2 as u8, s3 as u8],
                    register_count: registers as u8,
                    name,
                }
            }
            tags::CUSTOM_DEVICE => {
                let ([pin_ref, type_ref, config_ref], has_name) = fixed_params::<3>(&mut cur)?;
                skipped_name(&mut cur, has_name)?;
                DeviceEntry::CustomDevice {
                    pin_ref,
                    type_ref,
                    config_ref,
                }
            }
            _ => return Err(ConfigError::Malformed { offset: entry_start }),
        };

        emit(entry);
        if truncated {
            return Err(ConfigError::NameBufferFull {
                offset: entry_start,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_all(stream: &[u8], name_capacity: usize) -> (Vec<DeviceEntry>, Result<(), ConfigError>) {
        let mut names = NameBuffer::new(name_capacity);
        let mut entries = Vec::new();
        let result = decode(stream, &mut names, |e| entries.push(e));
        (entries, result)
    }

    #[test]
    fn decodes_minimal_input_output_stream() {
        let (entries, result) = decode_all(b"1.3:2.7:0", 64);
        result.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], DeviceEntry::Button { pin: 3, name } if name.is_empty()));
        assert!(matches!(entries[1], DeviceEntry::Output { pin: 7 }));
    }

    #[test]
    fn stores_input_names_and_skips_output_names() {
        let mut names = NameBuffer::new(64);
        let mut entries = Vec::new();
        decode(b"1.3.GEAR:2.7.IGNORED:0", &mut names, |e| entries.push(e)).unwrap();
        match entries[0] {
            DeviceEntry::Button { pin: 3, name } => assert_eq!(names.get(name), "GEAR"),
            ref other => panic!("expected button, got {other:?}"),
        }
        // Only the button name occupies buffer space.
        assert_eq!(names.used(), 4);
    }

    #[test]
    fn terminator_variants_end_the_stream() {
        for stream in [&b"1.3:0"[..], b"1.3:0.", b"1.3:\0garbage", b"1.3:"] {
            let (entries, result) = decode_all(stream, 64);
            result.unwrap();
            assert_eq!(entries.len(), 1, "stream {stream:?}");
        }
        let (entries, result) = decode_all(b"", 64);
        result.unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn legacy_encoder_matches_current_with_default_type() {
        let (legacy, r1) = decode_all(b"3.1.2.ENC:0", 64);
        let (current, r2) = decode_all(b"4.1.2.0.ENC:0", 64);
        r1.unwrap();
        r2.unwrap();
        assert_eq!(legacy, current);
    }

    #[test]
    fn legacy_steppers_default_missing_fields() {
        let (v1, r1) = decode_all(b"5.1.2.3.4.0:0", 64);
        let (v2, r2) = decode_all(b"6.1.2.3.4.0.0:0", 64);
        let (current, r3) = decode_all(b"7.1.2.3.4.0.0.0.0:0", 64);
        r1.unwrap();
        r2.unwrap();
        r3.unwrap();
        assert_eq!(v1, current);
        assert_eq!(v2, current);
    }

    #[test]
    fn current_stepper_reads_all_fields() {
        let (entries, result) = decode_all(b"7.8.9.10.11.12.1.40.1:0", 64);
        result.unwrap();
        assert_eq!(
            entries[0],
            DeviceEntry::Stepper {
                pins: [8, 9, 10, 11],
                button_pin: 12,
                mode: 1,
                backlash: 40,
                deactivate_output: true,
            }
        );
    }

    #[test]
    fn malformed_entry_fails_closed_keeping_prior_entries() {
        let (entries, result) = decode_all(b"1.3:2.x:1.5:0", 64);
        assert_eq!(entries.len(), 1);
        assert!(matches!(result, Err(ConfigError::Malformed { offset: 6 })));
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let (entries, result) = decode_all(b"99.1:0", 64);
        assert!(entries.is_empty());
        assert!(matches!(result, Err(ConfigError::Malformed { offset: 0 })));
    }

    #[test]
    fn truncated_entry_is_malformed() {
        let (entries, result) = decode_all(b"1.3", 64);
        assert!(entries.is_empty());
        assert!(result.is_err());

        // A name cut off before its terminator is also truncation.
        let (entries, result) = decode_all(b"1.3.GEA", 64);
        assert!(entries.is_empty());
        assert!(result.is_err());
    }

    #[test]
    fn name_overflow_registers_truncated_entry_then_aborts() {
        let mut names = NameBuffer::new(4);
        let mut entries = Vec::new();
        let result = decode(b"1.3.LONGNAME:1.4.B:0", &mut names, |e| entries.push(e));
        assert!(matches!(result, Err(ConfigError::NameBufferFull { offset: 0 })));
        assert_eq!(entries.len(), 1);
        match entries[0] {
            DeviceEntry::Button { pin: 3, name } => assert_eq!(names.get(name), "LONG"),
            ref other => panic!("expected button, got {other:?}"),
        }
    }

    #[test]
    fn decode_is_idempotent_across_reload() {
        let stream = b"1.3.GEAR:9.14.4.BRIGHT:2.7:0";
        let (first, r1) = decode_all(stream, 64);
        let (second, r2) = decode_all(stream, 64);
        r1.unwrap();
        r2.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn count_pass_tallies_by_kind() {
        let counts = count_devices(b"1.3:1.4:2.7:3.1.2.E:5.1.2.3.4.0:0");
        assert_eq!(counts.get(KindId::Button), 2);
        assert_eq!(counts.get(KindId::Output), 1);
        assert_eq!(counts.get(KindId::Encoder), 1);
        assert_eq!(counts.get(KindId::Stepper), 1);
        assert_eq!(counts.get(KindId::Servo), 0);
    }

    #[test]
    fn count_pass_never_errors() {
        assert_eq!(count_devices(b"").total(), 0);
        assert_eq!(count_devices(b"0").total(), 0);
        assert_eq!(count_devices(b"\xff\xff").total(), 0);
        // Malformed second entry: the first still counts.
        assert_eq!(count_devices(b"1.3:..x").get(KindId::Button), 1);
    }

    #[test]
    fn oversized_field_is_malformed() {
        let (entries, result) = decode_all(b"1.70000:0", 64);
        assert!(entries.is_empty());
        assert!(result.is_err());
    }

    proptest! {
        /// Decoding arbitrary bytes never panics, and the strict pass
        /// never emits more instances of a kind than the sizing pass
        /// counted (the arena is always reserved large enough).
        #[test]
        fn decode_never_exceeds_count_pass(stream in prop::collection::vec(any::<u8>(), 0..256)) {
            let counts = count_devices(&stream);
            let mut names = NameBuffer::new(256);
            let mut decoded = KindCounts::new();
            let _ = decode(&stream, &mut names, |e| decoded.bump(e.kind()));
            for kind in KindId::ALL {
                prop_assert!(decoded.get(kind) <= counts.get(kind));
            }
        }
    }
}
