use std::{
    convert::{TryFrom, TryInto},
    fmt::{self, Display},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use time::{format_description::well_known::Iso8601, OffsetDateTime};

/// A time tag in an OSC message consists of two 32-bit integers where the
/// first one denotes the number of seconds since 1900-01-01 and the second
/// the fractions of a second.
/// For details on its semantics see <http://opensoundcontrol.org/node/3/#timetags>
///
/// The bit pattern `0x0000000000000001` is a special case, meaning
/// "immediately" rather than a specific time. See [`OscTime::immediately`].
///
/// # Examples
///
/// ```
/// use osc_proto::OscTime;
/// use std::{convert::TryFrom, time::UNIX_EPOCH};
///
/// assert_eq!(
///     OscTime::try_from(UNIX_EPOCH).unwrap(),
///     OscTime::from((2_208_988_800, 0))
/// );
/// ```
///
/// **These conversions are lossy**, but are tested to have a deviation within
/// 5 nanoseconds when converted back and forth in either direction.
///
/// Although any time since the OSC epoch (`1900-01-01 00:00:00 UTC`) can be represented using the
/// OSC timestamp format, this crate only allows conversions between times greater than or equal to
/// the [`UNIX_EPOCH`](std::time::UNIX_EPOCH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OscTime {
    pub seconds: u32,
    pub fractional: u32,
}

impl OscTime {
    const UNIX_OFFSET: u64 = 2_208_988_800; // From RFC 5905
    const TWO_POW_32: f64 = (u32::MAX as f64) + 1.0;
    const ONE_OVER_TWO_POW_32: f64 = 1.0 / OscTime::TWO_POW_32;
    const NANOS_PER_SECOND: f64 = 1.0e9;
    const SECONDS_PER_NANO: f64 = 1.0 / OscTime::NANOS_PER_SECOND;

    /// The bit pattern meaning "now", per §4.1 of the OSC spec: 63 zero bits
    /// followed by a single 1.
    pub const fn immediately() -> OscTime {
        OscTime {
            seconds: 0,
            fractional: 1,
        }
    }

    /// True if this is the IMMEDIATELY sentinel.
    pub fn is_immediately(&self) -> bool {
        self.seconds == 0 && self.fractional == 1
    }
}

impl TryFrom<SystemTime> for OscTime {
    type Error = OscTimeError;

    fn try_from(time: SystemTime) -> std::result::Result<OscTime, OscTimeError> {
        let duration_since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| OscTimeError(OscTimeErrorKind::BeforeEpoch))?
            + Duration::new(OscTime::UNIX_OFFSET, 0);
        let seconds = u32::try_from(duration_since_epoch.as_secs())
            .map_err(|_| OscTimeError(OscTimeErrorKind::Overflow))?;
        let nanos = duration_since_epoch.subsec_nanos() as f64;
        let fractional = (nanos * OscTime::SECONDS_PER_NANO * OscTime::TWO_POW_32).round() as u32;
        Ok(OscTime {
            seconds,
            fractional,
        })
    }
}

impl From<OscTime> for SystemTime {
    fn from(time: OscTime) -> SystemTime {
        let nanos =
            (time.fractional as f64) * OscTime::ONE_OVER_TWO_POW_32 * OscTime::NANOS_PER_SECOND;
        let duration_since_osc_epoch = Duration::new(time.seconds as u64, nanos.round() as u32);
        let duration_since_unix_epoch =
            duration_since_osc_epoch - Duration::new(OscTime::UNIX_OFFSET, 0);
        UNIX_EPOCH + duration_since_unix_epoch
    }
}

impl Display for OscTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_immediately() {
            return f.write_str("immediately");
        }
        let time: OffsetDateTime = SystemTime::from(*self).into();
        let formatted = time.format(&Iso8601::DEFAULT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl From<(u32, u32)> for OscTime {
    fn from(time: (u32, u32)) -> OscTime {
        let (seconds, fractional) = time;
        OscTime {
            seconds,
            fractional,
        }
    }
}

impl From<OscTime> for (u32, u32) {
    fn from(time: OscTime) -> (u32, u32) {
        (time.seconds, time.fractional)
    }
}

/// An error returned by conversions involving [`OscTime`].
#[derive(Debug)]
pub struct OscTimeError(OscTimeErrorKind);

#[derive(Debug)]
enum OscTimeErrorKind {
    BeforeEpoch,
    Overflow,
}

impl Display for OscTimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            OscTimeErrorKind::BeforeEpoch => {
                write!(f, "time is before the unix epoch and cannot be stored")
            }
            OscTimeErrorKind::Overflow => {
                write!(f, "time overflows what OSC time can store")
            }
        }
    }
}

impl std::error::Error for OscTimeError {}

/// see OSC Type Tag String: [OSC Spec. 1.0](http://opensoundcontrol.org/spec-1_0)
/// padding: zero bytes (n*4)
#[derive(Clone, Debug, PartialEq)]
pub enum OscType {
    Int(i32),
    UInt(u32),
    Float(f32),
    String(String),
    /// A `UTF-8` encoded string, the `S` tag. Distinct from the plain ASCII
    /// `s` string tag so round-tripping preserves the author's choice.
    Utf8String(String),
    Blob(Vec<u8>),
    // use struct for time tag to avoid destructuring
    Time(OscTime),
    Long(i64),
    Double(f64),
    Char(char),
    Color(OscColor),
    Midi(OscMidiMessage),
    Bool(bool),
    Nil,
    Inf,
}

macro_rules! value_impl {
    ($(($name:ident, $variant:ident, $ty:ty)),*) => {
        $(
        impl OscType {
            #[allow(dead_code)]
            pub fn $name(self) -> Option<$ty> {
                match self {
                    OscType::$variant(v) => Some(v),
                    _ => None
                }
            }
        }
        impl From<$ty> for OscType {
            fn from(v: $ty) -> Self {
                OscType::$variant(v)
            }
        }
        )*
    }
}
value_impl! {
    (int, Int, i32),
    (uint, UInt, u32),
    (float, Float, f32),
    (string, String, String),
    (blob, Blob, Vec<u8>),
    (long, Long, i64),
    (double, Double, f64),
    (char, Char, char),
    (color, Color, OscColor),
    (midi, Midi, OscMidiMessage),
    (bool, Bool, bool)
}

impl From<(u32, u32)> for OscType {
    fn from(time: (u32, u32)) -> Self {
        OscType::Time(time.into())
    }
}

impl OscType {
    pub fn time(self) -> Option<OscTime> {
        match self {
            OscType::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn utf8_string(self) -> Option<String> {
        match self {
            OscType::Utf8String(s) => Some(s),
            _ => None,
        }
    }

    /// Build an `OscType` from an `i64` without requiring the caller to
    /// name a tag up front: values that fit in 32 bits become `Int`,
    /// everything else is promoted to `Long`.
    pub fn infer_int(value: i64) -> OscType {
        match i32::try_from(value) {
            Ok(v) => OscType::Int(v),
            Err(_) => OscType::Long(value),
        }
    }
}

impl Display for OscType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscType::Int(v) => write!(f, "(i) {v}"),
            OscType::UInt(v) => write!(f, "(u) {v}"),
            OscType::Float(v) => write!(f, "(f) {v}"),
            OscType::String(v) => write!(f, "(s) {v}"),
            OscType::Utf8String(v) => write!(f, "(S) {v}"),
            OscType::Blob(v) => {
                f.write_str("(b)")?;
                if v.is_empty() {
                    return Ok(());
                }

                f.write_str(" 0x")?;
                write_hex(f, v)
            }
            OscType::Time(v) => write!(f, "(t) {v}"),
            OscType::Long(v) => write!(f, "(h) {v}"),
            OscType::Double(v) => write!(f, "(d) {v}"),
            OscType::Char(v) => write!(f, "(c) {v}"),
            OscType::Color(v) => write!(f, "(r) {v}"),
            OscType::Midi(v) => write!(f, "(m) {v}"),
            OscType::Bool(v) => f.write_str(if *v { "(T)" } else { "(F)" }),
            OscType::Nil => f.write_str("(N)"),
            OscType::Inf => f.write_str("(I)"),
        }
    }
}

fn write_hex(f: &mut dyn fmt::Write, v: &[u8]) -> fmt::Result {
    for octet in v {
        write!(f, "{:02X}", octet)?;
    }
    Ok(())
}

impl TryFrom<SystemTime> for OscType {
    type Error = OscTimeError;

    fn try_from(time: SystemTime) -> std::result::Result<OscType, OscTimeError> {
        time.try_into().map(OscType::Time)
    }
}

impl<'a> From<&'a str> for OscType {
    fn from(string: &'a str) -> Self {
        OscType::String(string.to_string())
    }
}

/// Represents the parts of a Midi message. Mainly used for
/// tunneling midi over a network using the OSC protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OscMidiMessage {
    pub port: u8,
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl Display for OscMidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{port:{}, status:0x{:02X}, data:0x{:02X}{:02X}}}",
            self.port, self.status, self.data1, self.data2,
        )
    }
}

/// An *osc packet* can contain an *osc message* or a bundle of nested messages
/// which is called *osc bundle*.
#[derive(Clone, Debug, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

impl OscPacket {
    /// Number of leaf messages reachable from this packet: 1 for a bare
    /// message, or the sum of the element counts of a bundle's children.
    pub fn element_count(&self) -> usize {
        match self {
            OscPacket::Message(_) => 1,
            OscPacket::Bundle(b) => b.content.iter().map(OscPacket::element_count).sum(),
        }
    }
}

impl Display for OscPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscPacket::Message(m) => m.fmt(f),
            OscPacket::Bundle(b) => b.fmt(f),
        }
    }
}

/// An OSC message consists of an address and
/// zero or more arguments. The address should
/// specify an element of your Instrument (or whatever
/// you want to control with OSC) and the arguments
/// are used to set properties of the element to the
/// respective values.
#[derive(Clone, Debug, PartialEq)]
pub struct OscMessage {
    pub addr: String,
    pub args: Vec<OscType>,
}

impl OscMessage {
    pub fn new<S: Into<String>>(addr: S) -> OscMessage {
        OscMessage {
            addr: addr.into(),
            args: vec![],
        }
    }

    pub fn push<T: Into<OscType>>(&mut self, value: T) -> &mut Self {
        self.args.push(value.into());
        self
    }

    /// Insert `value` at `index`, shifting later arguments one place to the
    /// right. Fails if `index` is past the end of the current arguments.
    pub fn insert<T: Into<OscType>>(
        &mut self,
        index: usize,
        value: T,
    ) -> crate::errors::Result<()> {
        if index > self.args.len() {
            return Err(Self::index_error(index, self.args.len()));
        }
        self.args.insert(index, value.into());
        Ok(())
    }

    /// Remove the first argument equal to `value`, returning it. Returns
    /// `None` if no argument matches.
    pub fn remove(&mut self, value: &OscType) -> Option<OscType> {
        let index = self.args.iter().position(|v| v == value)?;
        Some(self.args.remove(index))
    }

    /// Read the argument at `index`.
    pub fn get(&self, index: usize) -> crate::errors::Result<&OscType> {
        self.args.get(index).ok_or_else(|| Self::index_error(index, self.args.len()))
    }

    /// Overwrite the argument at `index` in place.
    pub fn set<T: Into<OscType>>(&mut self, index: usize, value: T) -> crate::errors::Result<()> {
        let len = self.args.len();
        let slot = self
            .args
            .get_mut(index)
            .ok_or_else(|| Self::index_error(index, len))?;
        *slot = value.into();
        Ok(())
    }

    /// Remove and return the argument at `index`, shifting later arguments
    /// one place to the left. Unlike [`OscMessage::remove`], this accepts
    /// any valid index including `0`.
    pub fn remove_at(&mut self, index: usize) -> crate::errors::Result<OscType> {
        if index >= self.args.len() {
            return Err(Self::index_error(index, self.args.len()));
        }
        Ok(self.args.remove(index))
    }

    fn index_error(index: usize, len: usize) -> crate::errors::OscError {
        crate::errors::OscError::BadArg(format!(
            "index {index} out of range for message with {len} argument(s)"
        ))
    }

    pub fn clear(&mut self) {
        self.args.clear();
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl Display for OscMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(OscType::to_string)
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{}, {}", self.addr, args)
    }
}

/// An OSC bundle contains zero or more OSC packets
/// and a time tag. The contained packets *should* be
/// applied at the given time tag.
#[derive(Clone, Debug, PartialEq)]
pub struct OscBundle {
    pub timetag: OscTime,
    pub content: Vec<OscPacket>,
}

impl OscBundle {
    pub fn new(timetag: OscTime) -> OscBundle {
        OscBundle {
            timetag,
            content: vec![],
        }
    }

    pub fn push(&mut self, packet: OscPacket) -> &mut Self {
        self.content.push(packet);
        self
    }
}

impl Display for OscBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = self
            .content
            .iter()
            .map(OscPacket::to_string)
            .collect::<Vec<String>>()
            .join("; ");
        write!(f, "#bundle {} {{ {} }}", self.timetag, content)
    }
}

/// An RGBA color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OscColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Display for OscColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{r},{g},{b},{a}}}",
            r = self.red,
            g = self.green,
            b = self.blue,
            a = self.alpha
        )
    }
}

pub type Result<T> = std::result::Result<T, crate::errors::OscError>;

impl From<String> for OscMessage {
    fn from(s: String) -> OscMessage {
        OscMessage {
            addr: s,
            args: vec![],
        }
    }
}
impl<'a> From<&'a str> for OscMessage {
    fn from(s: &str) -> OscMessage {
        OscMessage {
            addr: s.to_string(),
            args: vec![],
        }
    }
}
