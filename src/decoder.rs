use crate::errors::OscError;
use crate::types::{OscBundle, OscColor, OscMessage, OscMidiMessage, OscPacket, OscTime, OscType};

use std::char;

use nom::bytes::complete::{take, take_till};
use nom::combinator::{map, map_parser, map_res};
use nom::multi::many0;
use nom::number::complete::{be_f32, be_f64, be_i32, be_i64, be_u32};
use nom::sequence::{terminated, tuple};
use nom::{IResult, Offset};

/// Common MTU size for ethernet, used by callers to size a receive buffer.
pub const MTU: usize = 1536;

type OscResult<'a, T> = IResult<&'a [u8], T, OscError>;

/// Decodes a single datagram received from a UDP socket into an `OscPacket`.
/// Returns an `OscError` if the bytes are not a well-formed OSC message or
/// bundle.
pub fn decode_udp(msg: &[u8]) -> crate::errors::Result<(&[u8], OscPacket)> {
    decode_packet(msg, msg).map_err(|e| match e {
        nom::Err::Incomplete(_) => OscError::BadPacket("incomplete packet"),
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
    })
}

fn decode_packet<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, OscPacket> {
    if input.is_empty() {
        return Err(nom::Err::Error(OscError::BadPacket("empty packet")));
    }

    match input[0] as char {
        '/' => decode_message(input, original_input),
        '#' => decode_bundle(input, original_input),
        _ => Err(nom::Err::Error(OscError::BadPacket("unknown message format"))),
    }
}

fn decode_message<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, OscPacket> {
    let (input, addr) = read_osc_string(input, original_input)?;

    if input.is_empty() {
        return Ok((input, OscPacket::Message(OscMessage { addr, args: vec![] })));
    }

    let (input, type_tags) = read_osc_string(input, original_input)?;

    if type_tags.len() > 1 {
        let (input, args) = read_osc_args(input, original_input, &type_tags)?;
        Ok((input, OscPacket::Message(OscMessage { addr, args })))
    } else {
        Ok((input, OscPacket::Message(OscMessage { addr, args: vec![] })))
    }
}

fn decode_bundle<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, OscPacket> {
    let (input, bundle_tag) = read_osc_string(input, original_input)?;
    if bundle_tag != "#bundle" {
        return Err(nom::Err::Error(OscError::BadBundle(format!(
            "wrong bundle specifier: {bundle_tag}"
        ))));
    }

    let (input, (timetag, content)) = tuple((
        read_time_tag,
        many0(|input| read_bundle_element(input, original_input)),
    ))(input)?;

    Ok((input, OscPacket::Bundle(OscBundle { timetag, content })))
}

fn read_bundle_element<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, OscPacket> {
    let (input, elem_size) = be_u32(input)?;

    map_parser(
        |input| {
            take(elem_size)(input).map_err(|_: nom::Err<OscError>| {
                nom::Err::Error(OscError::BadBundle("bundle shorter than expected".to_string()))
            })
        },
        |input| decode_packet(input, original_input),
    )(input)
}

fn read_osc_string<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, String> {
    map_res(
        terminated(take_till(|c| c == b'\0'), |input| {
            pad_to_4_byte_boundary(input, original_input)
        }),
        |str_buf| String::from_utf8(str_buf.into()).map_err(OscError::StringError),
    )(input)
}

fn read_osc_args<'a>(
    mut input: &'a [u8],
    original_input: &'a [u8],
    raw_type_tags: &str,
) -> OscResult<'a, Vec<OscType>> {
    let type_tags: Vec<char> = raw_type_tags.chars().skip(1).collect();

    let mut args: Vec<OscType> = Vec::with_capacity(type_tags.len());
    for tag in type_tags {
        let (rest, arg) = read_osc_arg(input, original_input, tag)?;
        input = rest;
        if let Some(arg) = arg {
            args.push(arg);
        }
        // Unknown/unsupported tag: skip it. Consumes no bytes, since a
        // producer emitting a private extension tag we don't recognize
        // gives us no way to know its payload length.
    }
    Ok((input, args))
}

fn read_osc_arg<'a>(
    input: &'a [u8],
    original_input: &'a [u8],
    tag: char,
) -> OscResult<'a, Option<OscType>> {
    let result: OscResult<'a, OscType> = match tag {
        'f' => map(be_f32, OscType::Float)(input),
        'd' => map(be_f64, OscType::Double)(input),
        'i' => map(be_i32, OscType::Int)(input),
        'u' => map(be_u32, OscType::UInt)(input),
        'h' => map(be_i64, OscType::Long)(input),
        's' => read_osc_string(input, original_input).map(|(rest, s)| (rest, OscType::String(s))),
        'S' => {
            read_osc_string(input, original_input).map(|(rest, s)| (rest, OscType::Utf8String(s)))
        }
        't' => read_time_tag(input).map(|(rest, t)| (rest, OscType::Time(t))),
        'b' => read_blob(input, original_input),
        'r' => read_osc_color(input),
        'T' => Ok((input, true.into())),
        'F' => Ok((input, false.into())),
        'N' => Ok((input, OscType::Nil)),
        'I' => Ok((input, OscType::Inf)),
        'c' => read_char(input),
        'm' => read_midi_message(input),
        _ => return Ok((input, None)),
    };
    result.map(|(rest, arg)| (rest, Some(arg)))
}

fn read_char(input: &[u8]) -> OscResult<'_, OscType> {
    map_res(be_u32, |b| match char::from_u32(b) {
        Some(c) => Ok(OscType::Char(c)),
        None => Err(OscError::BadArg("argument is not a char".to_string())),
    })(input)
}

fn read_blob<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, OscType> {
    let (input, size) = be_u32(input)?;

    map(
        terminated(take(size), |input| {
            pad_blob_to_4_byte_boundary(input, original_input)
        }),
        |blob: &[u8]| OscType::Blob(blob.into()),
    )(input)
}

fn read_time_tag(input: &[u8]) -> OscResult<'_, OscTime> {
    map(tuple((be_u32, be_u32)), |(seconds, fractional)| OscTime {
        seconds,
        fractional,
    })(input)
}

fn read_midi_message(input: &[u8]) -> OscResult<'_, OscType> {
    map(take(4usize), |buf: &[u8]| {
        OscType::Midi(OscMidiMessage {
            port: buf[0],
            status: buf[1],
            data1: buf[2],
            data2: buf[3],
        })
    })(input)
}

fn read_osc_color(input: &[u8]) -> OscResult<'_, OscType> {
    map(take(4usize), |buf: &[u8]| {
        OscType::Color(OscColor {
            red: buf[0],
            green: buf[1],
            blue: buf[2],
            alpha: buf[3],
        })
    })(input)
}

/// Strings always carry at least one null terminator, even when their raw
/// content already ends on a 4-byte boundary, so padding is computed from
/// `consumed + 1`.
fn pad_to_4_byte_boundary<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, ()> {
    let consumed = original_input.offset(input);
    let padded = crate::encoder::pad(consumed as u64 + 1) as usize;
    let remaining_pad = padded - consumed;
    let (input, _) = take(remaining_pad)(input)?;
    Ok((input, ()))
}

/// Blobs have no terminator byte: when their length already lands on a
/// 4-byte boundary, zero padding bytes follow.
fn pad_blob_to_4_byte_boundary<'a>(input: &'a [u8], original_input: &'a [u8]) -> OscResult<'a, ()> {
    let consumed = original_input.offset(input);
    let padded = crate::encoder::pad(consumed as u64) as usize;
    let remaining_pad = padded - consumed;
    let (input, _) = take(remaining_pad)(input)?;
    Ok((input, ()))
}
