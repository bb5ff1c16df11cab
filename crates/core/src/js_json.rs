//! JSON serialization that writes numbers the way `JSON.stringify` does.
//!
//! serde_json keeps the parsed number kind: `1.0` stays `1.0`, `1e2` becomes
//! `100.0`, and integers beyond 2^53 keep every digit. Browsers and the
//! service's existing clients see every number as an IEEE double printed by
//! ECMAScript `Number::toString`, so hashes and response bodies go through
//! [`EcmaScriptFormatter`] instead.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// serde_json formatter that renders every number as an f64 in
/// ECMAScript `Number::toString` form (`1`, `0.1`, `1e+21`, `5e-7`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EcmaScriptFormatter;

impl EcmaScriptFormatter {
    fn write_number<W: ?Sized + io::Write>(writer: &mut W, value: f64) -> io::Result<()> {
        let mut buffer = ryu_js::Buffer::new();
        writer.write_all(buffer.format(value).as_bytes())
    }
}

impl Formatter for EcmaScriptFormatter {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        Self::write_number(writer, value)
    }

    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        Self::write_number(writer, f64::from(value))
    }

    fn write_i64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: i64) -> io::Result<()> {
        Self::write_number(writer, value as f64)
    }

    fn write_u64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: u64) -> io::Result<()> {
        Self::write_number(writer, value as f64)
    }
}

/// Compact JSON bytes with ECMAScript number formatting. Object keys keep
/// their insertion order.
pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut out, EcmaScriptFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// [`to_vec`] as a `String`.
pub fn to_string<T: ?Sized + Serialize>(value: &T) -> serde_json::Result<String> {
    let bytes = to_vec(value)?;
    // The serializer only emits UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
