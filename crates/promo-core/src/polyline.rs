//! Google encoded-polyline codec.
//!
//! The standard algorithm: coordinates are scaled to 1e-5 precision,
//! delta-encoded against the previous point, zig-zag signed, and packed into
//! printable ASCII five bits at a time. `validate` responses carry the
//! two-point origin→destination path in this form.

use crate::{Error, Result};

/// Encode a `(latitude, longitude)` path as a polyline string.
pub fn encode(points: &[(f64, f64)]) -> String {
  let mut out = String::new();
  let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

  for &(lat, lng) in points {
    let lat_e5 = scale(lat);
    let lng_e5 = scale(lng);
    encode_value(lat_e5 - prev_lat, &mut out);
    encode_value(lng_e5 - prev_lng, &mut out);
    prev_lat = lat_e5;
    prev_lng = lng_e5;
  }

  out
}

/// Decode a polyline string back into `(latitude, longitude)` points.
pub fn decode(polyline: &str) -> Result<Vec<(f64, f64)>> {
  let mut points = Vec::new();
  let mut bytes = polyline.bytes();
  let (mut lat, mut lng) = (0i64, 0i64);

  loop {
    let Some(dlat) = decode_value(&mut bytes)? else {
      return Ok(points);
    };
    let Some(dlng) = decode_value(&mut bytes)? else {
      return Err(Error::InvalidPolyline(
        "odd number of coordinate values".into(),
      ));
    };
    lat += dlat;
    lng += dlng;
    points.push((lat as f64 / 1e5, lng as f64 / 1e5));
  }
}

fn scale(coord: f64) -> i64 { (coord * 1e5).round() as i64 }

fn encode_value(delta: i64, out: &mut String) {
  // Zig-zag: left-shift, invert when negative, so the sign lives in bit 0.
  let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
  let mut value = zigzag as u64;
  while value >= 0x20 {
    out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
    value >>= 5;
  }
  out.push((value as u8 + 63) as char);
}

/// Read one zig-zagged varint. `Ok(None)` means clean end of input.
fn decode_value(bytes: &mut impl Iterator<Item = u8>) -> Result<Option<i64>> {
  let mut value: u64 = 0;
  let mut shift = 0u32;

  loop {
    let Some(byte) = bytes.next() else {
      return if shift == 0 {
        Ok(None)
      } else {
        Err(Error::InvalidPolyline("truncated value".into()))
      };
    };
    if !(63..=126).contains(&byte) {
      return Err(Error::InvalidPolyline(format!("byte {byte:#04x} out of range")));
    }
    // An i64 needs at most 13 five-bit chunks; anything longer is garbage.
    if shift >= 64 {
      return Err(Error::InvalidPolyline("value too long".into()));
    }
    let chunk = (byte - 63) as u64;
    value |= (chunk & 0x1f) << shift;
    shift += 5;
    if chunk < 0x20 {
      break;
    }
  }

  let value = value as i64;
  let delta = if value & 1 != 0 { !(value >> 1) } else { value >> 1 };
  Ok(Some(delta))
}
