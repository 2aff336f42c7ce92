// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Minimal `.npy` array codec (format versions 1.0 to 3.0, little-endian,
//! C order)

use crate::error::{Error, Result};

const MAGIC: &[u8] = b"\x93NUMPY";
const HEADER_ALIGN: usize = 64;

/// Element types that can be written to an `.npy` payload
pub trait NpyElement: Copy {
    const DESCR: &'static str;
    fn extend_le(self, out: &mut Vec<u8>);
}

impl NpyElement for f32 {
    const DESCR: &'static str = "<f4";
    fn extend_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl NpyElement for u32 {
    const DESCR: &'static str = "<u4";
    fn extend_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl NpyElement for u8 {
    const DESCR: &'static str = "|u1";
    fn extend_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

/// Decoded array payload
#[derive(Debug, Clone, PartialEq)]
pub enum NpyData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

/// A decoded n-dimensional array
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub data: NpyData,
}

impl NpyArray {
    /// Elements as `f64`; only floating arrays qualify
    pub fn to_f64(&self) -> Result<Vec<f64>> {
        match &self.data {
            NpyData::F32(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            NpyData::F64(v) => Ok(v.clone()),
            _ => Err(Error::InvalidMesh(
                "expected a floating point array".to_string(),
            )),
        }
    }

    /// Elements as indices; negative values are rejected
    pub fn to_indices(&self) -> Result<Vec<usize>> {
        let negative = || Error::InvalidMesh("negative index in array".to_string());
        match &self.data {
            NpyData::U8(v) => Ok(v.iter().map(|&x| x as usize).collect()),
            NpyData::U32(v) => Ok(v.iter().map(|&x| x as usize).collect()),
            NpyData::U64(v) => Ok(v.iter().map(|&x| x as usize).collect()),
            NpyData::I32(v) => v
                .iter()
                .map(|&x| usize::try_from(x).map_err(|_| negative()))
                .collect(),
            NpyData::I64(v) => v
                .iter()
                .map(|&x| usize::try_from(x).map_err(|_| negative()))
                .collect(),
            _ => Err(Error::InvalidMesh("expected an integer array".to_string())),
        }
    }

    pub fn to_u8(&self) -> Result<Vec<u8>> {
        match &self.data {
            NpyData::U8(v) => Ok(v.clone()),
            _ => Err(Error::InvalidMesh("expected a uint8 array".to_string())),
        }
    }
}

/// Encode `data` with the given shape as a version 1.0 `.npy` file
pub fn encode<T: NpyElement>(shape: &[usize], data: &[T]) -> Vec<u8> {
    let shape_str = match shape {
        [single] => format!("({},)", single),
        dims => format!(
            "({})",
            dims.iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        T::DESCR,
        shape_str
    );

    // magic + version + u16 length + header + '\n' padded to the alignment
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(unpadded + padding + data.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for &value in data {
        value.extend_le(&mut out);
    }
    out
}

/// Decode a complete `.npy` file
pub fn decode(bytes: &[u8]) -> Result<NpyArray> {
    if bytes.len() < MAGIC.len() + 4 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(Error::InvalidMesh("not an npy array".to_string()));
    }

    let major = bytes[MAGIC.len()];
    let (header_len, header_start) = match major {
        1 => (
            u16::from_le_bytes([bytes[8], bytes[9]]) as usize,
            10,
        ),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(Error::InvalidMesh("truncated npy header".to_string()));
            }
            (
                u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
                12,
            )
        }
        other => {
            return Err(Error::InvalidMesh(format!(
                "unsupported npy version {}",
                other
            )))
        }
    };

    let header_end = header_start + header_len;
    let header = bytes
        .get(header_start..header_end)
        .and_then(|h| std::str::from_utf8(h).ok())
        .ok_or_else(|| Error::InvalidMesh("truncated npy header".to_string()))?;

    let descr = header_value(header, "descr")?
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string();
    if header_value(header, "fortran_order")?.starts_with("True") {
        return Err(Error::InvalidMesh(
            "fortran-ordered arrays are not supported".to_string(),
        ));
    }
    let shape = parse_shape(header_value(header, "shape")?)?;

    let count = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| Error::InvalidMesh(format!("npy shape {:?} is too large", shape)))?;
    let payload = &bytes[header_end..];
    let data = decode_payload(&descr, payload, count)?;

    Ok(NpyArray { shape, data })
}

/// Raw text of the value stored under `key` in the header dictionary
fn header_value<'h>(header: &'h str, key: &str) -> Result<&'h str> {
    let missing = || Error::InvalidMesh(format!("npy header has no '{}'", key));

    let quoted = format!("'{}'", key);
    let start = header.find(&quoted).ok_or_else(missing)? + quoted.len();
    let rest = header[start..].trim_start();
    let rest = rest.strip_prefix(':').ok_or_else(missing)?.trim_start();

    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else {
        rest.find(|c| c == ',' || c == '}')
    }
    .ok_or_else(missing)?;

    Ok(rest[..end].trim())
}

fn parse_shape(text: &str) -> Result<Vec<usize>> {
    text.trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| Error::InvalidMesh(format!("bad npy shape '{}'", text)))
        })
        .collect()
}

fn decode_payload(descr: &str, payload: &[u8], count: usize) -> Result<NpyData> {
    if descr.starts_with('>') {
        return Err(Error::InvalidMesh(format!(
            "big-endian arrays are not supported ({})",
            descr
        )));
    }

    let kind = descr.trim_start_matches(|c| c == '<' || c == '|' || c == '=');
    let width = match kind {
        "u1" => 1,
        "f4" | "i4" | "u4" => 4,
        "f8" | "i8" | "u8" => 8,
        other => {
            return Err(Error::InvalidMesh(format!(
                "unsupported npy dtype '{}'",
                other
            )))
        }
    };

    let needed = count.checked_mul(width).ok_or_else(|| {
        Error::InvalidMesh(format!("npy payload of {} elements is too large", count))
    })?;
    if payload.len() < needed {
        return Err(Error::InvalidMesh(format!(
            "npy payload has {} bytes, expected {}",
            payload.len(),
            needed
        )));
    }
    let chunks = payload[..needed].chunks_exact(width);

    // chunks_exact yields slices of exactly `width` bytes
    let data = match kind {
        "u1" => NpyData::U8(payload[..needed].to_vec()),
        "f4" => NpyData::F32(chunks.map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()),
        "i4" => NpyData::I32(chunks.map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()),
        "u4" => NpyData::U32(chunks.map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()),
        "f8" => NpyData::F64(chunks.map(|c| f64::from_le_bytes(eight(c))).collect()),
        "i8" => NpyData::I64(chunks.map(|c| i64::from_le_bytes(eight(c))).collect()),
        _ => NpyData::U64(chunks.map(|c| u64::from_le_bytes(eight(c))).collect()),
    };

    Ok(data)
}

fn eight(c: &[u8]) -> [u8; 8] {
    [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
}
