//! Binary framing for the hidden state payload
//!
//! Payload = Request id section + Entry section, length-prefixed
//! throughout, little-endian:
//!
//! ```text
//! [u16 id_count]    per id:    [u16 len][bytes]
//! [u32 entry_count] per entry: [u16 name_len][name]
//!                              [u16 value_count] per value: [u32 len][bytes]
//! ```
//!
//! Identical input always frames to identical bytes; entry order is the
//! set's insertion order.

use bytes::{Buf, BufMut, BytesMut};

use formrelay_core::{FormError, FormResult, RequestId};

use crate::HiddenParameterSet;

/// Frame request ids and entries into the payload bytes
pub fn encode_payload(request_ids: &[RequestId], set: &HiddenParameterSet) -> Vec<u8> {
    let mut buf = BytesMut::new();

    buf.put_u16_le(request_ids.len() as u16);
    for id in request_ids {
        put_str16(&mut buf, id.as_str());
    }

    buf.put_u32_le(set.len() as u32);
    for (name, values) in set.iter() {
        put_str16(&mut buf, name);
        buf.put_u16_le(values.len() as u16);
        for value in values {
            buf.put_u32_le(value.len() as u32);
            buf.put_slice(value.as_bytes());
        }
    }

    buf.to_vec()
}

/// Parse payload bytes back into request ids and entries
pub fn decode_payload(data: &[u8]) -> FormResult<(Vec<RequestId>, HiddenParameterSet)> {
    let mut buf = data;

    let id_count = read_u16(&mut buf)? as usize;
    let mut ids = Vec::with_capacity(id_count);
    for _ in 0..id_count {
        ids.push(RequestId::new(read_str16(&mut buf)?));
    }

    let entry_count = read_u32(&mut buf)? as usize;
    let mut set = HiddenParameterSet::new();
    for _ in 0..entry_count {
        let name = read_str16(&mut buf)?;
        let value_count = read_u16(&mut buf)? as usize;
        for _ in 0..value_count {
            let len = read_u32(&mut buf)? as usize;
            let bytes = read_slice(&mut buf, len)?;
            let value = std::str::from_utf8(bytes)
                .map_err(|_| FormError::MalformedHiddenState("value is not UTF-8".into()))?;
            set.append(&name, value);
        }
    }

    if !buf.is_empty() {
        return Err(FormError::MalformedHiddenState(
            "trailing bytes after last entry".into(),
        ));
    }

    Ok((ids, set))
}

fn put_str16(buf: &mut BytesMut, s: &str) {
    buf.put_u16_le(s.len() as u16);
    buf.put_slice(s.as_bytes());
}

fn read_slice<'a>(buf: &mut &'a [u8], len: usize) -> FormResult<&'a [u8]> {
    if buf.remaining() < len {
        return Err(FormError::BufferTooShort {
            expected: len,
            actual: buf.remaining(),
        });
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

fn read_u16(buf: &mut &[u8]) -> FormResult<u16> {
    if buf.remaining() < 2 {
        return Err(FormError::BufferTooShort {
            expected: 2,
            actual: buf.remaining(),
        });
    }
    Ok(buf.get_u16_le())
}

fn read_u32(buf: &mut &[u8]) -> FormResult<u32> {
    if buf.remaining() < 4 {
        return Err(FormError::BufferTooShort {
            expected: 4,
            actual: buf.remaining(),
        });
    }
    Ok(buf.get_u32_le())
}

fn read_str16(buf: &mut &[u8]) -> FormResult<String> {
    let len = read_u16(buf)? as usize;
    let bytes = read_slice(buf, len)?;
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| FormError::MalformedHiddenState("name is not UTF-8".into()))
}
