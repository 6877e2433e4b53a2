//! # Address32 Codec
//!
//! Checksummed base32 rendering of a (type tag, 20-byte payload) pair.
//!
//! ## Layout
//!
//! ```text
//! tag (8 bits)      -> 2 groups of 5 bits (2 zero padding bits)
//! payload (160 bits) -> 32 groups
//! checksum          -> 6 groups (BIP-173 polymod, no human-readable part)
//! ----------------------------------------------------------------
//! 40 groups -> 40 characters of "qpzry9x8gf2tvdw0s3jn54khce6mua7l"
//! ```

use crate::domain::errors::AddressError;

/// Encoded address length in characters.
pub const ENCODED_SIZE: usize = 40;

/// Number of 5-bit groups before the checksum.
pub const DECODED_SIZE: usize = 34;

/// Payload length in bytes.
pub const PAYLOAD_SIZE: usize = 20;

/// Number of checksum groups.
pub const CHECKSUM_SIZE: usize = 6;

const TAG_GROUPS: usize = 2;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const GENERATORS: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Encode a type tag and payload into the 40-character form.
pub fn encode(tag: u8, payload: &[u8]) -> Result<String, AddressError> {
    let groups = data_groups(tag, payload);
    if groups.len() != DECODED_SIZE {
        return Err(AddressError::InvalidDataLength(groups.len()));
    }
    Ok(with_checksum(groups))
}

/// Encode a full-size payload, which always yields 34 data groups.
pub fn encode_payload(tag: u8, payload: &[u8; PAYLOAD_SIZE]) -> String {
    with_checksum(data_groups(tag, payload))
}

/// Decode the 40-character form into its type tag and payload.
///
/// Uppercase input is accepted; mixed case is not.
pub fn decode(encoded: &str) -> Result<(u8, Vec<u8>), AddressError> {
    let groups = decode_groups(encoded)?;

    // Tag padding bits must be zero, so the tag regroups unpadded
    let tag = convert_bits(&groups[..TAG_GROUPS], 5, 8, false)?;
    let payload = convert_bits(&groups[TAG_GROUPS..], 5, 8, false)?;

    match tag.as_slice() {
        [tag] => Ok((*tag, payload)),
        _ => Err(AddressError::InvalidPadding),
    }
}

/// Validate the text form and return the 34 groups without checksum.
fn decode_groups(encoded: &str) -> Result<Vec<u8>, AddressError> {
    let bytes = encoded.as_bytes();
    if bytes.len() != ENCODED_SIZE {
        return Err(AddressError::InvalidLength(bytes.len()));
    }

    if let Some(&b) = bytes.iter().find(|&&b| !(33..=126).contains(&b)) {
        return Err(AddressError::InvalidCharacter(b));
    }

    let has_lower = bytes.iter().any(u8::is_ascii_lowercase);
    let has_upper = bytes.iter().any(u8::is_ascii_uppercase);
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }

    let groups = bytes
        .iter()
        .map(|b| {
            let lower = b.to_ascii_lowercase();
            CHARSET
                .iter()
                .position(|&c| c == lower)
                .map(|index| index as u8)
                .ok_or(AddressError::NotInAlphabet(lower as char))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if polymod(&groups) != 1 {
        let (data, actual) = groups.split_at(groups.len() - CHECKSUM_SIZE);
        return Err(AddressError::ChecksumMismatch {
            expected: to_chars(&create_checksum(data)),
            actual: to_chars(actual),
        });
    }

    let data = &groups[..groups.len() - CHECKSUM_SIZE];
    if data.len() != DECODED_SIZE {
        return Err(AddressError::InvalidDataLength(data.len()));
    }
    Ok(data.to_vec())
}

/// Regroup `from`-bit values into `to`-bit values, most significant bit first.
///
/// With `pad`, a trailing incomplete group is zero-filled. Without it, up to
/// four leftover bits are tolerated as long as they are all zero.
pub fn convert_bits(data: &[u8], from: u8, to: u8, pad: bool) -> Result<Vec<u8>, AddressError> {
    if !(1..=8).contains(&from) || !(1..=8).contains(&to) {
        return Err(AddressError::InvalidGroupSize { from, to });
    }

    let (mut regrouped, filled, rest) = regroup(data, from, to);
    if filled > 0 {
        if pad {
            regrouped.push(((rest << (to - filled)) & low_bits(to)) as u8);
        } else if filled > 4 || rest != 0 {
            return Err(AddressError::InvalidPadding);
        }
    }
    Ok(regrouped)
}

/// Returns the complete groups, the count of leftover bits and their value.
fn regroup(data: &[u8], from: u8, to: u8) -> (Vec<u8>, u8, u32) {
    let mut regrouped = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    let mut accumulator: u32 = 0;
    let mut filled: u8 = 0;

    for &value in data {
        // Bits above `from` are discarded
        accumulator = (accumulator << from) | (u32::from(value) & low_bits(from));
        filled += from;
        while filled >= to {
            filled -= to;
            regrouped.push(((accumulator >> filled) & low_bits(to)) as u8);
        }
        accumulator &= low_bits(filled);
    }
    (regrouped, filled, accumulator)
}

fn low_bits(count: u8) -> u32 {
    (1u32 << count) - 1
}

/// Tag and payload regrouped 8 -> 5 with zero padding.
fn data_groups(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut groups = padded_groups(&[tag]);
    groups.extend(padded_groups(payload));
    groups
}

fn padded_groups(data: &[u8]) -> Vec<u8> {
    let (mut groups, filled, rest) = regroup(data, 8, 5);
    if filled > 0 {
        groups.push(((rest << (5 - filled)) & low_bits(5)) as u8);
    }
    groups
}

fn with_checksum(mut groups: Vec<u8>) -> String {
    let checksum = create_checksum(&groups);
    groups.extend_from_slice(&checksum);
    to_chars(&groups)
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

fn create_checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut values = Vec::with_capacity(data.len() + CHECKSUM_SIZE);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; CHECKSUM_SIZE]);
    let modulus = polymod(&values) ^ 1;

    let mut checksum = [0u8; CHECKSUM_SIZE];
    for (i, group) in checksum.iter_mut().enumerate() {
        *group = ((modulus >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

fn to_chars(groups: &[u8]) -> String {
    groups
        .iter()
        .map(|&g| CHARSET[usize::from(g & 31)] as char)
        .collect()
}
