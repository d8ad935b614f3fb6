//! Base58check encoding with the ledger's address alphabet

use sha2::{Digest, Sha256};

/// Address alphabet; `r` encodes a zero digit
pub const ALPHABET: &[u8; 58] = b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

const CHECKSUM_LENGTH: usize = 4;

fn digit_value(c: u8) -> Option<u32> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u32)
}

/// Encode raw bytes as base58
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits
    let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 138 / 100 + 1);
    for &byte in &input[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat(ALPHABET[0] as char).take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode base58 text; `None` on a character outside the alphabet
pub fn decode(input: &str) -> Option<Vec<u8>> {
    let zeros = input.bytes().take_while(|&c| c == ALPHABET[0]).count();

    // Little-endian base-256 bytes
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len());
    for c in input.bytes() {
        let mut carry = digit_value(c)?;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Some(out)
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}

/// Encode `version ‖ payload ‖ checksum`
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LENGTH);
    data.push(version);
    data.extend_from_slice(payload);
    let sum = checksum(&data);
    data.extend_from_slice(&sum);
    encode(&data)
}

/// Decode base58check text, verifying the version byte and checksum
///
/// Returns the payload without version or checksum.
pub fn decode_check(version: u8, input: &str) -> Result<Vec<u8>, String> {
    let data = decode(input).ok_or_else(|| format!("'{}' is not valid base58", input))?;
    if data.len() <= CHECKSUM_LENGTH {
        return Err(format!("'{}' is too short for base58check", input));
    }
    let (body, sum) = data.split_at(data.len() - CHECKSUM_LENGTH);
    if checksum(body)[..] != *sum {
        return Err(format!("checksum mismatch in '{}'", input));
    }
    if body[0] != version {
        return Err(format!(
            "unexpected version byte {:#04x} in '{}'",
            body[0], input
        ));
    }
    Ok(body[1..].to_vec())
}
