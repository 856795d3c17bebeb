//! Boxed creature records: checksum, block shuffle and stream cipher.

pub const STORED_SIZE: usize = 136;
pub const PARTY_SIZE: usize = 236;

const HEADER_LEN: usize = 8;
const SUB_BLOCK_LEN: usize = 32;
const CHECKSUM_OFFSET: usize = 6;

pub type StoredRecord = [u8; STORED_SIZE];

const BLOCK_POSITION: [u8; 96] = [
    0, 1, 2, 3, 0, 1, 3, 2, 0, 2, 1, 3, 0, 3, 1, 2, 0, 2, 3, 1, 0, 3, 2, 1, //
    1, 0, 2, 3, 1, 0, 3, 2, 2, 0, 1, 3, 3, 0, 1, 2, 2, 0, 3, 1, 3, 0, 2, 1, //
    1, 2, 0, 3, 1, 3, 0, 2, 2, 1, 0, 3, 3, 1, 0, 2, 2, 3, 0, 1, 3, 2, 0, 1, //
    1, 2, 3, 0, 1, 3, 2, 0, 2, 1, 3, 0, 3, 1, 2, 0, 2, 3, 1, 0, 3, 2, 1, 0, //
];

const BLOCK_POSITION_INVERT: [u8; 24] = [
    0, 1, 2, 4, 3, 5, 6, 7, 12, 18, 13, 19, 8, 10, 14, 20, 16, 22, 9, 11, 15, 21, 17, 23,
];

fn pid(record: &StoredRecord) -> u32 {
    u32::from_le_bytes([record[0], record[1], record[2], record[3]])
}

fn stored_checksum(record: &StoredRecord) -> u16 {
    u16::from_le_bytes([record[CHECKSUM_OFFSET], record[CHECKSUM_OFFSET + 1]])
}

fn shuffle_value(pid: u32) -> usize {
    (((pid & 0x3E000) >> 13) % 24) as usize
}

/// Wrapping sum of the u16 words after the header.
pub fn checksum(record: &StoredRecord) -> u16 {
    record[HEADER_LEN..]
        .chunks_exact(2)
        .fold(0u16, |sum, word| {
            sum.wrapping_add(u16::from_le_bytes([word[0], word[1]]))
        })
}

fn shuffle(record: &StoredRecord, sv: usize) -> StoredRecord {
    let mut out = *record;
    for block in 0..4 {
        let source = usize::from(BLOCK_POSITION[4 * sv + block]);
        let from = HEADER_LEN + SUB_BLOCK_LEN * source;
        let to = HEADER_LEN + SUB_BLOCK_LEN * block;
        out[to..to + SUB_BLOCK_LEN].copy_from_slice(&record[from..from + SUB_BLOCK_LEN]);
    }
    out
}

fn crypt(record: &mut StoredRecord, seed: u32) {
    let mut state = seed;
    for word in record[HEADER_LEN..].chunks_exact_mut(2) {
        state = state.wrapping_mul(0x41C6_4E6D).wrapping_add(0x6073);
        let key = (state >> 16) as u16;
        let value = u16::from_le_bytes([word[0], word[1]]) ^ key;
        word.copy_from_slice(&value.to_le_bytes());
    }
}

pub fn encrypt(record: &StoredRecord) -> StoredRecord {
    let sv = usize::from(BLOCK_POSITION_INVERT[shuffle_value(pid(record))]);
    let mut out = shuffle(record, sv);
    crypt(&mut out, u32::from(stored_checksum(record)));
    out
}

pub fn decrypt(record: &StoredRecord) -> StoredRecord {
    let mut out = *record;
    crypt(&mut out, u32::from(stored_checksum(record)));
    shuffle(&out, shuffle_value(pid(record)))
}

/// Encrypted form of an all-zero record; fills empty box slots.
pub fn placeholder() -> StoredRecord {
    encrypt(&[0u8; STORED_SIZE])
}

#[cfg(test)]
mod tests {
    use super::{STORED_SIZE, StoredRecord, checksum, decrypt, encrypt, placeholder};

    fn sample(pid: u32) -> StoredRecord {
        let mut record = [0u8; STORED_SIZE];
        record[..4].copy_from_slice(&pid.to_le_bytes());
        for (i, byte) in record[8..].iter_mut().enumerate() {
            *byte = (i * 7 + 3) as u8;
        }
        let sum = checksum(&record);
        record[6..8].copy_from_slice(&sum.to_le_bytes());
        record
    }

    #[test]
    fn decrypt_inverts_encrypt_for_every_shuffle() {
        for sv in 0..24u32 {
            let record = sample(sv << 13 | 0x1234);
            let sealed = encrypt(&record);
            assert_ne!(sealed[8..], record[8..], "sv {sv}");
            assert_eq!(sealed[..8], record[..8]);
            assert_eq!(decrypt(&sealed), record, "sv {sv}");
        }
    }

    #[test]
    fn placeholder_decrypts_to_empty_record() {
        let blank = placeholder();
        assert!(blank[8..].iter().any(|&b| b != 0));
        assert_eq!(decrypt(&blank), [0u8; STORED_SIZE]);
    }

    #[test]
    fn checksum_wraps() {
        let mut record = [0u8; STORED_SIZE];
        record[8..].fill(0xFF);
        assert_eq!(checksum(&record), 0xFFFFu16.wrapping_mul(64));
    }
}
