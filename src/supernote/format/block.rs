//! Length-prefixed block access by absolute address.
//!
//! Every block in the container is stored as:
//! ```text
//! [4 bytes] Length (little-endian u32)
//! [N bytes] Content
//! ```
//! Blocks are linked together by absolute 4-byte little-endian offsets. The
//! last four bytes of the file hold the address of the footer block.

use std::io::{Read, Seek, SeekFrom};
use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;

use crate::supernote::types::error::{NoteError, Result};
use crate::supernote::types::models::{ADDRESS_SIZE, LENGTH_FIELD_SIZE};

/// Reads the block stored at `address`.
///
/// Returns `Ok(None)` without touching the stream when `address <= 0`.
/// Each call seeks from scratch; nothing is cached.
///
/// # Errors
/// `TruncatedRead` if the length field or the declared content reaches past
/// the end of the stream.
pub fn read_block<R: Read + Seek>(file: &mut R, address: i64) -> Result<Option<Vec<u8>>> {
    if address <= 0 {
        return Ok(None);
    }
    let address = address as u64;
    let file_len = file.seek(SeekFrom::End(0))?;

    let header_end = address + LENGTH_FIELD_SIZE;
    if header_end > file_len {
        return Err(NoteError::TruncatedRead {
            address,
            expected: LENGTH_FIELD_SIZE,
            available: file_len.saturating_sub(address),
        });
    }

    file.seek(SeekFrom::Start(address))?;
    let block_len = u64::from(file.read_u32::<LittleEndian>()?);
    trace!("Block at {:#x}: {} bytes", address, block_len);

    let available = file_len - header_end;
    if block_len > available {
        return Err(NoteError::TruncatedRead {
            address,
            expected: block_len,
            available,
        });
    }

    let mut content = vec![0u8; block_len as usize];
    file.read_exact(&mut content)?;
    Ok(Some(content))
}

/// Reads the footer address from the last four bytes of the stream.
pub fn read_footer_address<R: Read + Seek>(file: &mut R) -> Result<i64> {
    let file_len = file.seek(SeekFrom::End(0))?;
    if file_len < ADDRESS_SIZE {
        return Err(NoteError::TruncatedRead {
            address: 0,
            expected: ADDRESS_SIZE,
            available: file_len,
        });
    }
    file.seek(SeekFrom::Start(file_len - ADDRESS_SIZE))?;
    let address = file.read_u32::<LittleEndian>()?;
    trace!("Footer address: {:#x}", address);
    Ok(i64::from(address))
}
