//! Multi-packet reassembly: classifies single- vs multi-packet responses, orders fragments,
//! optionally decompresses, and validates checksum/framing before handing the payload to a
//! decoder.

use std::collections::HashMap;
use std::io::Read;

use bzip2::read::BzDecoder;

use crate::appids::app_has_no_packet_size_field;
use crate::buffer::ByteBuffer;
use crate::error::A2SError;
use crate::request::{IS_NOT_SPLIT, IS_SPLIT};
use crate::wire::Engine;

/// Result of feeding one datagram to the assembler.
pub enum Progress {
    /// More fragments are still needed.
    InProgress,
    /// Assembly is complete; the response body (with the message header byte stripped) is
    /// ready for decoding.
    Done(Vec<u8>),
}

/// Accumulates the fragments of a single query response and reassembles them into a decoded
/// payload.
///
/// A new assembler is created per query and discarded once assembly completes or the query
/// times out.
pub struct ResponseAssembler {
    engine: Engine,
    app_id: Option<u32>,
    expected_header: u8,
    /// When set, a single packet whose header doesn't match `expected_header` is silently
    /// ignored rather than treated as an error, as long as no fragments have been accepted
    /// yet. This models the GoldSrc quirk where Half-Life may emit extra reply datagrams that
    /// must be ignored.
    tolerate_stray_single_packets: bool,

    split_mode: Option<i32>,
    answer_id: Option<i32>,
    total: u8,
    compressed: bool,
    /// Fragment index -> bytes remaining after the per-fragment header fields common to every
    /// fragment (answer_id, total, index/packed byte).
    fragments: HashMap<u8, Vec<u8>>,
}

impl ResponseAssembler {
    pub fn new(engine: Engine, app_id: Option<u32>, expected_header: u8) -> Self {
        ResponseAssembler {
            engine,
            app_id,
            expected_header,
            tolerate_stray_single_packets: false,
            split_mode: None,
            answer_id: None,
            total: 1,
            compressed: false,
            fragments: HashMap::new(),
        }
    }

    /// Builds an assembler that tolerates extra, non-matching single-packet datagrams arriving
    /// before the real response (the GoldSrc `A2S_INFO_GOLDSRC` quirk).
    pub fn tolerant(engine: Engine, app_id: Option<u32>, expected_header: u8) -> Self {
        let mut assembler = Self::new(engine, app_id, expected_header);
        assembler.tolerate_stray_single_packets = true;
        assembler
    }

    fn is_first_packet(&self) -> bool {
        self.split_mode.is_none()
    }

    /// Reads `(total, index)` from the fragment header, per engine flavor, consuming the
    /// fields from `buf`.
    fn read_total_and_index(&self, buf: &mut ByteBuffer) -> Result<(u8, u8), A2SError> {
        match self.engine {
            Engine::GoldSrc => {
                let packed = buf.read_byte()?;
                let index = packed >> 4;
                let total = packed & 0x0F;
                Ok((total, index))
            }
            Engine::Source => {
                let total = buf.read_byte()?;
                let index = buf.read_byte()?;
                Ok((total, index))
            }
        }
    }

    /// Feed one received UDP datagram. Returns `Progress::Done` once every fragment of the
    /// answer has arrived.
    pub fn feed(&mut self, packet: &[u8]) -> Result<Progress, A2SError> {
        let mut buf = ByteBuffer::from_bytes(packet.to_vec());
        let split_mode = buf.read_long()?;

        if split_mode != IS_NOT_SPLIT && split_mode != IS_SPLIT {
            return Err(A2SError::InvalidSplitModeHeader(split_mode));
        }

        if self.is_first_packet() {
            if split_mode == IS_NOT_SPLIT {
                let payload = buf.read_to_end();

                if self.tolerate_stray_single_packets && payload.first().copied() != Some(self.expected_header) {
                    log::debug!("ignoring stray single-packet datagram before the real response");
                    return Ok(Progress::InProgress);
                }

                self.split_mode = Some(split_mode);
                return Ok(Progress::Done(self.validate_header(payload)?));
            }

            self.split_mode = Some(split_mode);

            let answer_id = buf.read_long()?;
            self.answer_id = Some(answer_id);

            if self.engine == Engine::Source {
                self.compressed = (answer_id as u32) >> 31 == 1;
            }

            let (total, index) = self.read_total_and_index(&mut buf)?;

            if total < 2 {
                return Err(A2SError::PacketTotalTooLow(total));
            }
            if total > 15 {
                log::warn!("multi-packet response declared an unusually high packet total: {total}");
            }
            if index >= total {
                return Err(A2SError::PacketNumberIsOutOfBounds { index, total });
            }

            self.total = total;
            self.fragments.insert(index, buf.read_to_end());

            log::debug!("received fragment {index}/{total} for answer {answer_id:#x}");

            return Ok(Progress::InProgress);
        }

        let expected_split_mode = self.split_mode.expect("first packet already recorded");
        if split_mode != expected_split_mode {
            return Err(A2SError::UnexpectedSplitModeChange {
                expected: expected_split_mode,
                actual: split_mode,
            });
        }

        let answer_id = buf.read_long()?;
        let expected_answer_id = self.answer_id.expect("first packet already recorded");
        if answer_id != expected_answer_id {
            return Err(A2SError::UnexpectedAnswerIdChange {
                expected: expected_answer_id,
                actual: answer_id,
            });
        }

        let (total, index) = self.read_total_and_index(&mut buf)?;
        if total != self.total {
            return Err(A2SError::TotalPacketsChangedFromInitial {
                expected: self.total,
                actual: total,
            });
        }
        if index >= total {
            return Err(A2SError::PacketNumberIsOutOfBounds { index, total });
        }
        if self.fragments.contains_key(&index) {
            return Err(A2SError::PacketNumberRepeated(index));
        }

        self.fragments.insert(index, buf.read_to_end());
        log::debug!("received fragment {index}/{total} for answer {answer_id:#x}");

        if self.fragments.len() == self.total as usize {
            let payload = self.assemble_multi()?;
            Ok(Progress::Done(self.validate_header(payload)?))
        } else {
            Ok(Progress::InProgress)
        }
    }

    fn skip_packet_size_field(&self, buf: &mut ByteBuffer) -> Result<(), A2SError> {
        // GoldSrc fragments never carry a packet-size field; neither do Source fragments for
        // apps on the allow-list.
        if self.engine == Engine::Source && !self.app_id.map(app_has_no_packet_size_field).unwrap_or(false) {
            buf.read_short()?;
        }
        Ok(())
    }

    fn assemble_multi(&self) -> Result<Vec<u8>, A2SError> {
        let indices = indices_sorted(&self.fragments);

        if !self.compressed {
            let mut payload = Vec::new();
            for index in indices {
                let mut buf = ByteBuffer::from_bytes(self.fragments[&index].clone());
                self.skip_packet_size_field(&mut buf)?;
                payload.extend(buf.read_to_end());
            }
            return Ok(payload);
        }

        // Compressed (Source only): fragment 0 additionally carries assembled_size and
        // assembled_crc32 after its (possibly absent) packet-size field.
        let mut assembled_size = 0i32;
        let mut assembled_crc = 0u32;
        let mut compressed_stream = Vec::new();

        for index in indices {
            let mut buf = ByteBuffer::from_bytes(self.fragments[&index].clone());
            self.skip_packet_size_field(&mut buf)?;

            if index == 0 {
                assembled_size = buf.read_long()?;
                assembled_crc = buf.read_long()? as u32;
            }

            compressed_stream.extend(buf.read_to_end());
        }

        let mut decompressed = Vec::new();
        BzDecoder::new(&compressed_stream[..])
            .read_to_end(&mut decompressed)
            .map_err(|e| A2SError::DecompressionFailed(e.to_string()))?;

        if decompressed.len() as i32 != assembled_size {
            return Err(A2SError::DecompressionFailed(format!(
                "decompressed length {} did not match declared size {}",
                decompressed.len(),
                assembled_size
            )));
        }

        let actual_crc = crc32fast::hash(&decompressed);
        if actual_crc != assembled_crc {
            return Err(A2SError::ChecksumMismatch);
        }

        Ok(decompressed)
    }

    fn validate_header(&self, payload: Vec<u8>) -> Result<Vec<u8>, A2SError> {
        let actual = payload.first().copied().unwrap_or(0);
        if actual != self.expected_header {
            return Err(A2SError::IncorrectResponseMessageHeader {
                expected: self.expected_header,
                actual,
            });
        }
        Ok(payload[1..].to_vec())
    }
}

fn indices_sorted(fragments: &HashMap<u8, Vec<u8>>) -> Vec<u8> {
    let mut indices: Vec<u8> = fragments.keys().copied().collect();
    indices.sort_unstable();
    indices
}
