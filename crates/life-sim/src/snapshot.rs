//! Whole-grid snapshots and their on-disk form.
//!
//! File layout:
//! - magic `b"LIFE"`
//! - `u32` LE header length, then a YAML [`SaveHeader`]
//! - `u64` LE payload length, then the payload in the declared encoding

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LifeError;
use crate::grid::GridSize;
use crate::pack;

const MAGIC: &[u8; 4] = b"LIFE";
const FORMAT_VERSION: u32 = 1;
/// Headers are a handful of YAML lines; anything longer is not a save file.
const MAX_HEADER_LEN: u32 = 4096;

/// Saved copy of one grid. Cells are one byte each, `0`/`1`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    size: GridSize,
    cells: Vec<u8>,
    generation: u64,
}

impl Snapshot {
    /// Builds a snapshot; the cell count must match `size`.
    pub fn new(size: GridSize, cells: Vec<u8>, generation: u64) -> Result<Self, LifeError> {
        size.expect_len(cells.len())?;
        let cells = cells.into_iter().map(|c| (c != 0) as u8).collect();
        Ok(Self { size, cells, generation })
    }

    /// For cells already known to be `0`/`1` and of the right length.
    pub(crate) fn from_parts(size: GridSize, cells: Vec<u8>, generation: u64) -> Self {
        debug_assert_eq!(cells.len(), size.cell_count());
        Self { size, cells, generation }
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Generation counter at capture time.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Writes the snapshot to `writer` using `encoding`.
    pub fn write_to<W: Write>(&self, writer: &mut W, encoding: CellEncoding) -> Result<(), SnapshotFileError> {
        let header = SaveHeader {
            version: FORMAT_VERSION,
            width: self.size.width,
            height: self.size.height,
            encoding,
            generation: self.generation,
        };
        let payload = match encoding {
            CellEncoding::Bytes => self.cells.clone(),
            CellEncoding::Packed => pack::compact_bytes(&self.cells),
        };

        writer.write_all(MAGIC)?;

        let header_yaml = serde_yaml::to_string(&header)?;
        writer.write_all(&(header_yaml.len() as u32).to_le_bytes())?;
        writer.write_all(header_yaml.as_bytes())?;

        writer.write_all(&(payload.len() as u64).to_le_bytes())?;
        writer.write_all(&payload)?;
        Ok(())
    }

    /// Reads a snapshot previously produced by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, SnapshotFileError> {
        let header = read_header(reader)?;
        read_payload(reader, header)
    }

    /// Like [`read_from`](Self::read_from), but rejects a file captured at any
    /// size other than `size` before its payload is read.
    pub fn read_sized<R: Read>(reader: &mut R, size: GridSize) -> Result<Self, SnapshotFileError> {
        let header = read_header(reader)?;
        let theirs = GridSize::new(header.width, header.height);
        if theirs != size {
            return Err(LifeError::SizeMismatch {
                expected: size.cell_count(),
                actual: theirs.cell_count(),
            }
            .into());
        }
        read_payload(reader, header)
    }

    /// Saves to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>, encoding: CellEncoding) -> Result<(), SnapshotFileError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, encoding)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotFileError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }

    /// Loads `path`, requiring it to hold a grid of `size`.
    pub fn load_sized(path: impl AsRef<Path>, size: GridSize) -> Result<Self, SnapshotFileError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_sized(&mut reader, size)
    }
}

// Length fields come from the file; reads go through `take` so a lying
// length runs into EOF instead of sizing an allocation.

fn read_header<R: Read>(reader: &mut R) -> Result<SaveHeader, SnapshotFileError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(SnapshotFileError::BadMagic);
    }

    let mut len4 = [0u8; 4];
    reader.read_exact(&mut len4)?;
    let header_len = u32::from_le_bytes(len4);
    if header_len > MAX_HEADER_LEN {
        return Err(SnapshotFileError::HeaderTooLong(header_len));
    }

    let mut header_yaml = Vec::new();
    reader.by_ref().take(header_len as u64).read_to_end(&mut header_yaml)?;
    if header_yaml.len() < header_len as usize {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }

    let header: SaveHeader = serde_yaml::from_slice(&header_yaml)?;
    if header.version != FORMAT_VERSION {
        return Err(SnapshotFileError::UnsupportedVersion(header.version));
    }
    Ok(header)
}

fn read_payload<R: Read>(reader: &mut R, header: SaveHeader) -> Result<Snapshot, SnapshotFileError> {
    let size = GridSize::new(header.width, header.height);
    let cell_count = size.cell_count();
    let expected = match header.encoding {
        CellEncoding::Bytes => cell_count,
        CellEncoding::Packed => pack::packed_len(cell_count),
    };

    let mut len8 = [0u8; 8];
    reader.read_exact(&mut len8)?;
    let declared = u64::from_le_bytes(len8);
    if declared != expected as u64 {
        return Err(SnapshotFileError::Truncated {
            expected,
            actual: usize::try_from(declared).unwrap_or(usize::MAX),
        });
    }

    let mut payload = Vec::new();
    reader.by_ref().take(declared).read_to_end(&mut payload)?;
    if payload.len() != expected {
        return Err(SnapshotFileError::Truncated {
            expected,
            actual: payload.len(),
        });
    }

    let cells = match header.encoding {
        CellEncoding::Bytes => payload,
        CellEncoding::Packed => pack::expand_bytes(&payload, cell_count),
    };
    Ok(Snapshot::new(size, cells, header.generation)?)
}

/// How cells are stored in a save file.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellEncoding {
    /// One byte per cell.
    Bytes,
    /// Eight cells per byte, see [`pack::compact`].
    #[default]
    Packed,
}

/// YAML header of a save file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveHeader {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub encoding: CellEncoding,
    #[serde(default)]
    pub generation: u64,
}

#[derive(Debug, Error)]
pub enum SnapshotFileError {
    #[error("snapshot i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot header: {0}")]
    Header(#[from] serde_yaml::Error),

    #[error("not a snapshot file (bad magic)")]
    BadMagic,

    #[error("snapshot header is {0} bytes long")]
    HeaderTooLong(u32),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot payload is {actual} bytes, header implies {expected}")]
    Truncated { expected: usize, actual: usize },

    #[error(transparent)]
    Life(#[from] LifeError),
}

/// Single-slot snapshot holder used for whole-grid undo.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    saved: Option<Snapshot>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `snapshot`, replacing any previous one.
    pub fn save(&mut self, snapshot: Snapshot) {
        self.saved = Some(snapshot);
    }

    pub fn get(&self) -> Option<&Snapshot> {
        self.saved.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Snapshot {
        let size = GridSize::new(5, 3);
        let cells = (0..15).map(|i| (i % 3 == 0) as u8).collect();
        Snapshot::new(size, cells, 12).unwrap()
    }

    fn round_trip(encoding: CellEncoding) -> Snapshot {
        let mut buf = Vec::new();
        sample().write_to(&mut buf, encoding).unwrap();
        Snapshot::read_from(&mut Cursor::new(buf)).unwrap()
    }

    #[test]
    fn bytes_encoding_round_trips() {
        assert_eq!(round_trip(CellEncoding::Bytes), sample());
    }

    #[test]
    fn packed_encoding_round_trips_partial_byte() {
        // 15 cells: the second packed byte carries 7 cells + 1 pad bit.
        assert_eq!(round_trip(CellEncoding::Packed), sample());
    }

    #[test]
    fn header_declares_dimensions_and_encoding() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf, CellEncoding::Packed).unwrap();
        let len = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
        let header: SaveHeader = serde_yaml::from_slice(&buf[8..8 + len]).unwrap();
        assert_eq!(header.width, 5);
        assert_eq!(header.height, 3);
        assert_eq!(header.encoding, CellEncoding::Packed);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let err = Snapshot::read_from(&mut Cursor::new(b"NOPE....".to_vec())).unwrap_err();
        assert!(matches!(err, SnapshotFileError::BadMagic));
    }

    #[test]
    fn short_payload_is_rejected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf, CellEncoding::Bytes).unwrap();
        let n = buf.len();
        // Rewrite the payload length to claim one byte less.
        buf[n - 15 - 8..n - 15].copy_from_slice(&14u64.to_le_bytes());
        buf.pop();
        let err = Snapshot::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SnapshotFileError::Truncated { expected: 15, actual: 14 }));
    }

    /// Magic, a hand-written header and a declared payload length, followed by
    /// `tail` payload bytes.
    fn raw_file(width: u32, height: u32, declared: u64, tail: usize) -> Vec<u8> {
        let header = format!("version: 1\nwidth: {width}\nheight: {height}\nencoding: packed\n");
        let mut buf = MAGIC.to_vec();
        buf.extend_from_slice(&(header.len() as u32).to_le_bytes());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&declared.to_le_bytes());
        buf.extend(std::iter::repeat_n(0xAA, tail));
        buf
    }

    #[test]
    fn huge_declared_grid_fails_at_eof() {
        let cells = GridSize::new(u32::MAX, u32::MAX).cell_count();
        let declared = pack::packed_len(cells) as u64;
        let buf = raw_file(u32::MAX, u32::MAX, declared, 16);

        let err = Snapshot::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SnapshotFileError::Truncated { actual: 16, .. }));
    }

    #[test]
    fn sized_read_rejects_other_dimensions_before_payload() {
        let buf = raw_file(u32::MAX, u32::MAX, u64::MAX, 0);
        let err = Snapshot::read_sized(&mut Cursor::new(buf), GridSize::new(5, 3)).unwrap_err();
        assert!(matches!(err, SnapshotFileError::Life(LifeError::SizeMismatch { expected: 15, .. })));

        let mut ok = Vec::new();
        sample().write_to(&mut ok, CellEncoding::Packed).unwrap();
        assert_eq!(Snapshot::read_sized(&mut Cursor::new(ok), GridSize::new(5, 3)).unwrap(), sample());
    }

    #[test]
    fn oversized_header_length_is_rejected() {
        let mut buf = MAGIC.to_vec();
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = Snapshot::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SnapshotFileError::HeaderTooLong(u32::MAX)));
    }

    #[test]
    fn header_shorter_than_declared_is_eof() {
        let mut buf = MAGIC.to_vec();
        buf.extend_from_slice(&200u32.to_le_bytes());
        buf.extend_from_slice(b"version: 1\n");
        let err = Snapshot::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SnapshotFileError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join(format!("life-sim-snapshot-{}.life", std::process::id()));
        sample().save(&path, CellEncoding::Packed).unwrap();
        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded, sample());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn slot_starts_empty() {
        let mut slot = SnapshotSlot::new();
        assert!(slot.is_empty());
        slot.save(sample());
        assert_eq!(slot.get(), Some(&sample()));
    }
}
