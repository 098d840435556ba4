// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Binary cache of [LandmarkTables].
//!
//! All integers are big-endian, and the layout is:
//!
//! | Field           | Type                 |
//! |-----------------|----------------------|
//! | landmark count  | `u8` (L)             |
//! | landmarks       | L × `u32`            |
//! | table width     | `u32` (W)            |
//! | from landmarks  | L × W × `u32`        |
//! | to landmarks    | L × W × `u32`        |
//!
//! Tables are stored row-major, one row per landmark. There is no header or checksum,
//! so the table width is checked against the graph before the cache is used.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use super::{LandmarkTables, MAX_LANDMARKS};
use crate::{Graph, NodeId, Weight};

/// Number of table entries decoded at once. Rows are read in chunks, so that a corrupted
/// width doesn't result in a huge allocation before the data runs out.
const CHUNK_LEN: usize = 16 * 1024;

/// Error which can occur when reading or writing the landmark cache.
///
/// A missing cache file is not an error - see [LandmarkTables::read_file].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Underlying I/O failure, including [io::ErrorKind::UnexpectedEof] for truncated files.
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("too many landmarks to store: {0} > {MAX_LANDMARKS}")]
    TooManyLandmarks(usize),

    #[error("table width {0} doesn't fit in the cache")]
    WidthTooLarge(usize),

    #[error("landmark {landmark} is outside of the table width {width}")]
    InvalidLandmark { landmark: NodeId, width: usize },

    #[error("unexpected data after the landmark tables")]
    TrailingData,

    #[error("cached tables cover {cache} nodes, but the graph has {graph}")]
    WidthMismatch { cache: usize, graph: usize },
}

impl LandmarkTables {
    /// Serializes the tables into the provided writer.
    ///
    /// The writer should be buffered, as every integer is written separately.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), CacheError> {
        let count = u8::try_from(self.landmarks.len())
            .map_err(|_| CacheError::TooManyLandmarks(self.landmarks.len()))?;
        let width =
            u32::try_from(self.width).map_err(|_| CacheError::WidthTooLarge(self.width))?;

        writer.write_all(&[count])?;
        for &landmark in &self.landmarks {
            writer.write_all(&landmark.to_be_bytes())?;
        }
        writer.write_all(&width.to_be_bytes())?;

        for &distance in self.from_landmark.iter().chain(&self.to_landmark) {
            writer.write_all(&distance.to_be_bytes())?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Serializes the tables into a file at the provided path, overwriting it.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CacheError> {
        let f = File::create(path.as_ref())?;
        self.write_to(BufWriter::new(f))?;
        info!(
            "saved {} landmarks to {}",
            self.landmarks.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Deserializes tables from the provided reader.
    ///
    /// The whole stream must be consumed by the tables; truncated or over-long
    /// inputs are rejected.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, CacheError> {
        let mut count = [0u8; 1];
        reader.read_exact(&mut count)?;
        let count = count[0] as usize;

        let landmarks = read_u32s(&mut reader, count)?;
        let width = read_u32s(&mut reader, 1)?[0] as usize;

        if let Some(&landmark) = landmarks.iter().find(|&&l| l as usize >= width) {
            return Err(CacheError::InvalidLandmark { landmark, width });
        }

        let from_landmark = read_u32s(&mut reader, count * width)?;
        let to_landmark = read_u32s(&mut reader, count * width)?;

        if reader.read(&mut [0u8; 1])? != 0 {
            return Err(CacheError::TrailingData);
        }

        Ok(Self::from_parts(landmarks, width, from_landmark, to_landmark))
    }

    /// Deserializes tables from a file at the provided path.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, and an error if it exists,
    /// but can't be read.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>, CacheError> {
        let f = match File::open(path.as_ref()) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let tables = Self::read_from(BufReader::new(f))?;
        info!(
            "loaded {} landmarks from {}",
            tables.landmarks.len(),
            path.as_ref().display()
        );
        Ok(Some(tables))
    }

    /// Ensures that the tables were computed for a graph with as many nodes as `g`.
    pub fn check_width(&self, g: &Graph) -> Result<(), CacheError> {
        if self.width == g.len() {
            Ok(())
        } else {
            Err(CacheError::WidthMismatch {
                cache: self.width,
                graph: g.len(),
            })
        }
    }
}

/// Reads exactly `len` big-endian integers.
fn read_u32s<R: Read>(reader: &mut R, len: usize) -> Result<Vec<Weight>, CacheError> {
    let mut values = Vec::with_capacity(len.min(CHUNK_LEN));
    let mut buf = vec![0u8; len.min(CHUNK_LEN) * 4];

    while values.len() < len {
        let chunk_len = (len - values.len()).min(CHUNK_LEN);
        let chunk = &mut buf[..chunk_len * 4];
        reader.read_exact(chunk)?;
        values.extend(
            chunk
                .chunks_exact(4)
                .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]])),
        );
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{grid_graph, line_graph};
    use crate::INFINITY;

    fn encode(tables: &LandmarkTables) -> Vec<u8> {
        let mut data = Vec::new();
        tables.write_to(&mut data).unwrap();
        data
    }

    #[test]
    fn layout() {
        let tables = LandmarkTables::build(&line_graph(), &[3]).unwrap();
        let data = encode(&tables);

        #[rustfmt::skip]
        let expected: Vec<u8> = [
            &[1u8][..],
            &[0, 0, 0, 3],
            &[0, 0, 0, 4],
            // from landmark 3
            &INFINITY.to_be_bytes(), &INFINITY.to_be_bytes(), &INFINITY.to_be_bytes(), &[0, 0, 0, 0],
            // to landmark 3
            &[0, 0, 0, 15], &[0, 0, 0, 10], &[0, 0, 0, 5], &[0, 0, 0, 0],
        ]
        .concat();

        assert_eq!(data, expected);
    }

    #[test]
    fn round_trip() {
        let g = grid_graph(10, 7);
        let tables = LandmarkTables::build(&g, &[0, 9, 60, 69, 33]).unwrap();

        let decoded = LandmarkTables::read_from(encode(&tables).as_slice()).unwrap();
        assert_eq!(decoded, tables);
        assert!(decoded.check_width(&g).is_ok());
    }

    #[test]
    fn truncated() {
        let tables = LandmarkTables::build(&grid_graph(4, 4), &[0, 15]).unwrap();
        let data = encode(&tables);

        for len in [0, 1, 5, 9, 10, data.len() - 1] {
            match LandmarkTables::read_from(&data[..len]) {
                Err(CacheError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
                other => panic!("expected an UnexpectedEof for len {}, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn trailing_data() {
        let mut data = encode(&LandmarkTables::build(&line_graph(), &[0]).unwrap());
        data.push(0);
        assert!(matches!(
            LandmarkTables::read_from(data.as_slice()),
            Err(CacheError::TrailingData)
        ));
    }

    #[test]
    fn invalid_landmark() {
        let data = [1u8, 0, 0, 0, 9, 0, 0, 0, 4];
        assert!(matches!(
            LandmarkTables::read_from(&data[..]),
            Err(CacheError::InvalidLandmark {
                landmark: 9,
                width: 4
            })
        ));
    }

    #[test]
    fn too_many_landmarks() {
        let tables = LandmarkTables::from_parts(vec![0; 256], 1, vec![0; 256], vec![0; 256]);
        assert!(matches!(
            tables.write_to(Vec::new()),
            Err(CacheError::TooManyLandmarks(256))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn width_too_large() {
        let width = u32::MAX as usize + 1;
        let tables = LandmarkTables::from_parts(vec![], width, vec![], vec![]);
        let mut data = Vec::new();
        assert!(matches!(
            tables.write_to(&mut data),
            Err(CacheError::WidthTooLarge(w)) if w == width
        ));
        assert!(data.is_empty());
    }

    #[test]
    fn width_mismatch() {
        let tables = LandmarkTables::build(&line_graph(), &[0]).unwrap();
        assert!(matches!(
            tables.check_width(&grid_graph(3, 3)),
            Err(CacheError::WidthMismatch { cache: 4, graph: 9 })
        ));
    }

    #[test]
    fn files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landmarks.bin");
        assert!(LandmarkTables::read_file(&path).unwrap().is_none());

        let tables = LandmarkTables::build(&grid_graph(5, 5), &[0, 24]).unwrap();
        tables.write_file(&path).unwrap();
        assert_eq!(LandmarkTables::read_file(&path).unwrap(), Some(tables));

        std::fs::write(&path, [2u8, 0, 0]).unwrap();
        assert!(matches!(
            LandmarkTables::read_file(&path),
            Err(CacheError::Io(_))
        ));
    }
}
