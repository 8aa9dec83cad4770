//! bcsr format - Checksummed binary CSR blob
//!
//! Layout, all little-endian:
//!
//! ```text
//! magic u32 | version u16 | reserved u16 | n_nodes u32 | reserved u32 | n_edges u64
//! offsets  [u64; n_nodes + 1]
//! neighbor [u32; n_edges]
//! weight   [f64; n_edges]
//! pos_x    [f64; n_nodes]
//! pos_y    [f64; n_nodes]
//! crc64    u64   (CRC-64-ISO over every preceding byte)
//! ```
//!
//! Floats are stored bit-exact; the textual precision option does not apply.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crc::{Crc, CRC_64_GO_ISO};

use super::Exporter;
use crate::core::compactor::{CompactGraph, CsrGraph};
use crate::core::error::{Error, Result};

const MAGIC: u32 = 0x4243_5352; // "BCSR"
const VERSION: u16 = 1;
const HEADER_LEN: usize = 24;
const FOOTER_LEN: usize = 8;

static CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryExporter;

/// Writes every field through the running checksum
struct ChecksumWriter<'a> {
    out: &'a mut dyn Write,
    digest: crc::Digest<'static, u64>,
}

impl ChecksumWriter<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        self.digest.update(bytes);
        Ok(())
    }
}

impl Exporter for BinaryExporter {
    fn export(&self, graph: &CompactGraph, out: &mut dyn Write) -> Result<()> {
        let n_nodes = u32::try_from(graph.node_count()).map_err(|_| {
            Error::CapacityExceeded(format!("{} nodes do not fit u32", graph.node_count()))
        })?;
        let n_edges = graph.edge_count() as u64;

        let mut writer = ChecksumWriter {
            out,
            digest: CRC64.digest(),
        };

        // Header
        writer.put(&MAGIC.to_le_bytes())?;
        writer.put(&VERSION.to_le_bytes())?;
        writer.put(&0u16.to_le_bytes())?;
        writer.put(&n_nodes.to_le_bytes())?;
        writer.put(&0u32.to_le_bytes())?;
        writer.put(&n_edges.to_le_bytes())?;

        for &offset in graph.offsets() {
            writer.put(&offset.to_le_bytes())?;
        }
        for &neighbor in graph.neighbors() {
            writer.put(&neighbor.to_le_bytes())?;
        }
        for series in [
            graph.weights(),
            graph.pos_x.as_slice(),
            graph.pos_y.as_slice(),
        ] {
            for &value in series {
                writer.put(&value.to_le_bytes())?;
            }
        }

        // Footer
        let ChecksumWriter { out, digest } = writer;
        out.write_all(&digest.finalize().to_le_bytes())?;
        out.flush()?;

        Ok(())
    }
}

/// Little-endian cursor over a verified body
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos + N;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| Error::Format("unexpected end of data".to_string()))?;
        self.pos = end;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take()?))
    }
}

fn body_len(n_nodes: u64, n_edges: u64) -> Option<u64> {
    let offsets = n_nodes.checked_add(1)?.checked_mul(8)?;
    let edges = n_edges.checked_mul(4 + 8)?;
    let coords = n_nodes.checked_mul(16)?;
    offsets
        .checked_add(edges)?
        .checked_add(coords)?
        .checked_add((HEADER_LEN + FOOTER_LEN) as u64)
}

/// Read and verify a bcsr blob
pub fn read_binary<R: Read>(mut reader: R) -> Result<CompactGraph> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    if data.len() < HEADER_LEN + FOOTER_LEN {
        return Err(Error::Format(format!(
            "file too short ({} bytes)",
            data.len()
        )));
    }

    let (body, footer) = data.split_at(data.len() - FOOTER_LEN);
    let mut footer_bytes = [0u8; FOOTER_LEN];
    footer_bytes.copy_from_slice(footer);
    let stored_crc = u64::from_le_bytes(footer_bytes);
    let actual_crc = CRC64.checksum(body);
    if stored_crc != actual_crc {
        return Err(Error::Format(format!(
            "checksum mismatch (stored {stored_crc:#018x}, computed {actual_crc:#018x})"
        )));
    }

    let mut cursor = Cursor { data: body, pos: 0 };
    let magic = cursor.u32()?;
    if magic != MAGIC {
        return Err(Error::Format(format!("bad magic {magic:#010x}")));
    }
    let version = cursor.u16()?;
    if version != VERSION {
        return Err(Error::Format(format!("unsupported version {version}")));
    }
    let _reserved = cursor.u16()?;
    let n_nodes = cursor.u32()? as u64;
    let _reserved = cursor.u32()?;
    let n_edges = cursor.u64()?;

    if body_len(n_nodes, n_edges) != Some(data.len() as u64) {
        return Err(Error::Format(format!(
            "size mismatch for {n_nodes} nodes and {n_edges} edges ({} bytes)",
            data.len()
        )));
    }

    let n_nodes = n_nodes as usize;
    let n_edges = n_edges as usize;

    let offsets = (0..=n_nodes)
        .map(|_| cursor.u64())
        .collect::<Result<Vec<_>>>()?;
    let neighbors = (0..n_edges)
        .map(|_| cursor.u32())
        .collect::<Result<Vec<_>>>()?;
    let weights = (0..n_edges)
        .map(|_| cursor.f64())
        .collect::<Result<Vec<_>>>()?;
    let pos_x = (0..n_nodes)
        .map(|_| cursor.f64())
        .collect::<Result<Vec<_>>>()?;
    let pos_y = (0..n_nodes)
        .map(|_| cursor.f64())
        .collect::<Result<Vec<_>>>()?;

    let graph = CompactGraph {
        csr: CsrGraph {
            offsets,
            neighbors,
            weights,
        },
        pos_x,
        pos_y,
    };
    graph.validate()?;

    Ok(graph)
}

pub struct CsrBlobFile;

impl CsrBlobFile {
    /// Write a compacted graph to a bcsr file
    pub fn write<P: AsRef<Path>>(path: P, graph: &CompactGraph) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        BinaryExporter.export(graph, &mut writer)
    }

    /// Read and verify a bcsr file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<CompactGraph> {
        read_binary(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompactGraph {
        CompactGraph {
            csr: CsrGraph {
                offsets: vec![0, 2, 3, 4],
                neighbors: vec![1, 2, 0, 0],
                weights: vec![0.5, 0.75, 0.5, 0.75],
            },
            pos_x: vec![0.0, 1200.0, 300.0],
            pos_y: vec![800.0, 0.0, 123.456789],
        }
    }

    fn encode(graph: &CompactGraph) -> Vec<u8> {
        let mut out = Vec::new();
        BinaryExporter.export(graph, &mut out).unwrap();
        out
    }

    #[test]
    fn test_blob_size_and_magic() {
        let bytes = encode(&sample());
        // header + 4 offsets + 4 neighbors + 4 weights + 3 x + 3 y + crc
        assert_eq!(bytes.len(), 24 + 32 + 16 + 32 + 24 + 24 + 8);
        assert_eq!(&bytes[0..4], &MAGIC.to_le_bytes());
    }

    #[test]
    fn test_footer_checksums_whole_body() {
        let bytes = encode(&sample());
        let (body, footer) = bytes.split_at(bytes.len() - FOOTER_LEN);

        let stored = u64::from_le_bytes(footer.try_into().unwrap());
        assert_eq!(stored, CRC64.checksum(body));
        assert_ne!(stored, CRC64.checksum(&body[HEADER_LEN..]));
    }

    #[test]
    fn test_read_back_is_bit_exact() {
        let graph = sample();
        assert_eq!(read_binary(encode(&graph).as_slice()).unwrap(), graph);
    }

    #[test]
    fn test_corruption_is_detected() {
        let mut bytes = encode(&sample());
        bytes[30] ^= 0xFF;

        let err = read_binary(bytes.as_slice()).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let bytes = encode(&sample());
        assert!(read_binary(&bytes[..10]).is_err());
    }

    #[test]
    fn test_file_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bcsr");

        CsrBlobFile::write(&path, &sample()).unwrap();
        assert_eq!(CsrBlobFile::read(&path).unwrap(), sample());
    }
}
