//! Batched 3D Model (b3dm) tiles

use std::borrow::Cow;

use crate::error::Result;
use crate::format::{aligned_body, read_u32_le, section, TableSection, TileHeader};

/// Smallest u32 a table length field can decode to when the bytes at that
/// position are actually tile body content. Body content there starts with
/// either `{` of a JSON table (0x7B), `"` of a legacy JSON string (0x22),
/// or the `g` of the glTF magic (0x67), so the little-endian value is at
/// least 0x22000000.
const LEGACY_LENGTH_SENTINEL: u32 = 0x2200_0000;

/// The glTF body must start 8-byte aligned for accessor views
const GLTF_ALIGNMENT: usize = 8;

/// Parsed b3dm tile
#[derive(Clone, Debug)]
pub struct B3dm<'a> {
    pub header: TileHeader,
    pub feature_table: TableSection<'a>,
    pub batch_table: TableSection<'a>,
    /// Embedded binary glTF
    pub glb: Cow<'a, [u8]>,
}

/// Parse a b3dm tile.
///
/// Two pre-release header layouts are still found in the wild and are
/// detected by sentinel: when a length field decodes to a value only body
/// content can produce, the shorter legacy header is assumed and a feature
/// table carrying the legacy batch length is synthesized.
pub fn extract_b3dm(data: &[u8]) -> Result<B3dm<'_>> {
    let header = TileHeader::read(data, b"b3dm")?;

    let feature_table_json_len = read_u32_le(data, 12)? as usize;
    let feature_table_binary_len = read_u32_le(data, 16)? as usize;
    let batch_table_json_len = read_u32_le(data, 20)?;
    let batch_table_binary_len = read_u32_le(data, 24)?;

    if batch_table_json_len >= LEGACY_LENGTH_SENTINEL {
        // 20-byte legacy header: [batchLength] [batchTableByteLength]
        log::debug!("b3dm uses the 20-byte pre-release header");
        return extract_legacy(
            data,
            header,
            20,
            feature_table_json_len as u32,
            feature_table_binary_len,
            0,
        );
    }
    if batch_table_binary_len >= LEGACY_LENGTH_SENTINEL {
        // 24-byte legacy header:
        // [batchTableJsonByteLength] [batchTableBinaryByteLength] [batchLength]
        log::debug!("b3dm uses the 24-byte pre-release header");
        return extract_legacy(
            data,
            header,
            24,
            batch_table_json_len,
            feature_table_json_len,
            feature_table_binary_len,
        );
    }

    let feature_table_json_start = 28;
    let feature_table_binary_start = feature_table_json_start + feature_table_json_len;
    let batch_table_json_start = feature_table_binary_start + feature_table_binary_len;
    let batch_table_binary_start = batch_table_json_start + batch_table_json_len as usize;
    let glb_start = batch_table_binary_start + batch_table_binary_len as usize;

    Ok(B3dm {
        header,
        feature_table: TableSection::new(
            section(data, feature_table_json_start, feature_table_json_len)?,
            section(data, feature_table_binary_start, feature_table_binary_len)?,
        ),
        batch_table: TableSection::new(
            section(data, batch_table_json_start, batch_table_json_len as usize)?,
            section(data, batch_table_binary_start, batch_table_binary_len as usize)?,
        ),
        glb: aligned_body(data, glb_start, header.byte_length, GLTF_ALIGNMENT)?,
    })
}

/// Shared tail of the two legacy layouts: the feature table collapses to a
/// synthesized batch length, and the body carries the batch table (JSON,
/// then binary for the 24-byte layout) followed by the glTF.
fn extract_legacy(
    data: &[u8],
    header: TileHeader,
    body_start: usize,
    batch_length: u32,
    batch_table_json_len: usize,
    batch_table_binary_len: usize,
) -> Result<B3dm<'_>> {
    let batch_table_binary_start = body_start + batch_table_json_len;
    let glb_start = batch_table_binary_start + batch_table_binary_len;
    Ok(B3dm {
        header,
        feature_table: TableSection::synthesized(
            format!(r#"{{"BATCH_LENGTH":{batch_length}}}"#).into_bytes(),
        ),
        batch_table: TableSection::new(
            section(data, body_start, batch_table_json_len)?,
            section(data, batch_table_binary_start, batch_table_binary_len)?,
        ),
        glb: aligned_body(data, glb_start, header.byte_length, GLTF_ALIGNMENT)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TileError;

    fn current_b3dm(feature_json: &[u8], glb: &[u8]) -> Vec<u8> {
        let byte_length = 28 + feature_json.len() + glb.len();
        let mut data = Vec::new();
        data.extend_from_slice(b"b3dm");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(&(feature_json.len() as u32).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(feature_json);
        data.extend_from_slice(glb);
        data
    }

    #[test]
    fn test_extract_current_header() {
        // 4-byte JSON pads the glb start to offset 32
        let data = current_b3dm(b"{}  ", b"glTFbody");
        let b3dm = extract_b3dm(&data).unwrap();
        assert_eq!(&*b3dm.glb, b"glTFbody");
        assert!(matches!(b3dm.glb, Cow::Borrowed(_)));
        assert_eq!(b3dm.feature_table.json_value().unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_extract_unaligned_glb_is_copied() {
        let data = current_b3dm(b"{}", b"glTFbody");
        let b3dm = extract_b3dm(&data).unwrap();
        // glb starts at offset 30, which is not 8-byte aligned
        assert_eq!(&*b3dm.glb, b"glTFbody");
        assert!(matches!(b3dm.glb, Cow::Owned(_)));
    }

    #[test]
    fn test_extract_20_byte_legacy_header() {
        // glTF magic sits at offset 20 where the current layout expects
        // batchTableJsonByteLength, tripping the sentinel
        let glb = b"glTFbody";
        let byte_length = 20 + glb.len();
        let mut data = Vec::new();
        data.extend_from_slice(b"b3dm");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(&7u32.to_le_bytes()); // batchLength
        data.extend_from_slice(&0u32.to_le_bytes()); // batchTableByteLength
        data.extend_from_slice(glb);

        let b3dm = extract_b3dm(&data).unwrap();
        assert_eq!(&*b3dm.glb, glb);
        let feature = b3dm.feature_table.json_value().unwrap();
        assert_eq!(feature["BATCH_LENGTH"], 7);
        assert!(b3dm.batch_table.json.is_empty());
    }

    #[test]
    fn test_extract_24_byte_legacy_header() {
        let batch_json = br#"{"id":["a","b","c"]}"#;
        let glb = b"glTFbody";
        let byte_length = 24 + batch_json.len() + glb.len();
        let mut data = Vec::new();
        data.extend_from_slice(b"b3dm");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(&(batch_json.len() as u32).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes()); // batchLength
        data.extend_from_slice(batch_json);
        data.extend_from_slice(glb);

        let b3dm = extract_b3dm(&data).unwrap();
        assert_eq!(&*b3dm.glb, glb);
        assert_eq!(
            b3dm.feature_table.json_value().unwrap()["BATCH_LENGTH"],
            3
        );
        assert_eq!(&*b3dm.batch_table.json, &batch_json[..]);
    }

    #[test]
    fn test_24_byte_legacy_header_keeps_batch_table_binary() {
        // The 24-byte layout carries a binary chunk after the batch JSON;
        // the glb starts only after both
        let batch_json = br#"{"id":["a","b","c"]}"#;
        let batch_binary = [0xAAu8; 8];
        let glb = b"glTFbody";
        let byte_length = 24 + batch_json.len() + batch_binary.len() + glb.len();
        let mut data = Vec::new();
        data.extend_from_slice(b"b3dm");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(&(batch_json.len() as u32).to_le_bytes());
        data.extend_from_slice(&(batch_binary.len() as u32).to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes()); // batchLength
        data.extend_from_slice(batch_json);
        data.extend_from_slice(&batch_binary);
        data.extend_from_slice(glb);

        let b3dm = extract_b3dm(&data).unwrap();
        assert_eq!(&*b3dm.batch_table.json, &batch_json[..]);
        assert_eq!(b3dm.batch_table.binary, &batch_binary[..]);
        assert_eq!(&*b3dm.glb, glb);
    }

    #[test]
    fn test_truncated_table_errors() {
        let mut data = current_b3dm(b"{}  ", b"glTFbody");
        data.truncate(30);
        assert!(matches!(
            extract_b3dm(&data).unwrap_err(),
            TileError::Truncated { .. }
        ));
    }
}
