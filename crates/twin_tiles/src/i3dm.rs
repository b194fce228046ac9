//! Instanced 3D Model (i3dm) tiles

use std::borrow::Cow;

use crate::error::{Result, TileError};
use crate::format::{aligned_body, read_u32_le, section, TableSection, TileHeader};

/// Embedded binary glTF, the only `gltfFormat` this parser accepts
const GLTF_FORMAT_EMBEDDED: u32 = 1;

/// i3dm bodies are 4-byte aligned
const GLTF_ALIGNMENT: usize = 4;

/// Parsed i3dm tile
#[derive(Clone, Debug)]
pub struct I3dm<'a> {
    pub header: TileHeader,
    pub feature_table: TableSection<'a>,
    pub batch_table: TableSection<'a>,
    /// Embedded binary glTF
    pub glb: Cow<'a, [u8]>,
}

/// Parse an i3dm tile.
///
/// Tiles that reference their glTF by external uri (`gltfFormat` 0) are
/// rejected, as is a tile whose glTF section is empty.
pub fn extract_i3dm(data: &[u8]) -> Result<I3dm<'_>> {
    let header = TileHeader::read(data, b"i3dm")?;

    let feature_table_json_len = read_u32_le(data, 12)? as usize;
    let feature_table_binary_len = read_u32_le(data, 16)? as usize;
    let batch_table_json_len = read_u32_le(data, 20)? as usize;
    let batch_table_binary_len = read_u32_le(data, 24)? as usize;
    let gltf_format = read_u32_le(data, 28)?;
    if gltf_format != GLTF_FORMAT_EMBEDDED {
        return Err(TileError::UnsupportedGltfFormat(gltf_format));
    }

    let feature_table_json_start = 32;
    let feature_table_binary_start = feature_table_json_start + feature_table_json_len;
    let batch_table_json_start = feature_table_binary_start + feature_table_binary_len;
    let batch_table_binary_start = batch_table_json_start + batch_table_json_len;
    let glb_start = batch_table_binary_start + batch_table_binary_len;

    if header.byte_length <= glb_start {
        return Err(TileError::EmptyGltf);
    }

    Ok(I3dm {
        header,
        feature_table: TableSection::new(
            section(data, feature_table_json_start, feature_table_json_len)?,
            section(data, feature_table_binary_start, feature_table_binary_len)?,
        ),
        batch_table: TableSection::new(
            section(data, batch_table_json_start, batch_table_json_len)?,
            section(data, batch_table_binary_start, batch_table_binary_len)?,
        ),
        glb: aligned_body(data, glb_start, header.byte_length, GLTF_ALIGNMENT)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i3dm_tile(gltf_format: u32, feature_json: &[u8], glb: &[u8]) -> Vec<u8> {
        let byte_length = 32 + feature_json.len() + glb.len();
        let mut data = Vec::new();
        data.extend_from_slice(b"i3dm");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(&(feature_json.len() as u32).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&gltf_format.to_le_bytes());
        data.extend_from_slice(feature_json);
        data.extend_from_slice(glb);
        data
    }

    #[test]
    fn test_extract_embedded_gltf() {
        let data = i3dm_tile(1, br#"{"INSTANCES_LENGTH":2}"#, b"glTFbody");
        let i3dm = extract_i3dm(&data).unwrap();
        assert_eq!(&*i3dm.glb, b"glTFbody");
        assert_eq!(
            i3dm.feature_table.json_value().unwrap()["INSTANCES_LENGTH"],
            2
        );
    }

    #[test]
    fn test_external_gltf_is_rejected() {
        let data = i3dm_tile(0, b"{}", b"model.glb");
        assert!(matches!(
            extract_i3dm(&data).unwrap_err(),
            TileError::UnsupportedGltfFormat(0)
        ));
    }

    #[test]
    fn test_empty_gltf_is_rejected() {
        let data = i3dm_tile(1, b"{}", b"");
        assert!(matches!(extract_i3dm(&data).unwrap_err(), TileError::EmptyGltf));
    }

    #[test]
    fn test_four_byte_alignment() {
        // 4-byte JSON puts the glb at offset 36: 4-byte aligned, borrowed
        let aligned = i3dm_tile(1, b"{}  ", b"glTF");
        assert!(matches!(extract_i3dm(&aligned).unwrap().glb, Cow::Borrowed(_)));

        // 2-byte JSON puts the glb at offset 34: copied out
        let unaligned = i3dm_tile(1, b"{}", b"glTF");
        assert!(matches!(extract_i3dm(&unaligned).unwrap().glb, Cow::Owned(_)));
    }
}
