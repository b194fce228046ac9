//! Composite (cmpt) tiles

use crate::error::{Result, TileError};
use crate::format::{read_u32_le, section, tile_magic, TileHeader};

/// Flatten a cmpt tile into the leaf tiles it contains.
///
/// Inner tiles are returned in document order as raw slices, headers
/// included, ready to hand to [`extract_b3dm`](crate::extract_b3dm) or
/// [`extract_i3dm`](crate::extract_i3dm). Nested composites are recursed
/// into rather than returned.
pub fn extract_cmpt(data: &[u8]) -> Result<Vec<&[u8]>> {
    let header = TileHeader::read(data, b"cmpt")?;
    let tiles_length = read_u32_le(data, 12)? as usize;

    let mut tiles = Vec::with_capacity(tiles_length);
    let mut offset = 16;
    for _ in 0..tiles_length {
        let byte_length = read_u32_le(data, offset + 8)? as usize;
        if byte_length == 0 || offset + byte_length > header.byte_length {
            return Err(TileError::InvalidInnerTileLength {
                offset,
                byte_length,
            });
        }
        let inner = section(data, offset, byte_length)?;
        if tile_magic(inner)? == b"cmpt" {
            tiles.extend(extract_cmpt(inner)?);
        } else {
            tiles.push(inner);
        }
        offset += byte_length;
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_tile(magic: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let byte_length = 12 + body.len();
        let mut data = Vec::new();
        data.extend_from_slice(magic);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    fn cmpt_tile(inner: &[Vec<u8>]) -> Vec<u8> {
        let byte_length = 16 + inner.iter().map(Vec::len).sum::<usize>();
        let mut data = Vec::new();
        data.extend_from_slice(b"cmpt");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(byte_length as u32).to_le_bytes());
        data.extend_from_slice(&(inner.len() as u32).to_le_bytes());
        for tile in inner {
            data.extend_from_slice(tile);
        }
        data
    }

    #[test]
    fn test_flattens_leaf_tiles_in_order() {
        let b3dm = leaf_tile(b"b3dm", b"first");
        let i3dm = leaf_tile(b"i3dm", b"second");
        let cmpt = cmpt_tile(&[b3dm.clone(), i3dm.clone()]);

        let tiles = extract_cmpt(&cmpt).unwrap();
        assert_eq!(tiles, vec![&b3dm[..], &i3dm[..]]);
    }

    #[test]
    fn test_nested_composites_are_recursed() {
        let a = leaf_tile(b"b3dm", b"a");
        let b = leaf_tile(b"b3dm", b"b");
        let c = leaf_tile(b"i3dm", b"c");
        let inner_cmpt = cmpt_tile(&[b.clone(), c.clone()]);
        let outer = cmpt_tile(&[a.clone(), inner_cmpt]);

        let tiles = extract_cmpt(&outer).unwrap();
        assert_eq!(tiles, vec![&a[..], &b[..], &c[..]]);
    }

    #[test]
    fn test_empty_composite() {
        let cmpt = cmpt_tile(&[]);
        assert!(extract_cmpt(&cmpt).unwrap().is_empty());
    }

    #[test]
    fn test_zero_length_inner_tile_is_rejected() {
        let bogus = leaf_tile(b"b3dm", b"");
        let mut cmpt = cmpt_tile(&[bogus]);
        // Stamp the inner tile's byteLength to zero
        let inner_len_at = 16 + 8;
        cmpt[inner_len_at..inner_len_at + 4].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            extract_cmpt(&cmpt).unwrap_err(),
            TileError::InvalidInnerTileLength { .. }
        ));
    }

    #[test]
    fn test_inner_tile_overrunning_composite_is_rejected() {
        let inner = leaf_tile(b"b3dm", b"abc");
        let mut cmpt = cmpt_tile(&[inner]);
        let inner_len_at = 16 + 8;
        cmpt[inner_len_at..inner_len_at + 4].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            extract_cmpt(&cmpt).unwrap_err(),
            TileError::InvalidInnerTileLength { .. }
        ));
    }
}
