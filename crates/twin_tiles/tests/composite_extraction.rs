//! End-to-end extraction: composite tiles containing real b3dm and i3dm
//! payloads, drained down to their embedded glTF bytes.

use twin_tiles::{extract_b3dm, extract_cmpt, extract_i3dm, tile_magic};

fn b3dm_tile(feature_json: &[u8], glb: &[u8]) -> Vec<u8> {
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

fn i3dm_tile(feature_json: &[u8], glb: &[u8]) -> Vec<u8> {
    let byte_length = 32 + feature_json.len() + glb.len();
    let mut data = Vec::new();
    data.extend_from_slice(b"i3dm");
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&(byte_length as u32).to_le_bytes());
    data.extend_from_slice(&(feature_json.len() as u32).to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(feature_json);
    data.extend_from_slice(glb);
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

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_drain_composite_to_gltf_bytes() {
    init_logging();
    let buildings = b3dm_tile(br#"{"BATCH_LENGTH":4}"#, b"glTF-buildings");
    let trees = i3dm_tile(br#"{"INSTANCES_LENGTH":9}"#, b"glTF-trees");
    let nested = cmpt_tile(&[trees]);
    let composite = cmpt_tile(&[buildings, nested]);

    let mut glbs = Vec::new();
    for inner in extract_cmpt(&composite).unwrap() {
        match tile_magic(inner).unwrap() {
            b"b3dm" => glbs.push(extract_b3dm(inner).unwrap().glb.into_owned()),
            b"i3dm" => glbs.push(extract_i3dm(inner).unwrap().glb.into_owned()),
            other => panic!("unexpected inner tile magic {other:?}"),
        }
    }

    assert_eq!(glbs.len(), 2);
    assert_eq!(glbs[0], b"glTF-buildings");
    assert_eq!(glbs[1], b"glTF-trees");
}

#[test]
fn test_feature_tables_survive_composite_nesting() {
    let buildings = b3dm_tile(br#"{"BATCH_LENGTH":4}"#, b"glTF-buildings");
    let composite = cmpt_tile(&[buildings]);

    let tiles = extract_cmpt(&composite).unwrap();
    let b3dm = extract_b3dm(tiles[0]).unwrap();
    assert_eq!(
        b3dm.feature_table.json_value().unwrap()["BATCH_LENGTH"],
        4
    );
    assert_eq!(b3dm.header.byte_length, tiles[0].len());
}

#[test]
fn test_composite_rejects_non_composite_buffer() {
    let b3dm = b3dm_tile(b"{}", b"glTF");
    assert!(extract_cmpt(&b3dm).is_err());
}
