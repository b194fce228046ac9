//! # Twin Tiles
//!
//! Parsers for the 3D Tiles binary tile formats: Batched 3D Model (b3dm),
//! Instanced 3D Model (i3dm), and Composite (cmpt).
//!
//! Each parser borrows from the input buffer; the embedded glTF comes back
//! as [`Cow`](std::borrow::Cow) bytes, copied out only when its offset in
//! the source buffer breaks the format's alignment requirement. The b3dm
//! parser also reads the two pre-release header layouts still found in
//! tilesets converted years ago.
//!
//! ```
//! use twin_tiles::{extract_cmpt, extract_b3dm, tile_magic};
//!
//! # fn run(tile: &[u8]) -> twin_tiles::Result<()> {
//! for inner in extract_cmpt(tile)? {
//!     if tile_magic(inner)? == b"b3dm" {
//!         let b3dm = extract_b3dm(inner)?;
//!         let _ = b3dm.glb;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod b3dm;
pub mod cmpt;
pub mod error;
pub mod format;
pub mod i3dm;

pub use b3dm::{extract_b3dm, B3dm};
pub use cmpt::extract_cmpt;
pub use error::{Result, TileError};
pub use format::{tile_magic, TableSection, TileHeader};
pub use i3dm::{extract_i3dm, I3dm};
