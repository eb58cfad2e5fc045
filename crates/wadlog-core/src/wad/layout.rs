//! Byte layout constants for the WAD header and directory

/// Size of the fixed header (magic + lump count + directory offset)
pub const HEADER_SIZE: usize = 12;

/// Offset of the LE u32 lump count within the header
pub const LUMP_COUNT: usize = 4;

/// Offset of the LE u32 directory offset within the header
pub const DIRECTORY_OFFSET: usize = 8;

/// Size of one directory record (offset + size + name)
pub const DIRECTORY_RECORD_SIZE: usize = 16;

/// Fixed width of a lump name
pub const LUMP_NAME_SIZE: usize = 8;

/// File extension of a bare level container
pub const WAD_EXTENSION: &str = "wad";
