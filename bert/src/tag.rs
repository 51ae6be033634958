//! External term format tag bytes recognized by this crate.

/// Leading byte of every encoded term.
pub const VERSION_MAGIC: u8 = 131;

/// 8-byte big-endian IEEE-754 float (`NEW_FLOAT_EXT`).
pub const NEW_FLOAT: u8 = 70;
/// Unsigned byte integer (`SMALL_INTEGER_EXT`).
pub const SMALL_INTEGER: u8 = 97;
/// Signed 32-bit big-endian integer (`INTEGER_EXT`).
pub const INTEGER: u8 = 98;
/// Legacy 31-byte string float (`FLOAT_EXT`); decode only.
pub const FLOAT: u8 = 99;
/// Latin-1 atom with 16-bit length (`ATOM_EXT`).
pub const ATOM: u8 = 100;
/// Tuple with 8-bit arity (`SMALL_TUPLE_EXT`).
pub const SMALL_TUPLE: u8 = 104;
/// Tuple with 32-bit arity (`LARGE_TUPLE_EXT`).
pub const LARGE_TUPLE: u8 = 105;
/// The empty list (`NIL_EXT`).
pub const NIL: u8 = 106;
/// Byte list with 16-bit length (`STRING_EXT`); decode only.
pub const STRING: u8 = 107;
/// Proper list with 32-bit length and explicit tail (`LIST_EXT`).
pub const LIST: u8 = 108;
/// Byte sequence with 32-bit length (`BINARY_EXT`).
pub const BINARY: u8 = 109;
/// Little-endian bignum with 8-bit digit count (`SMALL_BIG_EXT`).
pub const SMALL_BIG: u8 = 110;
/// Little-endian bignum with 32-bit digit count (`LARGE_BIG_EXT`).
pub const LARGE_BIG: u8 = 111;
/// Latin-1 atom with 8-bit length (`SMALL_ATOM_EXT`).
pub const SMALL_ATOM: u8 = 115;
/// UTF-8 atom with 16-bit length (`ATOM_UTF8_EXT`).
pub const ATOM_UTF8: u8 = 118;
/// UTF-8 atom with 8-bit length (`SMALL_ATOM_UTF8_EXT`).
pub const SMALL_ATOM_UTF8: u8 = 119;
