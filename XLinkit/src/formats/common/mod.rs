//! Common types and utilities shared by the XLink decoder

pub mod bits;
pub mod float;
pub mod hash;
pub mod reader;

pub use bits::{count_set_bits_through, count_set_bits_through_64};
pub use hash::{NameDictionary, hash_name, init_name_dictionary, lookup_name, name_dictionary};
pub use reader::{ByteReader, Endianness, SeekGuard};
