//! message/mod.rs
//! Public module export for the prediction message schema and its JSON codec.
//!
//! Notes:
//! - The schema mirrors Seldon's `prediction.proto`; only its JSON mapping is
//!   implemented, the binary protobuf form is never produced.
//! - `decode_message(encode_message(m)?)? == m` for every message that encodes.

pub mod bin_data;
pub mod decode;
pub mod encode;
pub mod error;
pub mod types;
pub mod validate;

pub use decode::*;
pub use encode::*;
pub use error::*;
pub use types::*;
pub use validate::*;
