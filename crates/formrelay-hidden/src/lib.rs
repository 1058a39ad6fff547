//! FormRelay Hidden - Hidden state round trip
//!
//! Serializes a form's aggregated state into the wire payload carried by
//! the reserved hidden fields, and restores it on the next request:
//! - Ordered hidden parameter set (registration order, never hash order)
//! - Length-prefixed binary framing, base64 for field transport
//! - Pluggable value codec with a plain and an AEAD implementation
//! - Encryption policy with per-operation exemptions

pub mod cipher;
pub mod codec;
pub mod entries;
pub mod framing;
pub mod policy;
pub mod state;

pub use cipher::*;
pub use codec::*;
pub use entries::*;
pub use framing::*;
pub use policy::*;
pub use state::*;
