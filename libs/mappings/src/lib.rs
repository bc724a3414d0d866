//! Type-driven conversion between typed records and a generic value tree.
//!
//! ```ignore
//! #[derive(Default, Mappable)]
//! struct User {
//!     id: u64,
//!     created_when: Timestamp,
//! }
//!
//! let mut cx = Context::new();
//! cx.create_mapping::<Timestamp>().set_rule(timestamp_rule());
//! cx.create_mapping::<User>()
//!     .field(field!(User, created_when))?
//!     .wire_name("created-when")?;
//!
//! let bytes = cx.marshal(&user)?;
//! let back: User = cx.unmarshal(&bytes)?;
//! ```

extern crate self as mappings;

pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod global;
pub mod mapping;
pub mod rule;
pub mod shape;
pub mod value;

mod flatten;
mod impls;
mod unflatten;

pub use codec::{JsonCodec, WireCodec};
pub use config::Options;
pub use context::Context;
pub use error::{Error, ErrorKind, Path, Result, Segment};
pub use flatten::RecordWriter;
pub use global::{configure, marshal, unmarshal, with_default};
pub use mapping::{FieldEntry, FieldKey, FieldMut, Mapping, MappingMut};
pub use mappings_derive::Mappable;
pub use rule::Rule;
pub use shape::{FieldInfo, Mappable};
pub use unflatten::RecordReader;
pub use value::{Record, Value};
