//! Strongly-typed definitions of the schemas and values an infrastructure
//! provider plugin exchanges with its host.
//!
//! A provider describes every resource type it manages with a
//! [`ResourceSchema`]: a tree of [`Block`]s made up of typed [`Attribute`]s and
//! [`NestedBlock`]s. Attribute types are [`WireType`]s, which (de)serialize
//! from the provider's JSON type encoding.
//!
//! ```
//! use provider_schema::{ResourceSchema, WireType};
//!
//! let schema: ResourceSchema = serde_json::from_str(
//!     r#"{"block": {"attributes": {"name": {"type": "string", "required": true}}}}"#,
//! )
//! .expect("valid resource schema");
//!
//! assert_eq!(schema.block.attributes["name"].wire_type, WireType::String);
//! ```
//!
//! Values are exchanged as untyped JSON documents. [`WireValue`] types them
//! against a [`WireType`] so they can be inspected without guessing.

mod block;
pub mod value;
pub mod visit;
mod wire_type;

pub use block::*;
pub use value::WireValue;
pub use wire_type::*;
