//! Compiles provider resource schemas into typed resource models.
//!
//! Every resource type a provider declares is turned into a
//! [`ResourceModel`]: two trees of typed [`Field`]s, one holding the
//! user-settable (desired) attributes and nested blocks, the other holding the
//! attributes the provider computes (observed). Each field is assigned a
//! [`Codec`](codec::Codec) which converts its values between the typed model
//! and the provider's dynamic wire representation and reconciles desired and
//! observed instances.
//!
//! ## Usage
//!
//! ```
//! use provider_schema::{Attribute, Block, ResourceSchema, WireType};
//! use resource_compiler::{Assembler, DefaultNamer, OptimizerChain};
//!
//! let schema = ResourceSchema::new(
//!     Block::default()
//!         .with_attribute("name", Attribute::new(WireType::String).required())
//!         .with_attribute("arn", Attribute::new(WireType::String).computed()),
//! );
//!
//! let mut model = Assembler::new("generated")
//!     .assemble("aws_iam_user", &schema, &DefaultNamer::new("iam_user"))
//!     .expect("valid resource schema");
//! OptimizerChain::default().run(&mut model);
//!
//! assert_eq!(model.parameters.type_name(), Some("IamUserParameters"));
//! assert!(model.observation.child("arn").is_some());
//! ```
//!
//! Whole providers are compiled with [`compile_provider`], which collects the
//! models into a [`Registry`] and reports which resource types failed.

mod api_version;
pub mod assemble;
pub mod codec;
pub mod config;
pub mod dedup;
pub mod field;
pub mod instance;
pub mod mapper;
pub mod model;
pub mod naming;
pub mod optimize;
pub mod registry;
pub mod walker;

pub use api_version::*;
pub use assemble::Assembler;
pub use config::CompilerConfig;
pub use field::{AttributeKind, Composite, ElementKind, Field, FieldKind, PrimitiveKind};
pub use instance::ResourceInstance;
pub use model::ResourceModel;
pub use naming::{DefaultNamer, ProviderResourceNamer, ResourceNamer, TypeNames, field_name};
pub use optimize::{Deduplicator, Optimizer, OptimizerChain};
pub use registry::{CompileReport, Registry, compile_provider, compile_provider_with};
