//! hotglob-core: build-time rewriting of glob-accepting hot-update calls.
//!
//! Source units may declare a "live subscription" to a set of modules with
//! a single glob-accepting call:
//!
//! ```js
//! import.meta.hot.accept({ glob: "./pages/*.ts" }, (mods) => { ... });
//! ```
//!
//! This crate expands such call-sites at transform time into statically
//! enumerated import specifiers, so consumers get accurate,
//! filesystem-driven accept lists without hand-maintaining them:
//!
//! ```js
//! import.meta.hot.accept(["./pages/a.ts", "./pages/b.ts"], function (m) { ... });
//! ```
//!
//! The pipeline, leaves first:
//!
//! - **mask**: blank literal contents so structural scanning can't be fooled
//! - **scanner**: find call-sites and their balanced closing parentheses
//! - **parser**: validate the call shape and extract globs and callback
//! - **resolve**: raw glob → absolute glob, via the external resolver
//! - **matcher**: common scan base + filesystem expansion (hotglob-glob)
//! - **specifier**: matched path → import specifier
//! - **emit**: offset-based text splicing and the callback adapter
//! - **transform**: per-unit orchestration, concurrency, diagnostics

pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod mask;
pub mod matcher;
pub mod parser;
pub mod paths;
pub mod resolve;
pub mod scanner;
pub mod specifier;
pub mod transform;

pub use diagnostic::{Diagnostic, ErrorCode, Span};
pub use emit::{Edit, EditBuffer, Mapping, OffsetMap};
pub use error::TransformError;
pub use parser::{CallbackDescriptor, Classified, GlobDescriptor};
pub use resolve::{NullResolver, ResolveOptions, SpecifierResolver};
pub use scanner::CallSiteMatch;
pub use transform::{transform_unit, TransformContext, TransformOutput, TransformResult};
