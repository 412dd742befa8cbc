//! The type model of the jlite language.
//!
//! The model is made of [`Type`](r#type::Type) terms pointing into a
//! [`Library`](library::Library), which owns every class-like and generic
//! parameter in arenas. The library answers the structural queries the rest
//! of the toolchain relies on: conversions, override compatibility, member
//! lookup through the hierarchy, object creation and native invocation.

pub mod class_like;
pub mod library;
pub mod member;
pub mod operator;
pub mod r#type;
