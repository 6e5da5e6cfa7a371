//! Template Renderer
//!
//! Templates use Handlebars syntax: `{{ name }}` substitutes a variable,
//! `{{ server.port }}` reaches into nested mappings, `{{#each items}}` and
//! `{{#if cond}}` provide iteration and conditionals, and helpers are called
//! as `{{ cidrhost subnet 1 }}` or as sub-expressions
//! `{{#if (hasKey this "name")}}`.
//!
//! Rendering is strict by default: a reference to a key that is not in the
//! namespace fails the render instead of producing an empty string.

mod engine;
pub mod helpers;

pub use engine::{MissingKeyPolicy, Renderer, TemplateProgram};
pub use helpers::{HelperError, HelperFn, HelperRegistry};
