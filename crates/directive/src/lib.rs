//! The `@doAction` template directive.
//!
//! `@doAction('name')` and `@doAction('name', arg)` trigger the named action
//! while a template renders and leave no output of their own. Arguments are
//! literals: quoted strings, numbers, `true`, `false` and `null`.

mod error;
mod expr;
mod render;

pub use error::DirectiveError;
pub use expr::{Directive, parse_literal};
pub use render::{OPEN, render};
