//! Bakery – a factory for authorization token policies kept as datalog files.
//!
//! Policies are written as small datalog files called *recipes*. Recipes are
//! grouped by the folder they live in, and each folder becomes a *cookbook*:
//! * A [`datalog::Fact`] is a ground predicate, e.g. `human(#authority, "socrates")`.
//! * A [`datalog::Rule`] derives new facts: `valid(#authority) <- realm(#ambient, $r), realm(#authority, $r)`.
//! * A [`datalog::Caveat`] is a bracketed set of rules of which one must match:
//!   `[right(#authority, $f, #read) <- resource(#ambient, $f) @ $f == "x"]`.
//! * A [`recipe::Recipe`] holds the facts, rules and caveats of one file, in source order.
//! * A [`cookbook::Cookbook`] holds the recipes of one directory.
//! * A [`bakery::Bakery`] maps directory names to cookbooks.
//!
//! ## Modules
//! * [`scanner`] – Splits recipe text into `;`-terminated statements, dropping `//` comment lines.
//! * [`classify`] – Decides whether a statement is a fact, rule or caveat and dispatches it.
//! * [`parser`] – The [`parser::Grammar`] trait and the pest-backed [`parser::DatalogParser`].
//! * [`datalog`] – The object model the grammar produces.
//! * [`recipe`], [`cookbook`], [`bakery`] – The collections built from a recipe tree.
//! * [`loader`] – Reads files and directory trees into those collections.
//! * [`settings`] – Layered loader configuration.
//! * [`token`] – The verifier and builder contexts recipes are pushed into.
//!
//! ## Recipe Format
//! ```text
//! // comment lines are ignored
//! human(#authority, "socrates");
//! valid(#authority) <-
//!     realm(#ambient, $realm),
//!     realm(#authority, $realm);
//! [right(#authority, $file, #read) <- resource(#ambient, $file) @ prefix($file, "/home")];
//! ```
//! A statement may span several lines and ends at the first line whose trimmed
//! text ends with `;`. Statements starting with `[` are caveats, statements
//! containing `<-` are rules, everything else is a fact.
//!
//! ## Quick Start
//! ```
//! use bakery::recipe::Recipe;
//! let recipe = Recipe::parse("example", "human(#authority, \"socrates\");\n").unwrap();
//! assert_eq!(recipe.facts().len(), 1);
//! ```
//! Whole trees are read with [`bakery::Bakery::load`] or, with custom
//! settings, through [`loader::Loader::bakery`]. Loading is all or nothing:
//! the first unreadable file or malformed statement fails the load.
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT, as declared in `Cargo.toml`.

pub mod bakery;
pub mod classify;
pub mod cookbook;
pub mod datalog;
pub mod error;
pub mod loader;
pub mod parser;
pub mod recipe;
pub mod scanner;
pub mod settings;
pub mod token;

pub use bakery::Bakery;
pub use cookbook::Cookbook;
pub use error::{BakeryError, ParseError, Result};
pub use loader::Loader;
pub use recipe::Recipe;
pub use settings::{ConfigLoader, LoaderConfig};
