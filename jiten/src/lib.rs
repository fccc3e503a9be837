//! jiten
//!
//! Japanese text to dictionary-word resolution.
//!
//! The pipeline takes raw text, segments it through a pluggable
//! morphological analyzer, and resolves each segment (or merged run of
//! segments) to a dictionary entry, undoing conjugation along the way.
//! Output is a list of word spans that tile the input exactly; text that
//! matches nothing comes back as explicit unknown spans.
//!
//! ```no_run
//! use std::sync::Arc;
//! use jiten::{MemoryDictionary, Model, Parser};
//! use jiten_core::Config;
//! # struct MyAnalyzer;
//! # impl jiten::MorphemeAnalyzer for MyAnalyzer {
//! #     fn segment(&self, _: &str) -> Vec<jiten::Morpheme> { Vec::new() }
//! # }
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = MemoryDictionary::from_json_str(r#"[]"#)?;
//! let model = Model::with_standard_rules(Arc::new(dict), Config::default());
//! let parser = Parser::new(model, MyAnalyzer);
//! for span in parser.parse_text("アニメを見ている")? {
//!     println!("{} -> {:?}", span.surface, span.entry_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub use analyzer::{Morpheme, MorphemeAnalyzer};

pub mod dictionary;
pub use dictionary::{Dictionary, Entry, MemoryDictionary, Sense};

pub mod error;
pub use error::ParseError;

pub mod resolver;
pub use resolver::{Resolver, WordSpan};

pub mod parser;
pub use parser::{Model, Parser};

pub use jiten_core::{Config, PartOfSpeech};
