//! Rule parsing, combination and evaluation
//!
//! This module turns rule strings like "age > 30 AND department = 'Sales'"
//! into an AST and evaluates that tree against a record of attributes.

mod ast;
pub mod cache;
mod combiner;
mod evaluator;
pub mod parser;
pub mod tokenizer;
mod view;


pub use ast::*;
pub use cache::*;
pub use combiner::*;
pub use evaluator::*;
pub use parser::*;
pub use view::*;
