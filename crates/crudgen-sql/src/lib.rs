mod token;
pub(crate) use token::{lex, Token};

mod parser;
pub use parser::parse;
