//! Tool index adapters

mod lexical;

pub use lexical::{LexicalToolIndex, cosine_similarity, tokenize};
