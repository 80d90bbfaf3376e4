pub mod error;
pub mod index;
pub mod loader;
pub mod persist;
pub mod recommender;
pub mod resolver;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use error::{CoreError, Result};
pub use index::{Corpus, DocId, MovieRecord};
pub use persist::{IndexCache, IndexPaths};
pub use recommender::{Recommendation, Recommender, DEFAULT_TOP_N};
pub use similarity::SimilarityMatrix;
pub use vectorizer::{TfidfVectorizer, VectorizerConfig};
