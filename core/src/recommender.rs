use crate::error::{CoreError, Result};
use crate::index::{Corpus, DocId};
use crate::resolver::resolve_title;
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::TfidfVectorizer;
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub doc_id: DocId,
    pub title: String,
    pub score: f32,
}

/// Read-only query context built once at startup and shared by every request.
#[derive(Debug)]
pub struct Recommender {
    corpus: Corpus,
    titles_lower: Vec<String>,
    similarity: SimilarityMatrix,
    vectorizer: TfidfVectorizer,
}

impl Recommender {
    pub fn new(corpus: Corpus, similarity: SimilarityMatrix, vectorizer: TfidfVectorizer) -> Result<Self> {
        if corpus.len() != similarity.dim() || !similarity.is_well_formed() {
            return Err(CoreError::ArtifactCorruption(format!(
                "corpus has {} movies but similarity matrix is {}x{}",
                corpus.len(),
                similarity.dim(),
                similarity.dim()
            )));
        }
        let titles_lower = corpus.lowercase_titles();
        Ok(Self { corpus, titles_lower, similarity, vectorizer })
    }

    pub fn len(&self) -> usize { self.corpus.len() }

    pub fn is_empty(&self) -> bool { self.corpus.is_empty() }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn similarity(&self) -> &SimilarityMatrix { &self.similarity }

    pub fn vectorizer(&self) -> &TfidfVectorizer { &self.vectorizer }

    pub fn resolve(&self, query: &str) -> Result<DocId> {
        resolve_title(query, &self.titles_lower)
    }

    /// Top `top_n` neighbours of `idx`, score descending then index ascending; `idx` itself excluded.
    pub fn rank(&self, idx: DocId, top_n: usize) -> Result<Vec<(DocId, f32)>> {
        if top_n == 0 {
            return Err(CoreError::InvalidArgument("top_n must be at least 1".into()));
        }
        let row = self
            .similarity
            .row(idx)
            .ok_or_else(|| CoreError::InvalidArgument(format!("index {idx} out of range")))?;
        let mut scored: Vec<(DocId, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != idx)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(top_n);
        Ok(scored)
    }

    pub fn recommend_scored(&self, title: &str, top_n: usize) -> Result<Vec<Recommendation>> {
        let idx = self.resolve(title)?;
        self.rank(idx, top_n)?
            .into_iter()
            .map(|(doc_id, score)| {
                let rec = self
                    .corpus
                    .get(doc_id)
                    .ok_or_else(|| CoreError::ArtifactCorruption(format!("missing movie {doc_id}")))?;
                Ok(Recommendation { doc_id, title: rec.title.clone(), score })
            })
            .collect()
    }

    /// Titles of the `top_n` movies most similar to the one `title` resolves to.
    pub fn recommend(&self, title: &str, top_n: usize) -> Result<Vec<String>> {
        Ok(self.recommend_scored(title, top_n)?.into_iter().map(|r| r.title).collect())
    }
}
