use crate::error::{CoreError, Result};
use crate::tokenizer::analyze;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

pub type TermId = u32;

/// Sparse row: `(term_id, weight)` sorted by term id.
pub type SparseVector = Vec<(TermId, f32)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { max_features: 5000, ngram_range: (1, 2) }
    }
}

/// TF-IDF model fitted once per corpus. Term ids index columns of every row it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, TermId>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from `documents`.
    ///
    /// Terms are ranked by their total count over the corpus (ties alphabetical) and the
    /// top `max_features` kept; kept terms get column ids in alphabetical order.
    pub fn fit<S: AsRef<str>>(config: VectorizerConfig, documents: &[S]) -> Result<Self> {
        if config.max_features == 0 {
            return Err(CoreError::InvalidArgument("max_features must be at least 1".into()));
        }
        let mut term_counts: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u32> = HashMap::new();
        for doc in documents {
            let terms = analyze(doc.as_ref(), config.ngram_range);
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *term_counts.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, u64)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(config.max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        kept.sort();

        // smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (id, term) in kept.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push((((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32);
            vocabulary.insert(term, id as TermId);
        }
        tracing::debug!(vocab_size = vocabulary.len(), num_docs = documents.len(), "fitted tf-idf vocabulary");
        Ok(Self { config, vocabulary, idf })
    }

    /// L2-normalised tf-idf row for `text`. Documents with no known terms give an empty row.
    pub fn transform_one(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in analyze(text, self.config.ngram_range) {
            if let Some(&tid) = self.vocabulary.get(&term) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        let mut row: SparseVector = counts
            .into_iter()
            .map(|(tid, tf)| (tid, tf as f32 * self.idf[tid as usize]))
            .collect();
        let norm = row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in row.iter_mut() { *w /= norm; }
        }
        row
    }

    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents.iter().map(|d| self.transform_one(d.as_ref())).collect()
    }

    pub fn fit_transform<S: AsRef<str>>(config: VectorizerConfig, documents: &[S]) -> Result<(Self, Vec<SparseVector>)> {
        let model = Self::fit(config, documents)?;
        let rows = model.transform(documents);
        Ok((model, rows))
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, TermId> { &self.vocabulary }

    pub fn vocab_size(&self) -> usize { self.vocabulary.len() }

    pub fn config(&self) -> &VectorizerConfig { &self.config }
}
