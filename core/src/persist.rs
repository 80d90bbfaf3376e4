use crate::error::{CoreError, Result};
use crate::index::Corpus;
use crate::loader::load_dataset;
use crate::recommender::Recommender;
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::{TfidfVectorizer, VectorizerConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub vocab_size: usize,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn corpus(&self) -> PathBuf { self.root.join("corpus.bin") }
    fn vectorizer(&self) -> PathBuf { self.root.join("vectorizer.bin") }
    fn similarity(&self) -> PathBuf { self.root.join("similarity.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// True when every artifact file exists. Says nothing about whether they decode.
    pub fn is_complete(&self) -> bool {
        [self.corpus(), self.vectorizer(), self.similarity(), self.meta()]
            .iter()
            .all(|p| p.is_file())
    }
}

fn save_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn load_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

/// Persist the three artifacts, then `meta.json` last so a half-written set is never complete.
pub fn save_artifacts(paths: &IndexPaths, corpus: &Corpus, matrix: &SimilarityMatrix, vectorizer: &TfidfVectorizer) -> Result<()> {
    create_dir_all(&paths.root)?;
    let _ = std::fs::remove_file(paths.meta());
    save_bin(&paths.corpus(), corpus)?;
    save_bin(&paths.vectorizer(), vectorizer)?;
    save_bin(&paths.similarity(), matrix)?;
    let meta = MetaFile {
        num_docs: corpus.len(),
        vocab_size: vectorizer.vocab_size(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: FORMAT_VERSION,
    };
    save_meta(paths, &meta)
}

/// Load a complete artifact set. Anything missing, undecodable or inconsistent is
/// reported as `ArtifactCorruption`.
pub fn load_artifacts(paths: &IndexPaths) -> Result<(Corpus, SimilarityMatrix, TfidfVectorizer)> {
    let corrupt = |what: &str, e: CoreError| CoreError::ArtifactCorruption(format!("{what}: {e}"));
    let meta = load_meta(paths).map_err(|e| corrupt("meta.json", e))?;
    if meta.version != FORMAT_VERSION {
        return Err(CoreError::ArtifactCorruption(format!(
            "format version {} (expected {FORMAT_VERSION})",
            meta.version
        )));
    }
    let corpus: Corpus = load_bin(&paths.corpus()).map_err(|e| corrupt("corpus.bin", e))?;
    let vectorizer: TfidfVectorizer = load_bin(&paths.vectorizer()).map_err(|e| corrupt("vectorizer.bin", e))?;
    let matrix: SimilarityMatrix = load_bin(&paths.similarity()).map_err(|e| corrupt("similarity.bin", e))?;
    if corpus.len() != meta.num_docs
        || matrix.dim() != meta.num_docs
        || !matrix.is_well_formed()
        || vectorizer.vocab_size() != meta.vocab_size
    {
        return Err(CoreError::ArtifactCorruption(format!(
            "inconsistent artifact set: meta={} corpus={} matrix={}",
            meta.num_docs,
            corpus.len(),
            matrix.dim()
        )));
    }
    Ok((corpus, matrix, vectorizer))
}

/// Run loader, vectorizer and similarity build over a dataset file.
pub fn build_artifacts<P: AsRef<Path>>(dataset: P, config: VectorizerConfig) -> Result<(Corpus, SimilarityMatrix, TfidfVectorizer)> {
    let start = Instant::now();
    let corpus = load_dataset(dataset)?;
    let (vectorizer, rows) = TfidfVectorizer::fit_transform(config, &corpus.tags())?;
    let matrix = SimilarityMatrix::from_rows(&rows);
    tracing::info!(
        num_movies = corpus.len(),
        vocab_size = vectorizer.vocab_size(),
        took_s = start.elapsed().as_secs_f64(),
        "built similarity index"
    );
    Ok((corpus, matrix, vectorizer))
}

/// Startup phase producing the shared query context: load from cache or rebuild and persist.
pub struct IndexCache {
    paths: IndexPaths,
    dataset: PathBuf,
    config: VectorizerConfig,
}

impl IndexCache {
    pub fn new<P: AsRef<Path>, D: AsRef<Path>>(cache_dir: P, dataset: D) -> Self {
        Self {
            paths: IndexPaths::new(cache_dir),
            dataset: dataset.as_ref().to_path_buf(),
            config: VectorizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: VectorizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn paths(&self) -> &IndexPaths { &self.paths }

    /// Use the cached artifact set when complete and consistent; otherwise rebuild from the
    /// dataset and persist. A failed write is logged and the freshly built index still served.
    pub fn open_or_build(&self) -> Result<Recommender> {
        if self.paths.is_complete() {
            match load_artifacts(&self.paths).and_then(|(c, m, v)| Recommender::new(c, m, v)) {
                Ok(rec) => {
                    tracing::info!(cache = %self.paths.root.display(), num_movies = rec.len(), "loaded cached index");
                    return Ok(rec);
                }
                Err(e) => tracing::warn!(error = %e, "cached index unusable, rebuilding"),
            }
        } else {
            tracing::info!(cache = %self.paths.root.display(), "no cached index, building from dataset");
        }

        let (corpus, matrix, vectorizer) = build_artifacts(&self.dataset, self.config.clone())?;
        if let Err(e) = save_artifacts(&self.paths, &corpus, &matrix, &vectorizer) {
            tracing::warn!(error = %e, "failed to persist index, serving in-memory build");
        }
        Recommender::new(corpus, matrix, vectorizer)
    }
}
