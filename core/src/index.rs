use serde::{Deserialize, Serialize};

pub type DocId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Lowercased cast, crew, genre names and overview, space separated.
    pub tags: String,
}

/// Ordered movie records. Position `i` is row/column `i` of the similarity matrix,
/// so records are never reordered or removed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<MovieRecord>,
}

impl Corpus {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<&MovieRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn tags(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.tags.as_str()).collect()
    }

    /// Titles lowercased, in corpus order.
    pub fn lowercase_titles(&self) -> Vec<String> {
        self.records.iter().map(|r| r.title.to_lowercase()).collect()
    }
}

impl FromIterator<MovieRecord> for Corpus {
    fn from_iter<I: IntoIterator<Item = MovieRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
