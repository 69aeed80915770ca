//! TF-IDF vectorizer
//!
//! Same weighting as a default scikit-learn `TfidfVectorizer`:
//! lower-cased tokens of two or more word characters, raw counts,
//! smoothed idf `ln((1 + n) / (1 + df)) + 1`, L2-normalised rows.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};

lazy_static::lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Lower-cased tokens of `text`, in order, duplicates kept
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// L2-normalised sparse row, sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cosine of two normalised rows; `Matcher` scores through its postings instead
    #[cfg(test)]
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf from `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // sorted vocabulary keeps term indices stable across runs
        let terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for idx in unique {
                df[idx] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Weighted, normalised row for `text`; unknown tokens are ignored
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        SparseVector { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(
            tokenize("Paracetamol 500mg x 2 Tabs"),
            vec!["paracetamol", "500mg", "tabs"]
        );
        assert_eq!(tokenize("X-Ray (Chest)"), vec!["ray", "chest"]);
        assert!(tokenize("a b c").is_empty());
    }

    #[test]
    fn test_idf_smoothing() {
        let v = TfidfVectorizer::fit(&["blood count", "blood sugar"]);
        let blood = v.vocabulary["blood"];
        let count = v.vocabulary["count"];
        // n = 2: blood df = 2, count df = 1
        assert!((v.idf[blood] - 1.0).abs() < 1e-12);
        assert!((v.idf[count] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_normalised() {
        let v = TfidfVectorizer::fit(&["full blood count", "blood sugar", "chest xray"]);
        let row = v.transform("Full Blood Count blood");
        let norm: f64 = row.entries().iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tokens_give_zero_vector() {
        let v = TfidfVectorizer::fit(&["full blood count"]);
        assert!(v.transform("ultrasound pelvis").is_zero());
    }

    #[test]
    fn test_dot_of_identical_rows() {
        let v = TfidfVectorizer::fit(&["full blood count", "blood sugar"]);
        let a = v.transform("full blood count");
        assert!((a.dot(&a) - 1.0).abs() < 1e-9);
        let b = v.transform("blood sugar");
        let cross = a.dot(&b);
        assert!(cross > 0.0 && cross < 1.0);
    }
}
