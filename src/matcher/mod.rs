//! Tariff name matching
//!
//! Every input is scored against every reference name by TF-IDF cosine
//! similarity; the first reference with the highest score wins.

mod tfidf;
mod types;

pub use tfidf::{tokenize, SparseVector, TfidfVectorizer};
pub use types::BestMatch;

use crate::error::{MapperError, Result};
use crate::reference::ReferenceMap;
use rayon::prelude::*;
use snomed_mapper_common::TariffMatch;

pub struct Matcher {
    reference: ReferenceMap,
    /// Lower-cased reference names, reported as `matched_name`
    names: Vec<String>,
    vectorizer: TfidfVectorizer,
    /// term index -> (reference index, weight)
    postings: Vec<Vec<(usize, f64)>>,
}

impl Matcher {
    pub fn new(reference: ReferenceMap) -> Result<Self> {
        if reference.is_empty() {
            return Err(MapperError::InvalidReference("the reference map is empty".into()));
        }

        let names: Vec<String> = reference
            .entries()
            .iter()
            .map(|e| e.tariff_name.to_lowercase())
            .collect();
        let vectorizer = TfidfVectorizer::fit(&names);
        if vectorizer.vocabulary_len() == 0 {
            return Err(MapperError::InvalidReference(
                "reference names contain no usable words".into(),
            ));
        }

        let mut postings = vec![Vec::new(); vectorizer.vocabulary_len()];
        for (doc, name) in names.iter().enumerate() {
            for &(term, weight) in vectorizer.transform(name).entries() {
                postings[term].push((doc, weight));
            }
        }

        Ok(Self {
            reference,
            names,
            vectorizer,
            postings,
        })
    }

    pub fn reference_len(&self) -> usize {
        self.names.len()
    }

    /// Best reference row for `name` (ties go to the lowest index)
    pub fn best_match(&self, name: &str) -> BestMatch {
        let query = self.vectorizer.transform(&name.trim().to_lowercase());

        let mut scores = vec![0.0f64; self.names.len()];
        for &(term, weight) in query.entries() {
            for &(doc, doc_weight) in &self.postings[term] {
                scores[doc] += weight * doc_weight;
            }
        }

        let mut best = BestMatch { index: 0, score: scores[0] };
        for (index, &score) in scores.iter().enumerate().skip(1) {
            if score > best.score {
                best = BestMatch { index, score };
            }
        }
        best.score = best.score.clamp(0.0, 1.0);
        best
    }

    /// Match each name, echoing the raw input in `input_name`
    pub fn match_names(&self, names: &[String]) -> Result<Vec<TariffMatch>> {
        if names.is_empty() {
            return Err(MapperError::EmptyNameList);
        }

        let results = names
            .par_iter()
            .map(|name| self.to_tariff_match(name, self.best_match(name)))
            .collect();
        Ok(results)
    }

    pub fn to_tariff_match(&self, input_name: &str, best: BestMatch) -> TariffMatch {
        let entry = &self.reference.entries()[best.index];
        TariffMatch {
            input_name: input_name.to_string(),
            matched_name: self.names[best.index].clone(),
            snomed_code: entry.snomed_code.clone(),
            snomed_description: entry.snomed_description.clone(),
            similarity_score: best.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::RawRecord;

    fn record(name: &str, code: &str, desc: &str) -> RawRecord {
        RawRecord {
            tariff_name: Some(name.into()),
            snomed_code: Some(code.into()),
            snomed_description: Some(desc.into()),
        }
    }

    fn sample_matcher() -> Matcher {
        let reference = ReferenceMap::from_records(vec![
            record("Full Blood Count", "26604007", "Complete blood count"),
            record("Blood Sugar Random", "33747003", "Glucose measurement, blood"),
            record("Chest X-Ray", "399208008", "Plain chest X-ray"),
            record("Malaria Parasite Test", "104155006", "Malaria smear"),
        ]);
        Matcher::new(reference).unwrap()
    }

    #[test]
    fn test_exact_name_scores_one() {
        let matcher = sample_matcher();
        let results = matcher.match_names(&["Chest X-Ray".to_string()]).unwrap();
        assert_eq!(results[0].matched_name, "chest x-ray");
        assert_eq!(results[0].snomed_code, "399208008");
        assert!((results[0].similarity_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_name_picks_closest() {
        let matcher = sample_matcher();
        let results = matcher.match_names(&["  random blood sugar ".to_string()]).unwrap();
        assert_eq!(results[0].input_name, "  random blood sugar ");
        assert_eq!(results[0].snomed_code, "33747003");
        assert!(results[0].similarity_score > 0.9);
    }

    #[test]
    fn test_unknown_words_fall_back_to_first_reference() {
        let matcher = sample_matcher();
        let best = matcher.best_match("ultrasound pelvis");
        assert_eq!(best, BestMatch { index: 0, score: 0.0 });
    }

    #[test]
    fn test_results_keep_input_order() {
        let matcher = sample_matcher();
        let names: Vec<String> = vec!["malaria test", "full blood count", "chest xray"]
            .into_iter()
            .map(String::from)
            .collect();
        let results = matcher.match_names(&names).unwrap();
        let inputs: Vec<&str> = results.iter().map(|r| r.input_name.as_str()).collect();
        assert_eq!(inputs, vec!["malaria test", "full blood count", "chest xray"]);
        assert_eq!(results[0].snomed_code, "104155006");
        assert_eq!(results[1].snomed_code, "26604007");
    }

    #[test]
    fn test_empty_list_rejected() {
        let matcher = sample_matcher();
        let err = matcher.match_names(&[]).unwrap_err();
        assert!(matches!(err, MapperError::EmptyNameList));
    }

    #[test]
    fn test_empty_reference_rejected() {
        assert!(Matcher::new(ReferenceMap::default()).is_err());
        let single_chars = ReferenceMap::from_records(vec![record("x", "1", "y")]);
        assert!(Matcher::new(single_chars).is_err());
    }
}
