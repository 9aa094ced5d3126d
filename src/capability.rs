//! Capability contracts untuk model yang dipersist lewat envelope
//!
//! Hanya bentuk interface; algoritmanya ada di crate konsumen. Semua trait
//! punya [`Persistable`] sebagai supertrait, jadi `&dyn LanguageModel` bisa
//! langsung dikirim ke [`serialize_interface`](crate::envelope::serialize_interface).

use crate::registry::Persistable;

/// Hasil lookup spell-check / prefix
pub trait SimilarityNode {
    fn word(&self) -> &str;

    /// Semakin besar semakin dekat
    fn similarity(&self) -> f64;
}

/// Iterator lazy, finite, tidak bisa di-restart setelah dikonsumsi
pub type SimilarityIter<'a> = Box<dyn Iterator<Item = Box<dyn SimilarityNode>> + 'a>;

pub trait LanguageModel: Persistable {
    /// Skor sebuah n-gram
    fn evaluate(&self, ngram: &[String]) -> f64;
}

pub trait NextWordModel: Persistable {
    /// Kandidat kata berikutnya
    fn next_word(&self, ngram: &[String]) -> Vec<String>;
}

pub trait PrefixLookup: Persistable {
    fn prefix_lookup(&self, prefix: &str, max_results: usize) -> SimilarityIter<'_>;
}

pub trait SpellCheck: Persistable {
    fn lookup(&self, word: &str, max_results: usize) -> SimilarityIter<'_>;
}

pub trait StringMetric: Persistable {
    /// Similarity antara dua string, dalam `[0, 1]`; lebih besar = lebih dekat
    fn similarity(&self, x: &str, y: &str) -> f64;
}
