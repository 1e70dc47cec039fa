use crate::utils::error::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

/// 一個存放名單與紀錄檔的目錄
pub trait RecordStore {
    /// Where the records live, for messages and logs.
    fn location(&self) -> &Path;

    /// File names carrying `.{extension}`, sorted by name.
    fn list(&self, extension: &str) -> Result<Vec<String>>;

    fn read_lines(&self, name: &str) -> Result<Vec<String>>;

    /// Creates `name` with `contents`. Must fail rather than overwrite an
    /// existing file, and must not leave a partial file behind on failure.
    fn create(&self, name: &str, contents: &str) -> Result<()>;
}

/// 選擇時使用的隨機來源
pub trait RandomSource {
    /// Uniform integer in `[0, upper]`.
    fn salt(&mut self, upper: i64) -> i64;

    /// Uniform random permutation of `items`.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn salt(&mut self, upper: i64) -> i64 {
        self.0.random_range(0..=upper.max(0))
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}
