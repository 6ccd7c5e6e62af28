use std::num::NonZeroUsize;

use ndarray::Axis;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    tensor::{Tensor, TensorView},
};

/// Which full-size batches of a permuted dataset are handed out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchTail {
    /// Only batches followed by at least one more sample, `floor((N - 1) / B)` of them.
    #[default]
    ExcludeLast,
    /// Every full batch, `floor(N / B)` of them.
    DropRemainder,
}

impl BatchTail {
    /// Returns how many batches of `batch_size` samples a dataset of `len` samples yields.
    pub fn count(self, len: usize, batch_size: NonZeroUsize) -> usize {
        match self {
            BatchTail::ExcludeLast => len.saturating_sub(1) / batch_size,
            BatchTail::DropRemainder => len / batch_size,
        }
    }
}

/// A single pass over a dataset in random order.
///
/// The permutation is drawn when the iterator is created, the batches themselves are
/// gathered lazily. It cannot be restarted, a new pass needs a new `Batches`.
pub struct Batches<'a> {
    x: TensorView<'a>,
    y: TensorView<'a>,
    indices: Vec<usize>,
    batch_size: usize,
    current: usize,
    total: usize,
}

impl<'a> Batches<'a> {
    /// Creates a new `Batches` iterator.
    ///
    /// # Arguments
    /// * `x` - The inputs, samples on the first axis.
    /// * `y` - The targets, as many samples as `x`.
    /// * `batch_size` - The amount of samples per batch.
    /// * `tail` - Which batches are yielded.
    /// * `rng` - The source of the permutation.
    ///
    /// # Returns
    /// An error if `x` and `y` disagree on the amount of samples.
    pub fn new<R: Rng + ?Sized>(
        x: TensorView<'a>,
        y: TensorView<'a>,
        batch_size: NonZeroUsize,
        tail: BatchTail,
        rng: &mut R,
    ) -> Result<Self> {
        if x.ndim() == 0 {
            return Err(MlErr::shape("inputs", x.shape(), &[0]));
        }

        if y.ndim() == 0 {
            return Err(MlErr::shape("targets", y.shape(), &[0]));
        }

        let len = x.len_of(Axis(0));
        let y_len = y.len_of(Axis(0));
        if y_len != len {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "inputs",
                got: y_len,
                expected: len,
            });
        }

        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(rng);

        Ok(Self {
            x,
            y,
            indices,
            batch_size: batch_size.get(),
            current: 0,
            total: tail.count(len, batch_size),
        })
    }
}

impl Iterator for Batches<'_> {
    type Item = (Tensor, Tensor);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.total {
            return None;
        }

        let start = self.current * self.batch_size;
        let idx = &self.indices[start..start + self.batch_size];
        self.current += 1;

        Some((self.x.select(Axis(0), idx), self.y.select(Axis(0), idx)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.current;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Batches<'_> {}
