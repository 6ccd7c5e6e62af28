use std::{fs, path::Path};

use ndarray::{Array2, Axis, s};

use crate::{
    MlErr, Result,
    specs::DatasetSpec,
    tensor::{Tensor, TensorView},
};

/// An in-memory set of samples, inputs and targets paired along their first axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Tensor,
    y: Tensor,
}

impl Dataset {
    /// Creates a new `Dataset` from its inputs and targets.
    ///
    /// # Returns
    /// An error if either tensor is a scalar or they hold different amounts of samples.
    pub fn new(x: Tensor, y: Tensor) -> Result<Self> {
        for (what, t) in [("inputs", &x), ("targets", &y)] {
            if t.ndim() == 0 {
                return Err(MlErr::shape(what, t.shape(), &[0]));
            }
        }

        let (len, y_len) = (x.len_of(Axis(0)), y.len_of(Axis(0)));
        if len != y_len {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "inputs",
                got: y_len,
                expected: len,
            });
        }

        Ok(Self { x, y })
    }

    /// Creates a new `Dataset` from row-major samples, each made of `x_size` inputs
    /// followed by `y_size` targets.
    pub fn from_rows(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(MlErr::InvalidConfig(format!(
                "dataset rows need inputs and targets, got x_size {x_size} and y_size {y_size}"
            )));
        }

        let row = x_size + y_size;
        if data.len() % row != 0 {
            return Err(MlErr::SizeMismatch {
                a: "data",
                b: "row size",
                got: data.len(),
                expected: data.len() / row * row,
            });
        }

        let len = data.len() / row;
        let rows = Array2::from_shape_vec((len, row), data)
            .map_err(|e| MlErr::InvalidConfig(e.to_string()))?;

        let x = rows.slice(s![.., ..x_size]).to_owned().into_dyn();
        let y = rows.slice(s![.., x_size..]).to_owned().into_dyn();
        Self::new(x, y)
    }

    /// Reads row-major samples from a text file of numbers separated by commas or
    /// whitespace.
    pub fn load<P: AsRef<Path>>(path: P, x_size: usize, y_size: usize) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let data = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|e| MlErr::InvalidConfig(format!("bad number `{token}` in dataset: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rows(data, x_size, y_size)
    }

    pub fn from_spec(spec: &DatasetSpec) -> Result<Self> {
        match spec {
            DatasetSpec::Inline {
                data,
                x_size,
                y_size,
            } => Self::from_rows(data.clone(), *x_size, *y_size),
            DatasetSpec::Local {
                path,
                x_size,
                y_size,
            } => Self::load(path, *x_size, *y_size),
        }
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.x.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn x(&self) -> TensorView<'_> {
        self.x.view()
    }

    pub fn y(&self) -> TensorView<'_> {
        self.y.view()
    }
}
