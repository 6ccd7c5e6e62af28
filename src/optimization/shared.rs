use std::{cell::RefCell, fmt, rc::Rc};

use super::{Optimizer, ParamId};
use crate::{
    Result,
    tensor::{TensorView, TensorViewMut},
};

struct Slot {
    optimizer: Box<dyn Optimizer>,
    next_id: usize,
    released: Vec<ParamId>,
}

/// A handle to an optimizer shared by every layer of a network.
///
/// Layers bind a clone of this handle when they are initialized and register each of
/// their parameter tensors to get a `ParamId`, under which the optimizer keeps that
/// tensor's state. Ids given back with `release` are handed out again.
#[derive(Clone)]
pub struct SharedOptimizer {
    slot: Rc<RefCell<Slot>>,
}

impl SharedOptimizer {
    /// Wraps `optimizer` in a new shared handle.
    pub fn new<O: Optimizer + 'static>(optimizer: O) -> Self {
        Self::from_boxed(Box::new(optimizer))
    }

    pub fn from_boxed(optimizer: Box<dyn Optimizer>) -> Self {
        let slot = Slot {
            optimizer,
            next_id: 0,
            released: Vec::new(),
        };

        Self {
            slot: Rc::new(RefCell::new(slot)),
        }
    }

    /// Hands out an identity no live parameter tensor is using.
    pub fn register(&self) -> ParamId {
        let mut slot = self.slot.borrow_mut();
        if let Some(id) = slot.released.pop() {
            return id;
        }

        let id = ParamId(slot.next_id);
        slot.next_id += 1;
        id
    }

    /// Gives `id` back, dropping the optimizer's state for it.
    pub fn release(&self, id: ParamId) {
        // Nothing to clean up if the handle is mid `step`.
        if let Ok(mut slot) = self.slot.try_borrow_mut() {
            slot.optimizer.forget(id);
            slot.released.push(id);
        }
    }

    /// Updates the parameters registered under `id`.
    pub fn step(&self, id: ParamId, params: TensorViewMut, grad: TensorView) -> Result<()> {
        self.slot.borrow_mut().optimizer.update_params(id, params, grad)
    }

    /// Returns the amount of parameter tensors currently registered.
    pub fn registered(&self) -> usize {
        let slot = self.slot.borrow();
        slot.next_id - slot.released.len()
    }
}

impl fmt::Debug for SharedOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedOptimizer")
            .field("registered", &self.registered())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::GradientDescent;

    #[test]
    fn clones_share_the_id_counter() {
        let optimizer = SharedOptimizer::new(GradientDescent::new(0.1));
        let other = optimizer.clone();

        assert_eq!(optimizer.register(), ParamId(0));
        assert_eq!(other.register(), ParamId(1));
        assert_eq!(optimizer.registered(), 2);
    }

    #[test]
    fn released_ids_are_reused() {
        let optimizer = SharedOptimizer::new(GradientDescent::new(0.1));
        let a = optimizer.register();
        let b = optimizer.register();

        optimizer.release(a);
        assert_eq!(optimizer.registered(), 1);
        assert_eq!(optimizer.register(), a);
        assert_ne!(a, b);
        assert_eq!(optimizer.registered(), 2);
    }
}
