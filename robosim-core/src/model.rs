use std::{collections::HashMap, sync::Mutex};

use crate::error::Error;

/// A consistent point-in-time copy of the model, taken under its lock.
#[derive(Clone, Debug)]
pub struct JointStateSnapshot {
    pub names: Vec<String>,
    pub positions: Vec<f64>,
    pub sequence: u64,
}

#[derive(Debug)]
struct ModelInner {
    names: Vec<String>,
    positions: Vec<f64>,
    sequence: u64,
}

/// The single source of truth for the simulated robot's joint positions.
///
/// The joint list is fixed at construction and defines index-to-name mapping
/// and iteration order for all reports. All access goes through methods that
/// hold the internal lock, so readers never observe a partially updated
/// position array.
#[derive(Debug)]
pub struct JointStateModel {
    inner: Mutex<ModelInner>,
}

impl JointStateModel {
    /// Creates a model with all positions at zero.
    pub fn new(names: Vec<String>) -> Self {
        let dof = names.len();
        Self {
            inner: Mutex::new(ModelInner {
                names,
                positions: vec![0.0; dof],
                sequence: 0,
            }),
        }
    }

    pub fn dof(&self) -> usize {
        self.inner.lock().unwrap().names.len()
    }

    pub fn joint_names(&self) -> Vec<String> {
        self.inner.lock().unwrap().names.clone()
    }

    pub fn snapshot(&self) -> JointStateSnapshot {
        let inner = self.inner.lock().unwrap();
        JointStateSnapshot {
            names: inner.names.clone(),
            positions: inner.positions.clone(),
            sequence: inner.sequence,
        }
    }

    /// Sets the position of every configured joint from `targets`.
    ///
    /// Fails with [`Error::NoJoint`] if any configured joint has no entry in
    /// `targets`, in which case the model is left unmodified.
    pub fn apply_targets(&self, targets: &HashMap<String, f64>) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        let mut next = Vec::with_capacity(inner.names.len());
        for name in &inner.names {
            match targets.get(name) {
                Some(position) => next.push(*position),
                None => return Err(Error::NoJoint(name.clone())),
            }
        }
        inner.positions = next;
        Ok(())
    }

    /// Advances the report sequence counter, wrapping on overflow.
    pub fn advance_sequence(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.sequence = inner.sequence.wrapping_add(1);
    }
}
