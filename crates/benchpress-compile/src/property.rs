//! State shared between passes.

use benchpress_ir::QubitId;
use benchpress_target::Backend;
use rustc_hash::FxHashMap;

use crate::level::OptimizationLevel;

/// A mapping from logical qubits to physical qubits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    logical_to_physical: FxHashMap<QubitId, u32>,
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl Layout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical qubit i on physical qubit i.
    pub fn trivial(num_qubits: u32) -> Self {
        let mut layout = Self::new();
        for i in 0..num_qubits {
            layout.add(QubitId(i), i);
        }
        layout
    }

    /// Map a logical qubit to a physical qubit, dropping conflicting entries.
    pub fn add(&mut self, logical: QubitId, physical: u32) {
        if let Some(&old_logical) = self.physical_to_logical.get(&physical) {
            if old_logical != logical {
                self.logical_to_physical.remove(&old_logical);
            }
        }
        if let Some(&old_physical) = self.logical_to_physical.get(&logical) {
            if old_physical != physical {
                self.physical_to_logical.remove(&old_physical);
            }
        }
        self.logical_to_physical.insert(logical, physical);
        self.physical_to_logical.insert(physical, logical);
    }

    /// Physical qubit holding a logical qubit.
    pub fn get_physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Logical qubit on a physical qubit.
    pub fn get_logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Exchange the contents of two physical qubits.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.remove(&p1);
        let l2 = self.physical_to_logical.remove(&p2);
        if let Some(l1) = l1 {
            self.logical_to_physical.insert(l1, p2);
            self.physical_to_logical.insert(p2, l1);
        }
        if let Some(l2) = l2 {
            self.logical_to_physical.insert(l2, p1);
            self.physical_to_logical.insert(p1, l2);
        }
    }

    /// Number of mapped qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Whether nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }
}

/// Properties read and written by passes during one compilation.
#[derive(Debug, Clone)]
pub struct PropertySet<'a> {
    /// The compilation target.
    pub target: &'a Backend,
    /// Requested effort.
    pub optimization_level: OptimizationLevel,
    /// Initial placement, set by the layout pass.
    pub layout: Option<Layout>,
    /// Placement after routing.
    pub final_layout: Option<Layout>,
}

impl<'a> PropertySet<'a> {
    /// Fresh properties for a target.
    pub fn new(target: &'a Backend, optimization_level: OptimizationLevel) -> Self {
        Self {
            target,
            optimization_level,
            layout: None,
            final_layout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_layout() {
        let layout = Layout::trivial(3);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.get_physical(QubitId(2)), Some(2));
        assert_eq!(layout.get_logical(1), Some(QubitId(1)));
    }

    #[test]
    fn test_swap_with_unmapped() {
        let mut layout = Layout::trivial(2);
        layout.swap(1, 4);
        assert_eq!(layout.get_physical(QubitId(1)), Some(4));
        assert_eq!(layout.get_logical(1), None);
        assert_eq!(layout.get_logical(4), Some(QubitId(1)));

        layout.swap(0, 4);
        assert_eq!(layout.get_physical(QubitId(0)), Some(4));
        assert_eq!(layout.get_physical(QubitId(1)), Some(0));
    }

    #[test]
    fn test_add_replaces_conflicts() {
        let mut layout = Layout::trivial(2);
        layout.add(QubitId(0), 1);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.get_logical(1), Some(QubitId(0)));
        assert_eq!(layout.get_physical(QubitId(1)), None);
    }
}
