use std::sync::Arc;

use crate::config::BattleConfig;
use crate::stats::ExpTable;

/// Id allocation and the exp curve, passed explicitly to person constructors.
///
/// Persons draw their unique `my_id` from here; the exp table is shared by
/// every person built from the same context.
#[derive(Clone, Debug)]
pub struct BattleContext {
    next_id: u32,
    exp_table: Arc<ExpTable>,
}

impl BattleContext {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            next_id: 1,
            exp_table: Arc::new(ExpTable::new(config)),
        }
    }

    /// Allocates the next unique person id.
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Shared exp curve; persons keep a handle to it.
    pub fn exp_table(&self) -> &Arc<ExpTable> {
        &self.exp_table
    }
}

impl Default for BattleContext {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = BattleContext::default();
        let a = ctx.allocate_id();
        let b = ctx.allocate_id();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }
}
