//! Funder registry: the five reward-funding slots embedded in the pool record.
//!
//! Slots are positional. Adding fills the first empty slot, removing resets a
//! slot to the sentinel in place; entries never move.

use solana_program::{msg, pubkey::Pubkey};

use crate::constants::MAX_FUNDERS;
use crate::error::{Result, StakingSdkError};
use crate::state::PoolRecord;

/// Marks an empty funder slot.
pub const SENTINEL: Pubkey = Pubkey::new_from_array([0u8; 32]);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FunderRegistry {
    slots: [Pubkey; MAX_FUNDERS],
}

impl FunderRegistry {
    pub fn from_slots(slots: [Pubkey; MAX_FUNDERS]) -> Self {
        Self { slots }
    }

    pub fn into_slots(self) -> [Pubkey; MAX_FUNDERS] {
        self.slots
    }

    /// Index of `funder` among occupied slots.
    pub fn position(&self, funder: &Pubkey) -> Option<usize> {
        if *funder == SENTINEL {
            return None;
        }
        self.slots.iter().position(|slot| slot == funder)
    }

    pub fn contains(&self, funder: &Pubkey) -> bool {
        self.position(funder).is_some()
    }

    /// Occupied slots with their indices, in slot order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Pubkey)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot != SENTINEL)
    }

    pub fn len(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| *slot != SENTINEL)
    }

    /// Place `funder` in the first empty slot and return its index.
    pub fn add(&mut self, funder: &Pubkey) -> Result<usize> {
        if *funder == SENTINEL {
            msg!("StakingSdkError::InvalidFunder");
            return Err(StakingSdkError::InvalidFunder);
        }
        if self.contains(funder) {
            msg!("StakingSdkError::DuplicateFunder");
            return Err(StakingSdkError::DuplicateFunder);
        }
        let idx = self
            .slots
            .iter()
            .position(|slot| *slot == SENTINEL)
            .ok_or_else(|| {
                msg!("StakingSdkError::RegistryFull");
                StakingSdkError::RegistryFull
            })?;
        self.slots[idx] = *funder;
        Ok(idx)
    }

    /// Reset the slot holding `funder` to the sentinel and return its index.
    pub fn remove(&mut self, funder: &Pubkey) -> Result<usize> {
        if *funder == SENTINEL {
            msg!("StakingSdkError::InvalidFunder");
            return Err(StakingSdkError::InvalidFunder);
        }
        let idx = self.position(funder).ok_or_else(|| {
            msg!("StakingSdkError::FunderNotFound");
            StakingSdkError::FunderNotFound
        })?;
        self.slots[idx] = SENTINEL;
        Ok(idx)
    }
}

// ---------------------------------------------------------------------------
// Pool-level rules
// ---------------------------------------------------------------------------

impl PoolRecord {
    pub fn funder_registry(&self) -> FunderRegistry {
        FunderRegistry::from_slots(self.funders)
    }

    /// The owner is always authorized; otherwise the wallet must hold a slot.
    pub fn is_authorized_funder(&self, wallet: &Pubkey) -> bool {
        *wallet == self.owner_wallet || self.funder_registry().contains(wallet)
    }

    /// Register `funder`. The owner counts as already present.
    pub fn add_funder(&mut self, funder: &Pubkey) -> Result<usize> {
        if *funder == self.owner_wallet {
            msg!("StakingSdkError::DuplicateFunder");
            return Err(StakingSdkError::DuplicateFunder);
        }
        let mut registry = self.funder_registry();
        let idx = registry.add(funder)?;
        self.funders = registry.into_slots();
        Ok(idx)
    }

    pub fn remove_funder(&mut self, funder: &Pubkey) -> Result<usize> {
        if *funder == self.owner_wallet {
            msg!("StakingSdkError::CannotRemoveOwner");
            return Err(StakingSdkError::CannotRemoveOwner);
        }
        let mut registry = self.funder_registry();
        let idx = registry.remove(funder)?;
        self.funders = registry.into_slots();
        Ok(idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_owner() -> PoolRecord {
        PoolRecord {
            owner_wallet: Pubkey::new_unique(),
            ..PoolRecord::default()
        }
    }

    #[test]
    fn test_sentinel_is_default_pubkey() {
        assert_eq!(SENTINEL, Pubkey::default());
    }

    #[test]
    fn test_add_fills_first_empty_slot() {
        let mut pool = pool_with_owner();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_eq!(pool.add_funder(&a).unwrap(), 0);
        assert_eq!(pool.add_funder(&b).unwrap(), 1);
        assert_eq!(pool.funders[0], a);
        assert_eq!(pool.funders[1], b);
        assert_eq!(pool.funder_registry().len(), 2);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut pool = pool_with_owner();
        let a = Pubkey::new_unique();
        pool.add_funder(&a).unwrap();
        assert_eq!(pool.add_funder(&a).unwrap_err(), StakingSdkError::DuplicateFunder);
    }

    #[test]
    fn test_add_owner_fails_as_duplicate() {
        let mut pool = pool_with_owner();
        let owner = pool.owner_wallet;
        assert_eq!(
            pool.add_funder(&owner).unwrap_err(),
            StakingSdkError::DuplicateFunder
        );
    }

    #[test]
    fn test_add_sixth_fails() {
        let mut pool = pool_with_owner();
        for _ in 0..MAX_FUNDERS {
            pool.add_funder(&Pubkey::new_unique()).unwrap();
        }
        assert!(pool.funder_registry().is_full());
        assert_eq!(
            pool.add_funder(&Pubkey::new_unique()).unwrap_err(),
            StakingSdkError::RegistryFull
        );
    }

    #[test]
    fn test_duplicate_checked_before_capacity() {
        let mut pool = pool_with_owner();
        let keys: Vec<Pubkey> = (0..MAX_FUNDERS).map(|_| Pubkey::new_unique()).collect();
        for k in &keys {
            pool.add_funder(k).unwrap();
        }
        assert_eq!(
            pool.add_funder(&keys[3]).unwrap_err(),
            StakingSdkError::DuplicateFunder
        );
    }

    #[test]
    fn test_remove_keeps_positions() {
        let mut pool = pool_with_owner();
        let keys: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        for k in &keys {
            pool.add_funder(k).unwrap();
        }

        assert_eq!(pool.remove_funder(&keys[1]).unwrap(), 1);
        assert_eq!(pool.funders[0], keys[0]);
        assert_eq!(pool.funders[1], SENTINEL);
        assert_eq!(pool.funders[2], keys[2]);
        assert_eq!(pool.funders[3], keys[3]);
        assert_eq!(pool.funders[4], SENTINEL);

        // The hole is reused before the tail slot
        let e = Pubkey::new_unique();
        assert_eq!(pool.add_funder(&e).unwrap(), 1);
        assert_eq!(pool.funders[2], keys[2]);
    }

    #[test]
    fn test_remove_absent_fails() {
        let mut pool = pool_with_owner();
        assert_eq!(
            pool.remove_funder(&Pubkey::new_unique()).unwrap_err(),
            StakingSdkError::FunderNotFound
        );
    }

    #[test]
    fn test_remove_owner_fails() {
        let mut pool = pool_with_owner();
        let owner = pool.owner_wallet;
        assert_eq!(
            pool.remove_funder(&owner).unwrap_err(),
            StakingSdkError::CannotRemoveOwner
        );
    }

    #[test]
    fn test_sentinel_never_registered() {
        let mut registry = FunderRegistry::default();
        assert_eq!(registry.add(&SENTINEL).unwrap_err(), StakingSdkError::InvalidFunder);
        assert_eq!(registry.remove(&SENTINEL).unwrap_err(), StakingSdkError::InvalidFunder);
        assert!(!registry.contains(&SENTINEL));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_is_authorized_funder() {
        let mut pool = pool_with_owner();
        let owner = pool.owner_wallet;
        let funder = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();

        assert!(pool.is_authorized_funder(&owner));
        assert!(!pool.is_authorized_funder(&funder));

        pool.add_funder(&funder).unwrap();
        assert!(pool.is_authorized_funder(&funder));
        assert!(!pool.is_authorized_funder(&stranger));
        assert!(!pool.is_authorized_funder(&SENTINEL));

        pool.remove_funder(&funder).unwrap();
        assert!(!pool.is_authorized_funder(&funder));
    }

    #[test]
    fn test_occupied_iterates_in_slot_order() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let registry = FunderRegistry::from_slots([SENTINEL, a, SENTINEL, b, SENTINEL]);
        let occupied: Vec<(usize, Pubkey)> = registry.occupied().map(|(i, k)| (i, *k)).collect();
        assert_eq!(occupied, vec![(1, a), (3, b)]);
    }
}
