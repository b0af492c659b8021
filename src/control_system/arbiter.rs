// Weight-based arbitration. Everything here is pure: a fresh table is built
// from a network snapshot on every controller tick.

use std::collections::HashMap;

use crate::control_system::signal::SignalId;
use crate::global_variables::{CAR_WEIGHT, PEDESTRIAN_WEIGHT};
use crate::network::pairing::Pairing;
use crate::shared_data::SignalSnapshot;

/// Per-arrival weights used to score demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightPolicy {
    pub car_weight: u64,
    pub pedestrian_weight: u64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            car_weight: CAR_WEIGHT,
            pedestrian_weight: PEDESTRIAN_WEIGHT,
        }
    }
}

impl WeightPolicy {
    pub fn new(car_weight: u64, pedestrian_weight: u64) -> Self {
        Self {
            car_weight,
            pedestrian_weight,
        }
    }

    pub fn weight(&self, snapshot: &SignalSnapshot) -> u64 {
        snapshot
            .cars_waiting
            .saturating_mul(self.car_weight)
            .saturating_add(snapshot.pedestrians_waiting.saturating_mul(self.pedestrian_weight))
    }
}

/// Own weight plus the partner's weight when paired.
pub fn effective_weight(
    policy: &WeightPolicy,
    own: &SignalSnapshot,
    partner: Option<&SignalSnapshot>,
) -> u64 {
    let own_weight = policy.weight(own);
    match partner {
        Some(partner) => own_weight.saturating_add(policy.weight(partner)),
        None => own_weight,
    }
}

/// Effective weight of every signal, in network order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeightTable {
    entries: Vec<(SignalId, u64)>,
}

impl WeightTable {
    pub fn build(snapshots: &[SignalSnapshot], pairing: &Pairing, policy: &WeightPolicy) -> Self {
        let by_id: HashMap<SignalId, &SignalSnapshot> =
            snapshots.iter().map(|snapshot| (snapshot.id, snapshot)).collect();

        let entries = snapshots
            .iter()
            .map(|snapshot| {
                let partner = pairing
                    .partner_of(snapshot.id)
                    .and_then(|partner| by_id.get(&partner).copied());
                (snapshot.id, effective_weight(policy, snapshot, partner))
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[(SignalId, u64)] {
        &self.entries
    }

    pub fn get(&self, id: SignalId) -> Option<u64> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, weight)| *weight)
    }

    pub fn max_weight(&self) -> Option<u64> {
        self.entries.iter().map(|(_, weight)| *weight).max()
    }
}

/// True iff `id` holds the network-wide maximum effective weight. Every
/// signal tied at the maximum is eligible; there is no tie-break.
pub fn should_switch(id: SignalId, table: &WeightTable) -> bool {
    match (table.get(id), table.max_weight()) {
        (Some(weight), Some(max_weight)) => weight == max_weight,
        _ => false,
    }
}

/// Every signal `should_switch` would accept, in network order.
pub fn eligible(table: &WeightTable) -> Vec<SignalId> {
    table
        .entries()
        .iter()
        .filter(|(id, _)| should_switch(*id, table))
        .map(|(id, _)| *id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_system::signal::LightState;

    fn snap(id: u32, cars: u64, pedestrians: u64) -> SignalSnapshot {
        SignalSnapshot::new(SignalId(id), LightState::Red, cars, pedestrians)
    }

    #[test]
    fn test_weight_is_four_per_car_plus_one_per_pedestrian() {
        let policy = WeightPolicy::default();
        for cars in 0..6 {
            for pedestrians in 0..6 {
                assert_eq!(policy.weight(&snap(1, cars, pedestrians)), 4 * cars + pedestrians);
            }
        }
    }

    #[test]
    fn test_custom_policy() {
        let policy = WeightPolicy::new(2, 3);
        assert_eq!(policy.weight(&snap(1, 2, 1)), 7);
    }

    #[test]
    fn test_weight_saturates() {
        let policy = WeightPolicy::default();
        assert_eq!(policy.weight(&snap(1, u64::MAX, 1)), u64::MAX);
    }

    #[test]
    fn test_paired_signals_share_combined_weight() {
        let mut pairing = Pairing::new();
        pairing.link(SignalId(1), SignalId(2)).unwrap();
        let snapshots = vec![snap(1, 1, 2), snap(2, 0, 3), snap(3, 1, 0)];

        let table = WeightTable::build(&snapshots, &pairing, &WeightPolicy::default());

        assert_eq!(table.get(SignalId(1)), Some(9));
        assert_eq!(table.get(SignalId(2)), Some(9));
        assert_eq!(table.get(SignalId(3)), Some(4));
    }

    #[test]
    fn test_unpaired_uses_own_weight() {
        let policy = WeightPolicy::default();
        assert_eq!(effective_weight(&policy, &snap(1, 1, 1), None), 5);
        assert_eq!(effective_weight(&policy, &snap(1, 1, 1), Some(&snap(2, 1, 0))), 9);
    }

    #[test]
    fn test_unpaired_heavier_signal_beats_lighter_pair() {
        let mut pairing = Pairing::new();
        pairing.link(SignalId(1), SignalId(2)).unwrap();
        let snapshots = vec![snap(1, 1, 0), snap(2, 0, 0), snap(3, 1, 1)];

        let table = WeightTable::build(&snapshots, &pairing, &WeightPolicy::default());

        assert_eq!(table.get(SignalId(1)), Some(4));
        assert_eq!(table.get(SignalId(2)), Some(4));
        assert_eq!(table.get(SignalId(3)), Some(5));
        assert!(!should_switch(SignalId(1), &table));
        assert!(!should_switch(SignalId(2), &table));
        assert!(should_switch(SignalId(3), &table));
        assert_eq!(eligible(&table), vec![SignalId(3)]);
    }

    #[test]
    fn test_three_way_tie_makes_all_eligible() {
        let snapshots = vec![snap(1, 1, 0), snap(2, 0, 4), snap(3, 1, 0)];
        let table = WeightTable::build(&snapshots, &Pairing::new(), &WeightPolicy::default());

        assert!(should_switch(SignalId(1), &table));
        assert!(should_switch(SignalId(2), &table));
        assert!(should_switch(SignalId(3), &table));
        assert_eq!(eligible(&table), vec![SignalId(1), SignalId(2), SignalId(3)]);
    }

    #[test]
    fn test_pair_members_are_eligible_together() {
        let mut pairing = Pairing::new();
        pairing.link(SignalId(1), SignalId(2)).unwrap();
        let snapshots = vec![snap(1, 1, 0), snap(2, 1, 0), snap(3, 1, 3)];

        let table = WeightTable::build(&snapshots, &pairing, &WeightPolicy::default());

        assert_eq!(eligible(&table), vec![SignalId(1), SignalId(2)]);
    }

    #[test]
    fn test_unknown_signal_is_never_eligible() {
        let table = WeightTable::build(&[snap(1, 0, 0)], &Pairing::new(), &WeightPolicy::default());
        assert!(!should_switch(SignalId(42), &table));
        assert!(!should_switch(SignalId(1), &WeightTable::default()));
    }
}
