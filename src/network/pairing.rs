use std::collections::HashMap;

use crate::control_system::signal::SignalId;
use crate::error::NetworkError;

/// Symmetric pairing relation, keyed by signal id.
///
/// Every link is stored in both directions, so `partner_of(a) == Some(b)`
/// always implies `partner_of(b) == Some(a)`.
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    partners: HashMap<SignalId, SignalId>,
}

impl Pairing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&mut self, a: SignalId, b: SignalId) -> Result<(), NetworkError> {
        if a == b {
            return Err(NetworkError::SelfPairing(a));
        }
        for id in [a, b] {
            if let Some(&partner) = self.partners.get(&id) {
                return Err(NetworkError::AlreadyPaired { id, partner });
            }
        }
        self.partners.insert(a, b);
        self.partners.insert(b, a);
        Ok(())
    }

    pub fn partner_of(&self, id: SignalId) -> Option<SignalId> {
        self.partners.get(&id).copied()
    }

    /// Each pair once, lower id first, sorted.
    pub fn pairs(&self) -> Vec<(SignalId, SignalId)> {
        let mut pairs: Vec<(SignalId, SignalId)> = self
            .partners
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| (*a, *b))
            .collect();
        pairs.sort();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_symmetric() {
        let mut pairing = Pairing::new();
        pairing.link(SignalId(1), SignalId(2)).unwrap();
        assert_eq!(pairing.partner_of(SignalId(1)), Some(SignalId(2)));
        assert_eq!(pairing.partner_of(SignalId(2)), Some(SignalId(1)));
        assert_eq!(pairing.partner_of(SignalId(3)), None);
    }

    #[test]
    fn test_self_pairing_is_rejected() {
        let mut pairing = Pairing::new();
        assert_eq!(
            pairing.link(SignalId(1), SignalId(1)),
            Err(NetworkError::SelfPairing(SignalId(1)))
        );
        assert!(pairing.pairs().is_empty());
    }

    #[test]
    fn test_second_partner_is_rejected_from_either_side() {
        let mut pairing = Pairing::new();
        pairing.link(SignalId(1), SignalId(2)).unwrap();

        assert_eq!(
            pairing.link(SignalId(3), SignalId(2)),
            Err(NetworkError::AlreadyPaired {
                id: SignalId(2),
                partner: SignalId(1)
            })
        );
        assert_eq!(
            pairing.link(SignalId(1), SignalId(3)),
            Err(NetworkError::AlreadyPaired {
                id: SignalId(1),
                partner: SignalId(2)
            })
        );
        assert_eq!(pairing.partner_of(SignalId(3)), None);
    }

    #[test]
    fn test_pairs_lists_each_link_once() {
        let mut pairing = Pairing::new();
        pairing.link(SignalId(4), SignalId(3)).unwrap();
        pairing.link(SignalId(1), SignalId(2)).unwrap();
        assert_eq!(
            pairing.pairs(),
            vec![(SignalId(1), SignalId(2)), (SignalId(3), SignalId(4))]
        );
    }
}
