//! Trait interfaces between crates:
//! - [`SealEngine`] — what the facade needs from an engine (sealgate-engine implements)
//! - [`SealVerifier`] — proof-of-work check the engine delegates to

use crate::error::SealerError;
use crate::remote::RemoteHandle;
use crate::types::{BlockNonce, Hash256, SealTask};

/// An engine the external-miner facade can talk to.
pub trait SealEngine: Send + Sync {
    /// The remote handle, or `None` when remote sealing is not configured.
    fn remote(&self) -> Option<&RemoteHandle>;

    /// Aggregate hash rate across all miners, in hashes per second.
    fn hashrate(&self) -> u64;
}

/// Checks a submitted solution against the task it claims to seal.
pub trait SealVerifier: Send + Sync {
    fn verify(
        &self,
        task: &SealTask,
        nonce: BlockNonce,
        mix_digest: &Hash256,
    ) -> Result<(), SealerError>;
}

/// Verifier that accepts every solution. Meant for devnets and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SealVerifier for AcceptAll {
    fn verify(
        &self,
        _task: &SealTask,
        _nonce: BlockNonce,
        _mix_digest: &Hash256,
    ) -> Result<(), SealerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkPackage;

    struct RejectOdd;

    impl SealVerifier for RejectOdd {
        fn verify(
            &self,
            _task: &SealTask,
            nonce: BlockNonce,
            _mix_digest: &Hash256,
        ) -> Result<(), SealerError> {
            if nonce.as_u64() % 2 == 1 {
                Err(SealerError::InvalidSolution)
            } else {
                Ok(())
            }
        }
    }

    fn task() -> SealTask {
        SealTask {
            seal_hash: Hash256([1; 32]),
            number: 1,
            package: WorkPackage::default(),
        }
    }

    #[test]
    fn accept_all_accepts() {
        assert!(AcceptAll.verify(&task(), BlockNonce::from_u64(3), &Hash256::ZERO).is_ok());
    }

    #[test]
    fn verifier_is_object_safe() {
        let verifiers: Vec<Box<dyn SealVerifier>> = vec![Box::new(AcceptAll), Box::new(RejectOdd)];
        let results: Vec<bool> = verifiers
            .iter()
            .map(|v| v.verify(&task(), BlockNonce::from_u64(1), &Hash256::ZERO).is_ok())
            .collect();
        assert_eq!(results, vec![true, false]);
    }
}
