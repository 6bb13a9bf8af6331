//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, display
//! formatting and the id generators.

use std::collections::HashSet;
use std::sync::Arc;

use core_kernel::{
    ClaimId, GroupId, IdGenerator, MemberId, RandomIdGenerator, SequentialIdGenerator,
    TransactionId,
};
use uuid::Uuid;

mod display_and_parsing {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(GroupId::prefix(), "GRP");
        assert_eq!(MemberId::prefix(), "MEM");
        assert_eq!(ClaimId::prefix(), "CLM");
        assert_eq!(TransactionId::prefix(), "TXN");
    }

    #[test]
    fn test_display_includes_prefix_and_uuid() {
        let id = MemberId::from_uuid(Uuid::from_u128(7));
        assert_eq!(id.to_string(), "MEM-00000000-0000-0000-0000-000000000007");
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let id = ClaimId::from_uuid(Uuid::from_u128(42));
        let with_prefix: ClaimId = "CLM-00000000-0000-0000-0000-00000000002a".parse().unwrap();
        let bare: ClaimId = "00000000-0000-0000-0000-00000000002a".parse().unwrap();

        assert_eq!(with_prefix, id);
        assert_eq!(bare, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = TransactionId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }
}

mod generators {
    use super::*;

    #[test]
    fn test_random_generator_produces_unique_ids() {
        let ids: HashSet<MemberId> = (0..100).map(|_| MemberId::generate(&RandomIdGenerator)).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_sequential_generator_is_unique_across_threads() {
        let generator = Arc::new(SequentialIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..250).map(|_| generator.next_uuid()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for uuid in handle.join().unwrap() {
                assert!(seen.insert(uuid), "duplicate id {uuid}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_generator_usable_as_trait_object() {
        let generator: Box<dyn IdGenerator> = Box::new(SequentialIdGenerator::starting_at(10));
        let id = GroupId::generate(generator.as_ref());
        assert_eq!(id.as_uuid(), &Uuid::from_u128(10));
    }
}
