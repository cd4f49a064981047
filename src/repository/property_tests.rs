//! Property-Based Tests for the Repository Module
//!
//! Checks partitioning, round trips and index bookkeeping against every adapter.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::domain::{Collection, CollectionFactory, CollectionId, Element, ElementId, Headers};
use crate::error::ListError;
use crate::repository::adapters::{LocalBackend, MemcachedBackend, RedisBackend};
use crate::repository::{chunk_count, chunk_key, partition, ChunkedRepository, ListRepository};
use crate::store::{KeyValueStore, MemoryStore};

const TEST_CHUNK_SIZE: usize = 5;

/// One repository per adapter, each over its own store.
fn repositories() -> Vec<(Arc<MemoryStore>, Box<dyn ListRepository>)> {
    let local = Arc::new(MemoryStore::new());
    let memcached = Arc::new(MemoryStore::new());
    let redis = Arc::new(MemoryStore::new());

    vec![
        (
            local.clone(),
            Box::new(ChunkedRepository::new(LocalBackend::new(local), TEST_CHUNK_SIZE)),
        ),
        (
            memcached.clone(),
            Box::new(ChunkedRepository::new(
                MemcachedBackend::new(memcached),
                TEST_CHUNK_SIZE,
            )),
        ),
        (
            redis.clone(),
            Box::new(ChunkedRepository::new(RedisBackend::new(redis), TEST_CHUNK_SIZE)),
        ),
    ]
}

// == Strategies ==
/// Generates element bodies of mixed shapes
fn body_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,32}".prop_map(|s| json!(s)),
        ("[a-z]{1,8}", any::<u32>()).prop_map(|(name, rate)| json!({"name": name, "rate": rate})),
    ]
}

fn collection_of(bodies: Vec<Value>) -> Collection {
    CollectionFactory::new()
        .create(bodies, Headers::new(), Some("prop-list"), None)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every element lands in exactly one chunk, in order, and the chunk
    // count is ceil(N / C).
    #[test]
    fn prop_partition_completeness(
        bodies in prop::collection::vec(body_strategy(), 1..80),
        chunk_size in 1usize..12
    ) {
        let collection = collection_of(bodies);
        let chunks = partition(collection.items(), chunk_size);

        prop_assert_eq!(chunks.len(), chunk_count(collection.len(), chunk_size));
        prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= chunk_size));

        let flattened: Vec<&String> = chunks.iter().flat_map(|c| c.keys()).collect();
        let expected: Vec<String> = collection.items().iter().map(|e| e.id().to_string()).collect();
        prop_assert_eq!(flattened.len(), expected.len());
        for (got, want) in flattened.iter().zip(expected.iter()) {
            prop_assert_eq!(*got, want);
        }
    }

    // Storing a collection and reading it back yields the same ids and bodies.
    #[test]
    fn prop_round_trip(
        bodies in prop::collection::vec(body_strategy(), 1..40),
        chunk_size in 1usize..8
    ) {
        for (_, repo) in repositories() {
            let collection = collection_of(bodies.clone());
            let expected: Vec<(String, Value)> = collection
                .items()
                .iter()
                .map(|e| (e.id().to_string(), e.body().clone()))
                .collect();

            let created = repo.create(collection, None, Some(chunk_size)).unwrap();
            let id = CollectionId::new(Some("prop-list")).unwrap();
            let found = repo.find_by_collection_id(&id).unwrap();

            prop_assert_eq!(&created, &found);
            let got: Vec<(String, Value)> = found.into_iter().collect();
            prop_assert_eq!(got, expected.clone());

            // idempotent read
            prop_assert_eq!(repo.find_by_collection_id(&id).unwrap(), created);
        }
    }

    // Adding an element twice always fails and never overwrites.
    #[test]
    fn prop_duplicate_rejection(
        raw_id in "[a-zA-Z0-9]{1,16}",
        first in body_strategy(),
        second in body_strategy()
    ) {
        let mut collection = Collection::new(CollectionId::generate());
        let id = ElementId::new(Some(&raw_id)).unwrap();
        collection.add_item(Element::new(id.clone(), first.clone())).unwrap();

        let result = collection.add_item(Element::new(id.clone(), second));
        prop_assert!(matches!(result, Err(ListError::DuplicateElement(_))));
        prop_assert_eq!(collection.get_element(&id).unwrap().body(), &first);
        prop_assert_eq!(collection.len(), 1);
    }

    // After n inserts and m deletes the index size is n - m, and the entry
    // disappears at zero.
    #[test]
    fn prop_index_consistency(
        n in 1usize..30,
        deletes in prop::collection::vec(any::<prop::sample::Index>(), 0..30),
        chunk_size in 1usize..6
    ) {
        for (store, repo) in repositories() {
            let bodies: Vec<Value> = (0..n).map(|i| json!({"id": i})).collect();
            let collection = CollectionFactory::new()
                .create(bodies, Headers::new(), Some("prop-list"), Some("id"))
                .unwrap();
            let id = collection.id().clone();
            repo.create(collection, None, Some(chunk_size)).unwrap();

            let mut alive: Vec<usize> = (0..n).collect();
            let mut removed = HashSet::new();
            for pick in &deletes {
                if alive.is_empty() {
                    break;
                }
                let victim = alive.remove(pick.index(alive.len()));
                let element = ElementId::new(Some(&victim.to_string())).unwrap();
                repo.delete_element(&id, &element).unwrap();
                removed.insert(victim);
            }

            if alive.is_empty() {
                prop_assert!(repo.get_index_entry(&id).is_err());
                prop_assert!(repo.get_index().unwrap().is_empty());
                prop_assert!(store.get(&chunk_key(&id, 1)).ok().flatten().is_none());
            } else {
                let entry = repo.get_index_entry(&id).unwrap();
                prop_assert_eq!(entry.size, n - removed.len());
                prop_assert_eq!(entry.chunks, chunk_count(n, chunk_size));
                prop_assert_eq!(repo.find_by_collection_id(&id).unwrap().len(), alive.len());
            }
        }
    }
}
