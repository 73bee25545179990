//! Credential rotation properties

use billbrief::credentials::{Credential, CredentialRotator};

/// A pool of N keys survives exactly N-1 quota exhaustions
#[test]
fn test_pool_allows_len_minus_one_advances() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..20), |size| {
            let pool: Vec<Credential> = (0..size)
                .map(|i| Credential::new(format!("key-{}", i)))
                .collect();
            let mut rotator = CredentialRotator::new(pool);

            let mut advances = 0;
            while rotator.advance() {
                advances += 1;
                assert_eq!(
                    rotator.current().map(|c| c.expose().to_string()),
                    Some(format!("key-{}", advances))
                );
            }
            assert_eq!(advances, size - 1);
            assert!(rotator.current().is_none());
            Ok(())
        })
        .unwrap();
}
