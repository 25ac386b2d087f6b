//! Concurrent balance mutation through the service layer

use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use wallet_ledger::{
    InMemoryLedgerStore, LedgerStore, WalletError, WalletOperationRequest, WalletService,
};

fn service() -> (Arc<InMemoryLedgerStore>, Arc<WalletService>) {
    let store = Arc::new(InMemoryLedgerStore::new());
    let service = Arc::new(WalletService::new(store.clone()));
    (store, service)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_first_use_deposits_all_land() {
    let (store, service) = service();
    let id = Uuid::new_v4();

    // Every request races to provision the same unseen wallet
    let tasks = (0..100).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .process_operation(WalletOperationRequest::new(id, "DEPOSIT", 10))
                .await
        })
    });
    for r in join_all(tasks).await {
        r.unwrap().unwrap();
    }

    assert_eq!(store.len(), 1);
    assert_eq!(service.get_balance(id).await.unwrap(), 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_withdrawals_never_overdraw() {
    let (_, service) = service();
    let id = Uuid::new_v4();
    service
        .process_operation(WalletOperationRequest::new(id, "DEPOSIT", 1000))
        .await
        .unwrap();

    // 50 withdrawals of 30 against 1000: exactly 33 can succeed
    let tasks = (0..50).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .process_operation(WalletOperationRequest::new(id, "WITHDRAW", 30))
                .await
        })
    });

    let mut succeeded = 0i64;
    for r in join_all(tasks).await {
        match r.unwrap() {
            Ok(()) => succeeded += 1,
            Err(WalletError::InsufficientFunds(w)) => assert_eq!(w, id),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(succeeded, 33);
    assert_eq!(service.get_balance(id).await.unwrap(), 1000 - 33 * 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn mixed_operations_match_committed_sum() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    let tasks = (0..200i64).map(|i| {
        let service = service.clone();
        tokio::spawn(async move {
            let (op, amount) = if i % 3 == 0 {
                ("WITHDRAW", 25)
            } else {
                ("DEPOSIT", 10 + i % 7)
            };
            let result = service
                .process_operation(WalletOperationRequest::new(id, op, amount))
                .await;
            (op, amount, result)
        })
    });

    let mut expected = 0i64;
    for r in join_all(tasks).await {
        let (op, amount, result) = r.unwrap();
        match result {
            Ok(()) if op == "DEPOSIT" => expected += amount,
            Ok(()) => expected -= amount,
            Err(WalletError::InsufficientFunds(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let balance = service.get_balance(id).await.unwrap();
    assert!(balance >= 0);
    assert_eq!(balance, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn independent_wallets_do_not_interfere() {
    let (store, service) = service();
    let ids: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();

    let mut tasks = Vec::new();
    for &id in &ids {
        for _ in 0..10 {
            let service = service.clone();
            tasks.push(tokio::spawn(async move {
                service
                    .process_operation(WalletOperationRequest::new(id, "DEPOSIT", 5))
                    .await
            }));
        }
    }
    for r in join_all(tasks).await {
        r.unwrap().unwrap();
    }

    assert_eq!(store.len(), ids.len());
    for id in ids {
        assert_eq!(store.read(id).await.unwrap().balance, 50);
    }
}
