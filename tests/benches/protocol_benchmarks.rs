//! # Republic of Miner Protocol Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Address codec | encode, decode with checksum |
//! | Transactions | canonical bytes, keccak-256 hash, wire conversion |
//! | Signing | domain-prefixed ECDSA sign and verify |
//! | Envelopes | frame parsing and dispatch |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rm_protocol::{
    address_from_public_key, sign_transaction, transaction_from_api, transaction_to_api,
    verify_transaction, Address, AddressType, Amount, Currency, PendingRequests, Transaction,
    TxInput, TxOutput, NETWORK,
};
use shared_crypto::PrivateKey;

fn transfer(lines: usize) -> Transaction {
    let mut transaction = Transaction::new(1_700_000_600);
    for i in 0..lines {
        let address = Address::new(AddressType::Ecdsa, [i as u8; 20]);
        let amount = Amount::from_units(1 + i as i64).unwrap_or(Amount::ZERO);
        transaction = transaction
            .with_input(TxInput::new(address.clone(), Currency::IRO, amount))
            .with_output(TxOutput::new(address, Currency::WOD, amount));
    }
    transaction
}

// ============================================================================
// Address codec
// ============================================================================

fn bench_address(c: &mut Criterion) {
    let mut group = c.benchmark_group("address");

    let payload = [0x5au8; 20];
    group.bench_function("encode", |b| {
        b.iter(|| black_box(Address::new(AddressType::Ecdsa, black_box(payload))))
    });

    let encoded = Address::new(AddressType::Ecdsa, payload).to_string();
    group.bench_function("decode", |b| {
        b.iter(|| black_box(Address::decode(black_box(&encoded)).is_ok()))
    });

    let public_key = PrivateKey::generate().public_key();
    group.bench_function("from_public_key", |b| {
        b.iter(|| black_box(address_from_public_key(&public_key)))
    });

    group.finish();
}

// ============================================================================
// Transaction hashing
// ============================================================================

fn bench_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction");

    for lines in [1usize, 16, 255] {
        let transaction = transfer(lines);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::new("hash", lines), &transaction, |b, tx| {
            b.iter(|| black_box(tx.hash().is_ok()))
        });
    }

    let transaction = transfer(16);
    if let Ok(wire) = transaction_to_api(&transaction) {
        group.bench_function("from_api_checked", |b| {
            b.iter(|| black_box(transaction_from_api(black_box(&wire)).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// Signing
// ============================================================================

fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("signing");

    let key = PrivateKey::generate();
    let public_key = key.public_key();
    let transaction = transfer(1);

    group.bench_function("sign_transaction", |b| {
        b.iter(|| black_box(sign_transaction(&key, &transaction, NETWORK).is_ok()))
    });

    if let Ok(signature) = sign_transaction(&key, &transaction, NETWORK) {
        group.bench_function("verify_transaction", |b| {
            b.iter(|| {
                black_box(verify_transaction(&public_key, &transaction, &signature, NETWORK))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Envelope dispatch
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let pending = PendingRequests::new();
    let frame = r#"{"type":"GetLedgerResponse","data":{},"crid":"1-0-0","result":0}"#;
    group.bench_function("register_and_dispatch", |b| {
        b.iter(|| {
            let receiver = pending.register("1-0-0");
            let dispatched = pending.dispatch_frame(black_box(frame));
            black_box((dispatched.is_ok(), receiver))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_address,
    bench_transaction,
    bench_signing,
    bench_dispatch
);
criterion_main!(benches);
