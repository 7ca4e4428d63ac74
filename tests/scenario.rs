use rust_hashchain::LedgerError;
use rust_hashchain::blockchain::hash::{GENESIS_PREVIOUS_HASH, meets_difficulty};
use rust_hashchain::blockchain::{ChainValidator, DefectKind, Ledger, TamperSimulator};

fn quiet(_: u64) {}

#[test]
fn tampering_is_detected_and_locks_the_chain() {
    let mut ledger = Ledger::new(2);
    for data in ["a", "b", "c"] {
        let block = ledger.mine_and_append(data, &mut quiet).expect("mine");
        assert!(meets_difficulty(&block.hash, 2));
        assert_eq!(block.compute_hash(), block.hash);
    }
    assert_eq!(ledger.blocks()[0].previous_hash, GENESIS_PREVIOUS_HASH);

    let report = ChainValidator::validate(&mut ledger);
    assert!(report.is_valid);
    assert!(report.defects.is_empty());

    let tampered = TamperSimulator::tamper(&mut ledger, 1, "B").expect("tamper");
    assert_eq!(tampered.compromised, 2);
    assert!(!ledger.chain_valid());

    let report = ChainValidator::validate(&mut ledger);
    assert!(!report.is_valid);
    assert!(report.defects_for(0).is_empty());
    assert!(report.defects_for(1).contains(&DefectKind::HashMismatch));
    assert!(!report.defects_for(2).is_empty());
    assert!(!ledger.chain_valid());

    let block0 = &ledger.blocks()[0];
    assert!(block0.valid && !block0.tampered);
    assert!(ledger.blocks()[1..].iter().all(|b| b.tampered && !b.valid));

    assert_eq!(
        ledger.mine_and_append("d", &mut quiet).unwrap_err(),
        LedgerError::ChainLocked
    );
    assert_eq!(ledger.len(), 3);

    ledger.reset();
    assert!(ledger.chain_valid());
    ledger.mine_and_append("d", &mut quiet).expect("mine after reset");
    assert!(ChainValidator::validate(&mut ledger).is_valid);
}

#[test]
fn validating_twice_gives_the_same_answer() {
    let mut ledger = Ledger::new(1);
    for data in ["x", "y"] {
        ledger.mine_and_append(data, &mut quiet).expect("mine");
    }
    assert_eq!(
        ChainValidator::validate(&mut ledger),
        ChainValidator::validate(&mut ledger)
    );
}
