use super::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

#[test]
fn three_per_day_then_denied() {
    let mut state = DailyQuota::fresh(day(16), 3);
    let mut seen = Vec::new();
    for _ in 0..3 {
        let (allowed, next) = check_and_consume(state, day(16), 3);
        assert!(allowed);
        seen.push(next.remaining);
        state = next;
    }
    assert_eq!(seen, vec![2, 1, 0]);

    let (allowed, next) = check_and_consume(state, day(16), 3);
    assert!(!allowed);
    assert_eq!(next, state);
}

#[test]
fn new_day_resets_before_consuming() {
    let spent = DailyQuota {
        date: day(15),
        remaining: 0,
    };
    let (allowed, next) = check_and_consume(spent, day(16), 3);
    assert!(allowed);
    assert_eq!(next, DailyQuota { date: day(16), remaining: 2 });

    assert_eq!(spent.rolled_to(day(16), 3).remaining, 3);
}

#[test]
fn serialized_layout_uses_date_and_count() {
    let q = DailyQuota {
        date: day(16),
        remaining: 2,
    };
    let json = serde_json::to_string(&q).unwrap();
    assert_eq!(json, r#"{"date":"2026-10-16","count":2}"#);
    assert_eq!(serde_json::from_str::<DailyQuota>(&json).unwrap(), q);
}

fn store(name: &str) -> QuotaStore {
    let dir = std::path::PathBuf::from("target").join("quota_store").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    QuotaStore::new(dir.join("meme_gen_limit.json"))
}

#[test]
fn missing_state_is_created_full() {
    let s = store("missing");
    let q = s.open(day(16), 3).unwrap();
    assert_eq!(q, DailyQuota::fresh(day(16), 3));
    assert!(s.path().exists());
}

#[test]
fn same_day_state_is_kept_and_old_day_reset() {
    let s = store("roll");
    s.save(&DailyQuota {
        date: day(16),
        remaining: 1,
    })
    .unwrap();
    assert_eq!(s.open(day(16), 3).unwrap().remaining, 1);

    let q = s.open(day(17), 3).unwrap();
    assert_eq!(q, DailyQuota::fresh(day(17), 3));
    // The reset is persisted right away.
    let on_disk: DailyQuota = serde_json::from_slice(&std::fs::read(s.path()).unwrap()).unwrap();
    assert_eq!(on_disk, q);
}

#[test]
fn malformed_state_resets() {
    let s = store("malformed");
    std::fs::create_dir_all(s.path().parent().unwrap()).unwrap();
    std::fs::write(s.path(), b"{not json").unwrap();

    assert_eq!(s.open(day(16), 3).unwrap(), DailyQuota::fresh(day(16), 3));
}

#[test]
fn stored_count_is_clamped_to_limit() {
    let s = store("clamp");
    s.save(&DailyQuota {
        date: day(16),
        remaining: 99,
    })
    .unwrap();
    assert_eq!(s.open(day(16), 3).unwrap().remaining, 3);
    assert_eq!(s.peek(day(16), 3).unwrap().remaining, 3);
}

#[test]
fn peek_never_writes() {
    let s = store("peek");
    assert_eq!(s.peek(day(16), 3).unwrap(), DailyQuota::fresh(day(16), 3));
    assert!(!s.path().exists());

    let spent = DailyQuota {
        date: day(16),
        remaining: 0,
    };
    s.save(&spent).unwrap();
    // Another day reads as full but leaves today's spent state on disk.
    assert_eq!(s.peek(day(15), 3).unwrap(), DailyQuota::fresh(day(15), 3));
    assert_eq!(s.peek(day(16), 3).unwrap(), spent);
    let on_disk: DailyQuota = serde_json::from_slice(&std::fs::read(s.path()).unwrap()).unwrap();
    assert_eq!(on_disk, spent);
}
