// tests/naming_roundtrip.rs
//
// Запуск только этого файла:
//   cargo test --test naming_roundtrip -- --nocapture
//
// Покрываем:
// 1) encode -> decode для случайных имён миров (0, 1, 3 разделителя внутри имени).
// 2) Случайные моменты времени: CreatedAt всегда даёт ровно пять токенов.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use oorandom::Rand64;

use worldvault::consts::{NAME_DELIMITER, TIMESTAMP_TOKENS};
use worldvault::{CreatedAt, SnapshotCodec};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-. ";

fn random_segment(rng: &mut Rand64) -> String {
    let len = rng.rand_range(1..12) as usize;
    (0..len)
        .map(|_| ALPHABET[rng.rand_range(0..ALPHABET.len() as u64) as usize] as char)
        .collect()
}

fn random_world(rng: &mut Rand64, delimiters: usize) -> String {
    let sep = NAME_DELIMITER.to_string();
    (0..=delimiters)
        .map(|_| random_segment(rng))
        .collect::<Vec<_>>()
        .join(&sep)
}

fn random_time(rng: &mut Rand64) -> NaiveDateTime {
    let d = NaiveDate::from_ymd_opt(
        rng.rand_range(2000..2100) as i32,
        rng.rand_range(1..13) as u32,
        rng.rand_range(1..29) as u32,
    )
    .unwrap();
    d.and_hms_milli_opt(
        rng.rand_range(0..24) as u32,
        rng.rand_range(0..60) as u32,
        rng.rand_range(0..60) as u32,
        rng.rand_range(0..1000) as u32,
    )
    .unwrap()
}

#[test]
fn random_names_round_trip() -> Result<()> {
    let codec = SnapshotCodec::new();
    let mut rng = Rand64::new(0x57A11_u128);

    for delimiters in [0usize, 1, 3] {
        for _ in 0..300 {
            let world = random_world(&mut rng, delimiters);
            let dt = random_time(&mut rng);
            let at = CreatedAt::from_datetime(dt);

            let flat = codec.encode(&world, &at)?;
            assert!(codec.matches_shape(&flat));
            let id = codec.decode(&flat)?;

            assert_eq!(id.world_name, world, "flat={flat}");
            assert_eq!(id.created_at, at, "flat={flat}");
            assert_eq!(id.created_at.to_datetime(), Some(dt));
        }
    }
    Ok(())
}

#[test]
fn created_at_always_five_tokens() -> Result<()> {
    let mut rng = Rand64::new(0xC0FFEE_u128);
    for _ in 0..500 {
        let at = CreatedAt::from_datetime(random_time(&mut rng));
        assert_eq!(
            at.as_str().split(NAME_DELIMITER).count(),
            TIMESTAMP_TOKENS,
            "{}",
            at
        );
        assert_eq!(CreatedAt::parse(at.as_str())?, at);
    }
    Ok(())
}
