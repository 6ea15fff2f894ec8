use std::collections::HashMap;
use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};

use matchsheet::extract::extract_match_features;
use matchsheet::features::CombinePolicy;
use matchsheet::roster::{MatchRecord, SLOTS_PER_SIDE, SlotRecord};
use matchsheet::table::{AttributeSnapshot, AttributeTable, Value};
use matchsheet::temporal::latest_before;

const ATTRS: [&str; 4] = ["overall_rating", "potential", "stamina", "strength"];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn side_slots(base: i64) -> [SlotRecord; SLOTS_PER_SIDE] {
    let mut slots = [SlotRecord::default(); SLOTS_PER_SIDE];
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = SlotRecord {
            x: Some(if i == 0 { 1 } else { 2 + i as i32 % 4 }),
            y: Some(if i == 0 { 1 } else { 3 + i as i32 / 4 }),
            player_id: Some(base + i as i64),
        };
    }
    slots
}

/// 22 players with monthly snapshots across four seasons.
fn player_table() -> AttributeTable {
    let mut table = AttributeTable::default();
    for id in 0..22i64 {
        for year in 2009..2013 {
            for month in 1..=12 {
                let mut values = HashMap::new();
                for (index, attr) in ATTRS.iter().enumerate() {
                    values.insert(
                        attr.to_string(),
                        Value::Num(55.0 + (id + index as i64 + month as i64) as f64 % 30.0),
                    );
                }
                table.push(AttributeSnapshot {
                    entity_id: id,
                    date: date(year, month, 15),
                    values,
                });
            }
        }
    }
    table
}

fn match_record() -> MatchRecord {
    MatchRecord {
        match_id: 1,
        date: date(2012, 10, 27),
        home_team_id: 1,
        away_team_id: 2,
        home_goals: Some(2),
        away_goals: Some(1),
        home_slots: side_slots(0),
        away_slots: side_slots(11),
    }
}

fn bench_latest_before(c: &mut Criterion) {
    let table = player_table();
    let rows = table.rows_for(7);
    let as_of = date(2012, 10, 27);

    c.bench_function("latest_before", |b| {
        b.iter(|| {
            let hit = latest_before(black_box(&rows), black_box(as_of));
            black_box(hit.map(|s| s.date));
        })
    });
}

fn bench_extract_match(c: &mut Criterion) {
    let table = player_table();
    let record = match_record();

    for policy in [CombinePolicy::All, CombinePolicy::Diff, CombinePolicy::AvgDiff] {
        c.bench_function(&format!("extract_match_{}", policy.as_str()), |b| {
            b.iter(|| {
                let row = extract_match_features(
                    black_box(&record),
                    black_box(&table),
                    &ATTRS,
                    policy,
                )
                .unwrap();
                black_box(row.len());
            })
        });
    }
}

criterion_group!(benches, bench_latest_before, bench_extract_match);
criterion_main!(benches);
