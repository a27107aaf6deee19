//! This bench walks a large synthetic backlog: many epics, each with several
//! stories followed by an acceptance criteria table.

#![allow(missing_docs)]

use std::hint::black_box;

use backlog::{Block, Config, Extractor};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Generates the blocks of a document with `epics` epics of ten stories each.
fn backlog(epics: usize) -> Vec<Block> {
    let mut blocks = vec![
        Block::paragraph("Payments backlog"),
        Block::paragraph("Module: Payments"),
    ];

    for epic in 1..=epics {
        blocks.push(Block::paragraph(format!("Epic {epic}: Area {epic}")));
        for story in 1..=10 {
            blocks.push(Block::paragraph(format!("User Story {epic}.{story}: Story {story}")));
            blocks.push(Block::paragraph("As a customer I want to pay quickly."));

            let mut rows = vec![vec![
                "Sr. No".to_string(),
                "Scenario".to_string(),
                "Acceptance Criteria".to_string(),
            ]];
            rows.extend((1..=5).map(|row| {
                vec![
                    format!("{story}.{row}"),
                    format!("Scenario {row}"),
                    "Given a saved card When I pay Then the order is confirmed".to_string(),
                ]
            }));
            blocks.push(Block::table(rows));
        }
    }

    blocks
}

fn walk_blocks(c: &mut Criterion) {
    let mut config = Config::default();
    config.add_header_alias("Test Step", "Scenario");
    let extractor = Extractor::new(&config);

    let mut group = c.benchmark_group("walk blocks");
    for epics in [10, 100] {
        let blocks = backlog(epics);
        group.bench_with_input(BenchmarkId::from_parameter(epics), &blocks, |b, blocks| {
            b.iter(|| extractor.extract_blocks(black_box(blocks)));
        });
    }
    group.finish();
}

criterion_group!(benches, walk_blocks);
criterion_main!(benches);
