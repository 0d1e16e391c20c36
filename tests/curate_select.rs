// tests/curate_select.rs
use tech_digest::curate::{select, Candidate, SelectionPolicy};
use tech_digest::ingest::types::{Category, Origin};

fn cand(i: usize, rank: f64, tag: Category) -> Candidate {
    Candidate {
        title: format!("item {i}"),
        source_url: format!("https://{i}.test"),
        secondary_url: None,
        content: String::new(),
        rank_signal: rank,
        source_tag: tag,
        origin: Origin {
            query: 0,
            position: i,
        },
    }
}

fn ids(v: &[Candidate]) -> Vec<usize> {
    v.iter().map(|c| c.origin.position).collect()
}

#[test]
fn caps_and_sorts_descending() {
    let c: Vec<Candidate> = [3.0, 9.0, 1.0, 7.0, 5.0, 8.0]
        .iter()
        .enumerate()
        .map(|(i, &r)| cand(i, r, Category::News))
        .collect();

    let out = select(&c, &SelectionPolicy::with_cap(3));

    assert_eq!(ids(&out), vec![1, 5, 3]);
}

#[test]
fn ties_keep_input_order() {
    let c = vec![
        cand(0, 2.0, Category::News),
        cand(1, 5.0, Category::News),
        cand(2, 2.0, Category::News),
        cand(3, 5.0, Category::News),
        cand(4, 2.0, Category::News),
    ];
    let out = select(&c, &SelectionPolicy::with_cap(4));
    assert_eq!(ids(&out), vec![1, 3, 0, 2]);
}

#[test]
fn without_signals_insertion_order_ranks() {
    let c: Vec<Candidate> = (0..8).map(|i| cand(i, 0.0, Category::Community)).collect();
    let out = select(&c, &SelectionPolicy::with_cap(5));
    assert_eq!(ids(&out), vec![0, 1, 2, 3, 4]);
}

#[test]
fn output_never_exceeds_cap() {
    let c: Vec<Candidate> = (0..20).map(|i| cand(i, i as f64, Category::News)).collect();
    for cap in 1..=25 {
        let out = select(&c, &SelectionPolicy::with_cap(cap));
        assert_eq!(out.len(), cap.min(c.len()));
        assert!(out.windows(2).all(|w| w[0].rank_signal >= w[1].rank_signal));
    }
}

#[test]
fn category_floor_reserves_slots() {
    // Domestic items rank low but three must make it in.
    let c = vec![
        cand(0, 90.0, Category::Global),
        cand(1, 80.0, Category::Global),
        cand(2, 70.0, Category::Global),
        cand(3, 60.0, Category::Global),
        cand(4, 10.0, Category::Domestic),
        cand(5, 30.0, Category::Domestic),
        cand(6, 20.0, Category::Domestic),
        cand(7, 5.0, Category::Domestic),
    ];
    let policy = SelectionPolicy::with_cap(5).with_floor(Category::Domestic, 3);

    let out = select(&c, &policy);

    // floor picks 5, 6, 4 (best three domestic); the rest by global rank: 0, 1
    assert_eq!(ids(&out), vec![0, 1, 5, 6, 4]);
    let domestic = out.iter().filter(|c| c.source_tag == Category::Domestic).count();
    assert_eq!(domestic, 3);
}

#[test]
fn unmet_floor_is_best_effort() {
    let c = vec![
        cand(0, 9.0, Category::Global),
        cand(1, 8.0, Category::Global),
        cand(2, 1.0, Category::Domestic),
        cand(3, 7.0, Category::Global),
    ];
    let policy = SelectionPolicy::with_cap(3).with_floor(Category::Domestic, 3);

    let out = select(&c, &policy);

    // one domestic exists; remaining slots go to global rank
    assert_eq!(ids(&out), vec![0, 1, 2]);
}

#[test]
fn earlier_floor_wins_when_floors_compete_for_cap() {
    let c = vec![
        cand(0, 9.0, Category::Global),
        cand(1, 8.0, Category::Global),
        cand(2, 7.0, Category::Domestic),
        cand(3, 6.0, Category::Domestic),
        cand(4, 5.0, Category::Global),
    ];
    let policy = SelectionPolicy::with_cap(3)
        .with_floor(Category::Global, 2)
        .with_floor(Category::Domestic, 2);

    let out = select(&c, &policy);

    // global floor takes 0 and 1; only one slot is left for domestic
    assert_eq!(ids(&out), vec![0, 1, 2]);

    let swapped = SelectionPolicy::with_cap(3)
        .with_floor(Category::Domestic, 2)
        .with_floor(Category::Global, 2);
    assert_eq!(ids(&select(&c, &swapped)), vec![0, 2, 3]);
}

#[test]
fn empty_input_selects_nothing() {
    assert!(select(&[], &SelectionPolicy::default()).is_empty());
}
