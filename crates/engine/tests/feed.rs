use std::thread;
use sweep_engine::{Options, SpanError};
use tokio::sync::mpsc;

mod utils;
use utils::{bounds, collect_rows, driver, engine, spans, summary};


#[test]
fn early_break_stops_producer() -> anyhow::Result<()> {
    let engine = engine(Options::default());
    let (cursor, control, producer) = engine.spawn_feed(spans(&[(1, 2), (1, 1), (3, 3), (4, 4)]));

    let mut driver = engine.driver();
    driver.add_source(cursor);

    let first = driver.iter().next().map(|row| bounds(&row));
    assert_eq!(first, Some((1, 2)));
    assert_eq!(driver.position(), None);

    producer.join().map_err(|_| anyhow::anyhow!("producer panicked"))?;
    assert!(control.is_shut_down());
    assert!(control.is_producer_closed());
    Ok(())
}


#[test]
fn fed_source_matches_slice_source() -> anyhow::Result<()> {
    let engine = engine(Options::default());
    let list = [(1, 2), (3, 7), (5, 11), (14, 15)];

    let (cursor, control, producer) = engine.spawn_feed(spans(&list));
    let mut fed = engine.driver();
    fed.add_source(cursor);
    fed.add_source(engine.slice_source(spans(&[(3, 3), (5, 11)])));
    let fed_rows = collect_rows(&mut fed);

    producer.join().map_err(|_| anyhow::anyhow!("producer panicked"))?;
    assert!(control.is_producer_closed());

    let mut plain = driver(&engine, &[&list, &[(3, 3), (5, 11)]]);
    let plain_rows = collect_rows(&mut plain);

    assert_eq!(
        fed_rows.iter().map(bounds).collect::<Vec<_>>(),
        plain_rows.iter().map(bounds).collect::<Vec<_>>()
    );
    assert_eq!(
        fed_rows.iter().map(summary).collect::<Vec<_>>(),
        plain_rows.iter().map(summary).collect::<Vec<_>>()
    );
    Ok(())
}


#[test]
fn producer_error_reaches_driver() -> anyhow::Result<()> {
    let engine = engine(Options::default().with_validate(true));
    let (cursor, control, producer) = engine.spawn_feed(spans(&[(9, 11), (2, 2), (12, 12)]));

    let mut driver = engine.driver();
    driver.add_source(engine.slice_source(spans(&[(1, 20)])));
    driver.add_source(cursor);

    assert!(collect_rows(&mut driver).is_empty());
    assert_eq!(driver.error(), Some(SpanError::OutOfOrder));
    assert_eq!(driver.error_source(), Some(1));

    producer.join().map_err(|_| anyhow::anyhow!("producer panicked"))?;
    assert!(control.is_producer_closed());
    Ok(())
}


#[test]
fn feed_stops_after_shutdown() {
    let engine = engine(Options::default());
    let (mut feed, source) = engine.feed::<()>();
    let control = source.control().clone();

    assert!(feed.can_accumulate(utils::span(1, 2)));
    assert!(control.shutdown());
    assert!(!control.shutdown());
    assert!(!feed.can_accumulate(utils::span(5, 6)));
    assert!(feed.is_closed());
    assert!(control.is_producer_closed());

    feed.finish();
    feed.finish();
}


#[test]
fn channel_sources() -> anyhow::Result<()> {
    let engine = engine(Options::default());

    let (span_tx, span_rx) = mpsc::channel(1);
    let (group_tx, group_rx) = mpsc::channel(1);

    let spans_producer = thread::spawn(move || {
        for s in spans(&[(1, 2), (2, 4), (8, 9)]) {
            if span_tx.blocking_send(s).is_err() {
                break
            }
        }
    });

    let group_engine = engine.clone();
    let groups_producer = thread::spawn(move || {
        for g in group_engine.groups(spans(&[(3, 3), (9, 12)])) {
            if group_tx.blocking_send(g).is_err() {
                break
            }
        }
    });

    let mut driver = engine.driver();
    driver.add_source(engine.channel_source(span_rx));
    driver.add_source(engine.group_channel_source(group_rx));
    let rows = collect_rows(&mut driver);

    spans_producer.join().map_err(|_| anyhow::anyhow!("span producer panicked"))?;
    groups_producer.join().map_err(|_| anyhow::anyhow!("group producer panicked"))?;

    assert_eq!(
        rows.iter().map(bounds).collect::<Vec<_>>(),
        vec![(1, 3), (4, 4), (8, 9), (10, 12)]
    );
    assert_eq!(summary(&rows[0]), vec![(0, 0, 1), (1, 0, 0)]);
    assert_eq!(summary(&rows[2]), vec![(0, 2, 2), (1, 1, 1)]);
    Ok(())
}


#[test]
fn channel_cursors_inside_runtime() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;

    let rows = runtime.block_on(async {
        let engine = engine(Options::default());
        let (cursor, control, producer) = engine.spawn_feed(spans(&[(1, 2), (6, 7)]));

        let (tx, rx) = mpsc::channel(2);
        for s in spans(&[(2, 3), (9, 9)]) {
            tx.try_send(s)?;
        }
        drop(tx);

        let mut driver = engine.driver();
        driver.add_source(cursor);
        driver.add_source(engine.channel_source(rx));
        let rows: Vec<_> = collect_rows(&mut driver).iter().map(bounds).collect();

        producer.join().map_err(|_| anyhow::anyhow!("producer panicked"))?;
        assert!(control.is_producer_closed());
        anyhow::Ok(rows)
    })?;

    assert_eq!(rows, vec![(1, 2), (3, 3), (6, 7), (9, 9)]);
    Ok(())
}
