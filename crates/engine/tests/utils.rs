use sweep_engine::{Driver, Engine, Options, Ordered, Row, Span};


pub type Int = Ordered<i64>;


pub fn engine(options: Options) -> Engine<Int> {
    Engine::ordered(options)
}


pub fn span(begin: i64, end: i64) -> Span<i64> {
    Span::new_unchecked(begin, end, None)
}


pub fn spans(list: &[(i64, i64)]) -> Vec<Span<i64>> {
    list.iter().map(|&(b, e)| span(b, e)).collect()
}


pub fn driver(engine: &Engine<Int>, sources: &[&[(i64, i64)]]) -> Driver<Int> {
    let mut driver = engine.driver();
    for list in sources {
        driver.add_source(engine.slice_source(spans(list))).unwrap();
    }
    driver
}


pub fn bounds(row: &Row<i64>) -> (i64, i64) {
    (*row.span.begin(), *row.span.end())
}


/// `(source, src_start, src_end)` for every match of the row.
pub fn summary(row: &Row<i64>) -> Vec<(usize, usize, usize)> {
    row.matches.iter()
        .map(|m| (m.source, m.src_start, m.src_end))
        .collect()
}


pub fn collect_rows(driver: &mut Driver<Int>) -> Vec<Row<i64>> {
    driver.iter().collect()
}
