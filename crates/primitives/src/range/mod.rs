mod arith;


use crate::domain::Domain;
use crate::types::{Bounds, Span};
use std::cmp::Ordering;


pub use arith::breakpoint;


/// First atomic interval of `list`, starting at its smallest begin.
pub fn first_span<D, B>(domain: &D, list: &[B]) -> Option<Span<D::Value>>
where
    D: Domain + ?Sized,
    B: Bounds<D::Value>,
    D::Value: Clone
{
    let from = arith::smallest(domain, list.iter().map(|b| b.begin()))?.clone();
    breakpoint(domain, from, list)
}


/// Atomic interval following `prev`, `None` once `list` is exhausted.
pub fn next_span<D, P, B>(domain: &D, prev: &P, list: &[B]) -> Option<Span<D::Value>>
where
    D: Domain + ?Sized,
    P: Bounds<D::Value> + ?Sized,
    B: Bounds<D::Value>,
    D::Value: Clone
{
    let from = domain.next(prev.end());
    if domain.cmp(&from, prev.end()) != Ordering::Greater {
        return None
    }
    breakpoint(domain, from, list)
}


/// Indexes of the `list` entries overlapping `probe`, in list order.
pub fn overlap_indexes<D, P, B>(domain: &D, probe: &P, list: &[B]) -> Vec<usize>
where
    D: Domain + ?Sized,
    P: Bounds<D::Value> + ?Sized,
    B: Bounds<D::Value>
{
    list.iter()
        .enumerate()
        .filter_map(|(i, b)| domain.overlaps(probe, b).then_some(i))
        .collect()
}


/// Smallest begin in `list` strictly after `current`.
pub fn next_begin<D, B>(domain: &D, current: &D::Value, list: &[B]) -> Option<D::Value>
where
    D: Domain + ?Sized,
    B: Bounds<D::Value>,
    D::Value: Clone
{
    arith::smallest(
        domain,
        list.iter()
            .map(|b| b.begin())
            .filter(|v| domain.cmp(v, current) == Ordering::Greater)
    ).cloned()
}


/// Smallest end in `list` strictly after `current`.
pub fn next_end<D, B>(domain: &D, current: &D::Value, list: &[B]) -> Option<D::Value>
where
    D: Domain + ?Sized,
    B: Bounds<D::Value>,
    D::Value: Clone
{
    arith::smallest(
        domain,
        list.iter()
            .map(|b| b.end())
            .filter(|v| domain.cmp(v, current) == Ordering::Greater)
    ).cloned()
}


#[cfg(test)]
mod test {
    use super::{first_span, next_begin, next_end, next_span, overlap_indexes};
    use crate::{Domain, Ordered, Span};
    use proptest::collection::vec;
    use proptest::prelude::*;


    fn span(begin: i32, end: i32) -> Span<i32> {
        Span::new_unchecked(begin, end, None)
    }


    fn walk(list: &[Span<i32>]) -> Vec<(i32, i32)> {
        let d = Ordered::<i32>::new();
        let mut result = Vec::new();
        let mut current = first_span(&d, list);
        while let Some(s) = current {
            result.push((*s.begin(), *s.end()));
            current = next_span(&d, &s, list);
        }
        result
    }


    #[test]
    fn first_span_of_empty_list() {
        let d = Ordered::<i32>::new();
        assert_eq!(first_span(&d, &Vec::<Span<i32>>::new()), None);
    }

    #[test]
    fn first_span_ignores_list_order() {
        let d = Ordered::<i32>::new();
        assert_eq!(first_span(&d, &[span(2, 2), span(0, 1)]), Some(span(0, 1)));
    }

    #[test]
    fn first_span_stops_at_nested_begin() {
        let d = Ordered::<i32>::new();
        assert_eq!(first_span(&d, &[span(1, 10), span(4, 6)]), Some(span(1, 4)));
        assert_eq!(first_span(&d, &[span(1, 10), span(1, 6)]), Some(span(1, 6)));
    }

    #[test]
    fn walk_splits_at_every_boundary() {
        let list = [span(0, 1), span(2, 5), span(3, 6)];
        assert_eq!(walk(&list), vec![(0, 1), (2, 3), (4, 5), (6, 6)]);
    }

    #[test]
    fn walk_skips_gaps() {
        let list = [span(0, 1), span(5, 7)];
        assert_eq!(walk(&list), vec![(0, 1), (5, 7)]);
    }

    #[test]
    fn walk_single_points() {
        let list = [span(3, 3), span(3, 3), span(4, 4)];
        assert_eq!(walk(&list), vec![(3, 3), (4, 4)]);
    }

    #[test]
    fn next_span_stops_at_domain_end() {
        let d = Ordered::<u8>::new();
        let full = Span::<u8>::new_unchecked(250, u8::MAX, None);
        assert_eq!(next_span(&d, &full, &[full.clone()]), None);
    }

    #[test]
    fn overlap_indexes_in_list_order() {
        let d = Ordered::<i32>::new();
        let list = [span(0, 1), span(2, 5), span(3, 6), span(9, 9)];
        assert_eq!(overlap_indexes(&d, &span(3, 3), &list), vec![1, 2]);
        assert_eq!(overlap_indexes(&d, &span(1, 2), &list), vec![0, 1]);
        assert_eq!(overlap_indexes(&d, &span(7, 8), &list), Vec::<usize>::new());
    }

    #[test]
    fn next_begin_and_end() {
        let d = Ordered::<i32>::new();
        let list = [span(0, 1), span(2, 5), span(3, 6)];
        assert_eq!(next_begin(&d, &2, &list), Some(3));
        assert_eq!(next_begin(&d, &3, &list), None);
        assert_eq!(next_end(&d, &1, &list), Some(5));
        assert_eq!(next_end(&d, &6, &list), None);
    }

    proptest! {
        #[test]
        fn walk_covers_every_point_exactly_once(
            raw in vec((0i32..40, 0i32..6), 1..6)
        ) {
            let d = Ordered::<i32>::new();
            let list: Vec<Span<i32>> = raw.iter().map(|&(b, len)| span(b, b + len)).collect();
            let rows = walk(&list);

            for w in rows.windows(2) {
                prop_assert!(w[0].1 < w[1].0);
            }

            for p in 0..50 {
                let covered = list.iter().any(|s| d.contains(s, &p));
                let hits = rows.iter().filter(|(b, e)| *b <= p && p <= *e).count();
                prop_assert_eq!(hits, covered as usize);
            }

            for (b, e) in rows.iter() {
                let row = span(*b, *e);
                for s in list.iter() {
                    // a source may start inside a row but never ends inside one
                    prop_assert!(!d.overlaps(s, &row) || d.contains(s, row.end()));
                }
            }
        }
    }
}
