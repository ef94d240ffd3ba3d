use crate::domain::Domain;
use crate::types::{Bounds, Span};
use std::cmp::Ordering;


/// Next atomic interval starting at or after `from`.
///
/// The interval starts at `from` when some bound covers it, otherwise at the
/// nearest bound begin after it. It ends at the nearest bound end, cut short
/// at the first bound begin that lies inside it.
pub fn breakpoint<D, B>(domain: &D, from: D::Value, bounds: &[B]) -> Option<Span<D::Value>>
where
    D: Domain + ?Sized,
    B: Bounds<D::Value>,
    D::Value: Clone
{
    let begin = if bounds.iter().any(|b| domain.contains(b, &from)) {
        from
    } else {
        smallest(
            domain,
            bounds.iter()
                .map(|b| b.begin())
                .filter(|v| domain.cmp(v, &from) == Ordering::Greater)
        )?.clone()
    };

    let end = smallest(
        domain,
        bounds.iter()
            .map(|b| b.end())
            .filter(|v| domain.cmp(v, &begin) != Ordering::Less)
    )?;

    let cut = smallest(
        domain,
        bounds.iter()
            .map(|b| b.begin())
            .filter(|v| {
                domain.cmp(v, &begin) == Ordering::Greater && domain.cmp(v, end) != Ordering::Greater
            })
    );

    let end = cut.unwrap_or(end).clone();
    Some(Span::new_unchecked(begin, end, None))
}


pub fn smallest<'a, D, I>(domain: &D, values: I) -> Option<&'a D::Value>
where
    D: Domain + ?Sized,
    I: Iterator<Item = &'a D::Value>,
    D::Value: 'a
{
    values.min_by(|a, b| domain.cmp(a, b))
}
