use crate::error::SpanError;
use crate::types::{Bounds, Span};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;


/// Total order plus successor over span values.
///
/// `next` must move strictly forward: `cmp(next(v), v) == Greater`.
/// It is only used to find breakpoints between atomic intervals and to
/// detect exact adjacency while consolidating.
pub trait Domain {
    type Value;

    fn cmp(&self, a: &Self::Value, b: &Self::Value) -> Ordering;

    fn next(&self, value: &Self::Value) -> Self::Value;

    /// `span.begin <= value <= span.end`
    fn contains<S>(&self, span: &S, value: &Self::Value) -> bool
    where
        S: Bounds<Self::Value> + ?Sized
    {
        self.cmp(span.begin(), value) != Ordering::Greater
            && self.cmp(span.end(), value) != Ordering::Less
    }

    fn overlaps<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Bounds<Self::Value> + ?Sized,
        B: Bounds<Self::Value> + ?Sized
    {
        self.contains(a, b.begin())
            || self.contains(a, b.end())
            || self.contains(b, a.begin())
            || self.contains(b, a.end())
    }

    /// Accumulation order: ascending begin, ties broken by descending end,
    /// so the widest span of a tied group comes first.
    fn order<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: Bounds<Self::Value> + ?Sized,
        B: Bounds<Self::Value> + ?Sized
    {
        self.cmp(a.begin(), b.begin())
            .then_with(|| self.cmp(b.end(), a.end()))
    }

    /// Compares `a` with `b` bound by bound: `(a.begin vs b.begin, a.end vs b.end)`.
    ///
    /// `a` contains `b` when the result is `(Less | Equal, Greater | Equal)`.
    fn contained_by<A, B>(&self, a: &A, b: &B) -> (Ordering, Ordering)
    where
        A: Bounds<Self::Value> + ?Sized,
        B: Bounds<Self::Value> + ?Sized
    {
        (self.cmp(a.begin(), b.begin()), self.cmp(a.end(), b.end()))
    }

    /// Smallest span enclosing both `a` and `b`.
    fn union<A, B>(&self, a: &A, b: &B) -> Span<Self::Value>
    where
        A: Bounds<Self::Value> + ?Sized,
        B: Bounds<Self::Value> + ?Sized,
        Self::Value: Clone
    {
        let (begin, end) = self.contained_by(a, b);
        let begin = if begin == Ordering::Greater { b.begin() } else { a.begin() };
        let end = if end == Ordering::Less { b.end() } else { a.end() };
        Span::new_unchecked(begin.clone(), end.clone(), None)
    }

    /// Validates `next` on its own and, when given, against the span
    /// preceding it in accumulation order.
    fn check<A, B>(&self, next: &A, current: Option<&B>) -> Result<(), SpanError>
    where
        A: Bounds<Self::Value> + ?Sized,
        B: Bounds<Self::Value> + ?Sized
    {
        if self.cmp(next.begin(), next.end()) == Ordering::Greater {
            return Err(SpanError::InvalidRange)
        }
        if let Some(current) = current {
            if self.order(current, next) == Ordering::Greater {
                return Err(SpanError::OutOfOrder)
            }
        }
        Ok(())
    }
}


/// Discrete successor, `v + 1` for integers.
pub trait Successor: Sized {
    /// `None` when `self` is the largest representable value.
    fn successor(&self) -> Option<Self>;
}


macro_rules! impl_successor {
    ($($t:ty),*) => {
        $(
            impl Successor for $t {
                #[inline]
                fn successor(&self) -> Option<Self> {
                    self.checked_add(1)
                }
            }
        )*
    };
}
impl_successor!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);


/// Domain of any `Ord` type with a [Successor].
///
/// The successor of the maximum value is the value itself; the sweep treats
/// a successor that does not advance as the end of the timeline.
pub struct Ordered<E> {
    phantom: PhantomData<fn() -> E>
}


impl<E> Ordered<E> {
    pub fn new() -> Self {
        Self {
            phantom: PhantomData
        }
    }
}


impl<E> Default for Ordered<E> {
    fn default() -> Self {
        Self::new()
    }
}


impl<E> Clone for Ordered<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}


impl<E> Debug for Ordered<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ordered<{}>", std::any::type_name::<E>())
    }
}


impl<E: Ord + Clone + Successor> Domain for Ordered<E> {
    type Value = E;

    #[inline]
    fn cmp(&self, a: &E, b: &E) -> Ordering {
        a.cmp(b)
    }

    #[inline]
    fn next(&self, value: &E) -> E {
        value.successor().unwrap_or_else(|| value.clone())
    }
}


/// Domain built from caller supplied comparator and successor functions.
pub struct FnDomain<E, C, N> {
    cmp: C,
    next: N,
    phantom: PhantomData<fn() -> E>
}


impl<E, C, N> FnDomain<E, C, N>
where
    C: Fn(&E, &E) -> Ordering,
    N: Fn(&E) -> E
{
    pub fn new(cmp: C, next: N) -> Self {
        Self {
            cmp,
            next,
            phantom: PhantomData
        }
    }
}


impl<E, C, N> Domain for FnDomain<E, C, N>
where
    C: Fn(&E, &E) -> Ordering,
    N: Fn(&E) -> E
{
    type Value = E;

    #[inline]
    fn cmp(&self, a: &E, b: &E) -> Ordering {
        (self.cmp)(a, b)
    }

    #[inline]
    fn next(&self, value: &E) -> E {
        (self.next)(value)
    }
}
