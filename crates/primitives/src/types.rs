use crate::domain::Domain;
use crate::error::SpanError;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;


/// Anything with an inclusive `[begin, end]` extent.
pub trait Bounds<E> {
    fn begin(&self) -> &E;

    fn end(&self) -> &E;
}


impl<'a, E, B: Bounds<E> + ?Sized> Bounds<E> for &'a B {
    #[inline]
    fn begin(&self) -> &E {
        (*self).begin()
    }

    #[inline]
    fn end(&self) -> &E {
        (*self).end()
    }
}


impl<E, B: Bounds<E> + ?Sized> Bounds<E> for Arc<B> {
    #[inline]
    fn begin(&self) -> &E {
        self.as_ref().begin()
    }

    #[inline]
    fn end(&self) -> &E {
        self.as_ref().end()
    }
}


/// Inclusive range of values with an optional tag.
///
/// A span is immutable once built and always satisfies `begin <= end`
/// under the domain it was created with.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Span<E, T = ()> {
    begin: E,
    end: E,
    tag: Option<T>
}


impl<E, T> Span<E, T> {
    pub fn new<D>(domain: &D, begin: E, end: E, tag: Option<T>) -> Result<Self, SpanError>
    where
        D: Domain<Value = E> + ?Sized
    {
        if domain.cmp(&begin, &end) == Ordering::Greater {
            return Err(SpanError::InvalidRange)
        }
        Ok(Self {
            begin,
            end,
            tag
        })
    }

    /// Builds a span without checking `begin <= end`.
    ///
    /// Meant for spans derived from bounds that were already validated.
    pub fn new_unchecked(begin: E, end: E, tag: Option<T>) -> Self {
        Self {
            begin,
            end,
            tag
        }
    }

    #[inline]
    pub fn begin(&self) -> &E {
        &self.begin
    }

    #[inline]
    pub fn end(&self) -> &E {
        &self.end
    }

    #[inline]
    pub fn tag(&self) -> Option<&T> {
        self.tag.as_ref()
    }

    pub fn into_parts(self) -> (E, E, Option<T>) {
        (self.begin, self.end, self.tag)
    }

    /// Same extent, tag dropped.
    pub fn untagged(&self) -> Span<E> where E: Clone {
        Span {
            begin: self.begin.clone(),
            end: self.end.clone(),
            tag: None
        }
    }
}


impl<E, T> Bounds<E> for Span<E, T> {
    #[inline]
    fn begin(&self) -> &E {
        &self.begin
    }

    #[inline]
    fn end(&self) -> &E {
        &self.end
    }
}


impl<E: Display, T> Display for Span<E, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}


/// Renders a span together with its tag, `None` when untagged.
pub struct DisplayTagged<'a, E, T>(pub &'a Span<E, T>);


impl<'a, E: Display, T: Debug> Display for DisplayTagged<'a, E, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(tag) = self.0.tag() {
            write!(f, "{} {:?}", self.0, tag)
        } else {
            write!(f, "{} None", self.0)
        }
    }
}


#[cfg(test)]
mod test {
    use crate::{DisplayTagged, Span};


    #[test]
    fn display() {
        let plain = Span::<i32>::new_unchecked(1, 4, None);
        let tagged = Span::new_unchecked(2, 2, Some("x"));
        assert_eq!(plain.to_string(), "[1, 4]");
        assert_eq!(DisplayTagged(&tagged).to_string(), "[2, 2] \"x\"");
        assert_eq!(DisplayTagged(&plain).to_string(), "[1, 4] None");
    }

    #[test]
    fn untagged_keeps_extent() {
        let tagged = Span::new_unchecked(2, 5, Some(9u8));
        assert_eq!(tagged.untagged(), Span::new_unchecked(2, 5, None));
        assert_eq!(tagged.into_parts(), (2, 5, Some(9)));
    }
}
