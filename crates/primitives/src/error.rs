use std::fmt::{Display, Formatter};


#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SpanError {
    /// Span begin is greater than its end.
    InvalidRange,
    /// Span does not follow the previous one in accumulation order.
    OutOfOrder,
    /// Driver was asked to start a second sweep.
    AlreadyStarted,
    /// Operation on a closed driver, cursor or feed.
    Closed,
    /// Span without a tag while tags are required.
    MissingTag
}


impl Display for SpanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanError::InvalidRange => write!(f, "span begin must be less than or equal to its end"),
            SpanError::OutOfOrder => write!(f, "span is out of sequence"),
            SpanError::AlreadyStarted => write!(f, "sweep was already started"),
            SpanError::Closed => write!(f, "span source is closed"),
            SpanError::MissingTag => write!(f, "span tag is required")
        }
    }
}


impl std::error::Error for SpanError {}
