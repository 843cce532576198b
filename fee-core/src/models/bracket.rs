use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One contiguous slice of the base amount range.
///
/// `upper_bound` is the exclusive upper edge used for allocation; `None`
/// marks the unbounded terminal bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper_bound: Option<Decimal>,
    pub label: String,
}

impl Bracket {
    pub fn bounded(
        upper_bound: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            label: label.into(),
        }
    }

    pub fn unbounded(label: impl Into<String>) -> Self {
        Self {
            upper_bound: None,
            label: label.into(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }

    /// Width of this bracket given the bound of the bracket below it.
    /// `None` means the span is infinite.
    pub fn span(
        &self,
        previous_bound: Decimal,
    ) -> Option<Decimal> {
        self.upper_bound.map(|bound| bound - previous_bound)
    }
}
