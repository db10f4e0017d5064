/// A query type for dealing with datetime ranges.
///
/// The datetime representation is implementation-defined, so this type is
/// generic over it. Both endpoints are optional; an empty query selects the
/// full history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "D: serde::Serialize",
        deserialize = "D: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DateTimeRangeQuery<D> {
    /// Select results at or before this time
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub before: Option<D>,
    /// Select results at or after this time
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub after: Option<D>,
}

// not derived: D itself need not be Default for the empty query to exist
impl<D> Default for DateTimeRangeQuery<D> {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
        }
    }
}

/// The paginated response to a datetime range query.
///
/// If more results are available, `more` contains the query that will
/// retrieve the next page.
#[derive(Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "T: serde::Serialize, D: serde::Serialize",
        deserialize = "T: serde::Deserialize<'de>, D: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DateTimeRangeResponse<T, D> {
    /// The page of results
    pub results: Vec<T>,
    /// If present, the query to use to retrieve the next page
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub more: Option<DateTimeRangeQuery<D>>,
}
