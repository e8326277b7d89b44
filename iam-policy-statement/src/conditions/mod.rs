//! Condition accumulation
//!
//! Conditions are stored as buckets keyed by `(operator, key)`. Adding values
//! to an existing bucket unions them; the same key under a different operator
//! is a separate bucket. Buckets and their values keep first-insertion order.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use crate::catalog::{ActionCatalog, ConditionKeyType, ConditionValueKind};

pub mod global;
pub mod operator;

pub use operator::{BaseOperator, Operator, SetQualifier};

/// Values of one condition call, normalized to strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionValues(Vec<String>);

impl ConditionValues {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&str> for ConditionValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for ConditionValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&String> for ConditionValues {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl From<bool> for ConditionValues {
    fn from(value: bool) -> Self {
        Self(vec![value.to_string()])
    }
}

macro_rules! numeric_condition_values {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConditionValues {
                fn from(value: $ty) -> Self {
                    Self(vec![value.to_string()])
                }
            }
        )*
    };
}

numeric_condition_values!(i32, i64, u32, u64, usize, f64);

impl From<DateTime<Utc>> for ConditionValues {
    fn from(value: DateTime<Utc>) -> Self {
        Self(vec![format_date(&value)])
    }
}

impl From<Vec<String>> for ConditionValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for ConditionValues {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ConditionValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|value| (*value).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConditionValues {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|value| (*value).to_string()).collect())
    }
}

impl From<Vec<DateTime<Utc>>> for ConditionValues {
    fn from(values: Vec<DateTime<Utc>>) -> Self {
        Self(values.iter().map(format_date).collect())
    }
}

/// Prefix a bare key with the service prefix; prefixed keys are kept
pub fn normalize_key(service: &str, key: &str) -> String {
    if service.is_empty() || key.contains(':') {
        key.to_string()
    } else {
        format!("{}:{}", service, key)
    }
}

fn operator_for_type(key_type: ConditionKeyType) -> Operator {
    let base = match key_type.kind {
        ConditionValueKind::String => BaseOperator::StringLike,
        ConditionValueKind::Arn => BaseOperator::ArnLike,
        ConditionValueKind::Numeric => BaseOperator::NumericEquals,
        ConditionValueKind::Date => BaseOperator::DateEquals,
        ConditionValueKind::Bool => BaseOperator::Bool,
        ConditionValueKind::IpAddress => BaseOperator::IpAddress,
        ConditionValueKind::Binary => BaseOperator::BinaryEquals,
    };
    let operator = Operator::new(base);
    if key_type.multivalued {
        operator.for_any_value()
    } else {
        operator
    }
}

fn is_global_key(key: &str) -> bool {
    key.get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("aws:"))
}

/// Pick the operator for a condition added without one.
///
/// Global `aws:*` keys use the global key table, then `StringLike`, whatever
/// service the statement is bound to. Service keys use their type in the
/// catalog, then `StringLike`.
pub fn default_operator(catalog: &dyn ActionCatalog, service: &str, key: &str) -> Operator {
    let fallback = || Operator::new(BaseOperator::StringLike);
    if is_global_key(key) {
        return global::default_operator(key).unwrap_or_else(fallback);
    }
    catalog
        .lookup_condition_key(service, key)
        .and_then(|descriptor| descriptor.types.first().copied())
        .map_or_else(fallback, operator_for_type)
}

/// Ordered collection of condition buckets keyed by `(operator, key)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionBuilder {
    buckets: IndexMap<(Operator, String), IndexSet<String>>,
}

impl ConditionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `values` into the `(operator, key)` bucket, returning how many
    /// values were new
    pub fn add(
        &mut self,
        key: impl Into<String>,
        values: impl Into<ConditionValues>,
        operator: Operator,
    ) -> usize {
        let key = key.into();
        let values = values.into().into_inner();
        if values.is_empty() {
            log::debug!("Ignoring condition {} {} without values", operator, key);
            return 0;
        }

        let bucket = match self.buckets.entry((operator, key)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::trace!("New condition bucket {} {}", entry.key().0, entry.key().1);
                entry.insert(IndexSet::new())
            }
        };
        let before = bucket.len();
        bucket.extend(values);
        bucket.len() - before
    }

    /// Buckets in first-insertion order
    pub fn entries(&self) -> impl Iterator<Item = (Operator, &str, &IndexSet<String>)> {
        self.buckets
            .iter()
            .map(|((operator, key), values)| (*operator, key.as_str(), values))
    }

    /// Values of one bucket
    pub fn values(&self, operator: Operator, key: &str) -> Option<&IndexSet<String>> {
        self.buckets.get(&(operator, key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EmptyCatalog, InMemoryCatalog};
    use chrono::TimeZone;
    use rstest::rstest;

    fn string_equals() -> Operator {
        Operator::new(BaseOperator::StringEquals)
    }

    #[test]
    fn test_same_bucket_unions_values() {
        let mut builder = ConditionBuilder::new();
        assert_eq!(builder.add("Owner", "${aws:username}", string_equals()), 1);
        assert_eq!(builder.add("Owner", ["other", "${aws:username}"], string_equals()), 1);
        assert_eq!(builder.len(), 1);
        assert_eq!(
            Vec::from_iter(builder.values(string_equals(), "Owner").unwrap()),
            ["${aws:username}", "other"]
        );
    }

    #[test]
    fn test_different_operator_is_separate_bucket() {
        let mut builder = ConditionBuilder::new();
        builder.add("ec2:Owner", "a", string_equals());
        builder.add("ec2:Owner", "a", string_equals().if_exists());
        builder.add("ec2:Owner", "a", Operator::new(BaseOperator::StringLike));
        let operators: Vec<String> = builder
            .entries()
            .map(|(operator, _, _)| operator.to_string())
            .collect();
        assert_eq!(
            operators,
            vec!["StringEquals", "StringEqualsIfExists", "StringLike"]
        );
    }

    #[test]
    fn test_empty_values_do_not_create_bucket() {
        let mut builder = ConditionBuilder::new();
        assert_eq!(builder.add("ec2:Owner", Vec::<String>::new(), string_equals()), 0);
        assert!(builder.is_empty());
    }

    #[rstest]
    #[case(ConditionValues::from(true), vec!["true"])]
    #[case(ConditionValues::from(3600_u32), vec!["3600"])]
    #[case(ConditionValues::from(-1_i64), vec!["-1"])]
    #[case(ConditionValues::from(0.5_f64), vec!["0.5"])]
    #[case(ConditionValues::from(2.0_f64), vec!["2"])]
    #[case(ConditionValues::from(vec!["a", "b"]), vec!["a", "b"])]
    #[case(
        ConditionValues::from(Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()),
        vec!["2024-01-31T12:00:00.000Z"]
    )]
    fn test_value_normalization(#[case] values: ConditionValues, #[case] expected: Vec<&str>) {
        assert_eq!(values.into_inner(), expected);
    }

    #[rstest]
    #[case("ec2", "Owner", "ec2:Owner")]
    #[case("ec2", "aws:SourceIp", "aws:SourceIp")]
    #[case("", "Owner", "Owner")]
    fn test_normalize_key(#[case] service: &str, #[case] key: &str, #[case] expected: &str) {
        assert_eq!(normalize_key(service, key), expected);
    }

    #[test]
    fn test_default_operator_resolution() {
        let catalog = InMemoryCatalog::new()
            .with_service_json(
                r#"{
                    "Name": "ec2",
                    "ConditionKeys": [
                        {"Name": "ec2:Vpc", "Types": ["ARN"]},
                        {"Name": "ec2:VolumeSize", "Types": ["Numeric"]},
                        {"Name": "ec2:Attribute", "Types": ["ArrayOfString"]},
                        {"Name": "aws:TagKeys", "Types": ["ArrayOfString"]},
                        {"Name": "aws:SourceIp", "Types": ["String"]},
                        {"Name": "ec2:Mystery", "Types": ["Mystery"]}
                    ]
                }"#,
            )
            .unwrap();
        let render = |key: &str| default_operator(&catalog, "ec2", key).to_string();
        assert_eq!(render("ec2:Vpc"), "ArnLike");
        assert_eq!(render("ec2:VolumeSize"), "NumericEquals");
        assert_eq!(render("ec2:Attribute"), "ForAnyValue:StringLike");
        assert_eq!(render("aws:TagKeys"), "StringLike");
        assert_eq!(render("ec2:Mystery"), "StringLike");
        assert_eq!(render("aws:SourceIp"), "IpAddress");
        assert_eq!(render("ec2:InstanceType"), "StringLike");
        assert_eq!(
            default_operator(&EmptyCatalog, "", "aws:CurrentTime").to_string(),
            "DateLessThanEquals"
        );
    }
}
