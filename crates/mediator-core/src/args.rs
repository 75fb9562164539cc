//! Argument values carried from a trigger to a director handler.

use serde_json::Value;

/// The opaque value describing what triggered a signal.
///
/// The engine never looks inside an event except for an optional `target`
/// member, read only when [`EventArgs::EventAndTarget`](crate::EventArgs) is
/// configured.
pub type Event = Value;

/// Arguments for one handler invocation.
///
/// A [`Single`](Args::Single) value is delivered as the handler's only
/// argument. A [`Spread`](Args::Spread) list is delivered positionally.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// One value, passed as the only argument.
    Single(Value),
    /// An ordered list, spread across positional parameters.
    Spread(Vec<Value>),
}

impl Args {
    /// No arguments at all.
    pub fn none() -> Self {
        Self::Spread(Vec::new())
    }

    /// Wraps a single value.
    pub fn single(value: impl Into<Value>) -> Self {
        Self::Single(value.into())
    }

    /// Builds a positional list.
    pub fn spread<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Spread(values.into_iter().map(Into::into).collect())
    }

    /// Number of positional arguments the handler will receive.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Spread(values) => values.len(),
        }
    }

    /// Returns `true` if no positional argument will be delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the argument at `index`, if delivered.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Single(value) if index == 0 => Some(value),
            Self::Single(_) => None,
            Self::Spread(values) => values.get(index),
        }
    }

    /// Flattens into the positional list a handler receives.
    pub fn into_positional(self) -> Vec<Value> {
        match self {
            Self::Single(value) => vec![value],
            Self::Spread(values) => values,
        }
    }

    /// Whether these arguments count as present for a `name` + `args` definition.
    ///
    /// A list is always truthy, even when empty. A single value is falsy
    /// when it is `null`, `false`, zero or the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Spread(_) => true,
            Self::Single(value) => is_truthy(value),
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::Spread(values)
    }
}

impl From<Value> for Args {
    /// Arrays spread, everything else stays single.
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => Self::Spread(values),
            other => Self::Single(other),
        }
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Args::single(Value::Null).is_truthy());
        assert!(!Args::single(false).is_truthy());
        assert!(!Args::single(0).is_truthy());
        assert!(!Args::single(0.0).is_truthy());
        assert!(!Args::single("").is_truthy());

        assert!(Args::single("x").is_truthy());
        assert!(Args::single(-1).is_truthy());
        assert!(Args::single(json!({})).is_truthy());
        assert!(Args::single(json!([])).is_truthy());
        assert!(Args::none().is_truthy());
    }

    #[test]
    fn test_array_value_spreads() {
        let args = Args::from(json!([1, "two"]));
        assert_eq!(args, Args::Spread(vec![json!(1), json!("two")]));

        let args = Args::from(json!({"id": 3}));
        assert_eq!(args, Args::Single(json!({"id": 3})));
    }

    #[test]
    fn test_positional_access() {
        let single = Args::single(42);
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0), Some(&json!(42)));
        assert_eq!(single.get(1), None);

        let spread = Args::spread([1, 2]);
        assert_eq!(spread.get(1), Some(&json!(2)));
        assert!(Args::none().is_empty());
    }
}
