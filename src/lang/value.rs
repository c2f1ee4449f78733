use serde::{Deserialize, Serialize};

use crate::memory::grow_capacity;

/// Runtime value in the clox language.
///
/// Values are the only data that can exist on the VM stack or in a constant
/// pool. Numbers are the only kind for now; new kinds become new variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit floating-point number.
    Number(f64),
}

impl Value {
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl std::fmt::Display for Value {
    /// Shortest decimal that reads back as the same double.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Append-only, index-addressed storage for values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueArray {
    values: Vec<Value>,
    #[serde(skip)]
    capacity: usize,
}

impl ValueArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` and returns its index.
    pub fn write(&mut self, value: Value) -> usize {
        if self.values.len() == self.capacity {
            self.capacity = grow_capacity(self.capacity);
            self.values.reserve_exact(self.capacity - self.values.len());
        }
        self.values.push(value);
        self.values.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Restores the growth bookkeeping after deserialization.
    pub(crate) fn settle_capacity(&mut self) {
        self.capacity = self.values.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_integral_number() {
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(42.0).to_string(), "42");
    }

    #[test]
    fn test_display_fraction() {
        assert_eq!(Value::Number(1.2).to_string(), "1.2");
    }

    #[test]
    fn test_display_non_finite() {
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_write_returns_sequential_indices() {
        let mut pool = ValueArray::new();
        assert_eq!(pool.write(Value::Number(1.0)), 0);
        assert_eq!(pool.write(Value::Number(1.0)), 1);
        assert_eq!(pool.write(Value::Number(2.0)), 2);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(1), Some(Value::Number(1.0)));
        assert_eq!(pool.get(3), None);
    }

    #[test]
    fn test_growth_policy() {
        let mut pool = ValueArray::new();
        assert_eq!(pool.capacity(), 0);

        pool.write(Value::Number(0.0));
        assert_eq!(pool.capacity(), 8);

        for i in 1..9 {
            pool.write(Value::Number(i as f64));
        }
        assert_eq!(pool.len(), 9);
        assert_eq!(pool.capacity(), 16);
    }
}
