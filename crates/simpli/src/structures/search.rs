//! Binary search over sorted integers

use crate::types::{Presence, TypeDescriptor, expect_type, to_exact_i64};
use crate::value::Value;
use crate::Result;

/// Whether `target` occurs in the ascending slice `sorted`
pub fn binary_search(sorted: &[i64], target: i64) -> bool {
    let (mut begin, mut end) = (0usize, sorted.len());
    while begin < end {
        let mid = begin + (end - begin) / 2;
        match target.cmp(&sorted[mid]) {
            std::cmp::Ordering::Less => end = mid,
            std::cmp::Ordering::Greater => begin = mid + 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

/// Dynamic form: `sorted` must be an integer array, `target` an integer
pub fn binary_search_value(sorted: &Value, target: &Value) -> Result<bool> {
    expect_type(
        sorted,
        &TypeDescriptor::array_of(TypeDescriptor::integer()),
        Presence::Required,
        "Invalid array, it should be an integer array",
    )?;
    expect_type(target, &TypeDescriptor::integer(), Presence::Required, "Invalid target, it should be an integer")?;
    let items = sorted
        .as_array()
        .unwrap_or_default()
        .iter()
        .map(|item| to_exact_i64(item, "Invalid array, it should be an integer array"))
        .collect::<Result<Vec<_>>>()?;
    let target = to_exact_i64(target, "Invalid target, it should be an integer")?;
    Ok(binary_search(&items, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search() {
        let sorted = [1, 3, 5, 7, 9];
        for n in sorted {
            assert!(binary_search(&sorted, n));
        }
        assert!(!binary_search(&sorted, 4));
        assert!(!binary_search(&sorted, 10));
        assert!(!binary_search(&sorted, 0));
        assert!(!binary_search(&[], 1));
    }

    #[test]
    fn test_dynamic_validation() {
        let sorted = Value::from(vec![Value::from(2), Value::from(4)]);
        assert!(binary_search_value(&sorted, &Value::from(4)).unwrap());
        assert!(!binary_search_value(&sorted, &Value::from(3)).unwrap());
        assert!(binary_search_value(&Value::from(vec![Value::from(1.5)]), &Value::from(1)).is_err());
        assert!(binary_search_value(&sorted, &Value::from("4")).is_err());
    }

    #[test]
    fn test_dynamic_rejects_inexact_integers() {
        let huge = Value::from(vec![Value::from(1e19)]);
        assert!(matches!(
            binary_search_value(&huge, &Value::from(2e19)),
            Err(crate::SimpliError::InvalidArgument(_))
        ));
        let sorted = Value::from(vec![Value::from(9.0e15)]);
        assert!(binary_search_value(&sorted, &Value::from(2e19)).is_err());
        assert!(binary_search_value(&sorted, &Value::from(9.0e15)).unwrap());
    }
}
