use std::sync::Arc;

use dtk_model::{ComparisonResult, DataTypeResolution, Result, Value};
use tracing::{trace, warn};

use super::ServicesHandle;
use super::handlers::{HandlerList, LazyLoad, LazyLoader, find_with_lazy_load};
use crate::dispose::DisposeGuard;

/// Compares two values when the default comparison is not good enough.
pub trait DataTypeComparer: Send + Sync {
    fn supports(
        &self,
        left: &Value,
        right: &Value,
        left_lookup_key: Option<&str>,
        right_lookup_key: Option<&str>,
    ) -> bool;

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        left_lookup_key: Option<&str>,
        right_lookup_key: Option<&str>,
    ) -> Result<ComparisonResult>;

    fn attach(&self, _services: &ServicesHandle) {}
}

/// Comparer registry. Custom comparers are consulted in registration order,
/// otherwise both sides go through the converter service and
/// [`default_compare`].
pub struct ComparerService {
    handlers: HandlerList<dyn DataTypeComparer>,
    lazy_load: LazyLoader<ComparerService>,
    host: ServicesHandle,
    guard: DisposeGuard,
}

impl ComparerService {
    pub(crate) fn new(host: ServicesHandle) -> Self {
        Self {
            handlers: HandlerList::default(),
            lazy_load: LazyLoader::default(),
            host,
            guard: DisposeGuard::new("ComparerService"),
        }
    }

    pub fn register(&self, comparer: Arc<dyn DataTypeComparer>) -> Result<()> {
        self.guard.check()?;
        comparer.attach(&self.host);
        self.handlers.push(comparer);
        Ok(())
    }

    pub fn set_lazy_load(&self, load: LazyLoad<ComparerService>) -> Result<()> {
        self.guard.check()?;
        self.lazy_load.set(load)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(
        &self,
        left: &Value,
        right: &Value,
        left_lookup_key: Option<&str>,
        right_lookup_key: Option<&str>,
    ) -> Result<Option<Arc<dyn DataTypeComparer>>> {
        self.guard.check()?;
        Ok(find_with_lazy_load(self, &self.lazy_load, |service| {
            service.handlers.first(|comparer| {
                comparer.supports(left, right, left_lookup_key, right_lookup_key)
            })
        }))
    }

    pub fn compare(
        &self,
        left: &Value,
        right: &Value,
        left_lookup_key: Option<&str>,
        right_lookup_key: Option<&str>,
    ) -> Result<ComparisonResult> {
        self.guard.check()?;
        if let Some(comparer) = self.find(left, right, left_lookup_key, right_lookup_key)? {
            trace!("custom comparer selected");
            return match comparer.compare(left, right, left_lookup_key, right_lookup_key) {
                Err(error) if !error.is_severe() => {
                    warn!(%error, "comparer failed");
                    Ok(ComparisonResult::Undetermined)
                }
                other => other,
            };
        }

        let services = self.host.services()?;
        let converters = services.converters();
        let left = converters.convert_until_simple(left, left_lookup_key)?;
        let right = converters.convert_until_simple(right, right_lookup_key)?;
        match (left, right) {
            (DataTypeResolution::Value(left), DataTypeResolution::Value(right)) => {
                Ok(default_compare(&left, &right))
            }
            _ => Ok(ComparisonResult::Undetermined),
        }
    }

    pub(crate) fn dispose(&self) {
        self.guard.dispose();
        self.handlers.clear();
        self.lazy_load.clear();
    }
}

/// Comparison of two already-converted values.
///
/// Values of different kinds, `NaN`, and dates are `Undetermined`; a null
/// against a non-null is `NotEqual`; booleans are only equal or not equal.
pub fn default_compare(left: &Value, right: &Value) -> ComparisonResult {
    match (left, right) {
        (Value::Null, Value::Null) => ComparisonResult::Equal,
        (Value::Null, _) | (_, Value::Null) => ComparisonResult::NotEqual,
        (Value::Number(l), Value::Number(r)) => l
            .partial_cmp(r)
            .map_or(ComparisonResult::Undetermined, ComparisonResult::from),
        (Value::String(l), Value::String(r)) => ComparisonResult::from(l.cmp(r)),
        (Value::Boolean(l), Value::Boolean(r)) => {
            if l == r {
                ComparisonResult::Equal
            } else {
                ComparisonResult::NotEqual
            }
        }
        _ => ComparisonResult::Undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_compare_orders_numbers_and_strings() {
        assert_eq!(
            default_compare(&Value::Number(1.0), &Value::Number(2.0)),
            ComparisonResult::LessThan
        );
        assert_eq!(
            default_compare(&Value::from("b"), &Value::from("a")),
            ComparisonResult::GreaterThan
        );
    }

    #[test]
    fn default_compare_handles_nulls_and_mixed_kinds() {
        assert_eq!(
            default_compare(&Value::Null, &Value::Null),
            ComparisonResult::Equal
        );
        assert_eq!(
            default_compare(&Value::Null, &Value::Number(0.0)),
            ComparisonResult::NotEqual
        );
        assert_eq!(
            default_compare(&Value::Number(1.0), &Value::from("1")),
            ComparisonResult::Undetermined
        );
        assert_eq!(
            default_compare(&Value::Number(f64::NAN), &Value::Number(1.0)),
            ComparisonResult::Undetermined
        );
    }

    #[test]
    fn booleans_are_equal_or_not() {
        assert_eq!(
            default_compare(&Value::Boolean(true), &Value::Boolean(false)),
            ComparisonResult::NotEqual
        );
        assert_eq!(
            default_compare(&Value::Boolean(true), &Value::Boolean(true)),
            ComparisonResult::Equal
        );
    }
}
