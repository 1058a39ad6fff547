//! Composite-key round trip
//!
//! Write side (render): each repeated row of a multi-column selection
//! registers its joined value string; the fully-qualified key-name list is
//! registered once per request per input. Read side (next request): every
//! submitted occurrence of the input is validated against the stored
//! valid-value set, decomposed, and fanned back into per-key parameters.
//! This path handles attacker-influenced data: anything that does not
//! validate is dropped, never raised.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use formrelay_core::{FormAggregationContext, FormError, FormResult, RequestScope};

/// Hidden field carrying the comma-joined fully-qualified key names
pub const COMPOSITE_KEY_NAMES_PREFIX: &str = "fr_keys_";

/// Hidden field carrying one valid joined-value string per rendered row
pub const COMPOSITE_VALID_VALUES_PREFIX: &str = "fr_valid_";

/// Delimiter inside joined key-name and value strings
pub const COMPOSITE_DELIMITER: char = ',';

/// Hidden field name storing the key-name list for an input
pub fn key_names_field(input_name: &str) -> String {
    format!("{COMPOSITE_KEY_NAMES_PREFIX}{input_name}")
}

/// Hidden field name storing the valid-value set for an input
pub fn valid_values_field(input_name: &str) -> String {
    format!("{COMPOSITE_VALID_VALUES_PREFIX}{input_name}")
}

/// Supplies per-key values for one rendered row
pub trait ValueSource {
    fn value_of(&self, key: &str) -> Option<String>;
}

impl ValueSource for HashMap<String, String> {
    fn value_of(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl ValueSource for &[(String, String)] {
    fn value_of(&self, key: &str) -> Option<String> {
        self.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }
}

/// Register one rendered row of a composite-key input.
///
/// Builds two parallel comma-joined strings: the fully-qualified key names
/// (`<keyPrefix>.<key>`) and the row's values (missing key -> empty
/// string). The key-name list is written once per request per input name;
/// the value string is written for every row. Returns the joined value
/// string the directive renders as the row's submitted value.
///
/// An input name equal to one of its own fully-qualified key names would
/// collide with the fan-out on the next request; that is a template
/// error, raised immediately.
pub fn store_key_value_set(
    scope: &mut RequestScope,
    ctx: &mut FormAggregationContext,
    input_name: &str,
    key_prefix: &str,
    keys: &[String],
    row: &impl ValueSource,
) -> FormResult<String> {
    let qualified: Vec<String> = keys
        .iter()
        .map(|k| format!("{key_prefix}.{k}"))
        .collect();
    if let Some(clash) = qualified.iter().find(|q| *q == input_name) {
        return Err(FormError::CompositeKeyCollision {
            input: input_name.to_string(),
            key: clash.clone(),
        });
    }

    let joined_values = keys
        .iter()
        .map(|k| row.value_of(k).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(&COMPOSITE_DELIMITER.to_string());

    if scope.mark_composite_keys_written(input_name) {
        let joined_keys = qualified.join(&COMPOSITE_DELIMITER.to_string());
        ctx.add_hidden_entry(&key_names_field(input_name), [joined_keys]);
    }
    ctx.add_hidden_entry(&valid_values_field(input_name), [joined_values.clone()]);

    Ok(joined_values)
}

/// Expand valid submitted composite values back into ordinary per-key
/// parameters.
///
/// Every occurrence of the input parameter is checked for membership in
/// the stored valid-value set; valid occurrences are decomposed by the
/// delimiter and appended to the fully-qualified key parameters. Rows
/// outside the set or with an arity mismatch are dropped silently: this
/// is untrusted input, degrading to "nothing selected".
pub fn restore_composite_params(scope: &mut RequestScope, input_name: &str) {
    let Some(joined_keys) = scope.param(&key_names_field(input_name)) else {
        return;
    };
    let keys: Vec<String> = joined_keys
        .split(COMPOSITE_DELIMITER)
        .map(str::to_string)
        .collect();

    let valid: HashSet<String> = scope
        .param_values(&valid_values_field(input_name))
        .iter()
        .cloned()
        .collect();
    let submitted: Vec<String> = scope.param_values(input_name).to_vec();

    for value in submitted {
        if !valid.contains(&value) {
            debug!(input = input_name, "dropping composite value outside the valid set");
            continue;
        }
        let parts: Vec<&str> = value.split(COMPOSITE_DELIMITER).collect();
        if parts.len() != keys.len() {
            debug!(input = input_name, "dropping composite value with key arity mismatch");
            continue;
        }
        for (key, part) in keys.iter().zip(parts) {
            scope.add_param(key, part);
        }
    }
}

/// Rebuild the submitted candidate list for an input by positionally
/// zipping the per-key parameter arrays; computed once per request per
/// input name and cached in the scope.
pub fn candidate_values<'a>(scope: &'a mut RequestScope, input_name: &str) -> &'a [String] {
    if scope.cached_candidates(input_name).is_none() {
        let list = build_candidates(scope, input_name);
        scope.cache_candidates(input_name, list);
    }
    scope.cached_candidates(input_name).unwrap_or(&[])
}

fn build_candidates(scope: &RequestScope, input_name: &str) -> Vec<String> {
    let Some(joined_keys) = scope.param(&key_names_field(input_name)) else {
        return Vec::new();
    };
    let keys: Vec<&str> = joined_keys.split(COMPOSITE_DELIMITER).collect();

    let columns: Vec<&[String]> = keys.iter().map(|k| scope.param_values(k)).collect();
    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);

    (0..rows)
        .map(|i| {
            columns
                .iter()
                .map(|c| c.get(i).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(&COMPOSITE_DELIMITER.to_string())
        })
        .collect()
}

/// Selection test for one rendered row.
///
/// The row's own key values are joined with the delimiter and compared as
/// strings against either a single bound composite value (fast path) or
/// the cached candidate list (slow path).
pub fn is_checked(
    scope: &mut RequestScope,
    input_name: &str,
    row_values: &[String],
    bound_value: Option<&str>,
) -> bool {
    let joined = row_values.join(&COMPOSITE_DELIMITER.to_string());
    match bound_value {
        Some(bound) => bound == joined,
        None => candidate_values(scope, input_name).iter().any(|c| *c == joined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn keys() -> Vec<String> {
        vec!["k1".to_string(), "k2".to_string()]
    }

    #[test]
    fn test_store_two_rows() {
        let mut scope = RequestScope::new();
        let mut ctx = FormAggregationContext::begin(&mut scope, "orderForm").unwrap();

        let v1 = store_key_value_set(
            &mut scope,
            &mut ctx,
            "rows",
            "order",
            &keys(),
            &row(&[("k1", "a"), ("k2", "b")]),
        )
        .unwrap();
        let v2 = store_key_value_set(
            &mut scope,
            &mut ctx,
            "rows",
            "order",
            &keys(),
            &row(&[("k1", "c"), ("k2", "d")]),
        )
        .unwrap();

        assert_eq!(v1, "a,b");
        assert_eq!(v2, "c,d");

        // Key-name list once, one valid-value entry per row
        assert_eq!(ctx.hidden_entry("fr_keys_rows"), Some("order.k1,order.k2"));
        let valid: Vec<&str> = ctx
            .hidden_entries()
            .iter()
            .filter(|(n, _)| n == "fr_valid_rows")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(valid, vec!["a,b", "c,d"]);
    }

    #[test]
    fn test_store_missing_value_becomes_empty() {
        let mut scope = RequestScope::new();
        let mut ctx = FormAggregationContext::begin(&mut scope, "orderForm").unwrap();

        let v = store_key_value_set(
            &mut scope,
            &mut ctx,
            "rows",
            "order",
            &keys(),
            &row(&[("k1", "a")]),
        )
        .unwrap();
        assert_eq!(v, "a,");
    }

    #[test]
    fn test_store_collision_is_usage_error() {
        let mut scope = RequestScope::new();
        let mut ctx = FormAggregationContext::begin(&mut scope, "orderForm").unwrap();

        let result = store_key_value_set(
            &mut scope,
            &mut ctx,
            "order.k1",
            "order",
            &keys(),
            &row(&[("k1", "a"), ("k2", "b")]),
        );
        assert!(matches!(
            result,
            Err(FormError::CompositeKeyCollision { .. })
        ));
    }

    fn submitted_scope() -> RequestScope {
        let mut scope = RequestScope::new();
        scope.set_param("fr_keys_rows", vec!["order.k1,order.k2".to_string()]);
        scope.set_param(
            "fr_valid_rows",
            vec!["a,b".to_string(), "c,d".to_string()],
        );
        scope
    }

    #[test]
    fn test_restore_fans_out_valid_rows() {
        let mut scope = submitted_scope();
        scope.set_param("rows", vec!["a,b".to_string(), "c,d".to_string()]);

        restore_composite_params(&mut scope, "rows");

        assert_eq!(scope.param_values("order.k1"), &["a", "c"]);
        assert_eq!(scope.param_values("order.k2"), &["b", "d"]);
    }

    #[test]
    fn test_restore_drops_forged_value() {
        let mut scope = submitted_scope();
        scope.set_param("rows", vec!["a,d".to_string(), "c,d".to_string()]);

        restore_composite_params(&mut scope, "rows");

        // Forged "a,d" dropped; valid "c,d" kept
        assert_eq!(scope.param_values("order.k1"), &["c"]);
        assert_eq!(scope.param_values("order.k2"), &["d"]);
    }

    #[test]
    fn test_restore_drops_arity_mismatch() {
        let mut scope = submitted_scope();
        // Valid set poisoned with a short row; membership passes, arity fails
        scope.add_param("fr_valid_rows", "x");
        scope.set_param("rows", vec!["x".to_string()]);

        restore_composite_params(&mut scope, "rows");

        assert!(!scope.has_param("order.k1"));
        assert!(!scope.has_param("order.k2"));
    }

    #[test]
    fn test_restore_without_stored_keys_is_noop() {
        let mut scope = RequestScope::new();
        scope.set_param("rows", vec!["a,b".to_string()]);
        restore_composite_params(&mut scope, "rows");
        assert!(!scope.has_param("order.k1"));
    }

    #[test]
    fn test_candidate_reconstruction() {
        let mut scope = submitted_scope();
        scope.set_param("order.k1", vec!["a".to_string(), "c".to_string()]);
        scope.set_param("order.k2", vec!["b".to_string(), "d".to_string()]);

        let candidates = candidate_values(&mut scope, "rows");
        assert_eq!(candidates, &["a,b", "c,d"]);
    }

    #[test]
    fn test_candidate_list_cached_per_request() {
        let mut scope = submitted_scope();
        scope.set_param("order.k1", vec!["a".to_string()]);
        scope.set_param("order.k2", vec!["b".to_string()]);

        assert_eq!(candidate_values(&mut scope, "rows"), &["a,b"]);

        // Later parameter mutations do not invalidate the cache
        scope.add_param("order.k1", "c");
        scope.add_param("order.k2", "d");
        assert_eq!(candidate_values(&mut scope, "rows"), &["a,b"]);
    }

    #[test]
    fn test_is_checked_fast_path() {
        let mut scope = RequestScope::new();
        let values = vec!["a".to_string(), "b".to_string()];
        assert!(is_checked(&mut scope, "rows", &values, Some("a,b")));
        assert!(!is_checked(&mut scope, "rows", &values, Some("a,d")));
    }

    #[test]
    fn prop_store_restore_roundtrip() {
        use proptest::prelude::*;

        proptest!(|(
            rows in proptest::collection::vec(("[a-z0-9]{1,8}", "[a-z0-9]{1,8}"), 1..6),
        )| {
            // Render pass: one stored row per rendered row
            let mut scope = RequestScope::new();
            let mut ctx = FormAggregationContext::begin(&mut scope, "f").unwrap();
            let keys = keys();
            let mut joined = Vec::new();
            for (a, b) in &rows {
                let row = row(&[("k1", a.as_str()), ("k2", b.as_str())]);
                joined.push(
                    store_key_value_set(&mut scope, &mut ctx, "rows", "order", &keys, &row)
                        .unwrap(),
                );
            }

            // Postback: hidden entries come back as params, every row selected
            let mut next = RequestScope::new();
            for (name, value) in ctx.hidden_entries() {
                next.add_param(name, value.clone());
            }
            next.set_param("rows", joined.clone());
            restore_composite_params(&mut next, "rows");

            let k1: Vec<String> = rows.iter().map(|(a, _)| a.clone()).collect();
            let k2: Vec<String> = rows.iter().map(|(_, b)| b.clone()).collect();
            prop_assert_eq!(next.param_values("order.k1"), &k1[..]);
            prop_assert_eq!(next.param_values("order.k2"), &k2[..]);
        });
    }

    #[test]
    fn test_is_checked_slow_path() {
        let mut scope = submitted_scope();
        scope.set_param("order.k1", vec!["a".to_string(), "c".to_string()]);
        scope.set_param("order.k2", vec!["b".to_string(), "d".to_string()]);

        let selected = vec!["a".to_string(), "b".to_string()];
        let other = vec!["a".to_string(), "d".to_string()];
        assert!(is_checked(&mut scope, "rows", &selected, None));
        assert!(!is_checked(&mut scope, "rows", &other, None));
    }
}
