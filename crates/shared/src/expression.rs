use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};

use crate::{DimensionError, DimensionName, DimensionResult, DimensionSnapshot};

/// Вычислить введённый пользователем текст размера.
///
/// Допускаются числа и простые формулы над текущими размерами
/// (`l`, `w`, `h`, `r`, `wall`) и константой `PI`, например `l / 2 + 10`.
pub fn evaluate_input(
    name: DimensionName,
    text: &str,
    current: &DimensionSnapshot,
) -> DimensionResult<f64> {
    let input = text.trim();
    if input.is_empty() {
        return Err(DimensionError::invalid(name.as_str(), "empty input"));
    }

    // Быстрый путь: обычное число
    if let Ok(value) = input.parse::<f64>() {
        return finite(name, value);
    }

    let mut context = HashMapContext::new();
    for &dim in DimensionName::all() {
        context
            .set_value(dim.variable().to_string(), Value::Float(current.get(dim)))
            .map_err(|e| DimensionError::invalid(name.as_str(), e.to_string()))?;
    }
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .map_err(|e| DimensionError::invalid(name.as_str(), e.to_string()))?;

    let tree = build_operator_tree(input)
        .map_err(|e| DimensionError::invalid(name.as_str(), format!("parse error: {}", e)))?;

    let value = tree
        .eval_with_context(&context)
        .map_err(|e| DimensionError::invalid(name.as_str(), format!("evaluation error: {}", e)))?;

    match value {
        Value::Float(f) => finite(name, f),
        Value::Int(i) => finite(name, i as f64),
        other => Err(DimensionError::invalid(
            name.as_str(),
            format!("expected number, got {:?}", other),
        )),
    }
}

fn finite(name: DimensionName, value: f64) -> DimensionResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DimensionError::invalid(name.as_str(), "value is not a number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        let s = DimensionSnapshot::default();
        assert_eq!(evaluate_input(DimensionName::Length, "130", &s), Ok(130.0));
        assert_eq!(evaluate_input(DimensionName::Length, " 12.5 ", &s), Ok(12.5));
    }

    #[test]
    fn test_formula_over_current_dimensions() {
        let s = DimensionSnapshot::default();
        let v = evaluate_input(DimensionName::Width, "l / 2 + 10", &s).unwrap();
        assert!((v - 70.0).abs() < 1e-9);

        let v = evaluate_input(DimensionName::Height, "h * 1.5", &s).unwrap();
        assert!((v - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_pi_constant() {
        let s = DimensionSnapshot::default();
        let v = evaluate_input(DimensionName::Radius, "PI * 2", &s).unwrap();
        assert!((v - std::f64::consts::TAU).abs() < 1e-9);
    }

    #[test]
    fn test_integer_result() {
        let s = DimensionSnapshot::default();
        assert_eq!(evaluate_input(DimensionName::Height, "20 + 30", &s), Ok(50.0));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let s = DimensionSnapshot::default();
        assert!(evaluate_input(DimensionName::Length, "abc", &s).is_err());
        assert!(evaluate_input(DimensionName::Length, "", &s).is_err());
        assert!(evaluate_input(DimensionName::Length, "\"text\"", &s).is_err());
        assert!(evaluate_input(DimensionName::Length, "NaN", &s).is_err());
    }
}
