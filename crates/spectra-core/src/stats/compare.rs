use super::descriptive::first_non_positive;

/// Element-wise comparison where `vector2[i]` may differ from `vector1[i]` by
/// at most `|vector1[i]| * percent_error / 100`. Vectors of different length
/// are never equal.
pub fn check_equal(vector1: &[f64], vector2: &[f64], percent_error: f64) -> bool {
    if vector1.len() != vector2.len() {
        return false;
    }
    vector1
        .iter()
        .zip(vector2)
        .all(|(expected, actual)| {
            let tolerance = (expected * percent_error / 100.0).abs();
            (expected - actual).abs() <= tolerance
        })
}

/// True when every vector has the length of the first one.
pub fn check_equal_size<V: AsRef<[f64]>>(vectors: &[V]) -> bool {
    let Some(first) = vectors.first() else {
        return true;
    };
    let expected = first.as_ref().len();
    vectors.iter().all(|vector| vector.as_ref().len() == expected)
}

pub fn is_negative_or_zero(values: &[f64]) -> bool {
    first_non_positive(values).is_some()
}
