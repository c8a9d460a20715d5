use serde_json::Value;

/// Year of a lookup candidate. Lookup payloads are not consistent about the
/// type, so JSON numbers and numeric strings are both accepted.
fn candidate_year(candidate: &Value) -> Option<i64> {
    match candidate.get("year") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Select the best candidate for an expected release year.
///
/// Without a year the downstream service's own ranking is trusted and the
/// first candidate wins. With one, the first exact year match wins; failing
/// that, the candidate with the smallest absolute year difference, where a
/// later candidate only displaces the current best on a strictly smaller
/// difference. Generic text lookups routinely return same-title entries
/// across several release years, so the input-order tie-break is load-bearing.
pub fn pick_best_by_year<'a>(
    candidates: &'a [Value],
    expected_year: Option<i64>,
) -> Option<&'a Value> {
    let first = candidates.first()?;
    let expected = match expected_year {
        Some(year) => year,
        None => return Some(first),
    };

    if let Some(exact) = candidates
        .iter()
        .find(|c| candidate_year(c) == Some(expected))
    {
        return Some(exact);
    }

    let mut best = first;
    let mut best_diff = i64::MAX;
    for candidate in candidates {
        let year = match candidate_year(candidate) {
            Some(year) => year,
            None => continue,
        };
        let diff = (year - expected).abs();
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(years: &[Option<i64>]) -> Vec<Value> {
        years
            .iter()
            .enumerate()
            .map(|(i, year)| match year {
                Some(y) => json!({"id": i + 1, "year": y}),
                None => json!({"id": i + 1}),
            })
            .collect()
    }

    #[test]
    fn test_empty_list_returns_none() {
        assert_eq!(pick_best_by_year(&[], Some(2020)), None);
        assert_eq!(pick_best_by_year(&[], None), None);
    }

    #[test]
    fn test_no_expected_year_returns_first() {
        let list = candidates(&[Some(2001), Some(1994)]);
        assert_eq!(pick_best_by_year(&list, None), Some(&list[0]));
    }

    #[test]
    fn test_first_exact_match_wins() {
        let list = candidates(&[Some(2019), Some(2021), Some(2021)]);
        let best = pick_best_by_year(&list, Some(2021)).unwrap();
        assert_eq!(best["id"], 2);
    }

    #[test]
    fn test_equal_distance_keeps_first_candidate() {
        // 2019 and 2021 are both one year off 2020; the first minimal
        // difference must win.
        let list = candidates(&[Some(2019), Some(2021)]);
        let best = pick_best_by_year(&list, Some(2020)).unwrap();
        assert_eq!(best["id"], 1);
    }

    #[test]
    fn test_minimal_difference_beats_earlier_candidates() {
        let list = candidates(&[Some(1990), Some(2015), Some(2024)]);
        let best = pick_best_by_year(&list, Some(2014)).unwrap();
        assert_eq!(best["id"], 2);
    }

    #[test]
    fn test_non_numeric_years_are_skipped() {
        let list = vec![
            json!({"id": 1, "year": "n/a"}),
            json!({"id": 2}),
            json!({"id": 3, "year": 1997}),
        ];
        let best = pick_best_by_year(&list, Some(2000)).unwrap();
        assert_eq!(best["id"], 3);
    }

    #[test]
    fn test_string_year_is_parsed() {
        let list = vec![
            json!({"id": 1, "year": "1999"}),
            json!({"id": 2, "year": 2003}),
        ];
        let best = pick_best_by_year(&list, Some(1999)).unwrap();
        assert_eq!(best["id"], 1);
    }

    #[test]
    fn test_picked_difference_is_minimal() {
        let list = candidates(&[Some(1988), Some(1999), Some(2012), Some(2004)]);
        let expected = 2003;
        let best = pick_best_by_year(&list, Some(expected)).unwrap();
        let best_diff = (best["year"].as_i64().unwrap() - expected).abs();
        for candidate in &list {
            let diff = (candidate["year"].as_i64().unwrap() - expected).abs();
            assert!(best_diff <= diff);
        }
    }
}
