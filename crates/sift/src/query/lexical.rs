///
/// Lexical alignment
///
/// String-space comparison support for padded normalization. Values are
/// split into alternating digit and non-digit runs; digit run `k` of
/// every value is widened to the longest run `k` seen across the whole
/// comparison, so lexicographic ordering agrees with numeric ordering
/// ("9" vs "10" becomes "09" vs "10"). Runs sitting right after a
/// decimal point are fraction digits and widen to the right instead
/// ("1.5" vs "1.75" becomes "1.50" vs "1.75").
///
/// Widths are computed mutually across the target and every argument
/// of one comparison, never pairwise, so a two-argument range aligns
/// all three values at once.
///

/// Reorder a slash-delimited day/month/year date into a big-endian
/// `YYYY-MM-DD` string. Returns `None` for anything that is not three
/// all-digit components, leaving non-date text untouched.
pub(crate) fn big_endian_slash_date(raw: &str) -> Option<String> {
    let mut parts = raw.split('/');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    for part in [day, month, year] {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    Some(format!("{year:0>4}-{month:0>2}-{day:0>2}"))
}

/// Canonicalize the target and every argument, pad them mutually, and
/// return the aligned target first with the aligned arguments after it.
pub(crate) fn align(target: &str, args: &[&str]) -> (String, Vec<String>) {
    let mut values = Vec::with_capacity(args.len() + 1);
    values.push(canonical(target));
    values.extend(args.iter().map(|arg| canonical(arg)));

    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let mut padded = pad_mutual(&refs);

    let target = padded.remove(0);
    (target, padded)
}

fn canonical(text: &str) -> String {
    big_endian_slash_date(text).unwrap_or_else(|| text.to_string())
}

/// Width-align every digit run across all values.
pub(crate) fn pad_mutual(values: &[&str]) -> Vec<String> {
    let tokenized: Vec<Vec<(bool, &str)>> = values.iter().map(|value| runs(value)).collect();

    let mut widths: Vec<usize> = Vec::new();
    for value_runs in &tokenized {
        let mut k = 0;
        for (digit, run) in value_runs {
            if *digit {
                if k == widths.len() {
                    widths.push(0);
                }
                widths[k] = widths[k].max(run.len());
                k += 1;
            }
        }
    }

    tokenized
        .iter()
        .map(|value_runs| render(value_runs, &widths))
        .collect()
}

fn render(value_runs: &[(bool, &str)], widths: &[usize]) -> String {
    let mut out = String::new();
    let mut k = 0;

    for (idx, (digit, run)) in value_runs.iter().enumerate() {
        if !digit {
            out.push_str(run);
            continue;
        }

        let width = widths.get(k).copied().unwrap_or(run.len());
        k += 1;

        if fraction_run(value_runs, idx) {
            out.push_str(run);
            out.extend(std::iter::repeat_n('0', width.saturating_sub(run.len())));
        } else {
            out.extend(std::iter::repeat_n('0', width.saturating_sub(run.len())));
            out.push_str(run);
        }
    }

    out
}

// A digit run is fractional when it follows a decimal point that
// itself follows digits, as in "1.75".
fn fraction_run(value_runs: &[(bool, &str)], idx: usize) -> bool {
    idx >= 2
        && value_runs[idx - 1].1.ends_with('.')
        && value_runs[idx - 2].0
}

fn runs(text: &str) -> Vec<(bool, &str)> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let digit = bytes[start].is_ascii_digit();
        let mut end = start + 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() == digit {
            end += 1;
        }

        out.push((digit, &text[start..end]));
        start = end;
    }

    out
}

///
/// TESTS
///
