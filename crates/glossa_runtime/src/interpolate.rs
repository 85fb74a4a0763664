//! Positional placeholder substitution.

/// Replace each `{i}` in `template` with `args[i]`.
///
/// The scan is a single left-to-right pass, so substituted values are never
/// rescanned. Placeholders without a matching argument, and braces that do
/// not form a placeholder, are copied through unchanged.
pub(crate) fn interpolate<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        output.push_str(before);
        let after_brace = from_brace.get(1..).unwrap_or_default();
        let digits = after_brace
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(after_brace.len());
        let value = after_brace
            .get(digits..)
            .filter(|tail| digits > 0 && tail.starts_with('}'))
            .and_then(|_| after_brace.get(..digits))
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| args.get(index));
        match value {
            Some(value) => {
                output.push_str(value.as_ref());
                rest = after_brace.get(digits + 1..).unwrap_or_default();
            }
            None => {
                output.push('{');
                rest = after_brace;
            }
        }
    }
    output.push_str(rest);
    output
}
