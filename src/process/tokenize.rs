/// Split one CSV record line into its fields, honoring quoted fields that
/// carry embedded commas.
///
/// A double quote toggles the in-quotes state and stays in the field
/// content; doubled-quote unescaping is deliberately not performed, so a
/// field reads back exactly as it appeared in the line, quote marks
/// included. The scan never fails: an unbalanced quote just leaves the rest
/// of the line un-split.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == ',' && !in_quotes {
            fields.push(std::mem::take(&mut field));
        } else {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            field.push(c);
        }
    }

    // The final buffer always closes off a field, even an empty one.
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(split_csv_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_commas_inside_quoted_fields() {
        assert_eq!(split_csv_line("a,\"b,c\",d"), vec!["a", "\"b,c\"", "d"]);
    }

    #[test]
    fn empty_line_is_one_empty_field() {
        assert_eq!(split_csv_line(""), vec![""]);
    }

    #[test]
    fn trailing_comma_closes_an_empty_field() {
        assert_eq!(split_csv_line("a,"), vec!["a", ""]);
        assert_eq!(split_csv_line(","), vec!["", ""]);
    }

    #[test]
    fn quote_marks_stay_in_the_field_content() {
        assert_eq!(split_csv_line("\"x\",y"), vec!["\"x\"", "y"]);
    }

    #[test]
    fn unbalanced_quote_swallows_the_rest_of_the_line() {
        // the in-quotes flag stays toggled, so later commas are literal
        assert_eq!(split_csv_line("a,\"b,c"), vec!["a", "\"b,c"]);
    }

    #[test]
    fn retokenizing_a_single_field_is_stable() {
        let first = split_csv_line("fuselage");
        assert_eq!(first, vec!["fuselage"]);
        assert_eq!(split_csv_line(&first[0]), first);
    }

    #[test]
    fn quoted_location_in_a_real_record() {
        let line = "09/17/1908,17:18,\"Fort Myer, Virginia\",Military - U.S. Army";
        assert_eq!(
            split_csv_line(line),
            vec![
                "09/17/1908",
                "17:18",
                "\"Fort Myer, Virginia\"",
                "Military - U.S. Army"
            ]
        );
    }
}
